//! Options shared by every command

use crate::cli::Cli;

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Table,
    /// JSON wrapped with metadata, for scripts
    Json,
}

/// Global flags, collected once after parsing.
///
/// Precedence for settings is CLI flag > environment variable > config file >
/// built-in default. This struct holds the first two layers; the rest is
/// resolved when [`crate::cli::CommandContext`] loads the config.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub format: OutputFormat,

    /// Custom config file path (defaults to ~/.goodbadger/config.yaml)
    pub config: Option<String>,
}

impl GlobalOptions {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
        }
    }

    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_ref() {
        let opts = GlobalOptions {
            format: OutputFormat::Json,
            config: Some("/tmp/gb.yaml".to_string()),
        };
        assert_eq!(opts.config_ref(), Some("/tmp/gb.yaml"));
        assert_eq!(GlobalOptions::default().config_ref(), None);
        assert_eq!(GlobalOptions::default().format, OutputFormat::Table);
    }
}
