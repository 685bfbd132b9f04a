//! CLI command definitions and handlers

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod context;
pub mod create;
pub mod directory;
pub mod generate;
pub mod init;
pub mod serve;
pub mod status;

pub use args::{GlobalOptions, OutputFormat};
pub use context::CommandContext;

/// Good Badger - honorary supporter badges for the nonprofits you back
#[derive(Parser, Debug)]
#[command(name = "goodbadger")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json)
    #[arg(
        long,
        global = true,
        env = "GOODBADGER_FORMAT",
        default_value = "table",
        hide_env = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "GOODBADGER_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "GOODBADGER_DEBUG", hide_env = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the configuration file interactively
    Init,

    /// Show configuration status
    Status,

    /// Run the HTTP API
    Serve {
        /// Port to listen on (overrides config and GOODBADGER_PORT)
        #[arg(long, short = 'p')]
        port: Option<u16>,
    },

    /// Search the nonprofit registry by name
    Search {
        /// Search text (at least 2 characters)
        query: String,
    },

    /// Show one nonprofit by EIN
    Lookup {
        /// Employer Identification Number, with or without the dash
        ein: String,
    },

    /// Suggest honorary titles for a set of nonprofits
    Titles {
        /// Nonprofit names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Generate a badge illustration for a title
    Badge {
        /// Honorary title
        title: String,

        /// Write the PNG here (inline image store only)
        #[arg(long, short = 'o')]
        out: Option<std::path::PathBuf>,
    },

    /// Pick a palette and card for a badge page
    Render {
        /// Honorary title
        title: String,

        /// Supported nonprofit (repeatable)
        #[arg(long = "nonprofit", short = 'n', required = true)]
        nonprofits: Vec<String>,
    },

    /// Walk through search, titles and badge generation, then save the page
    Create {
        /// Where to write the finished badge page
        #[arg(long, short = 'o', default_value = "badge.html")]
        out: std::path::PathBuf,
    },

    /// Generate shell completions
    #[command(after_help = "\
Examples:
  bash:   goodbadger completion bash > /etc/bash_completion.d/goodbadger
  zsh:    goodbadger completion zsh > \"${fpath[1]}/_goodbadger\"
  fish:   goodbadger completion fish > ~/.config/fish/completions/goodbadger.fish")]
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}
