//! Command execution context
//!
//! Loads and validates configuration once, then hands out the upstream
//! clients a command needs. Clients are built lazily so that, for example,
//! `search` works without an OpenAI key.

use std::sync::Arc;
use std::time::Duration;

use crate::cli::{GlobalOptions, OutputFormat};
use crate::client::{OpenAiClient, RegistryClient};
use crate::config::Config;
use crate::error::Result;
use crate::storage::{self, ImageStore};
use crate::workflow::SearchDebouncer;

pub struct CommandContext {
    /// Effective configuration (file, then environment overrides)
    pub config: Config,
    pub format: OutputFormat,
}

impl CommandContext {
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Config::load_at(opts.config_ref())?;
        config.validate()?;

        log::debug!(
            "Using registry {} and generator {}",
            config.registry_url,
            config.openai_url
        );

        Ok(Self {
            config,
            format: opts.format,
        })
    }

    pub fn registry(&self) -> Result<RegistryClient> {
        RegistryClient::with_base_url(
            &self.config.registry_url,
            self.config.timeouts.registry(),
            self.config.rate_limit_per_second,
        )
    }

    /// Fails with a hint to run `init` when no API key is configured
    pub fn generator(&self) -> Result<OpenAiClient> {
        OpenAiClient::from_config(&self.config)
    }

    pub async fn image_store(&self) -> Result<Arc<dyn ImageStore>> {
        storage::from_config(&self.config).await
    }

    pub fn debouncer(&self) -> SearchDebouncer {
        SearchDebouncer::new(Duration::from_millis(self.config.search_debounce_ms))
    }
}
