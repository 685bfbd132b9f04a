//! Configuration management for Good Badger
//!
//! Settings are read from `~/.goodbadger/config.yaml` (or `--config`), then
//! selectively overridden from the environment so deployments can run with
//! no file at all.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::{ConfigError, Result};

/// ProPublica Nonprofit Explorer API
pub const DEFAULT_REGISTRY_URL: &str = "https://projects.propublica.org/nonprofits/api/v2";

/// OpenAI REST API
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

/// Settings read from `~/.goodbadger/config.yaml` plus environment overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OpenAI API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,

    /// Nonprofit registry base URL
    #[serde(default = "default_registry_url")]
    pub registry_url: String,

    /// Generative AI base URL
    #[serde(default = "default_openai_url")]
    pub openai_url: String,

    /// Chat model used for titles and page rendering
    #[serde(default = "default_text_model")]
    pub text_model: String,

    /// Image model used for badge illustrations
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Upstream request timeouts
    #[serde(default)]
    pub timeouts: Timeouts,

    /// Maximum registry requests per second
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_second: u32,

    /// Delay before a typed search query is sent
    #[serde(default = "default_debounce_ms")]
    pub search_debounce_ms: u64,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Where generated badge images end up
    #[serde(default)]
    pub image_store: ImageStoreConfig,
}

/// Per-upstream timeouts, in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeouts {
    #[serde(default = "default_registry_timeout")]
    pub registry_secs: u64,

    #[serde(default = "default_text_timeout")]
    pub text_secs: u64,

    #[serde(default = "default_image_timeout")]
    pub image_secs: u64,
}

impl Timeouts {
    pub fn registry(&self) -> Duration {
        Duration::from_secs(self.registry_secs)
    }

    pub fn text(&self) -> Duration {
        Duration::from_secs(self.text_secs)
    }

    pub fn image(&self) -> Duration {
        Duration::from_secs(self.image_secs)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            registry_secs: default_registry_timeout(),
            text_secs: default_text_timeout(),
            image_secs: default_image_timeout(),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

/// Badge image persistence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ImageStoreConfig {
    /// Return the image inline as a data URL
    #[default]
    Inline,

    /// Upload to an S3 bucket and return a link to the object
    S3 {
        bucket: String,
        #[serde(default = "default_s3_prefix")]
        prefix: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        region: Option<String>,
        /// Public URL under which uploaded objects are reachable
        public_base_url: String,
    },
}

fn default_registry_url() -> String {
    DEFAULT_REGISTRY_URL.to_string()
}

fn default_openai_url() -> String {
    DEFAULT_OPENAI_URL.to_string()
}

fn default_text_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_image_model() -> String {
    "gpt-image-1".to_string()
}

fn default_rate_limit() -> u32 {
    5
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_registry_timeout() -> u64 {
    15
}

fn default_text_timeout() -> u64 {
    60
}

fn default_image_timeout() -> u64 {
    180
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_s3_prefix() -> String {
    "badges".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            registry_url: default_registry_url(),
            openai_url: default_openai_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            timeouts: Timeouts::default(),
            rate_limit_per_second: default_rate_limit(),
            search_debounce_ms: default_debounce_ms(),
            server: ServerConfig::default(),
            image_store: ImageStoreConfig::default(),
        }
    }
}

impl Config {
    /// `~/.goodbadger/config.yaml`
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "No home directory for the default config path".to_string(),
        ))?;

        Ok(home.join(".goodbadger").join("config.yaml"))
    }

    /// Resolve an optional path override to a concrete path
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Parse the YAML file at `path`
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Load the effective runtime configuration.
    ///
    /// An explicit path must exist. Without one, a missing default file falls
    /// back to built-in defaults. Environment overrides are applied last.
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load_from(PathBuf::from(p))?,
            None => {
                let default = Self::default_path()?;
                if default.exists() {
                    Self::load_from(default)?
                } else {
                    log::debug!("No config file at {}, using defaults", default.display());
                    Self::default()
                }
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply environment-style overrides from a lookup function
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.openai_api_key = Some(key);
        }
        if let Some(url) = lookup("GOODBADGER_REGISTRY_URL") {
            self.registry_url = url;
        }
        if let Some(url) = lookup("GOODBADGER_OPENAI_URL") {
            self.openai_url = url;
        }
        if let Some(port) = lookup("GOODBADGER_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(e) => log::warn!("Ignoring invalid GOODBADGER_PORT {port:?}: {e}"),
            }
        }
    }

    /// Write the YAML file at `path`, owner-readable only on unix
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        // parent may not exist on first run
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(&path, contents)?;

        // The file holds an API key
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// Save configuration to an optional path override
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        self.save_to(Self::resolve_path(path)?)
    }

    /// Get the API key, failing if none is configured
    pub fn require_api_key(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingApiKey.into())
    }

    /// Validate values that would otherwise fail late at request time
    pub fn validate(&self) -> Result<()> {
        validate_url("registry_url", &self.registry_url)?;
        validate_url("openai_url", &self.openai_url)?;

        if self.rate_limit_per_second == 0 {
            return Err(ConfigError::Invalid(
                "rate_limit_per_second must be at least 1".to_string(),
            )
            .into());
        }

        let t = &self.timeouts;
        if t.registry_secs == 0 || t.text_secs == 0 || t.image_secs == 0 {
            return Err(ConfigError::Invalid("timeouts must be at least 1 second".to_string()).into());
        }

        if let ImageStoreConfig::S3 {
            bucket,
            public_base_url,
            ..
        } = &self.image_store
        {
            if bucket.trim().is_empty() {
                return Err(ConfigError::Invalid("image_store.bucket cannot be empty".to_string()).into());
            }
            validate_url("image_store.public_base_url", public_base_url)?;
        }

        Ok(())
    }
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::Invalid(format!("{field}: invalid URL {value:?}: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::Invalid(format!("{field}: unsupported URL scheme {scheme}")).into()),
    }
}
