//! Error types for Good Badger

use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything a command, route or workflow step can fail with
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Workflow(#[from] crate::workflow::WorkflowError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Prompt aborted: {0}")]
    Dialoguer(String),

    #[error("Could not encode or decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    Other(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// Failures talking to the nonprofit registry or the generative API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Upstream rejected the credentials. Check your API key.")]
    Unauthorized,

    #[error("Upstream record not found: {0}")]
    NotFound(String),

    #[error("Upstream is throttling requests, retry in {0:?}")]
    RateLimit(Duration),

    #[error("Upstream refused the request: {0}")]
    BadRequest(String),

    #[error("Upstream failure: {0}")]
    ServerError(String),

    #[error("Could not reach upstream: {0}")]
    Network(String),

    #[error("Unexpected upstream reply: {0}")]
    InvalidResponse(String),

    #[error("No image data returned from image generation")]
    NoImage,
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "connection refused or unreachable".to_string()
        } else {
            err.to_string()
        };
        ApiError::Network(reason)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No configuration file. Run `goodbadger init` first.")]
    NotFound,

    #[error("Configuration is not valid YAML: {0}")]
    ParseError(String),

    #[error("Configuration rejected: {0}")]
    Invalid(String),

    #[error("Could not write configuration: {0}")]
    SaveError(String),

    #[error("OpenAI API key not configured. Set OPENAI_API_KEY or run `goodbadger init`.")]
    MissingApiKey,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Caller input rejected before any upstream call is made
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Missing {0}")]
    Missing(&'static str),

    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_points_at_key() {
        assert!(ApiError::Unauthorized.to_string().contains("API key"));
    }

    #[test]
    fn test_not_found_keeps_detail() {
        let shown = ApiError::NotFound("Organization 12-345".to_string()).to_string();
        assert!(shown.contains("not found"));
        assert!(shown.contains("12-345"));
    }

    #[test]
    fn test_throttle_shows_delay() {
        let shown = ApiError::RateLimit(Duration::from_secs(45)).to_string();
        assert!(shown.contains("45s"));
    }

    #[test]
    fn test_input_messages() {
        assert_eq!(InputError::Missing("title").to_string(), "Missing title");

        let invalid = InputError::Invalid {
            field: "color",
            reason: "not a hex value".to_string(),
        };
        assert_eq!(invalid.to_string(), "Invalid color: not a hex value");
    }

    #[test]
    fn test_missing_key_names_env_var() {
        assert!(
            ConfigError::MissingApiKey
                .to_string()
                .contains("OPENAI_API_KEY")
        );
    }

    #[test]
    fn test_conversions_into_top_level() {
        let api: Error = ApiError::NoImage.into();
        assert!(matches!(api, Error::Api(ApiError::NoImage)));

        let input: Error = InputError::Missing("names").into();
        assert!(matches!(input, Error::Input(InputError::Missing("names"))));

        let other = Error::Other("search failed".to_string());
        assert_eq!(other.to_string(), "search failed");
    }

    #[test]
    fn test_bad_yaml_becomes_parse_error() {
        let err = serde_yaml::from_str::<serde_yaml::Value>("key: [unterminated").unwrap_err();
        assert!(matches!(ConfigError::from(err), ConfigError::ParseError(_)));
    }
}
