//! Badge image persistence
//!
//! Generated images are either handed back inline as a data URL or uploaded
//! to object storage, in which case only a link to the object is returned.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::config::{Config, ImageStoreConfig};
use crate::error::Result;
#[cfg(not(feature = "s3"))]
use crate::error::ConfigError;

mod inline;
#[cfg(feature = "s3")]
mod s3;

pub use inline::InlineStore;
#[cfg(feature = "s3")]
pub use s3::S3Store;

/// Where a stored image can be found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// URL usable as an `<img src>`
    pub reference: String,

    /// Object key, when the image was uploaded
    pub key: Option<String>,
}

/// Prefix of references produced by [`InlineStore`]
pub const INLINE_PNG_PREFIX: &str = "data:image/png;base64,";

/// Storage backend for generated badge images
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist a base64-encoded PNG generated for `title`
    async fn store(&self, title: &str, png_base64: &str) -> Result<StoredImage>;
}

/// Build the configured image store
pub async fn from_config(config: &Config) -> Result<Arc<dyn ImageStore>> {
    match &config.image_store {
        ImageStoreConfig::Inline => Ok(Arc::new(InlineStore)),

        #[cfg(feature = "s3")]
        ImageStoreConfig::S3 {
            bucket,
            prefix,
            region,
            public_base_url,
        } => {
            let store = S3Store::connect(
                bucket.clone(),
                prefix.clone(),
                region.clone(),
                public_base_url.clone(),
            )
            .await;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "s3"))]
        ImageStoreConfig::S3 { .. } => Err(ConfigError::Invalid(
            "image_store kind `s3` requires building with the `s3` feature".to_string(),
        )
        .into()),
    }
}

/// Lowercase the title and collapse every non-alphanumeric run into one `-`
pub fn sanitize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_separator = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('-');
            }
            pending_separator = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    if out.is_empty() {
        "badge".to_string()
    } else {
        out
    }
}

/// Derive the object key for a badge image.
///
/// A pure function of its inputs so uploads can be traced back to a run.
pub fn object_key(prefix: &str, timestamp: DateTime<Utc>, title: &str) -> String {
    let stamp = timestamp.format("%Y%m%dT%H%M%S%3fZ");
    let name = format!("{}-{}.png", stamp, sanitize_title(title));

    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        name
    } else {
        format!("{}/{}", prefix, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Champion of Kindness"), "champion-of-kindness");
        assert_eq!(sanitize_title("  Hope's -- Keeper!! "), "hope-s-keeper");
        assert_eq!(sanitize_title("Café Hero"), "caf-hero");
        assert_eq!(sanitize_title("!!!"), "badge");
        assert_eq!(sanitize_title(""), "badge");
    }

    #[test]
    fn test_object_key_is_deterministic() {
        let ts = Utc.with_ymd_and_hms(2025, 11, 14, 9, 30, 5).unwrap();

        let key = object_key("badges", ts, "Guardian of Giving");
        assert_eq!(key, "badges/20251114T093005000Z-guardian-of-giving.png");
        assert_eq!(key, object_key("badges", ts, "Guardian of Giving"));
    }

    #[test]
    fn test_object_key_prefix_handling() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();

        assert_eq!(object_key("", ts, "A"), "20250102T030405000Z-a.png");
        assert_eq!(object_key("/out/", ts, "A"), "out/20250102T030405000Z-a.png");
    }

    #[tokio::test]
    async fn test_from_config_inline() {
        let store = from_config(&Config::default()).await.unwrap();
        let stored = store.store("Title", "aGVsbG8=").await.unwrap();
        assert!(stored.reference.starts_with("data:image/png;base64,"));
    }

    #[cfg(not(feature = "s3"))]
    #[tokio::test]
    async fn test_from_config_s3_without_feature() {
        let config = Config {
            image_store: ImageStoreConfig::S3 {
                bucket: "bucket".to_string(),
                prefix: "badges".to_string(),
                region: None,
                public_base_url: "https://cdn.example.com".to_string(),
            },
            ..Config::default()
        };

        assert!(from_config(&config).await.is_err());
    }
}
