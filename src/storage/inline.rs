use async_trait::async_trait;

use super::{INLINE_PNG_PREFIX, ImageStore, StoredImage};
use crate::error::Result;

/// Keeps images in the response as `data:` URLs
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineStore;

#[async_trait]
impl ImageStore for InlineStore {
    async fn store(&self, _title: &str, png_base64: &str) -> Result<StoredImage> {
        Ok(StoredImage {
            reference: format!("{}{}", INLINE_PNG_PREFIX, png_base64),
            key: None,
        })
    }
}
