//! Badge illustration generation

use serde::Serialize;

use crate::client::{GenerativeApi, ImageRequest};
use crate::error::{ApiError, InputError, Result};
use crate::storage::{INLINE_PNG_PREFIX, ImageStore};

/// Square size requested from the image model
pub const BADGE_SIZE: &str = "1024x1024";

/// A generated badge image, ready to place in a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeImage {
    /// URL or `data:` URL of the image
    pub image_reference: String,

    /// Object key, only when the image was uploaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_key: Option<String>,
}

impl BadgeImage {
    /// Base64 PNG carried inside an inline `data:` reference
    pub fn inline_payload(&self) -> Option<&str> {
        self.image_reference.strip_prefix(INLINE_PNG_PREFIX)
    }
}

/// Fixed-style prompt with the title embedded verbatim
pub fn badge_prompt(title: &str) -> String {
    format!(
        "Create a circular badge illustration with:\n\
         - colorful, fun style\n\
         - NO text anywhere\n\
         This badge represents the honorary title: \"{}\"",
        title
    )
}

/// Generate a badge image for `title` and hand it to `store`
pub async fn generate_badge(
    api: &dyn GenerativeApi,
    store: &dyn ImageStore,
    title: &str,
) -> Result<BadgeImage> {
    let title = title.trim();
    if title.is_empty() {
        return Err(InputError::Missing("title").into());
    }

    let request = ImageRequest {
        prompt: badge_prompt(title),
        size: BADGE_SIZE.to_string(),
    };

    let image = api.generate_image(&request).await?;

    if let Some(b64) = image.b64_json.filter(|b| !b.trim().is_empty()) {
        let stored = store.store(title, &b64).await?;
        return Ok(BadgeImage {
            image_reference: stored.reference,
            object_key: stored.key,
        });
    }

    // Some models answer with a hosted URL instead of a payload
    if let Some(url) = image.url.filter(|u| !u.trim().is_empty()) {
        log::debug!("Image model returned a URL; passing it through");
        return Ok(BadgeImage {
            image_reference: url,
            object_key: None,
        });
    }

    Err(ApiError::NoImage.into())
}
