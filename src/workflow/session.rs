//! Ephemeral storage for one workflow run

use serde::{Deserialize, Serialize};

use crate::services::Palette;

/// Everything needed to show a finished badge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeArtifact {
    pub title: String,
    pub image_reference: String,
    pub palette: Palette,
    /// Page markup with image and title slots still unbound
    pub page_markup: String,
}

/// Per-run key/value store mirroring the fields of a [`BadgeArtifact`].
///
/// Fields are individually optional so a store can be populated from the
/// outside (for example when loading a saved session), but
/// [`SessionStore::artifact`] only ever returns a complete artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    palette: Option<Palette>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    page_markup: Option<String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored artifact in one step
    pub fn commit(&mut self, artifact: BadgeArtifact) {
        self.title = Some(artifact.title);
        self.image_reference = Some(artifact.image_reference);
        self.palette = Some(artifact.palette);
        self.page_markup = Some(artifact.page_markup);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn set_image_reference(&mut self, reference: impl Into<String>) {
        self.image_reference = Some(reference.into());
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = Some(palette);
    }

    pub fn set_page_markup(&mut self, markup: impl Into<String>) {
        self.page_markup = Some(markup.into());
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The stored artifact, only if every field is present and non-empty
    pub fn artifact(&self) -> Option<BadgeArtifact> {
        let present = |s: &Option<String>| s.as_deref().filter(|v| !v.trim().is_empty()).map(str::to_string);

        Some(BadgeArtifact {
            title: present(&self.title)?,
            image_reference: present(&self.image_reference)?,
            palette: self.palette.clone()?,
            page_markup: present(&self.page_markup)?,
        })
    }
}
