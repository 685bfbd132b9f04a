//! Upstream request and response types

use serde::{Deserialize, Deserializer, Serialize};

/// Nonprofit organization as returned by registry search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Registry identifier (EIN)
    #[serde(deserialize_with = "ein_from_any")]
    pub ein: String,

    /// Display name
    pub name: String,

    /// City (optional, not all records carry it)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// State (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Organization {
    pub fn new(ein: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ein: ein.into(),
            name: name.into(),
            city: None,
            state: None,
        }
    }
}

/// The registry sends EINs as bare integers; older records use strings.
fn ein_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Ein {
        Number(u64),
        Text(String),
    }

    Ok(match Ein::deserialize(deserializer)? {
        Ein::Number(n) => n.to_string(),
        Ein::Text(s) => s,
    })
}

/// Full organization record from a registry lookup.
///
/// The registry schema is large and loosely specified, so the record is kept
/// as raw JSON and passed through to callers untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationDetail(pub serde_json::Value);

impl OrganizationDetail {
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(|v| v.as_str())
    }

    pub fn ein(&self) -> Option<String> {
        match self.0.get("ein")? {
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn city(&self) -> Option<&str> {
        self.0.get("city").and_then(|v| v.as_str())
    }

    pub fn state(&self) -> Option<&str> {
        self.0.get("state").and_then(|v| v.as_str())
    }
}

/// Single-turn chat completion request
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

/// Image generation request
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub prompt: String,
    /// Square size such as `1024x1024`
    pub size: String,
}

/// Raw image payload from the generator. Either field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
