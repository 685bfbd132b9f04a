//! Upstream API clients
//!
//! Two seams: [`DirectoryApi`] for the nonprofit registry and [`GenerativeApi`]
//! for text and image generation. Services depend only on the traits so tests
//! can swap in the mocks from [`mock`].

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use std::time::Duration;

use crate::error::{ApiError, Result};

#[cfg(test)]
pub mod mock;
pub mod models;
pub mod openai;
pub mod rate_limit;
pub mod registry;

pub use models::{
    ChatRequest, GeneratedImage, ImageRequest, Organization, OrganizationDetail,
};
pub use openai::OpenAiClient;
pub use registry::RegistryClient;

/// Nonprofit registry
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// Free-text search over organization names
    async fn search(&self, query: &str) -> Result<Vec<Organization>>;

    /// Fetch one organization by EIN
    async fn organization(&self, ein: &str) -> Result<OrganizationDetail>;
}

/// Generative text and image service
#[async_trait]
pub trait GenerativeApi: Send + Sync {
    /// Run a single chat completion and return the message text
    async fn chat(&self, request: &ChatRequest) -> Result<String>;

    /// Generate one image
    async fn generate_image(&self, request: &ImageRequest) -> Result<GeneratedImage>;
}

/// Map a non-success response onto the API error taxonomy.
///
/// Successful responses are handed back for the caller to decode.
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Unauthorized.into()),
        StatusCode::NOT_FOUND => {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Resource not found".to_string());
            Err(ApiError::NotFound(error_msg).into())
        }
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            Err(ApiError::RateLimit(Duration::from_secs(retry_after)).into())
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Bad request".to_string());
            Err(ApiError::BadRequest(error_msg).into())
        }
        status if status.is_server_error() => {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| format!("Server error: {}", status));
            Err(ApiError::ServerError(error_msg).into())
        }
        _ => {
            let error_msg = format!("Unexpected status code: {}", status);
            Err(ApiError::InvalidResponse(error_msg).into())
        }
    }
}
