//! Mock upstream clients for testing
//!
//! Provide canned responses through builder methods, then hand the mock to
//! any service that takes a `&dyn DirectoryApi` or `&dyn GenerativeApi`.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{
    ChatRequest, DirectoryApi, GenerativeApi, GeneratedImage, ImageRequest, Organization,
    OrganizationDetail,
};
use crate::error::{ApiError, Result};

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub search: usize,
    pub organization: usize,
    pub chat: usize,
    pub generate_image: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.search + self.organization + self.chat + self.generate_image
    }
}

/// Mock nonprofit registry
#[derive(Default, Clone)]
pub struct MockDirectory {
    orgs: Arc<Mutex<Vec<Organization>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    call_count: Arc<Mutex<CallCounts>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orgs(self, orgs: Vec<Organization>) -> Self {
        *self.orgs.try_lock().expect("fresh mock") = orgs;
        self
    }

    pub fn with_error(self, error: ApiError) -> Self {
        *self.error.try_lock().expect("fresh mock") = Some(error);
        self
    }

    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    async fn take_error(&self) -> Option<ApiError> {
        self.error.lock().await.take()
    }
}

#[async_trait]
impl DirectoryApi for MockDirectory {
    async fn search(&self, query: &str) -> Result<Vec<Organization>> {
        self.call_count.lock().await.search += 1;
        if let Some(err) = self.take_error().await {
            return Err(err.into());
        }

        let needle = query.to_lowercase();
        Ok(self
            .orgs
            .lock()
            .await
            .iter()
            .filter(|o| o.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn organization(&self, ein: &str) -> Result<OrganizationDetail> {
        self.call_count.lock().await.organization += 1;
        if let Some(err) = self.take_error().await {
            return Err(err.into());
        }

        self.orgs
            .lock()
            .await
            .iter()
            .find(|o| o.ein == ein)
            .map(|o| OrganizationDetail(serde_json::json!({ "ein": o.ein, "name": o.name })))
            .ok_or_else(|| ApiError::NotFound(format!("Organization {}", ein)).into())
    }
}

/// Mock generative service.
///
/// Chat replies are served in order; image payloads likewise.
#[derive(Default, Clone)]
pub struct MockGenerator {
    chat_replies: Arc<Mutex<VecDeque<String>>>,
    images: Arc<Mutex<VecDeque<GeneratedImage>>>,
    error: Arc<Mutex<Option<ApiError>>>,
    call_count: Arc<Mutex<CallCounts>>,
    /// Captured requests for test assertions
    chat_requests: Arc<Mutex<Vec<ChatRequest>>>,
    image_requests: Arc<Mutex<Vec<ImageRequest>>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chat_reply(self, reply: impl Into<String>) -> Self {
        self.chat_replies
            .try_lock()
            .expect("fresh mock")
            .push_back(reply.into());
        self
    }

    pub fn with_image(self, image: GeneratedImage) -> Self {
        self.images.try_lock().expect("fresh mock").push_back(image);
        self
    }

    pub fn with_error(self, error: ApiError) -> Self {
        *self.error.try_lock().expect("fresh mock") = Some(error);
        self
    }

    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    pub async fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_requests.lock().await.clone()
    }

    pub async fn image_requests(&self) -> Vec<ImageRequest> {
        self.image_requests.lock().await.clone()
    }
}

#[async_trait]
impl GenerativeApi for MockGenerator {
    async fn chat(&self, request: &ChatRequest) -> Result<String> {
        self.call_count.lock().await.chat += 1;
        self.chat_requests.lock().await.push(request.clone());
        if let Some(err) = self.error.lock().await.take() {
            return Err(err.into());
        }

        Ok(self.chat_replies.lock().await.pop_front().unwrap_or_default())
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<GeneratedImage> {
        self.call_count.lock().await.generate_image += 1;
        self.image_requests.lock().await.push(request.clone());
        if let Some(err) = self.error.lock().await.take() {
            return Err(err.into());
        }

        Ok(self.images.lock().await.pop_front().unwrap_or_default())
    }
}
