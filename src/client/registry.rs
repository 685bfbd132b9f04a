//! Nonprofit registry client (ProPublica Nonprofit Explorer API v2)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;

use super::rate_limit::RequestLimiter;
use super::{DirectoryApi, Organization, OrganizationDetail, check_status};
use crate::config::DEFAULT_REGISTRY_URL;
use crate::error::{ApiError, Result};

/// Nonprofit registry API client
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: HttpClient,
    base_url: String,
    limiter: RequestLimiter,
}

impl RegistryClient {
    /// Create a client against the public registry
    pub fn new(timeout: Duration, per_second: u32) -> Result<Self> {
        Self::with_base_url(DEFAULT_REGISTRY_URL, timeout, per_second)
    }

    /// Create a client against a custom base URL (mirrors, tests)
    pub fn with_base_url(base_url: &str, timeout: Duration, per_second: u32) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            limiter: RequestLimiter::per_second(per_second),
        })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        self.limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, path);
        log::debug!("Registry GET {}", url);

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(ApiError::from)?;

        let response = check_status(response).await?;
        let data = response.json::<T>().await.map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse registry response: {}", e))
        })?;

        Ok(data)
    }
}

#[async_trait]
impl DirectoryApi for RegistryClient {
    async fn search(&self, query: &str) -> Result<Vec<Organization>> {
        #[derive(Deserialize)]
        struct SearchResponse {
            #[serde(default)]
            organizations: Vec<Organization>,
        }

        let response: SearchResponse = self.get_json("/search.json", &[("q", query)]).await?;
        Ok(response.organizations)
    }

    async fn organization(&self, ein: &str) -> Result<OrganizationDetail> {
        #[derive(Deserialize)]
        struct OrganizationResponse {
            organization: Option<OrganizationDetail>,
        }

        let path = format!("/organizations/{}.json", ein);
        let response: OrganizationResponse = self.get_json(&path, &[]).await?;

        match response.organization {
            Some(org) if !org.0.is_null() => Ok(org),
            _ => Err(ApiError::NotFound(format!("Organization {}", ein)).into()),
        }
    }
}
