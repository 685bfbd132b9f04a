//! Nonprofit directory operations
//!
//! Search fails closed: callers always get a list back, with an error note
//! when the registry could not be reached. Lookup distinguishes a missing
//! organization from an unavailable registry.

use serde::{Deserialize, Serialize};

use crate::client::{DirectoryApi, Organization, OrganizationDetail};
use crate::error::{InputError, Result};

/// Queries shorter than this never reach the registry
pub const MIN_QUERY_LEN: usize = 2;

/// Search result with an optional upstream failure note
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub organizations: Vec<Organization>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchOutcome {
    fn failed(message: &str) -> Self {
        Self {
            organizations: Vec::new(),
            error: Some(message.to_string()),
        }
    }
}

/// Search the registry by free text
pub async fn search(api: &dyn DirectoryApi, query: &str) -> SearchOutcome {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_LEN {
        return SearchOutcome::default();
    }

    match api.search(query).await {
        Ok(organizations) => {
            log::debug!("Search {:?} returned {} organizations", query, organizations.len());
            SearchOutcome {
                organizations,
                error: None,
            }
        }
        Err(e) => {
            log::error!("Search for {:?} failed: {}", query, e);
            SearchOutcome::failed("Search failed")
        }
    }
}

/// Look up one organization by EIN
pub async fn lookup(api: &dyn DirectoryApi, ein: &str) -> Result<OrganizationDetail> {
    let ein = ein.trim();
    if ein.is_empty() {
        return Err(InputError::Missing("EIN").into());
    }

    // Keeps the identifier from escaping the registry path
    if !ein.chars().all(|c| c.is_ascii_digit() || c == '-') {
        return Err(InputError::Invalid {
            field: "EIN",
            reason: "must contain only digits and dashes".to_string(),
        }
        .into());
    }

    let digits = ein.replace('-', "");
    if digits.is_empty() {
        return Err(InputError::Missing("EIN").into());
    }

    api.organization(&digits).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockDirectory;
    use crate::error::{ApiError, Error};

    fn directory() -> MockDirectory {
        MockDirectory::new().with_orgs(vec![
            Organization::new("530196605", "American Red Cross"),
            Organization::new("131623829", "Red Cross Society"),
            Organization::new("237069110", "Feeding America"),
        ])
    }

    #[tokio::test]
    async fn test_search_short_query_skips_upstream() {
        let api = directory();

        assert_eq!(search(&api, "").await, SearchOutcome::default());
        assert_eq!(search(&api, " r ").await, SearchOutcome::default());
        assert_eq!(api.call_counts().await.search, 0);
    }

    #[tokio::test]
    async fn test_search_returns_matches() {
        let api = directory();
        let outcome = search(&api, "red cross").await;

        assert_eq!(outcome.organizations.len(), 2);
        assert!(outcome.error.is_none());
    }

    #[tokio::test]
    async fn test_search_upstream_failure_fails_closed() {
        let api = directory().with_error(ApiError::Network("connection refused".to_string()));
        let outcome = search(&api, "feeding").await;

        assert!(outcome.organizations.is_empty());
        assert_eq!(outcome.error.as_deref(), Some("Search failed"));
    }

    #[tokio::test]
    async fn test_lookup_requires_ein() {
        let api = directory();
        let result = lookup(&api, "  ").await;

        assert!(matches!(result, Err(Error::Input(InputError::Missing("EIN")))));
        assert_eq!(api.call_counts().await.total(), 0);
    }

    #[tokio::test]
    async fn test_lookup_dashes_only_is_missing() {
        let api = directory();
        let result = lookup(&api, "---").await;

        assert!(matches!(result, Err(Error::Input(InputError::Missing("EIN")))));
        assert_eq!(api.call_counts().await.total(), 0);
    }

    #[tokio::test]
    async fn test_lookup_rejects_path_characters() {
        let api = directory();
        let result = lookup(&api, "../secrets").await;
        assert!(matches!(result, Err(Error::Input(InputError::Invalid { .. }))));
    }

    #[tokio::test]
    async fn test_lookup_accepts_dashed_ein() {
        let api = directory();
        let detail = lookup(&api, "53-0196605").await.unwrap();
        assert_eq!(detail.name(), Some("American Red Cross"));
    }

    #[tokio::test]
    async fn test_lookup_not_found_is_distinct() {
        let api = directory();
        let missing = lookup(&api, "999").await;
        assert!(matches!(missing, Err(Error::Api(ApiError::NotFound(_)))));

        let down = directory().with_error(ApiError::ServerError("boom".to_string()));
        let unavailable = lookup(&down, "530196605").await;
        assert!(matches!(unavailable, Err(Error::Api(ApiError::ServerError(_)))));
    }
}
