//! Bounded, de-duplicated nonprofit selection

use thiserror::Error;

use crate::client::Organization;

/// Maximum nonprofits on one badge
pub const MAX_SELECTED: usize = 5;

/// Why an organization could not be added
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("You can select up to {MAX_SELECTED} nonprofits that you support.")]
    Full,

    #[error("Already selected.")]
    Duplicate,
}

/// Ordered set of chosen organizations, unique by EIN
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    items: Vec<Organization>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an organization; the set is unchanged on error
    pub fn add(&mut self, org: Organization) -> Result<(), SelectionError> {
        if self.items.len() >= MAX_SELECTED {
            return Err(SelectionError::Full);
        }
        if self.contains(&org.ein) {
            return Err(SelectionError::Duplicate);
        }
        self.items.push(org);
        Ok(())
    }

    /// Remove by EIN, returning whether anything was removed
    pub fn remove(&mut self, ein: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|o| o.ein != ein);
        self.items.len() != before
    }

    pub fn contains(&self, ein: &str) -> bool {
        self.items.iter().any(|o| o.ein == ein)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= MAX_SELECTED
    }

    pub fn iter(&self) -> impl Iterator<Item = &Organization> {
        self.items.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.items.iter().map(|o| o.name.clone()).collect()
    }
}
