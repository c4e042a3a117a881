//! Deduplicated set of contributor identifiers

use std::collections::HashSet;

/// Distinct contributor identifiers collected during one fetch.
///
/// Insert-only: there is no removal API, so the size never decreases.
#[derive(Debug, Clone, Default)]
pub struct ContributorSet {
    ids: HashSet<String>,
}

impl ContributorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identifier, returning `true` if it was not already present
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}
