//! Free-text term resolution to a canonical (name, URI) seed.

use crate::client::TerminologyApi;
use crate::crawl::FrontierEntry;
use crate::error::{Result, UmlsGraphError};

/// Resolves a free-text term through the search endpoint.
pub struct TermResolver<'a, A> {
    api: &'a A,
}

impl<'a, A: TerminologyApi> TermResolver<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Canonical name and URI of the first ranked hit for `term`.
    ///
    /// Returns [`UmlsGraphError::TermNotFound`] when the search fails, returns
    /// no results, or the first hit lacks a name or URI.
    pub async fn resolve(&self, term: &str) -> Result<FrontierEntry> {
        let term = term.trim();
        if term.is_empty() {
            return Err(UmlsGraphError::InvalidInput("Search term cannot be empty".to_string()));
        }

        let response = match self.api.search(term).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Search for '{}' failed: {}", term, e);
                return Err(UmlsGraphError::TermNotFound(term.to_string()));
            }
        };

        let hit = response.first_hit().and_then(|hit| {
            let name = hit.name.as_deref().filter(|n| !n.is_empty())?;
            let uri = hit.uri.as_deref().filter(|u| !u.is_empty())?;
            Some(FrontierEntry::new(name, uri))
        });

        match hit {
            Some(seed) => {
                log::info!("Resolved '{}' to '{}' ({})", term, seed.name, seed.uri);
                Ok(seed)
            }
            None => {
                log::warn!("Term '{}' not found.", term);
                Err(UmlsGraphError::TermNotFound(term.to_string()))
            }
        }
    }
}
