//! Terminology service access: typed response records and the API seam the crawl runs against.

pub mod types;
pub mod uts;

pub use types::{RelationRecord, RelationsResponse, SearchHit, SearchResponse};
pub use uts::UtsClient;

use async_trait::async_trait;

use crate::Result;

/// The two calls the crawl needs from a terminology service.
///
/// Implementations report any non-success response as
/// [`UmlsGraphError::FetchFailed`](crate::UmlsGraphError::FetchFailed).
#[async_trait]
pub trait TerminologyApi {
    /// Free-text concept search.
    async fn search(&self, term: &str) -> Result<SearchResponse>;

    /// One page of typed relations for a concept URI.
    async fn relations(&self, uri: &str, page: u32) -> Result<RelationsResponse>;
}
