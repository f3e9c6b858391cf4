//! Relation graph: a directed graph keyed by concept display name.
//!
//! Accumulates one edge per ordered (source, target) pair while a crawl runs;
//! read-only for layout and export afterwards.

mod store;

pub use store::{EdgeView, RelationGraph};

use serde::{Deserialize, Serialize};

/// Metadata carried by a single relation edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEdge {
    /// Relation label with its parenthesized qualifier, e.g. `RO(has_finding_site)`.
    pub label: String,
    /// URI of the target concept.
    pub uri: String,
    /// BFS level at which the edge was discovered (0 at the seed).
    pub depth: usize,
}
