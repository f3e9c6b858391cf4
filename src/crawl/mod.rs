//! Bounded breadth-first crawl of a concept's relation neighborhood.
//!
//! [`crawl_term`] resolves the seed term, then expands level by level up to
//! the requested depth. Per-node failures shrink the graph instead of aborting.

pub mod fetcher;
pub mod language;
pub mod resolver;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;

pub use fetcher::{FetchStats, RelationFetcher};
pub use language::{LanguageFilter, WhatlangFilter};
pub use resolver::TermResolver;
pub use scheduler::{FrontierScheduler, Traversal};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::TerminologyApi;
use crate::graph::RelationGraph;
use crate::Result;

/// A concept awaiting expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontierEntry {
    pub name: String,
    pub uri: String,
}

impl FrontierEntry {
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
        }
    }

    /// Entity identifier: the last path segment of the URI.
    pub fn entity_id(&self) -> &str {
        entity_id(&self.uri)
    }
}

/// Last `/`-separated segment of a concept URI (empty for a trailing slash).
pub fn entity_id(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}

/// Per-run crawl parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlOptions {
    /// Inclusive depth bound; 0 expands only the seed.
    pub max_depth: usize,
    pub page_number: u32,
}

impl CrawlOptions {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            page_number: 1,
        }
    }
}

/// Summary of one crawl invocation.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub run_id: Uuid,
    pub term: String,
    pub seed: FrontierEntry,
    pub max_depth: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub expanded: usize,
    pub fetch_calls: usize,
    pub fetch_failures: usize,
    pub dropped_records: usize,
    pub nodes: usize,
    pub edges: usize,
}

/// The resolved seed, the finished graph and its report.
#[derive(Debug)]
pub struct CrawlOutcome {
    pub seed: FrontierEntry,
    pub graph: RelationGraph,
    pub report: CrawlReport,
}

/// Resolve `term` and crawl its relations up to `options.max_depth`.
///
/// Fails only when the seed cannot be resolved; no relations are fetched then.
pub async fn crawl_term<A, L>(api: &A, filter: &L, term: &str, options: CrawlOptions) -> Result<CrawlOutcome>
where
    A: TerminologyApi,
    L: LanguageFilter,
{
    let started_at = Utc::now();
    let run_id = Uuid::new_v4();

    let seed = TermResolver::new(api).resolve(term).await?;

    let traversal = FrontierScheduler::new(api, filter, options.max_depth)
        .with_page(options.page_number)
        .run(seed.clone())
        .await;

    let report = CrawlReport {
        run_id,
        term: term.to_string(),
        seed: seed.clone(),
        max_depth: options.max_depth,
        started_at,
        finished_at: Utc::now(),
        expanded: traversal.expanded.len(),
        fetch_calls: traversal.stats.calls,
        fetch_failures: traversal.stats.failures,
        dropped_records: traversal.stats.dropped,
        nodes: traversal.graph.node_count(),
        edges: traversal.graph.edge_count(),
    };

    log::info!(
        "Crawl {} of '{}' complete: {} nodes, {} edges, {} expanded, {} failed fetches, {} dropped records",
        report.run_id,
        report.seed.name,
        report.nodes,
        report.edges,
        report.expanded,
        report.fetch_failures,
        report.dropped_records
    );

    Ok(CrawlOutcome {
        seed,
        graph: traversal.graph,
        report,
    })
}
