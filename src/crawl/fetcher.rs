//! Single-page relation retrieval with language filtering.

use serde::Serialize;

use crate::client::{RelationRecord, TerminologyApi};
use crate::crawl::{FrontierEntry, LanguageFilter};
use crate::graph::RelationGraph;

/// Counters accumulated across every fetch of one crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FetchStats {
    /// Relations pages requested
    pub calls: usize,
    /// Pages that failed and contributed no children
    pub failures: usize,
    /// Records dropped by the language check or for missing fields
    pub dropped: usize,
}

/// Fetches relation pages and records surviving relations as graph edges.
pub struct RelationFetcher<'a, A, L> {
    api: &'a A,
    filter: &'a L,
    stats: FetchStats,
}

impl<'a, A: TerminologyApi, L: LanguageFilter> RelationFetcher<'a, A, L> {
    pub fn new(api: &'a A, filter: &'a L) -> Self {
        Self {
            api,
            filter,
            stats: FetchStats::default(),
        }
    }

    pub fn stats(&self) -> FetchStats {
        self.stats
    }

    /// Fetch one relations page of `uri` and record an edge `name -> related` per kept record.
    ///
    /// Returns the related concepts to enqueue. A failed call yields no children.
    pub async fn fetch(
        &mut self,
        depth: usize,
        name: &str,
        uri: &str,
        page: u32,
        graph: &mut RelationGraph,
    ) -> Vec<FrontierEntry> {
        self.stats.calls += 1;

        let response = match self.api.relations(uri, page).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Failed to fetch relations of '{}': {}", name, e);
                self.stats.failures += 1;
                return Vec::new();
            }
        };

        let mut children = Vec::new();
        for record in response.result {
            match self.accept(&record) {
                Some(child) => {
                    graph.record_edge(name, &child.name, record.edge_label(), child.uri.clone(), depth);
                    children.push(child);
                }
                None => self.stats.dropped += 1,
            }
        }

        log::debug!(
            "depth {}: '{}' yielded {} related concepts",
            depth,
            name,
            children.len()
        );
        children
    }

    /// The related concept of `record`, if it has a name and URI and passes the language check.
    fn accept(&self, record: &RelationRecord) -> Option<FrontierEntry> {
        let related_name = record.related_id_name.as_deref()?;
        let related_uri = record.related_id.as_deref().filter(|u| !u.is_empty())?;

        match self.filter.is_target(related_name) {
            Ok(true) => Some(FrontierEntry::new(related_name, related_uri)),
            Ok(false) => {
                log::debug!("Dropping non-target-language relation '{}'", related_name);
                None
            }
            Err(e) => {
                log::debug!("Dropping relation '{}': {}", related_name, e);
                None
            }
        }
    }
}
