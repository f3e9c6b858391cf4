//! Level-by-level breadth-first expansion with a depth bound.

use std::collections::{HashSet, VecDeque};

use crate::client::TerminologyApi;
use crate::crawl::fetcher::{FetchStats, RelationFetcher};
use crate::crawl::{FrontierEntry, LanguageFilter};
use crate::graph::RelationGraph;

/// Drives the crawl: one batch per depth level, each entity expanded at most once.
pub struct FrontierScheduler<'a, A, L> {
    fetcher: RelationFetcher<'a, A, L>,
    max_depth: usize,
    page: u32,
}

/// Result of a finished traversal.
#[derive(Debug)]
pub struct Traversal {
    pub graph: RelationGraph,
    /// Entity ids in expansion order
    pub expanded: Vec<String>,
    pub stats: FetchStats,
}

impl<'a, A: TerminologyApi, L: LanguageFilter> FrontierScheduler<'a, A, L> {
    pub fn new(api: &'a A, filter: &'a L, max_depth: usize) -> Self {
        Self {
            fetcher: RelationFetcher::new(api, filter),
            max_depth,
            page: 1,
        }
    }

    /// Relations page requested for every node (always a single page).
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Expand outward from `seed` until depth exceeds `max_depth`.
    ///
    /// Only the entries present at the start of a level are processed in that
    /// level; children discovered meanwhile wait for the next one. Re-enqueued
    /// entities are popped and skipped.
    pub async fn run(mut self, seed: FrontierEntry) -> Traversal {
        let mut graph = RelationGraph::new();
        let mut frontier = VecDeque::from([seed]);
        let mut expanded_ids: HashSet<String> = HashSet::new();
        let mut expanded = Vec::new();
        let mut depth = 0;

        while depth <= self.max_depth && !frontier.is_empty() {
            let batch = frontier.len();
            log::debug!("depth {}: {} frontier entries", depth, batch);

            for _ in 0..batch {
                let Some(entry) = frontier.pop_front() else {
                    break;
                };
                let entity_id = entry.entity_id();
                if expanded_ids.contains(entity_id) {
                    continue;
                }

                let children = self
                    .fetcher
                    .fetch(depth, &entry.name, &entry.uri, self.page, &mut graph)
                    .await;
                frontier.extend(children);
                expanded_ids.insert(entity_id.to_string());
                expanded.push(entity_id.to_string());
            }

            depth += 1;
        }

        Traversal {
            graph,
            expanded,
            stats: self.fetcher.stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::testing::{DenyListFilter, FakeApi};

    const C1: &str = "https://uts/CUI/C1";
    const C2: &str = "https://uts/CUI/C2";
    const C3: &str = "https://uts/CUI/C3";
    const C4: &str = "https://uts/CUI/C4";
    const C5: &str = "https://uts/CUI/C5";

    /// MI -> {ACS, Chest pain}; ACS -> {MI, Angina}; Chest pain -> ACS; Angina -> Ischemia.
    fn cardiac_world() -> FakeApi {
        FakeApi::new()
            .with_relation(C1, "Acute coronary syndrome", C2, "RO")
            .with_relation(C1, "Chest pain", C3, "RN")
            .with_relation(C2, "Myocardial infarction", C1, "RB")
            .with_relation(C2, "Angina", C4, "RO")
            .with_relation(C3, "Acute coronary syndrome", C2, "RO")
            .with_relation(C4, "Ischemia", C5, "RO")
    }

    fn seed() -> FrontierEntry {
        FrontierEntry::new("Myocardial infarction", C1)
    }

    async fn crawl(api: &FakeApi, max_depth: usize) -> Traversal {
        let filter = DenyListFilter::default();
        FrontierScheduler::new(api, &filter, max_depth).run(seed()).await
    }

    #[tokio::test]
    async fn test_depth_zero_expands_seed_once() {
        let api = cardiac_world();
        let traversal = crawl(&api, 0).await;
        assert_eq!(api.expanded_uris(), vec![C1.to_string()]);
        assert_eq!(traversal.expanded, vec!["C1".to_string()]);
        assert_eq!(traversal.graph.edge_count(), 2);
        assert!(traversal.graph.edges().iter().all(|e| e.source == "Myocardial infarction"));
    }

    #[tokio::test]
    async fn test_levels_are_processed_in_fifo_batches() {
        let api = cardiac_world();
        let traversal = crawl(&api, 2).await;
        assert_eq!(api.expanded_uris(), vec![C1, C2, C3, C4]);
        assert_eq!(traversal.graph.edge("Angina", "Ischemia").unwrap().depth, 2);
        assert_eq!(traversal.graph.edge("Chest pain", "Acute coronary syndrome").unwrap().depth, 1);
    }

    #[tokio::test]
    async fn test_every_edge_within_depth_bound() {
        for max_depth in 0..5 {
            let api = cardiac_world();
            let traversal = crawl(&api, max_depth).await;
            assert!(
                traversal.graph.edges().iter().all(|e| e.data.depth <= max_depth),
                "edge beyond depth {}",
                max_depth
            );
        }
    }

    #[tokio::test]
    async fn test_each_entity_expanded_at_most_once() {
        let api = cardiac_world();
        let traversal = crawl(&api, 5).await;
        let calls = api.expanded_uris();
        let unique: HashSet<_> = calls.iter().collect();
        assert_eq!(calls.len(), unique.len());
        assert_eq!(calls, vec![C1, C2, C3, C4, C5]);
        assert_eq!(traversal.stats.calls, 5);
    }

    #[tokio::test]
    async fn test_node_reached_at_max_depth_is_expanded() {
        let api = cardiac_world();
        crawl(&api, 1).await;
        // C2 and C3 are first reached at depth 1 == max_depth
        assert_eq!(api.expanded_uris(), vec![C1, C2, C3]);
    }

    #[tokio::test]
    async fn test_expansion_keyed_by_entity_id_not_name() {
        // same concept id reached under two display names
        let api = FakeApi::new()
            .with_relation(C1, "Heart attack", C2, "SY")
            .with_relation(C1, "Cardiac infarction", "https://other/host/C2", "SY");
        crawl(&api, 3).await;
        assert_eq!(api.expanded_uris(), vec![C1, C2]);
    }

    #[tokio::test]
    async fn test_failed_node_does_not_stop_crawl() {
        let api = cardiac_world().failing_relations(C2);
        let traversal = crawl(&api, 2).await;
        assert_eq!(traversal.stats.failures, 1);
        assert!(traversal.graph.edge("Chest pain", "Acute coronary syndrome").is_some());
        assert!(!traversal.graph.contains_node("Angina"));
        // C2 still counts as expanded and is not retried
        assert_eq!(api.expanded_uris(), vec![C1, C2, C3]);
    }

    #[tokio::test]
    async fn test_page_number_is_forwarded() {
        let api = cardiac_world();
        let filter = DenyListFilter::default();
        FrontierScheduler::new(&api, &filter, 0)
            .with_page(1)
            .run(seed())
            .await;
        assert_eq!(api.relation_calls(), vec![(C1.to_string(), 1)]);
    }
}
