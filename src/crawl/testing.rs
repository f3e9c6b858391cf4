//! In-memory terminology service and language filter for crawl tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::client::{RelationRecord, RelationsResponse, SearchHit, SearchResponse, TerminologyApi};
use crate::crawl::LanguageFilter;
use crate::error::{Result, UmlsGraphError};

/// Canned search hits and relation pages; records every call it receives.
#[derive(Default)]
pub struct FakeApi {
    hits: Vec<SearchHit>,
    search_fails: bool,
    relations: HashMap<String, Vec<RelationRecord>>,
    failing: HashSet<String>,
    search_calls: Mutex<Vec<String>>,
    relation_calls: Mutex<Vec<(String, u32)>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_hit(mut self, name: &str, uri: &str) -> Self {
        self.hits.push(SearchHit {
            name: Some(name.to_string()),
            uri: Some(uri.to_string()),
        });
        self
    }

    pub fn failing_search(mut self) -> Self {
        self.search_fails = true;
        self
    }

    /// Add one related concept to the page served for `uri`.
    pub fn with_relation(mut self, uri: &str, related_name: &str, related_uri: &str, label: &str) -> Self {
        self.relations.entry(uri.to_string()).or_default().push(RelationRecord {
            related_id_name: Some(related_name.to_string()),
            relation_label: Some(label.to_string()),
            additional_relation_label: Some(String::new()),
            related_id: Some(related_uri.to_string()),
        });
        self
    }

    pub fn with_record(mut self, uri: &str, record: RelationRecord) -> Self {
        self.relations.entry(uri.to_string()).or_default().push(record);
        self
    }

    /// Serve an error status for the relations page of `uri`.
    pub fn failing_relations(mut self, uri: &str) -> Self {
        self.failing.insert(uri.to_string());
        self
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    pub fn relation_calls(&self) -> Vec<(String, u32)> {
        self.relation_calls.lock().unwrap().clone()
    }

    /// URIs passed to `relations`, in call order
    pub fn expanded_uris(&self) -> Vec<String> {
        self.relation_calls().into_iter().map(|(uri, _)| uri).collect()
    }
}

#[async_trait]
impl TerminologyApi for FakeApi {
    async fn search(&self, term: &str) -> Result<SearchResponse> {
        self.search_calls.lock().unwrap().push(term.to_string());
        if self.search_fails {
            return Err(UmlsGraphError::FetchFailed("Response code: 500".to_string()));
        }
        let mut response = SearchResponse::default();
        response.result.results = self.hits.clone();
        Ok(response)
    }

    async fn relations(&self, uri: &str, page: u32) -> Result<RelationsResponse> {
        self.relation_calls.lock().unwrap().push((uri.to_string(), page));
        if self.failing.contains(uri) {
            return Err(UmlsGraphError::FetchFailed("Response code: 404".to_string()));
        }
        Ok(RelationsResponse {
            result: self.relations.get(uri).cloned().unwrap_or_default(),
        })
    }
}

/// Accepts every name except those listed; blank names fail the check.
#[derive(Default)]
pub struct DenyListFilter {
    foreign: HashSet<String>,
}

impl DenyListFilter {
    pub fn new(foreign: &[&str]) -> Self {
        Self {
            foreign: foreign.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl LanguageFilter for DenyListFilter {
    fn is_target(&self, text: &str) -> Result<bool> {
        if text.trim().is_empty() {
            return Err(UmlsGraphError::LanguageCheckFailed("empty text".to_string()));
        }
        Ok(!self.foreign.contains(text))
    }
}
