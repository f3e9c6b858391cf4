//! Response shapes of the search and relations endpoints.
//!
//! Every field is optional on the wire; callers decide what a missing field means.

use serde::{Deserialize, Serialize};

/// `{"result": {"results": [...]}}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub result: SearchResult,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

/// One ranked search hit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

impl SearchResponse {
    /// First ranked hit, if the service returned any.
    pub fn first_hit(&self) -> Option<&SearchHit> {
        self.result.results.first()
    }
}

/// `{"result": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationsResponse {
    #[serde(default)]
    pub result: Vec<RelationRecord>,
}

/// One typed relation from the concept being expanded to a related concept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationRecord {
    #[serde(default)]
    pub related_id_name: Option<String>,
    #[serde(default)]
    pub relation_label: Option<String>,
    #[serde(default)]
    pub additional_relation_label: Option<String>,
    #[serde(default)]
    pub related_id: Option<String>,
}

impl RelationRecord {
    /// Edge label: relation label followed by the parenthesized qualifying label.
    pub fn edge_label(&self) -> String {
        format!(
            "{}({})",
            self.relation_label.as_deref().unwrap_or_default(),
            self.additional_relation_label.as_deref().unwrap_or_default()
        )
    }
}
