use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

use super::RelationEdge;

/// Directed relation graph keyed by display name.
///
/// Two distinct concepts sharing a display name collapse into one node.
#[derive(Debug, Clone, Default)]
pub struct RelationGraph {
    graph: DiGraph<String, RelationEdge>,
    node_map: HashMap<String, NodeIndex>,
}

/// Borrowed view of one edge in iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeView<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub data: &'a RelationEdge,
}

impl RelationGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert the edge `source -> target`.
    ///
    /// Missing endpoints are added in order (source first). If the pair already
    /// has an edge, its metadata is overwritten and its position in iteration
    /// order is kept.
    pub fn record_edge(&mut self, source: &str, target: &str, label: String, uri: String, depth: usize) {
        let from = self.ensure_node(source);
        let to = self.ensure_node(target);
        self.graph.update_edge(from, to, RelationEdge { label, uri, depth });
    }

    fn ensure_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.node_map.insert(name.to_string(), idx);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    /// Node names in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.node_indices().map(move |idx| self.graph[idx].as_str())
    }

    /// Metadata of the edge `source -> target`, if recorded
    pub fn edge(&self, source: &str, target: &str) -> Option<&RelationEdge> {
        let from = *self.node_map.get(source)?;
        let to = *self.node_map.get(target)?;
        self.graph.find_edge(from, to).map(|e| &self.graph[e])
    }

    /// All edges, grouped by source in node order, each group in first-discovery order.
    pub fn edges(&self) -> Vec<EdgeView<'_>> {
        let mut out = Vec::with_capacity(self.graph.edge_count());
        for node in self.graph.node_indices() {
            let mut outgoing: Vec<_> = self.graph.edges_directed(node, Direction::Outgoing).collect();
            outgoing.sort_by_key(|e| e.id().index());
            for e in outgoing {
                out.push(EdgeView {
                    source: self.graph[e.source()].as_str(),
                    target: self.graph[e.target()].as_str(),
                    data: &self.graph[e.id()],
                });
            }
        }
        out
    }

    /// Minimum discovery depth over all edges touching `name`.
    ///
    /// `None` for unknown names and for nodes with no incident edge.
    pub fn min_depth(&self, name: &str) -> Option<usize> {
        let idx = *self.node_map.get(name)?;
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|e| e.weight().depth)
            .min()
    }

    /// Undirected adjacency as pairs of node positions (insertion order), self-loops dropped.
    pub(crate) fn index_pairs(&self) -> Vec<(usize, usize)> {
        self.graph
            .edge_references()
            .filter(|e| e.source() != e.target())
            .map(|e| (e.source().index(), e.target().index()))
            .collect()
    }

    /// `(source, target, label)` triples in edge iteration order
    pub fn triples(&self) -> Vec<(String, String, String)> {
        self.edges()
            .into_iter()
            .map(|e| (e.source.to_string(), e.target.to_string(), e.data.label.clone()))
            .collect()
    }

    /// Rebuild a graph from listing triples; URIs are unknown and depths are 0.
    pub fn from_triples<I>(triples: I) -> Self
    where
        I: IntoIterator<Item = (String, String, String)>,
    {
        let mut graph = Self::new();
        for (source, target, label) in triples {
            graph.record_edge(&source, &target, label, String::new(), 0);
        }
        graph
    }
}
