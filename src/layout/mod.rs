//! Deterministic 3D force-directed layout of a relation graph.

mod spring;

pub use spring::spring_layout_3d;

use serde::Serialize;
use std::collections::HashMap;

use crate::config::LayoutConfig;
use crate::graph::RelationGraph;

/// A point in the 3D scene.
pub type Point3 = [f64; 3];

/// Coordinates and depth-color values per node, in graph node order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    names: Vec<String>,
    positions: Vec<Point3>,
    depths: Vec<usize>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Layout {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<Point3> {
        self.index.get(name).map(|&i| self.positions[i])
    }

    pub fn depth(&self, name: &str) -> Option<usize> {
        self.index.get(name).map(|&i| self.depths[i])
    }

    /// `(name, position, depth)` in node order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Point3, usize)> + '_ {
        self.names
            .iter()
            .zip(&self.positions)
            .zip(&self.depths)
            .map(|((name, pos), depth)| (name.as_str(), *pos, *depth))
    }
}

/// Minimum incident-edge depth of every node, 0 for a node without edges.
pub fn node_depths(graph: &RelationGraph) -> Vec<usize> {
    graph
        .nodes()
        .map(|name| graph.min_depth(name).unwrap_or(0))
        .collect()
}

/// Seeded spring layout; the same graph and seed always produce the same layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEngine {
    pub seed: u64,
    pub iterations: usize,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self {
            seed: 42,
            iterations: 50,
        }
    }
}

impl From<&LayoutConfig> for LayoutEngine {
    fn from(config: &LayoutConfig) -> Self {
        Self {
            seed: config.seed,
            iterations: config.iterations,
        }
    }
}

impl LayoutEngine {
    pub fn compute(&self, graph: &RelationGraph) -> Layout {
        let names: Vec<String> = graph.nodes().map(str::to_string).collect();
        let positions = spring_layout_3d(names.len(), &graph.index_pairs(), self.seed, self.iterations);
        let depths = node_depths(graph);
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        log::debug!("Laid out {} nodes (seed {})", names.len(), self.seed);

        Layout {
            names,
            positions,
            depths,
            index,
        }
    }
}
