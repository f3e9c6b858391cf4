//! In-memory artifacts derived from a finished graph and its layout.
//!
//! Nothing here touches the file system; writing and bundling belong to the caller.

pub mod listing;
pub mod scene;

pub use listing::{parse_listing, render_listing};
pub use scene::{build_figure, render_html, render_html_with, Figure, SceneRenderer};

use crate::graph::RelationGraph;
use crate::layout::Layout;
use crate::Result;

/// Both export artifacts of one crawl.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    /// One `source --> target (Relation: label)` line per edge
    pub listing: String,
    /// Standalone interactive 3D scene
    pub scene_html: String,
}

pub fn export(graph: &RelationGraph, layout: &Layout) -> Result<Artifacts> {
    export_with(graph, layout, &SceneRenderer::default())
}

pub fn export_with(graph: &RelationGraph, layout: &Layout, renderer: &SceneRenderer) -> Result<Artifacts> {
    Ok(Artifacts {
        listing: render_listing(graph),
        scene_html: render_html_with(&build_figure(graph, layout), renderer)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutEngine;

    #[test]
    fn test_export_leaves_graph_untouched() {
        let mut graph = RelationGraph::new();
        graph.record_edge("A", "B", "RO()".into(), "u".into(), 0);
        let before = graph.triples();
        let layout = LayoutEngine::default().compute(&graph);

        let artifacts = export(&graph, &layout).unwrap();

        assert_eq!(graph.triples(), before);
        assert_eq!(artifacts.listing, "A --> B (Relation: RO())");
        assert!(artifacts.scene_html.contains("scatter3d"));
        assert!(!artifacts.scene_html.contains("<script src="));
    }
}
