//! Re-render a saved relationships listing as a fresh 3D scene.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use umls_graph::export::{build_figure, parse_listing, render_html_with, SceneRenderer};
use umls_graph::{Config, LayoutEngine, RelationGraph};

#[derive(Parser, Debug)]
#[command(name = "relayout")]
#[command(about = "Rebuild 3d_graph.html from a relationships listing")]
struct Args {
    /// Relationships listing written by umls-graph
    #[arg(default_value = "relationships.txt")]
    input: PathBuf,

    /// Output HTML path (defaults to the configured scene file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Layout seed (defaults to layout.seed)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = Config::load()?;

    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let graph = RelationGraph::from_triples(parse_listing(&text)?);
    log::info!(
        "Loaded {} nodes and {} edges from {}",
        graph.node_count(),
        graph.edge_count(),
        args.input.display()
    );

    let mut engine = LayoutEngine::from(&config.layout);
    if let Some(seed) = args.seed {
        engine.seed = seed;
    }
    // depths are not part of the listing, so every node renders at depth 0
    let layout = engine.compute(&graph);
    let renderer = SceneRenderer::from_config(&config.output)?;
    let html = render_html_with(&build_figure(&graph, &layout), &renderer)?;

    let output = args.output.unwrap_or_else(|| config.scene_path());
    std::fs::write(&output, html).with_context(|| format!("Failed to write {}", output.display()))?;
    log::info!("3D graph saved as {}", output.display());

    Ok(())
}
