use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use umls_graph::config::DEPTH_RANGE;
use umls_graph::export::{self, Artifacts, SceneRenderer};
use umls_graph::{crawl_term, Config, CrawlOptions, LayoutEngine, UmlsGraphError, UtsClient, WhatlangFilter};

#[derive(Parser, Debug)]
#[command(name = "umls-graph")]
#[command(about = "Crawl the UMLS relation neighborhood of a term and export a 3D graph")]
struct Args {
    /// Term to search (defaults to crawl.default_term)
    #[arg(short, long)]
    term: Option<String>,

    /// Max depth for traversal, 1-5 (defaults to crawl.default_depth)
    #[arg(short, long)]
    depth: Option<usize>,

    /// Directory for relationships.txt, 3d_graph.html and crawl_report.json
    #[arg(short, long)]
    out_dir: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();

    let mut config = Config::load()?;
    if let Some(dir) = args.out_dir {
        config.output.dir = dir;
    }

    let max_depth = args.depth.unwrap_or(config.crawl.default_depth);
    if !DEPTH_RANGE.contains(&max_depth) {
        anyhow::bail!(
            "--depth must be between {} and {}",
            DEPTH_RANGE.start(),
            DEPTH_RANGE.end()
        );
    }
    let term = args.term.unwrap_or_else(|| config.crawl.default_term.clone());

    // Missing credentials stop everything before the first request
    let api_key = config.api_key()?;
    let client = UtsClient::from_config(&config.uts, api_key)?;
    let filter = WhatlangFilter::from_code(&config.uts.language)?;

    log::info!("Starting umls-graph v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Fetching relations of '{}' up to depth {}. This might take a few moments.", term, max_depth);

    let options = CrawlOptions {
        max_depth,
        page_number: config.crawl.page_number,
    };
    let outcome = match crawl_term(&client, &filter, &term, options).await {
        Ok(outcome) => outcome,
        Err(UmlsGraphError::TermNotFound(t)) => {
            eprintln!("Term '{}' not found.", t);
            std::process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };
    log::info!("Graph generation complete.");

    let layout = LayoutEngine::from(&config.layout).compute(&outcome.graph);
    let renderer = SceneRenderer::from_config(&config.output)?;
    let artifacts = export::export_with(&outcome.graph, &layout, &renderer)?;

    println!("Available Nodes and Their Relationships\n");
    println!("{}", artifacts.listing);

    write_artifacts(&config, &artifacts)?;

    let report_path = config.output.dir.join("crawl_report.json");
    std::fs::write(&report_path, serde_json::to_string_pretty(&outcome.report)?)
        .with_context(|| format!("Failed to write {}", report_path.display()))?;
    log::info!("Crawl report saved as {}", report_path.display());

    Ok(())
}

fn write_artifacts(config: &Config, artifacts: &Artifacts) -> Result<()> {
    ensure_dir(&config.output.dir)?;

    let listing_path = config.relationships_path();
    std::fs::write(&listing_path, &artifacts.listing)
        .with_context(|| format!("Failed to write {}", listing_path.display()))?;
    log::info!("Relationships saved as {}", listing_path.display());

    let scene_path = config.scene_path();
    std::fs::write(&scene_path, &artifacts.scene_html)
        .with_context(|| format!("Failed to write {}", scene_path.display()))?;
    log::info!("3D graph saved as {}", scene_path.display());

    Ok(())
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))
}
