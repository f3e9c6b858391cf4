pub mod config;
pub mod error;
pub mod client;
pub mod graph;
pub mod crawl;
pub mod layout;
pub mod export;

pub use config::Config;
pub use error::{UmlsGraphError, Result};
pub use client::{TerminologyApi, UtsClient};
pub use crawl::{crawl_term, CrawlOptions, CrawlOutcome, CrawlReport, WhatlangFilter};
pub use graph::{RelationEdge, RelationGraph};
pub use layout::{Layout, LayoutEngine};
