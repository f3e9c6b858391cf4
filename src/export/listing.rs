//! Human-readable relationship listing.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{Result, UmlsGraphError};
use crate::graph::RelationGraph;

fn line_regex() -> &'static Regex {
    static LINE: OnceLock<Regex> = OnceLock::new();
    LINE.get_or_init(|| Regex::new(r"^(.+?) --> (.+) \(Relation: (.*)\)$").expect("Invalid regex pattern"))
}

/// One line per edge in graph iteration order, joined with `\n`.
pub fn render_listing(graph: &RelationGraph) -> String {
    graph
        .edges()
        .iter()
        .map(|e| format!("{} --> {} (Relation: {})", e.source, e.target, e.data.label))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a listing back into `(source, target, label)` triples. Blank lines are skipped.
pub fn parse_listing(text: &str) -> Result<Vec<(String, String, String)>> {
    let mut triples = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let caps = line_regex().captures(line).ok_or_else(|| {
            UmlsGraphError::Parse(format!("line {}: not a relationship line: {}", lineno + 1, line))
        })?;
        triples.push((caps[1].to_string(), caps[2].to_string(), caps[3].to_string()));
    }
    Ok(triples)
}
