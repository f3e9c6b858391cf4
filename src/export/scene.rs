//! Interactive 3D scene in the Plotly figure format.

use serde::Serialize;

use crate::config::OutputConfig;
use crate::graph::RelationGraph;
use crate::layout::Layout;
use crate::Result;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const TITLE: &str = "3D Graph Visualization";

/// Canvas renderer for [`Figure`] with no external dependencies.
const BUILT_IN_VIEWER: &str = include_str!("viewer.js");

/// How the scene page draws its figure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SceneRenderer {
    /// Bundled canvas viewer; the page works offline.
    #[default]
    BuiltIn,
    /// A plotly.js bundle inlined into the page.
    PlotlyInline(String),
    /// plotly.js fetched from its CDN when the page opens.
    PlotlyCdn,
}

impl SceneRenderer {
    /// Pick the renderer named by the `[output]` section.
    ///
    /// A local `plotly_js` bundle wins over `plotly_cdn`.
    pub fn from_config(config: &OutputConfig) -> Result<Self> {
        if let Some(path) = &config.plotly_js {
            let bundle = std::fs::read_to_string(path)?;
            log::debug!("Inlining plotly.js from {} ({} bytes)", path.display(), bundle.len());
            return Ok(Self::PlotlyInline(bundle));
        }
        if config.plotly_cdn {
            return Ok(Self::PlotlyCdn);
        }
        Ok(Self::BuiltIn)
    }
}

/// A Plotly figure: traces plus layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: FigureLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    /// `None` breaks a line between consecutive segments.
    pub x: Vec<Option<f64>>,
    pub y: Vec<Option<f64>>,
    pub z: Vec<Option<f64>>,
    pub hoverinfo: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub width: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub showscale: bool,
    pub colorscale: &'static str,
    pub size: u32,
    pub color: Vec<usize>,
    pub colorbar: ColorBar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    pub thickness: u32,
    pub title: Title,
    pub xanchor: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureLayout {
    pub title: Title,
    pub showlegend: bool,
    pub hovermode: &'static str,
    pub scene: Scene,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub zaxis: Axis,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Axis {
    pub showgrid: bool,
    pub zeroline: bool,
    pub visible: bool,
}

const HIDDEN_AXIS: Axis = Axis {
    showgrid: false,
    zeroline: false,
    visible: false,
};

/// One line trace over all edges and one marker trace over all nodes.
pub fn build_figure(graph: &RelationGraph, layout: &Layout) -> Figure {
    let mut edge_x = Vec::new();
    let mut edge_y = Vec::new();
    let mut edge_z = Vec::new();
    for edge in graph.edges() {
        let (Some(from), Some(to)) = (layout.position(edge.source), layout.position(edge.target)) else {
            continue;
        };
        edge_x.extend([Some(from[0]), Some(to[0]), None]);
        edge_y.extend([Some(from[1]), Some(to[1]), None]);
        edge_z.extend([Some(from[2]), Some(to[2]), None]);
    }

    let edge_trace = Trace {
        kind: "scatter3d",
        mode: "lines",
        x: edge_x,
        y: edge_y,
        z: edge_z,
        hoverinfo: "none",
        text: None,
        line: Some(Line {
            width: 0.5,
            color: "gray",
        }),
        marker: None,
    };

    let mut names = Vec::with_capacity(layout.len());
    let mut node_x = Vec::with_capacity(layout.len());
    let mut node_y = Vec::with_capacity(layout.len());
    let mut node_z = Vec::with_capacity(layout.len());
    let mut depths = Vec::with_capacity(layout.len());
    for (name, pos, depth) in layout.iter() {
        names.push(name.to_string());
        node_x.push(Some(pos[0]));
        node_y.push(Some(pos[1]));
        node_z.push(Some(pos[2]));
        depths.push(depth);
    }

    let node_trace = Trace {
        kind: "scatter3d",
        mode: "markers",
        x: node_x,
        y: node_y,
        z: node_z,
        hoverinfo: "text",
        text: Some(names),
        line: None,
        marker: Some(Marker {
            showscale: true,
            colorscale: "Viridis",
            size: 10,
            color: depths,
            colorbar: ColorBar {
                thickness: 15,
                title: Title {
                    text: "Node Depth",
                    side: Some("right"),
                },
                xanchor: "left",
            },
        }),
    };

    Figure {
        data: vec![edge_trace, node_trace],
        layout: FigureLayout {
            title: Title {
                text: TITLE,
                side: None,
            },
            showlegend: false,
            hovermode: "closest",
            scene: Scene {
                xaxis: HIDDEN_AXIS,
                yaxis: HIDDEN_AXIS,
                zaxis: HIDDEN_AXIS,
            },
        },
    }
}

/// Standalone HTML page rendering `figure` with the built-in viewer.
pub fn render_html(figure: &Figure) -> Result<String> {
    render_html_with(figure, &SceneRenderer::BuiltIn)
}

/// Standalone HTML page rendering `figure` with `renderer`.
pub fn render_html_with(figure: &Figure, renderer: &SceneRenderer) -> Result<String> {
    // "</" inside an inline script would end the script element early
    let json = serde_json::to_string(figure)?.replace("</", "<\\/");

    let (head, draw) = match renderer {
        SceneRenderer::BuiltIn => (String::new(), BUILT_IN_VIEWER.to_string()),
        SceneRenderer::PlotlyInline(bundle) => (
            format!("<script>\n{}\n</script>\n", escape_script(bundle)),
            PLOTLY_NEW_PLOT.to_string(),
        ),
        SceneRenderer::PlotlyCdn => (
            format!("<script src=\"{}\" charset=\"utf-8\"></script>\n", PLOTLY_CDN),
            PLOTLY_NEW_PLOT.to_string(),
        ),
    };

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<title>{title}</title>
{head}</head>
<body style="margin:0">
<div id="graph" style="width:100%;height:100vh;"></div>
<script>
const figure = {json};
{draw}
</script>
</body>
</html>
"#,
        title = TITLE,
        head = head,
        json = json,
        draw = draw
    ))
}

const PLOTLY_NEW_PLOT: &str = r#"Plotly.newPlot("graph", figure.data, figure.layout, {responsive: true});"#;

fn escape_script(js: &str) -> String {
    js.replace("</script", "<\\/script")
}
