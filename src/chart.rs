//! Chart definitions rendered by Plotly.js.
//!
//! A [`Figure`] serializes to the `{ data, layout }` pair Plotly expects, and
//! [`Figure::to_html`] wraps it in a standalone HTML document.

use serde::Serialize;
use serde_json::Value;

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Largest bubble diameter in pixels for scatter charts sized by value.
const MAX_BUBBLE_PX: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceType {
    Bar,
    Scatter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub size: Vec<f64>,
    pub sizemode: &'static str,
    pub sizeref: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: TraceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: Vec<Value>,
    pub y: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
}

impl Trace {
    pub fn bar(name: &str, x: Vec<String>, y: Vec<f64>) -> Self {
        Self {
            kind: TraceType::Bar,
            name: Some(name.to_string()),
            x: x.into_iter().map(Value::from).collect(),
            y: y.into_iter().map(Value::from).collect(),
            mode: None,
            marker: None,
            text: None,
        }
    }

    pub fn line(name: &str, x: Vec<String>, y: Vec<f64>, markers: bool) -> Self {
        Self {
            kind: TraceType::Scatter,
            name: Some(name.to_string()),
            x: x.into_iter().map(Value::from).collect(),
            y: y.into_iter().map(Value::from).collect(),
            mode: Some(if markers { "lines+markers" } else { "lines" }),
            marker: None,
            text: None,
        }
    }

    /// Scatter where each point's area scales with `sizes`; `labels` show on hover.
    pub fn bubbles(x: Vec<f64>, y: Vec<f64>, sizes: Vec<f64>, labels: Vec<String>) -> Self {
        let max = sizes.iter().copied().fold(0.0, f64::max);
        let sizeref = if max > 0.0 {
            2.0 * max / MAX_BUBBLE_PX.powi(2)
        } else {
            1.0
        };
        Self {
            kind: TraceType::Scatter,
            name: None,
            x: x.into_iter().map(Value::from).collect(),
            y: y.into_iter().map(Value::from).collect(),
            mode: Some("markers"),
            marker: Some(Marker {
                size: sizes,
                sizemode: "area",
                sizeref,
            }),
            text: Some(labels),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickangle: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<&'static str>,
    pub xaxis: Axis,
    pub yaxis: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn new(title: &str) -> Self {
        Self {
            data: Vec::new(),
            layout: Layout {
                title: Title {
                    text: title.to_string(),
                },
                height: None,
                barmode: None,
                xaxis: Axis::default(),
                yaxis: Axis::default(),
            },
        }
    }

    pub fn trace(mut self, trace: Trace) -> Self {
        self.data.push(trace);
        self
    }

    pub fn height(mut self, px: u32) -> Self {
        self.layout.height = Some(px);
        self
    }

    pub fn tick_angle(mut self, degrees: i32) -> Self {
        self.layout.xaxis.tickangle = Some(degrees);
        self
    }

    pub fn axis_titles(mut self, x: &str, y: &str) -> Self {
        self.layout.xaxis.title = Some(Title { text: x.to_string() });
        self.layout.yaxis.title = Some(Title { text: y.to_string() });
        self
    }

    pub fn grouped_bars(mut self) -> Self {
        self.layout.barmode = Some("group");
        self
    }

    /// True when no trace has a point to draw.
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|t| t.x.is_empty())
    }

    pub fn title(&self) -> &str {
        &self.layout.title.text
    }

    /// Renders a standalone HTML page that draws the chart with Plotly.js.
    pub fn to_html(&self) -> serde_json::Result<String> {
        let data = script_safe(serde_json::to_string(&self.data)?);
        let layout = script_safe(serde_json::to_string(&self.layout)?);
        let title = escape_html(self.title());

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_JS}"></script>
</head>
<body>
<div id="chart" style="width:100%;height:100%;"></div>
<script>
Plotly.newPlot("chart", {data}, {layout}, {{"responsive": true}});
</script>
</body>
</html>
"#
        ))
    }
}

/// Keeps serialized JSON from closing the surrounding script element.
fn script_safe(json: String) -> String {
    json.replace("</", "<\\/")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
