//! The diagram descriptor: the tagged input value describing one diagram.
//!
//! Descriptors arrive as JSON with camelCase field names. Only shape
//! validation happens here; structural checks (cycles, dangling edges,
//! weights) belong to [`crate::structure`].
//!
//! ```
//! use lucent::descriptor::{DiagramDescriptor, DiagramKind};
//!
//! let json = r#"{
//!     "kind": "tree",
//!     "title": "Org chart",
//!     "description": "",
//!     "treeData": { "name": "CEO", "children": [{ "name": "CTO" }] }
//! }"#;
//! let descriptor = DiagramDescriptor::from_json(json).unwrap();
//! assert_eq!(descriptor.diagram_kind().unwrap(), DiagramKind::Tree);
//! ```

mod chart;
mod scene;

pub use chart::{ChartConfig, ChartSeries, ChartType};
pub use scene::{
    CircleElement, LineElement, PathElement, RectElement, SceneConfig, SceneElement, TextElement,
};

use std::{fmt, str::FromStr};

use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use lucent_core::geometry::Size;

use crate::error::RenderFailure;

/// The discriminant selecting a layout path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramKind {
    Tree,
    Network,
    Hierarchy,
    Scene,
    Chart,
    Embedded,
}

impl DiagramKind {
    /// Returns the descriptor field that carries this kind's payload.
    pub fn payload_field(self) -> &'static str {
        match self {
            Self::Tree => "treeData",
            Self::Network => "graphData",
            Self::Hierarchy => "hierarchyData",
            Self::Scene => "sceneConfig",
            Self::Chart => "chartConfig",
            Self::Embedded => "embeddedMarkup",
        }
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Tree => "tree",
            Self::Network => "network",
            Self::Hierarchy => "hierarchy",
            Self::Scene => "scene",
            Self::Chart => "chart",
            Self::Embedded => "embedded",
        };
        f.write_str(name)
    }
}

impl FromStr for DiagramKind {
    type Err = RenderFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tree" => Ok(Self::Tree),
            "network" => Ok(Self::Network),
            "hierarchy" => Ok(Self::Hierarchy),
            "scene" => Ok(Self::Scene),
            "chart" => Ok(Self::Chart),
            "embedded" => Ok(Self::Embedded),
            other => Err(RenderFailure::UnsupportedDiagramKind(other.to_string())),
        }
    }
}

/// One diagram to render.
///
/// `kind` stays a raw string so that an unknown kind survives parsing and is
/// reported as [`RenderFailure::UnsupportedDiagramKind`] at dispatch time.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramDescriptor {
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub tree_data: Option<TreeNode>,
    pub graph_data: Option<GraphData>,
    pub hierarchy_data: Option<WeightedNode>,
    pub scene_config: Option<SceneConfig>,
    pub chart_config: Option<ChartConfig>,
    #[serde(alias = "htmlContent")]
    pub embedded_markup: Option<String>,
}

impl DiagramDescriptor {
    /// Creates a descriptor of the given kind with no payload.
    pub fn new(kind: DiagramKind, title: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Parses one descriptor from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`RenderFailure::MalformedDescriptor`] for JSON syntax errors
    /// and for documents that do not have the descriptor shape.
    pub fn from_json(json: &str) -> Result<Self, RenderFailure> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a JSON document holding either one descriptor or an array of
    /// descriptors.
    ///
    /// Elements are read independently: one entry per element, in input
    /// order, so a malformed element does not hide its siblings.
    ///
    /// # Errors
    ///
    /// Returns [`RenderFailure::MalformedDescriptor`] when the document is
    /// not valid JSON, or is neither an object nor an array.
    pub fn from_json_batch(json: &str) -> Result<Vec<Result<Self, RenderFailure>>, RenderFailure> {
        let elements = match serde_json::from_str::<Value>(json)? {
            Value::Array(elements) => elements,
            object @ Value::Object(_) => vec![object],
            other => {
                return Err(RenderFailure::malformed(format!(
                    "expected a descriptor object or an array of descriptors, found {}",
                    json_type_name(&other)
                )));
            }
        };

        let entries: Vec<_> = elements
            .into_iter()
            .enumerate()
            .map(|(index, element)| {
                serde_json::from_value::<Self>(element).map_err(|err| {
                    RenderFailure::malformed(format!("descriptor {index}: {err}"))
                })
            })
            .collect();

        debug!(
            count = entries.len(),
            malformed = entries.iter().filter(|entry| entry.is_err()).count();
            "Descriptor batch parsed"
        );
        Ok(entries)
    }

    /// Resolves the `kind` string.
    ///
    /// # Errors
    ///
    /// Returns [`RenderFailure::UnsupportedDiagramKind`] for unknown kinds.
    pub fn diagram_kind(&self) -> Result<DiagramKind, RenderFailure> {
        self.kind.parse()
    }

    /// Resolves the canvas size: the descriptor's own `width`/`height`, then
    /// the scene config's, then `fallback`, independently per axis.
    ///
    /// # Errors
    ///
    /// Returns [`RenderFailure::MalformedDescriptor`] if a dimension given by
    /// the descriptor is not a positive finite number.
    pub fn canvas_size(&self, fallback: Size) -> Result<Size, RenderFailure> {
        let scene = self.scene_config.as_ref();
        let width = self
            .width
            .or_else(|| scene.and_then(|s| s.width))
            .unwrap_or(fallback.width());
        let height = self
            .height
            .or_else(|| scene.and_then(|s| s.height))
            .unwrap_or(fallback.height());

        let size = Size::new(width, height);
        if size.is_drawable() {
            Ok(size)
        } else {
            Err(RenderFailure::malformed(format!(
                "canvas size {width}x{height} must be positive and finite"
            )))
        }
    }

    /// Logs a warning for every payload that does not belong to `kind`.
    pub(crate) fn warn_foreign_payloads(&self, kind: DiagramKind) {
        let present = [
            (DiagramKind::Tree, self.tree_data.is_some()),
            (DiagramKind::Network, self.graph_data.is_some()),
            (DiagramKind::Hierarchy, self.hierarchy_data.is_some()),
            (DiagramKind::Scene, self.scene_config.is_some()),
            (DiagramKind::Chart, self.chart_config.is_some()),
            (DiagramKind::Embedded, self.embedded_markup.is_some()),
        ];
        for (other, is_present) in present {
            if is_present && other != kind {
                warn!(
                    kind:% = kind,
                    field = other.payload_field();
                    "Ignoring payload that does not belong to the diagram kind"
                );
            }
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Returns the payload or a `MalformedDescriptor` naming the missing field.
pub(crate) fn require<T>(payload: Option<&T>, kind: DiagramKind) -> Result<&T, RenderFailure> {
    payload.ok_or_else(|| {
        RenderFailure::malformed(format!(
            "`{}` is required for a {kind} diagram",
            kind.payload_field()
        ))
    })
}

/// A node of a rooted tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TreeNode {
    pub name: String,
    /// Identity used by the cycle guard; nodes without one never collide.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }
}

/// A node of a weighted hierarchy; only leaf values contribute weight.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeightedNode {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub children: Vec<WeightedNode>,
}

impl WeightedNode {
    pub fn leaf(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            id: None,
            value: Some(value),
            children: Vec::new(),
        }
    }

    pub fn branch(name: impl Into<String>, children: Vec<WeightedNode>) -> Self {
        Self {
            name: name.into(),
            id: None,
            value: None,
            children,
        }
    }
}

/// Nodes and edges of a relationship graph.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

/// A graph node; `x` and `y` together seed the force simulation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            x: None,
            y: None,
        }
    }

    /// The display text: the name, or the id when no name is given.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

impl GraphEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::FailureKind;

    use super::*;

    #[test]
    fn test_kind_round_trip_names() {
        for name in ["tree", "network", "hierarchy", "scene", "chart", "embedded"] {
            let kind: DiagramKind = name.parse().unwrap();
            assert_eq!(kind.to_string(), name);
        }
    }

    #[test]
    fn test_unknown_kind_survives_parsing() {
        let descriptor =
            DiagramDescriptor::from_json(r#"{ "kind": "venn", "title": "t", "description": "" }"#)
                .unwrap();
        let err = descriptor.diagram_kind().unwrap_err();
        assert_eq!(err, RenderFailure::UnsupportedDiagramKind("venn".into()));
    }

    #[test]
    fn test_syntax_error_is_malformed() {
        let err = DiagramDescriptor::from_json("{ \"kind\": ").unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedDescriptor);
    }

    #[test]
    fn test_camel_case_payloads() {
        let json = r#"{
            "kind": "network",
            "title": "Deps",
            "description": "",
            "graphData": {
                "nodes": [{ "id": "a", "name": "Alpha", "x": 1, "y": 2 }, { "id": "b" }],
                "edges": [{ "source": "a", "target": "b" }]
            }
        }"#;
        let descriptor = DiagramDescriptor::from_json(json).unwrap();
        let graph = descriptor.graph_data.unwrap();

        assert_eq!(graph.nodes[0].label(), "Alpha");
        assert_eq!(graph.nodes[1].label(), "b");
        assert_eq!(graph.nodes[0].x, Some(1.0));
        assert_eq!(graph.edges, vec![GraphEdge::new("a", "b")]);
    }

    #[test]
    fn test_html_content_alias() {
        let json = r#"{ "kind": "embedded", "title": "", "description": "", "htmlContent": "<b>x</b>" }"#;
        let descriptor = DiagramDescriptor::from_json(json).unwrap();
        assert_eq!(descriptor.embedded_markup.as_deref(), Some("<b>x</b>"));
    }

    #[test]
    fn test_batch_accepts_one_or_many() {
        let one = r#"{ "kind": "tree", "title": "a" }"#;
        assert_eq!(DiagramDescriptor::from_json_batch(one).unwrap().len(), 1);

        let many = r#"[{ "kind": "tree" }, { "kind": "chart" }]"#;
        let batch = DiagramDescriptor::from_json_batch(many).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1].as_ref().unwrap().kind, "chart");
    }

    #[test]
    fn test_batch_keeps_siblings_of_malformed_element() {
        let json = r#"[
            { "kind": "tree", "treeData": { "name": "A" } },
            { "kind": "tree", "treeData": { "children": [] } },
            { "kind": "network", "width": "wide" },
            42
        ]"#;
        let batch = DiagramDescriptor::from_json_batch(json).unwrap();
        assert_eq!(batch.len(), 4);

        let first = batch[0].as_ref().unwrap();
        assert_eq!(first.tree_data.as_ref().unwrap().name, "A");

        for (index, entry) in batch.iter().enumerate().skip(1) {
            let err = entry.as_ref().unwrap_err();
            assert_eq!(err.kind(), FailureKind::MalformedDescriptor);
            assert!(err.message().starts_with(&format!("descriptor {index}:")), "{err}");
        }
        assert!(batch[1].as_ref().unwrap_err().message().contains("name"));
    }

    #[test]
    fn test_batch_rejects_scalar_document() {
        let err = DiagramDescriptor::from_json_batch("\"tree\"").unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedDescriptor);
        assert!(err.message().contains("a string"));

        let err = DiagramDescriptor::from_json_batch("[{ \"kind\": ").unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedDescriptor);
    }

    #[test]
    fn test_canvas_size_precedence() {
        let fallback = Size::new(400.0, 300.0);
        let mut descriptor = DiagramDescriptor::new(DiagramKind::Scene, "s");
        assert_eq!(descriptor.canvas_size(fallback).unwrap(), fallback);

        descriptor.scene_config = Some(SceneConfig {
            width: Some(800.0),
            height: Some(600.0),
            elements: Vec::new(),
        });
        descriptor.height = Some(100.0);
        assert_eq!(
            descriptor.canvas_size(fallback).unwrap(),
            Size::new(800.0, 100.0)
        );

        descriptor.width = Some(-5.0);
        assert_eq!(
            descriptor.canvas_size(fallback).unwrap_err().kind(),
            FailureKind::MalformedDescriptor
        );
    }

    #[test]
    fn test_require_names_missing_field() {
        let descriptor = DiagramDescriptor::new(DiagramKind::Hierarchy, "h");
        let err = require(descriptor.hierarchy_data.as_ref(), DiagramKind::Hierarchy).unwrap_err();
        assert!(err.message().contains("hierarchyData"));
    }
}
