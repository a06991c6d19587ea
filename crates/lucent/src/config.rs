//! Configuration types for Lucent rendering.
//!
//! This module provides configuration structures that control how diagrams
//! are laid out and styled. All types implement [`serde::Deserialize`] with
//! per-field defaults, so partial configuration files are valid.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Canvas defaults and per-engine tuning.
//! - [`StyleConfig`] - Default colors and sizes applied when a descriptor
//!   leaves styling unspecified.
//!
//! # Example
//!
//! ```
//! # use lucent::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().width, 400.0);
//! assert!(config.layout().validate().is_ok());
//! ```

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Errors found while validating configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid color for `{field}`: {reason}")]
    InvalidColor { field: String, reason: String },

    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    fn invalid_value(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Top-level application configuration combining layout and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Canvas defaults and layout engine tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Canvas width used when neither the caller nor the descriptor sets one.
    pub width: f64,
    /// Canvas height used when neither the caller nor the descriptor sets one.
    pub height: f64,
    pub tree: TreeLayoutConfig,
    pub force: ForceLayoutConfig,
    pub partition: PartitionLayoutConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 300.0,
            tree: TreeLayoutConfig::default(),
            force: ForceLayoutConfig::default(),
            partition: PartitionLayoutConfig::default(),
        }
    }
}

impl LayoutConfig {
    /// Checks every numeric parameter for a usable range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(ConfigError::invalid_value("layout.width", "must be positive"));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(ConfigError::invalid_value("layout.height", "must be positive"));
        }
        non_negative("layout.tree.margin", self.tree.margin)?;
        non_negative("layout.partition.padding", self.partition.padding)?;
        non_negative("layout.partition.label_min_width", self.partition.label_min_width)?;

        let force = &self.force;
        if force.max_ticks == 0 {
            return Err(ConfigError::invalid_value(
                "layout.force.max_ticks",
                "must be at least 1",
            ));
        }
        non_negative("layout.force.link_distance", force.link_distance)?;
        non_negative("layout.force.center_strength", force.center_strength)?;
        non_negative("layout.force.margin", force.margin)?;
        if !force.charge_strength.is_finite() {
            return Err(ConfigError::invalid_value(
                "layout.force.charge_strength",
                "must be finite",
            ));
        }
        if !(force.velocity_decay > 0.0 && force.velocity_decay <= 1.0) {
            return Err(ConfigError::invalid_value(
                "layout.force.velocity_decay",
                "must be in (0, 1]",
            ));
        }
        if !(force.alpha_min > 0.0 && force.alpha_min < 1.0) {
            return Err(ConfigError::invalid_value(
                "layout.force.alpha_min",
                "must be in (0, 1)",
            ));
        }
        if !(force.convergence_threshold.is_finite() && force.convergence_threshold > 0.0) {
            return Err(ConfigError::invalid_value(
                "layout.force.convergence_threshold",
                "must be positive",
            ));
        }
        Ok(())
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid_value(field, "must be a non-negative number"))
    }
}

/// Tree layout tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TreeLayoutConfig {
    /// Space kept clear on every side of the canvas.
    pub margin: f64,
}

impl Default for TreeLayoutConfig {
    fn default() -> Self {
        Self { margin: 50.0 }
    }
}

/// Force simulation tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForceLayoutConfig {
    /// Hard cap on simulation ticks.
    pub max_ticks: usize,
    /// Rest length of every link spring.
    pub link_distance: f64,
    /// Many-body strength; negative values repel.
    pub charge_strength: f64,
    /// Fraction of the offset between the layout's mean and the canvas
    /// center removed per tick.
    pub center_strength: f64,
    /// Fraction of velocity lost per tick.
    pub velocity_decay: f64,
    /// Temperature at which the cooling schedule is considered finished;
    /// also fixes the decay rate so cooling spans 300 ticks.
    pub alpha_min: f64,
    /// Largest per-tick displacement, in pixels, that counts as settled.
    pub convergence_threshold: f64,
    /// Space kept clear on every side of the canvas after fitting.
    pub margin: f64,
    /// Seed for random initial placement; unseeded runs differ per call.
    pub seed: Option<u64>,
    /// Fail with `LayoutDidNotConverge` instead of warning when the tick cap
    /// is hit.
    pub strict_convergence: bool,
}

impl Default for ForceLayoutConfig {
    fn default() -> Self {
        Self {
            max_ticks: 300,
            link_distance: 100.0,
            charge_strength: -300.0,
            center_strength: 0.1,
            velocity_decay: 0.4,
            alpha_min: 0.001,
            convergence_threshold: 0.01,
            margin: 20.0,
            seed: None,
            strict_convergence: false,
        }
    }
}

/// Partition layout tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PartitionLayoutConfig {
    /// Space kept clear on every side of the canvas.
    pub padding: f64,
    /// Cells must be wider than this to get a label.
    pub label_min_width: f64,
}

impl Default for PartitionLayoutConfig {
    fn default() -> Self {
        Self {
            padding: 0.0,
            label_min_width: 50.0,
        }
    }
}

/// Default styling, as CSS color strings and pixel sizes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub font_family: String,
    /// Fields missing from a `[style.tree]` table keep the tree defaults.
    #[serde(deserialize_with = "tree_style")]
    pub tree: NodeLinkStyle,
    /// Fields missing from a `[style.network]` table keep the network
    /// defaults.
    #[serde(deserialize_with = "network_style")]
    pub network: NodeLinkStyle,
    pub partition: PartitionStyle,
    pub scene: SceneElementStyle,
    pub placeholder: PlaceholderStyle,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_family: "Arial, sans-serif".to_string(),
            tree: NodeLinkStyle::tree(),
            network: NodeLinkStyle::network(),
            partition: PartitionStyle::default(),
            scene: SceneElementStyle::default(),
            placeholder: PlaceholderStyle::default(),
        }
    }
}

/// Styling of node-and-link diagrams (trees and networks).
///
/// Trees and networks have different defaults, so there is no `Default`
/// impl; use [`NodeLinkStyle::tree`] or [`NodeLinkStyle::network`].
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLinkStyle {
    pub node_radius: f64,
    pub node_fill: String,
    pub node_stroke: String,
    pub node_stroke_width: f64,
    pub label_color: String,
    pub label_size: f64,
    pub link_stroke: String,
    pub link_stroke_width: f64,
}

impl NodeLinkStyle {
    /// Blue nodes joined by curves.
    pub fn tree() -> Self {
        Self {
            node_radius: 20.0,
            node_fill: "#3b82f6".to_string(),
            node_stroke: "#1e40af".to_string(),
            node_stroke_width: 2.0,
            label_color: "white".to_string(),
            label_size: 12.0,
            link_stroke: "#3b82f6".to_string(),
            link_stroke_width: 2.0,
        }
    }

    /// Smaller green nodes joined by grey lines.
    pub fn network() -> Self {
        Self {
            node_radius: 15.0,
            node_fill: "#10b981".to_string(),
            node_stroke: "#059669".to_string(),
            node_stroke_width: 2.0,
            label_color: "white".to_string(),
            label_size: 10.0,
            link_stroke: "#6b7280".to_string(),
            link_stroke_width: 2.0,
        }
    }
}

/// A partially specified [`NodeLinkStyle`] as it appears in a config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NodeLinkOverrides {
    node_radius: Option<f64>,
    node_fill: Option<String>,
    node_stroke: Option<String>,
    node_stroke_width: Option<f64>,
    label_color: Option<String>,
    label_size: Option<f64>,
    link_stroke: Option<String>,
    link_stroke_width: Option<f64>,
}

impl NodeLinkOverrides {
    fn apply(self, base: NodeLinkStyle) -> NodeLinkStyle {
        NodeLinkStyle {
            node_radius: self.node_radius.unwrap_or(base.node_radius),
            node_fill: self.node_fill.unwrap_or(base.node_fill),
            node_stroke: self.node_stroke.unwrap_or(base.node_stroke),
            node_stroke_width: self.node_stroke_width.unwrap_or(base.node_stroke_width),
            label_color: self.label_color.unwrap_or(base.label_color),
            label_size: self.label_size.unwrap_or(base.label_size),
            link_stroke: self.link_stroke.unwrap_or(base.link_stroke),
            link_stroke_width: self.link_stroke_width.unwrap_or(base.link_stroke_width),
        }
    }
}

fn tree_style<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NodeLinkStyle, D::Error> {
    NodeLinkOverrides::deserialize(deserializer).map(|overrides| overrides.apply(NodeLinkStyle::tree()))
}

fn network_style<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NodeLinkStyle, D::Error> {
    NodeLinkOverrides::deserialize(deserializer)
        .map(|overrides| overrides.apply(NodeLinkStyle::network()))
}

/// Styling of partition cells.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PartitionStyle {
    /// Cell fills, cycled in breadth-first order.
    pub palette: Vec<String>,
    pub stroke: String,
    pub stroke_width: f64,
    pub label_color: String,
    pub label_size: f64,
}

impl Default for PartitionStyle {
    fn default() -> Self {
        let palette = [
            "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2",
            "#7f7f7f", "#bcbd22", "#17becf",
        ];
        Self {
            palette: palette.iter().map(|c| c.to_string()).collect(),
            stroke: "white".to_string(),
            stroke_width: 1.0,
            label_color: "white".to_string(),
            label_size: 12.0,
        }
    }
}

/// Defaults for explicit scene elements that omit their own style.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneElementStyle {
    pub rect_fill: String,
    pub rect_stroke: String,
    pub circle_fill: String,
    pub circle_stroke: String,
    pub line_stroke: String,
    pub path_fill: String,
    pub path_stroke: String,
    pub stroke_width: f64,
    pub text_fill: String,
    pub text_size: f64,
    pub arrow_fill: String,
}

impl Default for SceneElementStyle {
    fn default() -> Self {
        Self {
            rect_fill: "#3b82f6".to_string(),
            rect_stroke: "#1e40af".to_string(),
            circle_fill: "#10b981".to_string(),
            circle_stroke: "#059669".to_string(),
            line_stroke: "#6b7280".to_string(),
            path_fill: "none".to_string(),
            path_stroke: "#3b82f6".to_string(),
            stroke_width: 2.0,
            text_fill: "#1f2937".to_string(),
            text_size: 14.0,
            arrow_fill: "#6b7280".to_string(),
        }
    }
}

/// Styling of the placeholder drawn in place of a failed diagram.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlaceholderStyle {
    pub background: String,
    pub border: String,
    pub text_color: String,
    pub text_size: f64,
}

impl Default for PlaceholderStyle {
    fn default() -> Self {
        Self {
            background: "#fef2f2".to_string(),
            border: "#dc2626".to_string(),
            text_color: "#dc2626".to_string(),
            text_size: 13.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_is_valid() {
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_matches_canvas_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.layout().width, 400.0);
        assert_eq!(config.layout().height, 300.0);
        assert_eq!(config.layout().tree.margin, 50.0);
        assert_eq!(config.layout().force.max_ticks, 300);
        assert_eq!(config.layout().force.link_distance, 100.0);
        assert_eq!(config.style().partition.palette.len(), 10);
    }

    #[test]
    fn test_tree_and_network_have_their_own_defaults() {
        let style = StyleConfig::default();
        assert_eq!(style.tree, NodeLinkStyle::tree());
        assert_eq!(style.network, NodeLinkStyle::network());
        assert_ne!(style.tree, style.network);
    }

    #[test]
    fn test_partial_network_style_keeps_network_defaults() {
        let json = r#"{ "style": { "network": { "node_radius": 12.0 } } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        let network = &config.style().network;
        assert_eq!(network.node_radius, 12.0);
        assert_eq!(network.node_fill, "#10b981");
        assert_eq!(network.label_size, 10.0);
        assert_eq!(network.link_stroke, "#6b7280");
        assert_eq!(config.style().tree, NodeLinkStyle::tree());
    }

    #[test]
    fn test_partial_tree_style_keeps_tree_defaults() {
        let json = r#"{ "style": { "tree": { "node_fill": "red" } } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        let tree = &config.style().tree;
        assert_eq!(tree.node_fill, "red");
        assert_eq!(tree.node_radius, 20.0);
        assert_eq!(tree.label_size, 12.0);
        assert_eq!(config.style().network, NodeLinkStyle::network());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut layout = LayoutConfig::default();
        layout.width = 0.0;
        assert!(matches!(
            layout.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "layout.width"
        ));

        let mut layout = LayoutConfig::default();
        layout.force.max_ticks = 0;
        assert!(layout.validate().is_err());

        let mut layout = LayoutConfig::default();
        layout.force.velocity_decay = 1.5;
        assert!(layout.validate().is_err());

        let mut layout = LayoutConfig::default();
        layout.tree.margin = -1.0;
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let json = r#"{ "layout": { "width": 640, "force": { "seed": 7 } } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.layout().width, 640.0);
        assert_eq!(config.layout().height, 300.0);
        assert_eq!(config.layout().force.seed, Some(7));
        assert_eq!(config.layout().force.max_ticks, 300);
        assert_eq!(config.style().tree.node_radius, 20.0);
    }
}
