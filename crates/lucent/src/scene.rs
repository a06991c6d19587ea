//! Scene building: layout output plus styling in, primitives out.
//!
//! Every node becomes exactly one primitive (a circle or rectangle owning
//! its optional label) and every link exactly one primitive (a line or a
//! path). Links go on [`RenderLayer::Link`] so they are drawn beneath nodes.

use std::str::FromStr;

use log::{debug, warn};

use lucent_core::{
    color::{Color, parse_paint},
    draw::{
        Circle, Label, LayeredOutput, Line, Path, Primitive, Rect, RenderLayer, Scene,
        StrokeDefinition, StrokeStyle, Text, TextAnchor, TextDefinition,
    },
    geometry::{Bounds, Insets, Point, Size},
};

use crate::{
    config::{ConfigError, NodeLinkStyle, StyleConfig},
    descriptor::{SceneConfig, SceneElement},
    error::RenderFailure,
    layout::{LayoutLink, LayoutResult, PartitionLayout},
};

/// Styling of node-and-link diagrams, resolved to drawing types.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLinkTheme {
    node_radius: f64,
    node_fill: Option<Color>,
    node_stroke: Option<StrokeDefinition>,
    label: TextDefinition,
    link_stroke: Option<StrokeDefinition>,
}

impl NodeLinkTheme {
    fn from_style(prefix: &str, style: &NodeLinkStyle, font_family: &str) -> Result<Self, ConfigError> {
        let field = |name: &str| format!("style.{prefix}.{name}");
        Ok(Self {
            node_radius: style.node_radius,
            node_fill: config_paint(&field("node_fill"), &style.node_fill)?,
            node_stroke: config_paint(&field("node_stroke"), &style.node_stroke)?
                .map(|color| StrokeDefinition::solid(color, style.node_stroke_width)),
            label: text_definition(
                font_family,
                style.label_size,
                config_color(&field("label_color"), &style.label_color)?,
            ),
            link_stroke: config_paint(&field("link_stroke"), &style.link_stroke)?
                .map(|color| StrokeDefinition::solid(color, style.link_stroke_width)),
        })
    }

    pub fn node_radius(&self) -> f64 {
        self.node_radius
    }

    fn node(&self, center: Point, text: &str) -> Circle {
        Circle::new(center, self.node_radius)
            .with_fill(self.node_fill)
            .with_stroke(self.node_stroke.clone())
            .with_label(Some(Label::new(text, self.label.clone())))
    }
}

/// Default styling resolved from a [`StyleConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    tree: NodeLinkTheme,
    network: NodeLinkTheme,
    palette: Vec<Color>,
    cell_stroke: Option<StrokeDefinition>,
    cell_label: TextDefinition,
    label_min_width: f64,
    scene: SceneTheme,
    placeholder_fill: Option<Color>,
    placeholder_border: Option<StrokeDefinition>,
    placeholder_text: TextDefinition,
    arrow_fill: Color,
}

/// Defaults for explicit scene elements.
#[derive(Debug, Clone, PartialEq)]
struct SceneTheme {
    rect_fill: Option<Color>,
    rect_stroke: Option<Color>,
    circle_fill: Option<Color>,
    circle_stroke: Option<Color>,
    line_stroke: Option<Color>,
    path_fill: Option<Color>,
    path_stroke: Option<Color>,
    stroke_width: f64,
    text: TextDefinition,
}

impl Theme {
    /// Parses every color in `style`.
    ///
    /// `label_min_width` comes from the partition layout settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidColor`] naming the first bad field, and
    /// [`ConfigError::InvalidValue`] for an empty palette.
    pub fn from_config(style: &StyleConfig, label_min_width: f64) -> Result<Self, ConfigError> {
        let family = style.font_family.as_str();

        let palette = style
            .partition
            .palette
            .iter()
            .enumerate()
            .map(|(i, c)| config_color(&format!("style.partition.palette[{i}]"), c))
            .collect::<Result<Vec<_>, _>>()?;
        if palette.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "style.partition.palette".to_string(),
                reason: "must contain at least one color".to_string(),
            });
        }

        let s = &style.scene;
        let scene_text = text_definition(
            family,
            s.text_size,
            config_color("style.scene.text_fill", &s.text_fill)?,
        );
        let scene = SceneTheme {
            rect_fill: config_paint("style.scene.rect_fill", &s.rect_fill)?,
            rect_stroke: config_paint("style.scene.rect_stroke", &s.rect_stroke)?,
            circle_fill: config_paint("style.scene.circle_fill", &s.circle_fill)?,
            circle_stroke: config_paint("style.scene.circle_stroke", &s.circle_stroke)?,
            line_stroke: config_paint("style.scene.line_stroke", &s.line_stroke)?,
            path_fill: config_paint("style.scene.path_fill", &s.path_fill)?,
            path_stroke: config_paint("style.scene.path_stroke", &s.path_stroke)?,
            stroke_width: s.stroke_width,
            text: scene_text,
        };

        let p = &style.placeholder;
        let mut placeholder_text = text_definition(
            family,
            p.text_size,
            config_color("style.placeholder.text_color", &p.text_color)?,
        );
        placeholder_text.set_anchor(TextAnchor::Middle);

        let partition = &style.partition;
        Ok(Self {
            tree: NodeLinkTheme::from_style("tree", &style.tree, family)?,
            network: NodeLinkTheme::from_style("network", &style.network, family)?,
            palette,
            cell_stroke: config_paint("style.partition.stroke", &partition.stroke)?
                .map(|color| StrokeDefinition::solid(color, partition.stroke_width)),
            cell_label: text_definition(
                family,
                partition.label_size,
                config_color("style.partition.label_color", &partition.label_color)?,
            ),
            label_min_width,
            scene,
            placeholder_fill: config_paint("style.placeholder.background", &p.background)?,
            placeholder_border: config_paint("style.placeholder.border", &p.border)?
                .map(|color| StrokeDefinition::dashed(color, 2.0)),
            placeholder_text,
            arrow_fill: config_color("style.scene.arrow_fill", &s.arrow_fill)?,
        })
    }

    pub fn tree(&self) -> &NodeLinkTheme {
        &self.tree
    }

    pub fn network(&self) -> &NodeLinkTheme {
        &self.network
    }

    /// Fill of the arrowhead marker referenced by lines with arrows.
    pub fn arrow_fill(&self) -> Color {
        self.arrow_fill
    }

    fn cell_fill(&self, index: usize) -> Color {
        self.palette[index % self.palette.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&StyleConfig::default(), 50.0)
            .expect("built-in style colors are valid")
    }
}

fn config_color(field: &str, value: &str) -> Result<Color, ConfigError> {
    Color::new(value).map_err(|reason| ConfigError::InvalidColor {
        field: field.to_string(),
        reason,
    })
}

fn config_paint(field: &str, value: &str) -> Result<Option<Color>, ConfigError> {
    parse_paint(value).map_err(|reason| ConfigError::InvalidColor {
        field: field.to_string(),
        reason,
    })
}

fn text_definition(family: &str, size: f64, color: Color) -> TextDefinition {
    let mut definition = TextDefinition::new();
    definition.set_font_family(family);
    definition.set_font_size(size);
    definition.set_color(color);
    definition
}

/// Turns layout results and explicit scene configs into [`Scene`]s.
#[derive(Debug, Clone, Default)]
pub struct SceneBuilder {
    theme: Theme,
}

impl SceneBuilder {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Tree scene: vertical curves for links, labelled circles for nodes.
    pub fn tree(&self, layout: &LayoutResult, size: Size) -> Scene {
        let theme = &self.theme.tree;
        self.node_link_scene(layout, size, theme, |link| {
            Primitive::Path(
                Path::vertical_curve(link.from(), link.to()).with_stroke(theme.link_stroke.clone()),
            )
        })
    }

    /// Network scene: straight lines for links, labelled circles for nodes.
    pub fn network(&self, layout: &LayoutResult, size: Size) -> Scene {
        let theme = &self.theme.network;
        self.node_link_scene(layout, size, theme, |link| {
            Primitive::Line(Line::new(link.from(), link.to()).with_stroke(theme.link_stroke.clone()))
        })
    }

    fn node_link_scene(
        &self,
        layout: &LayoutResult,
        size: Size,
        theme: &NodeLinkTheme,
        draw_link: impl Fn(&LayoutLink) -> Primitive,
    ) -> Scene {
        let mut output = LayeredOutput::new();
        for link in layout.links() {
            output.add_to_layer(RenderLayer::Link, draw_link(link));
        }
        for node in layout.nodes() {
            output.add_to_layer(
                RenderLayer::Content,
                Primitive::Circle(theme.node(node.position(), node.label())),
            );
        }
        debug!(
            nodes = layout.nodes().len(),
            links = layout.links().len(),
            primitives = output.len();
            "Node-link scene built"
        );
        Scene::from_layers(size, output)
    }

    /// Partition scene: one filled rectangle per cell, labelled only when
    /// the cell is wide and tall enough to hold the text.
    pub fn partition(&self, layout: &PartitionLayout, size: Size) -> Scene {
        let theme = &self.theme;
        let mut output = LayeredOutput::new();

        for cell in layout.cells() {
            let bounds = cell.bounds();
            let fits_label = bounds.width() > theme.label_min_width
                && bounds.height() >= theme.cell_label.font_size();
            let label = fits_label.then(|| Label::new(cell.label(), theme.cell_label.clone()));

            let rect = Rect::new(bounds)
                .with_fill(Some(theme.cell_fill(cell.index())))
                .with_stroke(theme.cell_stroke.clone())
                .with_label(label);
            output.add_to_layer(RenderLayer::Content, Primitive::Rect(rect));
        }

        debug!(cells = layout.cells().len(); "Partition scene built");
        Scene::from_layers(size, output)
    }

    /// Explicit scene: elements in their given order, defaults filled in
    /// where the element leaves style unspecified.
    ///
    /// # Errors
    ///
    /// Returns [`RenderFailure::MalformedDescriptor`] for invalid geometry,
    /// colors, dash patterns or text anchors.
    pub fn custom(&self, config: &SceneConfig, size: Size) -> Result<Scene, RenderFailure> {
        let defaults = &self.theme.scene;
        let mut primitives = Vec::with_capacity(config.elements.len());

        for (index, element) in config.elements.iter().enumerate() {
            element.check_geometry()?;
            let primitive = match element {
                SceneElement::Rect(rect) => {
                    let bounds = Bounds::new_from_top_left(
                        Point::new(rect.x, rect.y),
                        Size::new(rect.width, rect.height),
                    );
                    Primitive::Rect(
                        Rect::new(bounds)
                            .with_corner_radius(rect.rx.unwrap_or(0.0))
                            .with_fill(element_paint(rect.fill.as_deref(), defaults.rect_fill)?)
                            .with_stroke(element_stroke(
                                rect.stroke.as_deref(),
                                defaults.rect_stroke,
                                rect.stroke_width.unwrap_or(defaults.stroke_width),
                                rect.stroke_dasharray.as_deref(),
                            )?),
                    )
                }
                SceneElement::Circle(circle) => Primitive::Circle(
                    Circle::new(Point::new(circle.cx, circle.cy), circle.r)
                        .with_fill(element_paint(circle.fill.as_deref(), defaults.circle_fill)?)
                        .with_stroke(element_stroke(
                            circle.stroke.as_deref(),
                            defaults.circle_stroke,
                            circle.stroke_width.unwrap_or(defaults.stroke_width),
                            circle.stroke_dasharray.as_deref(),
                        )?),
                ),
                SceneElement::Line(line) => Primitive::Line(
                    Line::new(Point::new(line.x1, line.y1), Point::new(line.x2, line.y2))
                        .with_stroke(element_stroke(
                            line.stroke.as_deref(),
                            defaults.line_stroke,
                            line.stroke_width.unwrap_or(defaults.stroke_width),
                            line.stroke_dasharray.as_deref(),
                        )?)
                        .with_arrow(line.arrow),
                ),
                SceneElement::Text(text) => {
                    let mut definition = defaults.text.clone();
                    if let Some(fill) = text.fill.as_deref() {
                        definition.set_color(Color::new(fill).map_err(RenderFailure::malformed)?);
                    }
                    if let Some(size) = text.font_size {
                        definition.set_font_size(size);
                    }
                    if let Some(anchor) = text.text_anchor.as_deref() {
                        definition.set_anchor(TextAnchor::from_str(anchor).map_err(RenderFailure::malformed)?);
                    }
                    if let Some(weight) = text.font_weight.as_deref() {
                        definition.set_font_weight(weight);
                    }
                    Primitive::Text(Text::new(Point::new(text.x, text.y), text.text.as_str(), definition))
                }
                SceneElement::Path(path) => Primitive::Path(
                    Path::new(path.d.as_str())
                        .with_fill(element_paint(path.fill.as_deref(), defaults.path_fill)?)
                        .with_stroke(element_stroke(
                            path.stroke.as_deref(),
                            defaults.path_stroke,
                            path.stroke_width.unwrap_or(defaults.stroke_width),
                            path.stroke_dasharray.as_deref(),
                        )?),
                ),
                SceneElement::Unknown => {
                    warn!(index = index; "Skipping scene element of unknown type");
                    continue;
                }
            };
            primitives.push(primitive);
        }

        debug!(
            elements = config.elements.len(),
            primitives = primitives.len();
            "Custom scene built"
        );
        Ok(Scene::new(size, primitives))
    }

    /// The visually distinct stand-in drawn where a diagram failed.
    pub fn error_placeholder(&self, size: Size, message: &str) -> Scene {
        let theme = &self.theme;
        let frame = Insets::uniform(1.0).inner_bounds(size);

        let mut output = LayeredOutput::new();
        output.add_to_layer(
            RenderLayer::Background,
            Primitive::Rect(
                Rect::new(frame)
                    .with_corner_radius(6.0)
                    .with_fill(theme.placeholder_fill)
                    .with_stroke(theme.placeholder_border.clone()),
            ),
        );
        output.add_to_layer(
            RenderLayer::Overlay,
            Primitive::Text(Text::new(
                size.center(),
                format!("Diagram unavailable: {message}"),
                theme.placeholder_text.clone(),
            )),
        );
        Scene::from_layers(size, output)
    }
}

fn element_paint(value: Option<&str>, default: Option<Color>) -> Result<Option<Color>, RenderFailure> {
    match value {
        Some(value) => parse_paint(value).map_err(RenderFailure::malformed),
        None => Ok(default),
    }
}

fn element_stroke(
    color: Option<&str>,
    default: Option<Color>,
    width: f64,
    dasharray: Option<&str>,
) -> Result<Option<StrokeDefinition>, RenderFailure> {
    let style = match dasharray {
        Some(pattern) => StrokeStyle::from_str(pattern).map_err(RenderFailure::malformed)?,
        None => StrokeStyle::Solid,
    };
    Ok(element_paint(color, default)?.map(|color| {
        let mut stroke = StrokeDefinition::new(color, width);
        stroke.set_style(style);
        stroke
    }))
}

#[cfg(test)]
mod tests {
    use lucent_core::draw::PrimitiveKind;

    use crate::{
        config::{PartitionStyle, StyleConfig},
        descriptor::{TreeNode, WeightedNode},
        error::FailureKind,
        layout::{PositionedNode, engines},
        structure::Hierarchy,
    };

    use super::*;

    fn canvas() -> Size {
        Size::new(400.0, 300.0)
    }

    fn scene_config(json: &str) -> SceneConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_tree_scene_one_primitive_per_node_and_link() {
        let tree = TreeNode::new("r").with_children(vec![
            TreeNode::new("a"),
            TreeNode::new("b").with_children(vec![TreeNode::new("c")]),
        ]);
        let hierarchy = Hierarchy::from_root(&tree).unwrap();
        let layout = engines::tree::Engine::new()
            .calculate(&hierarchy, canvas())
            .unwrap();
        let scene = SceneBuilder::default().tree(&layout, canvas());

        assert_eq!(scene.len(), 4 + 3);
        assert_eq!(scene.count(PrimitiveKind::Circle), 4);
        assert_eq!(scene.count(PrimitiveKind::Path), 3);
        // Links are drawn first.
        assert!(scene.primitives()[..3].iter().all(|p| p.kind() == PrimitiveKind::Path));

        let Primitive::Circle(root) = &scene.primitives()[3] else {
            panic!("expected circle");
        };
        assert_eq!(root.radius(), 20.0);
        assert_eq!(root.fill(), Some(Color::new("#3b82f6").unwrap()));
        assert_eq!(root.label().unwrap().content(), "r");
        assert_eq!(root.label().unwrap().definition().font_size(), 12.0);
    }

    #[test]
    fn test_network_lines_match_node_positions() {
        let nodes = vec![
            PositionedNode::new("a", "A", Point::new(100.0, 100.0)),
            PositionedNode::new("b", "B", Point::new(200.0, 120.0)),
        ];
        let layout = LayoutResult::new(nodes, [(0, 1)]).unwrap();
        let scene = SceneBuilder::default().network(&layout, canvas());

        let Primitive::Line(line) = &scene.primitives()[0] else {
            panic!("expected line");
        };
        assert_eq!(line.from(), Point::new(100.0, 100.0));
        assert_eq!(line.to(), Point::new(200.0, 120.0));
        assert_eq!(scene.count(PrimitiveKind::Circle), 2);
        assert!(!scene.has_arrows());
    }

    #[test]
    fn test_partition_labels_only_wide_cells() {
        let root = WeightedNode::branch(
            "root",
            vec![WeightedNode::leaf("wide", 9.0), WeightedNode::leaf("thin", 1.0)],
        );
        let hierarchy = Hierarchy::from_root(&root).unwrap();
        let layout = engines::partition::Engine::new()
            .calculate(&hierarchy, canvas())
            .unwrap();
        let scene = SceneBuilder::default().partition(&layout, canvas());

        assert_eq!(scene.count(PrimitiveKind::Rect), 3);
        let labels: Vec<_> = scene
            .primitives()
            .iter()
            .filter_map(|p| p.label().map(Label::content))
            .collect();
        assert_eq!(labels, ["root", "wide"]);
    }

    #[test]
    fn test_partition_palette_cycles_by_index() {
        let mut style = StyleConfig::default();
        style.partition = PartitionStyle {
            palette: vec!["red".into(), "blue".into()],
            ..PartitionStyle::default()
        };
        let builder = SceneBuilder::new(Theme::from_config(&style, 50.0).unwrap());
        let root = WeightedNode::branch(
            "r",
            vec![WeightedNode::leaf("a", 1.0), WeightedNode::leaf("b", 1.0)],
        );
        let hierarchy = Hierarchy::from_root(&root).unwrap();
        let layout = engines::partition::Engine::new()
            .calculate(&hierarchy, canvas())
            .unwrap();
        let scene = builder.partition(&layout, canvas());

        let fills: Vec<_> = scene
            .primitives()
            .iter()
            .map(|p| match p {
                Primitive::Rect(rect) => rect.fill().unwrap().to_string(),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(fills, ["red", "blue", "red"]);
    }

    #[test]
    fn test_custom_scene_defaults_and_overrides() {
        let config = scene_config(
            r##"{ "elements": [
                { "type": "rect", "x": 0, "y": 0, "width": 10, "height": 10 },
                { "type": "rect", "x": 0, "y": 0, "width": 10, "height": 10, "fill": "none", "stroke": "#000000", "strokeDasharray": "dashed" },
                { "type": "circle", "cx": 5, "cy": 5, "r": 2, "strokeDasharray": "6 2" },
                { "type": "line", "x1": 0, "y1": 0, "x2": 5, "y2": 5, "arrow": true },
                { "type": "text", "x": 1, "y": 1, "text": "t", "fontWeight": "bold", "textAnchor": "end" }
            ] }"##,
        );
        let scene = SceneBuilder::default().custom(&config, canvas()).unwrap();
        let primitives = scene.primitives();

        let Primitive::Rect(plain) = &primitives[0] else { panic!() };
        assert_eq!(plain.fill(), Some(Color::new("#3b82f6").unwrap()));
        assert_eq!(plain.stroke().unwrap().width(), 2.0);

        let Primitive::Rect(styled) = &primitives[1] else { panic!() };
        assert_eq!(styled.fill(), None);
        assert_eq!(*styled.stroke().unwrap().style(), StrokeStyle::Dashed);

        let Primitive::Circle(dashed) = &primitives[2] else { panic!() };
        assert_eq!(*dashed.stroke().unwrap().style(), StrokeStyle::Custom("6 2".to_string()));

        assert!(scene.has_arrows());

        let Primitive::Text(text) = &primitives[4] else { panic!() };
        assert_eq!(text.definition().font_weight(), "bold");
        assert_eq!(text.definition().anchor(), TextAnchor::End);
        assert_eq!(text.definition().font_size(), 14.0);
    }

    #[test]
    fn test_custom_scene_skips_unknown_and_keeps_order() {
        let config = scene_config(
            r#"{ "elements": [
                { "type": "circle", "cx": 1, "cy": 1, "r": 1 },
                { "type": "star", "points": 5 },
                { "type": "path", "d": "M 0 0 L 1 1" }
            ] }"#,
        );
        let scene = SceneBuilder::default().custom(&config, canvas()).unwrap();
        let kinds: Vec<_> = scene.primitives().iter().map(Primitive::kind).collect();
        assert_eq!(kinds, [PrimitiveKind::Circle, PrimitiveKind::Path]);
    }

    #[test]
    fn test_custom_scene_rejects_bad_style() {
        let builder = SceneBuilder::default();
        for json in [
            r#"{ "elements": [{ "type": "circle", "cx": 1, "cy": 1, "r": 1, "fill": "nope" }] }"#,
            r#"{ "elements": [{ "type": "text", "x": 1, "y": 1, "text": "t", "textAnchor": "left" }] }"#,
            r#"{ "elements": [{ "type": "line", "x1": 0, "y1": 0, "x2": 1, "y2": 1, "strokeDasharray": "" }] }"#,
            r#"{ "elements": [{ "type": "rect", "x": 0, "y": 0, "width": 1, "height": 1, "strokeDasharray": "abc" }] }"#,
            r#"{ "elements": [{ "type": "path", "d": "M 0 0 L 1 1", "strokeDasharray": "4,-1" }] }"#,
        ] {
            let err = builder.custom(&scene_config(json), canvas()).unwrap_err();
            assert_eq!(err.kind(), FailureKind::MalformedDescriptor, "{json}");
        }
    }

    #[test]
    fn test_error_placeholder_is_distinct() {
        let scene = SceneBuilder::default().error_placeholder(canvas(), "boom");
        assert_eq!(scene.len(), 2);

        let Primitive::Rect(frame) = &scene.primitives()[0] else { panic!() };
        assert_eq!(*frame.stroke().unwrap().style(), StrokeStyle::Dashed);

        let Primitive::Text(text) = &scene.primitives()[1] else { panic!() };
        assert!(text.content().contains("boom"));
        assert_eq!(text.definition().anchor(), TextAnchor::Middle);
        assert!(scene.fits_canvas(0.0));
    }

    #[test]
    fn test_theme_rejects_bad_config_colors() {
        let mut style = StyleConfig::default();
        style.network.node_fill = "not-a-color".into();
        let err = Theme::from_config(&style, 50.0).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidColor { field, .. } if field == "style.network.node_fill"));

        let mut style = StyleConfig::default();
        style.partition.palette.clear();
        assert!(matches!(
            Theme::from_config(&style, 50.0),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
