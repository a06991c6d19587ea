//! The primitive shapes a scene is built from.
//!
//! The vocabulary is deliberately small: rectangles, circles, lines, free text
//! and raw SVG path data. Rectangles and circles may own a centred [`Label`],
//! so a labelled diagram node is still exactly one primitive.

use svg::node::element as svg_element;

use crate::{
    apply_stroke,
    color::Color,
    draw::{Drawable, Label, StrokeDefinition, SvgNode, TextDefinition},
    geometry::{Bounds, Point, Size},
};

/// Id of the arrowhead marker that lines with `arrow` reference.
///
/// Exporters must emit a matching `<marker>` definition when
/// [`Scene::has_arrows`](crate::draw::Scene::has_arrows) is true.
pub const ARROW_MARKER_ID: &str = "arrowhead";

/// Discriminant of a [`Primitive`], handy for counting and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Rect,
    Circle,
    Line,
    Text,
    Path,
}

/// One drawing instruction in a scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect(Rect),
    Circle(Circle),
    Line(Line),
    Text(Text),
    Path(Path),
}

impl Primitive {
    /// Returns the kind of this primitive.
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Rect(_) => PrimitiveKind::Rect,
            Self::Circle(_) => PrimitiveKind::Circle,
            Self::Line(_) => PrimitiveKind::Line,
            Self::Text(_) => PrimitiveKind::Text,
            Self::Path(_) => PrimitiveKind::Path,
        }
    }

    /// Returns the label owned by this primitive, if any.
    pub fn label(&self) -> Option<&Label> {
        match self {
            Self::Rect(rect) => rect.label(),
            Self::Circle(circle) => circle.label(),
            Self::Line(_) | Self::Text(_) | Self::Path(_) => None,
        }
    }

    fn as_drawable(&self) -> &dyn Drawable {
        match self {
            Self::Rect(rect) => rect,
            Self::Circle(circle) => circle,
            Self::Line(line) => line,
            Self::Text(text) => text,
            Self::Path(path) => path,
        }
    }
}

impl Drawable for Primitive {
    fn render_to_svg(&self) -> SvgNode {
        self.as_drawable().render_to_svg()
    }

    fn bounds(&self) -> Option<Bounds> {
        self.as_drawable().bounds()
    }
}

/// Sets `fill` (or `fill="none"`) on an SVG element.
macro_rules! apply_fill {
    ($element:expr, $fill:expr) => {{
        match $fill {
            Some(color) => $element
                .set("fill", color.to_string())
                .set("fill-opacity", color.alpha()),
            None => $element.set("fill", "none"),
        }
    }};
}

/// Sets the stroke when present, or `stroke="none"`.
macro_rules! apply_optional_stroke {
    ($element:expr, $stroke:expr) => {{
        match $stroke {
            Some(stroke) => apply_stroke!($element, stroke),
            None => $element.set("stroke", "none"),
        }
    }};
}

/// Wraps a shape node and its optional label into one SVG node.
fn with_label(shape: SvgNode, label: Option<&Label>, center: Point) -> SvgNode {
    match label {
        Some(label) => Box::new(svg_element::Group::new().add(shape).add(label.render_at(center))),
        None => shape,
    }
}

/// An axis-aligned rectangle with optional rounded corners and label.
#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    bounds: Bounds,
    corner_radius: f64,
    fill: Option<Color>,
    stroke: Option<StrokeDefinition>,
    label: Option<Label>,
}

impl Rect {
    /// Creates an unfilled, unstroked rectangle covering `bounds`.
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            corner_radius: 0.0,
            fill: None,
            stroke: None,
            label: None,
        }
    }

    pub fn with_fill(mut self, fill: Option<Color>) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_stroke(mut self, stroke: Option<StrokeDefinition>) -> Self {
        self.stroke = stroke;
        self
    }

    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }

    pub fn with_label(mut self, label: Option<Label>) -> Self {
        self.label = label;
        self
    }

    pub fn rect_bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn corner_radius(&self) -> f64 {
        self.corner_radius
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn stroke(&self) -> Option<&StrokeDefinition> {
        self.stroke.as_ref()
    }

    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }
}

impl Drawable for Rect {
    fn render_to_svg(&self) -> SvgNode {
        let rect = svg_element::Rectangle::new()
            .set("x", self.bounds.min_x())
            .set("y", self.bounds.min_y())
            .set("width", self.bounds.width())
            .set("height", self.bounds.height())
            .set("rx", self.corner_radius);
        let rect = apply_fill!(rect, self.fill);
        let rect = apply_optional_stroke!(rect, self.stroke.as_ref());

        with_label(Box::new(rect), self.label.as_ref(), self.bounds.center())
    }

    fn bounds(&self) -> Option<Bounds> {
        Some(self.bounds)
    }
}

/// A circle with an optional centred label.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    center: Point,
    radius: f64,
    fill: Option<Color>,
    stroke: Option<StrokeDefinition>,
    label: Option<Label>,
}

impl Circle {
    /// Creates an unfilled, unstroked circle.
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius,
            fill: None,
            stroke: None,
            label: None,
        }
    }

    pub fn with_fill(mut self, fill: Option<Color>) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_stroke(mut self, stroke: Option<StrokeDefinition>) -> Self {
        self.stroke = stroke;
        self
    }

    pub fn with_label(mut self, label: Option<Label>) -> Self {
        self.label = label;
        self
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn stroke(&self) -> Option<&StrokeDefinition> {
        self.stroke.as_ref()
    }

    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }
}

impl Drawable for Circle {
    fn render_to_svg(&self) -> SvgNode {
        let circle = svg_element::Circle::new()
            .set("cx", self.center.x())
            .set("cy", self.center.y())
            .set("r", self.radius);
        let circle = apply_fill!(circle, self.fill);
        let circle = apply_optional_stroke!(circle, self.stroke.as_ref());

        with_label(Box::new(circle), self.label.as_ref(), self.center)
    }

    fn bounds(&self) -> Option<Bounds> {
        let diameter = self.radius * 2.0;
        Some(self.center.to_bounds(Size::new(diameter, diameter)))
    }
}

/// A straight segment, optionally ending in an arrowhead.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    from: Point,
    to: Point,
    stroke: Option<StrokeDefinition>,
    arrow: bool,
}

impl Line {
    /// Creates a line with a default stroke and no arrowhead.
    pub fn new(from: Point, to: Point) -> Self {
        Self {
            from,
            to,
            stroke: Some(StrokeDefinition::default()),
            arrow: false,
        }
    }

    pub fn with_stroke(mut self, stroke: Option<StrokeDefinition>) -> Self {
        self.stroke = stroke;
        self
    }

    pub fn with_arrow(mut self, arrow: bool) -> Self {
        self.arrow = arrow;
        self
    }

    pub fn from(&self) -> Point {
        self.from
    }

    pub fn to(&self) -> Point {
        self.to
    }

    pub fn stroke(&self) -> Option<&StrokeDefinition> {
        self.stroke.as_ref()
    }

    pub fn has_arrow(&self) -> bool {
        self.arrow
    }
}

impl Drawable for Line {
    fn render_to_svg(&self) -> SvgNode {
        let line = svg_element::Line::new()
            .set("x1", self.from.x())
            .set("y1", self.from.y())
            .set("x2", self.to.x())
            .set("y2", self.to.y());
        let mut line = apply_optional_stroke!(line, self.stroke.as_ref());

        if self.arrow {
            line = line.set("marker-end", format!("url(#{ARROW_MARKER_ID})"));
        }

        Box::new(line)
    }

    fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing([self.from, self.to])
    }
}

/// Free-standing text anchored at a baseline point.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    position: Point,
    content: String,
    definition: TextDefinition,
}

impl Text {
    pub fn new(position: Point, content: impl Into<String>, definition: TextDefinition) -> Self {
        Self {
            position,
            content: content.into(),
            definition,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn definition(&self) -> &TextDefinition {
        &self.definition
    }
}

impl Drawable for Text {
    fn render_to_svg(&self) -> SvgNode {
        Box::new(self.definition.to_svg_element(&self.content, self.position))
    }

    fn bounds(&self) -> Option<Bounds> {
        Some(self.position.to_bounds(Size::default()))
    }
}

/// Raw SVG path data with fill and stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    data: String,
    fill: Option<Color>,
    stroke: Option<StrokeDefinition>,
}

impl Path {
    /// Creates an unfilled path with a default stroke.
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            fill: None,
            stroke: Some(StrokeDefinition::default()),
        }
    }

    /// A vertical cubic link from `from` to `to`, bending at the vertical
    /// midpoint so both ends leave their nodes vertically.
    pub fn vertical_curve(from: Point, to: Point) -> Self {
        let mid_y = (from.y() + to.y()) / 2.0;
        Self::new(format!(
            "M {} {} C {} {}, {} {}, {} {}",
            from.x(),
            from.y(),
            from.x(),
            mid_y,
            to.x(),
            mid_y,
            to.x(),
            to.y()
        ))
    }

    pub fn with_fill(mut self, fill: Option<Color>) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_stroke(mut self, stroke: Option<StrokeDefinition>) -> Self {
        self.stroke = stroke;
        self
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn stroke(&self) -> Option<&StrokeDefinition> {
        self.stroke.as_ref()
    }
}

impl Drawable for Path {
    fn render_to_svg(&self) -> SvgNode {
        let path = svg_element::Path::new().set("d", self.data.as_str());
        let path = apply_fill!(path, self.fill);
        let path = apply_optional_stroke!(path, self.stroke.as_ref());
        Box::new(path)
    }

    fn bounds(&self) -> Option<Bounds> {
        None
    }
}
