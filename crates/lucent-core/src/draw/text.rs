//! Text definitions for labels and free-standing text.
//!
//! - [`TextDefinition`] - Reusable text style (color, size, weight, anchor)
//! - [`Label`] - Text centred on the shape that owns it

use std::str::FromStr;

use svg::node::element as svg_element;

use crate::{color::Color, geometry::Point};

/// Horizontal alignment of text relative to its anchor point.
///
/// Maps directly to the SVG `text-anchor` attribute.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    /// Returns the SVG text-anchor value
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

impl FromStr for TextAnchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "middle" => Ok(Self::Middle),
            "end" => Ok(Self::End),
            _ => Err(format!(
                "invalid text anchor `{s}`, valid values: start, middle, end"
            )),
        }
    }
}

/// Defines the visual style for text.
///
/// | Property | Default |
/// |----------|---------|
/// | Font family | `"Arial, sans-serif"` |
/// | Font size | `14` |
/// | Font weight | `"normal"` |
/// | Color | black |
/// | Anchor | start |
#[derive(Debug, Clone, PartialEq)]
pub struct TextDefinition {
    font_family: String,
    font_size: f64,
    font_weight: String,
    color: Color,
    anchor: TextAnchor,
}

impl TextDefinition {
    /// Creates a text definition with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn font_weight(&self) -> &str {
        &self.font_weight
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn anchor(&self) -> TextAnchor {
        self.anchor
    }

    pub fn set_font_family(&mut self, family: impl Into<String>) {
        self.font_family = family.into();
    }

    pub fn set_font_size(&mut self, size: f64) {
        self.font_size = size;
    }

    pub fn set_font_weight(&mut self, weight: impl Into<String>) {
        self.font_weight = weight.into();
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_anchor(&mut self, anchor: TextAnchor) {
        self.anchor = anchor;
    }

    /// Builds an SVG `<text>` element at `position` carrying this style.
    pub(crate) fn to_svg_element(&self, content: &str, position: Point) -> svg_element::Text {
        svg_element::Text::new(content)
            .set("x", position.x())
            .set("y", position.y())
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size)
            .set("font-weight", self.font_weight.as_str())
            .set("text-anchor", self.anchor.to_svg_value())
            .set("fill", self.color.to_string())
            .set("fill-opacity", self.color.alpha())
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font_family: "Arial, sans-serif".to_string(),
            font_size: 14.0,
            font_weight: "normal".to_string(),
            color: Color::default(),
            anchor: TextAnchor::Start,
        }
    }
}

/// Text owned by a shape and drawn centred on it.
///
/// The anchor of the definition is ignored; labels are always centred both
/// horizontally and vertically on the owning shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    content: String,
    definition: TextDefinition,
}

impl Label {
    pub fn new(content: impl Into<String>, definition: TextDefinition) -> Self {
        Self {
            content: content.into(),
            definition,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn definition(&self) -> &TextDefinition {
        &self.definition
    }

    /// Renders the label centred on `center`.
    pub(crate) fn render_at(&self, center: Point) -> svg_element::Text {
        self.definition
            .to_svg_element(&self.content, center)
            .set("text-anchor", TextAnchor::Middle.to_svg_value())
            .set("dominant-baseline", "central")
    }
}
