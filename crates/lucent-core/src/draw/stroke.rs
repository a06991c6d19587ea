//! Stroke and line-style definitions.
//!
//! Exported types:
//! - [`StrokeDefinition`]: color, width and dash style of a stroke
//! - [`StrokeStyle`]: line pattern (solid, dashed, dotted, custom dasharray)
//! - [`apply_stroke!`](crate::apply_stroke!): applies a stroke to an SVG element
//!
//! # SVG Attribute Mapping
//!
//! | Rust Property | SVG Attribute | Example Values |
//! |--------------|---------------|----------------|
//! | `color` | `stroke`, `stroke-opacity` | `"#000000"`, `0.5` |
//! | `width` | `stroke-width` | `2.0` |
//! | `style` | `stroke-dasharray` | `"5,5"`, `"10,5,2,5"` |

use std::str::FromStr;

use crate::color::Color;

/// Defines the visual style of a stroke, including dash patterns.
///
/// - `Solid`: No dasharray attribute
/// - `Dashed`: "5,5"
/// - `Dotted`: "2,3"
/// - `Custom(pattern)`: Uses the provided pattern string
#[derive(Debug, Default, Clone, PartialEq)]
pub enum StrokeStyle {
    /// Solid continuous line (default)
    #[default]
    Solid,
    /// Dashed line with equal dash and gap lengths (5px dash, 5px gap)
    Dashed,
    /// Dotted line with small dots (2px dot, 3px gap)
    Dotted,
    /// Custom SVG dasharray pattern, e.g. "10,5,2,3"
    Custom(String),
}

impl FromStr for StrokeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            "" => Err("empty stroke style".to_string()),
            pattern => parse_dasharray(pattern).map(|()| Self::Custom(pattern.trim().to_string())),
        }
    }
}

/// Checks that `pattern` is a comma- or space-separated list of
/// non-negative dash lengths.
fn parse_dasharray(pattern: &str) -> Result<(), String> {
    let mut lengths = pattern
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .peekable();
    if lengths.peek().is_none() {
        return Err(format!("stroke style `{pattern}` has no dash lengths"));
    }

    for part in lengths {
        match part.parse::<f64>() {
            Ok(length) if length.is_finite() && length >= 0.0 => {}
            _ => {
                return Err(format!(
                    "invalid dash length `{part}` in stroke style `{pattern}`"
                ));
            }
        }
    }
    Ok(())
}

impl StrokeStyle {
    /// Returns the SVG dasharray value for this style, or None for solid lines
    pub fn to_svg_value(&self) -> Option<String> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("5,5".to_string()),
            Self::Dotted => Some("2,3".to_string()),
            Self::Custom(pattern) => Some(pattern.clone()),
        }
    }
}

/// A stroke definition for rendering lines and borders.
///
/// ```
/// use lucent_core::draw::{StrokeDefinition, StrokeStyle};
/// use lucent_core::color::Color;
///
/// let stroke = StrokeDefinition::solid(Color::new("red").unwrap(), 2.0);
/// assert_eq!(*stroke.style(), StrokeStyle::Solid);
///
/// let dashed = StrokeDefinition::dashed(Color::new("blue").unwrap(), 1.5);
/// assert_eq!(dashed.style().to_svg_value().as_deref(), Some("5,5"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f64,
    style: StrokeStyle,
}

impl StrokeDefinition {
    /// Creates a new solid stroke with the given color and width.
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    /// Creates a solid stroke (convenience constructor).
    pub fn solid(color: Color, width: f64) -> Self {
        Self::new(color, width)
    }

    /// Creates a dashed stroke (convenience constructor).
    pub fn dashed(color: Color, width: f64) -> Self {
        let mut stroke = Self::new(color, width);
        stroke.set_style(StrokeStyle::Dashed);
        stroke
    }

    /// Returns the stroke color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the stroke width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the stroke style.
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Sets the stroke style.
    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self {
            color: Color::default(),
            width: 1.0,
            style: StrokeStyle::default(),
        }
    }
}

/// Apply all stroke attributes to an SVG element.
///
/// Applies color, opacity, width and the dash pattern (if not solid).
///
/// ```
/// use lucent_core::draw::StrokeDefinition;
/// use lucent_core::color::Color;
/// use svg::node::element as svg_element;
///
/// let stroke = StrokeDefinition::solid(Color::new("black").unwrap(), 2.0);
/// let rect = svg_element::Rectangle::new().set("x", 0).set("y", 0);
/// let rect = lucent_core::apply_stroke!(rect, &stroke);
/// ```
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let mut elem = $element
            .set("stroke", $stroke.color().to_string())
            .set("stroke-opacity", $stroke.color().alpha())
            .set("stroke-width", $stroke.width());

        if let Some(dasharray) = $stroke.style().to_svg_value() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}
