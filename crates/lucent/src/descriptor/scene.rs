//! Explicit vector scenes.
//!
//! Each element is tagged by `type`. Elements of unknown type deserialize to
//! [`SceneElement::Unknown`] and are skipped by the scene builder.

use serde::Deserialize;

use crate::error::RenderFailure;

/// An explicit scene: optional canvas size plus ordered elements.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub elements: Vec<SceneElement>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SceneElement {
    Rect(RectElement),
    Circle(CircleElement),
    Line(LineElement),
    Text(TextElement),
    Path(PathElement),
    #[serde(other)]
    Unknown,
}

impl SceneElement {
    /// Returns the element's `type` tag, or `None` for unknown elements.
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            Self::Rect(_) => Some("rect"),
            Self::Circle(_) => Some("circle"),
            Self::Line(_) => Some("line"),
            Self::Text(_) => Some("text"),
            Self::Path(_) => Some("path"),
            Self::Unknown => None,
        }
    }

    /// Checks geometry: coordinates must be finite, sizes non-negative.
    pub(crate) fn check_geometry(&self) -> Result<(), RenderFailure> {
        match self {
            Self::Rect(rect) => {
                finite("rect", &[rect.x, rect.y])?;
                non_negative("rect", "width", rect.width)?;
                non_negative("rect", "height", rect.height)?;
                if let Some(rx) = rect.rx {
                    non_negative("rect", "rx", rx)?;
                }
                check_stroke_width("rect", rect.stroke_width)
            }
            Self::Circle(circle) => {
                finite("circle", &[circle.cx, circle.cy])?;
                non_negative("circle", "r", circle.r)?;
                check_stroke_width("circle", circle.stroke_width)
            }
            Self::Line(line) => {
                finite("line", &[line.x1, line.y1, line.x2, line.y2])?;
                check_stroke_width("line", line.stroke_width)
            }
            Self::Text(text) => {
                finite("text", &[text.x, text.y])?;
                match text.font_size {
                    Some(size) if !(size.is_finite() && size > 0.0) => Err(
                        RenderFailure::malformed(format!("text fontSize {size} must be positive")),
                    ),
                    _ => Ok(()),
                }
            }
            Self::Path(path) => {
                if path.d.trim().is_empty() {
                    return Err(RenderFailure::malformed("path `d` must not be empty"));
                }
                check_stroke_width("path", path.stroke_width)
            }
            Self::Unknown => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectElement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rx: Option<f64>,
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: Option<f64>,
    #[serde(default)]
    pub stroke_dasharray: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleElement {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: Option<f64>,
    #[serde(default)]
    pub stroke_dasharray: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineElement {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: Option<f64>,
    #[serde(default)]
    pub stroke_dasharray: Option<String>,
    #[serde(default)]
    pub arrow: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub x: f64,
    pub y: f64,
    #[serde(alias = "content")]
    pub text: String,
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub text_anchor: Option<String>,
    #[serde(default)]
    pub font_weight: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathElement {
    pub d: String,
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: Option<f64>,
    #[serde(default)]
    pub stroke_dasharray: Option<String>,
}

fn finite(element: &str, values: &[f64]) -> Result<(), RenderFailure> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(RenderFailure::malformed(format!(
            "{element} coordinates must be finite"
        )))
    }
}

fn non_negative(element: &str, field: &str, value: f64) -> Result<(), RenderFailure> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RenderFailure::malformed(format!(
            "{element} `{field}` must be non-negative, got {value}"
        )))
    }
}

fn check_stroke_width(element: &str, width: Option<f64>) -> Result<(), RenderFailure> {
    match width {
        Some(width) => non_negative(element, "strokeWidth", width),
        None => Ok(()),
    }
}
