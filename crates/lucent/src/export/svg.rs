//! SVG export of scenes.

use log::debug;
use svg::{Document, node::element as svg_element};

use lucent_core::{
    color::Color,
    draw::{ARROW_MARKER_ID, Drawable, Scene},
};

use crate::export::{self, Exporter};

/// Builder for configuring an [`Svg`] exporter.
#[derive(Debug, Clone, Default)]
pub struct SvgBuilder {
    arrow_fill: Option<Color>,
}

impl SvgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fill of the arrowhead marker
    pub fn with_arrow_fill(mut self, color: Color) -> Self {
        self.arrow_fill = Some(color);
        self
    }

    pub fn build(self) -> Svg {
        Svg {
            arrow_fill: self.arrow_fill.unwrap_or_else(|| {
                Color::new("#6b7280").expect("'#6b7280' is a valid CSS color")
            }),
        }
    }
}

/// SVG exporter.
#[derive(Debug, Clone)]
pub struct Svg {
    arrow_fill: Color,
}

impl Svg {
    /// Renders `scene` to an SVG document sized to its canvas.
    pub fn render_document(&self, scene: &Scene) -> Document {
        let size = scene.size();
        let mut doc = Document::new()
            .set("viewBox", format!("0 0 {} {}", size.width(), size.height()))
            .set("width", size.width())
            .set("height", size.height());

        if scene.has_arrows() {
            doc = doc.add(self.marker_definitions());
        }

        for primitive in scene.primitives() {
            doc = doc.add(primitive.render_to_svg());
        }

        debug!(primitives = scene.len(); "SVG document rendered");
        doc
    }

    /// The `<defs>` block holding the arrowhead marker.
    fn marker_definitions(&self) -> svg_element::Definitions {
        let head = svg_element::Polygon::new()
            .set("points", "0 0, 10 3.5, 0 7")
            .set("fill", self.arrow_fill.to_string());
        let marker = svg_element::Marker::new()
            .set("id", ARROW_MARKER_ID)
            .set("markerWidth", 10)
            .set("markerHeight", 7)
            .set("refX", 9)
            .set("refY", 3.5)
            .set("orient", "auto")
            .add(head);
        svg_element::Definitions::new().add(marker)
    }
}

impl Exporter for Svg {
    fn export_scene(&self, scene: &Scene) -> Result<String, export::Error> {
        if !scene.size().is_drawable() {
            return Err(export::Error::Render(format!(
                "canvas {}x{} is not drawable",
                scene.size().width(),
                scene.size().height()
            )));
        }
        Ok(self.render_document(scene).to_string())
    }
}
