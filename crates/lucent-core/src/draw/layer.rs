//! Render layers for z-ordering scene primitives.
//!
//! Builders push primitives into a [`LayeredOutput`] tagged with a
//! [`RenderLayer`]; flattening the output yields primitives bottom-to-top,
//! keeping insertion order within each layer.
//!
//! # Example
//!
//! ```
//! # use lucent_core::draw::{Circle, Line, LayeredOutput, Primitive, RenderLayer};
//! # use lucent_core::geometry::Point;
//! let mut output = LayeredOutput::new();
//!
//! let node = Circle::new(Point::new(10.0, 10.0), 5.0);
//! output.add_to_layer(RenderLayer::Content, Primitive::Circle(node));
//!
//! // Added later, but drawn first.
//! let link = Line::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
//! output.add_to_layer(RenderLayer::Link, Primitive::Line(link));
//!
//! let primitives = output.into_primitives();
//! assert!(matches!(primitives[0], Primitive::Line(_)));
//! ```

use crate::draw::Primitive;

/// Defines the rendering layers of a scene.
///
/// Layers are rendered from bottom to top in the order defined by variant
/// declaration (the derived `Ord`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Background fills - renders first
    Background,
    /// Links and edges between nodes
    Link,
    /// Nodes, cells and explicit scene elements - default layer
    Content,
    /// Messages drawn above everything else
    Overlay,
}

/// Primitives grouped by rendering layer.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, Primitive)>,
}

impl LayeredOutput {
    /// Creates a new empty `LayeredOutput`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single primitive to the specified layer.
    pub fn add_to_layer(&mut self, layer: RenderLayer, primitive: Primitive) {
        self.items.push((layer, primitive));
    }

    /// Returns `true` if there are no primitives in any layer.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of primitives across all layers.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Flattens all layers bottom-to-top, consuming the output.
    ///
    /// The sort is stable, so primitives of one layer keep the order in which
    /// they were added.
    pub fn into_primitives(self) -> Vec<Primitive> {
        let mut items = self.items;
        items.sort_by_key(|(layer, _)| *layer);
        items.into_iter().map(|(_, primitive)| primitive).collect()
    }
}
