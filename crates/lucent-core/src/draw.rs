//! Drawing vocabulary shared by every Lucent scene.
//!
//! A [`Scene`] is an ordered list of [`Primitive`]s. Each primitive is
//! self-contained (geometry plus resolved style) and knows how to render
//! itself as an SVG node through the [`Drawable`] trait; nothing here depends
//! on a particular drawing surface beyond that conversion.

mod layer;
mod primitive;
mod scene;
mod stroke;
mod text;

pub use layer::{LayeredOutput, RenderLayer};
pub use primitive::{ARROW_MARKER_ID, Circle, Line, Path, Primitive, PrimitiveKind, Rect, Text};
pub use scene::Scene;
pub use stroke::{StrokeDefinition, StrokeStyle};
pub use text::{Label, TextAnchor, TextDefinition};

use crate::geometry::Bounds;

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// Anything that can be turned into a single SVG node.
pub trait Drawable {
    /// Renders this element to one SVG node (possibly a group).
    fn render_to_svg(&self) -> SvgNode;

    /// The axis-aligned area covered by the element's geometry, excluding
    /// stroke width. `None` when the extent is not known (raw path data).
    fn bounds(&self) -> Option<Bounds>;
}
