//! The finished, drawing-surface independent output of a render.

use crate::{
    draw::{Drawable, LayeredOutput, Primitive, PrimitiveKind},
    geometry::{Bounds, Point, Size},
};

/// An ordered list of primitives on a canvas of a given size.
///
/// A scene is an inert value: it is produced fresh by every render call, owned
/// by the caller and never mutated by the pipeline afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    size: Size,
    primitives: Vec<Primitive>,
}

impl Scene {
    /// Creates a scene that draws `primitives` in the given order.
    pub fn new(size: Size, primitives: Vec<Primitive>) -> Self {
        Self { size, primitives }
    }

    /// Creates a scene from layered output, flattening layers bottom-to-top.
    pub fn from_layers(size: Size, output: LayeredOutput) -> Self {
        Self::new(size, output.into_primitives())
    }

    /// Returns the canvas size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns the primitives in drawing order.
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Returns the number of primitives.
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Returns `true` if the scene draws nothing.
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Counts the primitives of one kind.
    pub fn count(&self, kind: PrimitiveKind) -> usize {
        self.primitives.iter().filter(|p| p.kind() == kind).count()
    }

    /// Returns `true` if any line ends in an arrowhead.
    pub fn has_arrows(&self) -> bool {
        self.primitives
            .iter()
            .any(|p| matches!(p, Primitive::Line(line) if line.has_arrow()))
    }

    /// Returns `true` if every primitive with known extent lies inside the
    /// canvas, with `tolerance` of slack on every edge.
    pub fn fits_canvas(&self, tolerance: f64) -> bool {
        let canvas = Bounds::new_from_top_left(Point::default(), self.size);
        self.primitives
            .iter()
            .filter_map(|primitive| primitive.bounds())
            .all(|bounds| canvas.contains(&bounds, tolerance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{Circle, Line, RenderLayer};

    fn sample_scene() -> Scene {
        let mut output = LayeredOutput::new();
        output.add_to_layer(
            RenderLayer::Content,
            Primitive::Circle(Circle::new(Point::new(20.0, 20.0), 10.0)),
        );
        output.add_to_layer(
            RenderLayer::Link,
            Primitive::Line(Line::new(Point::new(20.0, 20.0), Point::new(80.0, 60.0)).with_arrow(true)),
        );
        Scene::from_layers(Size::new(100.0, 100.0), output)
    }

    #[test]
    fn test_scene_counts() {
        let scene = sample_scene();
        assert_eq!(scene.len(), 2);
        assert!(!scene.is_empty());
        assert_eq!(scene.count(PrimitiveKind::Circle), 1);
        assert_eq!(scene.count(PrimitiveKind::Line), 1);
        assert_eq!(scene.count(PrimitiveKind::Rect), 0);
        assert!(matches!(scene.primitives()[0], Primitive::Line(_)));
    }

    #[test]
    fn test_scene_has_arrows() {
        assert!(sample_scene().has_arrows());
        assert!(!Scene::new(Size::new(1.0, 1.0), Vec::new()).has_arrows());
    }

    #[test]
    fn test_scene_fits_canvas() {
        assert!(sample_scene().fits_canvas(0.0));

        let overflowing = Scene::new(
            Size::new(100.0, 100.0),
            vec![Primitive::Circle(Circle::new(Point::new(95.0, 50.0), 10.0))],
        );
        assert!(!overflowing.fits_canvas(0.0));
        assert!(overflowing.fits_canvas(5.0));
    }
}
