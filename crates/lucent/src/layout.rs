//! Layout results and the engines that compute them.
//!
//! Tree and force layouts produce a [`LayoutResult`] (positioned nodes plus
//! resolved links); the partition layout produces a [`PartitionLayout`]
//! (one rectangle per node). Both are plain values with no hidden state.

pub mod engines;

pub use engines::{EngineBuilder, Engines};

use lucent_core::geometry::{Bounds, Point};

use crate::error::RenderFailure;

/// A node placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    id: String,
    label: String,
    position: Point,
    depth: Option<usize>,
}

impl PositionedNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, position: Point) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            position,
            depth: None,
        }
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Tree depth; `None` for layouts without a notion of depth.
    pub fn depth(&self) -> Option<usize> {
        self.depth
    }
}

/// A link between two positioned nodes with its endpoints resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutLink {
    source: usize,
    target: usize,
    from: Point,
    to: Point,
}

impl LayoutLink {
    pub fn source(&self) -> usize {
        self.source
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn from(&self) -> Point {
        self.from
    }

    pub fn to(&self) -> Point {
        self.to
    }
}

/// How a simulated layout finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Convergence {
    ticks: usize,
    converged: bool,
}

impl Convergence {
    pub fn new(ticks: usize, converged: bool) -> Self {
        Self { ticks, converged }
    }

    /// Ticks actually run.
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// `false` when the run stopped at the tick cap.
    pub fn converged(&self) -> bool {
        self.converged
    }
}

/// Positioned nodes and resolved links.
///
/// Every link refers to nodes present in the result; that is checked when
/// the result is built.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    nodes: Vec<PositionedNode>,
    links: Vec<LayoutLink>,
    convergence: Option<Convergence>,
}

impl LayoutResult {
    /// Builds a result, resolving each `(source, target)` pair to the
    /// positions of those nodes.
    ///
    /// # Errors
    ///
    /// Returns [`RenderFailure::Internal`] if a pair names a node index that
    /// does not exist.
    pub fn new(
        nodes: Vec<PositionedNode>,
        edges: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<Self, RenderFailure> {
        let links = edges
            .into_iter()
            .map(|(source, target)| match (nodes.get(source), nodes.get(target)) {
                (Some(from), Some(to)) => Ok(LayoutLink {
                    source,
                    target,
                    from: from.position,
                    to: to.position,
                }),
                _ => Err(RenderFailure::Internal(format!(
                    "link {source} -> {target} refers to a missing node"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            nodes,
            links,
            convergence: None,
        })
    }

    pub fn with_convergence(mut self, convergence: Convergence) -> Self {
        self.convergence = Some(convergence);
        self
    }

    pub fn nodes(&self) -> &[PositionedNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[LayoutLink] {
        &self.links
    }

    /// Present for simulated layouts only.
    pub fn convergence(&self) -> Option<Convergence> {
        self.convergence
    }

    /// Returns the position of the node with `id`.
    pub fn position_of(&self, id: &str) -> Option<Point> {
        self.nodes
            .iter()
            .find(|node| node.id == id)
            .map(|node| node.position)
    }
}

/// One rectangle of a partition layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionCell {
    id: String,
    label: String,
    depth: usize,
    weight: f64,
    index: usize,
    bounds: Bounds,
}

impl PartitionCell {
    pub(crate) fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        depth: usize,
        weight: f64,
        index: usize,
        bounds: Bounds,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            depth,
            weight,
            index,
            bounds,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Sum of leaf values beneath this cell.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Breadth-first index, used for palette selection.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// Cells of a partition layout in breadth-first order.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionLayout {
    cells: Vec<PartitionCell>,
}

impl PartitionLayout {
    pub(crate) fn new(cells: Vec<PartitionCell>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[PartitionCell] {
        &self.cells
    }

    pub fn cell(&self, id: &str) -> Option<&PartitionCell> {
        self.cells.iter().find(|cell| cell.id == id)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::FailureKind;

    use super::*;

    fn nodes() -> Vec<PositionedNode> {
        vec![
            PositionedNode::new("a", "A", Point::new(10.0, 10.0)),
            PositionedNode::new("b", "B", Point::new(50.0, 90.0)).with_depth(1),
        ]
    }

    #[test]
    fn test_links_resolve_to_node_positions() {
        let result = LayoutResult::new(nodes(), [(0, 1)]).unwrap();
        let link = result.links()[0];
        assert_eq!(link.from(), Point::new(10.0, 10.0));
        assert_eq!(link.to(), Point::new(50.0, 90.0));
        assert_eq!(result.position_of("b"), Some(Point::new(50.0, 90.0)));
        assert_eq!(result.nodes()[1].depth(), Some(1));
        assert!(result.convergence().is_none());
    }

    #[test]
    fn test_link_to_missing_node_is_internal_error() {
        let err = LayoutResult::new(nodes(), [(0, 7)]).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Internal);
    }
}
