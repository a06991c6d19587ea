//! Tidy tree layout engine
//!
//! Leaves take consecutive unit slots in visitation order and every parent
//! sits midway between its first and last child. The slot space is then
//! stretched over the canvas inside a uniform margin, with depth mapped to
//! evenly spaced rows.

use log::debug;

use lucent_core::geometry::{Point, Size};

use crate::{
    error::RenderFailure,
    layout::{LayoutResult, PositionedNode},
    structure::Hierarchy,
};

/// Tree layout engine.
#[derive(Debug, Clone)]
pub struct Engine {
    margin: f64,
}

impl Engine {
    /// Create a new tree layout engine
    pub fn new() -> Self {
        Self { margin: 50.0 }
    }

    /// Set the margin kept clear on every side of the canvas
    pub fn set_margin(&mut self, margin: f64) -> &mut Self {
        self.margin = margin;
        self
    }

    /// Positions every node of `hierarchy` on a canvas of `size`.
    ///
    /// Output is a pure function of the input: equal hierarchies and sizes
    /// give identical results.
    pub fn calculate(&self, hierarchy: &Hierarchy, size: Size) -> Result<LayoutResult, RenderFailure> {
        let raw_x = self.slot_positions(hierarchy);
        let max_raw = raw_x.iter().copied().fold(0.0, f64::max);
        let max_depth = hierarchy.max_depth();

        let nodes = hierarchy
            .nodes()
            .iter()
            .zip(&raw_x)
            .map(|(node, &raw)| {
                let x = self.scale(raw, max_raw, size.width());
                let y = self.scale(node.depth() as f64, max_depth as f64, size.height());
                PositionedNode::new(node.key(), node.label(), Point::new(x, y))
                    .with_depth(node.depth())
            })
            .collect();

        let result = LayoutResult::new(nodes, hierarchy.parent_links())?;
        debug!(
            node_count = result.nodes().len(),
            link_count = result.links().len(),
            max_depth = max_depth;
            "Tree layout calculated"
        );
        Ok(result)
    }

    /// Horizontal positions in slot units, indexed like the hierarchy.
    fn slot_positions(&self, hierarchy: &Hierarchy) -> Vec<f64> {
        let nodes = hierarchy.nodes();
        let mut raw_x = vec![0.0; nodes.len()];

        for (slot, leaf) in hierarchy.leaves().enumerate() {
            raw_x[leaf] = slot as f64;
        }

        // Pre-order puts children after their parent, so walking backwards
        // places every child before its parent needs it.
        for (index, node) in nodes.iter().enumerate().rev() {
            if let (Some(&first), Some(&last)) = (node.children().first(), node.children().last()) {
                raw_x[index] = (raw_x[first] + raw_x[last]) / 2.0;
            }
        }

        raw_x
    }

    /// Maps `raw` in `[0, max_raw]` onto `[margin, extent - margin]`.
    ///
    /// Collapses onto the centre line when there is nothing to spread or no
    /// room to spread it in.
    fn scale(&self, raw: f64, max_raw: f64, extent: f64) -> f64 {
        let span = extent - 2.0 * self.margin;
        if max_raw <= 0.0 || span <= 0.0 {
            extent / 2.0
        } else {
            self.margin + raw / max_raw * span
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
