//! Icicle partition layout engine
//!
//! The canvas is cut into one horizontal band per depth level. The root
//! spans the whole first band and every node's width is split among its
//! children in proportion to their subtree weight, so each parent's area is
//! exactly the sum of its children's.

use log::debug;

use lucent_core::geometry::{Bounds, Insets, Size};

use crate::{
    error::RenderFailure,
    layout::{PartitionCell, PartitionLayout},
    structure::Hierarchy,
};

/// Partition layout engine.
#[derive(Debug, Clone)]
pub struct Engine {
    padding: f64,
}

impl Engine {
    /// Create a new partition layout engine
    pub fn new() -> Self {
        Self { padding: 0.0 }
    }

    /// Set the padding kept clear around the partition
    pub fn set_padding(&mut self, padding: f64) -> &mut Self {
        self.padding = padding;
        self
    }

    /// Computes one rectangle per node, in breadth-first order.
    ///
    /// # Errors
    ///
    /// Returns [`RenderFailure::MalformedDescriptor`] for a negative or
    /// non-finite leaf value.
    pub fn calculate(&self, hierarchy: &Hierarchy, size: Size) -> Result<PartitionLayout, RenderFailure> {
        let weights = hierarchy.weights()?;
        let area = Insets::uniform(self.padding).inner_bounds(size);
        let band = area.height() / (hierarchy.max_depth() + 1) as f64;

        // Horizontal extent of every node, indexed like the hierarchy.
        let mut spans = vec![(area.min_x(), area.max_x()); hierarchy.len()];

        // Pre-order visits a parent before its children.
        for (index, node) in hierarchy.nodes().iter().enumerate() {
            let (x0, x1) = spans[index];
            let children = node.children();
            let parent_weight = weights[index];
            let mut cursor = x0;

            for (position, &child) in children.iter().enumerate() {
                let share = if parent_weight > 0.0 {
                    weights[child] / parent_weight
                } else {
                    1.0 / children.len() as f64
                };
                let end = if position + 1 == children.len() {
                    x1
                } else {
                    cursor + (x1 - x0) * share
                };
                spans[child] = (cursor, end);
                cursor = end;
            }
        }

        let cells: Vec<PartitionCell> = hierarchy
            .breadth_first()
            .into_iter()
            .enumerate()
            .map(|(order, index)| {
                let node = &hierarchy.nodes()[index];
                let (x0, x1) = spans[index];
                let y0 = area.min_y() + node.depth() as f64 * band;
                PartitionCell::new(
                    node.key(),
                    node.label(),
                    node.depth(),
                    weights[index],
                    order,
                    Bounds::new(x0, y0, x1, y0 + band),
                )
            })
            .collect();

        debug!(
            cell_count = cells.len(),
            total_weight = weights.first().copied().unwrap_or(0.0);
            "Partition layout calculated"
        );
        Ok(PartitionLayout::new(cells))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::{approx_eq, assert_approx_eq};
    use proptest::prelude::*;

    use crate::{descriptor::WeightedNode, error::FailureKind};

    use super::*;

    fn canvas() -> Size {
        Size::new(400.0, 300.0)
    }

    fn layout(root: &WeightedNode) -> PartitionLayout {
        let hierarchy = Hierarchy::from_root(root).unwrap();
        Engine::new().calculate(&hierarchy, canvas()).unwrap()
    }

    #[test]
    fn test_one_to_three_split() {
        let root = WeightedNode::branch(
            "root",
            vec![WeightedNode::leaf("small", 1.0), WeightedNode::leaf("large", 3.0)],
        );
        let partition = layout(&root);

        let root_cell = partition.cell("root").unwrap();
        assert_eq!(root_cell.bounds(), Bounds::new(0.0, 0.0, 400.0, 150.0));

        let small = partition.cell("small").unwrap().bounds();
        let large = partition.cell("large").unwrap().bounds();
        assert_approx_eq!(f64, large.area() / small.area(), 3.0);
        assert_approx_eq!(f64, small.width(), 100.0);
        assert_approx_eq!(f64, large.max_x(), 400.0);
    }

    #[test]
    fn test_cells_in_breadth_first_order() {
        let root = WeightedNode::branch(
            "r",
            vec![
                WeightedNode::branch("a", vec![WeightedNode::leaf("a1", 1.0)]),
                WeightedNode::leaf("b", 1.0),
            ],
        );
        let partition = layout(&root);
        let labels: Vec<_> = partition.cells().iter().map(PartitionCell::label).collect();
        assert_eq!(labels, ["r", "a", "b", "a1"]);

        let indices: Vec<_> = partition.cells().iter().map(PartitionCell::index).collect();
        assert_eq!(indices, [0, 1, 2, 3]);
        assert_eq!(partition.cell("a1").unwrap().depth(), 2);
        assert_approx_eq!(f64, partition.cell("a1").unwrap().bounds().height(), 100.0);
    }

    #[test]
    fn test_zero_weight_children_split_evenly() {
        let root = WeightedNode::branch(
            "root",
            vec![
                WeightedNode::leaf("a", 0.0),
                WeightedNode::leaf("b", 0.0),
                WeightedNode::leaf("c", 0.0),
                WeightedNode::leaf("d", 0.0),
            ],
        );
        let partition = layout(&root);
        for id in ["a", "b", "c", "d"] {
            assert_approx_eq!(f64, partition.cell(id).unwrap().bounds().width(), 100.0);
        }
    }

    #[test]
    fn test_single_node_fills_canvas() {
        let partition = layout(&WeightedNode::leaf("all", 5.0));
        assert_eq!(
            partition.cells()[0].bounds(),
            Bounds::new(0.0, 0.0, 400.0, 300.0)
        );
    }

    #[test]
    fn test_padding_shrinks_area() {
        let hierarchy = Hierarchy::from_root(&WeightedNode::leaf("x", 1.0)).unwrap();
        let mut engine = Engine::new();
        engine.set_padding(10.0);
        let partition = engine.calculate(&hierarchy, canvas()).unwrap();
        assert_eq!(
            partition.cells()[0].bounds(),
            Bounds::new(10.0, 10.0, 390.0, 290.0)
        );
    }

    #[test]
    fn test_negative_value_fails() {
        let root = WeightedNode::branch("root", vec![WeightedNode::leaf("neg", -2.0)]);
        let hierarchy = Hierarchy::from_root(&root).unwrap();
        let err = Engine::new().calculate(&hierarchy, canvas()).unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedDescriptor);
    }

    fn arb_hierarchy() -> impl Strategy<Value = WeightedNode> {
        let leaf = (0.0f64..1000.0).prop_map(|value| WeightedNode::leaf("leaf", value));
        leaf.prop_recursive(4, 64, 6, |inner| {
            prop::collection::vec(inner, 1..6).prop_map(|children| WeightedNode::branch("node", children))
        })
    }

    proptest! {
        #[test]
        fn prop_children_conserve_parent_area(root in arb_hierarchy()) {
            let hierarchy = Hierarchy::from_root(&root).unwrap();
            let partition = Engine::new().calculate(&hierarchy, canvas()).unwrap();
            let order = hierarchy.breadth_first();

            // Cell `k` is node `order[k]`; map arena index back to its cell.
            let mut cell_of = vec![0; hierarchy.len()];
            for (cell, &index) in order.iter().enumerate() {
                cell_of[index] = cell;
            }

            for (index, node) in hierarchy.nodes().iter().enumerate() {
                if node.is_leaf() {
                    continue;
                }
                let parent = partition.cells()[cell_of[index]].bounds().area();
                let children: f64 = node
                    .children()
                    .iter()
                    .map(|&child| partition.cells()[cell_of[child]].bounds().area())
                    .sum();
                prop_assert!(
                    approx_eq!(f64, parent, children, epsilon = parent.abs() * 1e-6 + 1e-9),
                    "parent {parent} children {children}"
                );
            }
        }

        #[test]
        fn prop_children_tile_parent_width(root in arb_hierarchy()) {
            let hierarchy = Hierarchy::from_root(&root).unwrap();
            let partition = Engine::new().calculate(&hierarchy, canvas()).unwrap();
            let order = hierarchy.breadth_first();

            let mut cell_of = vec![0; hierarchy.len()];
            for (cell, &index) in order.iter().enumerate() {
                cell_of[index] = cell;
            }
            let bounds_of = |index: usize| partition.cells()[cell_of[index]].bounds();
            let tolerance = 1e-6;

            for (index, node) in hierarchy.nodes().iter().enumerate() {
                let children = node.children();
                let (Some(&first), Some(&last)) = (children.first(), children.last()) else {
                    continue;
                };
                let parent = bounds_of(index);

                prop_assert!(approx_eq!(f64, bounds_of(first).min_x(), parent.min_x(), epsilon = tolerance));
                prop_assert!(approx_eq!(f64, bounds_of(last).max_x(), parent.max_x(), epsilon = tolerance));

                for &child in children {
                    let cell = bounds_of(child);
                    prop_assert!(cell.width() >= -tolerance, "{cell:?}");
                    prop_assert!(cell.min_x() >= parent.min_x() - tolerance, "{cell:?} outside {parent:?}");
                    prop_assert!(cell.max_x() <= parent.max_x() + tolerance, "{cell:?} outside {parent:?}");
                }

                // Consecutive siblings meet edge to edge, so none overlap.
                for pair in children.windows(2) {
                    let prev = bounds_of(pair[0]);
                    let next = bounds_of(pair[1]);
                    prop_assert!(
                        approx_eq!(f64, prev.max_x(), next.min_x(), epsilon = tolerance),
                        "{prev:?} then {next:?}"
                    );
                }
            }
        }
    }
}
