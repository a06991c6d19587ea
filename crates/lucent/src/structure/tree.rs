//! Rooted trees flattened into a pre-order arena.

use std::collections::{HashSet, VecDeque};

use log::trace;

use crate::{
    descriptor::{TreeNode, WeightedNode},
    error::RenderFailure,
};

/// Read access to a nested tree node, so tree and weighted payloads share
/// one flattening routine.
pub trait Hierarchical: Sized {
    fn name(&self) -> &str;
    fn id(&self) -> Option<&str>;
    fn children(&self) -> &[Self];

    /// The leaf weight, if the node carries one.
    fn value(&self) -> Option<f64> {
        None
    }
}

impl Hierarchical for TreeNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

impl Hierarchical for WeightedNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn value(&self) -> Option<f64> {
        self.value
    }
}

/// One node of a [`Hierarchy`].
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyNode {
    label: String,
    id: Option<String>,
    depth: usize,
    parent: Option<usize>,
    children: Vec<usize>,
    value: Option<f64>,
}

impl HierarchyNode {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The identifier used in layout output: the explicit id, or the label.
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.label)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Arena indices of the children, in input order.
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A rooted tree stored in pre-order: index 0 is the root and every node
/// comes before its descendants.
#[derive(Debug, Clone, PartialEq)]
pub struct Hierarchy {
    nodes: Vec<HierarchyNode>,
}

impl Hierarchy {
    /// Flattens a nested tree.
    ///
    /// Traversal is iterative, so depth is bounded by memory rather than
    /// the call stack.
    ///
    /// # Errors
    ///
    /// Returns [`RenderFailure::MalformedDescriptor`] when the same node `id`
    /// is reached twice, which is how a self-reference or shared child shows
    /// up in owned data.
    pub fn from_root<N: Hierarchical>(root: &N) -> Result<Self, RenderFailure> {
        let mut nodes: Vec<HierarchyNode> = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        // (node, parent index, depth)
        let mut stack: Vec<(&N, Option<usize>, usize)> = vec![(root, None, 0)];

        while let Some((node, parent, depth)) = stack.pop() {
            if let Some(id) = node.id() {
                if !visited.insert(id) {
                    return Err(RenderFailure::malformed(format!(
                        "tree node `{id}` is reached more than once; children must form a tree"
                    )));
                }
            }

            let index = nodes.len();
            if let Some(parent) = parent {
                nodes[parent].children.push(index);
            }
            nodes.push(HierarchyNode {
                label: node.name().to_string(),
                id: node.id().map(str::to_string),
                depth,
                parent,
                children: Vec::new(),
                value: node.value(),
            });

            // Reverse so the first child is popped, and numbered, first.
            for child in node.children().iter().rev() {
                stack.push((child, Some(index), depth + 1));
            }
        }

        trace!(node_count = nodes.len(); "Hierarchy flattened");
        Ok(Self { nodes })
    }

    /// All nodes in pre-order.
    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Indices of all leaves in pre-order (visitation order).
    pub fn leaves(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_leaf())
            .map(|(index, _)| index)
    }

    /// `(parent, child)` pairs in pre-order of the child.
    pub fn parent_links(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| node.parent.map(|parent| (parent, index)))
    }

    /// Arena indices in breadth-first order.
    pub fn breadth_first(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut queue: VecDeque<usize> = VecDeque::new();
        if !self.is_empty() {
            queue.push_back(0);
        }
        while let Some(index) = queue.pop_front() {
            order.push(index);
            queue.extend(self.nodes[index].children.iter().copied());
        }
        order
    }

    /// Subtree weights indexed like [`Self::nodes`].
    ///
    /// A leaf weighs its value (missing counts as 0); an internal node
    /// weighs the sum of its children. Values on internal nodes are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RenderFailure::MalformedDescriptor`] for a negative or
    /// non-finite leaf value.
    pub fn weights(&self) -> Result<Vec<f64>, RenderFailure> {
        let mut weights = vec![0.0; self.nodes.len()];

        // Children always follow their parent, so a reverse sweep sees every
        // child before its parent.
        for (index, node) in self.nodes.iter().enumerate().rev() {
            if node.is_leaf() {
                let value = node.value.unwrap_or(0.0);
                if !value.is_finite() || value < 0.0 {
                    return Err(RenderFailure::malformed(format!(
                        "leaf `{}` has invalid value {value}; values must be non-negative",
                        node.key()
                    )));
                }
                weights[index] = value;
            } else {
                weights[index] = node.children.iter().map(|&c| weights[c]).sum();
            }
        }

        Ok(weights)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::FailureKind;

    use super::*;

    fn sample_tree() -> TreeNode {
        TreeNode::new("root").with_children(vec![
            TreeNode::new("a").with_children(vec![TreeNode::new("a1"), TreeNode::new("a2")]),
            TreeNode::new("b"),
        ])
    }

    #[test]
    fn test_pre_order_flattening() {
        let hierarchy = Hierarchy::from_root(&sample_tree()).unwrap();
        let labels: Vec<_> = hierarchy.nodes().iter().map(HierarchyNode::label).collect();
        assert_eq!(labels, ["root", "a", "a1", "a2", "b"]);

        let depths: Vec<_> = hierarchy.nodes().iter().map(HierarchyNode::depth).collect();
        assert_eq!(depths, [0, 1, 2, 2, 1]);
        assert_eq!(hierarchy.nodes()[0].children(), &[1, 4]);
        assert_eq!(hierarchy.max_depth(), 2);
    }

    #[test]
    fn test_leaves_and_links() {
        let hierarchy = Hierarchy::from_root(&sample_tree()).unwrap();
        assert_eq!(hierarchy.leaves().collect::<Vec<_>>(), [2, 3, 4]);
        assert_eq!(
            hierarchy.parent_links().collect::<Vec<_>>(),
            [(0, 1), (1, 2), (1, 3), (0, 4)]
        );
    }

    #[test]
    fn test_breadth_first_order() {
        let hierarchy = Hierarchy::from_root(&sample_tree()).unwrap();
        assert_eq!(hierarchy.breadth_first(), [0, 1, 4, 2, 3]);
    }

    #[test]
    fn test_repeated_id_is_rejected() {
        let tree = TreeNode::new("root")
            .with_id("r")
            .with_children(vec![TreeNode::new("again").with_id("r")]);
        let err = Hierarchy::from_root(&tree).unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedDescriptor);
        assert!(err.message().contains("`r`"));
    }

    #[test]
    fn test_nodes_without_ids_never_collide() {
        let tree = TreeNode::new("x").with_children(vec![TreeNode::new("x"), TreeNode::new("x")]);
        assert_eq!(Hierarchy::from_root(&tree).unwrap().len(), 3);
    }

    #[test]
    fn test_weights_sum_leaves() {
        let root = WeightedNode::branch(
            "root",
            vec![
                WeightedNode::branch("g", vec![WeightedNode::leaf("x", 2.0), WeightedNode::leaf("y", 3.0)]),
                WeightedNode::leaf("z", 5.0),
            ],
        );
        let weights = Hierarchy::from_root(&root).unwrap().weights().unwrap();
        assert_eq!(weights, [10.0, 5.0, 2.0, 3.0, 5.0]);
    }

    #[test]
    fn test_missing_leaf_value_counts_as_zero() {
        let mut root = WeightedNode::branch("root", vec![WeightedNode::leaf("a", 1.0)]);
        root.children.push(WeightedNode::branch("empty", Vec::new()));
        let weights = Hierarchy::from_root(&root).unwrap().weights().unwrap();
        assert_eq!(weights, [1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_negative_leaf_value_is_rejected() {
        let root = WeightedNode::branch("root", vec![WeightedNode::leaf("bad", -1.0)]);
        let err = Hierarchy::from_root(&root).unwrap().weights().unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedDescriptor);
    }

    #[test]
    fn test_internal_value_is_ignored() {
        let mut root = WeightedNode::branch("root", vec![WeightedNode::leaf("a", 4.0)]);
        root.value = Some(-100.0);
        let weights = Hierarchy::from_root(&root).unwrap().weights().unwrap();
        assert_eq!(weights[0], 4.0);
    }
}
