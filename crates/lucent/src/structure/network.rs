//! Relationship graphs for force layout.

use indexmap::IndexMap;
use log::debug;
use petgraph::graph::{DiGraph, NodeIndex};

use lucent_core::geometry::Point;

use crate::{descriptor::GraphData, error::RenderFailure};

/// A graph node with its display label and optional seed position.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkNode {
    id: String,
    label: String,
    seed: Option<Point>,
}

impl NetworkNode {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The caller-supplied start position, present only when both `x` and
    /// `y` were given.
    pub fn seed(&self) -> Option<Point> {
        self.seed
    }
}

/// A directed graph whose edges all resolve to known nodes.
///
/// Node indices follow the order of `graphData.nodes`; edge order follows
/// `graphData.edges`.
#[derive(Debug, Clone)]
pub struct Network {
    graph: DiGraph<NetworkNode, ()>,
}

impl Network {
    /// Builds the network, resolving every edge endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`RenderFailure::MalformedDescriptor`] for a duplicate node id
    /// or an edge endpoint that names no node.
    pub fn from_graph_data(data: &GraphData) -> Result<Self, RenderFailure> {
        let mut graph = DiGraph::with_capacity(data.nodes.len(), data.edges.len());
        let mut index: IndexMap<String, NodeIndex> = IndexMap::with_capacity(data.nodes.len());

        for node in &data.nodes {
            if index.contains_key(&node.id) {
                return Err(RenderFailure::malformed(format!(
                    "duplicate node id `{}`",
                    node.id
                )));
            }
            let seed = match (node.x, node.y) {
                (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some(Point::new(x, y)),
                _ => None,
            };
            let node_index = graph.add_node(NetworkNode {
                id: node.id.clone(),
                label: node.label().to_string(),
                seed,
            });
            index.insert(node.id.clone(), node_index);
        }

        for edge in &data.edges {
            let resolve = |id: &str| {
                index.get(id).copied().ok_or_else(|| {
                    RenderFailure::malformed(format!(
                        "edge `{}` -> `{}` references unknown node `{id}`",
                        edge.source, edge.target
                    ))
                })
            };
            let source = resolve(&edge.source)?;
            let target = resolve(&edge.target)?;
            graph.add_edge(source, target, ());
        }

        debug!(
            node_count = graph.node_count(),
            edge_count = graph.edge_count();
            "Network built"
        );
        Ok(Self { graph })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Nodes in input order.
    pub fn nodes(&self) -> impl Iterator<Item = &NetworkNode> {
        self.graph.node_weights()
    }

    /// `(source, target)` node positions in input order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph
            .raw_edges()
            .iter()
            .map(|edge| (edge.source().index(), edge.target().index()))
    }

    /// Number of links joining each node to another node. Self-loops exert
    /// no force, so they are not counted.
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.graph.node_count()];
        for (source, target) in self.edges().filter(|(source, target)| source != target) {
            degrees[source] += 1;
            degrees[target] += 1;
        }
        degrees
    }
}
