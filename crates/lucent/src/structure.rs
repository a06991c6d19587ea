//! Validated structures built from descriptor payloads.
//!
//! Layout engines never see raw descriptors. They work on:
//! - [`Hierarchy`]: a flattened, cycle-checked rooted tree (tree and
//!   hierarchy diagrams)
//! - [`Network`]: a graph whose edges all resolve to known nodes (network
//!   diagrams)
//!
//! Building a structure is where descriptor data-contract violations are
//! caught, so a layout never starts on input it would have to reject halfway.

mod network;
mod tree;

pub use network::{Network, NetworkNode};
pub use tree::{Hierarchical, Hierarchy, HierarchyNode};
