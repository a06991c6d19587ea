//! Layout engine factory.
//!
//! Each diagram family has one engine. The [`EngineBuilder`] collects tuning
//! options and produces an [`Engines`] set that the renderer keeps for its
//! whole lifetime; engines hold configuration only, so one set serves any
//! number of concurrent renders.

pub mod force;
pub mod partition;
pub mod tree;

use crate::config::{ForceLayoutConfig, LayoutConfig};

/// Builder for creating and configuring layout engines.
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    tree_margin: f64,
    force: ForceLayoutConfig,
    partition_padding: f64,
}

impl EngineBuilder {
    /// Create a new engine builder with default configuration
    pub fn new() -> Self {
        Self {
            tree_margin: 50.0,
            force: ForceLayoutConfig::default(),
            partition_padding: 0.0,
        }
    }

    /// Creates a builder carrying every engine setting from `config`.
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new()
            .with_tree_margin(config.tree.margin)
            .with_force(config.force.clone())
            .with_partition_padding(config.partition.padding)
    }

    /// Set the margin kept clear around tree layouts
    pub fn with_tree_margin(mut self, margin: f64) -> Self {
        self.tree_margin = margin;
        self
    }

    /// Set the force simulation parameters
    pub fn with_force(mut self, force: ForceLayoutConfig) -> Self {
        self.force = force;
        self
    }

    /// Set the padding around partition layouts
    pub fn with_partition_padding(mut self, padding: f64) -> Self {
        self.partition_padding = padding;
        self
    }

    /// Builds the configured engines.
    pub fn build(self) -> Engines {
        let mut tree = tree::Engine::new();
        tree.set_margin(self.tree_margin);

        let config = &self.force;
        let mut force = force::Engine::new();
        force
            .set_max_ticks(config.max_ticks)
            .set_link_distance(config.link_distance)
            .set_charge_strength(config.charge_strength)
            .set_center_strength(config.center_strength)
            .set_velocity_decay(config.velocity_decay)
            .set_alpha_min(config.alpha_min)
            .set_convergence_threshold(config.convergence_threshold)
            .set_margin(config.margin)
            .set_seed(config.seed);

        let mut partition = partition::Engine::new();
        partition.set_padding(self.partition_padding);

        Engines {
            tree,
            force,
            partition,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// One configured engine per diagram family.
#[derive(Debug, Clone)]
pub struct Engines {
    tree: tree::Engine,
    force: force::Engine,
    partition: partition::Engine,
}

impl Engines {
    pub fn tree(&self) -> &tree::Engine {
        &self.tree
    }

    pub fn force(&self) -> &force::Engine {
        &self.force
    }

    pub fn partition(&self) -> &partition::Engine {
        &self.partition
    }
}

impl Default for Engines {
    fn default() -> Self {
        EngineBuilder::new().build()
    }
}
