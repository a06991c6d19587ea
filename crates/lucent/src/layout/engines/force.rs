//! Force-directed network layout engine
//!
//! This module implements a velocity-based force simulation for relationship
//! graphs. Each tick combines three forces:
//!
//! - **Links**: every edge is a spring towards `link_distance`, with
//!   strength `1 / min(degree)` so hubs are not over-constrained.
//! - **Repulsion**: every pair of nodes repels, weighted by
//!   `charge_strength * alpha / d²` (direct pairwise sum).
//! - **Centering**: the layout's mean position is pulled towards the canvas
//!   centre.
//!
//! Forces are scaled by a temperature `alpha` that cools geometrically from
//! 1, and velocities are damped every tick. The run ends when the largest
//! per-tick displacement drops below the convergence threshold, at the tick
//! cap, or when the caller cancels it between ticks.

use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, trace, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};

use lucent_core::geometry::{Bounds, Insets, Point, Size};

use crate::{
    error::RenderFailure,
    layout::{Convergence, LayoutResult, PositionedNode},
    structure::Network,
};

/// Smallest squared distance used by the repulsion force.
const MIN_DISTANCE_SQUARED: f64 = 1.0;

/// Force layout engine for network diagrams
#[derive(Debug, Clone)]
pub struct Engine {
    max_ticks: usize,
    link_distance: f64,
    charge_strength: f64,
    center_strength: f64,
    velocity_decay: f64,
    alpha_min: f64,
    convergence_threshold: f64,
    margin: f64,
    seed: Option<u64>,
}

impl Engine {
    /// Create a new force layout engine
    pub fn new() -> Self {
        Self {
            max_ticks: 300,
            link_distance: 100.0,
            charge_strength: -300.0,
            center_strength: 0.1,
            velocity_decay: 0.4,
            alpha_min: 0.001,
            convergence_threshold: 0.01,
            margin: 20.0,
            seed: None,
        }
    }

    /// Set the hard cap on simulation ticks
    pub fn set_max_ticks(&mut self, ticks: usize) -> &mut Self {
        self.max_ticks = ticks;
        self
    }

    /// Set the rest length of link springs
    pub fn set_link_distance(&mut self, distance: f64) -> &mut Self {
        self.link_distance = distance;
        self
    }

    /// Set the many-body strength; negative values repel
    pub fn set_charge_strength(&mut self, strength: f64) -> &mut Self {
        self.charge_strength = strength;
        self
    }

    /// Set the strength of the pull towards the canvas centre
    pub fn set_center_strength(&mut self, strength: f64) -> &mut Self {
        self.center_strength = strength;
        self
    }

    /// Set the fraction of velocity lost per tick
    pub fn set_velocity_decay(&mut self, decay: f64) -> &mut Self {
        self.velocity_decay = decay;
        self
    }

    /// Set the temperature at which cooling is considered finished
    pub fn set_alpha_min(&mut self, alpha_min: f64) -> &mut Self {
        self.alpha_min = alpha_min;
        self
    }

    /// Set the largest per-tick displacement that counts as settled
    pub fn set_convergence_threshold(&mut self, threshold: f64) -> &mut Self {
        self.convergence_threshold = threshold;
        self
    }

    /// Set the margin kept clear when fitting the result to the canvas
    pub fn set_margin(&mut self, margin: f64) -> &mut Self {
        self.margin = margin;
        self
    }

    /// Set the seed for random initial placement
    pub fn set_seed(&mut self, seed: Option<u64>) -> &mut Self {
        self.seed = seed;
        self
    }

    /// Lays out `network` starting from seeded or random positions.
    ///
    /// # Errors
    ///
    /// Returns [`RenderFailure::Cancelled`] if `cancel` is raised before the
    /// run finishes.
    pub fn calculate(
        &self,
        network: &Network,
        size: Size,
        cancel: Option<&AtomicBool>,
    ) -> Result<LayoutResult, RenderFailure> {
        let initial = self.initial_positions(network, size);
        self.simulate_from(network, size, initial, cancel)
    }

    /// Lays out `network` starting from `initial`, one position per node.
    ///
    /// No randomness is involved: equal inputs give equal outputs.
    ///
    /// # Errors
    ///
    /// Returns [`RenderFailure::Internal`] if `initial` does not hold one
    /// position per node, and [`RenderFailure::Cancelled`] if `cancel` is
    /// raised before the run finishes.
    pub fn simulate_from(
        &self,
        network: &Network,
        size: Size,
        initial: Vec<Point>,
        cancel: Option<&AtomicBool>,
    ) -> Result<LayoutResult, RenderFailure> {
        if initial.len() != network.node_count() {
            return Err(RenderFailure::Internal(format!(
                "{} initial positions for {} nodes",
                initial.len(),
                network.node_count()
            )));
        }

        let mut simulation = Simulation::new(self, network, size, initial);
        let mut convergence = None;

        for tick in 0..self.max_ticks {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                debug!(ticks = tick; "Force layout cancelled");
                return Err(RenderFailure::Cancelled { ticks: tick });
            }

            let displacement = simulation.tick();
            trace!(tick = tick, alpha = simulation.alpha, displacement = displacement; "Force tick");

            if displacement < self.convergence_threshold {
                convergence = Some(Convergence::new(tick + 1, true));
                break;
            }
        }

        let convergence =
            convergence.unwrap_or_else(|| Convergence::new(self.max_ticks, false));
        if !convergence.converged() {
            warn!(ticks = convergence.ticks(); "Force layout hit its tick cap");
        }

        let positions = self.fit_to_canvas(simulation.positions, size);
        let nodes = network
            .nodes()
            .zip(positions)
            .map(|(node, position)| PositionedNode::new(node.id(), node.label(), position))
            .collect();

        let result = LayoutResult::new(nodes, network.edges())?.with_convergence(convergence);
        debug!(
            node_count = result.nodes().len(),
            link_count = result.links().len(),
            ticks = convergence.ticks(),
            converged = convergence.converged();
            "Force layout calculated"
        );
        Ok(result)
    }

    /// Seeded positions where given, random positions inside the margins
    /// otherwise.
    fn initial_positions(&self, network: &Network, size: Size) -> Vec<Point> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let area = self.placement_area(size);

        network
            .nodes()
            .map(|node| {
                node.seed().unwrap_or_else(|| {
                    Point::new(
                        random_between(&mut rng, area.min_x(), area.max_x()),
                        random_between(&mut rng, area.min_y(), area.max_y()),
                    )
                })
            })
            .collect()
    }

    fn placement_area(&self, size: Size) -> Bounds {
        Insets::uniform(self.margin).inner_bounds(size)
    }

    /// Scales the layout down and recentres it when it overflows the canvas
    /// margins; a layout that already fits is returned untouched.
    fn fit_to_canvas(&self, positions: Vec<Point>, size: Size) -> Vec<Point> {
        let Some(extent) = Bounds::enclosing(positions.iter().copied()) else {
            return positions;
        };
        let area = self.placement_area(size);
        if area.contains(&extent, 0.0) {
            return positions;
        }

        let ratio = |available: f64, used: f64| {
            if used > 0.0 { available.max(0.0) / used } else { f64::INFINITY }
        };
        let scale = ratio(area.width(), extent.width())
            .min(ratio(area.height(), extent.height()))
            .min(1.0);
        // A canvas smaller than twice the margin has no placement area.
        let target = if area.width() > 0.0 && area.height() > 0.0 {
            area.center()
        } else {
            size.center()
        };

        debug!(scale = scale; "Fitting force layout to canvas");
        positions
            .into_iter()
            .map(|p| target.add_point(p.sub_point(extent.center()).scale(scale)))
            .collect()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

fn random_between(rng: &mut StdRng, low: f64, high: f64) -> f64 {
    if high > low {
        rng.random_range(low..=high)
    } else {
        (low + high) / 2.0
    }
}

/// Mutable state of one simulation run.
struct Simulation<'a> {
    engine: &'a Engine,
    positions: Vec<Point>,
    velocities: Vec<Point>,
    edges: Vec<Spring>,
    center: Point,
    alpha: f64,
    alpha_decay: f64,
}

/// A link with its precomputed strength and bias.
struct Spring {
    source: usize,
    target: usize,
    strength: f64,
    /// Share of the correction applied to the target.
    bias: f64,
}

impl<'a> Simulation<'a> {
    fn new(engine: &'a Engine, network: &Network, size: Size, positions: Vec<Point>) -> Self {
        let degrees = network.degrees();
        let edges = network
            .edges()
            .filter(|(source, target)| source != target)
            .map(|(source, target)| {
                let (ds, dt) = (degrees[source] as f64, degrees[target] as f64);
                Spring {
                    source,
                    target,
                    strength: 1.0 / ds.min(dt),
                    bias: ds / (ds + dt),
                }
            })
            .collect();

        Self {
            engine,
            velocities: vec![Point::default(); positions.len()],
            positions,
            edges,
            center: size.center(),
            alpha: 1.0,
            alpha_decay: 1.0 - engine.alpha_min.powf(1.0 / 300.0),
        }
    }

    /// Advances one tick and returns the largest node displacement.
    fn tick(&mut self) -> f64 {
        self.alpha -= self.alpha * self.alpha_decay;

        let before = self.positions.clone();
        self.apply_links();
        self.apply_repulsion();
        self.apply_centering();

        let retain = 1.0 - self.engine.velocity_decay;
        for (position, velocity) in self.positions.iter_mut().zip(&mut self.velocities) {
            *velocity = velocity.scale(retain);
            *position = position.add_point(*velocity);
        }

        self.positions
            .iter()
            .zip(&before)
            .map(|(after, before)| after.sub_point(*before).hypot())
            .fold(0.0, f64::max)
    }

    fn apply_links(&mut self) {
        for spring in &self.edges {
            let (s, t) = (spring.source, spring.target);
            let next_s = self.positions[s].add_point(self.velocities[s]);
            let next_t = self.positions[t].add_point(self.velocities[t]);
            let mut delta = next_t.sub_point(next_s);
            if delta.hypot() == 0.0 {
                delta = nudge(s, t);
            }

            let length = delta.hypot();
            let correction = (length - self.engine.link_distance) / length
                * self.alpha
                * spring.strength;
            let delta = delta.scale(correction);

            self.velocities[t] = self.velocities[t].sub_point(delta.scale(spring.bias));
            self.velocities[s] = self.velocities[s].add_point(delta.scale(1.0 - spring.bias));
        }
    }

    fn apply_repulsion(&mut self) {
        let weight = self.engine.charge_strength * self.alpha;
        let count = self.positions.len();

        for i in 0..count {
            let mut push = Point::default();
            for j in 0..count {
                if i == j {
                    continue;
                }
                let mut delta = self.positions[j].sub_point(self.positions[i]);
                if delta.hypot() == 0.0 {
                    delta = nudge(i, j);
                }
                let mut distance_squared = delta.x() * delta.x() + delta.y() * delta.y();
                if distance_squared < MIN_DISTANCE_SQUARED {
                    distance_squared = (MIN_DISTANCE_SQUARED * distance_squared).sqrt();
                }
                push = push.add_point(delta.scale(weight / distance_squared));
            }
            self.velocities[i] = self.velocities[i].add_point(push);
        }
    }

    fn apply_centering(&mut self) {
        if self.positions.is_empty() {
            return;
        }
        let count = self.positions.len() as f64;
        let sum = self
            .positions
            .iter()
            .fold(Point::default(), |acc, p| acc.add_point(*p));
        let shift = self
            .center
            .sub_point(sum.scale(1.0 / count))
            .scale(self.engine.center_strength);

        for position in &mut self.positions {
            *position = position.add_point(shift);
        }
    }
}

/// A tiny, deterministic, antisymmetric offset separating coincident nodes.
fn nudge(from: usize, to: usize) -> Point {
    let sign = if from < to { 1.0 } else { -1.0 };
    let angle = (from.min(to) * 31 + from.max(to) * 17) as f64;
    Point::new(angle.cos(), angle.sin()).scale(sign * 1e-6)
}
