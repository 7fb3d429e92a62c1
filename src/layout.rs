//! Two-phase node placement.
//!
//! Phase 1 seeds every node onto a circle so no two nodes coincide (the
//! repulsion term is undefined for coincident points). Phase 2 hands the whole
//! graph, culled edges included, to the `force_graph` simulation. Hidden
//! low-weight edges still attract, which keeps related clusters together even
//! while they are not drawn.
//!
//! Refinement runs as a [`LayoutJob`] on its own copy of the positions and is
//! advanced a batch at a time, so the canvas keeps drawing the previous
//! positions until the finished result is applied in one go.

use std::f64::consts::TAU;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::{debug, info, warn};

use crate::graph::{NodeIx, SocialGraph};

/// Tuning for both layout phases.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	/// Seed circle radius. `None` scales with the node count.
	pub seed_radius: Option<f64>,
	/// Repulsion strength, replacing the inferred one.
	pub scaling_ratio: f64,
	/// Total refinement iterations.
	pub iterations: usize,
	/// Iterations per [`LayoutJob::step`].
	pub batch: usize,
	/// Simulation time step per iteration, in seconds.
	pub time_step: f32,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			seed_radius: None,
			scaling_ratio: 500.0,
			iterations: 500,
			batch: 50,
			time_step: 0.016,
		}
	}
}

impl LayoutConfig {
	pub fn radius_for(&self, node_count: usize) -> f64 {
		self.seed_radius
			.unwrap_or_else(|| 100.0 * (node_count.max(1) as f64).sqrt())
	}
}

/// Physical settings for the refinement phase.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutSettings {
	/// Repulsion between every pair of nodes.
	pub scaling_ratio: f64,
	/// Pull of every node towards the origin.
	pub gravity: f64,
	pub strong_gravity: bool,
	/// Larger values take smaller steps.
	pub slow_down: f64,
}

/// Starting settings derived from the graph's size.
pub fn infer_settings(graph: &SocialGraph) -> LayoutSettings {
	let order = graph.node_count().max(1) as f64;
	LayoutSettings {
		scaling_ratio: 10.0,
		gravity: 0.05,
		strong_gravity: true,
		slow_down: 1.0 + order.ln(),
	}
}

impl LayoutSettings {
	pub fn with_scaling_ratio(self, scaling_ratio: f64) -> Self {
		Self {
			scaling_ratio,
			..self
		}
	}

	fn simulation_parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: self.scaling_ratio as f32,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: (3000.0 / self.slow_down) as f32,
			damping_factor: 0.9,
		}
	}

	/// Fraction of its distance to the origin a node loses per step.
	fn pull(&self, time_step: f32) -> f64 {
		let gravity = if self.strong_gravity {
			self.gravity
		} else {
			self.gravity * 0.1
		};
		(gravity * time_step as f64).clamp(0.0, 1.0)
	}
}

/// Move every node to the origin.
pub fn reset_positions(graph: &mut SocialGraph) {
	for node in graph.nodes_mut() {
		node.x = 0.0;
		node.y = 0.0;
	}
}

/// Place node `i` of `n` at angle `2πi/n` on a circle around the origin.
pub fn assign_circular(graph: &mut SocialGraph, radius: f64) {
	let count = graph.node_count();
	for (i, node) in graph.nodes_mut().iter_mut().enumerate() {
		let angle = TAU * i as f64 / count as f64;
		node.x = radius * angle.cos();
		node.y = radius * angle.sin();
	}
}

/// Phase 1: zero every position, then seed the circle.
pub fn seed(graph: &mut SocialGraph, config: &LayoutConfig) {
	reset_positions(graph);
	assign_circular(graph, config.radius_for(graph.node_count()));
}

/// Node positions indexed by [`NodeIx`].
#[derive(Clone, Debug, PartialEq)]
pub struct Positions(Vec<(f64, f64)>);

impl Positions {
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Write every position into `graph`. Only `x`/`y` are touched.
	pub fn apply(&self, graph: &mut SocialGraph) {
		for (node, &(x, y)) in graph.nodes_mut().iter_mut().zip(&self.0) {
			node.x = x;
			node.y = y;
		}
	}
}

/// Where a [`LayoutJob`] stands after a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutProgress {
	Running { remaining: usize },
	Finished,
	Cancelled,
}

/// Bounded, cancellable force-directed refinement.
pub struct LayoutJob {
	simulation: ForceGraph<NodeIx, ()>,
	seed: Vec<(f64, f64)>,
	simulated_edges: usize,
	remaining: usize,
	batch: usize,
	time_step: f32,
	pull: f64,
	cancelled: bool,
}

impl LayoutJob {
	/// Snapshot the current (seeded) positions and every non-loop edge.
	pub fn new(graph: &SocialGraph, settings: &LayoutSettings, config: &LayoutConfig) -> Self {
		let mut simulation = ForceGraph::new(settings.simulation_parameters());
		let mut handles = Vec::with_capacity(graph.node_count());
		let mut seed = Vec::with_capacity(graph.node_count());

		for (ix, node) in graph.nodes().iter().enumerate() {
			seed.push((node.x, node.y));
			handles.push(simulation.add_node(NodeData {
				x: node.x as f32,
				y: node.y as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: ix,
			}));
		}

		let mut simulated_edges = 0;
		for edge in graph.edges() {
			if edge.is_self_loop() {
				continue;
			}
			simulation.add_edge(
				handles[edge.source()],
				handles[edge.target()],
				EdgeData::default(),
			);
			simulated_edges += 1;
		}

		debug!(
			"ping-graph: layout job over {} nodes, {} edges, {} iterations",
			seed.len(),
			simulated_edges,
			config.iterations
		);

		Self {
			simulation,
			seed,
			simulated_edges,
			remaining: config.iterations,
			batch: config.batch.max(1),
			time_step: config.time_step,
			pull: settings.pull(config.time_step),
			cancelled: false,
		}
	}

	pub fn simulated_edges(&self) -> usize {
		self.simulated_edges
	}

	pub fn remaining(&self) -> usize {
		self.remaining
	}

	pub fn is_finished(&self) -> bool {
		!self.cancelled && self.remaining == 0
	}

	pub fn cancel(&mut self) {
		self.cancelled = true;
	}

	/// Run up to one batch of iterations.
	pub fn step(&mut self) -> LayoutProgress {
		if self.cancelled {
			return LayoutProgress::Cancelled;
		}
		let iterations = self.batch.min(self.remaining);
		for _ in 0..iterations {
			self.simulation.update(self.time_step);
			if self.pull > 0.0 {
				let keep = (1.0 - self.pull) as f32;
				self.simulation.visit_nodes_mut(|node| {
					node.data.x *= keep;
					node.data.y *= keep;
				});
			}
		}
		self.remaining -= iterations;
		if self.remaining == 0 {
			LayoutProgress::Finished
		} else {
			LayoutProgress::Running {
				remaining: self.remaining,
			}
		}
	}

	/// The refined positions, once every iteration has run. Positions the
	/// simulation blew up (NaN or infinite) fall back to the seed.
	pub fn finish(self) -> Option<Positions> {
		if !self.is_finished() {
			return None;
		}
		let mut positions = self.seed.clone();
		let mut rejected = 0;
		self.simulation.visit_nodes(|node| {
			let (x, y) = (node.x() as f64, node.y() as f64);
			if x.is_finite() && y.is_finite() {
				positions[node.data.user_data] = (x, y);
			} else {
				rejected += 1;
			}
		});
		if rejected > 0 {
			warn!("ping-graph: {rejected} nodes diverged during layout, kept seed positions");
		}
		Some(Positions(positions))
	}

	/// Run every remaining batch and return the result.
	pub fn run_to_completion(mut self) -> Option<Positions> {
		while let LayoutProgress::Running { .. } = self.step() {}
		self.finish()
	}
}

/// Phase 2 in one call: refine `graph` for `iterations` steps and apply.
pub fn run(graph: &mut SocialGraph, iterations: usize, settings: &LayoutSettings, config: &LayoutConfig) {
	let config = LayoutConfig {
		iterations,
		batch: iterations.max(1),
		..config.clone()
	};
	if let Some(positions) = LayoutJob::new(graph, settings, &config).run_to_completion() {
		positions.apply(graph);
	}
}

/// Both phases with the configured parameters, returning the job for phase 2
/// so the caller decides where it runs.
pub fn prepare(graph: &mut SocialGraph, config: &LayoutConfig) -> LayoutJob {
	seed(graph, config);
	let settings = infer_settings(graph).with_scaling_ratio(config.scaling_ratio);
	info!(
		"ping-graph: layout seeded, refining with scaling ratio {}",
		settings.scaling_ratio
	);
	LayoutJob::new(graph, &settings, config)
}
