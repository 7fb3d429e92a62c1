//! Load-time styling: weights, sizes, colors, and the edge cull partition.
//!
//! Runs exactly once per session, right after parsing. Every step reads only
//! attributes written by earlier steps, so the order below is fixed:
//!
//! 1. weighted degree per node
//! 2. structural removals (isolated nodes, optional percentile node cull)
//! 3. edge weight range
//! 4. edge sizes
//! 5. edge colors with alpha suffix
//! 6. edge cull classification
//! 7. node sizes and colors
//! 8. icon overrides

use log::info;

use super::mapper::{VisualMapper, scale};
use crate::graph::metrics::{Range, edge_range, percentile_cutoff, weighted_degree};
use crate::graph::overrides::Overrides;
use crate::graph::{Edge, EdgeFocus, NodeFocus, SocialGraph};

/// Whether low-activity nodes are removed from the graph before styling.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum NodeCull {
	/// Keep every node; only edges are culled (presentationally).
	#[default]
	Disabled,
	/// Remove the `floor(p * node_count)` lowest weighted-degree nodes.
	Percentile(f64),
}

/// Output ranges and cull policy for the styling pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleConfig {
	/// Edge size range `(min, max)`.
	pub edge_size: (f64, f64),
	/// Edge opacity range `(min, max)`, encoded into the color suffix.
	pub edge_alpha: (f64, f64),
	/// Node size range `(min, max)`.
	pub node_size: (f64, f64),
	/// Edges lighter than this percentile of edge weights start hidden.
	pub edge_cull_percentile: f64,
	pub node_cull: NodeCull,
	/// Drop nodes without any edge; they give the force layout nothing to hold.
	pub drop_isolated: bool,
}

impl Default for StyleConfig {
	fn default() -> Self {
		Self {
			edge_size: (0.1, 10.0),
			edge_alpha: (0.1, 1.0),
			node_size: (1.5, 10.0),
			edge_cull_percentile: 0.75,
			node_cull: NodeCull::Disabled,
			drop_isolated: true,
		}
	}
}

/// What the pipeline removed and hid, for logging and the culling panel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StylingReport {
	pub isolated_removed: usize,
	pub nodes_removed: usize,
	/// Weight of the heaviest node the percentile cull removed.
	pub node_cutoff: Option<f64>,
	pub edges_culled: usize,
	pub edge_cutoff: Option<f64>,
}

/// Style `graph` in place and leave it in the default (unfocused) view.
pub fn run(
	graph: &mut SocialGraph,
	mapper: &VisualMapper,
	config: &StyleConfig,
	overrides: Option<&Overrides>,
) -> StylingReport {
	let mut report = StylingReport::default();

	for ix in 0..graph.node_count() {
		let weight = weighted_degree(graph, ix);
		if let Some(node) = graph.node_mut(ix) {
			node.weight = weight;
		}
	}

	if config.drop_isolated {
		let degrees: Vec<usize> = (0..graph.node_count()).map(|ix| graph.degree(ix)).collect();
		report.isolated_removed = graph.retain_nodes(|ix, _| degrees[ix] > 0);
		if report.isolated_removed > 0 {
			info!(
				"ping-graph: removed {} nodes without edges",
				report.isolated_removed
			);
		}
	}

	if let NodeCull::Percentile(percentile) = config.node_cull {
		let (removed, cutoff) = cull_nodes(graph, percentile);
		report.nodes_removed = removed;
		report.node_cutoff = cutoff;
		if let Some(cutoff) = cutoff {
			info!(
				"ping-graph: culled {} nodes at or below weighted degree {:.2}",
				removed, cutoff
			);
		}
	}

	let edge_weights = edge_range(graph, Edge::weight);
	style_edges(graph, mapper, config, edge_weights);

	report.edge_cutoff = percentile_cutoff(
		graph.edges().iter().map(Edge::weight),
		config.edge_cull_percentile,
	);
	for edge in graph.edges_mut() {
		let culled = report.edge_cutoff.is_some_and(|cutoff| edge.weight() < cutoff);
		edge.set_culled(culled);
		edge.set_focus(EdgeFocus::Baseline);
		if culled {
			report.edges_culled += 1;
		}
	}
	if let Some(cutoff) = report.edge_cutoff {
		info!(
			"ping-graph: {} of {} edges hidden by default (weight < {:.2})",
			report.edges_culled,
			graph.edge_count(),
			cutoff
		);
	}

	let degrees = Range::of(graph.nodes().iter().map(|node| node.weight));
	let (size_min, size_max) = config.node_size;
	for node in graph.nodes_mut() {
		node.size = scale(node.weight, degrees.min, degrees.max, size_min, size_max);
		node.color = mapper
			.color_for(node.weight, degrees.min, degrees.max)
			.to_string();
		node.set_focus(NodeFocus::Baseline);
	}

	if let Some(overrides) = overrides {
		overrides.apply(graph);
	}

	report
}

fn style_edges(graph: &mut SocialGraph, mapper: &VisualMapper, config: &StyleConfig, weights: Range) {
	let (size_min, size_max) = config.edge_size;
	let (alpha_min, alpha_max) = config.edge_alpha;
	for edge in graph.edges_mut() {
		let weight = edge.weight();
		edge.size = scale(weight, weights.min, weights.max, size_min, size_max);
		let alpha = scale(weight, weights.min, weights.max, alpha_min, alpha_max);
		edge.color = mapper.color_with_alpha(weight, weights.min, weights.max, alpha);
	}
}

/// Remove the `floor(percentile * n)` lowest-weighted nodes, ties broken by
/// original order. Returns the number removed and the weight of the heaviest
/// removed node. Survivors may share that weight when ties straddle the cut.
fn cull_nodes(graph: &mut SocialGraph, percentile: f64) -> (usize, Option<f64>) {
	let count = graph.node_count();
	if count == 0 {
		return (0, None);
	}
	let mut order: Vec<usize> = (0..count).collect();
	order.sort_by(|&a, &b| graph.nodes()[a].weight.total_cmp(&graph.nodes()[b].weight));

	let remove = ((percentile.clamp(0.0, 1.0) * count as f64).floor() as usize).min(count);
	let cutoff = order[..remove]
		.last()
		.map(|&ix| graph.nodes()[ix].weight);

	let mut doomed = vec![false; count];
	for &ix in &order[..remove] {
		doomed[ix] = true;
	}
	(graph.retain_nodes(|ix, _| !doomed[ix]), cutoff)
}
