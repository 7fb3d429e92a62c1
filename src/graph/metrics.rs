//! Structural statistics over the interaction graph.

use super::{Edge, Node, NodeIx, SocialGraph};

/// Closed interval of a statistic.
///
/// An empty input produces the degenerate range `[+inf, -inf]`, so callers
/// must check [`Range::is_degenerate`] before dividing by the span.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
	pub min: f64,
	pub max: f64,
}

impl Range {
	pub const EMPTY: Range = Range {
		min: f64::INFINITY,
		max: f64::NEG_INFINITY,
	};

	pub fn of(values: impl IntoIterator<Item = f64>) -> Self {
		values.into_iter().fold(Self::EMPTY, |range, value| Range {
			min: range.min.min(value),
			max: range.max.max(value),
		})
	}

	pub fn is_degenerate(&self) -> bool {
		!(self.min.is_finite() && self.max.is_finite()) || self.max <= self.min
	}
}

/// Sum of the weights of every edge incident to `node`, in both directions.
/// A self-loop counts once; parallel edges each count.
pub fn weighted_degree(graph: &SocialGraph, node: NodeIx) -> f64 {
	graph.incident_edges(node).map(Edge::weight).sum()
}

pub fn node_range(graph: &SocialGraph, selector: impl Fn(&Node) -> f64) -> Range {
	Range::of(graph.nodes().iter().map(selector))
}

pub fn edge_range(graph: &SocialGraph, selector: impl Fn(&Edge) -> f64) -> Range {
	Range::of(graph.edges().iter().map(selector))
}

/// Value at the `percentile` position (0.0..=1.0) of the sorted values:
/// index `floor(percentile * len)`, clamped to the last element.
pub fn percentile_cutoff(values: impl IntoIterator<Item = f64>, percentile: f64) -> Option<f64> {
	let mut sorted: Vec<f64> = values.into_iter().collect();
	if sorted.is_empty() {
		return None;
	}
	sorted.sort_by(f64::total_cmp);
	let position = (percentile.clamp(0.0, 1.0) * sorted.len() as f64).floor() as usize;
	Some(sorted[position.min(sorted.len() - 1)])
}
