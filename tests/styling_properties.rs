use ping_graph::graph::SocialGraph;
use ping_graph::graph::metrics::percentile_cutoff;
use ping_graph::style::mapper::color_index;
use ping_graph::style::pipeline::{self, NodeCull, StyleConfig};
use ping_graph::style::{Palette, VisualMapper, scale};
use proptest::prelude::*;

const MAX_NODES: usize = 24;

/// Node count plus `(source, target, weight)` triples over those nodes.
fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize, u32)>)> {
	(2usize..=MAX_NODES).prop_flat_map(|n| {
		(
			Just(n),
			prop::collection::vec((0..n, 0..n, 1u32..=100), 1..3 * n),
		)
	})
}

fn build(n: usize, edges: &[(usize, usize, u32)]) -> SocialGraph {
	let mut graph = SocialGraph::new();
	for i in 0..n {
		graph.add_node(i.to_string(), format!("user {i}"));
	}
	for (k, &(a, b, w)) in edges.iter().enumerate() {
		graph.add_edge(format!("e{k}"), &a.to_string(), &b.to_string(), w as f64);
	}
	graph
}

fn mapper() -> VisualMapper {
	VisualMapper::new(Palette::light())
}

proptest! {
	#![proptest_config(ProptestConfig {
		cases: 128,
		failure_persistence: None,
		..ProptestConfig::default()
	})]

	#[test]
	fn sizes_and_colors_stay_in_range((n, edges) in graph_strategy()) {
		let mut graph = build(n, &edges);
		let config = StyleConfig::default();
		pipeline::run(&mut graph, &mapper(), &config, None);

		for node in graph.nodes() {
			prop_assert!(node.size >= config.node_size.0 && node.size <= config.node_size.1);
			prop_assert!(node.color.starts_with('#') && node.color.len() == 7);
		}
		for edge in graph.edges() {
			prop_assert!(edge.size >= config.edge_size.0 && edge.size <= config.edge_size.1);
			prop_assert_eq!(edge.color.len(), 9);
		}
	}

	#[test]
	fn weight_is_the_sum_of_incident_edge_weights((n, edges) in graph_strategy()) {
		let mut expected = vec![0.0; n];
		for &(a, b, w) in &edges {
			expected[a] += w as f64;
			if a != b {
				expected[b] += w as f64;
			}
		}
		let mut graph = build(n, &edges);
		pipeline::run(&mut graph, &mapper(), &StyleConfig::default(), None);

		for node in graph.nodes() {
			let i: usize = node.id().parse().unwrap();
			prop_assert_eq!(node.weight, expected[i]);
			prop_assert!(node.weight > 0.0);
		}
	}

	#[test]
	fn culled_edges_are_exactly_those_below_the_cutoff((n, edges) in graph_strategy()) {
		let mut graph = build(n, &edges);
		let config = StyleConfig::default();
		let report = pipeline::run(&mut graph, &mapper(), &config, None);

		let cutoff = percentile_cutoff(
			edges.iter().map(|&(_, _, w)| w as f64),
			config.edge_cull_percentile,
		);
		prop_assert_eq!(report.edge_cutoff, cutoff);
		let cutoff = cutoff.unwrap();
		let mut culled = 0;
		for edge in graph.edges() {
			prop_assert_eq!(edge.is_culled(), edge.weight() < cutoff);
			prop_assert_eq!(edge.is_hidden(), edge.is_culled());
			culled += usize::from(edge.is_culled());
		}
		prop_assert_eq!(report.edges_culled, culled);
		prop_assert_eq!(graph.edge_count(), edges.len());
	}

	#[test]
	fn structural_cull_removes_floor_of_share((n, edges) in graph_strategy(), p in 0.0f64..=1.0) {
		let mut graph = build(n, &edges);
		let config = StyleConfig {
			node_cull: NodeCull::Percentile(p),
			drop_isolated: false,
			..StyleConfig::default()
		};
		let report = pipeline::run(&mut graph, &mapper(), &config, None);
		let expected = (p * n as f64).floor() as usize;
		prop_assert_eq!(report.nodes_removed, expected);
		prop_assert_eq!(graph.node_count(), n - expected);
	}

	#[test]
	fn color_index_is_monotonic_and_bounded(
		min in -1000.0f64..1000.0,
		span in 0.0f64..1000.0,
		a in 0.0f64..=1.0,
		b in 0.0f64..=1.0,
	) {
		let max = min + span;
		let len = Palette::light().len();
		let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
		let lo_ix = color_index(min + lo * span, min, max, len);
		let hi_ix = color_index(min + hi * span, min, max, len);
		prop_assert!(lo_ix <= hi_ix);
		prop_assert!(hi_ix < len);
	}

	#[test]
	fn degenerate_ranges_map_to_the_lower_bound(value in -100.0f64..100.0, bound in -100.0f64..100.0) {
		prop_assert_eq!(scale(value, bound, bound, 1.5, 10.0), 1.5);
		prop_assert_eq!(scale(value, bound + 1.0, bound, 1.5, 10.0), 1.5);
	}
}

#[test]
fn uniform_weights_give_one_color_and_the_minimum_size() {
	let mut graph = build(4, &[(0, 1, 5), (1, 2, 5), (2, 3, 5), (3, 0, 5)]);
	pipeline::run(&mut graph, &mapper(), &StyleConfig::default(), None);
	let first = graph.nodes()[0].color.clone();
	for node in graph.nodes() {
		assert_eq!(node.size, 1.5);
		assert_eq!(node.color, first);
	}
}

#[test]
fn heavier_users_are_never_smaller() {
	let mut graph = build(5, &[(0, 1, 1), (1, 2, 2), (2, 3, 3), (3, 4, 4)]);
	pipeline::run(&mut graph, &mapper(), &StyleConfig::default(), None);
	let mut nodes: Vec<_> = graph.nodes().iter().collect();
	nodes.sort_by(|a, b| a.weight.total_cmp(&b.weight));
	for pair in nodes.windows(2) {
		assert!(pair[0].size <= pair[1].size);
	}
}
