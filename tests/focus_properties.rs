use std::collections::HashSet;

use ping_graph::focus::{self, FocusMachine, FocusState};
use ping_graph::graph::SocialGraph;
use ping_graph::style::pipeline::{self, StyleConfig};
use ping_graph::style::{Palette, VisualMapper};
use proptest::prelude::*;

const MAX_NODES: usize = 16;

fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize, u32)>)> {
	(2usize..=MAX_NODES).prop_flat_map(|n| {
		(
			Just(n),
			prop::collection::vec((0..n, 0..n, 1u32..=50), 1..3 * n),
		)
	})
}

/// A freshly styled graph, in the default view.
fn styled(n: usize, edges: &[(usize, usize, u32)]) -> SocialGraph {
	let mut graph = SocialGraph::new();
	for i in 0..n {
		graph.add_node(i.to_string(), format!("user {i}"));
	}
	for (k, &(a, b, w)) in edges.iter().enumerate() {
		graph.add_edge(format!("e{k}"), &a.to_string(), &b.to_string(), w as f64);
	}
	pipeline::run(
		&mut graph,
		&VisualMapper::new(Palette::light()),
		&StyleConfig::default(),
		None,
	);
	graph
}

fn id_at(graph: &SocialGraph, pick: usize) -> String {
	graph.nodes()[pick % graph.node_count()].id().to_string()
}

fn assert_same(a: &SocialGraph, b: &SocialGraph) -> Result<(), TestCaseError> {
	prop_assert_eq!(a.nodes(), b.nodes());
	prop_assert_eq!(a.edges(), b.edges());
	Ok(())
}

proptest! {
	#![proptest_config(ProptestConfig {
		cases: 128,
		failure_persistence: None,
		..ProptestConfig::default()
	})]

	#[test]
	fn focus_shows_exactly_the_neighborhood((n, edges) in graph_strategy(), pick in any::<usize>()) {
		let mut graph = styled(n, &edges);
		let id = id_at(&graph, pick);
		let center = graph.node_index(&id).unwrap();
		let mut machine = FocusMachine::default();
		prop_assert!(machine.click_node(&mut graph, &id));
		prop_assert_eq!(machine.state(), FocusState::Focused(center));

		let mut expected: HashSet<usize> = graph.neighbors(center);
		expected.insert(center);
		for (ix, node) in graph.nodes().iter().enumerate() {
			prop_assert_eq!(!node.is_hidden(), expected.contains(&ix));
			prop_assert_eq!(node.is_clicked(), ix == center);
			if !node.is_hidden() {
				prop_assert_eq!(node.display_size(), node.size * 2.0);
			} else {
				prop_assert_eq!(node.display_size(), node.size);
			}
		}
		for edge in graph.edges() {
			prop_assert_eq!(!edge.is_hidden(), edge.touches(center));
		}
	}

	#[test]
	fn stage_click_restores_the_default_view((n, edges) in graph_strategy(), picks in prop::collection::vec(any::<usize>(), 1..6)) {
		let mut graph = styled(n, &edges);
		let baseline = graph.clone();
		let mut machine = FocusMachine::default();
		for pick in picks {
			let id = id_at(&graph, pick);
			machine.click_node(&mut graph, &id);
		}
		machine.click_stage(&mut graph);
		prop_assert_eq!(machine.state(), FocusState::Default);
		assert_same(&graph, &baseline)?;
	}

	#[test]
	fn clicking_twice_is_a_round_trip((n, edges) in graph_strategy(), pick in any::<usize>()) {
		let mut graph = styled(n, &edges);
		let baseline = graph.clone();
		let id = id_at(&graph, pick);
		let mut machine = FocusMachine::default();
		machine.click_node(&mut graph, &id);
		machine.click_node(&mut graph, &id);
		prop_assert_eq!(machine.state(), FocusState::Default);
		assert_same(&graph, &baseline)?;
	}

	#[test]
	fn reset_is_idempotent((n, edges) in graph_strategy(), pick in any::<usize>()) {
		let mut graph = styled(n, &edges);
		let id = id_at(&graph, pick);
		FocusMachine::default().click_node(&mut graph, &id);
		focus::reset(&mut graph);
		let once = graph.clone();
		focus::reset(&mut graph);
		assert_same(&graph, &once)?;
	}

	#[test]
	fn view_depends_only_on_the_final_state((n, edges) in graph_strategy(), picks in prop::collection::vec(any::<usize>(), 1..8)) {
		let mut graph = styled(n, &edges);
		let mut machine = FocusMachine::default();
		for pick in picks {
			let id = id_at(&graph, pick);
			machine.click_node(&mut graph, &id);
		}

		let mut fresh = styled(n, &edges);
		let mut direct = FocusMachine::default();
		if let FocusState::Focused(ix) = machine.state() {
			let id = fresh.nodes()[ix].id().to_string();
			direct.click_node(&mut fresh, &id);
		}
		prop_assert_eq!(direct.state(), machine.state());
		assert_same(&graph, &fresh)?;
	}

	#[test]
	fn unknown_ids_change_nothing((n, edges) in graph_strategy(), pick in any::<usize>()) {
		let mut graph = styled(n, &edges);
		let mut machine = FocusMachine::default();
		let id = id_at(&graph, pick);
		machine.click_node(&mut graph, &id);
		let before = graph.clone();
		let state = machine.state();
		prop_assert!(!machine.click_node(&mut graph, "no-such-user"));
		prop_assert_eq!(machine.state(), state);
		assert_same(&graph, &before)?;
	}
}
