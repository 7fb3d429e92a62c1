//! Click-to-focus state machine.
//!
//! The graph is always in one of two views: the default view produced by the
//! styling pipeline, or focused on a single node, where only that node and
//! its direct neighbors are shown, with the clicked node's own edges revealed
//! (culled or not) and the neighborhood drawn inflated.
//!
//! Every transition first resets the whole graph to the default view and
//! then applies the new one, so the result never depends on what was focused
//! before.

use log::debug;

use crate::graph::{EdgeFocus, Inflation, NodeFocus, NodeIx, SocialGraph};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FocusConfig {
	/// Size multiplier for the focused neighborhood.
	pub inflation: Inflation,
}

/// Which view the graph is in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FocusState {
	#[default]
	Default,
	Focused(NodeIx),
}

/// Restore the default view: every node at its baseline size and visible,
/// nothing highlighted, every edge hidden exactly when it is culled.
///
/// Applying it twice is the same as applying it once.
pub fn reset(graph: &mut SocialGraph) {
	for node in graph.nodes_mut() {
		node.set_focus(NodeFocus::Baseline);
	}
	for edge in graph.edges_mut() {
		edge.set_focus(EdgeFocus::Baseline);
	}
}

fn focus_on(graph: &mut SocialGraph, center: NodeIx, inflation: Inflation) {
	let mut neighborhood = graph.neighbors(center);
	neighborhood.insert(center);

	for (ix, node) in graph.nodes_mut().iter_mut().enumerate() {
		let focus = if ix == center {
			NodeFocus::Clicked(inflation)
		} else if neighborhood.contains(&ix) {
			NodeFocus::Neighbor(inflation)
		} else {
			NodeFocus::Hidden
		};
		node.set_focus(focus);
	}

	for edge in graph.edges_mut() {
		let focus = if edge.touches(center) {
			EdgeFocus::Revealed
		} else {
			EdgeFocus::Hidden
		};
		edge.set_focus(focus);
	}
}

/// Drives the focus attributes of a [`SocialGraph`] from user input.
#[derive(Clone, Debug, Default)]
pub struct FocusMachine {
	state: FocusState,
	config: FocusConfig,
}

impl FocusMachine {
	pub fn new(config: FocusConfig) -> Self {
		Self {
			state: FocusState::Default,
			config,
		}
	}

	pub fn state(&self) -> FocusState {
		self.state
	}

	pub fn focused(&self) -> Option<NodeIx> {
		match self.state {
			FocusState::Default => None,
			FocusState::Focused(ix) => Some(ix),
		}
	}

	/// Click on node `id`: focus it, or go back to the default view if it is
	/// already focused. Unknown ids leave everything untouched and return
	/// `false`.
	pub fn click_node(&mut self, graph: &mut SocialGraph, id: &str) -> bool {
		let Some(ix) = graph.node_index(id) else {
			debug!("ping-graph: click on unknown node {id:?} ignored");
			return false;
		};
		self.state = if self.state == FocusState::Focused(ix) {
			FocusState::Default
		} else {
			FocusState::Focused(ix)
		};
		self.reapply(graph);
		true
	}

	/// Click on empty canvas.
	pub fn click_stage(&mut self, graph: &mut SocialGraph) {
		self.reset(graph);
	}

	/// Explicit return to the default view.
	pub fn reset(&mut self, graph: &mut SocialGraph) {
		self.state = FocusState::Default;
		reset(graph);
	}

	/// Selection from the search box. `Some(id)` behaves exactly like a click
	/// on that node and returns its position (for panning the view) when it
	/// ends up focused; `None` clears the focus.
	pub fn search_select(&mut self, graph: &mut SocialGraph, id: Option<&str>) -> Option<(f64, f64)> {
		let Some(id) = id else {
			self.reset(graph);
			return None;
		};
		if !self.click_node(graph, id) {
			return None;
		}
		let ix = self.focused()?;
		graph.node(ix).map(|node| (node.x, node.y))
	}

	/// Rewrite every focus attribute from the current state.
	pub fn reapply(&self, graph: &mut SocialGraph) {
		reset(graph);
		if let FocusState::Focused(ix) = self.state {
			focus_on(graph, ix, self.config.inflation);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::style::pipeline::{self, StyleConfig};
	use crate::style::{Palette, VisualMapper};

	/// A–B (1), B–C (10), C–D (4), styled. A–B and C–D fall in the culled
	/// bottom quartile.
	fn styled() -> SocialGraph {
		let mut graph = SocialGraph::new();
		for id in ["a", "b", "c", "d"] {
			graph.add_node(id, id.to_uppercase());
		}
		graph.add_edge("ab", "a", "b", 1.0);
		graph.add_edge("bc", "b", "c", 10.0);
		graph.add_edge("cd", "c", "d", 4.0);
		pipeline::run(
			&mut graph,
			&VisualMapper::new(Palette::light()),
			&StyleConfig::default(),
			None,
		);
		graph
	}

	fn hidden_edges(graph: &SocialGraph) -> Vec<&str> {
		graph
			.edges()
			.iter()
			.filter(|edge| edge.is_hidden())
			.map(|edge| edge.id())
			.collect()
	}

	#[test]
	fn default_view_hides_only_culled_edges() {
		let graph = styled();
		assert_eq!(hidden_edges(&graph), vec!["ab", "cd"]);
		assert!(graph.nodes().iter().all(|node| !node.is_hidden()));
	}

	#[test]
	fn clicking_reveals_own_edges_and_hides_the_rest() {
		let mut graph = styled();
		let mut focus = FocusMachine::default();
		assert!(focus.click_node(&mut graph, "b"));

		assert_eq!(focus.state(), FocusState::Focused(1));
		assert_eq!(hidden_edges(&graph), vec!["cd"]);

		let b = graph.node_by_id("b").unwrap();
		assert!(b.is_clicked() && b.is_highlighted() && b.is_size_doubled());
		assert_eq!(b.display_size(), b.size * 2.0);

		let a = graph.node_by_id("a").unwrap();
		assert!(!a.is_hidden() && !a.is_highlighted() && a.is_size_doubled());

		let d = graph.node_by_id("d").unwrap();
		assert!(d.is_hidden() && d.is_hidden_from_click());
		assert_eq!(d.display_size(), d.size);
	}

	#[test]
	fn clicking_a_leaf_reveals_its_culled_edge() {
		let mut graph = styled();
		let mut focus = FocusMachine::default();
		focus.click_node(&mut graph, "a");
		assert_eq!(hidden_edges(&graph), vec!["bc", "cd"]);
		assert!(graph.node_by_id("c").unwrap().is_hidden());
	}

	#[test]
	fn edges_between_two_neighbors_stay_hidden() {
		let mut graph = styled();
		graph.add_edge("ac", "a", "c", 10.0);
		let mut focus = FocusMachine::default();
		focus.reapply(&mut graph);
		focus.click_node(&mut graph, "b");
		assert!(graph.edges().iter().find(|e| e.id() == "ac").unwrap().is_hidden());
	}

	#[test]
	fn clicking_the_focused_node_toggles_back() {
		let mut graph = styled();
		let baseline = graph.clone();
		let mut focus = FocusMachine::default();
		focus.click_node(&mut graph, "c");
		focus.click_node(&mut graph, "c");
		assert_eq!(focus.state(), FocusState::Default);
		assert_eq!(graph.nodes(), baseline.nodes());
		assert_eq!(graph.edges(), baseline.edges());
	}

	#[test]
	fn switching_focus_does_not_leak_previous_state() {
		let mut graph = styled();
		let mut direct = styled();
		let mut focus = FocusMachine::default();
		focus.click_node(&mut graph, "a");
		focus.click_node(&mut graph, "d");

		let mut fresh = FocusMachine::default();
		fresh.click_node(&mut direct, "d");
		assert_eq!(graph.nodes(), direct.nodes());
		assert_eq!(graph.edges(), direct.edges());
	}

	#[test]
	fn stage_click_restores_the_baseline_exactly() {
		let mut graph = styled();
		let baseline = graph.clone();
		let mut focus = FocusMachine::default();
		focus.click_node(&mut graph, "b");
		focus.click_stage(&mut graph);
		assert_eq!(focus.state(), FocusState::Default);
		for (restored, original) in graph.nodes().iter().zip(baseline.nodes()) {
			assert_eq!(restored.display_size().to_bits(), original.size.to_bits());
		}
		assert_eq!(graph.nodes(), baseline.nodes());
		assert_eq!(graph.edges(), baseline.edges());
	}

	#[test]
	fn reset_is_idempotent() {
		let mut graph = styled();
		FocusMachine::default().click_node(&mut graph, "c");
		reset(&mut graph);
		let once = graph.clone();
		reset(&mut graph);
		assert_eq!(graph.nodes(), once.nodes());
		assert_eq!(graph.edges(), once.edges());
	}

	#[test]
	fn unknown_node_is_a_no_op() {
		let mut graph = styled();
		let mut focus = FocusMachine::default();
		focus.click_node(&mut graph, "b");
		let before = graph.clone();
		assert!(!focus.click_node(&mut graph, "nobody"));
		assert_eq!(focus.state(), FocusState::Focused(1));
		assert_eq!(graph.nodes(), before.nodes());
		assert_eq!(graph.edges(), before.edges());
	}

	#[test]
	fn inflation_factor_is_configurable() {
		let mut graph = styled();
		let mut focus = FocusMachine::new(FocusConfig {
			inflation: Inflation::Quadruple,
		});
		focus.click_node(&mut graph, "c");
		let c = graph.node_by_id("c").unwrap();
		assert!(c.is_size_quadrupled() && !c.is_size_doubled());
		assert_eq!(c.display_size(), c.size * 4.0);
	}

	#[test]
	fn search_selection_focuses_and_reports_position() {
		let mut graph = styled();
		graph.node_by_id_mut("c").unwrap().x = 42.0;
		let mut focus = FocusMachine::default();

		assert_eq!(focus.search_select(&mut graph, Some("c")), Some((42.0, 0.0)));
		assert_eq!(focus.state(), FocusState::Focused(2));

		assert_eq!(focus.search_select(&mut graph, Some("ghost")), None);
		assert_eq!(focus.state(), FocusState::Focused(2));

		assert_eq!(focus.search_select(&mut graph, None), None);
		assert_eq!(focus.state(), FocusState::Default);
	}

	#[test]
	fn reapply_survives_new_positions() {
		let mut graph = styled();
		let mut focus = FocusMachine::default();
		focus.click_node(&mut graph, "b");
		let focused = graph.clone();

		for node in graph.nodes_mut() {
			node.x += 10.0;
		}
		focus.reapply(&mut graph);
		for (moved, before) in graph.nodes().iter().zip(focused.nodes()) {
			assert_eq!(moved.focus(), before.focus());
			assert_eq!(moved.display_size(), before.display_size());
		}
	}
}
