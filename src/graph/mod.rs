//! Session graph: who pings whom, and how often.
//!
//! Nodes and edges are fixed records. Their load-time attributes (weight,
//! size, color, culled) are written once by the styling pipeline; the only
//! fields that change afterwards are positions (layout) and the focus values
//! (focus state machine). Focus is stored as a single enum per entity so that
//! contradictory flag combinations cannot be expressed.

use std::collections::{HashMap, HashSet};

pub mod gexf;
pub mod metrics;
pub mod overrides;

/// Index of a node inside a [`SocialGraph`]. Stable until nodes are removed.
pub type NodeIx = usize;

/// Size multiplier applied to a focused neighborhood.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Inflation {
	#[default]
	Double,
	Quadruple,
}

impl Inflation {
	pub fn factor(self) -> f64 {
		match self {
			Inflation::Double => 2.0,
			Inflation::Quadruple => 4.0,
		}
	}
}

/// Focus-driven state of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeFocus {
	/// As the styling pipeline left it.
	#[default]
	Baseline,
	/// Hidden because another node was clicked and this one is not adjacent.
	Hidden,
	/// Adjacent to the clicked node; drawn inflated.
	Neighbor(Inflation),
	/// The clicked node itself; highlighted and inflated.
	Clicked(Inflation),
}

/// Focus-driven state of an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgeFocus {
	/// Visible unless culled.
	#[default]
	Baseline,
	/// Touches the clicked node; visible even if culled.
	Revealed,
	/// Does not touch the clicked node.
	Hidden,
}

/// A user in the interaction graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	id: String,
	/// Display name. Empty for anonymized users.
	pub label: String,
	/// Icon drawn instead of the plain disc, if any.
	pub image: Option<String>,
	pub x: f64,
	pub y: f64,
	/// Weighted degree.
	pub weight: f64,
	/// Baseline size; see [`Node::display_size`] for the focused size.
	pub size: f64,
	pub color: String,
	focus: NodeFocus,
}

impl Node {
	fn new(id: String, label: String) -> Self {
		Self {
			id,
			label,
			image: None,
			x: 0.0,
			y: 0.0,
			weight: 0.0,
			size: 1.0,
			color: String::new(),
			focus: NodeFocus::Baseline,
		}
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn is_anonymous(&self) -> bool {
		self.label.is_empty()
	}

	pub fn focus(&self) -> NodeFocus {
		self.focus
	}

	pub(crate) fn set_focus(&mut self, focus: NodeFocus) {
		self.focus = focus;
	}

	pub fn is_hidden(&self) -> bool {
		self.focus == NodeFocus::Hidden
	}

	/// Nodes are only ever hidden by a click, so this mirrors [`Node::is_hidden`].
	pub fn is_hidden_from_click(&self) -> bool {
		self.is_hidden()
	}

	pub fn is_highlighted(&self) -> bool {
		matches!(self.focus, NodeFocus::Clicked(_))
	}

	pub fn is_clicked(&self) -> bool {
		matches!(self.focus, NodeFocus::Clicked(_))
	}

	fn inflation(&self) -> Option<Inflation> {
		match self.focus {
			NodeFocus::Neighbor(inflation) | NodeFocus::Clicked(inflation) => Some(inflation),
			NodeFocus::Baseline | NodeFocus::Hidden => None,
		}
	}

	pub fn is_size_doubled(&self) -> bool {
		self.inflation() == Some(Inflation::Double)
	}

	pub fn is_size_quadrupled(&self) -> bool {
		self.inflation() == Some(Inflation::Quadruple)
	}

	/// Size to draw: the baseline size, inflated while in a focused neighborhood.
	pub fn display_size(&self) -> f64 {
		match self.inflation() {
			Some(inflation) => self.size * inflation.factor(),
			None => self.size,
		}
	}
}

/// A weighted interaction between two users.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	id: String,
	source: NodeIx,
	target: NodeIx,
	weight: f64,
	pub size: f64,
	/// Palette color with a two-digit alpha suffix.
	pub color: String,
	culled: bool,
	focus: EdgeFocus,
}

impl Edge {
	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn source(&self) -> NodeIx {
		self.source
	}

	pub fn target(&self) -> NodeIx {
		self.target
	}

	pub fn weight(&self) -> f64 {
		self.weight
	}

	pub fn touches(&self, node: NodeIx) -> bool {
		self.source == node || self.target == node
	}

	pub fn is_self_loop(&self) -> bool {
		self.source == self.target
	}

	/// Permanent low-weight classification computed at load.
	pub fn is_culled(&self) -> bool {
		self.culled
	}

	pub(crate) fn set_culled(&mut self, culled: bool) {
		self.culled = culled;
	}

	pub fn default_hidden(&self) -> bool {
		self.culled
	}

	pub fn focus(&self) -> EdgeFocus {
		self.focus
	}

	pub(crate) fn set_focus(&mut self, focus: EdgeFocus) {
		self.focus = focus;
	}

	pub fn is_hidden(&self) -> bool {
		match self.focus {
			EdgeFocus::Baseline => self.culled,
			EdgeFocus::Revealed => false,
			EdgeFocus::Hidden => true,
		}
	}
}

/// The interaction graph for one session.
#[derive(Clone, Debug, Default)]
pub struct SocialGraph {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	index: HashMap<String, NodeIx>,
	/// Edge indices incident to each node. A self-loop is listed once.
	incidence: Vec<Vec<usize>>,
}

impl SocialGraph {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a node, or return the existing index if the id is already present.
	pub fn add_node(&mut self, id: impl Into<String>, label: impl Into<String>) -> NodeIx {
		let id = id.into();
		if let Some(&ix) = self.index.get(&id) {
			return ix;
		}
		let ix = self.nodes.len();
		self.index.insert(id.clone(), ix);
		self.nodes.push(Node::new(id, label.into()));
		self.incidence.push(Vec::new());
		ix
	}

	/// Add an edge between two existing nodes. Returns `None` if either
	/// endpoint is unknown.
	pub fn add_edge(
		&mut self,
		id: impl Into<String>,
		source: &str,
		target: &str,
		weight: f64,
	) -> Option<usize> {
		let source = self.node_index(source)?;
		let target = self.node_index(target)?;
		let edge_ix = self.edges.len();
		self.edges.push(Edge {
			id: id.into(),
			source,
			target,
			weight,
			size: 1.0,
			color: String::new(),
			culled: false,
			focus: EdgeFocus::Baseline,
		});
		self.incidence[source].push(edge_ix);
		if target != source {
			self.incidence[target].push(edge_ix);
		}
		Some(edge_ix)
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn nodes_mut(&mut self) -> &mut [Node] {
		&mut self.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn edges_mut(&mut self) -> &mut [Edge] {
		&mut self.edges
	}

	pub fn node(&self, ix: NodeIx) -> Option<&Node> {
		self.nodes.get(ix)
	}

	pub fn node_mut(&mut self, ix: NodeIx) -> Option<&mut Node> {
		self.nodes.get_mut(ix)
	}

	pub fn node_index(&self, id: &str) -> Option<NodeIx> {
		self.index.get(id).copied()
	}

	pub fn node_by_id(&self, id: &str) -> Option<&Node> {
		self.node_index(id).and_then(|ix| self.nodes.get(ix))
	}

	pub fn node_by_id_mut(&mut self, id: &str) -> Option<&mut Node> {
		let ix = self.node_index(id)?;
		self.nodes.get_mut(ix)
	}

	pub fn contains_node(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	/// Look a user up by id, or by label ignoring case. Ids win over labels
	/// and anonymous users can only be found by id.
	pub fn find(&self, query: &str) -> Option<&Node> {
		let query = query.trim();
		if query.is_empty() {
			return None;
		}
		self.node_by_id(query).or_else(|| {
			self.nodes
				.iter()
				.find(|node| !node.is_anonymous() && node.label.eq_ignore_ascii_case(query))
		})
	}

	/// Edges incident to `node`, in both directions.
	pub fn incident_edges(&self, node: NodeIx) -> impl Iterator<Item = &Edge> {
		self.incidence
			.get(node)
			.into_iter()
			.flatten()
			.map(|&edge_ix| &self.edges[edge_ix])
	}

	pub fn degree(&self, node: NodeIx) -> usize {
		self.incidence.get(node).map_or(0, Vec::len)
	}

	/// Nodes sharing at least one edge with `node`, in either direction.
	/// Contains `node` itself only if it has a self-loop.
	pub fn neighbors(&self, node: NodeIx) -> HashSet<NodeIx> {
		self.incident_edges(node)
			.map(|edge| {
				if edge.source == node {
					edge.target
				} else {
					edge.source
				}
			})
			.collect()
	}

	/// Permanently drop every node for which `keep` is false, together with
	/// every edge touching one. Returns the number of nodes removed.
	///
	/// Node indices are reassigned; ids are not.
	pub fn retain_nodes(&mut self, mut keep: impl FnMut(NodeIx, &Node) -> bool) -> usize {
		let mut remap: Vec<Option<NodeIx>> = Vec::with_capacity(self.nodes.len());
		let mut kept_nodes = Vec::with_capacity(self.nodes.len());
		for (ix, node) in std::mem::take(&mut self.nodes).into_iter().enumerate() {
			if keep(ix, &node) {
				remap.push(Some(kept_nodes.len()));
				kept_nodes.push(node);
			} else {
				remap.push(None);
			}
		}
		let removed = remap.len() - kept_nodes.len();

		let edges = std::mem::take(&mut self.edges);
		self.nodes = kept_nodes;
		self.index = self
			.nodes
			.iter()
			.enumerate()
			.map(|(ix, node)| (node.id.clone(), ix))
			.collect();
		self.incidence = vec![Vec::new(); self.nodes.len()];

		for mut edge in edges {
			if let (Some(source), Some(target)) = (remap[edge.source], remap[edge.target]) {
				edge.source = source;
				edge.target = target;
				let edge_ix = self.edges.len();
				self.incidence[source].push(edge_ix);
				if target != source {
					self.incidence[target].push(edge_ix);
				}
				self.edges.push(edge);
			}
		}

		removed
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn triangle() -> SocialGraph {
		let mut graph = SocialGraph::new();
		graph.add_node("a", "Alice");
		graph.add_node("b", "Bob");
		graph.add_node("c", "");
		graph.add_edge("ab", "a", "b", 1.0).unwrap();
		graph.add_edge("bc", "b", "c", 10.0).unwrap();
		graph
	}

	#[test]
	fn edge_to_unknown_node_is_rejected() {
		let mut graph = triangle();
		assert_eq!(graph.add_edge("ax", "a", "x", 1.0), None);
		assert_eq!(graph.edge_count(), 2);
	}

	#[test]
	fn duplicate_node_id_keeps_first() {
		let mut graph = triangle();
		let ix = graph.add_node("a", "Other");
		assert_eq!(ix, 0);
		assert_eq!(graph.node(0).unwrap().label, "Alice");
	}

	#[test]
	fn find_matches_ids_then_labels() {
		let graph = triangle();
		assert_eq!(graph.find("b").map(Node::id), Some("b"));
		assert_eq!(graph.find("  alice ").map(Node::id), Some("a"));
		assert!(graph.find("").is_none());
		assert!(graph.find("c").is_some());
		assert!(graph.find("Carol").is_none());
	}

	#[test]
	fn neighbors_cover_both_directions() {
		let graph = triangle();
		let b = graph.node_index("b").unwrap();
		let neighbors = graph.neighbors(b);
		assert_eq!(neighbors.len(), 2);
		assert!(neighbors.contains(&graph.node_index("a").unwrap()));
		assert!(neighbors.contains(&graph.node_index("c").unwrap()));
	}

	#[test]
	fn self_loops_and_parallel_edges_are_kept() {
		let mut graph = triangle();
		graph.add_edge("aa", "a", "a", 2.0).unwrap();
		graph.add_edge("ab2", "a", "b", 3.0).unwrap();
		assert_eq!(graph.edge_count(), 4);
		assert_eq!(graph.degree(0), 3);
		assert!(graph.neighbors(0).contains(&0));
	}

	#[test]
	fn retain_nodes_drops_touching_edges_and_reindexes() {
		let mut graph = triangle();
		let removed = graph.retain_nodes(|_, node| node.id() != "a");
		assert_eq!(removed, 1);
		assert_eq!(graph.node_count(), 2);
		assert_eq!(graph.edge_count(), 1);
		assert_eq!(graph.node_index("b"), Some(0));
		assert!(!graph.contains_node("a"));
		let edge = &graph.edges()[0];
		assert_eq!(edge.id(), "bc");
		assert_eq!((edge.source(), edge.target()), (0, 1));
		assert_eq!(graph.incident_edges(1).count(), 1);
	}

	#[test]
	fn focus_accessors_follow_the_enum() {
		let mut graph = triangle();
		let node = graph.node_mut(0).unwrap();
		node.size = 3.0;
		node.set_focus(NodeFocus::Clicked(Inflation::Quadruple));
		assert!(node.is_clicked() && node.is_highlighted());
		assert!(node.is_size_quadrupled() && !node.is_size_doubled());
		assert_eq!(node.display_size(), 12.0);
		node.set_focus(NodeFocus::Hidden);
		assert!(node.is_hidden() && node.is_hidden_from_click());
		assert_eq!(node.display_size(), 3.0);

		let edge = &mut graph.edges_mut()[0];
		edge.set_culled(true);
		assert!(edge.is_hidden() && edge.default_hidden());
		edge.set_focus(EdgeFocus::Revealed);
		assert!(!edge.is_hidden());
	}
}
