//! Minimal GEXF reader.
//!
//! Only what the visualization consumes is read: node `id`/`label` and edge
//! `id`/`source`/`target`/`weight`. Everything else in the document
//! (attribute declarations, `viz:` hints, metadata) is skipped.

use std::collections::HashSet;

use log::debug;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::SocialGraph;
use crate::error::GraphError;

/// Weight of an edge that carries no `weight` attribute.
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

struct PendingEdge {
	id: Option<String>,
	source: String,
	target: String,
	weight: f64,
}

/// Parse a GEXF document into a fresh [`SocialGraph`].
///
/// A node without a label is labeled with its id. Edges are attached after all
/// nodes are read, so their position in the document does not matter; an edge
/// naming a node that does not exist is an error.
pub fn parse(text: &str) -> Result<SocialGraph, GraphError> {
	let mut reader = Reader::from_str(text);
	reader.trim_text(true);

	let mut graph = SocialGraph::new();
	let mut edges = Vec::new();
	let mut saw_root = false;

	loop {
		match reader.read_event()? {
			Event::Start(element) | Event::Empty(element) => {
				match element.local_name().as_ref() {
					b"gexf" => saw_root = true,
					b"node" => {
						let id = required(&element, "node", "id")?;
						if graph.contains_node(&id) {
							return Err(GraphError::Gexf(format!("duplicate node id {id:?}")));
						}
						let label = attribute(&element, "label")?.unwrap_or_else(|| id.clone());
						graph.add_node(id, label);
					}
					b"edge" => {
						let source = required(&element, "edge", "source")?;
						let target = required(&element, "edge", "target")?;
						let id = attribute(&element, "id")?;
						let weight = match attribute(&element, "weight")? {
							Some(raw) => {
								let name = id.clone().unwrap_or_else(|| format!("{source}->{target}"));
								parse_weight(&name, &raw)?
							}
							None => DEFAULT_EDGE_WEIGHT,
						};
						edges.push(PendingEdge {
							id,
							source,
							target,
							weight,
						});
					}
					_ => {}
				}
			}
			Event::Eof => break,
			_ => {}
		}
	}

	if !saw_root {
		return Err(GraphError::Gexf("missing <gexf> root element".into()));
	}

	let mut taken: HashSet<String> = edges.iter().filter_map(|edge| edge.id.clone()).collect();
	let mut next = 0;
	for (position, edge) in edges.into_iter().enumerate() {
		let id = match edge.id {
			Some(id) => id,
			None => {
				next = next.max(position);
				while taken.contains(&format!("e{next}")) {
					next += 1;
				}
				let id = format!("e{next}");
				taken.insert(id.clone());
				next += 1;
				id
			}
		};
		if graph
			.add_edge(id.clone(), &edge.source, &edge.target, edge.weight)
			.is_none()
		{
			return Err(GraphError::Gexf(format!(
				"edge {:?} references unknown node ({:?} -> {:?})",
				id, edge.source, edge.target
			)));
		}
	}

	debug!(
		"ping-graph: parsed GEXF with {} nodes, {} edges",
		graph.node_count(),
		graph.edge_count()
	);
	Ok(graph)
}

fn attribute(element: &BytesStart, name: &str) -> Result<Option<String>, GraphError> {
	for attr in element.attributes() {
		let attr = attr?;
		if attr.key.local_name().as_ref() == name.as_bytes() {
			return Ok(Some(attr.unescape_value()?.into_owned()));
		}
	}
	Ok(None)
}

fn required(element: &BytesStart, kind: &str, name: &str) -> Result<String, GraphError> {
	attribute(element, name)?
		.ok_or_else(|| GraphError::Gexf(format!("<{kind}> without {name:?} attribute")))
}

fn parse_weight(edge: &str, raw: &str) -> Result<f64, GraphError> {
	match raw.trim().parse::<f64>() {
		Ok(weight) if weight.is_finite() => Ok(weight),
		_ => Err(GraphError::Gexf(format!(
			"edge {edge:?} has invalid weight {raw:?}"
		))),
	}
}
