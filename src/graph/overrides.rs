//! Per-node icon overrides, served next to the app as `custom.json`.
//!
//! ```json
//! { "nodes": [ { "id": "node id", "image": "./Image.svg" } ] }
//! ```

use log::debug;
use serde::Deserialize;

use super::SocialGraph;
use crate::error::GraphError;

/// A single icon assignment.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NodeOverride {
	pub id: String,
	pub image: String,
}

/// The overrides document.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Overrides {
	#[serde(default)]
	pub nodes: Vec<NodeOverride>,
}

impl Overrides {
	pub fn from_json(text: &str) -> Result<Self, GraphError> {
		Ok(serde_json::from_str(text)?)
	}

	/// Assign each override's image to its node. Ids that are not in the graph
	/// are skipped. Returns the number of nodes updated.
	pub fn apply(&self, graph: &mut SocialGraph) -> usize {
		let mut applied = 0;
		for entry in &self.nodes {
			match graph.node_by_id_mut(&entry.id) {
				Some(node) => {
					node.image = Some(entry.image.clone());
					applied += 1;
				}
				None => debug!("ping-graph: override for unknown node {:?} ignored", entry.id),
			}
		}
		applied
	}
}
