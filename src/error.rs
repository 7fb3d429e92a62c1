//! Errors raised while loading the session graph.
//!
//! Degenerate statistic ranges and clicks on unknown nodes are not errors:
//! the mapper and the focus machine recover from both locally.

/// Failure while configuring, fetching, or parsing graph input.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
	#[error("required configuration missing: {0}")]
	ConfigurationMissing(&'static str),
	#[error("failed to fetch {url}: {reason}")]
	Fetch { url: String, reason: String },
	#[error("malformed GEXF: {0}")]
	Gexf(String),
	#[error("malformed overrides document: {0}")]
	Overrides(#[from] serde_json::Error),
}

impl From<quick_xml::Error> for GraphError {
	fn from(err: quick_xml::Error) -> Self {
		GraphError::Gexf(err.to_string())
	}
}

impl From<quick_xml::events::attributes::AttrError> for GraphError {
	fn from(err: quick_xml::events::attributes::AttrError) -> Self {
		GraphError::Gexf(err.to_string())
	}
}
