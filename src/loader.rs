//! Load-time pipeline: fetch, parse, anonymize, style.
//!
//! The graph and the overrides are requested together. The graph is awaited
//! first and styled as soon as it arrives; the overrides are awaited after,
//! and since they only carry icons they can land before or after styling
//! without changing any size or color.

use log::{error, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::config::AppConfig;
use crate::error::GraphError;
use crate::graph::SocialGraph;
use crate::graph::gexf;
use crate::graph::overrides::Overrides;
use crate::style::pipeline::{self, StylingReport};
use crate::style::{Palette, VisualMapper};

/// Label the backend gives users who have not opted into being named.
pub const ANONYMOUS_LABEL: &str = "Anonymous User";

/// Icon drawn for anonymized users.
pub const ANONYMOUS_ICON: &str = "./QuestionMark.svg";

/// A styled graph, ready for layout and display.
#[derive(Clone, Debug)]
pub struct Session {
	pub graph: SocialGraph,
	pub report: StylingReport,
}

/// Blank out anonymous labels and give those nodes the question-mark icon.
/// Returns the number of nodes anonymized.
pub fn anonymize(graph: &mut SocialGraph) -> usize {
	let mut count = 0;
	for node in graph.nodes_mut() {
		if node.label == ANONYMOUS_LABEL {
			node.label.clear();
			node.image = Some(ANONYMOUS_ICON.to_string());
			count += 1;
		}
	}
	count
}

/// Parse and style a GEXF document with the session's configuration.
pub fn prepare_session(gexf_text: &str, config: &AppConfig) -> Result<Session, GraphError> {
	let mut graph = gexf::parse(gexf_text)?;
	let anonymous = anonymize(&mut graph);
	let mapper = VisualMapper::new(Palette::for_mode(config.mode));
	let report = pipeline::run(&mut graph, &mapper, &config.style, None);
	info!(
		"ping-graph: styled {} nodes ({} anonymous), {} edges",
		graph.node_count(),
		anonymous,
		graph.edge_count()
	);
	Ok(Session { graph, report })
}

/// A `fetch` that has been started but not awaited.
pub struct PendingFetch {
	url: String,
	response: Result<JsFuture, GraphError>,
}

impl PendingFetch {
	/// Issue the request now.
	pub fn start(url: &str) -> Self {
		let response = web_sys::window()
			.map(|window| JsFuture::from(window.fetch_with_str(url)))
			.ok_or_else(|| GraphError::Fetch {
				url: url.to_string(),
				reason: "no window".into(),
			});
		Self {
			url: url.to_string(),
			response,
		}
	}

	/// Await the response body as text. Non-2xx statuses are failures.
	pub async fn text(self) -> Result<String, GraphError> {
		let Self { url, response } = self;
		let failure = |reason: String| GraphError::Fetch {
			url: url.clone(),
			reason,
		};
		let value = response?.await.map_err(|err| failure(format!("{err:?}")))?;
		let response: Response = value
			.dyn_into()
			.map_err(|_| failure("not a Response".into()))?;
		if !response.ok() {
			return Err(failure(format!("HTTP {}", response.status())));
		}
		let body = response.text().map_err(|err| failure(format!("{err:?}")))?;
		let text = JsFuture::from(body)
			.await
			.map_err(|err| failure(format!("{err:?}")))?;
		text.as_string()
			.ok_or_else(|| failure("body is not text".into()))
	}
}

/// Await the graph request and build the session from it.
pub async fn load_graph(request: PendingFetch, config: &AppConfig) -> Result<Session, GraphError> {
	let text = request.text().await?;
	prepare_session(&text, config)
}

/// Await the overrides request. Any failure is logged and yields `None`.
pub async fn load_overrides(request: PendingFetch) -> Option<Overrides> {
	let result = match request.text().await {
		Ok(text) => Overrides::from_json(&text),
		Err(err) => Err(err),
	};
	match result {
		Ok(overrides) => {
			info!("ping-graph: loaded {} icon overrides", overrides.nodes.len());
			Some(overrides)
		}
		Err(err) => {
			warn!("ping-graph: continuing without icon overrides: {err}");
			None
		}
	}
}

/// Run the whole load, reporting each stage through the given callbacks.
/// A graph failure is fatal and skips the overrides.
pub async fn load(
	config: AppConfig,
	on_session: impl FnOnce(Session),
	on_overrides: impl FnOnce(Overrides),
	on_error: impl FnOnce(GraphError),
) {
	let graph_request = PendingFetch::start(&config.graph_url);
	let overrides_request = PendingFetch::start(&config.overrides_url);

	match load_graph(graph_request, &config).await {
		Ok(session) => on_session(session),
		Err(err) => {
			error!("ping-graph: {err}");
			on_error(err);
			return;
		}
	}

	if let Some(overrides) = load_overrides(overrides_request).await {
		on_overrides(overrides);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::PresentationMode;

	const GEXF: &str = r#"<gexf><graph>
		<nodes>
			<node id="1" label="Tux"/>
			<node id="2" label="Anonymous User"/>
			<node id="3" label="Ferris"/>
			<node id="4" label="Nobody"/>
		</nodes>
		<edges>
			<edge source="1" target="2" weight="2"/>
			<edge source="2" target="3" weight="8"/>
		</edges>
	</graph></gexf>"#;

	fn config() -> AppConfig {
		AppConfig::new(Some("/graph.gexf"), PresentationMode::Light).unwrap()
	}

	#[test]
	fn prepares_a_styled_session() {
		let session = prepare_session(GEXF, &config()).unwrap();
		let graph = &session.graph;
		assert_eq!(graph.node_count(), 3);
		assert_eq!(session.report.isolated_removed, 1);
		assert_eq!(session.report.edges_culled, 1);

		let anonymous = graph.node_by_id("2").unwrap();
		assert!(anonymous.is_anonymous());
		assert_eq!(anonymous.image.as_deref(), Some(ANONYMOUS_ICON));
		assert_eq!(anonymous.weight, 10.0);
		assert!(graph.nodes().iter().all(|node| !node.color.is_empty()));
	}

	#[test]
	fn dark_mode_changes_colors_only() {
		let light = prepare_session(GEXF, &config()).unwrap();
		let mut dark_config = config();
		dark_config.mode = PresentationMode::Dark;
		let dark = prepare_session(GEXF, &dark_config).unwrap();

		for (l, d) in light.graph.nodes().iter().zip(dark.graph.nodes()) {
			assert_eq!(l.size, d.size);
			assert_eq!(l.weight, d.weight);
			assert_ne!(l.color, d.color);
		}
	}

	#[test]
	fn malformed_graph_is_fatal() {
		assert!(matches!(
			prepare_session("<html><body>404</body></html>", &config()),
			Err(GraphError::Gexf(_))
		));
	}
}
