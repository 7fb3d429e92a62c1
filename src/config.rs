//! Session configuration: where the graph comes from and how it is presented.

use crate::error::GraphError;
use crate::focus::FocusConfig;
use crate::layout::LayoutConfig;
use crate::style::StyleConfig;

/// Build-time environment variable holding the GEXF location.
pub const GRAPH_URL_VAR: &str = "PING_GRAPH_GEXF_URL";

/// Where icon overrides are served, relative to the app.
pub const DEFAULT_OVERRIDES_URL: &str = "/custom.json";

const DARK_MODE_COOKIE: &str = "darkMode";

/// Light or dark presentation. Picks the palette and background only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PresentationMode {
	#[default]
	Light,
	Dark,
}

impl PresentationMode {
	/// Read the mode from a `document.cookie` string.
	pub fn from_cookies(cookies: &str) -> Self {
		let dark = cookies
			.split(';')
			.filter_map(|pair| pair.trim().split_once('='))
			.any(|(name, value)| name == DARK_MODE_COOKIE && value == "true");
		if dark {
			PresentationMode::Dark
		} else {
			PresentationMode::Light
		}
	}

	/// Cookie assignment persisting this mode.
	pub fn to_cookie(self) -> String {
		format!("{DARK_MODE_COOKIE}={}; path=/;", self.is_dark())
	}

	pub fn is_dark(self) -> bool {
		self == PresentationMode::Dark
	}

	pub fn toggled(self) -> Self {
		match self {
			PresentationMode::Light => PresentationMode::Dark,
			PresentationMode::Dark => PresentationMode::Light,
		}
	}
}

/// Everything the loader and the canvas need for one session.
#[derive(Clone, Debug)]
pub struct AppConfig {
	pub graph_url: String,
	pub overrides_url: String,
	pub mode: PresentationMode,
	pub style: StyleConfig,
	pub layout: LayoutConfig,
	pub focus: FocusConfig,
}

impl AppConfig {
	/// Fails with [`GraphError::ConfigurationMissing`] when no graph location is
	/// given, or it is blank.
	pub fn new(graph_url: Option<&str>, mode: PresentationMode) -> Result<Self, GraphError> {
		let graph_url = graph_url
			.map(str::trim)
			.filter(|url| !url.is_empty())
			.ok_or(GraphError::ConfigurationMissing(GRAPH_URL_VAR))?;
		Ok(Self {
			graph_url: graph_url.to_string(),
			overrides_url: DEFAULT_OVERRIDES_URL.to_string(),
			mode,
			style: StyleConfig::default(),
			layout: LayoutConfig::default(),
			focus: FocusConfig::default(),
		})
	}

	/// Configuration baked in at build time via `PING_GRAPH_GEXF_URL`.
	pub fn from_build_env(mode: PresentationMode) -> Result<Self, GraphError> {
		Self::new(option_env!("PING_GRAPH_GEXF_URL"), mode)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_or_blank_url_is_fatal() {
		for url in [None, Some(""), Some("   ")] {
			assert!(matches!(
				AppConfig::new(url, PresentationMode::Light),
				Err(GraphError::ConfigurationMissing(GRAPH_URL_VAR))
			));
		}
	}

	#[test]
	fn url_is_trimmed() {
		let config = AppConfig::new(Some(" https://stats/graph.gexf "), PresentationMode::Dark).unwrap();
		assert_eq!(config.graph_url, "https://stats/graph.gexf");
		assert_eq!(config.overrides_url, DEFAULT_OVERRIDES_URL);
		assert!(config.mode.is_dark());
	}

	#[test]
	fn dark_mode_cookie_round_trips() {
		assert_eq!(
			PresentationMode::from_cookies("theme=x; darkMode=true"),
			PresentationMode::Dark
		);
		assert_eq!(
			PresentationMode::from_cookies("darkMode=false"),
			PresentationMode::Light
		);
		assert_eq!(PresentationMode::from_cookies(""), PresentationMode::Light);
		assert_eq!(
			PresentationMode::from_cookies("notdarkMode=true"),
			PresentationMode::Light
		);
		assert_eq!(PresentationMode::Dark.to_cookie(), "darkMode=true; path=/;");
		assert_eq!(PresentationMode::Light.toggled(), PresentationMode::Dark);
	}
}
