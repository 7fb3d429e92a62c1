//! ping-graph: interactive visualization of who pings whom.
//!
//! Loads a GEXF interaction graph, styles it from weighted degree, lays it out
//! with a force simulation and renders it on a canvas with click-to-focus,
//! search, pan/zoom and light/dark presentation.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::*;
use log::{Level, error, info};
use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;

pub mod components;
pub mod config;
pub mod error;
pub mod focus;
pub mod graph;
pub mod layout;
pub mod loader;
pub mod style;

pub use components::social_graph::SocialGraphCanvas;
pub use config::{AppConfig, PresentationMode};
pub use error::GraphError;

use components::panels::{
	CullingPanel, DarkModeButton, FaqPanel, FullScreenButton, InfoPanel, SearchBox, ZoomControls,
};
use components::social_graph::ViewCommand;
use graph::overrides::Overrides;
use loader::Session;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("ping-graph: logging initialized");
}

/// Presentation mode stored in the `darkMode` cookie, light when unset.
fn stored_mode() -> PresentationMode {
	web_sys::window()
		.and_then(|window| window.document())
		.and_then(|document| document.dyn_into::<HtmlDocument>().ok())
		.and_then(|document| document.cookie().ok())
		.map(|cookies| PresentationMode::from_cookies(&cookies))
		.unwrap_or_default()
}

/// Main application component.
/// Starts the load, then renders the canvas with its overlay controls.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let mode = stored_mode();
	let (session, set_session) = signal(None::<Session>);
	let (overrides, set_overrides) = signal(None::<Overrides>);
	let (selection, set_selection) = signal(None::<String>);
	let (command, set_command) = signal(None::<ViewCommand>);
	let (load_error, set_load_error) = signal(None::<String>);

	let config = match AppConfig::from_build_env(mode) {
		Ok(config) => {
			let load_config = config.clone();
			spawn_local(async move {
				loader::load(
					load_config,
					move |session| set_session.set(Some(session)),
					move |overrides| set_overrides.set(Some(overrides)),
					move |err| set_load_error.set(Some(err.to_string())),
				)
				.await;
			});
			Some(config)
		}
		Err(err) => {
			error!("ping-graph: {err}");
			set_load_error.set(Some(err.to_string()));
			None
		}
	};

	let theme_name = if mode.is_dark() { "dark" } else { "light" };
	let canvas = config.map(|config| {
		view! {
			<SocialGraphCanvas
				session=session
				overrides=overrides
				selection=selection
				command=command
				config=config
				fullscreen=true
			/>
		}
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme=theme_name />
		<Title text="Ping Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			{canvas}
			{move || {
				load_error
					.get()
					.map(|message| {
						view! {
							<div class="graph-error" role="alert">
								<b>"The graph could not be loaded."</b>
								<p>{message}</p>
							</div>
						}
					})
			}}
			<div class="graph-overlay">
				<div class="graph-controls">
					<SearchBox session=session on_select=set_selection />
					<ZoomControls on_command=set_command />
					<FullScreenButton />
					<DarkModeButton mode=mode />
				</div>
				<InfoPanel />
				<FaqPanel />
				<CullingPanel session=session />
			</div>
		</div>
	}
}
