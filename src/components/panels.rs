//! Overlay controls: search, zoom, fullscreen, theme toggle and the
//! collapsible info panels.

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlDocument};

use super::social_graph::ViewCommand;
use crate::config::PresentationMode;
use crate::graph::SocialGraph;
use crate::loader::Session;
use crate::style::StylingReport;

const USER_LIST_ID: &str = "ping-graph-users";

/// What a search box entry resolves to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchTarget {
	/// The box was emptied.
	Clear,
	Node(String),
	NoMatch,
}

pub fn resolve_search(graph: &SocialGraph, query: &str) -> SearchTarget {
	if query.trim().is_empty() {
		return SearchTarget::Clear;
	}
	match graph.find(query) {
		Some(node) => SearchTarget::Node(node.id().to_string()),
		None => SearchTarget::NoMatch,
	}
}

/// Text for the culling panel.
pub fn culling_summary(report: &StylingReport) -> Vec<String> {
	let mut lines = Vec::new();
	if report.edges_culled > 0 {
		lines.push(format!(
			"{} of the lightest connections are hidden. Click a user to see all of theirs.",
			report.edges_culled
		));
	}
	if report.isolated_removed > 0 {
		lines.push(format!(
			"{} users without any connection are not shown.",
			report.isolated_removed
		));
	}
	if report.nodes_removed > 0 {
		lines.push(format!(
			"{} users with the least activity were left out.",
			report.nodes_removed
		));
	}
	if lines.is_empty() {
		lines.push("Nothing is hidden.".to_string());
	}
	lines
}

/// Persist the given mode and reload, so palettes are rebuilt from scratch.
fn switch_mode(mode: PresentationMode) {
	let Some(window) = web_sys::window() else {
		return;
	};
	match window
		.document()
		.and_then(|document| document.dyn_into::<HtmlDocument>().ok())
	{
		Some(document) => {
			if let Err(err) = document.set_cookie(&mode.to_cookie()) {
				warn!("ping-graph: cannot store theme cookie: {err:?}");
			}
		}
		None => warn!("ping-graph: no HTML document to store the theme in"),
	}
	if let Err(err) = window.location().reload() {
		warn!("ping-graph: reload failed: {err:?}");
	}
}

/// Enter fullscreen on the whole page, or leave it if already there.
fn toggle_fullscreen() {
	let Some(document) = web_sys::window().and_then(|window| window.document()) else {
		return;
	};
	if document.fullscreen_element().is_some() {
		document.exit_fullscreen();
		return;
	}
	match document.document_element() {
		Some(root) => {
			if let Err(err) = root.request_fullscreen() {
				warn!("ping-graph: fullscreen refused: {err:?}");
			}
		}
		None => warn!("ping-graph: no document element to show fullscreen"),
	}
}

/// A titled section that folds open and closed.
#[component]
pub fn Panel(
	title: &'static str,
	#[prop(default = false)] initially_deployed: bool,
	children: Children,
) -> impl IntoView {
	let (deployed, set_deployed) = signal(initially_deployed);
	view! {
		<div class="panel">
			<h2 class="panel-title">
				<span>{title}</span>
				<button
					type="button"
					class="panel-toggle"
					on:click=move |_| set_deployed.update(|open| *open = !*open)
				>
					{move || if deployed.get() { "\u{2212}" } else { "+" }}
				</button>
			</h2>
			<div class="panel-body" class:collapsed=move || !deployed.get()>
				{children()}
			</div>
		</div>
	}
}

#[component]
pub fn InfoPanel() -> impl IntoView {
	view! {
		<Panel title="Info" initially_deployed=true>
			<p>
				"This tracks how much users ping and reply-ping each other. The more a user pings another, "
				"the closer they sit in the graph and the thicker the line between them."
			</p>
			<p>
				"Nodes with a question mark are anonymous users. Users are anonymous by default "
				"and can choose to reveal themselves."
			</p>
			<p>"Scroll to zoom, drag to pan, click a user to see everyone they talk to."</p>
		</Panel>
	}
}

#[component]
pub fn FaqPanel() -> impl IntoView {
	view! {
		<Panel title="FAQ">
			<p>
				<i>"Why am I not showing up in the graph?"</i>
				<br />
				"Run "<b>"s$optin"</b>". If you still do not show up, you were most likely culled "
				"(see below). Wait a bit until you have more activity."
			</p>
			<p>
				<i>"How long has data been collected?"</i>
				<br />
				"Since 2024-11-24 in the #general channel, with an outage between 2025-02-22 "
				"(estimated) and 2025-03-07."
			</p>
			<p>
				<i>"What happened to my data?"</i>
				<br />
				"Leaving the server opts you out and removes your data. So does opting out "
				"manually with "<b>"s$optout"</b>"."
			</p>
			<p>
				<i>"Where is the source code?"</i>
				<br />
				<a href="https://github.com/allthingslinux/stats-backend">"Backend source code"</a>
				<br />
				<a href="https://github.com/allthingslinux/stats-frontend">"Frontend source code"</a>
			</p>
		</Panel>
	}
}

#[component]
pub fn CullingPanel(#[prop(into)] session: Signal<Option<Session>>) -> impl IntoView {
	let lines = move || {
		session.with(|session| {
			session
				.as_ref()
				.map(|session| culling_summary(&session.report))
				.unwrap_or_default()
		})
	};
	view! {
		<Panel title="Culling">
			<ul class="culling">
				{move || lines().into_iter().map(|line| view! { <li>{line}</li> }).collect_view()}
			</ul>
		</Panel>
	}
}

/// Search input with suggestions from the user labels.
#[component]
pub fn SearchBox(
	#[prop(into)] session: Signal<Option<Session>>,
	on_select: WriteSignal<Option<String>>,
) -> impl IntoView {
	let on_change = move |ev: Event| {
		let query = event_target_value(&ev);
		let target = session.with_untracked(|session| {
			session
				.as_ref()
				.map(|session| resolve_search(&session.graph, &query))
		});
		match target {
			Some(SearchTarget::Clear) => on_select.set(None),
			Some(SearchTarget::Node(id)) => on_select.set(Some(id)),
			Some(SearchTarget::NoMatch) => debug!("ping-graph: no user matches {query:?}"),
			None => {}
		}
	};

	let suggestions = move || {
		session.with(|session| {
			session.as_ref().map(|session| {
				session
					.graph
					.nodes()
					.iter()
					.filter(|node| !node.is_anonymous())
					.map(|node| view! { <option value=node.label.clone() /> })
					.collect_view()
			})
		})
	};

	view! {
		<div class="search">
			<input
				type="search"
				placeholder="Search users..."
				list=USER_LIST_ID
				on:change=on_change
			/>
			<datalist id=USER_LIST_ID>{suggestions}</datalist>
		</div>
	}
}

/// Zoom in, zoom out and reset buttons for the canvas.
#[component]
pub fn ZoomControls(on_command: WriteSignal<Option<ViewCommand>>) -> impl IntoView {
	let button = move |command: ViewCommand, label: &'static str, glyph: &'static str| {
		view! {
			<button
				type="button"
				class="zoom-control"
				title=label
				aria-label=label
				on:click=move |_| on_command.set(Some(command))
			>
				{glyph}
			</button>
		}
	};
	view! {
		<div class="zoom-controls">
			{button(ViewCommand::ZoomIn, "Zoom in", "+")}
			{button(ViewCommand::ZoomOut, "Zoom out", "\u{2212}")}
			{button(ViewCommand::Reset, "Reset view", "\u{25ce}")}
		</div>
	}
}

#[component]
pub fn FullScreenButton() -> impl IntoView {
	view! {
		<button
			type="button"
			class="fullscreen-toggle"
			title="Toggle fullscreen"
			aria-label="Toggle fullscreen"
			on:click=move |_| toggle_fullscreen()
		>
			"\u{26f6}"
		</button>
	}
}

#[component]
pub fn DarkModeButton(mode: PresentationMode) -> impl IntoView {
	let label = if mode.is_dark() {
		"Switch to light mode"
	} else {
		"Switch to dark mode"
	};
	view! {
		<button
			type="button"
			class="dark-mode-toggle"
			title=label
			aria-label=label
			on:click=move |_| switch_mode(mode.toggled())
		>
			{if mode.is_dark() { "\u{2600}" } else { "\u{263e}" }}
		</button>
	}
}
