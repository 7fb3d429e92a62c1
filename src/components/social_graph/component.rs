//! Leptos component wrapping the social graph canvas.
//!
//! The component owns a working copy of the session graph. On mount it seeds
//! the layout and starts a `requestAnimationFrame` loop that advances the
//! layout job one batch per frame and redraws. Clicks, search selections and
//! icon overrides all mutate that working copy.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::images::ImageCache;
use super::render;
use super::scale::ScaleConfig;
use super::state::{ViewCommand, ViewState};
use super::theme::Theme;
use crate::config::AppConfig;
use crate::focus::FocusMachine;
use crate::graph::SocialGraph;
use crate::graph::overrides::Overrides;
use crate::layout::{self, LayoutJob, LayoutProgress};
use crate::loader::Session;

/// Everything the animation loop and the event handlers share.
struct GraphContext {
	graph: SocialGraph,
	focus: FocusMachine,
	layout: Option<LayoutJob>,
	layout_started: f64,
	view: ViewState,
	scale: ScaleConfig,
	theme: Theme,
	images: ImageCache,
}

impl GraphContext {
	/// Advance the layout by one batch; apply it once it is done.
	fn advance_layout(&mut self) {
		let Some(job) = self.layout.as_mut() else {
			return;
		};
		match job.step() {
			LayoutProgress::Running { .. } => {}
			LayoutProgress::Cancelled => self.layout = None,
			LayoutProgress::Finished => {
				if let Some(positions) = self.layout.take().and_then(LayoutJob::finish) {
					positions.apply(&mut self.graph);
					self.focus.reapply(&mut self.graph);
					if !self.view.touched {
						self.view.fit(&self.graph);
					}
					info!(
						"ping-graph: layout applied to {} nodes in {:.0} ms",
						positions.len(),
						js_sys::Date::now() - self.layout_started
					);
				}
			}
		}
	}

	fn cancel_layout(&mut self) {
		if let Some(mut job) = self.layout.take() {
			job.cancel();
			debug!(
				"ping-graph: layout cancelled with {} iterations left",
				job.remaining()
			);
		}
	}

	fn click(&mut self, sx: f64, sy: f64) {
		match self.view.node_at_position(&self.graph, sx, sy, &self.scale) {
			Some(ix) => {
				let id = self.graph.node(ix).map(|node| node.id().to_string());
				if let Some(id) = id {
					self.focus.click_node(&mut self.graph, &id);
				}
			}
			None => self.focus.click_stage(&mut self.graph),
		}
	}
}

fn viewport(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders the session graph on a canvas element.
///
/// The canvas stays blank until `session` holds a graph. `overrides` may
/// arrive at any point and only swaps node icons. Every new value of
/// `selection` behaves like a click on that node; `None` returns to the
/// default view. Each new `command` zooms or refits the view.
#[component]
pub fn SocialGraphCanvas(
	#[prop(into)] session: Signal<Option<Session>>,
	#[prop(into)] overrides: Signal<Option<Overrides>>,
	#[prop(into)] selection: Signal<Option<String>>,
	#[prop(into)] command: Signal<Option<ViewCommand>>,
	config: AppConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some(session) = session.get() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			viewport(&window).unwrap_or((800.0, 600.0))
		} else {
			let parent = canvas.parent_element();
			(
				width.unwrap_or_else(|| parent.as_ref().map_or(800.0, |p| p.client_width() as f64)),
				height.unwrap_or_else(|| parent.as_ref().map_or(600.0, |p| p.client_height() as f64)),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			return;
		};

		let mut graph = session.graph;
		let job = layout::prepare(&mut graph, &config.layout);
		if let Some(overrides) = overrides.get_untracked() {
			overrides.apply(&mut graph);
		}
		let focus = FocusMachine::new(config.focus.clone());
		focus.reapply(&mut graph);
		let mut view = ViewState::new(w, h);
		view.fit(&graph);

		*context_init.borrow_mut() = Some(GraphContext {
			graph,
			focus,
			layout: Some(job),
			layout_started: js_sys::Date::now(),
			view,
			scale: ScaleConfig::default(),
			theme: Theme::for_mode(config.mode),
			images: ImageCache::default(),
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(viewport) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.view.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let mounted = canvas.is_connected();
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				if !mounted {
					c.cancel_layout();
					return;
				}
				c.advance_layout();
				render::render(&c.view, &c.graph, &ctx, &c.scale, &c.theme, &mut c.images);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(window) = web_sys::window() {
					let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_ov = context.clone();
	Effect::new(move |_| {
		let Some(overrides) = overrides.get() else {
			return;
		};
		if let Some(ref mut c) = *context_ov.borrow_mut() {
			let applied = overrides.apply(&mut c.graph);
			debug!("ping-graph: {applied} icon overrides applied to the canvas");
		}
	});

	let context_sel = context.clone();
	Effect::new(move |_| {
		let target = selection.get();
		if let Some(ref mut c) = *context_sel.borrow_mut() {
			if let Some((x, y)) = c.focus.search_select(&mut c.graph, target.as_deref()) {
				c.view.center_on(x, y);
			}
		}
	});

	let context_cmd = context.clone();
	Effect::new(move |_| {
		let Some(command) = command.get() else {
			return;
		};
		if let Some(ref mut c) = *context_cmd.borrow_mut() {
			c.view.apply(command, &c.graph, &c.scale);
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.view.begin_pan(x, y);
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			c.view.pointer = (x, y);
			if c.view.pan.active {
				c.view.drag_to(x, y);
			}
			c.view.hovered = if c.view.pan.moved {
				None
			} else {
				c.view.node_at_position(&c.graph, x, y, &c.scale)
			};
			if let Some(canvas) = canvas_ref.get() {
				let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", c.view.cursor());
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			if c.view.end_pan() {
				c.click(x, y);
			}
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.view.end_pan();
			c.view.hovered = None;
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			c.view.zoom_at(x, y, factor, &c.scale);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="social-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
