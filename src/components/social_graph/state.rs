//! View state and pointer interaction tracking.
//!
//! The graph itself lives in [`crate::graph::SocialGraph`]; this module only
//! knows how world coordinates map to the canvas, what the pointer is doing,
//! and which node is under it.

use crate::graph::{NodeFocus, NodeIx, SocialGraph};

use super::scale::{ScaleConfig, ScaledValues};

/// Pointer travel (pixels) below which a press and release is a click.
pub const CLICK_TOLERANCE: f64 = 4.0;

/// Share of the canvas left empty around the graph when fitting.
const FIT_MARGIN: f64 = 0.1;

/// Zoom factor of one zoom button press.
pub const ZOOM_STEP: f64 = 1.5;

/// View changes requested from outside the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewCommand {
	ZoomIn,
	ZoomOut,
	/// Refit the visible graph and forget earlier pans and zooms.
	Reset,
}

/// Pan and zoom applied to the whole graph view.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor relative to the fitted view.
	pub k: f64,
	/// World units to pixels at `k = 1`.
	pub fit: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
			fit: 1.0,
		}
	}
}

impl ViewTransform {
	fn ratio(&self) -> f64 {
		self.fit * self.k
	}

	pub fn to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
		(wx * self.ratio() + self.x, wy * self.ratio() + self.y)
	}

	pub fn to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.ratio(), (sy - self.y) / self.ratio())
	}

	/// Zoom by `factor`, keeping the point under `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64, range: (f64, f64)) {
		let new_k = (self.k * factor).clamp(range.0, range.1);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}
}

/// Tracks an in-progress canvas pan, and whether it moved far enough to stop
/// being a click.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Canvas-side state: transform, pointer, hover.
#[derive(Clone, Debug, Default)]
pub struct ViewState {
	pub transform: ViewTransform,
	pub pan: PanState,
	pub hovered: Option<NodeIx>,
	/// Pointer position of the last move, for placing the hover card.
	pub pointer: (f64, f64),
	pub width: f64,
	pub height: f64,
	/// Set once the user pans or zooms; the view is no longer refitted then.
	pub touched: bool,
}

impl ViewState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width,
			height,
			..Self::default()
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Fit every visible node into the canvas at `k = 1`.
	pub fn fit(&mut self, graph: &SocialGraph) {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		for node in graph.nodes().iter().filter(|node| !node.is_hidden()) {
			let (x0, y0, x1, y1) = bounds.unwrap_or((node.x, node.y, node.x, node.y));
			bounds = Some((x0.min(node.x), y0.min(node.y), x1.max(node.x), y1.max(node.y)));
		}
		let Some((x0, y0, x1, y1)) = bounds else {
			self.transform = ViewTransform {
				x: self.width / 2.0,
				y: self.height / 2.0,
				..ViewTransform::default()
			};
			return;
		};

		let usable = 1.0 - 2.0 * FIT_MARGIN;
		let span_x = (x1 - x0).max(f64::EPSILON);
		let span_y = (y1 - y0).max(f64::EPSILON);
		let fit = (self.width * usable / span_x).min(self.height * usable / span_y);
		let fit = if fit.is_finite() && fit > 0.0 { fit } else { 1.0 };

		self.transform.k = 1.0;
		self.transform.fit = fit;
		self.center_on((x0 + x1) / 2.0, (y0 + y1) / 2.0);
	}

	/// Move the view so world point `(wx, wy)` sits in the middle of the canvas.
	pub fn center_on(&mut self, wx: f64, wy: f64) {
		let ratio = self.transform.ratio();
		self.transform.x = self.width / 2.0 - wx * ratio;
		self.transform.y = self.height / 2.0 - wy * ratio;
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			moved: false,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		if !self.pan.active {
			return;
		}
		let (dx, dy) = (sx - self.pan.start_x, sy - self.pan.start_y);
		if !self.pan.moved && (dx * dx + dy * dy).sqrt() > CLICK_TOLERANCE {
			self.pan.moved = true;
			self.touched = true;
		}
		if self.pan.moved {
			self.transform.x = self.pan.transform_start_x + dx;
			self.transform.y = self.pan.transform_start_y + dy;
		}
	}

	/// End the pan. Returns true when the gesture was a click.
	pub fn end_pan(&mut self) -> bool {
		let click = self.pan.active && !self.pan.moved;
		self.pan = PanState::default();
		click
	}

	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64, config: &ScaleConfig) {
		self.transform.zoom_at(sx, sy, factor, config.zoom_range);
		self.touched = true;
	}

	/// Apply a zoom button press, centered on the canvas.
	pub fn apply(&mut self, command: ViewCommand, graph: &SocialGraph, config: &ScaleConfig) {
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		match command {
			ViewCommand::ZoomIn => self.zoom_at(cx, cy, ZOOM_STEP, config),
			ViewCommand::ZoomOut => self.zoom_at(cx, cy, 1.0 / ZOOM_STEP, config),
			ViewCommand::Reset => {
				self.fit(graph);
				self.touched = false;
			}
		}
	}

	pub fn cursor(&self) -> &'static str {
		match (self.pan.moved, self.hovered) {
			(true, _) => "grabbing",
			(false, Some(_)) => "pointer",
			(false, None) => "grab",
		}
	}

	/// The visible node under `(sx, sy)`, preferring whatever is drawn on top.
	pub fn node_at_position(&self, graph: &SocialGraph, sx: f64, sy: f64, config: &ScaleConfig) -> Option<NodeIx> {
		let scale = ScaledValues::new(config, self.transform.k);
		draw_order(graph).into_iter().rev().find(|&ix| {
			graph.node(ix).is_some_and(|node| {
				let (x, y) = self.transform.to_screen(node.x, node.y);
				let (dx, dy) = (x - sx, y - sy);
				(dx * dx + dy * dy).sqrt() <= scale.hit_radius(node.display_size())
			})
		})
	}
}

/// Visible nodes in painting order: the default layer first, then the focused
/// neighborhood, then the clicked node.
pub fn draw_order(graph: &SocialGraph) -> Vec<NodeIx> {
	let layer = |focus: NodeFocus| match focus {
		NodeFocus::Baseline | NodeFocus::Hidden => 0,
		NodeFocus::Neighbor(_) => 1,
		NodeFocus::Clicked(_) => 2,
	};
	let mut order: Vec<NodeIx> = graph
		.nodes()
		.iter()
		.enumerate()
		.filter(|(_, node)| !node.is_hidden())
		.map(|(ix, _)| ix)
		.collect();
	order.sort_by_key(|&ix| graph.node(ix).map_or(0, |node| layer(node.focus())));
	order
}
