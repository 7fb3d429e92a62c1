//! Canvas rendering for the social graph.
//!
//! Everything is drawn in screen space, in passes for z-ordering:
//! 1. Background and vignette
//! 2. Edges that are not hidden
//! 3. Nodes in [`draw_order`], icons clipped to their disc, then labels
//! 4. The hover card

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use crate::graph::{Node, NodeFocus, SocialGraph};
use crate::loader::ANONYMOUS_LABEL;
use crate::style::Color;

use super::images::ImageCache;
use super::scale::{ScaleConfig, ScaledValues};
use super::state::{ViewState, draw_order};
use super::theme::Theme;

/// Renders the complete graph to the canvas.
pub fn render(
	view: &ViewState,
	graph: &SocialGraph,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
	images: &mut ImageCache,
) {
	let scale = ScaledValues::new(config, view.transform.k);

	draw_background(view, ctx, theme);
	if theme.background.vignette > 0.0 {
		draw_vignette(view, ctx, theme);
	}

	draw_edges(view, graph, ctx, &scale);
	draw_nodes(view, graph, ctx, &scale, theme, images);

	if let Some(node) = view.hovered.and_then(|ix| graph.node(ix)) {
		if !node.is_hidden() {
			draw_hover_card(view, node, ctx, theme);
		}
	}
}

fn draw_background(view: &ViewState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let background = &theme.background;
	let gradient = background
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(
				view.width / 2.0,
				view.height / 2.0,
				0.0,
				view.width / 2.0,
				view.height / 2.0,
				view.width.max(view.height) * 0.8,
			)
			.ok()
		})
		.flatten();

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&background.color.to_css()),
	}

	ctx.fill_rect(0.0, 0.0, view.width, view.height);
}

fn draw_vignette(view: &ViewState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let Ok(gradient) = ctx.create_radial_gradient(
		view.width / 2.0,
		view.height / 2.0,
		view.width.min(view.height) * 0.3,
		view.width / 2.0,
		view.height / 2.0,
		view.width.max(view.height) * 0.7,
	) else {
		return;
	};

	let _ = gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)");
	let _ = gradient.add_color_stop(
		1.0,
		&Color::rgba(0, 0, 0, theme.background.vignette).to_css(),
	);

	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, view.width, view.height);
}

fn draw_edges(view: &ViewState, graph: &SocialGraph, ctx: &CanvasRenderingContext2d, scale: &ScaledValues) {
	for edge in graph.edges() {
		if edge.is_hidden() || edge.is_self_loop() {
			continue;
		}
		let (Some(source), Some(target)) = (graph.node(edge.source()), graph.node(edge.target())) else {
			continue;
		};
		if source.is_hidden() || target.is_hidden() {
			continue;
		}

		let (x1, y1) = view.transform.to_screen(source.x, source.y);
		let (x2, y2) = view.transform.to_screen(target.x, target.y);

		ctx.set_stroke_style_str(&edge.color);
		ctx.set_line_width(scale.edge_width(edge.size));
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
	}
}

fn draw_nodes(
	view: &ViewState,
	graph: &SocialGraph,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	images: &mut ImageCache,
) {
	let order = draw_order(graph);

	for &ix in &order {
		if let Some(node) = graph.node(ix) {
			draw_node(view, node, ctx, scale, theme, images);
		}
	}

	ctx.set_font(&scale.label_font);
	for &ix in &order {
		let Some(node) = graph.node(ix) else {
			continue;
		};
		if node.is_anonymous() {
			continue;
		}
		let alpha = if node.focus() != NodeFocus::Baseline {
			1.0
		} else if scale.shows_label(node.display_size()) {
			scale.label_alpha
		} else {
			continue;
		};
		let (x, y) = view.transform.to_screen(node.x, node.y);
		let radius = scale.node_radius(node.display_size());
		draw_label(ctx, theme, &node.label, x + radius + 4.0, y + 4.0, alpha);
	}
}

fn draw_node(
	view: &ViewState,
	node: &Node,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	images: &mut ImageCache,
) {
	let (x, y) = view.transform.to_screen(node.x, node.y);
	let radius = scale.node_radius(node.display_size());
	if x + radius < 0.0 || y + radius < 0.0 || x - radius > view.width || y - radius > view.height {
		return;
	}

	let base_color = Color::parse_hex(&node.color).unwrap_or(Color::rgb(128, 128, 128));
	let gradient = theme
		.node
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
				.ok()
		})
		.flatten();

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &base_color.lighten(0.4).to_css());
			let _ = gradient.add_color_stop(0.7, &base_color.to_css());
			let _ = gradient.add_color_stop(1.0, &base_color.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&base_color.to_css()),
	}
	ctx.fill();

	if let Some(image) = node.image.as_deref().and_then(|url| images.get(url)) {
		ctx.save();
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.clip();
		let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
			image,
			x - radius,
			y - radius,
			radius * 2.0,
			radius * 2.0,
		);
		ctx.restore();
	}

	if theme.node.border_width > 0.0 {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&theme.node.border_color.to_css());
		ctx.set_line_width(theme.node.border_width);
		ctx.stroke();
	}

	if node.is_clicked() {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + 3.0, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&theme.node.focus_ring.to_css());
		ctx.set_line_width(1.5);
		ctx.stroke();
	}
}

fn draw_label(ctx: &CanvasRenderingContext2d, theme: &Theme, text: &str, x: f64, y: f64, alpha: f64) {
	ctx.set_global_alpha(alpha);
	ctx.set_line_width(3.0);
	ctx.set_stroke_style_str(&theme.label.halo.to_css());
	let _ = ctx.stroke_text(text, x, y);
	ctx.set_fill_style_str(&theme.label.color.to_css());
	let _ = ctx.fill_text(text, x, y);
	ctx.set_global_alpha(1.0);
}

fn draw_hover_card(view: &ViewState, node: &Node, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	const PADDING: f64 = 8.0;
	const LINE_HEIGHT: f64 = 17.0;

	let lines = hover_lines(node);
	ctx.set_font(theme.hover.font);
	let width = lines
		.iter()
		.filter_map(|line| ctx.measure_text(line).ok())
		.map(|metrics| metrics.width())
		.fold(0.0, f64::max)
		+ PADDING * 2.0;
	let height = LINE_HEIGHT * lines.len() as f64 + PADDING * 2.0 - 4.0;

	let (px, py) = view.pointer;
	let x = (px + 14.0).min(view.width - width - 4.0).max(4.0);
	let y = (py + 14.0).min(view.height - height - 4.0).max(4.0);

	ctx.set_fill_style_str(&theme.hover.background.to_css());
	ctx.fill_rect(x, y, width, height);
	ctx.set_stroke_style_str(&theme.hover.border.to_css());
	ctx.set_line_width(1.0);
	ctx.stroke_rect(x, y, width, height);

	ctx.set_fill_style_str(&theme.hover.text.to_css());
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, x + PADDING, y + PADDING + 11.0 + LINE_HEIGHT * i as f64);
	}
}

/// Title and activity line shown when hovering a node.
pub fn hover_lines(node: &Node) -> [String; 2] {
	let name = if node.is_anonymous() {
		ANONYMOUS_LABEL.to_string()
	} else {
		node.label.clone()
	};
	[name, format!("Mentions: {}", format_weight(node.weight))]
}

fn format_weight(weight: f64) -> String {
	if weight.fract() == 0.0 {
		format!("{weight:.0}")
	} else {
		format!("{weight:.1}")
	}
}
