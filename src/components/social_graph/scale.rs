//! Zoom-dependent sizing for the canvas.
//!
//! Everything is drawn in screen space: node and edge sizes from the styling
//! pipeline are turned into pixels here, according to how each element
//! should react to the zoom factor `k` (1.0 = fitted view).
//!
//! - [`ScaleBehavior::World`]: grows and shrinks with the zoom.
//! - [`ScaleBehavior::Screen`]: constant pixel size.
//! - [`ScaleBehavior::Clamped`]: follows the zoom within pixel bounds.

/// How a pixel size reacts to the zoom factor.
#[derive(Clone, Debug, PartialEq)]
pub enum ScaleBehavior {
	World,
	Screen,
	/// World scaling, clamped to `[min_screen, max_screen]` pixels.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// Pixel size of an element whose size is `base` pixels at `k = 1`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base * k,
			ScaleBehavior::Screen => base,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => (base * k).clamp(*min_screen, *max_screen),
		}
	}
}

/// How an opacity multiplier reacts to the zoom factor.
#[derive(Clone, Debug, PartialEq)]
pub enum AlphaBehavior {
	Constant,
	/// Zero at `zero_alpha_k`, fully opaque from `full_alpha_k` on.
	Fade { zero_alpha_k: f64, full_alpha_k: f64 },
}

impl AlphaBehavior {
	pub fn apply(&self, k: f64) -> f64 {
		match self {
			AlphaBehavior::Constant => 1.0,
			AlphaBehavior::Fade {
				zero_alpha_k,
				full_alpha_k,
			} => {
				if zero_alpha_k == full_alpha_k {
					return 1.0;
				}
				((k - zero_alpha_k) / (full_alpha_k - zero_alpha_k)).clamp(0.0, 1.0)
			}
		}
	}
}

#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Pixels per unit of node size at `k = 1`.
	pub radius_unit: f64,
	pub radius_behavior: ScaleBehavior,
	/// Extra pixels around a node that still count as a hit.
	pub hit_padding: f64,
	/// Label font size in pixels.
	pub label_size: f64,
	/// Labels of unfocused nodes only show from this radius (pixels) on.
	pub label_threshold: f64,
	pub label_alpha_behavior: AlphaBehavior,
}

#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	/// Pixels per unit of edge size at `k = 1`.
	pub width_unit: f64,
	pub width_behavior: ScaleBehavior,
}

/// Scale configuration for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub node: NodeScaleConfig,
	pub edge: EdgeScaleConfig,
	/// Zoom bounds for the wheel.
	pub zoom_range: (f64, f64),
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				radius_unit: 1.6,
				radius_behavior: ScaleBehavior::Clamped {
					min_screen: 1.5,
					max_screen: 120.0,
				},
				hit_padding: 3.0,
				label_size: 12.0,
				label_threshold: 8.0,
				label_alpha_behavior: AlphaBehavior::Fade {
					zero_alpha_k: 0.6,
					full_alpha_k: 1.0,
				},
			},
			edge: EdgeScaleConfig {
				width_unit: 0.4,
				width_behavior: ScaleBehavior::Clamped {
					min_screen: 0.3,
					max_screen: 12.0,
				},
			},
			zoom_range: (0.1, 10.0),
		}
	}
}

/// Scale values for one zoom level. Built once per frame.
#[derive(Clone, Debug)]
pub struct ScaledValues<'a> {
	config: &'a ScaleConfig,
	pub k: f64,
	pub label_font: String,
	/// Opacity of labels drawn because of their size alone.
	pub label_alpha: f64,
}

impl<'a> ScaledValues<'a> {
	pub fn new(config: &'a ScaleConfig, k: f64) -> Self {
		Self {
			config,
			k,
			label_font: format!("{}px sans-serif", config.node.label_size),
			label_alpha: config.node.label_alpha_behavior.apply(k),
		}
	}

	/// Pixel radius of a node of the given display size.
	pub fn node_radius(&self, size: f64) -> f64 {
		let node = &self.config.node;
		node.radius_behavior.apply(size * node.radius_unit, self.k)
	}

	pub fn hit_radius(&self, size: f64) -> f64 {
		self.node_radius(size) + self.config.node.hit_padding
	}

	/// Pixel width of an edge of the given size.
	pub fn edge_width(&self, size: f64) -> f64 {
		let edge = &self.config.edge;
		edge.width_behavior.apply(size * edge.width_unit, self.k)
	}

	/// Whether an unfocused node of this display size gets its label drawn.
	pub fn shows_label(&self, size: f64) -> bool {
		self.label_alpha > 0.0 && self.node_radius(size) >= self.config.node.label_threshold
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamped_sizes_follow_zoom_within_bounds() {
		let clamped = ScaleBehavior::Clamped {
			min_screen: 2.0,
			max_screen: 20.0,
		};
		assert_eq!(clamped.apply(5.0, 2.0), 10.0);
		assert_eq!(clamped.apply(5.0, 0.1), 2.0);
		assert_eq!(clamped.apply(5.0, 10.0), 20.0);
		assert_eq!(ScaleBehavior::Screen.apply(5.0, 10.0), 5.0);
		assert_eq!(ScaleBehavior::World.apply(5.0, 0.5), 2.5);
	}

	#[test]
	fn label_fade_is_bounded() {
		let fade = AlphaBehavior::Fade {
			zero_alpha_k: 0.5,
			full_alpha_k: 1.0,
		};
		assert_eq!(fade.apply(0.2), 0.0);
		assert_eq!(fade.apply(0.75), 0.5);
		assert_eq!(fade.apply(3.0), 1.0);
		assert_eq!(AlphaBehavior::Constant.apply(0.01), 1.0);
	}

	#[test]
	fn larger_nodes_are_drawn_larger() {
		let config = ScaleConfig::default();
		let scale = ScaledValues::new(&config, 1.0);
		assert!(scale.node_radius(10.0) > scale.node_radius(1.5));
		assert!(scale.hit_radius(1.5) > scale.node_radius(1.5));
		assert!(scale.edge_width(10.0) > scale.edge_width(0.1));
		assert!(scale.shows_label(10.0));
		assert!(!scale.shows_label(1.5));
	}

	#[test]
	fn zoomed_out_hides_size_based_labels() {
		let config = ScaleConfig::default();
		let scale = ScaledValues::new(&config, 0.3);
		assert!(!scale.shows_label(40.0));
	}
}
