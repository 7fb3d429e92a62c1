//! Scalar statistic → visual attribute mapping.

use super::palette::Palette;
use crate::graph::metrics::Range;

/// Linear interpolation of `value` from `[min, max]` onto `[new_min, new_max]`.
///
/// A degenerate source range (`max <= min`, or an unbounded one from an empty
/// input) maps everything to `new_min`. Inside the source range the result
/// never leaves `[new_min, new_max]`, and `max` maps to exactly `new_max`.
pub fn scale(value: f64, min: f64, max: f64, new_min: f64, new_max: f64) -> f64 {
	if (Range { min, max }).is_degenerate() {
		return new_min;
	}
	let t = (value - min) / (max - min);
	if t == 1.0 {
		return new_max;
	}
	let scaled = new_min + (new_max - new_min) * t;
	if (0.0..=1.0).contains(&t) {
		scaled.clamp(new_min.min(new_max), new_min.max(new_max))
	} else {
		scaled
	}
}

/// Palette index for `value`: clamped into `[min, max]`, then mapped to
/// `floor(t * (len - 1))`. Degenerate ranges and NaN map to index 0.
pub fn color_index(value: f64, min: f64, max: f64, len: usize) -> usize {
	if len == 0 || value.is_nan() || (Range { min, max }).is_degenerate() {
		return 0;
	}
	let t = (value.clamp(min, max) - min) / (max - min);
	((t * (len - 1) as f64).floor() as usize).min(len - 1)
}

/// Maps statistics onto a palette chosen by the caller.
#[derive(Clone, Debug)]
pub struct VisualMapper {
	palette: Palette,
}

impl VisualMapper {
	pub fn new(palette: Palette) -> Self {
		Self { palette }
	}

	pub fn palette(&self) -> &Palette {
		&self.palette
	}

	pub fn color_for(&self, value: f64, min: f64, max: f64) -> &str {
		self.palette
			.get(color_index(value, min, max, self.palette.len()))
	}

	/// [`VisualMapper::color_for`] with a two-digit hex alpha suffix, as used for
	/// edges: `alpha` is `floor(alpha * 255)` clamped to `0..=255`.
	pub fn color_with_alpha(&self, value: f64, min: f64, max: f64, alpha: f64) -> String {
		let alpha = (alpha * 255.0).floor().clamp(0.0, 255.0) as u8;
		format!("{}{:02x}", self.color_for(value, min, max), alpha)
	}
}
