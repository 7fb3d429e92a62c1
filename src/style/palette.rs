//! Colors and the shade tables the visual mapper indexes into.

use crate::config::PresentationMode;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * (1.0 - t) + other.r as f64 * t).round() as u8,
			g: (self.g as f64 * (1.0 - t) + other.g as f64 * t).round() as u8,
			b: (self.b as f64 * (1.0 - t) + other.b as f64 * t).round() as u8,
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	pub fn to_css_rgb(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}

	/// Parses `#RRGGBB` or `#RRGGBBAA`.
	pub fn parse_hex(hex: &str) -> Option<Self> {
		let digits = hex.strip_prefix('#')?;
		let channel = |range: std::ops::Range<usize>| {
			digits
				.get(range)
				.and_then(|pair| u8::from_str_radix(pair, 16).ok())
		};
		match digits.len() {
			6 => Some(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
			8 => Some(Color::rgba(
				channel(0..2)?,
				channel(2..4)?,
				channel(4..6)?,
				channel(6..8)? as f64 / 255.0,
			)),
			_ => None,
		}
	}
}

/// Blue to red, the light-mode ramp.
const BLUERED: &[(f64, Color)] = &[(0.0, Color::rgb(0, 0, 255)), (1.0, Color::rgb(255, 0, 0))];

/// Matplotlib's magma, the dark-mode ramp.
const MAGMA: &[(f64, Color)] = &[
	(0.0, Color::rgb(0, 0, 4)),
	(0.13, Color::rgb(28, 16, 68)),
	(0.25, Color::rgb(79, 18, 123)),
	(0.38, Color::rgb(129, 37, 129)),
	(0.5, Color::rgb(181, 54, 122)),
	(0.63, Color::rgb(229, 80, 100)),
	(0.75, Color::rgb(251, 135, 97)),
	(0.88, Color::rgb(254, 194, 135)),
	(1.0, Color::rgb(252, 253, 191)),
];

/// Number of shades in every built-in palette.
pub const PALETTE_SHADES: usize = 101;

/// Darkest magma shades dropped so low-activity nodes stay visible on black.
const DARK_SKIP: usize = 5;

/// A fixed table of hex shades, ordered from low to high values.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
	shades: Vec<String>,
}

impl Palette {
	pub fn light() -> Self {
		Self::from_stops(BLUERED, PALETTE_SHADES, 0)
	}

	pub fn dark() -> Self {
		Self::from_stops(MAGMA, PALETTE_SHADES + DARK_SKIP, DARK_SKIP)
	}

	pub fn for_mode(mode: PresentationMode) -> Self {
		match mode {
			PresentationMode::Light => Self::light(),
			PresentationMode::Dark => Self::dark(),
		}
	}

	/// Sample `count` evenly spaced shades along the color stops, then drop the
	/// first `skip` of them.
	pub fn from_stops(stops: &[(f64, Color)], count: usize, skip: usize) -> Self {
		let shades = (0..count)
			.skip(skip)
			.map(|i| {
				let t = if count > 1 {
					i as f64 / (count - 1) as f64
				} else {
					0.0
				};
				sample(stops, t).to_css_rgb()
			})
			.collect();
		Self { shades }
	}

	pub fn len(&self) -> usize {
		self.shades.len()
	}

	pub fn is_empty(&self) -> bool {
		self.shades.is_empty()
	}

	/// Shade at `index`, clamped to the last entry.
	pub fn get(&self, index: usize) -> &str {
		self.shades
			.get(index.min(self.shades.len().saturating_sub(1)))
			.map_or("#000000", String::as_str)
	}
}

fn sample(stops: &[(f64, Color)], t: f64) -> Color {
	let Some(&(_, first)) = stops.first() else {
		return Color::rgb(0, 0, 0);
	};
	let mut previous = (0.0, first);
	for &(position, color) in stops {
		if t <= position {
			let span = position - previous.0;
			if span <= 0.0 {
				return color;
			}
			return previous.1.lerp(color, (t - previous.0) / span);
		}
		previous = (position, color);
	}
	previous.1
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builtin_palettes_have_101_shades() {
		assert_eq!(Palette::light().len(), PALETTE_SHADES);
		assert_eq!(Palette::dark().len(), PALETTE_SHADES);
	}

	#[test]
	fn light_palette_runs_blue_to_red() {
		let palette = Palette::light();
		assert_eq!(palette.get(0), "#0000ff");
		assert_eq!(palette.get(PALETTE_SHADES - 1), "#ff0000");
		assert_eq!(palette.get(10_000), "#ff0000");
	}

	#[test]
	fn dark_palette_skips_the_darkest_shades() {
		let palette = Palette::dark();
		assert_ne!(palette.get(0), "#000004");
		assert_eq!(palette.get(PALETTE_SHADES - 1), "#fcfdbf");
	}

	#[test]
	fn parse_hex_reads_alpha_suffix() {
		assert_eq!(Color::parse_hex("#0a0b0c"), Some(Color::rgb(10, 11, 12)));
		let translucent = Color::parse_hex("#ff000019").unwrap();
		assert_eq!((translucent.r, translucent.g, translucent.b), (255, 0, 0));
		assert!((translucent.a - 25.0 / 255.0).abs() < 1e-9);
		assert_eq!(Color::parse_hex("red"), None);
		assert_eq!(Color::parse_hex("#12345"), None);
	}
}
