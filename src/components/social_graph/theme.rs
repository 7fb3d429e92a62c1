//! Canvas theming for light and dark presentation.
//!
//! Node and edge colors come from the styling pipeline; the theme only covers
//! what surrounds them: background, node finish, labels and the hover card.

use crate::config::PresentationMode;
use crate::style::Color;

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for gradients
	pub color_secondary: Color,
	/// Whether to use radial gradient
	pub use_gradient: bool,
	/// Vignette intensity (0.0 = none, 1.0 = strong)
	pub vignette: f64,
}

/// Node finish.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Whether discs get a lit radial gradient
	pub use_gradient: bool,
	/// Border width in pixels (0 = no border)
	pub border_width: f64,
	pub border_color: Color,
	/// Ring drawn around the clicked node
	pub focus_ring: Color,
}

/// Label text and its backdrop.
#[derive(Clone, Debug)]
pub struct LabelStyle {
	pub color: Color,
	/// Halo behind the glyphs, so labels stay legible over edges
	pub halo: Color,
}

/// The card shown next to a hovered node.
#[derive(Clone, Debug)]
pub struct HoverStyle {
	pub background: Color,
	pub border: Color,
	pub text: Color,
	pub font: &'static str,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub node: NodeStyle,
	pub label: LabelStyle,
	pub hover: HoverStyle,
}

impl Theme {
	pub fn light() -> Self {
		Self {
			name: "light",
			background: BackgroundStyle {
				color: Color::rgb(246, 247, 249),
				color_secondary: Color::rgb(255, 255, 255),
				use_gradient: true,
				vignette: 0.0,
			},
			node: NodeStyle {
				use_gradient: false,
				border_width: 0.0,
				border_color: Color::rgba(0, 0, 0, 0.0),
				focus_ring: Color::rgba(20, 20, 20, 0.8),
			},
			label: LabelStyle {
				color: Color::rgb(20, 20, 20),
				halo: Color::rgba(255, 255, 255, 0.8),
			},
			hover: HoverStyle {
				background: Color::rgb(255, 255, 255),
				border: Color::rgba(0, 0, 0, 0.15),
				text: Color::rgb(20, 20, 20),
				font: "13px sans-serif",
			},
		}
	}

	pub fn dark() -> Self {
		Self {
			name: "dark",
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
				vignette: 0.15,
			},
			node: NodeStyle {
				use_gradient: true,
				border_width: 0.0,
				border_color: Color::rgba(255, 255, 255, 0.0),
				focus_ring: Color::rgba(255, 255, 255, 0.8),
			},
			label: LabelStyle {
				color: Color::rgb(230, 233, 238),
				halo: Color::rgba(22, 27, 34, 0.8),
			},
			hover: HoverStyle {
				background: Color::rgb(36, 41, 48),
				border: Color::rgba(255, 255, 255, 0.2),
				text: Color::rgb(230, 233, 238),
				font: "13px sans-serif",
			},
		}
	}

	pub fn for_mode(mode: PresentationMode) -> Self {
		match mode {
			PresentationMode::Light => Self::light(),
			PresentationMode::Dark => Self::dark(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::light()
	}
}
