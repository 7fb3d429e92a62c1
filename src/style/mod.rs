//! Visual styling derived from graph statistics.

pub mod mapper;
pub mod palette;
pub mod pipeline;

pub use mapper::{VisualMapper, scale};
pub use palette::{Color, Palette};
pub use pipeline::{NodeCull, StyleConfig, StylingReport};
