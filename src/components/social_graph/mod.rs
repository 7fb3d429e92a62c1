//! Interactive canvas for the session graph.
//!
//! Renders the styled [`SocialGraph`](crate::graph::SocialGraph) on an HTML
//! canvas with:
//! - layout refinement advanced frame by frame
//! - pan and zoom by wheel or [`ViewCommand`], with click detection that
//!   tolerates small movements
//! - click-to-focus and search-to-focus through [`FocusMachine`](crate::focus::FocusMachine)
//! - node icons and a hover card
//! - light and dark themes

mod component;
mod images;
mod render;
pub mod scale;
pub mod state;
pub mod theme;

pub use component::SocialGraphCanvas;
pub use state::ViewCommand;
pub use theme::Theme;
