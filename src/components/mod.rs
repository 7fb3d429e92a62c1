//! UI components.

pub mod panels;
pub mod social_graph;
