mod component;
mod editor;
mod engine;
mod error;
mod focus;
mod identity;
mod metadata;
mod panels;
mod render;
mod state;
mod types;

pub use component::ArchDiagram;
pub use engine::EngineConfig;

/// Architecture diagram shown when no other definition is supplied.
pub const DEFAULT_GRAPH: &str = include_str!("default_graph.mmd");
