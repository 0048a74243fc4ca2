//! Failure types for rendering, editing and node resolution.
//!
//! None of these are fatal: each leaves the last good diagram and the current
//! focus in place.

use thiserror::Error;

use super::types::NodeHandle;

/// Failure reported by a [`RenderEngine`](super::engine::RenderEngine).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
	#[error("rendering engine is not ready")]
	NotReady,

	#[error("parse error: {0}")]
	Syntax(String),

	#[error("unexpected engine response: {0}")]
	Engine(String),
}

/// Reason a candidate edit was refused before reaching the engine.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
	#[error("must start with a direction declaration")]
	MissingDirection,

	#[error("script content not allowed")]
	ScriptContent,
}

/// A rendered node whose handle carries no recognizable identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot resolve node id from handle '{}'", .0.dom_id)]
pub struct UnresolvedNode(pub NodeHandle);
