use std::fmt;

/// Identifier shared by a declared graph node and its metadata entry.
///
/// An empty id means the rendered handle could not be resolved.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for NodeId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

/// Identity-bearing attributes read off a rendered node element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeHandle {
	pub dom_id: String,
	pub title: Option<String>,
}

/// Attributes read off a rendered edge element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeHandle {
	pub class_attr: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedNode {
	pub handle: NodeHandle,
	pub id: NodeId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedEdge {
	pub source: NodeId,
	pub target: NodeId,
}

/// Node and edge set of the diagram currently mounted.
///
/// Indices into `nodes` and `edges` line up with the element lists the
/// render pass collected, so marks can be applied positionally.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedGraph {
	pub nodes: Vec<RenderedNode>,
	pub edges: Vec<RenderedEdge>,
}

impl RenderedGraph {
	pub fn node(&self, idx: usize) -> Option<&RenderedNode> {
		self.nodes.get(idx)
	}
}

/// Display metadata for one component of the architecture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentMetadata {
	pub title: String,
	pub category: String,
	pub description: String,
	pub metrics: Vec<(String, String)>,
}

impl ComponentMetadata {
	/// Record shown for components the table knows nothing about.
	pub fn fallback(id: &NodeId) -> Self {
		Self {
			title: id.to_string(),
			category: "Component".into(),
			description: String::new(),
			metrics: Vec::new(),
		}
	}
}
