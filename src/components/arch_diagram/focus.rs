//! Focus and dim marks over the rendered node/edge set.
//!
//! Focusing a node dims everything else, highlights and animates its outgoing
//! edges, and restores the targets of those edges. Only one hop along outgoing
//! edges is restored; incoming neighbours stay dimmed.

use super::types::{NodeId, RenderedGraph};

pub const MIN_SCALE: f64 = 1.0;
pub const MAX_SCALE: f64 = 4.0;
pub const SCALE_STEP: f64 = 0.1;
pub const DEFAULT_SCALE: f64 = 2.0;

/// Scale factor applied to the focused node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmphasisScale(f64);

impl EmphasisScale {
	/// Clamps into the slider range; non-finite input falls back to the default.
	pub fn new(value: f64) -> Self {
		if value.is_finite() {
			Self(value.clamp(MIN_SCALE, MAX_SCALE))
		} else {
			Self::default()
		}
	}

	pub fn get(self) -> f64 {
		self.0
	}
}

impl Default for EmphasisScale {
	fn default() -> Self {
		Self(DEFAULT_SCALE)
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Focus {
	#[default]
	Neutral,
	Focused(NodeId),
}

impl Focus {
	pub fn node(&self) -> Option<&NodeId> {
		match self {
			Focus::Neutral => None,
			Focus::Focused(id) => Some(id),
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeMark {
	pub dimmed: bool,
	pub emphasized: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeMark {
	pub dimmed: bool,
	pub highlighted: bool,
	pub animated: bool,
}

/// Marks for every node and edge, index-aligned with the [`RenderedGraph`].
///
/// `untagged` applies to drawn edges whose endpoints could not be read; they
/// dim with the rest of the diagram but are never highlighted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Marks {
	pub nodes: Vec<NodeMark>,
	pub edges: Vec<EdgeMark>,
	pub untagged: EdgeMark,
}

impl Marks {
	/// All-clear marks for a graph.
	pub fn neutral(graph: &RenderedGraph) -> Self {
		Self {
			nodes: vec![NodeMark::default(); graph.nodes.len()],
			edges: vec![EdgeMark::default(); graph.edges.len()],
			untagged: EdgeMark::default(),
		}
	}

	/// Marks for `focus`, computed from scratch.
	pub fn compute(graph: &RenderedGraph, focus: &Focus) -> Self {
		let Some(focused) = focus.node() else {
			return Self::neutral(graph);
		};

		let mut restored: Vec<&NodeId> = vec![focused];
		let edges = graph
			.edges
			.iter()
			.map(|edge| {
				if &edge.source == focused {
					restored.push(&edge.target);
					EdgeMark {
						dimmed: false,
						highlighted: true,
						animated: true,
					}
				} else {
					EdgeMark {
						dimmed: true,
						..EdgeMark::default()
					}
				}
			})
			.collect();

		let nodes = graph
			.nodes
			.iter()
			.map(|node| {
				let emphasized = &node.id == focused;
				NodeMark {
					dimmed: node.id.is_empty() || !restored.contains(&&node.id),
					emphasized,
				}
			})
			.collect();

		Self {
			nodes,
			edges,
			untagged: EdgeMark {
				dimmed: true,
				..EdgeMark::default()
			},
		}
	}

	pub fn dimmed_nodes(&self) -> usize {
		self.nodes.iter().filter(|m| m.dimmed).count()
	}

	pub fn highlighted_edges(&self) -> usize {
		self.edges.iter().filter(|m| m.highlighted).count()
	}
}

#[cfg(test)]
impl Marks {
	pub(crate) fn is_clear(&self) -> bool {
		self.nodes.iter().all(|m| *m == NodeMark::default())
			&& self.edges.iter().all(|m| *m == EdgeMark::default())
			&& self.untagged == EdgeMark::default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::arch_diagram::types::{NodeHandle, RenderedEdge, RenderedNode};

	fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> RenderedGraph {
		RenderedGraph {
			nodes: nodes
				.iter()
				.enumerate()
				.map(|(i, id)| RenderedNode {
					handle: NodeHandle {
						dom_id: format!("flowchart-{id}-{i}"),
						title: None,
					},
					id: NodeId::from(*id),
				})
				.collect(),
			edges: edges
				.iter()
				.map(|(s, t)| RenderedEdge {
					source: NodeId::from(*s),
					target: NodeId::from(*t),
				})
				.collect(),
		}
	}

	fn focused(id: &str) -> Focus {
		Focus::Focused(NodeId::from(id))
	}

	#[test]
	fn focus_on_source_restores_outgoing_target() {
		let g = graph(&["A", "B"], &[("A", "B")]);
		let marks = Marks::compute(&g, &focused("A"));
		assert_eq!(
			marks.nodes[0],
			NodeMark {
				dimmed: false,
				emphasized: true
			}
		);
		assert!(!marks.nodes[1].dimmed);
		assert!(!marks.nodes[1].emphasized);
		assert_eq!(
			marks.edges[0],
			EdgeMark {
				dimmed: false,
				highlighted: true,
				animated: true
			}
		);
	}

	#[test]
	fn incoming_neighbours_stay_dimmed() {
		let g = graph(&["A", "B", "C"], &[("A", "B"), ("C", "A")]);
		let marks = Marks::compute(&g, &focused("A"));
		assert!(marks.nodes[2].dimmed);
		assert!(marks.edges[1].dimmed);
		assert!(!marks.edges[1].highlighted);
	}

	#[test]
	fn restoration_is_a_single_hop() {
		let g = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
		let marks = Marks::compute(&g, &focused("A"));
		assert!(!marks.nodes[1].dimmed);
		assert!(marks.nodes[2].dimmed);
		assert_eq!(marks.highlighted_edges(), 1);
	}

	#[test]
	fn untagged_edges_dim_under_focus_only() {
		let g = graph(&["A", "B"], &[("A", "B")]);
		assert_eq!(Marks::compute(&g, &Focus::Neutral).untagged, EdgeMark::default());
		let focused = Marks::compute(&g, &focused("A"));
		assert!(focused.untagged.dimmed);
		assert!(!focused.untagged.highlighted);
		assert!(!focused.untagged.animated);
	}

	#[test]
	fn unresolved_nodes_are_dimmed_under_focus() {
		let mut g = graph(&["A", "B"], &[]);
		g.nodes[1].id = NodeId::default();
		let marks = Marks::compute(&g, &focused("A"));
		assert!(marks.nodes[1].dimmed);
	}

	#[test]
	fn neutral_has_no_marks() {
		let g = graph(&["A", "B"], &[("A", "B")]);
		let marks = Marks::compute(&g, &Focus::Neutral);
		assert!(marks.is_clear());
		assert_eq!(marks.nodes.len(), 2);
		assert_eq!(marks.edges.len(), 1);
	}

	#[test]
	fn switching_focus_leaves_no_residue() {
		let g = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
		let _ = Marks::compute(&g, &focused("A"));
		let via_a = Marks::compute(&g, &focused("B"));
		assert_eq!(via_a, Marks::compute(&g, &focused("B")));
		assert_eq!(via_a.dimmed_nodes(), 1);
	}

	#[test]
	fn scale_is_clamped_to_slider_range() {
		assert_eq!(EmphasisScale::new(0.2).get(), MIN_SCALE);
		assert_eq!(EmphasisScale::new(9.0).get(), MAX_SCALE);
		assert_eq!(EmphasisScale::new(f64::NAN).get(), DEFAULT_SCALE);
		assert_eq!(EmphasisScale::new(3.3).get(), 3.3);
	}
}
