//! Recovers node ids from the markup the engine generates.
//!
//! Mermaid names node groups `flowchart-<id>-<n>` and tags edge paths with
//! `LS-<source>` / `LE-<target>` classes. When the id pattern is missing, the
//! node's `<title>` text is normalized and used instead.

use std::sync::LazyLock;

use regex::Regex;

use super::error::UnresolvedNode;
use super::types::{EdgeHandle, NodeHandle, NodeId, RenderedEdge, RenderedGraph, RenderedNode};

static FLOWCHART_ID: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"flowchart-([^-]+)-").expect("static pattern"));

/// Resolve a node handle to its id, or the empty id when nothing matches.
pub fn resolve_id(handle: &NodeHandle) -> NodeId {
	if let Some(caps) = FLOWCHART_ID.captures(&handle.dom_id) {
		return NodeId::new(&caps[1]);
	}
	handle
		.title
		.as_deref()
		.map(|title| {
			NodeId::new(
				title
					.chars()
					.filter(|c| c.is_ascii_alphanumeric() || *c == '_')
					.collect::<String>(),
			)
		})
		.unwrap_or_default()
}

/// Like [`resolve_id`], but reports an empty result as an error.
pub fn try_resolve(handle: &NodeHandle) -> Result<NodeId, UnresolvedNode> {
	let id = resolve_id(handle);
	if id.is_empty() {
		Err(UnresolvedNode(handle.clone()))
	} else {
		Ok(id)
	}
}

/// Source and target tags of an edge, if both are present.
pub fn edge_tags(handle: &EdgeHandle) -> Option<(NodeId, NodeId)> {
	let (mut source, mut target) = (None, None);
	for class in handle.class_attr.split_whitespace() {
		if let Some(id) = class.strip_prefix("LS-") {
			source.get_or_insert(id);
		} else if let Some(id) = class.strip_prefix("LE-") {
			target.get_or_insert(id);
		}
	}
	match (source, target) {
		(Some(s), Some(t)) if !s.is_empty() && !t.is_empty() => {
			Some((NodeId::new(s), NodeId::new(t)))
		}
		_ => None,
	}
}

/// Build the rendered graph from the handles collected off the mounted markup.
///
/// Nodes keep their position even when unresolved; untagged edges are
/// dropped, so `edge_slots` maps each kept edge back to its handle index.
pub fn build_graph(nodes: &[NodeHandle], edges: &[EdgeHandle]) -> (RenderedGraph, Vec<usize>) {
	let nodes = nodes
		.iter()
		.map(|handle| {
			let id = match try_resolve(handle) {
				Ok(id) => id,
				Err(e) => {
					log::debug!("{e}");
					NodeId::default()
				}
			};
			RenderedNode {
				handle: handle.clone(),
				id,
			}
		})
		.collect();

	let mut edge_slots = Vec::new();
	let edges = edges
		.iter()
		.enumerate()
		.filter_map(|(i, handle)| {
			let (source, target) = edge_tags(handle)?;
			edge_slots.push(i);
			Some(RenderedEdge { source, target })
		})
		.collect();

	(RenderedGraph { nodes, edges }, edge_slots)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(dom_id: &str, title: Option<&str>) -> NodeHandle {
		NodeHandle {
			dom_id: dom_id.into(),
			title: title.map(Into::into),
		}
	}

	#[test]
	fn resolves_from_flowchart_dom_id() {
		assert_eq!(resolve_id(&node("flowchart-Postgres-12", None)), NodeId::from("Postgres"));
		assert_eq!(
			resolve_id(&node("archGraph3-flowchart-API1-4", Some("ignored"))),
			NodeId::from("API1")
		);
	}

	#[test]
	fn falls_back_to_normalized_title() {
		assert_eq!(resolve_id(&node("", Some(" Web Users "))), NodeId::from("WebUsers"));
		assert_eq!(resolve_id(&node("g12", Some("k-NN (vector)_v2"))), NodeId::from("kNNvector_v2"));
	}

	#[test]
	fn id_without_trailing_suffix_uses_fallback() {
		assert_eq!(resolve_id(&node("flowchart-Kafka", Some("Kafka"))), NodeId::from("Kafka"));
	}

	#[test]
	fn unresolvable_handle_is_empty() {
		assert!(resolve_id(&node("g7", None)).is_empty());
		assert!(resolve_id(&node("", Some("🐘 ✓"))).is_empty());
		assert!(try_resolve(&node("g7", None)).is_err());
	}

	#[test]
	fn resolution_is_deterministic() {
		let h = node("flowchart-Data3-20", Some("Data Node 3"));
		assert_eq!(resolve_id(&h), resolve_id(&h.clone()));
	}

	#[test]
	fn edge_tags_need_both_ends() {
		let edge = |c: &str| EdgeHandle {
			class_attr: c.into(),
		};
		assert_eq!(
			edge_tags(&edge("edge-thickness-normal flowchart-link LS-A LE-B")),
			Some((NodeId::from("A"), NodeId::from("B")))
		);
		assert_eq!(edge_tags(&edge("edgePath LS-A")), None);
		assert_eq!(edge_tags(&edge("LS- LE-B")), None);
	}

	#[test]
	fn build_graph_keeps_node_positions_and_skips_untagged_edges() {
		let nodes = [node("flowchart-A-0", None), node("g1", None)];
		let edges = [
			EdgeHandle {
				class_attr: "edgePaths".into(),
			},
			EdgeHandle {
				class_attr: "LS-A LE-B".into(),
			},
		];
		let (graph, slots) = build_graph(&nodes, &edges);
		assert_eq!(graph.nodes.len(), 2);
		assert!(graph.nodes[1].id.is_empty());
		assert_eq!(graph.edges.len(), 1);
		assert_eq!(slots, vec![1]);
	}
}
