//! Applies [`DiagramState`](super::state::DiagramState) to the mounted SVG.

use wasm_bindgen::JsCast;
use web_sys::{Element, EventTarget, HtmlElement};

use super::focus::Marks;
use super::identity::build_graph;
use super::types::{EdgeHandle, NodeHandle, RenderedGraph};

const NODE_SELECTOR: &str = ".node";
const EDGE_SELECTOR: &str = ".edgePaths path, path.flowchart-link, [class*=\"LS-\"]";
const NODE_INDEX_ATTR: &str = "data-node-index";
/// Regions whose clicks never count as background clicks.
const FOREGROUND_SELECTOR: &str = ".node, .details-sidebar, #graphEditor, .controls";

/// Element handles of the diagram currently in the DOM, index-aligned with the
/// [`RenderedGraph`] built from them.
#[derive(Default)]
pub struct MountedDiagram {
	nodes: Vec<Element>,
	edges: Vec<Element>,
	untagged: Vec<Element>,
}

fn select_all(root: &Element, selector: &str) -> Vec<Element> {
	let Ok(list) = root.query_selector_all(selector) else {
		log::warn!("invalid selector {selector}");
		return Vec::new();
	};
	(0..list.length())
		.filter_map(|i| list.get(i))
		.filter_map(|node| node.dyn_into::<Element>().ok())
		.collect()
}

/// Insert `markup` under `mount` and read the node/edge structure back.
pub fn mount(root: &Element, markup: &str) -> (MountedDiagram, RenderedGraph) {
	root.set_inner_html(markup);

	let nodes = select_all(root, NODE_SELECTOR);
	let node_handles: Vec<NodeHandle> = nodes
		.iter()
		.enumerate()
		.map(|(i, el)| {
			let _ = el.set_attribute(NODE_INDEX_ATTR, &i.to_string());
			NodeHandle {
				dom_id: el.id(),
				title: el
					.query_selector("title")
					.ok()
					.flatten()
					.and_then(|t| t.text_content()),
			}
		})
		.collect();

	let edges = select_all(root, EDGE_SELECTOR);
	let edge_handles: Vec<EdgeHandle> = edges
		.iter()
		.map(|el| EdgeHandle {
			class_attr: el.get_attribute("class").unwrap_or_default(),
		})
		.collect();

	let (graph, slots) = build_graph(&node_handles, &edge_handles);
	let (tagged, untagged) = split_edges(edges, &slots);
	(
		MountedDiagram {
			nodes,
			edges: tagged,
			untagged,
		},
		graph,
	)
}

/// Partition `edges` into the ones named by `slots`, in slot order, and the rest.
fn split_edges<T>(edges: Vec<T>, slots: &[usize]) -> (Vec<T>, Vec<T>) {
	let mut cells: Vec<Option<T>> = edges.into_iter().map(Some).collect();
	let tagged = slots.iter().filter_map(|&i| cells.get_mut(i)?.take()).collect();
	(tagged, cells.into_iter().flatten().collect())
}

fn toggle(el: &Element, class: &str, on: bool) {
	let _ = el.class_list().toggle_with_force(class, on);
}

pub fn apply_marks(mounted: &MountedDiagram, marks: &Marks) {
	for (el, mark) in mounted.nodes.iter().zip(&marks.nodes) {
		toggle(el, "dim", mark.dimmed);
		toggle(el, "focus", mark.emphasized);
	}
	for (el, mark) in mounted.edges.iter().zip(&marks.edges) {
		toggle(el, "dim", mark.dimmed);
		toggle(el, "edge-highlight", mark.highlighted);
		toggle(el, "edge-animate", mark.animated);
	}
	for el in &mounted.untagged {
		toggle(el, "dim", marks.untagged.dimmed);
	}
}

/// Publish the emphasis scale as the `--focus-scale` custom property.
pub fn set_focus_scale(scale: f64) {
	let Some(root) = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.document_element())
		.and_then(|el| el.dyn_into::<HtmlElement>().ok())
	else {
		return;
	};
	let _ = root.style().set_property("--focus-scale", &scale.to_string());
}

fn closest(target: Option<EventTarget>, selector: &str) -> Option<Element> {
	target?.dyn_into::<Element>().ok()?.closest(selector).ok()?
}

/// Index of the rendered node an event landed on.
pub fn node_index(target: Option<EventTarget>) -> Option<usize> {
	closest(target, NODE_SELECTOR)?
		.get_attribute(NODE_INDEX_ATTR)?
		.parse()
		.ok()
}

pub fn is_background(target: Option<EventTarget>) -> bool {
	closest(target, FOREGROUND_SELECTOR).is_none()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn split_edges_keeps_slot_order_and_leftovers() {
		let (tagged, untagged) = split_edges(vec!['a', 'b', 'c', 'd'], &[3, 1]);
		assert_eq!(tagged, vec!['d', 'b']);
		assert_eq!(untagged, vec!['a', 'c']);
	}
}
