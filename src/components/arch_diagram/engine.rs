//! Rendering backends.
//!
//! [`MermaidEngine`] drives the Mermaid library loaded from a CDN at runtime.
//! Until the script has loaded and been initialized the engine reports itself
//! as not ready and render calls fail with [`RenderError::NotReady`].

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use log::{error, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::error::RenderError;

pub const MERMAID_CDN: &str = "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.min.js";

/// What a successful render hands back: SVG markup plus an optional hook that
/// wires the engine's own interactions onto the mounted markup.
#[derive(Clone, Debug)]
pub struct RenderOutput {
	pub markup: String,
	pub bind: Option<Function>,
}

/// Narrow contract over the graph-rendering library.
pub trait RenderEngine {
	fn is_ready(&self) -> bool;

	fn render(&self, text: &str) -> impl Future<Output = Result<RenderOutput, RenderError>>;
}

/// Where Mermaid is loaded from and how it is initialized.
///
/// `security_level` must stay `loose` for node click bindings to attach.
#[derive(Clone, Debug)]
pub struct EngineConfig {
	pub script_url: String,
	pub security_level: String,
	pub theme: String,
	pub font_size: String,
	pub font_family: String,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			script_url: MERMAID_CDN.into(),
			security_level: "loose".into(),
			theme: "base".into(),
			font_size: "14px".into(),
			font_family: "-apple-system,BlinkMacSystemFont,\"Segoe UI\",Roboto".into(),
		}
	}
}

impl EngineConfig {
	fn to_js(&self) -> JsValue {
		let vars = Object::new();
		let _ = Reflect::set(&vars, &"fontSize".into(), &self.font_size.as_str().into());
		let _ = Reflect::set(&vars, &"fontFamily".into(), &self.font_family.as_str().into());

		let config = Object::new();
		let _ = Reflect::set(&config, &"startOnLoad".into(), &JsValue::FALSE);
		let _ = Reflect::set(&config, &"securityLevel".into(), &self.security_level.as_str().into());
		let _ = Reflect::set(&config, &"theme".into(), &self.theme.as_str().into());
		let _ = Reflect::set(&config, &"themeVariables".into(), &vars);
		config.into()
	}
}

#[wasm_bindgen]
extern "C" {
	#[wasm_bindgen(js_namespace = mermaid, js_name = initialize)]
	fn mermaid_initialize(config: &JsValue);

	#[wasm_bindgen(js_namespace = mermaid, js_name = render, catch)]
	fn mermaid_render(id: &str, text: &str) -> Result<js_sys::Promise, JsValue>;
}

fn mermaid_present() -> bool {
	Reflect::has(&js_sys::global(), &"mermaid".into()).unwrap_or(false)
}

fn js_error_message(value: &JsValue) -> String {
	if let Some(err) = value.dyn_ref::<js_sys::Error>() {
		return err.message().into();
	}
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

#[derive(Clone, Debug, Default)]
pub struct MermaidEngine {
	ready: Rc<Cell<bool>>,
	seq: Rc<Cell<u64>>,
}

impl MermaidEngine {
	pub fn new() -> Self {
		Self::default()
	}

	/// Load and initialize Mermaid, then call `on_ready`.
	///
	/// If the library is already on the page only initialization runs.
	pub fn load(&self, config: &EngineConfig, on_ready: impl FnOnce() + 'static) {
		if self.ready.get() {
			on_ready();
			return;
		}
		let (ready, js_config) = (self.ready.clone(), config.to_js());
		let finish = move || {
			mermaid_initialize(&js_config);
			ready.set(true);
			info!("Mermaid initialized");
			on_ready();
		};

		if mermaid_present() {
			finish();
			return;
		}

		let Some(document) = web_sys::window().and_then(|w| w.document()) else {
			error!("no document to load Mermaid into");
			return;
		};
		let Some(body) = document.body() else {
			error!("document has no body");
			return;
		};
		let script = match document.create_element("script") {
			Ok(el) => el,
			Err(e) => {
				error!("cannot create script element: {}", js_error_message(&e));
				return;
			}
		};
		let _ = script.set_attribute("src", &config.script_url);
		let _ = script.set_attribute("async", "");

		let on_load = Closure::once_into_js(finish);
		let _ = script.add_event_listener_with_callback("load", on_load.unchecked_ref());
		let url = config.script_url.clone();
		let on_error = Closure::once_into_js(move || error!("failed to load Mermaid from {url}"));
		let _ = script.add_event_listener_with_callback("error", on_error.unchecked_ref());

		if let Err(e) = body.append_child(&script) {
			error!("cannot attach Mermaid script: {}", js_error_message(&e));
			return;
		}
		info!("loading Mermaid from {}", config.script_url);
	}

	fn next_render_id(&self) -> String {
		let n = self.seq.get() + 1;
		self.seq.set(n);
		format!("archGraph{n}")
	}
}

impl RenderEngine for MermaidEngine {
	fn is_ready(&self) -> bool {
		self.ready.get()
	}

	fn render(&self, text: &str) -> impl Future<Output = Result<RenderOutput, RenderError>> {
		let (ready, id, text) = (self.is_ready(), self.next_render_id(), text.to_string());
		async move {
			if !ready {
				return Err(RenderError::NotReady);
			}
			let promise = mermaid_render(&id, &text)
				.map_err(|e| RenderError::Syntax(js_error_message(&e)))?;
			let result = JsFuture::from(promise)
				.await
				.map_err(|e| RenderError::Syntax(js_error_message(&e)))?;

			let markup = Reflect::get(&result, &"svg".into())
				.ok()
				.and_then(|v| v.as_string())
				.ok_or_else(|| RenderError::Engine("render result carries no svg".into()))?;
			let bind = Reflect::get(&result, &"bindFunctions".into())
				.ok()
				.and_then(|v| v.dyn_into::<Function>().ok());
			Ok(RenderOutput { markup, bind })
		}
	}
}

/// Deterministic stand-in for Mermaid covering the flowchart subset the
/// built-in diagram uses.
#[cfg(test)]
pub(crate) mod fake {
	use std::future::{Future, ready};

	use super::{RenderEngine, RenderError, RenderOutput};
	use crate::components::arch_diagram::editor::has_direction_declaration;
	use crate::components::arch_diagram::types::{EdgeHandle, NodeHandle};

	const ARROWS: &[&str] = &["-.->", "==>", "-->", "---"];
	const SKIPPED: &[&str] = &["classDef ", "class ", "style ", "linkStyle ", "subgraph ", "end"];

	pub struct FakeEngine {
		ready: bool,
	}

	#[derive(Debug, Default)]
	pub struct Scene {
		pub nodes: Vec<NodeHandle>,
		pub edges: Vec<EdgeHandle>,
	}

	impl Scene {
		fn declare(&mut self, id: &str) {
			if !self
				.nodes
				.iter()
				.any(|n| n.title.as_deref() == Some(id))
			{
				self.nodes.push(NodeHandle {
					dom_id: format!("flowchart-{id}-{}", self.nodes.len()),
					title: Some(id.to_string()),
				});
			}
		}

		fn markup(&self) -> String {
			let mut svg = String::from("<svg>");
			for n in &self.nodes {
				svg.push_str(&format!("<g class=\"node default\" id=\"{}\"></g>", n.dom_id));
			}
			for e in &self.edges {
				svg.push_str(&format!("<path class=\"{}\"></path>", e.class_attr));
			}
			svg.push_str("</svg>");
			svg
		}
	}

	impl FakeEngine {
		pub fn ready() -> Self {
			Self { ready: true }
		}

		pub fn not_ready() -> Self {
			Self { ready: false }
		}

		/// Parse `text` into the handles Mermaid would have produced.
		pub fn scene(&self, text: &str) -> Result<Scene, RenderError> {
			if !has_direction_declaration(text) {
				return Err(RenderError::Syntax("missing graph header".into()));
			}
			let mut scene = Scene::default();
			let body = text.lines().map(str::trim).filter(|l| !l.is_empty()).skip(1);
			for (n, line) in body.enumerate() {
				if line.starts_with("%%") || SKIPPED.iter().any(|p| line.starts_with(p)) {
					continue;
				}
				let err = || RenderError::Syntax(format!("Parse error on line {}", n + 2));
				match ARROWS.iter().find_map(|a| line.split_once(a)) {
					Some((lhs, rhs)) => {
						let rhs = strip_edge_label(rhs.trim()).ok_or_else(err)?;
						let source = node_id(lhs.trim()).ok_or_else(err)?;
						let target = node_id(rhs).ok_or_else(err)?;
						scene.declare(source);
						scene.declare(target);
						scene.edges.push(EdgeHandle {
							class_attr: format!("flowchart-link LS-{source} LE-{target}"),
						});
					}
					None => scene.declare(node_id(line).ok_or_else(err)?),
				}
			}
			Ok(scene)
		}
	}

	fn strip_edge_label(rhs: &str) -> Option<&str> {
		match rhs.strip_prefix('|') {
			Some(rest) => rest.split_once('|').map(|(_, r)| r.trim()),
			None => Some(rhs),
		}
	}

	fn node_id(expr: &str) -> Option<&str> {
		let end = expr
			.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
			.unwrap_or(expr.len());
		let (id, shape) = expr.split_at(end);
		let closed = match shape.chars().next() {
			None => true,
			Some('[') => shape.ends_with(']'),
			Some('(') => shape.ends_with(')'),
			Some('{') => shape.ends_with('}'),
			_ => false,
		};
		(!id.is_empty() && closed).then_some(id)
	}

	impl RenderEngine for FakeEngine {
		fn is_ready(&self) -> bool {
			self.ready
		}

		fn render(&self, text: &str) -> impl Future<Output = Result<RenderOutput, RenderError>> {
			let result = if self.ready {
				self.scene(text).map(|scene| RenderOutput {
					markup: scene.markup(),
					bind: None,
				})
			} else {
				Err(RenderError::NotReady)
			};
			ready(result)
		}
	}

	#[test]
	fn parses_the_builtin_diagram() {
		let scene = FakeEngine::ready()
			.scene(crate::components::arch_diagram::DEFAULT_GRAPH)
			.unwrap();
		assert!(scene.nodes.len() > 40);
		assert!(
			scene
				.edges
				.iter()
				.any(|e| e.class_attr.ends_with("LS-Postgres LE-WAL"))
		);
	}

	#[test]
	fn dangling_arrow_is_a_syntax_error() {
		let err = FakeEngine::ready().scene("graph TB\n  A -->").unwrap_err();
		assert_eq!(err, RenderError::Syntax("Parse error on line 2".into()));
	}

	#[test]
	fn not_ready_engine_refuses_to_render() {
		let out = pollster::block_on(FakeEngine::not_ready().render("graph TB\nA"));
		assert!(matches!(out, Err(RenderError::NotReady)));
	}
}
