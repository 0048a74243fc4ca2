use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, warn};
use wasm_bindgen::JsValue;
use web_sys::MouseEvent;

use super::editor;
use super::engine::{EngineConfig, MermaidEngine, RenderEngine};
use super::focus::DEFAULT_SCALE;
use super::metadata::MetadataTable;
use super::panels::{DetailsSidebar, EditorDrawer, LiveControls, NodeTooltip};
use super::render::{self, MountedDiagram};
use super::state::{Command, DiagramState, Event};
use super::DEFAULT_GRAPH;

/// Owns the diagram state and runs the engine work its transitions request.
#[derive(Clone)]
pub struct DiagramController {
	pub state: RwSignal<DiagramState>,
	mount_ref: NodeRef<leptos::html::Div>,
	mounted: Rc<RefCell<MountedDiagram>>,
	engine: MermaidEngine,
}

impl DiagramController {
	pub fn dispatch(&self, event: Event) {
		if let Some(command) = self.state.try_update(|s| s.reduce(event)).flatten() {
			self.run(command);
		}
	}

	/// Click handler that dispatches `event`.
	pub fn send(self, event: Event) -> impl Fn(MouseEvent) {
		move |_| self.dispatch(event.clone())
	}

	fn run(&self, command: Command) {
		let this = self.clone();
		spawn_local(async move {
			match command {
				Command::Render { generation, text } => this.render(generation, text).await,
				Command::Validate { generation, text } => {
					let status = editor::validate(&this.engine, &text).await;
					this.dispatch(Event::ValidationFinished { generation, status });
				}
			}
		});
	}

	async fn render(&self, generation: u64, text: String) {
		debug!("render {generation} started");
		let event = match self.engine.render(&text).await {
			Ok(output) => {
				// A newer definition was submitted while this one was in flight.
				if !self.state.with_untracked(|s| s.is_current_render(generation)) {
					debug!("render {generation} superseded before mounting");
					return;
				}
				let Some(root) = self.mount_ref.get_untracked() else {
					warn!("diagram mount point missing, dropping render {generation}");
					return;
				};
				let (mounted, graph) = render::mount(&root, &output.markup);
				if let Some(bind) = output.bind {
					let _ = bind.call1(&JsValue::NULL, &root);
				}
				*self.mounted.borrow_mut() = mounted;
				Event::RenderCompleted { generation, graph }
			}
			Err(error) => Event::RenderFailed { generation, error },
		};
		self.dispatch(event);
	}
}

#[component]
pub fn ArchDiagram(
	#[prop(into, default = DEFAULT_GRAPH.trim().to_string())] source: String,
	#[prop(default = DEFAULT_SCALE)] focus_scale: f64,
	#[prop(default = EngineConfig::default())] config: EngineConfig,
) -> impl IntoView {
	let ctl = DiagramController {
		state: RwSignal::new(DiagramState::new(source, MetadataTable::platform(), focus_scale)),
		mount_ref: NodeRef::new(),
		mounted: Rc::new(RefCell::new(MountedDiagram::default())),
		engine: MermaidEngine::new(),
	};
	let state = ctl.state;

	let ctl_load = ctl.clone();
	Effect::new(move |_| {
		let ready = ctl_load.clone();
		ctl_load
			.engine
			.load(&config, move || ready.dispatch(Event::EngineReady));
	});

	let mounted = ctl.mounted.clone();
	Effect::new(move |_| {
		state.with(|s| render::apply_marks(&mounted.borrow(), &s.marks));
	});
	Effect::new(move |_| render::set_focus_scale(state.with(|s| s.scale.get())));

	let ctl_over = ctl.clone();
	let on_mouseover = move |ev: MouseEvent| {
		let node = render::node_index(ev.target());
		if node == state.with_untracked(|s| s.hovered) {
			return;
		}
		ctl_over.dispatch(match node {
			Some(node) => Event::PointerEnter {
				node,
				x: ev.client_x() as f64,
				y: ev.client_y() as f64,
			},
			None => Event::PointerLeave,
		});
	};

	let ctl_move = ctl.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if state.with_untracked(|s| s.hovered.is_some()) {
			ctl_move.dispatch(Event::PointerMove {
				x: ev.client_x() as f64,
				y: ev.client_y() as f64,
			});
		}
	};

	let ctl_leave = ctl.clone();
	let on_mouseleave = move |_: MouseEvent| ctl_leave.dispatch(Event::PointerLeave);

	let ctl_click = ctl.clone();
	let on_node_click = move |ev: MouseEvent| {
		if let Some(idx) = render::node_index(ev.target()) {
			ctl_click.dispatch(Event::NodeClick(idx));
		}
	};

	// Anywhere on the page counts, header and legend included.
	let ctl_bg = ctl.clone();
	let background = window_event_listener(leptos::ev::click, move |ev| {
		if render::is_background(ev.target()) {
			ctl_bg.dispatch(Event::BackgroundClick);
		}
	});
	on_cleanup(move || background.remove());

	let (ctl_controls, ctl_sidebar, mount_ref) = (ctl.clone(), ctl.clone(), ctl.mount_ref);

	view! {
		<div class="container">
			<LiveControls ctl=ctl_controls />
			<div class="main-content">
				<div class="diagram-container">
					<div class="diagram-wrapper">
						<Show when=move || state.with(|s| s.render_error.is_some())>
							<div class="render-error">
								{move || state.with(|s| s.render_error.clone().unwrap_or_default())}
							</div>
						</Show>
						<Show when=move || !state.with(|s| s.engine_ready())>
							<p class="engine-loading">"Loading diagram engine…"</p>
						</Show>
						<div
							node_ref=mount_ref
							class="mermaid"
							on:mouseover=on_mouseover
							on:mousemove=on_mousemove
							on:mouseleave=on_mouseleave
							on:click=on_node_click
						/>
					</div>
				</div>
				<DetailsSidebar ctl=ctl_sidebar />
			</div>
			<NodeTooltip state=state />
			<EditorDrawer ctl=ctl />
		</div>
	}
}
