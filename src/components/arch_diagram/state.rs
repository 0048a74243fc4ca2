use log::{debug, error, info};

use super::editor::{self, EditOutcome, GraphSource, ParseStatus};
use super::error::RenderError;
use super::focus::{EmphasisScale, Focus, Marks};
use super::metadata::MetadataTable;
use super::types::{ComponentMetadata, NodeId, RenderedGraph};

/// Pixel offset between the pointer and the tooltip's top-left corner.
pub const TOOLTIP_OFFSET: f64 = 16.0;

/// Monotonic counter used to discard responses to superseded requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Generation(u64);

impl Generation {
	pub fn bump(&mut self) -> u64 {
		self.0 += 1;
		self.0
	}

	pub fn is_current(self, generation: u64) -> bool {
		self.0 == generation
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	pub node: NodeId,
	pub metadata: ComponentMetadata,
	pub x: f64,
	pub y: f64,
}

impl Tooltip {
	pub fn position(&self) -> (f64, f64) {
		(self.x + TOOLTIP_OFFSET, self.y + TOOLTIP_OFFSET)
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetailPanel {
	pub visible: bool,
	pub content: Option<ComponentMetadata>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditorState {
	pub open: bool,
	pub draft: String,
	pub status: Option<ParseStatus>,
}

/// Everything the diagram's event handlers read or write.
#[derive(Clone, Debug)]
pub enum Event {
	EngineReady,
	RenderCompleted { generation: u64, graph: RenderedGraph },
	RenderFailed { generation: u64, error: RenderError },
	PointerEnter { node: usize, x: f64, y: f64 },
	PointerMove { x: f64, y: f64 },
	PointerLeave,
	NodeClick(usize),
	BackgroundClick,
	ResetView,
	ToggleDetails,
	CloseDetails,
	SetScale(f64),
	OpenEditor,
	CloseEditor,
	DraftChanged(String),
	ValidationFinished { generation: u64, status: Option<ParseStatus> },
	Apply,
}

/// Engine work the component must run after a state transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
	Render { generation: u64, text: String },
	Validate { generation: u64, text: String },
}

#[derive(Debug)]
pub struct DiagramState {
	pub source: GraphSource,
	pub graph: RenderedGraph,
	pub focus: Focus,
	pub marks: Marks,
	pub scale: EmphasisScale,
	pub tooltip: Option<Tooltip>,
	/// Node index under the pointer, resolved or not.
	pub hovered: Option<usize>,
	pub details: DetailPanel,
	pub editor: EditorState,
	pub render_error: Option<String>,
	metadata: MetadataTable,
	engine_ready: bool,
	render_gen: Generation,
	validate_gen: Generation,
}

impl DiagramState {
	pub fn new(source: impl Into<String>, metadata: MetadataTable, scale: f64) -> Self {
		Self {
			source: GraphSource::new(source),
			graph: RenderedGraph::default(),
			focus: Focus::Neutral,
			marks: Marks::default(),
			scale: EmphasisScale::new(scale),
			tooltip: None,
			hovered: None,
			details: DetailPanel::default(),
			editor: EditorState::default(),
			render_error: None,
			metadata,
			engine_ready: false,
			render_gen: Generation::default(),
			validate_gen: Generation::default(),
		}
	}

	pub fn engine_ready(&self) -> bool {
		self.engine_ready
	}

	pub fn is_current_render(&self, generation: u64) -> bool {
		self.render_gen.is_current(generation)
	}

	/// Apply one event; the returned command, if any, must be executed.
	pub fn reduce(&mut self, event: Event) -> Option<Command> {
		match event {
			Event::EngineReady => {
				self.engine_ready = true;
				return self.request_render();
			}
			Event::RenderCompleted { generation, graph } => {
				if !self.render_gen.is_current(generation) {
					debug!("dropping stale render {generation}");
					return None;
				}
				info!(
					"render {generation} mounted: {} nodes, {} edges",
					graph.nodes.len(),
					graph.edges.len()
				);
				self.graph = graph;
				self.render_error = None;
				self.reset_view();
			}
			Event::RenderFailed { generation, error } => {
				if !self.render_gen.is_current(generation) {
					debug!("dropping stale render failure {generation}: {error}");
					return None;
				}
				error!("render {generation} failed: {error}");
				self.editor.status = Some(ParseStatus::RenderFailed(error.to_string()));
				self.render_error = Some(error.to_string());
			}
			Event::PointerEnter { node, x, y } => {
				self.hovered = Some(node);
				self.tooltip = self.resolved(node).map(|id| Tooltip {
					metadata: self.metadata.lookup(&id),
					node: id,
					x,
					y,
				});
			}
			Event::PointerMove { x, y } => {
				if let Some(tooltip) = self.tooltip.as_mut() {
					(tooltip.x, tooltip.y) = (x, y);
				}
			}
			Event::PointerLeave => {
				self.hovered = None;
				self.tooltip = None;
			}
			Event::NodeClick(idx) => {
				if let Some(id) = self.resolved(idx) {
					self.focus_on(id);
				}
			}
			Event::BackgroundClick => {
				self.reset_view();
				self.details.visible = false;
			}
			Event::ResetView => self.reset_view(),
			Event::ToggleDetails => self.details.visible = !self.details.visible,
			Event::CloseDetails => {
				self.details.visible = false;
				self.reset_view();
			}
			Event::SetScale(value) => self.scale = EmphasisScale::new(value),
			Event::OpenEditor => {
				self.editor.open = true;
				self.editor.draft = self.source.text().to_string();
				self.editor.status = None;
				self.reset_view();
			}
			Event::CloseEditor => self.editor.open = false,
			Event::DraftChanged(text) => {
				self.editor.draft = text;
				if self.engine_ready {
					return Some(Command::Validate {
						generation: self.validate_gen.bump(),
						text: self.editor.draft.clone(),
					});
				}
			}
			Event::ValidationFinished { generation, status } => {
				if self.validate_gen.is_current(generation) {
					self.editor.status = status;
				}
			}
			Event::Apply => {
				// Outstanding validations describe text that is no longer pending.
				self.validate_gen.bump();
				let draft = std::mem::take(&mut self.editor.draft);
				let outcome = editor::apply(&mut self.source, &draft);
				self.editor.draft = draft;
				match outcome {
					EditOutcome::Accepted => {
						self.editor.open = false;
						self.editor.status = None;
						return self.request_render();
					}
					EditOutcome::Rejected(reason) => {
						self.editor.status = Some(ParseStatus::Rejected(reason));
					}
				}
			}
		}
		None
	}

	fn request_render(&mut self) -> Option<Command> {
		if !self.engine_ready {
			debug!("engine not ready, deferring render");
			return None;
		}
		Some(Command::Render {
			generation: self.render_gen.bump(),
			text: self.source.text().to_string(),
		})
	}

	fn resolved(&self, idx: usize) -> Option<NodeId> {
		let node = self.graph.node(idx)?;
		if node.id.is_empty() {
			debug!("no metadata for unresolved node '{}'", node.handle.dom_id);
			return None;
		}
		Some(node.id.clone())
	}

	fn focus_on(&mut self, id: NodeId) {
		self.details.content = Some(self.metadata.lookup(&id));
		self.details.visible = true;
		self.marks = Marks::compute(&self.graph, &Focus::Focused(id.clone()));
		debug!(
			"focused {id}: {} nodes dimmed, {} edges highlighted",
			self.marks.dimmed_nodes(),
			self.marks.highlighted_edges()
		);
		self.focus = Focus::Focused(id);
	}

	fn reset_view(&mut self) {
		self.focus = Focus::Neutral;
		self.marks = Marks::neutral(&self.graph);
		self.tooltip = None;
		self.hovered = None;
	}
}
