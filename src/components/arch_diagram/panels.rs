//! Tooltip, detail sidebar, live controls and the editor drawer.

use leptos::prelude::*;

use super::component::DiagramController;
use super::focus::{MAX_SCALE, MIN_SCALE, SCALE_STEP};
use super::state::{DiagramState, Event};
use super::types::ComponentMetadata;

fn metric_rows(metadata: &ComponentMetadata, row_class: &'static str) -> impl IntoView + use<> {
	metadata
		.metrics
		.iter()
		.map(|(label, value)| {
			view! {
				<div class=row_class>
					<span class="metric-label">{label.clone()}</span>
					<span class="metric-value">{value.clone()}</span>
				</div>
			}
		})
		.collect_view()
}

#[component]
pub fn NodeTooltip(state: RwSignal<DiagramState>) -> impl IntoView {
	let position = move |axis: usize| {
		state.with(|s| {
			s.tooltip
				.as_ref()
				.map(|t| {
					let (x, y) = t.position();
					format!("{}px", if axis == 0 { x } else { y })
				})
				.unwrap_or_default()
		})
	};

	view! {
		<div
			class="tooltip"
			class:show=move || state.with(|s| s.tooltip.is_some())
			style:left=move || position(0)
			style:top=move || position(1)
		>
			{move || {
				state
					.with(|s| s.tooltip.as_ref().map(|t| t.metadata.clone()))
					.map(|md| {
						view! {
							<h3>{md.title.clone()}</h3>
							<p class="tooltip-description">{md.description.clone()}</p>
							{metric_rows(&md, "metric")}
						}
					})
			}}
		</div>
	}
}

#[component]
pub fn DetailsSidebar(ctl: DiagramController) -> impl IntoView {
	let state = ctl.state;
	let on_close = ctl.send(Event::CloseDetails);
	let content = move || {
		match state.with(|s| s.details.content.clone()) {
			None => view! {
				<div class="sidebar-header">
					<h2>"Select a Component"</h2>
					<p class="sidebar-hint">
						"Click any component in the diagram to view detailed information"
					</p>
				</div>
			}
			.into_any(),
			Some(md) => {
				let has_metrics = !md.metrics.is_empty();
				view! {
					<div class="sidebar-header">
						<h2>{md.title.clone()}</h2>
						<span class="component-type">{md.category.clone()}</span>
						{(!md.description.is_empty())
							.then(|| view! { <p class="sidebar-description">{md.description.clone()}</p> })}
					</div>
					{has_metrics
						.then(|| {
							view! {
								<div class="sidebar-section">
									<h3>"Key Metrics"</h3>
									{metric_rows(&md, "metric-row")}
								</div>
							}
						})}
				}
				.into_any()
			}
		}
	};

	view! {
		<aside
			class="details-sidebar"
			class:hidden=move || !state.with(|s| s.details.visible)
		>
			<button class="close-sidebar" on:click=on_close>
				"×"
			</button>
			<div class="sidebar-content">{content}</div>
		</aside>
	}
}

#[component]
pub fn LiveControls(ctl: DiagramController) -> impl IntoView {
	let state = ctl.state;
	let on_reset = ctl.clone().send(Event::ResetView);
	let on_toggle = ctl.clone().send(Event::ToggleDetails);
	let on_edit = ctl.clone().send(Event::OpenEditor);
	let on_scale = move |ev: web_sys::Event| match event_target_value(&ev).parse::<f64>() {
		Ok(value) => ctl.dispatch(Event::SetScale(value)),
		Err(e) => log::warn!("ignoring scale input: {e}"),
	};

	view! {
		<div class="controls">
			<button class="control-btn" title="Reset View" on:click=on_reset>
				"⟲"
			</button>
			<button class="control-btn" title="Toggle Details" on:click=on_toggle>
				"📋"
			</button>
			<div class="live-card" aria-label="Live Controls">
				<div class="live-title">"Live Controls"</div>
				<label>
					"Focus Zoom: " {move || format!("{:.1}", state.with(|s| s.scale.get()))} "x"
				</label>
				<input
					type="range"
					min=MIN_SCALE.to_string()
					max=MAX_SCALE.to_string()
					step=SCALE_STEP.to_string()
					prop:value=move || state.with(|s| s.scale.get().to_string())
					on:input=on_scale
				/>
				<button class="control-btn wide" on:click=on_edit>
					"✏️ Edit Graph"
				</button>
			</div>
		</div>
	}
}

#[component]
pub fn EditorDrawer(ctl: DiagramController) -> impl IntoView {
	let state = ctl.state;
	// Only re-seed the textarea when the drawer opens or the committed text
	// changes, so typing never resets the caret.
	let seed = Memo::new(move |_| state.with(|s| (s.editor.open, s.source.text().to_string())));

	let on_apply = ctl.clone().send(Event::Apply);
	let on_close = ctl.clone().send(Event::CloseEditor);

	view! {
		<div
			id="graphEditor"
			class:open=move || state.with(|s| s.editor.open)
			role="dialog"
			aria-label="Mermaid Graph Live Editor"
		>
			<div class="bar">
				<strong class="editor-title">"Mermaid Graph (live)"</strong>
				<div
					class="parse-status"
					class:parse-ok=move || {
						state.with(|s| s.editor.status.as_ref().is_some_and(|st| st.is_ok()))
					}
				>
					{move || {
						state.with(|s| s.editor.status.as_ref().map(|st| st.message()).unwrap_or_default())
					}}
				</div>
				<button on:click=on_apply>"Apply"</button>
				<button on:click=on_close>"Close"</button>
			</div>
			<textarea
				spellcheck="false"
				prop:value=move || seed.get().1
				on:input=move |ev| ctl.dispatch(Event::DraftChanged(event_target_value(&ev)))
			/>
		</div>
	}
}
