use leptos::prelude::*;

use crate::components::arch_diagram::ArchDiagram;

const LEGEND: &[(&str, &str)] = &[
	("legend-write", "Write Path (RDS PostgreSQL → OpenSearch)"),
	("legend-search", "Search Path (API → OpenSearch)"),
	("legend-enrich", "Enrichment (ML → APIs)"),
	("legend-monitor", "Monitoring (Dashed)"),
];

/// Architecture page: header, the interactive diagram, legend and usage hint.
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<header class="hdr">
				<h1>"System Architecture"</h1>
				<p class="subtitle">"RDS PostgreSQL • CDC to OpenSearch • focus zoom • live editor"</p>
			</header>

			<ArchDiagram />

			<div class="flow-legend">
				<h4>"Data Flow Legend"</h4>
				<div class="legend-items">
					{LEGEND
						.iter()
						.map(|&(class, text)| {
							view! {
								<div class="legend-item">
									<div class=format!("legend-line {class}") />
									<span>{text}</span>
								</div>
							}
						})
						.collect_view()}
				</div>
			</div>

			<div class="instruction">
				<strong>"Tip:"</strong>
				" Hover for details. Click to zoom, blur others, and follow outgoing flow."
			</div>
		</ErrorBoundary>
	}
}
