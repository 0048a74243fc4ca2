//! Interactive architecture diagram rendered through Mermaid.
//!
//! [`App`] serves the full page; [`ArchDiagram`] can be mounted on its own
//! with a different graph source, emphasis scale or engine config.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

mod components;
mod pages;

pub use crate::components::arch_diagram::{ArchDiagram, EngineConfig};
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Console log level: everything in debug builds, lifecycle events in release.
const LOG_LEVEL: Level = if cfg!(debug_assertions) { Level::Debug } else { Level::Info };

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(LOG_LEVEL);
	console_error_panic_hook::set_once();
	info!("diagram app starting, log level {LOG_LEVEL}");
}

/// The architecture page, with a 404 fallback for every other path.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		<Title text="System Architecture" />

		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />
		<Meta
			name="description"
			content="Interactive map of the platform's services, data stores and pipelines"
		/>

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
