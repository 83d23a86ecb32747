//! journal-backdrop: Animated particle backgrounds for the student journal site.
//!
//! This crate provides a WASM particle engine and a Leptos component that
//! draws it behind page content: drifting dust, rising smoke, embers,
//! lightning and a rotating 3D point cloud.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::particle_effect::{
	Color, EffectConfig, Palette, ParticleBackground, ParticleEffect, Tuning, parse_backdrops,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("journal-backdrop: logging initialized");
}

/// Load backdrop configs from a script element with id="effect-config".
/// Expected format: a preset name, a config object, or a list of either.
fn load_backdrops() -> Option<Vec<EffectConfig>> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("effect-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match parse_backdrops(&json_text) {
		Ok(configs) => {
			info!("journal-backdrop: loaded {} backdrop configs", configs.len());
			Some(configs)
		}
		Err(e) => {
			warn!("journal-backdrop: failed to parse effect config: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads backdrop configs from the DOM and layers them behind the page.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let backdrops = load_backdrops().unwrap_or_else(|| vec![EffectConfig::default()]);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Student Journal" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		{backdrops
			.into_iter()
			.map(|config| view! { <ParticleBackground config=config /> })
			.collect_view()}
		<main class="journal-shell">
			<h1>"Student Journal"</h1>
			<p class="subtitle">"Research, essays and reviews from our student editors."</p>
		</main>
	}
}
