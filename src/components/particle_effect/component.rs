//! Leptos component mounting one particle backdrop behind the page.
//!
//! The component creates a fixed, click-through canvas, picks a renderer for
//! it and hands everything to a [`FrameDriver`] stored in a per-instance
//! slot. Unmounting the component tears that driver down.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use send_wrapper::SendWrapper;
use web_sys::HtmlCanvasElement;

use super::browser::{BrowserHost, Slot, viewport_size};
use super::config::{EffectConfig, RendererKind};
use super::driver::FrameDriver;
use super::effect::ParticleEffect;
use super::render::{CanvasRenderer, Renderer};
use super::webgl::{self, WebGlRenderer};

/// Builds the renderer `config` asks for. WebGL support is checked on a
/// detached canvas first, so a failed check still leaves `canvas` usable
/// for 2D.
fn create_renderer(
	canvas: &HtmlCanvasElement,
	config: &EffectConfig,
	width: f64,
	height: f64,
) -> Option<Box<dyn Renderer>> {
	let kind = config.renderer_for(|| {
		let document = web_sys::window().and_then(|w| w.document());
		let works = document.as_ref().is_some_and(webgl::supported);
		if !works {
			warn!("journal-backdrop: `{}` cannot use WebGL2, using canvas", config.name);
		}
		works
	});
	match kind {
		RendererKind::Webgl => {
			let renderer = WebGlRenderer::new(canvas, config.particle_count(), width, height);
			if renderer.is_none() {
				warn!(
					"journal-backdrop: `{}` lost WebGL2 during setup, effect disabled",
					config.name
				);
			}
			renderer.map(|r| Box::new(r) as Box<dyn Renderer>)
		}
		RendererKind::Canvas => {
			CanvasRenderer::new(canvas, width, height).map(|r| Box::new(r) as Box<dyn Renderer>)
		}
	}
}

fn random_seed() -> u64 {
	let half = || (js_sys::Math::random() * u32::MAX as f64) as u64;
	(half() << 32) | half()
}

/// Renders an animated particle backdrop behind the page content.
///
/// The canvas covers the viewport, ignores pointer input and sits at the
/// config's `z_index`. Pointer interaction is read from window-level events.
#[component]
pub fn ParticleBackground(
	#[prop(into)] config: EffectConfig,
	#[prop(optional, into)] class: Option<String>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let slot: Slot<Box<dyn Renderer>> = Rc::new(RefCell::new(None));
	let style = format!(
		"position: fixed; inset: 0; width: 100%; height: 100%; pointer-events: none; z-index: {};",
		config.z_index
	);
	let class = class.unwrap_or_else(|| "particle-background".to_string());

	let slot_init = slot.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if slot_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("journal-backdrop: no window, `{}` not mounted", config.name);
			return;
		};

		let (w, h) = viewport_size(&window);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(renderer) = create_renderer(&canvas, &config, w, h) else {
			warn!(
				"journal-backdrop: canvas has no drawing context, `{}` not mounted",
				config.name
			);
			return;
		};

		let seed = config.seed.unwrap_or_else(random_seed);
		let effect = ParticleEffect::new(config.clone(), w, h, seed);
		let host = BrowserHost::new(window, canvas, &slot_init);

		// The driver must be in its slot before the first callback can fire.
		*slot_init.borrow_mut() = Some(FrameDriver::new(effect, renderer, host));
		if let Some(driver) = slot_init.borrow_mut().as_mut() {
			driver.mount();
		}
	});

	let slot_cleanup = SendWrapper::new(slot);
	on_cleanup(move || {
		let driver = slot_cleanup.borrow_mut().take();
		if let Some(mut driver) = driver {
			driver.teardown();
		}
	});

	view! {
		<canvas node_ref=canvas_ref class=class aria-hidden="true" style=style />
	}
}
