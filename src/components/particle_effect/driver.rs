//! Frame driver: the per-frame loop of one mounted effect.
//!
//! The driver owns its effect, renderer and clock outright and talks to the
//! browser only through [`Host`], so the whole mount/frame/teardown cycle
//! runs under native tests with a fake host.

use log::info;

use super::clock::FrameClock;
use super::effect::ParticleEffect;
use super::render::Renderer;

/// Page-level events a driver listens to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostEvent {
	PointerMove,
	/// The pointer left the page.
	PointerLeave,
	Resize,
}

impl HostEvent {
	pub const ALL: [HostEvent; 3] = [
		HostEvent::PointerMove,
		HostEvent::PointerLeave,
		HostEvent::Resize,
	];

	/// DOM event name.
	pub fn dom_name(self) -> &'static str {
		match self {
			HostEvent::PointerMove => "pointermove",
			HostEvent::PointerLeave => "pointerout",
			HostEvent::Resize => "resize",
		}
	}
}

/// Animation-frame scheduling and event subscription.
pub trait Host {
	/// Handle of a requested frame.
	type Frame;
	/// Handle of an installed listener.
	type Subscription;

	fn request_frame(&mut self) -> Option<Self::Frame>;
	fn cancel_frame(&mut self, frame: Self::Frame);
	fn listen(&mut self, event: HostEvent) -> Option<Self::Subscription>;
	fn unlisten(&mut self, subscription: Self::Subscription);
	/// Monotonic milliseconds.
	fn now_ms(&self) -> f64;
}

pub struct FrameDriver<H: Host, R: Renderer> {
	effect: ParticleEffect,
	renderer: R,
	host: H,
	clock: FrameClock,
	pending: Option<H::Frame>,
	subscriptions: Vec<H::Subscription>,
	mounted: bool,
}

impl<H: Host, R: Renderer> FrameDriver<H, R> {
	pub fn new(effect: ParticleEffect, renderer: R, host: H) -> Self {
		Self {
			effect,
			renderer,
			host,
			clock: FrameClock::new(),
			pending: None,
			subscriptions: Vec::new(),
			mounted: false,
		}
	}

	/// Subscribes to pointer and resize events and schedules the first
	/// frame. Mounting twice is a no-op.
	pub fn mount(&mut self) {
		if self.mounted {
			return;
		}
		self.mounted = true;
		self.clock.reset();
		for event in HostEvent::ALL {
			if let Some(subscription) = self.host.listen(event) {
				self.subscriptions.push(subscription);
			}
		}
		self.pending = self.host.request_frame();
	}

	/// One animation frame: step, draw, reschedule.
	pub fn on_frame(&mut self, timestamp_ms: f64) {
		self.pending = None;
		if !self.mounted {
			return;
		}
		let dt = self.clock.tick(timestamp_ms);
		self.effect.step(dt, self.host.now_ms());
		self.renderer.draw(&self.effect.scene());
		self.pending = self.host.request_frame();
	}

	/// Pointer position in viewport-local pixels.
	pub fn on_pointer_move(&mut self, x: f64, y: f64) {
		let now = self.host.now_ms();
		self.effect.pointer_moved(x, y, now);
	}

	pub fn on_pointer_leave(&mut self) {
		self.effect.pointer_left();
	}

	pub fn on_resize(&mut self, width: f64, height: f64) {
		self.effect.resize(width, height);
		self.renderer.resize(width, height);
	}

	/// Cancels the pending frame and removes every listener. Safe to call
	/// any number of times.
	pub fn teardown(&mut self) {
		if let Some(frame) = self.pending.take() {
			self.host.cancel_frame(frame);
		}
		for subscription in self.subscriptions.drain(..) {
			self.host.unlisten(subscription);
		}
		if self.mounted {
			self.mounted = false;
			info!("journal-backdrop: `{}` torn down", self.effect.config().name);
		}
	}

	pub fn is_mounted(&self) -> bool {
		self.mounted
	}

	pub fn has_pending_frame(&self) -> bool {
		self.pending.is_some()
	}

	pub fn effect(&self) -> &ParticleEffect {
		&self.effect
	}

	pub fn effect_mut(&mut self) -> &mut ParticleEffect {
		&mut self.effect
	}

	pub fn renderer(&self) -> &R {
		&self.renderer
	}

	pub fn host(&self) -> &H {
		&self.host
	}
}

impl<H: Host, R: Renderer> Drop for FrameDriver<H, R> {
	fn drop(&mut self) {
		self.teardown();
	}
}

#[cfg(test)]
mod tests {
	use std::cell::{Cell, RefCell};
	use std::collections::HashMap;
	use std::rc::Rc;

	use super::*;
	use crate::components::particle_effect::config::EffectConfig;
	use crate::components::particle_effect::render::Scene;

	/// Listener counts as a page would see them, shared across hosts.
	#[derive(Default)]
	struct Page {
		listeners: RefCell<HashMap<HostEvent, usize>>,
		frames: Cell<usize>,
		next_frame: Cell<u32>,
		now: Cell<f64>,
	}

	impl Page {
		fn listeners(&self, event: HostEvent) -> usize {
			self.listeners.borrow().get(&event).copied().unwrap_or(0)
		}
	}

	struct FakeHost(Rc<Page>);

	impl Host for FakeHost {
		type Frame = u32;
		type Subscription = HostEvent;

		fn request_frame(&mut self) -> Option<u32> {
			self.0.frames.set(self.0.frames.get() + 1);
			let id = self.0.next_frame.get() + 1;
			self.0.next_frame.set(id);
			Some(id)
		}

		fn cancel_frame(&mut self, _: u32) {
			self.0.frames.set(self.0.frames.get() - 1);
		}

		fn listen(&mut self, event: HostEvent) -> Option<HostEvent> {
			*self.0.listeners.borrow_mut().entry(event).or_default() += 1;
			Some(event)
		}

		fn unlisten(&mut self, event: HostEvent) {
			*self.0.listeners.borrow_mut().entry(event).or_default() -= 1;
		}

		fn now_ms(&self) -> f64 {
			self.0.now.get()
		}
	}

	#[derive(Default)]
	struct Recording {
		frames: usize,
		last_count: usize,
		size: Option<(f64, f64)>,
	}

	impl Renderer for Recording {
		fn resize(&mut self, width: f64, height: f64) {
			self.size = Some((width, height));
		}

		fn draw(&mut self, scene: &Scene<'_>) {
			self.frames += 1;
			self.last_count = scene.particles.len();
		}
	}

	fn driver(page: &Rc<Page>) -> FrameDriver<FakeHost, Recording> {
		let effect = ParticleEffect::new(EffectConfig::ambient(), 800.0, 600.0, 1);
		FrameDriver::new(effect, Recording::default(), FakeHost(page.clone()))
	}

	/// The page runs the pending frame, consuming it.
	fn fire(page: &Page, driver: &mut FrameDriver<FakeHost, Recording>, timestamp_ms: f64) {
		page.frames.set(page.frames.get() - 1);
		driver.on_frame(timestamp_ms);
	}

	#[test]
	fn test_mount_unmount_twice_restores_listener_counts() {
		let page = Rc::new(Page::default());
		for _ in 0..2 {
			let mut driver = driver(&page);
			driver.mount();
			for event in HostEvent::ALL {
				assert_eq!(page.listeners(event), 1, "{event:?}");
			}
			assert_eq!(page.frames.get(), 1);
			fire(&page, &mut driver, 16.0);
			assert_eq!(page.frames.get(), 1);
			driver.teardown();
			assert!(!driver.is_mounted());
		}
		for event in HostEvent::ALL {
			assert_eq!(page.listeners(event), 0, "{event:?}");
		}
		assert_eq!(page.frames.get(), 0);
	}

	#[test]
	fn test_double_teardown_is_harmless() {
		let page = Rc::new(Page::default());
		let mut driver = driver(&page);
		driver.mount();
		driver.teardown();
		driver.teardown();
		drop(driver);
		assert_eq!(page.listeners(HostEvent::PointerMove), 0);
		assert_eq!(page.listeners(HostEvent::Resize), 0);
		assert_eq!(page.frames.get(), 0);
	}

	#[test]
	fn test_drop_tears_down() {
		let page = Rc::new(Page::default());
		{
			let mut driver = driver(&page);
			driver.mount();
			driver.mount();
			assert_eq!(page.listeners(HostEvent::Resize), 1);
		}
		assert_eq!(page.listeners(HostEvent::Resize), 0);
		assert_eq!(page.frames.get(), 0);
	}

	#[test]
	fn test_frame_steps_draws_and_reschedules() {
		let page = Rc::new(Page::default());
		let mut driver = driver(&page);
		driver.mount();
		for i in 0..5 {
			fire(&page, &mut driver, i as f64 * 16.0);
			assert!(driver.has_pending_frame());
			assert_eq!(page.frames.get(), 1);
		}
		assert_eq!(driver.renderer().frames, 5);
		assert_eq!(driver.renderer().last_count, 90);
		assert!(driver.effect().elapsed() > 0.0);
	}

	#[test]
	fn test_frame_after_teardown_does_nothing() {
		let page = Rc::new(Page::default());
		let mut driver = driver(&page);
		driver.mount();
		driver.teardown();
		// A callback that was already queued when the frame got cancelled.
		driver.on_frame(16.0);
		assert_eq!(driver.renderer().frames, 0);
		assert!(!driver.has_pending_frame());
		assert_eq!(page.frames.get(), 0);
	}

	#[test]
	fn test_events_reach_effect_and_renderer() {
		let page = Rc::new(Page::default());
		page.now.set(1_000.0);
		let mut driver = driver(&page);
		driver.mount();
		driver.on_pointer_move(40.0, 50.0);
		assert!(driver.effect().pointer().snapshot(1_050.0).active);
		driver.on_pointer_leave();
		assert!(!driver.effect().pointer().snapshot(1_050.0).active);
		driver.on_resize(1024.0, 768.0);
		assert_eq!(driver.renderer().size, Some((1024.0, 768.0)));
		assert_eq!(driver.effect().bounds().width, 1024.0);
	}
}
