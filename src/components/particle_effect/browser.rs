//! Browser implementation of [`Host`].
//!
//! Each mounted effect gets its own `BrowserHost` with its own closures. The
//! closures reach their driver through a `Weak` handle, so a torn-down
//! effect is never kept alive by a stray callback.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent, Window};

use super::driver::{FrameDriver, Host, HostEvent};
use super::render::Renderer;

/// Owner of a mounted driver. Empty before mount and after teardown.
pub type Slot<R> = Rc<RefCell<Option<FrameDriver<BrowserHost, R>>>>;

pub struct BrowserHost {
	window: Window,
	frame_cb: Closure<dyn FnMut(f64)>,
	pointer_cb: Closure<dyn FnMut(MouseEvent)>,
	leave_cb: Closure<dyn FnMut(MouseEvent)>,
	resize_cb: Closure<dyn FnMut()>,
}

/// Inner size of the window, with a fallback for detached documents.
pub fn viewport_size(window: &Window) -> (f64, f64) {
	let width = window
		.inner_width()
		.ok()
		.and_then(|v| v.as_f64())
		.unwrap_or(800.0);
	let height = window
		.inner_height()
		.ok()
		.and_then(|v| v.as_f64())
		.unwrap_or(600.0);
	(width, height)
}

/// Runs `f` on the driver if it is still mounted and not already borrowed.
fn with_driver<R: Renderer>(
	slot: &Weak<RefCell<Option<FrameDriver<BrowserHost, R>>>>,
	f: impl FnOnce(&mut FrameDriver<BrowserHost, R>),
) {
	let Some(slot) = slot.upgrade() else {
		return;
	};
	let Ok(mut guard) = slot.try_borrow_mut() else {
		return;
	};
	if let Some(driver) = guard.as_mut() {
		f(driver);
	}
}

impl BrowserHost {
	pub fn new<R: Renderer + 'static>(window: Window, canvas: HtmlCanvasElement, slot: &Slot<R>) -> Self {
		let frame_slot = Rc::downgrade(slot);
		let frame_cb: Closure<dyn FnMut(f64)> = Closure::new(move |timestamp: f64| {
			with_driver(&frame_slot, |driver| driver.on_frame(timestamp));
		});

		let (pointer_slot, pointer_canvas) = (Rc::downgrade(slot), canvas.clone());
		let pointer_cb: Closure<dyn FnMut(MouseEvent)> = Closure::new(move |ev: MouseEvent| {
			let rect = pointer_canvas.get_bounding_client_rect();
			let (x, y) = (
				ev.client_x() as f64 - rect.left(),
				ev.client_y() as f64 - rect.top(),
			);
			with_driver(&pointer_slot, |driver| driver.on_pointer_move(x, y));
		});

		// `pointerout` bubbles from every element; only a null related
		// target means the pointer left the page.
		let leave_slot = Rc::downgrade(slot);
		let leave_cb: Closure<dyn FnMut(MouseEvent)> = Closure::new(move |ev: MouseEvent| {
			if ev.related_target().is_none() {
				with_driver(&leave_slot, |driver| driver.on_pointer_leave());
			}
		});

		let (resize_slot, resize_window) = (Rc::downgrade(slot), window.clone());
		let resize_cb: Closure<dyn FnMut()> = Closure::new(move || {
			let (width, height) = viewport_size(&resize_window);
			canvas.set_width(width as u32);
			canvas.set_height(height as u32);
			with_driver(&resize_slot, |driver| driver.on_resize(width, height));
		});

		Self {
			window,
			frame_cb,
			pointer_cb,
			leave_cb,
			resize_cb,
		}
	}

	fn callback(&self, event: HostEvent) -> &js_sys::Function {
		match event {
			HostEvent::PointerMove => self.pointer_cb.as_ref().unchecked_ref(),
			HostEvent::PointerLeave => self.leave_cb.as_ref().unchecked_ref(),
			HostEvent::Resize => self.resize_cb.as_ref().unchecked_ref(),
		}
	}
}

impl Host for BrowserHost {
	type Frame = i32;
	type Subscription = HostEvent;

	fn request_frame(&mut self) -> Option<i32> {
		self.window
			.request_animation_frame(self.frame_cb.as_ref().unchecked_ref())
			.ok()
	}

	fn cancel_frame(&mut self, frame: i32) {
		let _ = self.window.cancel_animation_frame(frame);
	}

	fn listen(&mut self, event: HostEvent) -> Option<HostEvent> {
		self.window
			.add_event_listener_with_callback(event.dom_name(), self.callback(event))
			.ok()
			.map(|_| event)
	}

	fn unlisten(&mut self, event: HostEvent) {
		let _ = self
			.window
			.remove_event_listener_with_callback(event.dom_name(), self.callback(event));
	}

	fn now_ms(&self) -> f64 {
		self.window.performance().map(|p| p.now()).unwrap_or(0.0)
	}
}
