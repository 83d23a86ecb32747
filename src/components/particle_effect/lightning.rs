//! Lightning bolts.
//!
//! A bolt is not integrated like a particle. It cycles between a hidden
//! dormant phase and a short visible strike; every strike regenerates its
//! zig-zag path procedurally.

use std::f64::consts::{PI, TAU};

use glam::DVec2;
use rand::Rng;

use super::config::LightningConfig;
use super::particle::{Bounds, edge_point};
use super::theme::{Color, Palette};

/// Spread of the strike direction around the inward edge normal.
const DIRECTION_SPREAD: f64 = 0.5;

/// Number of half-waves of the smooth term along a bolt.
const WAVE_CYCLES: f64 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoltState {
	Dormant,
	Visible,
}

/// One lightning bolt and its state machine.
#[derive(Clone, Debug)]
pub struct Bolt {
	pub index: usize,
	pub state: BoltState,
	/// Ticks spent in the current state. Reset on every transition.
	pub age: u32,
	pub dormant_duration: u32,
	pub visible_lifespan: u32,
	pub origin: DVec2,
	pub direction: DVec2,
	pub color: Color,
	pub thickness: f64,
	/// Polyline of the current strike.
	pub path: Vec<DVec2>,
}

impl Bolt {
	/// A dormant bolt with a freshly sampled dormant duration.
	pub fn new<R: Rng + ?Sized>(index: usize, config: &LightningConfig, rng: &mut R) -> Self {
		Self {
			index,
			state: BoltState::Dormant,
			age: 0,
			dormant_duration: config.dormant.sample(rng),
			visible_lifespan: config.visible.min,
			origin: DVec2::ZERO,
			direction: DVec2::Y,
			color: Color::rgb(255, 255, 255),
			thickness: config.thickness.min,
			path: Vec::with_capacity(config.segments + 1),
		}
	}

	pub fn is_visible(&self) -> bool {
		self.state == BoltState::Visible
	}

	/// Ages the bolt one tick and performs any due transition, returning the
	/// state entered.
	pub fn advance<R: Rng + ?Sized>(
		&mut self,
		config: &LightningConfig,
		palette: &Palette,
		bounds: &Bounds,
		rng: &mut R,
	) -> Option<BoltState> {
		self.age = self.age.saturating_add(1);
		match self.state {
			BoltState::Dormant if self.age >= self.dormant_duration => {
				self.strike(config, palette, bounds, rng);
				Some(BoltState::Visible)
			}
			BoltState::Visible if self.age >= self.visible_lifespan => {
				self.state = BoltState::Dormant;
				self.age = 0;
				self.dormant_duration = config.dormant.sample(rng);
				Some(BoltState::Dormant)
			}
			_ => None,
		}
	}

	/// Resamples placement and appearance and regenerates the path.
	fn strike<R: Rng + ?Sized>(
		&mut self,
		config: &LightningConfig,
		palette: &Palette,
		bounds: &Bounds,
		rng: &mut R,
	) {
		let (origin, inward) = edge_point(bounds, 0.0, rng);
		let angle = inward + rng.gen_range(-DIRECTION_SPREAD..=DIRECTION_SPREAD);
		let length = config.length.sample(rng) * bounds.width.min(bounds.height);

		self.state = BoltState::Visible;
		self.age = 0;
		self.visible_lifespan = config.visible.sample(rng);
		self.origin = origin;
		self.direction = DVec2::new(angle.cos(), angle.sin());
		self.color = palette.get(rng.gen_range(0..palette.len().max(1)));
		self.thickness = config.thickness.sample(rng);
		generate_path(
			self.origin,
			self.direction,
			config.segments,
			length,
			config.wave,
			config.jitter,
			rng,
			&mut self.path,
		);
	}

	/// Strike brightness in `[0, 1]`: fades over the strike with a flicker.
	/// Dormant bolts are dark.
	pub fn brightness(&self) -> f64 {
		if !self.is_visible() {
			return 0.0;
		}
		let t = self.age as f64 / self.visible_lifespan.max(1) as f64;
		let flicker = 0.75 + 0.25 * (self.age as f64 * 2.7 + self.index as f64).sin();
		((1.0 - t) * flicker).clamp(0.0, 1.0)
	}
}

/// Writes a zig-zag polyline of `segments + 1` points into `out`.
///
/// Points advance evenly along `direction`; each is displaced
/// perpendicularly by a smooth sine term of amplitude `wave` plus a uniform
/// random offset of at most `jitter`. The first point is exactly `start`.
#[allow(clippy::too_many_arguments)]
pub fn generate_path<R: Rng + ?Sized>(
	start: DVec2,
	direction: DVec2,
	segments: usize,
	length: f64,
	wave: f64,
	jitter: f64,
	rng: &mut R,
	out: &mut Vec<DVec2>,
) {
	out.clear();
	let segments = segments.max(1);
	let dir = direction.try_normalize().unwrap_or(DVec2::Y);
	let normal = dir.perp();
	let step = length / segments as f64;
	let jitter = jitter.abs();
	let phase = rng.gen_range(0.0..TAU);

	out.push(start);
	for i in 1..=segments {
		let t = i as f64 / segments as f64;
		let smooth = (t * PI * WAVE_CYCLES * 2.0 + phase).sin() * wave;
		let offset = rng.gen_range(-jitter..=jitter);
		out.push(start + dir * step * i as f64 + normal * (smooth + offset));
	}
}
