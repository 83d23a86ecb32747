//! Force contributors.
//!
//! Each contributor is a pure function of a particle, the per-frame
//! [`ForceContext`] and the timestep, returning an acceleration in pixels per
//! tick². The integrator sums the enabled ones; a disabled contributor is
//! simply never called, so toggles leave no residue behind.

use glam::{DVec2, DVec3};
use serde::Deserialize;

use super::config::finite_or;
use super::particle::{Bounds, Particle};

/// How long the pointer counts as active after its last move.
pub const POINTER_DECAY_MS: f64 = 100.0;

/// On/off switch per contributor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ForceToggles {
	pub gravity: bool,
	pub drag: bool,
	pub turbulence: bool,
	pub pointer: bool,
	pub buoyancy: bool,
	pub magnetism: bool,
	pub tether: bool,
}

impl ForceToggles {
	/// Only `force` enabled.
	pub fn only(force: Force) -> Self {
		let mut toggles = Self::default();
		toggles.set(force, true);
		toggles
	}

	pub fn enabled(&self, force: Force) -> bool {
		match force {
			Force::Gravity => self.gravity,
			Force::Drag => self.drag,
			Force::Turbulence => self.turbulence,
			Force::Pointer => self.pointer,
			Force::Buoyancy => self.buoyancy,
			Force::Magnetism => self.magnetism,
			Force::Tether => self.tether,
		}
	}

	pub fn set(&mut self, force: Force, on: bool) {
		let slot = match force {
			Force::Gravity => &mut self.gravity,
			Force::Drag => &mut self.drag,
			Force::Turbulence => &mut self.turbulence,
			Force::Pointer => &mut self.pointer,
			Force::Buoyancy => &mut self.buoyancy,
			Force::Magnetism => &mut self.magnetism,
			Force::Tether => &mut self.tether,
		};
		*slot = on;
	}
}

/// Global force magnitudes for an effect.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForceParams {
	/// Downward acceleration for a material of density 1.
	pub gravity: f64,
	/// Turbulence amplitude.
	pub turbulence: f64,
	pub pointer_radius: f64,
	pub pointer_strength: f64,
	/// Upward acceleration per degree above ambient.
	pub buoyancy: f64,
	pub ambient_temperature: f64,
	/// Rate at which particle temperature relaxes to ambient, per tick.
	pub thermal_decay: f64,
	/// Field strength for charged particles.
	pub magnetic_field: f64,
	/// Spring constant pulling particles back to their anchor.
	pub tether: f64,
	/// Velocity multiplier applied every tick, in `[0, 1]`.
	pub damping: f64,
}

impl Default for ForceParams {
	fn default() -> Self {
		Self {
			gravity: 0.05,
			turbulence: 0.01,
			pointer_radius: 120.0,
			pointer_strength: 0.5,
			buoyancy: 0.001,
			ambient_temperature: 20.0,
			thermal_decay: 0.01,
			magnetic_field: 0.0,
			tether: 0.0,
			damping: 0.99,
		}
	}
}

impl ForceParams {
	pub fn sanitized(self) -> Self {
		let d = Self::default();
		Self {
			gravity: finite_or(self.gravity, d.gravity),
			turbulence: finite_or(self.turbulence, d.turbulence),
			pointer_radius: finite_or(self.pointer_radius, d.pointer_radius).max(0.0),
			pointer_strength: finite_or(self.pointer_strength, d.pointer_strength),
			buoyancy: finite_or(self.buoyancy, d.buoyancy),
			ambient_temperature: finite_or(self.ambient_temperature, d.ambient_temperature),
			thermal_decay: finite_or(self.thermal_decay, d.thermal_decay).max(0.0),
			magnetic_field: finite_or(self.magnetic_field, d.magnetic_field),
			tether: finite_or(self.tether, d.tether).max(0.0),
			damping: finite_or(self.damping, d.damping).clamp(0.0, 1.0),
		}
	}
}

/// How the pointer pushes particles within its radius.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerMode {
	#[default]
	Repel,
	Attract,
	/// Repel inside `crossover` pixels, attract between there and the radius.
	RepelThenAttract { crossover: f64 },
}

/// Pointer tracking owned by a single effect instance.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
	position: Option<DVec2>,
	last_move_ms: f64,
}

impl PointerState {
	pub fn moved(&mut self, x: f64, y: f64, now_ms: f64) {
		if x.is_finite() && y.is_finite() {
			self.position = Some(DVec2::new(x, y));
			self.last_move_ms = now_ms;
		}
	}

	pub fn left(&mut self) {
		self.position = None;
	}

	pub fn position(&self) -> Option<DVec2> {
		self.position
	}

	/// Active while the last move is at most [`POINTER_DECAY_MS`] old.
	pub fn snapshot(&self, now_ms: f64) -> PointerSnapshot {
		PointerSnapshot {
			position: self.position,
			active: self.position.is_some() && now_ms - self.last_move_ms <= POINTER_DECAY_MS,
		}
	}

	pub fn scale(&mut self, sx: f64, sy: f64) {
		if let Some(p) = self.position.as_mut() {
			*p *= DVec2::new(sx, sy);
		}
	}
}

/// Pointer state frozen for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSnapshot {
	pub position: Option<DVec2>,
	pub active: bool,
}

/// Everything a contributor may read besides the particle itself.
#[derive(Clone, Copy, Debug)]
pub struct ForceContext {
	pub pointer: PointerSnapshot,
	/// Elapsed simulation seconds; drives the turbulence phase.
	pub time: f64,
	pub bounds: Bounds,
	pub toggles: ForceToggles,
	pub params: ForceParams,
	pub pointer_mode: PointerMode,
}

/// The individual contributors, in summation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Force {
	Gravity,
	Drag,
	Turbulence,
	Pointer,
	Buoyancy,
	Magnetism,
	Tether,
}

impl Force {
	pub const ALL: [Force; 7] = [
		Force::Gravity,
		Force::Drag,
		Force::Turbulence,
		Force::Pointer,
		Force::Buoyancy,
		Force::Magnetism,
		Force::Tether,
	];

	pub fn apply(self, particle: &Particle, ctx: &ForceContext, dt: f64) -> DVec3 {
		match self {
			Force::Gravity => gravity(particle, ctx, dt),
			Force::Drag => drag(particle, ctx, dt),
			Force::Turbulence => turbulence(particle, ctx, dt),
			Force::Pointer => pointer(particle, ctx, dt),
			Force::Buoyancy => buoyancy(particle, ctx, dt),
			Force::Magnetism => magnetism(particle, ctx, dt),
			Force::Tether => tether(particle, ctx, dt),
		}
	}
}

/// Sum of every enabled contributor.
pub fn accumulate(particle: &Particle, ctx: &ForceContext, dt: f64) -> DVec3 {
	Force::ALL
		.into_iter()
		.filter(|force| ctx.toggles.enabled(*force))
		.fold(DVec3::ZERO, |acc, force| acc + force.apply(particle, ctx, dt))
}

/// Constant pull towards the bottom of the screen, heavier for denser
/// materials.
pub fn gravity(particle: &Particle, ctx: &ForceContext, _dt: f64) -> DVec3 {
	DVec3::new(0.0, ctx.params.gravity * particle.material.density, 0.0)
}

/// Quadratic drag against the direction of motion. Capped so that on its own
/// it can stop a particle within one step but never reverse it.
pub fn drag(particle: &Particle, _ctx: &ForceContext, dt: f64) -> DVec3 {
	let speed = particle.velocity.length();
	if speed <= f64::EPSILON || dt <= 0.0 {
		return DVec3::ZERO;
	}
	let magnitude = (particle.material.drag * speed * speed).min(speed / dt);
	-particle.velocity / speed * magnitude
}

/// Pseudo-periodic flow field. Identical `(time, index)` pairs always give
/// identical output.
pub fn turbulence_at(time: f64, index: usize, amplitude: f64) -> DVec3 {
	let i = index as f64;
	DVec3::new(
		(time * 0.63 + i * 1.37).sin() * 0.6 + (time * 1.71 + i * 0.53).cos() * 0.4,
		(time * 0.81 + i * 2.11).cos() * 0.6 + (time * 1.29 + i * 0.37).sin() * 0.4,
		(time * 0.47 + i * 0.91).sin() * 0.5,
	) * amplitude
}

pub fn turbulence(particle: &Particle, ctx: &ForceContext, _dt: f64) -> DVec3 {
	turbulence_at(ctx.time, particle.index, ctx.params.turbulence)
}

/// Falloff `(radius - distance) / radius` and the unit vector from the
/// pointer to the particle, when the pointer is active and in range.
fn pointer_reach(particle: &Particle, ctx: &ForceContext) -> Option<(f64, f64, DVec2)> {
	let pointer = ctx.pointer.position.filter(|_| ctx.pointer.active)?;
	let radius = ctx.params.pointer_radius;
	let delta = particle.position.truncate() - pointer;
	let distance = delta.length();
	if radius <= 0.0 || distance >= radius {
		return None;
	}
	let falloff = (radius - distance) / radius;
	Some((falloff, distance, delta.try_normalize().unwrap_or(DVec2::ZERO)))
}

/// Pointer push or pull within the interaction radius.
pub fn pointer(particle: &Particle, ctx: &ForceContext, _dt: f64) -> DVec3 {
	let Some((falloff, distance, away)) = pointer_reach(particle, ctx) else {
		return DVec3::ZERO;
	};
	let sign = match ctx.pointer_mode {
		PointerMode::Repel => 1.0,
		PointerMode::Attract => -1.0,
		PointerMode::RepelThenAttract { crossover } => {
			if distance < crossover {
				1.0
			} else {
				-1.0
			}
		}
	};
	(away * sign * ctx.params.pointer_strength * falloff).extend(0.0)
}

/// How strongly the pointer currently highlights `particle`, in `[0, 1]`.
pub fn pointer_proximity(particle: &Particle, ctx: &ForceContext) -> f64 {
	if !ctx.toggles.pointer {
		return 0.0;
	}
	pointer_reach(particle, ctx).map_or(0.0, |(falloff, _, _)| falloff)
}

/// Hot particles rise, cold ones sink.
pub fn buoyancy(particle: &Particle, ctx: &ForceContext, _dt: f64) -> DVec3 {
	let excess = particle.temperature - ctx.params.ambient_temperature;
	DVec3::new(0.0, -ctx.params.buoyancy * excess, 0.0)
}

/// Exponential relaxation of `temperature` towards `ambient` over `dt` ticks.
pub fn relax_temperature(temperature: f64, ambient: f64, rate: f64, dt: f64) -> f64 {
	ambient + (temperature - ambient) * (-rate * dt).exp()
}

/// Lorentz-style deflection of charged particles by a field pointing out of
/// the screen. Always perpendicular to the velocity.
pub fn magnetism(particle: &Particle, ctx: &ForceContext, _dt: f64) -> DVec3 {
	let field = ctx.params.magnetic_field * particle.charge;
	let v = particle.velocity;
	DVec3::new(v.y * field, -v.x * field, 0.0)
}

/// Spring back towards the spawn anchor.
pub fn tether(particle: &Particle, ctx: &ForceContext, _dt: f64) -> DVec3 {
	(particle.anchor - particle.position) * ctx.params.tether
}
