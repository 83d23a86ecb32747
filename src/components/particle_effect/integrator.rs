//! Per-tick particle update: forces, semi-implicit Euler, boundaries and
//! lifecycle.

use rand::Rng;
use serde::Deserialize;

use super::config::EffectConfig;
use super::forces::{ForceContext, accumulate, pointer_proximity, relax_temperature};
use super::particle::{Bounds, Particle};

/// Per-tick decay of the pointer size boost.
const BOOST_DECAY: f64 = 0.9;

/// What happens at the viewport edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
	/// Leave one side, re-enter from the opposite one.
	Wrap,
	/// Bounce, losing energy according to the material's elasticity.
	Reflect,
	/// Leave freely; the particle respawns once it is out of bounds.
	Respawn,
}

/// Advances `particle` by `dt` ticks.
///
/// An expired particle is respawned instead of integrated, so the caller
/// sees a fresh state after exactly one more step. Returns whether a respawn
/// happened.
pub fn integrate<R: Rng + ?Sized>(
	particle: &mut Particle,
	ctx: &ForceContext,
	config: &EffectConfig,
	dt: f64,
	rng: &mut R,
) -> bool {
	if particle.is_expired(&ctx.bounds, config.margin) {
		particle.respawn(config, &ctx.bounds, rng);
		return true;
	}

	let acceleration = accumulate(particle, ctx, dt);
	particle.velocity += acceleration * dt;
	particle.velocity *= ctx.params.damping.powf(dt);
	particle.position += particle.velocity * dt;
	apply_boundary(particle, config.boundary, &ctx.bounds, config.margin);

	if ctx.toggles.buoyancy {
		particle.temperature = relax_temperature(
			particle.temperature,
			ctx.params.ambient_temperature,
			ctx.params.thermal_decay,
			dt,
		);
	}

	particle.boost = pointer_proximity(particle, ctx).max(particle.boost * BOOST_DECAY.powf(dt));
	particle.age = particle.age.saturating_add(1).min(particle.max_age);
	particle.refresh_appearance(config.size_curve);
	false
}

pub fn apply_boundary(particle: &mut Particle, boundary: Boundary, bounds: &Bounds, margin: f64) {
	let (w, h) = (bounds.width, bounds.height);
	let p = &mut particle.position;
	let v = &mut particle.velocity;
	match boundary {
		Boundary::Wrap => {
			if p.x < -margin {
				p.x = w + margin;
			} else if p.x > w + margin {
				p.x = -margin;
			}
			if p.y < -margin {
				p.y = h + margin;
			} else if p.y > h + margin {
				p.y = -margin;
			}
		}
		Boundary::Reflect => {
			let e = particle.material.elasticity.clamp(0.0, 1.0);
			if p.x < 0.0 {
				p.x = 0.0;
				v.x = v.x.abs() * e;
			} else if p.x > w {
				p.x = w;
				v.x = -v.x.abs() * e;
			}
			if p.y < 0.0 {
				p.y = 0.0;
				v.y = v.y.abs() * e;
			} else if p.y > h {
				p.y = h;
				v.y = -v.y.abs() * e;
			}
		}
		Boundary::Respawn => {}
	}
}
