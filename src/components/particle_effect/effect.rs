//! State of one mounted backdrop: its particles, bolts, pointer and clock.
//!
//! A `ParticleEffect` is owned by exactly one frame driver. Nothing in here
//! is shared between instances, so any number of backdrops can run side by
//! side with different pointer behaviour.

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::clock::TICKS_PER_SECOND;
use super::config::{EffectConfig, Tuning};
use super::display::Projection;
use super::forces::{ForceContext, PointerState};
use super::integrator::integrate;
use super::lightning::{Bolt, BoltState};
use super::particle::{Bounds, Particle};
use super::render::Scene;

pub struct ParticleEffect {
	config: EffectConfig,
	particles: Vec<Particle>,
	bolts: Vec<Bolt>,
	pointer: PointerState,
	bounds: Bounds,
	/// Simulated seconds, scaled by the config's speed.
	elapsed: f64,
	rng: SmallRng,
}

impl ParticleEffect {
	/// Populates the effect. The particle and bolt counts are fixed from here
	/// on.
	pub fn new(config: EffectConfig, width: f64, height: f64, seed: u64) -> Self {
		let config = config.sanitized();
		let bounds = Bounds::new(width, height);
		let mut rng = SmallRng::seed_from_u64(seed);

		let particles: Vec<Particle> = (0..config.particle_count())
			.map(|i| Particle::spawn_staggered(i, &config, &bounds, &mut rng))
			.collect();
		let bolts: Vec<Bolt> = config
			.lightning
			.as_ref()
			.map(|lightning| {
				(0..lightning.bolts)
					.map(|i| Bolt::new(i, lightning, &mut rng))
					.collect()
			})
			.unwrap_or_default();

		info!(
			"journal-backdrop: `{}` mounted with {} particles, {} bolts ({}x{})",
			config.name,
			particles.len(),
			bolts.len(),
			bounds.width,
			bounds.height
		);

		Self {
			config,
			particles,
			bolts,
			pointer: PointerState::default(),
			bounds,
			elapsed: 0.0,
			rng,
		}
	}

	/// Advances the simulation by `dt_seconds` of wall time.
	pub fn step(&mut self, dt_seconds: f64, now_ms: f64) {
		let scaled = dt_seconds * self.config.speed;
		if !scaled.is_finite() || scaled <= 0.0 {
			return;
		}
		self.elapsed += scaled;
		let ticks = scaled * TICKS_PER_SECOND;
		let ctx = self.force_context(now_ms);

		for particle in &mut self.particles {
			integrate(particle, &ctx, &self.config, ticks, &mut self.rng);
		}

		if let Some(lightning) = &self.config.lightning {
			for bolt in &mut self.bolts {
				if bolt.advance(lightning, &self.config.palette, &self.bounds, &mut self.rng)
					== Some(BoltState::Visible)
				{
					debug!(
						"journal-backdrop: bolt {} strikes for {} ticks",
						bolt.index, bolt.visible_lifespan
					);
				}
			}
		}
	}

	pub fn force_context(&self, now_ms: f64) -> ForceContext {
		ForceContext {
			pointer: self.pointer.snapshot(now_ms),
			time: self.elapsed,
			bounds: self.bounds,
			toggles: self.config.forces,
			params: self.config.params,
			pointer_mode: self.config.pointer_mode,
		}
	}

	pub fn pointer_moved(&mut self, x: f64, y: f64, now_ms: f64) {
		self.pointer.moved(x, y, now_ms);
	}

	pub fn pointer_left(&mut self) {
		self.pointer.left();
	}

	/// Adopts a new viewport size, scaling positions proportionally.
	pub fn resize(&mut self, width: f64, height: f64) {
		let (next, scale) = self.bounds.scale_to(width, height);

		for p in &mut self.particles {
			p.position.x *= scale.x;
			p.position.y *= scale.y;
			p.anchor.x *= scale.x;
			p.anchor.y *= scale.y;
		}
		for bolt in &mut self.bolts {
			bolt.origin *= scale;
			for point in &mut bolt.path {
				*point *= scale;
			}
		}
		self.pointer.scale(scale.x, scale.y);
		self.bounds = next;
	}

	/// Applies live-tuned parameters. Globals change now; per-particle
	/// constants follow as particles respawn.
	pub fn retune(&mut self, tuning: &Tuning) {
		self.config.apply(tuning);
		debug!("journal-backdrop: `{}` retuned", self.config.name);
	}

	pub fn config(&self) -> &EffectConfig {
		&self.config
	}

	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	pub fn bolts(&self) -> &[Bolt] {
		&self.bolts
	}

	pub fn bounds(&self) -> Bounds {
		self.bounds
	}

	pub fn elapsed(&self) -> f64 {
		self.elapsed
	}

	pub fn pointer(&self) -> &PointerState {
		&self.pointer
	}

	/// Camera for the current frame. 3D emission shapes turn slowly.
	pub fn projection(&self) -> Projection {
		match self.config.emission {
			super::config::Emission::Ellipsoid { .. } => {
				Projection::orbit(&self.bounds, self.elapsed * self.config.style.spin)
			}
			_ => Projection::Flat,
		}
	}

	/// Read-only view handed to renderers.
	pub fn scene(&self) -> Scene<'_> {
		Scene {
			particles: &self.particles,
			bolts: &self.bolts,
			config: &self.config,
			bounds: self.bounds,
			time: self.elapsed,
			projection: self.projection(),
		}
	}
}
