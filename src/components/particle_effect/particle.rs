//! Particle model: one simulated element of a backdrop.
//!
//! Particles are never created or destroyed after mount. When one expires it
//! is respawned in place with a completely fresh state; only its `index`
//! survives.

use std::f64::consts::{PI, TAU};

use glam::{DVec2, DVec3};
use rand::Rng;
use serde::Deserialize;

use super::config::{EffectConfig, Emission, SizeCurve, finite_or};
use super::theme::Color;

/// Viewport extents in pixels. Depth is only used by 3D emission shapes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub width: f64,
	pub height: f64,
	pub depth: f64,
}

impl Bounds {
	pub fn new(width: f64, height: f64) -> Self {
		let width = finite_or(width, 0.0).max(0.0);
		let height = finite_or(height, 0.0).max(0.0);
		Self {
			width,
			height,
			depth: width.min(height),
		}
	}

	pub fn center(&self) -> DVec3 {
		DVec3::new(self.width / 2.0, self.height / 2.0, 0.0)
	}

	/// Whether `position` lies within the viewport grown by `margin` on
	/// every side.
	pub fn contains(&self, position: DVec3, margin: f64) -> bool {
		position.x >= -margin
			&& position.x <= self.width + margin
			&& position.y >= -margin
			&& position.y <= self.height + margin
	}

	/// Bounds of the new size and the per-axis factor that carries points
	/// from `self` into them. An empty axis scales by 1.
	pub fn scale_to(&self, width: f64, height: f64) -> (Bounds, DVec2) {
		let next = Bounds::new(width, height);
		let factor = |from: f64, to: f64| if from > 0.0 { to / from } else { 1.0 };
		let scale = DVec2::new(factor(self.width, next.width), factor(self.height, next.height));
		(next, scale)
	}
}

/// Physical constants of a particle's material.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Material {
	/// Scales gravity.
	pub density: f64,
	/// Quadratic drag coefficient.
	pub drag: f64,
	/// Fraction of speed kept when bouncing off an edge, in `[0, 1]`.
	pub elasticity: f64,
}

impl Material {
	pub const fn new(density: f64, drag: f64, elasticity: f64) -> Self {
		Self {
			density,
			drag,
			elasticity,
		}
	}

	pub fn sanitized(self) -> Self {
		Self {
			density: finite_or(self.density, 1.0).max(0.0),
			drag: finite_or(self.drag, 0.0).max(0.0),
			elasticity: finite_or(self.elasticity, 0.5).clamp(0.0, 1.0),
		}
	}
}

impl Default for Material {
	fn default() -> Self {
		Self::new(1.0, 0.02, 0.5)
	}
}

/// A single simulated element.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	/// Stable slot in the effect's particle array.
	pub index: usize,
	pub position: DVec3,
	pub velocity: DVec3,
	/// Where this incarnation was spawned; the tether force pulls towards it.
	pub anchor: DVec3,
	/// Ticks lived so far. Never exceeds `max_age`.
	pub age: u32,
	pub max_age: u32,
	pub base_size: f64,
	/// Current radius in pixels, derived from `base_size`, life and `boost`.
	pub size: f64,
	pub base_opacity: f64,
	/// Current opacity, derived from `base_opacity` and life.
	pub opacity: f64,
	/// Transient enlargement from pointer proximity, in `[0, 1]`.
	pub boost: f64,
	/// Twinkle phase offset.
	pub phase: f64,
	pub color: Color,
	pub material: Material,
	pub temperature: f64,
	pub charge: f64,
}

/// Share of life spent fading in.
const FADE_IN: f64 = 0.1;
/// Share of life spent fading out.
const FADE_OUT: f64 = 0.3;

/// Extra size at full pointer boost, as a fraction of the base size.
const BOOST_GROWTH: f64 = 0.8;

fn smooth_step(t: f64) -> f64 {
	let t = t.clamp(0.0, 1.0);
	t * t * (3.0 - 2.0 * t)
}

/// Opacity envelope over a particle's life fraction.
pub fn life_envelope(t: f64) -> f64 {
	let t = t.clamp(0.0, 1.0);
	if t < FADE_IN {
		smooth_step(t / FADE_IN)
	} else if t > 1.0 - FADE_OUT {
		smooth_step((1.0 - t) / FADE_OUT)
	} else {
		1.0
	}
}

impl Particle {
	/// Samples a completely fresh particle for slot `index`.
	pub fn spawn<R: Rng + ?Sized>(
		index: usize,
		config: &EffectConfig,
		bounds: &Bounds,
		rng: &mut R,
	) -> Self {
		let (position, heading) = emit(config.emission, bounds, config.margin, rng);
		let velocity = heading * config.velocity.sample(rng);
		let material = if config.materials.is_empty() {
			Material::default()
		} else {
			config.materials[rng.gen_range(0..config.materials.len())]
		};
		let color = config.palette.get(rng.gen_range(0..config.palette.len().max(1)));
		let base_size = config.size.sample(rng);
		let base_opacity = config.opacity.sample(rng);

		let mut particle = Self {
			index,
			position,
			velocity,
			anchor: position,
			age: 0,
			max_age: config.lifetime.sample(rng).max(1),
			base_size,
			size: base_size,
			base_opacity,
			opacity: 0.0,
			boost: 0.0,
			phase: rng.gen_range(0.0..TAU),
			color,
			material,
			temperature: config.temperature.sample(rng),
			charge: config.charge.sample(rng),
		};
		particle.refresh_appearance(config.size_curve);
		particle
	}

	/// Like [`Particle::spawn`] but starting at a random point of its life,
	/// so a freshly mounted effect does not expire in lockstep.
	pub fn spawn_staggered<R: Rng + ?Sized>(
		index: usize,
		config: &EffectConfig,
		bounds: &Bounds,
		rng: &mut R,
	) -> Self {
		let mut particle = Self::spawn(index, config, bounds, rng);
		particle.age = rng.gen_range(0..particle.max_age);
		particle.refresh_appearance(config.size_curve);
		particle
	}

	/// Reinitializes every field in place. Only `index` is kept.
	pub fn respawn<R: Rng + ?Sized>(&mut self, config: &EffectConfig, bounds: &Bounds, rng: &mut R) {
		*self = Self::spawn(self.index, config, bounds, rng);
	}

	/// Out of lifetime, or further than `margin` outside the viewport.
	pub fn is_expired(&self, bounds: &Bounds, margin: f64) -> bool {
		self.age >= self.max_age || !bounds.contains(self.position, margin)
	}

	/// Fraction of life used, in `[0, 1]`.
	pub fn life(&self) -> f64 {
		if self.max_age == 0 {
			return 1.0;
		}
		(self.age as f64 / self.max_age as f64).min(1.0)
	}

	/// Recomputes `size` and `opacity` from life and boost.
	pub fn refresh_appearance(&mut self, curve: SizeCurve) {
		let t = self.life();
		self.size = self.base_size * curve.factor(t) * (1.0 + BOOST_GROWTH * self.boost);
		self.opacity = self.base_opacity * life_envelope(t);
	}

	pub fn speed(&self) -> f64 {
		self.velocity.length()
	}
}

/// Unit vector in the screen plane at `angle` radians.
fn planar(angle: f64) -> DVec3 {
	DVec3::new(angle.cos(), angle.sin(), 0.0)
}

/// Uniformly distributed unit vector on the sphere.
fn sphere_direction<R: Rng + ?Sized>(rng: &mut R) -> DVec3 {
	let z: f64 = rng.gen_range(-1.0..=1.0);
	let theta = rng.gen_range(0.0..TAU);
	let r = (1.0 - z * z).max(0.0).sqrt();
	DVec3::new(r * theta.cos(), r * theta.sin(), z)
}

/// Heading spread either side of the nominal emission direction.
const HEADING_SPREAD: f64 = 0.35;

/// Samples a spawn position and a unit heading for an emission geometry.
pub fn emit<R: Rng + ?Sized>(
	emission: Emission,
	bounds: &Bounds,
	margin: f64,
	rng: &mut R,
) -> (DVec3, DVec3) {
	let (w, h) = (bounds.width, bounds.height);
	let inset = margin * 0.5;
	let spread = rng.gen_range(-HEADING_SPREAD..=HEADING_SPREAD);
	match emission {
		Emission::Uniform => (
			DVec3::new(rng.gen_range(0.0..=w), rng.gen_range(0.0..=h), 0.0),
			planar(rng.gen_range(0.0..TAU)),
		),
		Emission::Bottom => (
			DVec3::new(rng.gen_range(0.0..=w), h + inset, 0.0),
			planar(-PI / 2.0 + spread),
		),
		Emission::Top => (
			DVec3::new(rng.gen_range(0.0..=w), -inset, 0.0),
			planar(PI / 2.0 + spread),
		),
		Emission::Edges => {
			let (position, inward) = edge_point(bounds, inset, rng);
			(position.extend(0.0), planar(inward + spread))
		}
		Emission::Ellipsoid { radii } => {
			let scale = w.min(h);
			let direction = sphere_direction(rng);
			let shell = rng.gen_range(0.7..=1.0);
			let offset = direction * DVec3::from(radii) * scale * shell;
			(bounds.center() + offset, sphere_direction(rng))
		}
	}
}

/// A random point just outside one viewport edge and the angle pointing
/// into the viewport from there.
pub fn edge_point<R: Rng + ?Sized>(bounds: &Bounds, inset: f64, rng: &mut R) -> (DVec2, f64) {
	let (w, h) = (bounds.width, bounds.height);
	match rng.gen_range(0..4) {
		0 => (DVec2::new(rng.gen_range(0.0..=w), -inset), PI / 2.0),
		1 => (DVec2::new(w + inset, rng.gen_range(0.0..=h)), PI),
		2 => (DVec2::new(rng.gen_range(0.0..=w), h + inset), -PI / 2.0),
		_ => (DVec2::new(-inset, rng.gen_range(0.0..=h)), 0.0),
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;
	use crate::components::particle_effect::config::{Span, TickRange};

	fn bounds() -> Bounds {
		Bounds::new(800.0, 600.0)
	}

	#[test]
	fn test_scale_to_is_proportional() {
		let (next, scale) = bounds().scale_to(400.0, 1200.0);
		assert_eq!((next.width, next.height), (400.0, 1200.0));
		assert_eq!(scale, DVec2::new(0.5, 2.0));

		let (_, scale) = Bounds::new(0.0, 0.0).scale_to(100.0, 100.0);
		assert_eq!(scale, DVec2::ONE);
	}

	#[test]
	fn test_spawn_samples_within_config_ranges() {
		let config = EffectConfig::dust();
		let mut rng = SmallRng::seed_from_u64(1);
		for i in 0..200 {
			let p = Particle::spawn(i, &config, &bounds(), &mut rng);
			assert_eq!(p.index, i);
			assert_eq!(p.age, 0);
			assert!(config.lifetime.contains(p.max_age));
			assert!(config.size.contains(p.base_size));
			assert!(config.opacity.contains(p.base_opacity));
			assert!(config.materials.contains(&p.material));
			assert!(config.palette.colors.contains(&p.color));
			assert!(config.charge.contains(p.charge));
			assert!(p.speed() <= config.velocity.max + 1e-9);
			assert_eq!(p.anchor, p.position);
		}
	}

	#[test]
	fn test_bottom_emission_starts_below_and_heads_up() {
		let config = EffectConfig::smoke();
		let mut rng = SmallRng::seed_from_u64(2);
		for i in 0..100 {
			let p = Particle::spawn(i, &config, &bounds(), &mut rng);
			assert!(p.position.y > 600.0);
			assert!(p.velocity.y <= 0.0);
			assert!(!p.is_expired(&bounds(), config.margin));
		}
	}

	#[test]
	fn test_edge_emission_heads_inward() {
		let b = bounds();
		let mut rng = SmallRng::seed_from_u64(3);
		for _ in 0..200 {
			let (point, angle) = edge_point(&b, 5.0, &mut rng);
			let step = point + DVec2::new(angle.cos(), angle.sin()) * 10.0;
			let center = DVec2::new(400.0, 300.0);
			assert!(step.distance(center) < point.distance(center));
		}
	}

	#[test]
	fn test_ellipsoid_emission_stays_inside_shell() {
		let config = EffectConfig::brain();
		let mut rng = SmallRng::seed_from_u64(4);
		let b = bounds();
		for i in 0..300 {
			let p = Particle::spawn(i, &config, &b, &mut rng);
			let rel = p.position - b.center();
			assert!(rel.x.abs() <= 0.42 * 600.0 + 1e-6);
			assert!(rel.y.abs() <= 0.32 * 600.0 + 1e-6);
			assert!(rel.z.abs() <= 0.36 * 600.0 + 1e-6);
		}
	}

	#[test]
	fn test_expiry_by_age_and_by_bounds() {
		let config = EffectConfig::ambient();
		let mut rng = SmallRng::seed_from_u64(5);
		let mut p = Particle::spawn(0, &config, &bounds(), &mut rng);
		p.position = DVec3::new(100.0, 100.0, 0.0);
		assert!(!p.is_expired(&bounds(), 10.0));
		p.age = p.max_age;
		assert!(p.is_expired(&bounds(), 10.0));
		p.age = 0;
		p.position.x = -10.5;
		assert!(p.is_expired(&bounds(), 10.0));
		assert!(!p.is_expired(&bounds(), 11.0));
	}

	#[test]
	fn test_respawn_keeps_only_index() {
		let config = EffectConfig {
			size: Span::new(2.0, 3.0),
			lifetime: TickRange::new(10, 20),
			..EffectConfig::dust()
		};
		let mut rng = SmallRng::seed_from_u64(6);
		let mut p = Particle::spawn(42, &config, &bounds(), &mut rng);
		p.velocity = DVec3::new(900.0, 900.0, 9.0);
		p.age = p.max_age;
		p.boost = 1.0;
		p.temperature = 1e6;
		p.opacity = 1.0;
		p.size = 500.0;
		p.material = Material::new(99.0, 99.0, 1.0);
		p.respawn(&config, &bounds(), &mut rng);
		assert_eq!(p.index, 42);
		assert_eq!(p.age, 0);
		assert_eq!(p.boost, 0.0);
		assert!(p.speed() <= config.velocity.max + 1e-9);
		assert!(config.materials.contains(&p.material));
		assert!(p.size <= 3.0);
		assert!(p.opacity <= config.opacity.max);
		assert!(config.temperature.contains(p.temperature));
	}

	#[test]
	fn test_staggered_spawn_spreads_ages() {
		let config = EffectConfig::ambient();
		let mut rng = SmallRng::seed_from_u64(8);
		let ages: Vec<u32> = (0..50)
			.map(|i| Particle::spawn_staggered(i, &config, &bounds(), &mut rng).age)
			.collect();
		assert!(ages.iter().any(|&a| a > 0));
		assert!(ages.iter().all(|&a| a < config.lifetime.max));
	}

	#[test]
	fn test_life_envelope_fades_in_and_out() {
		assert_eq!(life_envelope(0.0), 0.0);
		assert_eq!(life_envelope(0.5), 1.0);
		assert_eq!(life_envelope(1.0), 0.0);
		assert!(life_envelope(0.05) > 0.0 && life_envelope(0.05) < 1.0);
		assert!(life_envelope(0.9) < life_envelope(0.8));
	}
}
