//! Retained display list shared by the renderers.
//!
//! Simulation state is projected into flat `f32` arrays that are sized once
//! for the effect's fixed particle count and rewritten in place every frame.

use glam::{DVec2, DVec3};

use super::config::RenderStyle;
use super::particle::{Bounds, Particle};
use super::render::particle_alpha;

/// Camera for turning particle positions into screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
	/// Screen coordinates are the particle's `x` and `y`.
	Flat,
	/// Rotate about the vertical axis through `center`, then apply a
	/// perspective divide with focal length `focal`.
	Orbit { center: DVec3, yaw: f64, focal: f64 },
}

impl Projection {
	/// Orbit camera around the viewport center.
	pub fn orbit(bounds: &Bounds, yaw: f64) -> Self {
		Projection::Orbit {
			center: bounds.center(),
			yaw,
			focal: bounds.width.max(bounds.height).max(1.0),
		}
	}

	/// Screen position and size scale of `position`.
	pub fn project(&self, position: DVec3) -> (DVec2, f64) {
		match *self {
			Projection::Flat => (position.truncate(), 1.0),
			Projection::Orbit { center, yaw, focal } => {
				let rel = position - center;
				let (sin, cos) = yaw.sin_cos();
				let x = rel.x * cos - rel.z * sin;
				let z = rel.x * sin + rel.z * cos;
				let scale = focal / (focal + z).max(focal * 0.1);
				(center.truncate() + DVec2::new(x, rel.y) * scale, scale)
			}
		}
	}
}

/// Per-point vertex data: screen position, radius and RGBA color.
#[derive(Debug)]
pub struct PointBuffer {
	positions: Vec<f32>,
	sizes: Vec<f32>,
	colors: Vec<f32>,
	len: usize,
}

impl PointBuffer {
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			positions: vec![0.0; capacity * 2],
			sizes: vec![0.0; capacity],
			colors: vec![0.0; capacity * 4],
			len: 0,
		}
	}

	pub fn capacity(&self) -> usize {
		self.sizes.len()
	}

	/// Points written by the last [`PointBuffer::fill`].
	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Rewrites the buffer from `particles` as they look at `time`. Particles
	/// beyond the capacity are ignored; the buffer never grows.
	pub fn fill(
		&mut self,
		particles: &[Particle],
		projection: &Projection,
		style: &RenderStyle,
		intensity: f64,
		time: f64,
	) -> usize {
		let count = particles.len().min(self.capacity());
		for (i, particle) in particles.iter().take(count).enumerate() {
			let (screen, scale) = projection.project(particle.position);
			self.positions[i * 2] = screen.x as f32;
			self.positions[i * 2 + 1] = screen.y as f32;
			self.sizes[i] = (particle.size * scale) as f32;
			let [r, g, b, _] = particle.color.to_unit();
			let alpha = particle_alpha(particle, style, intensity, time) as f32;
			self.colors[i * 4..i * 4 + 4].copy_from_slice(&[r, g, b, alpha]);
		}
		self.len = count;
		count
	}

	/// Full-capacity position array, `[x0, y0, x1, y1, ..]`.
	pub fn positions(&self) -> &[f32] {
		&self.positions
	}

	pub fn sizes(&self) -> &[f32] {
		&self.sizes
	}

	/// Full-capacity color array, `[r0, g0, b0, a0, ..]` in `[0, 1]`.
	pub fn colors(&self) -> &[f32] {
		&self.colors
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;
	use crate::components::particle_effect::config::EffectConfig;
	use crate::components::particle_effect::render::twinkle;

	fn steady() -> RenderStyle {
		RenderStyle {
			twinkle: false,
			..EffectConfig::ambient().style
		}
	}

	fn particles(n: usize) -> Vec<Particle> {
		let config = EffectConfig::ambient();
		let bounds = Bounds::new(640.0, 480.0);
		let mut rng = SmallRng::seed_from_u64(31);
		(0..n)
			.map(|i| Particle::spawn_staggered(i, &config, &bounds, &mut rng))
			.collect()
	}

	#[test]
	fn test_fill_never_reallocates() {
		let particles = particles(64);
		let mut buffer = PointBuffer::with_capacity(64);
		let ptrs = (
			buffer.positions().as_ptr(),
			buffer.sizes().as_ptr(),
			buffer.colors().as_ptr(),
		);
		for _ in 0..10 {
			assert_eq!(buffer.fill(&particles, &Projection::Flat, &steady(), 1.0, 0.0), 64);
		}
		assert_eq!(buffer.positions().as_ptr(), ptrs.0);
		assert_eq!(buffer.sizes().as_ptr(), ptrs.1);
		assert_eq!(buffer.colors().as_ptr(), ptrs.2);
		assert_eq!(buffer.positions().len(), 128);
	}

	#[test]
	fn test_fill_truncates_to_capacity() {
		let particles = particles(10);
		let mut buffer = PointBuffer::with_capacity(4);
		assert_eq!(buffer.fill(&particles, &Projection::Flat, &steady(), 1.0, 0.0), 4);
		assert_eq!(buffer.len(), 4);
		assert_eq!(buffer.positions()[2], particles[1].position.x as f32);
	}

	#[test]
	fn test_fill_copies_appearance() {
		let particles = particles(3);
		let mut buffer = PointBuffer::with_capacity(3);
		buffer.fill(&particles, &Projection::Flat, &steady(), 0.5, 0.0);
		let p = &particles[2];
		assert_eq!(buffer.sizes()[2], p.size as f32);
		let expected_alpha = (p.opacity * 0.5 * p.color.a) as f32;
		assert!((buffer.colors()[11] - expected_alpha).abs() < 1e-6);
	}

	#[test]
	fn test_fill_twinkles_over_time() {
		let mut particles = particles(1);
		particles[0].opacity = 0.8;
		let p = &particles[0];
		let style = RenderStyle {
			twinkle: true,
			..steady()
		};
		let mut buffer = PointBuffer::with_capacity(1);

		// Half a twinkle period apart: one peak, one trough.
		let peak = (std::f64::consts::FRAC_PI_2 - p.phase) / 1.5;
		let trough = peak + std::f64::consts::PI / 1.5;
		assert!((twinkle(p, peak) - 1.0).abs() < 1e-9);
		assert!((twinkle(p, trough) - 0.6).abs() < 1e-9);

		buffer.fill(&particles, &Projection::Flat, &style, 1.0, peak);
		let bright = buffer.colors()[3];
		buffer.fill(&particles, &Projection::Flat, &style, 1.0, trough);
		let dim = buffer.colors()[3];
		assert!(dim < bright);
		assert!((dim / bright - 0.6).abs() < 1e-3);

		buffer.fill(&particles, &Projection::Flat, &steady(), 1.0, peak);
		let steady_peak = buffer.colors()[3];
		buffer.fill(&particles, &Projection::Flat, &steady(), 1.0, trough);
		assert_eq!(buffer.colors()[3], steady_peak);
	}

	#[test]
	fn test_orbit_projection() {
		let bounds = Bounds::new(800.0, 600.0);
		let center = bounds.center();
		let projection = Projection::orbit(&bounds, 0.0);
		let (screen, scale) = projection.project(center);
		assert_eq!(screen, center.truncate());
		assert_eq!(scale, 1.0);

		// A quarter turn moves a point on the x axis onto the depth axis,
		// where it shrinks with distance.
		let turned = Projection::orbit(&bounds, std::f64::consts::FRAC_PI_2);
		let (screen, scale) = turned.project(center + DVec3::new(100.0, 0.0, 0.0));
		assert!((screen.x - center.x).abs() < 1e-9);
		assert!(scale < 1.0);
	}
}
