//! Renderer adapters.
//!
//! A renderer receives a read-only [`Scene`] once per frame and draws it.
//! It never touches simulation state. The 2D canvas renderer draws in this
//! order:
//! 1. Clear, or fade the previous frame for trail effects
//! 2. Connection lines between nearby particles
//! 3. Particles
//! 4. Lightning bolts

use std::f64::consts::PI;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::config::{EffectConfig, RenderStyle};
use super::display::Projection;
use super::lightning::Bolt;
use super::particle::{Bounds, Particle};
use super::theme::Color;

/// Everything a renderer needs for one frame.
pub struct Scene<'a> {
	pub particles: &'a [Particle],
	pub bolts: &'a [Bolt],
	pub config: &'a EffectConfig,
	pub bounds: Bounds,
	/// Elapsed simulation seconds.
	pub time: f64,
	pub projection: Projection,
}

/// Draws scenes onto some surface.
pub trait Renderer {
	/// The drawing surface changed size.
	fn resize(&mut self, width: f64, height: f64);

	/// Produces one frame.
	fn draw(&mut self, scene: &Scene<'_>);
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
	fn resize(&mut self, width: f64, height: f64) {
		(**self).resize(width, height)
	}

	fn draw(&mut self, scene: &Scene<'_>) {
		(**self).draw(scene)
	}
}

/// Opacity multiplier for twinkling particles.
pub fn twinkle(particle: &Particle, time: f64) -> f64 {
	((time * 1.5 + particle.phase).sin() * 0.5 + 0.5) * 0.4 + 0.6
}

/// Final alpha of a particle for this frame.
pub fn particle_alpha(particle: &Particle, style: &RenderStyle, intensity: f64, time: f64) -> f64 {
	let twinkle = if style.twinkle {
		twinkle(particle, time)
	} else {
		1.0
	};
	(particle.opacity * twinkle * intensity * particle.color.a).clamp(0.0, 1.0)
}

/// Alpha of the connection line between two particles `distance` apart.
pub fn link_alpha(distance: f64, max_distance: f64, base: f64) -> f64 {
	if distance >= max_distance || max_distance <= 0.0 {
		return 0.0;
	}
	(1.0 - distance / max_distance) * base
}

/// Immediate-mode 2D canvas renderer.
pub struct CanvasRenderer {
	ctx: CanvasRenderingContext2d,
	width: f64,
	height: f64,
}

impl CanvasRenderer {
	/// `None` when the canvas cannot provide a 2D context.
	pub fn new(canvas: &HtmlCanvasElement, width: f64, height: f64) -> Option<Self> {
		let ctx = canvas
			.get_context("2d")
			.ok()
			.flatten()?
			.dyn_into::<CanvasRenderingContext2d>()
			.ok()?;
		Some(Self { ctx, width, height })
	}
}

impl Renderer for CanvasRenderer {
	fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	fn draw(&mut self, scene: &Scene<'_>) {
		let style = &scene.config.style;
		draw_background(&self.ctx, style, self.width, self.height);

		if let Some(max_distance) = style.link_distance {
			draw_links(&self.ctx, scene, max_distance);
		}
		draw_particles(&self.ctx, scene);
		draw_bolts(&self.ctx, scene.bolts, scene.config.intensity);
	}
}

fn rgba(color: Color, alpha: f64) -> String {
	format!("rgba({}, {}, {}, {})", color.r, color.g, color.b, alpha)
}

fn draw_background(ctx: &CanvasRenderingContext2d, style: &RenderStyle, width: f64, height: f64) {
	match (style.trail, style.background) {
		(Some(fade), background) => {
			let base = background.unwrap_or(Color::rgb(0, 0, 0));
			ctx.set_fill_style_str(&rgba(base, fade));
			ctx.fill_rect(0.0, 0.0, width, height);
		}
		(None, Some(background)) => {
			ctx.set_fill_style_str(&background.to_css());
			ctx.fill_rect(0.0, 0.0, width, height);
		}
		(None, None) => ctx.clear_rect(0.0, 0.0, width, height),
	}
}

fn draw_links(ctx: &CanvasRenderingContext2d, scene: &Scene<'_>, max_distance: f64) {
	let style = &scene.config.style;
	let color = style.link_color;
	let base = color.a * scene.config.intensity;
	ctx.set_line_width(0.6);

	for (i, a) in scene.particles.iter().enumerate() {
		let (pa, _) = scene.projection.project(a.position);
		for b in &scene.particles[i + 1..] {
			let (pb, _) = scene.projection.project(b.position);
			let distance = pa.distance(pb);
			let alpha = link_alpha(distance, max_distance, base) * a.opacity.min(b.opacity);
			if alpha < 0.01 {
				continue;
			}
			ctx.set_stroke_style_str(&rgba(color, alpha));
			ctx.begin_path();
			ctx.move_to(pa.x, pa.y);
			ctx.line_to(pb.x, pb.y);
			ctx.stroke();
		}
	}
}

fn draw_particles(ctx: &CanvasRenderingContext2d, scene: &Scene<'_>) {
	let style = &scene.config.style;

	for p in scene.particles {
		let alpha = particle_alpha(p, style, scene.config.intensity, scene.time);
		let (screen, scale) = scene.projection.project(p.position);
		let radius = p.size * scale;
		if alpha < 0.01 || radius <= 0.0 {
			continue;
		}

		ctx.begin_path();
		let _ = ctx.arc(screen.x, screen.y, radius, 0.0, PI * 2.0);
		if style.glow {
			let Ok(gradient) =
				ctx.create_radial_gradient(screen.x, screen.y, 0.0, screen.x, screen.y, radius)
			else {
				continue;
			};
			let core = p.color.lighten(0.3);
			let _ = gradient.add_color_stop(0.0, &rgba(core, alpha));
			let _ = gradient.add_color_stop(0.5, &rgba(p.color, alpha * 0.6));
			let _ = gradient.add_color_stop(1.0, &rgba(p.color.darken(0.4), 0.0));
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		} else {
			ctx.set_fill_style_str(&rgba(p.color, alpha));
		}
		ctx.fill();
	}
}

fn draw_bolts(ctx: &CanvasRenderingContext2d, bolts: &[Bolt], intensity: f64) {
	ctx.set_line_cap("round");
	ctx.set_line_join("round");

	for bolt in bolts {
		let brightness = (bolt.brightness() * intensity).clamp(0.0, 1.0);
		if brightness < 0.01 || bolt.path.len() < 2 {
			continue;
		}

		// Wide soft glow, then a bright core.
		ctx.set_shadow_color(&rgba(bolt.color, brightness));
		ctx.set_shadow_blur(18.0 * brightness);
		ctx.set_stroke_style_str(&rgba(bolt.color, brightness * 0.35));
		ctx.set_line_width(bolt.thickness * 4.0);
		stroke_path(ctx, &bolt.path);

		ctx.set_shadow_blur(0.0);
		let core = Color::rgb(255, 255, 255).lerp(bolt.color, 0.3);
		ctx.set_stroke_style_str(&rgba(core, brightness));
		ctx.set_line_width(bolt.thickness);
		stroke_path(ctx, &bolt.path);
	}
	ctx.set_shadow_color("rgba(0, 0, 0, 0)");
}

fn stroke_path(ctx: &CanvasRenderingContext2d, path: &[glam::DVec2]) {
	let Some((first, rest)) = path.split_first() else {
		return;
	};
	ctx.begin_path();
	ctx.move_to(first.x, first.y);
	for point in rest {
		ctx.line_to(point.x, point.y);
	}
	ctx.stroke();
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use super::*;
	use crate::components::particle_effect::effect::ParticleEffect;

	#[test]
	fn test_link_alpha_falls_off_linearly() {
		assert_eq!(link_alpha(0.0, 100.0, 0.5), 0.5);
		assert_eq!(link_alpha(50.0, 100.0, 0.5), 0.25);
		assert_eq!(link_alpha(100.0, 100.0, 0.5), 0.0);
		assert_eq!(link_alpha(10.0, 0.0, 0.5), 0.0);
	}

	#[test]
	fn test_particle_alpha_is_clamped() {
		let effect = ParticleEffect::new(EffectConfig::ambient(), 800.0, 600.0, 1);
		let style = RenderStyle::default();
		for p in effect.particles() {
			let alpha = particle_alpha(p, &style, 4.0, 2.0);
			assert!((0.0..=1.0).contains(&alpha));
		}
	}

	#[test]
	fn test_twinkle_range() {
		let effect = ParticleEffect::new(EffectConfig::ambient(), 800.0, 600.0, 2);
		for p in effect.particles() {
			for step in 0..20 {
				let t = twinkle(p, step as f64 * 0.37);
				assert!((0.6 - 1e-12..=1.0 + 1e-12).contains(&t));
			}
		}
	}

	struct Counting<'a>(&'a Cell<usize>);

	impl Renderer for Counting<'_> {
		fn resize(&mut self, _: f64, _: f64) {}

		fn draw(&mut self, scene: &Scene<'_>) {
			self.0.set(self.0.get() + scene.particles.len());
		}
	}

	#[test]
	fn test_boxed_renderer_forwards() {
		let drawn = Cell::new(0);
		let effect = ParticleEffect::new(EffectConfig::ambient(), 800.0, 600.0, 3);
		let mut boxed: Box<dyn Renderer + '_> = Box::new(Counting(&drawn));
		boxed.draw(&effect.scene());
		assert_eq!(drawn.get(), 90);
	}
}
