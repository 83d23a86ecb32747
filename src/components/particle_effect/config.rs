//! Effect configuration and built-in presets.
//!
//! Every backdrop is described by one [`EffectConfig`]. Configs deserialize
//! from JSON with every field optional (missing fields come from the
//! `ambient` preset), or from a bare preset name such as `"smoke"`.
//! Values are never trusted: [`EffectConfig::sanitized`] clamps anything that
//! could break the simulation, because a decorative background must never
//! take the page down.

use rand::Rng;
use serde::Deserialize;

use super::forces::{ForceParams, ForceToggles, PointerMode};
use super::integrator::Boundary;
use super::particle::Material;
use super::theme::{Color, Palette};

/// Hard ceiling on particles per effect instance.
pub const MAX_PARTICLES: usize = 5_000;

/// Hard ceiling on lightning bolts per effect instance.
pub const MAX_BOLTS: usize = 32;

/// Inclusive range of tick counts, sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct TickRange {
	pub min: u32,
	pub max: u32,
}

impl TickRange {
	pub const fn new(min: u32, max: u32) -> Self {
		Self { min, max }
	}

	pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
		let (lo, hi) = (self.min.min(self.max), self.min.max(self.max));
		rng.gen_range(lo..=hi)
	}

	pub fn contains(&self, value: u32) -> bool {
		(self.min..=self.max).contains(&value)
	}

	/// Ordered, with both ends at least one tick.
	fn sanitized(self) -> Self {
		let lo = self.min.min(self.max).max(1);
		let hi = self.min.max(self.max).max(lo);
		Self { min: lo, max: hi }
	}
}

/// Inclusive range of real values, sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Span {
	pub min: f64,
	pub max: f64,
}

impl Span {
	pub const fn new(min: f64, max: f64) -> Self {
		Self { min, max }
	}

	pub const fn fixed(value: f64) -> Self {
		Self {
			min: value,
			max: value,
		}
	}

	pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
		if self.max <= self.min {
			return self.min;
		}
		rng.gen_range(self.min..=self.max)
	}

	pub fn contains(&self, value: f64) -> bool {
		value >= self.min && value <= self.max
	}

	fn sanitized(self, floor: f64, fallback: Span) -> Self {
		if !self.min.is_finite() || !self.max.is_finite() {
			return fallback;
		}
		let lo = self.min.min(self.max).max(floor);
		let hi = self.min.max(self.max).max(lo);
		Self { min: lo, max: hi }
	}
}

/// Where fresh particles appear.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emission {
	/// Anywhere in the viewport, heading in a random direction.
	Uniform,
	/// Just below the bottom edge, heading up.
	Bottom,
	/// Just above the top edge, heading down.
	Top,
	/// On a random viewport edge, heading inward.
	Edges,
	/// Inside an ellipsoid shell centred on the viewport. Radii are fractions
	/// of the smaller viewport dimension.
	Ellipsoid { radii: [f64; 3] },
}

/// Size over a particle's life, as a multiplier of its base size.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeCurve {
	Constant,
	/// Grows linearly to `factor` times the base size at end of life.
	Grow(f64),
	/// Shrinks towards a tenth of the base size.
	Shrink,
}

impl SizeCurve {
	/// Multiplier at life fraction `t` in `[0, 1]`.
	pub fn factor(self, t: f64) -> f64 {
		let t = t.clamp(0.0, 1.0);
		match self {
			SizeCurve::Constant => 1.0,
			SizeCurve::Grow(factor) => 1.0 + (factor - 1.0) * t,
			SizeCurve::Shrink => (1.0 - t).max(0.1),
		}
	}
}

/// Which drawing backend a backdrop prefers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererKind {
	#[default]
	Canvas,
	Webgl,
}

/// Lightning bolt configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LightningConfig {
	/// Number of independent bolts.
	pub bolts: usize,
	/// Ticks a bolt stays hidden between strikes.
	pub dormant: TickRange,
	/// Ticks a strike stays on screen.
	pub visible: TickRange,
	/// Path segments per bolt.
	pub segments: usize,
	/// Bolt length as a fraction of the smaller viewport dimension.
	pub length: Span,
	/// Amplitude of the smooth wave term, in pixels.
	pub wave: f64,
	/// Maximum random perpendicular offset per vertex, in pixels.
	pub jitter: f64,
	/// Stroke width in pixels.
	pub thickness: Span,
}

impl Default for LightningConfig {
	fn default() -> Self {
		Self {
			bolts: 3,
			dormant: TickRange::new(90, 300),
			visible: TickRange::new(6, 18),
			segments: 24,
			length: Span::new(0.4, 0.9),
			wave: 18.0,
			jitter: 14.0,
			thickness: Span::new(1.0, 2.5),
		}
	}
}

impl LightningConfig {
	fn sanitized(mut self) -> Self {
		self.bolts = self.bolts.min(MAX_BOLTS);
		self.dormant = self.dormant.sanitized();
		self.visible = self.visible.sanitized();
		self.segments = self.segments.clamp(1, 256);
		self.length = self.length.sanitized(0.0, Span::new(0.4, 0.9));
		self.wave = finite_or(self.wave, 0.0).abs();
		self.jitter = finite_or(self.jitter, 0.0).abs();
		self.thickness = self.thickness.sanitized(0.1, Span::new(1.0, 2.5));
		self
	}
}

/// Presentation settings read by renderers only.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderStyle {
	/// Solid backdrop color. `None` keeps the canvas transparent.
	pub background: Option<Color>,
	/// Alpha of the per-frame fade rectangle. `None` clears fully each frame;
	/// a low value leaves motion trails.
	pub trail: Option<f64>,
	/// Draw connection lines between particles closer than this, in pixels.
	pub link_distance: Option<f64>,
	pub link_color: Color,
	/// Soft radial-gradient particles instead of flat discs.
	pub glow: bool,
	/// Sinusoidal opacity modulation per particle.
	pub twinkle: bool,
	/// Yaw rate in radians per second for 3D emission shapes.
	pub spin: f64,
}

impl Default for RenderStyle {
	fn default() -> Self {
		Self {
			background: None,
			trail: None,
			link_distance: None,
			link_color: Color::rgba(148, 170, 214, 0.35),
			glow: true,
			twinkle: false,
			spin: 0.0,
		}
	}
}

/// Live-adjustable subset of an [`EffectConfig`].
///
/// Applied values take effect on the next frame. Per-particle constants are
/// not part of a tuning; they change as particles respawn.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tuning {
	pub speed: Option<f64>,
	pub intensity: Option<f64>,
	pub forces: Option<ForceToggles>,
	pub params: Option<ForceParams>,
	pub pointer_mode: Option<PointerMode>,
}

/// Full description of one backdrop effect.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EffectConfig {
	pub name: String,
	/// Requested particle count. Negative values mean no particles.
	pub count: i64,
	pub emission: Emission,
	pub boundary: Boundary,
	/// Distance outside the viewport, in pixels, before a particle counts as
	/// out of bounds.
	pub margin: f64,
	/// Particle lifetime in ticks.
	pub lifetime: TickRange,
	/// Initial speed in pixels per tick.
	pub velocity: Span,
	/// Simulation time scale.
	pub speed: f64,
	/// Brightness multiplier applied by renderers.
	pub intensity: f64,
	/// Base radius in pixels.
	pub size: Span,
	pub size_curve: SizeCurve,
	pub opacity: Span,
	pub palette: Palette,
	/// Material table sampled per particle. Empty means the default material.
	pub materials: Vec<Material>,
	pub temperature: Span,
	pub charge: Span,
	pub forces: ForceToggles,
	pub params: ForceParams,
	pub pointer_mode: PointerMode,
	pub lightning: Option<LightningConfig>,
	pub style: RenderStyle,
	pub renderer: RendererKind,
	/// Stacking order of the backdrop canvas.
	pub z_index: i32,
	/// Fixed RNG seed. `None` seeds from the browser at mount.
	pub seed: Option<u64>,
}

impl Default for EffectConfig {
	fn default() -> Self {
		Self::ambient()
	}
}

impl EffectConfig {
	/// Floating constellation: wrap-around particles linked by faint lines,
	/// pushed away by a close pointer and drawn in from further out.
	pub fn ambient() -> Self {
		Self {
			name: "ambient".into(),
			count: 90,
			emission: Emission::Uniform,
			boundary: Boundary::Wrap,
			margin: 10.0,
			lifetime: TickRange::new(600, 1800),
			velocity: Span::new(0.1, 0.45),
			speed: 1.0,
			intensity: 1.0,
			size: Span::new(1.0, 2.6),
			size_curve: SizeCurve::Constant,
			opacity: Span::new(0.35, 0.9),
			palette: Palette::journal(),
			materials: Vec::new(),
			temperature: Span::fixed(0.0),
			charge: Span::fixed(0.0),
			forces: ForceToggles {
				turbulence: true,
				pointer: true,
				..ForceToggles::default()
			},
			params: ForceParams {
				turbulence: 0.004,
				pointer_radius: 160.0,
				pointer_strength: 0.25,
				damping: 0.995,
				..ForceParams::default()
			},
			pointer_mode: PointerMode::RepelThenAttract { crossover: 60.0 },
			lightning: None,
			style: RenderStyle {
				link_distance: Some(110.0),
				twinkle: true,
				..RenderStyle::default()
			},
			renderer: RendererKind::Canvas,
			z_index: -1,
			seed: None,
		}
	}

	/// Dust simulator: falling grains of several materials bouncing off the
	/// viewport edges, scattered by the pointer.
	pub fn dust() -> Self {
		Self {
			name: "dust".into(),
			count: 220,
			emission: Emission::Bottom,
			boundary: Boundary::Reflect,
			margin: 20.0,
			lifetime: TickRange::new(900, 2400),
			velocity: Span::new(1.0, 4.0),
			size: Span::new(0.8, 2.2),
			opacity: Span::new(0.3, 0.75),
			palette: Palette::dust(),
			materials: vec![
				Material::new(2.6, 0.020, 0.35), // sand
				Material::new(0.3, 0.080, 0.70), // pollen
				Material::new(0.8, 0.050, 0.20), // ash
			],
			charge: Span::new(-1.0, 1.0),
			forces: ForceToggles {
				gravity: true,
				drag: true,
				turbulence: true,
				pointer: true,
				..ForceToggles::default()
			},
			params: ForceParams {
				gravity: 0.02,
				turbulence: 0.01,
				pointer_radius: 120.0,
				pointer_strength: 0.8,
				magnetic_field: 0.02,
				damping: 0.998,
				..ForceParams::default()
			},
			pointer_mode: PointerMode::Repel,
			style: RenderStyle {
				glow: false,
				..RenderStyle::default()
			},
			..Self::ambient()
		}
	}

	/// Smoke: warm puffs rising from the bottom edge, cooling as they go and
	/// growing while they fade. Drawn with trails.
	pub fn smoke() -> Self {
		Self {
			name: "smoke".into(),
			count: 140,
			emission: Emission::Bottom,
			boundary: Boundary::Respawn,
			margin: 80.0,
			lifetime: TickRange::new(240, 520),
			velocity: Span::new(0.2, 0.8),
			size: Span::new(14.0, 30.0),
			size_curve: SizeCurve::Grow(3.0),
			opacity: Span::new(0.05, 0.16),
			palette: Palette::smoke(),
			materials: vec![Material::new(0.2, 0.03, 0.0)],
			temperature: Span::new(40.0, 90.0),
			forces: ForceToggles {
				drag: true,
				turbulence: true,
				buoyancy: true,
				pointer: true,
				..ForceToggles::default()
			},
			params: ForceParams {
				turbulence: 0.02,
				buoyancy: 0.0012,
				ambient_temperature: 20.0,
				thermal_decay: 0.006,
				pointer_radius: 140.0,
				pointer_strength: 0.3,
				damping: 0.99,
				..ForceParams::default()
			},
			pointer_mode: PointerMode::Repel,
			style: RenderStyle {
				trail: Some(0.12),
				background: Some(Color::rgb(14, 16, 24)),
				..RenderStyle::default()
			},
			..Self::ambient()
		}
	}

	/// Embers: small hot sparks shooting up and shrinking out.
	pub fn embers() -> Self {
		Self {
			name: "embers".into(),
			count: 160,
			size: Span::new(0.8, 2.4),
			size_curve: SizeCurve::Shrink,
			opacity: Span::new(0.5, 1.0),
			velocity: Span::new(0.8, 2.2),
			lifetime: TickRange::new(120, 320),
			palette: Palette::ember(),
			temperature: Span::new(80.0, 160.0),
			charge: Span::new(-1.0, 1.0),
			forces: ForceToggles {
				drag: true,
				turbulence: true,
				buoyancy: true,
				magnetism: true,
				..ForceToggles::default()
			},
			params: ForceParams {
				turbulence: 0.03,
				buoyancy: 0.0006,
				ambient_temperature: 20.0,
				thermal_decay: 0.01,
				magnetic_field: 0.01,
				damping: 0.99,
				..ForceParams::default()
			},
			style: RenderStyle {
				trail: Some(0.2),
				background: Some(Color::rgb(18, 12, 10)),
				..RenderStyle::default()
			},
			..Self::smoke()
		}
	}

	/// Lightning: a few bolts striking in from the viewport edges over a
	/// sparse field of drifting sparks.
	pub fn lightning() -> Self {
		Self {
			name: "lightning".into(),
			count: 40,
			emission: Emission::Edges,
			boundary: Boundary::Respawn,
			margin: 20.0,
			velocity: Span::new(0.3, 1.2),
			palette: Palette::storm(),
			lightning: Some(LightningConfig::default()),
			forces: ForceToggles {
				turbulence: true,
				..ForceToggles::default()
			},
			style: RenderStyle {
				trail: Some(0.25),
				background: Some(Color::rgb(8, 10, 22)),
				..RenderStyle::default()
			},
			..Self::ambient()
		}
	}

	/// Brain scan: a slowly turning 3D cloud of points tethered inside an
	/// ellipsoid, flickering like activation in an fMRI image.
	pub fn brain() -> Self {
		Self {
			name: "brain".into(),
			count: 1_200,
			emission: Emission::Ellipsoid {
				radii: [0.42, 0.32, 0.36],
			},
			boundary: Boundary::Wrap,
			margin: 200.0,
			lifetime: TickRange::new(300, 900),
			velocity: Span::new(0.0, 0.2),
			size: Span::new(0.8, 2.0),
			opacity: Span::new(0.4, 0.95),
			palette: Palette::scan(),
			forces: ForceToggles {
				turbulence: true,
				tether: true,
				pointer: true,
				..ForceToggles::default()
			},
			params: ForceParams {
				turbulence: 0.02,
				tether: 0.01,
				pointer_radius: 150.0,
				pointer_strength: 0.4,
				damping: 0.95,
				..ForceParams::default()
			},
			pointer_mode: PointerMode::Repel,
			style: RenderStyle {
				twinkle: true,
				spin: 0.15,
				..RenderStyle::default()
			},
			renderer: RendererKind::Webgl,
			..Self::ambient()
		}
	}

	/// Looks up a built-in preset by name.
	pub fn preset(name: &str) -> Option<Self> {
		match name {
			"ambient" => Some(Self::ambient()),
			"dust" => Some(Self::dust()),
			"smoke" => Some(Self::smoke()),
			"embers" => Some(Self::embers()),
			"lightning" => Some(Self::lightning()),
			"brain" => Some(Self::brain()),
			_ => None,
		}
	}

	/// Number of particles the effect will actually own.
	pub fn particle_count(&self) -> usize {
		self.count.clamp(0, MAX_PARTICLES as i64) as usize
	}

	/// Backend to mount with. WebGL only draws points, so lightning forces
	/// the canvas; `webgl_works` runs only when WebGL is actually wanted.
	pub fn renderer_for(&self, webgl_works: impl FnOnce() -> bool) -> RendererKind {
		if self.renderer == RendererKind::Webgl && self.lightning.is_none() && webgl_works() {
			RendererKind::Webgl
		} else {
			RendererKind::Canvas
		}
	}

	/// Copy with every numeric field forced into a usable range.
	pub fn sanitized(&self) -> Self {
		let mut config = self.clone();
		let defaults = Self::ambient();
		config.count = config.particle_count() as i64;
		config.margin = finite_or(config.margin, defaults.margin).max(0.0);
		config.lifetime = config.lifetime.sanitized();
		config.velocity = config.velocity.sanitized(0.0, defaults.velocity);
		config.speed = finite_or(config.speed, 1.0).clamp(0.0, 8.0);
		config.intensity = finite_or(config.intensity, 1.0).clamp(0.0, 4.0);
		config.size = config.size.sanitized(0.0, defaults.size);
		config.opacity = config.opacity.sanitized(0.0, defaults.opacity);
		config.opacity.max = config.opacity.max.min(1.0);
		config.opacity.min = config.opacity.min.min(config.opacity.max);
		config.temperature = config.temperature.sanitized(f64::MIN, Span::fixed(0.0));
		config.charge = config.charge.sanitized(f64::MIN, Span::fixed(0.0));
		config.materials = config.materials.iter().map(|m| m.sanitized()).collect();
		config.params = config.params.sanitized();
		if let SizeCurve::Grow(factor) = config.size_curve {
			config.size_curve = SizeCurve::Grow(finite_or(factor, 1.0).max(0.0));
		}
		if let Emission::Ellipsoid { radii } = config.emission {
			config.emission = Emission::Ellipsoid {
				radii: radii.map(|r| finite_or(r, 0.3).abs()),
			};
		}
		config.lightning = config.lightning.map(LightningConfig::sanitized);
		config.style.trail = config
			.style
			.trail
			.filter(|t| t.is_finite())
			.map(|t| t.clamp(0.0, 1.0));
		config.style.link_distance = config
			.style
			.link_distance
			.filter(|d| d.is_finite() && *d > 0.0);
		config.style.spin = finite_or(config.style.spin, 0.0);
		config
	}

	/// Applies a live tuning. See [`Tuning`] for what it can change.
	pub fn apply(&mut self, tuning: &Tuning) {
		if let Some(speed) = tuning.speed {
			self.speed = finite_or(speed, self.speed).clamp(0.0, 8.0);
		}
		if let Some(intensity) = tuning.intensity {
			self.intensity = finite_or(intensity, self.intensity).clamp(0.0, 4.0);
		}
		if let Some(forces) = tuning.forces {
			self.forces = forces;
		}
		if let Some(params) = tuning.params {
			self.params = params.sanitized();
		}
		if let Some(mode) = tuning.pointer_mode {
			self.pointer_mode = mode;
		}
	}
}

/// A config as written in the page: a preset name or a full object.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum ConfigSource {
	Preset(String),
	Full(Box<EffectConfig>),
}

impl ConfigSource {
	fn resolve(self) -> Option<EffectConfig> {
		match self {
			ConfigSource::Preset(name) => {
				let preset = EffectConfig::preset(&name);
				if preset.is_none() {
					log::warn!("journal-backdrop: unknown preset `{name}`");
				}
				preset
			}
			ConfigSource::Full(config) => Some(*config),
		}
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ConfigList {
	Many(Vec<ConfigSource>),
	One(ConfigSource),
}

/// Parses the page's backdrop declaration: one config or a list of them.
/// Unknown preset names are skipped.
pub fn parse_backdrops(json: &str) -> Result<Vec<EffectConfig>, serde_json::Error> {
	let sources = match serde_json::from_str::<ConfigList>(json)? {
		ConfigList::Many(sources) => sources,
		ConfigList::One(source) => vec![source],
	};
	Ok(sources
		.into_iter()
		.filter_map(ConfigSource::resolve)
		.collect())
}

pub(crate) fn finite_or(value: f64, fallback: f64) -> f64 {
	if value.is_finite() { value } else { fallback }
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	#[test]
	fn test_renderer_falls_back_to_canvas() {
		let brain = EffectConfig::brain();
		assert_eq!(brain.renderer, RendererKind::Webgl);
		assert_eq!(brain.renderer_for(|| true), RendererKind::Webgl);
		assert_eq!(brain.renderer_for(|| false), RendererKind::Canvas);

		let storm = EffectConfig {
			renderer: RendererKind::Webgl,
			..EffectConfig::lightning()
		};
		assert_eq!(
			storm.renderer_for(|| panic!("lightning never checks WebGL")),
			RendererKind::Canvas
		);
		assert_eq!(
			EffectConfig::ambient().renderer_for(|| panic!("canvas never checks WebGL")),
			RendererKind::Canvas
		);
	}

	#[test]
	fn test_negative_count_clamps_to_zero() {
		let config = EffectConfig {
			count: -25,
			..EffectConfig::ambient()
		};
		assert_eq!(config.particle_count(), 0);
		assert_eq!(config.sanitized().count, 0);
	}

	#[test]
	fn test_huge_count_clamps_to_ceiling() {
		let config = EffectConfig {
			count: i64::MAX,
			..EffectConfig::ambient()
		};
		assert_eq!(config.particle_count(), MAX_PARTICLES);
	}

	#[test]
	fn test_sanitize_orders_ranges_and_clamps_scalars() {
		let config = EffectConfig {
			lifetime: TickRange::new(50, 0),
			size: Span::new(4.0, -2.0),
			speed: f64::NAN,
			intensity: 99.0,
			margin: -5.0,
			..EffectConfig::ambient()
		}
		.sanitized();
		assert_eq!(config.lifetime, TickRange::new(1, 50));
		assert_eq!(config.size, Span::new(0.0, 4.0));
		assert_eq!(config.speed, 1.0);
		assert_eq!(config.intensity, 4.0);
		assert_eq!(config.margin, 0.0);
	}

	#[test]
	fn test_tick_range_sampling_stays_in_bounds() {
		let mut rng = SmallRng::seed_from_u64(7);
		let range = TickRange::new(10, 20);
		for _ in 0..500 {
			assert!(range.contains(range.sample(&mut rng)));
		}
		assert_eq!(TickRange::new(5, 5).sample(&mut rng), 5);
	}

	#[test]
	fn test_size_curves() {
		assert_eq!(SizeCurve::Constant.factor(0.7), 1.0);
		assert_eq!(SizeCurve::Grow(3.0).factor(1.0), 3.0);
		assert_eq!(SizeCurve::Grow(3.0).factor(0.0), 1.0);
		assert!((SizeCurve::Shrink.factor(1.0) - 0.1).abs() < 1e-12);
	}

	#[test]
	fn test_every_preset_resolves_by_name() {
		for name in ["ambient", "dust", "smoke", "embers", "lightning", "brain"] {
			let config = EffectConfig::preset(name).unwrap();
			assert_eq!(config.name, name);
			assert_eq!(config.sanitized(), config.sanitized().sanitized());
		}
		assert!(EffectConfig::preset("fireworks").is_none());
	}

	#[test]
	fn test_parse_single_preset_and_partial_object() {
		let configs = parse_backdrops(r#""smoke""#).unwrap();
		assert_eq!(configs.len(), 1);
		assert_eq!(configs[0].name, "smoke");

		let configs = parse_backdrops(
			r##"[{"name": "custom", "count": -3, "palette": ["#102030"], "zIndex": 4}, "dust", "nope"]"##,
		)
		.unwrap();
		assert_eq!(configs.len(), 2);
		assert_eq!(configs[0].name, "custom");
		assert_eq!(configs[0].particle_count(), 0);
		assert_eq!(configs[0].z_index, 4);
		assert_eq!(configs[0].palette.get(0), Color::rgb(16, 32, 48));
		// Unspecified fields come from the ambient preset.
		assert_eq!(configs[0].boundary, Boundary::Wrap);
		assert_eq!(configs[1].name, "dust");
	}

	#[test]
	fn test_parse_tagged_enums() {
		let configs = parse_backdrops(
			r#"{"emission": {"ellipsoid": {"radii": [0.1, 0.2, 0.3]}}, "sizeCurve": {"grow": 2.0}, "pointerMode": {"repel_then_attract": {"crossover": 40.0}}, "boundary": "reflect"}"#,
		)
		.unwrap();
		let config = &configs[0];
		assert_eq!(
			config.emission,
			Emission::Ellipsoid {
				radii: [0.1, 0.2, 0.3]
			}
		);
		assert_eq!(config.size_curve, SizeCurve::Grow(2.0));
		assert_eq!(
			config.pointer_mode,
			PointerMode::RepelThenAttract { crossover: 40.0 }
		);
		assert_eq!(config.boundary, Boundary::Reflect);
	}

	#[test]
	fn test_malformed_json_is_an_error() {
		assert!(parse_backdrops("{not json").is_err());
	}

	#[test]
	fn test_tuning_changes_globals_only() {
		let mut config = EffectConfig::dust();
		let materials = config.materials.clone();
		config.apply(&Tuning {
			speed: Some(2.0),
			intensity: Some(-1.0),
			forces: Some(ForceToggles::default()),
			..Tuning::default()
		});
		assert_eq!(config.speed, 2.0);
		assert_eq!(config.intensity, 0.0);
		assert_eq!(config.forces, ForceToggles::default());
		assert_eq!(config.materials, materials);
	}
}
