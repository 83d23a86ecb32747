//! Colors and palettes for backdrop effects.

use serde::Deserialize;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * (1.0 - t) + other.r as f64 * t) as u8,
			g: (self.g as f64 * (1.0 - t) + other.g as f64 * t) as u8,
			b: (self.b as f64 * (1.0 - t) + other.b as f64 * t) as u8,
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Normalized `[r, g, b, a]` for GPU vertex attributes.
	pub fn to_unit(self) -> [f32; 4] {
		[
			self.r as f32 / 255.0,
			self.g as f32 / 255.0,
			self.b as f32 / 255.0,
			self.a as f32,
		]
	}
}

impl TryFrom<String> for Color {
	type Error = String;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		parse_color(&value).ok_or_else(|| format!("unrecognized color `{value}`"))
	}
}

/// Parses a CSS color string into a [`Color`].
/// Supports hex (`#RRGGBB`) and `rgb()`/`rgba()` functional notation.
pub fn parse_color(color_str: &str) -> Option<Color> {
	let color_str = color_str.trim();
	if let Some(hex) = color_str.strip_prefix('#') {
		if hex.len() != 6 || !hex.is_ascii() {
			return None;
		}
		let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
		let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
		let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
		Some(Color::rgb(r, g, b))
	} else if color_str.starts_with("rgb") {
		let nums: Vec<&str> = color_str
			.trim_start_matches("rgba(")
			.trim_start_matches("rgb(")
			.trim_end_matches(')')
			.split(',')
			.collect();
		let r = nums.first()?.trim().parse().ok()?;
		let g = nums.get(1)?.trim().parse().ok()?;
		let b = nums.get(2)?.trim().parse().ok()?;
		let a = nums
			.get(3)
			.and_then(|s| s.trim().parse().ok())
			.unwrap_or(1.0_f64)
			.clamp(0.0, 1.0);
		Some(Color::rgba(r, g, b, a))
	} else {
		None
	}
}

/// A set of colors particles sample from on (re)spawn.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Palette {
	pub colors: Vec<Color>,
}

impl Palette {
	/// Journal navy and gold, used by the ambient constellation backdrop.
	pub fn journal() -> Self {
		Self {
			colors: vec![
				Color::rgb(148, 170, 214), // Periwinkle
				Color::rgb(212, 175, 95),  // Old gold
				Color::rgb(190, 200, 225), // Mist
				Color::rgb(120, 145, 200), // Cornflower
			],
		}
	}

	/// Sandy browns and greys for drifting dust.
	pub fn dust() -> Self {
		Self {
			colors: vec![
				Color::rgb(194, 178, 128), // Sand
				Color::rgb(160, 145, 120), // Taupe
				Color::rgb(210, 200, 180), // Bone
				Color::rgb(140, 135, 130), // Ash
			],
		}
	}

	/// Soft greys for smoke plumes.
	pub fn smoke() -> Self {
		Self {
			colors: vec![
				Color::rgba(180, 180, 190, 0.6),
				Color::rgba(150, 150, 160, 0.6),
				Color::rgba(200, 200, 205, 0.5),
			],
		}
	}

	/// Hot oranges for rising embers.
	pub fn ember() -> Self {
		Self {
			colors: vec![
				Color::rgb(255, 140, 50),  // Flame
				Color::rgb(255, 190, 90),  // Amber
				Color::rgb(230, 90, 40),   // Rust
				Color::rgb(255, 220, 150), // Spark
			],
		}
	}

	/// Electric blues and violets for lightning.
	pub fn storm() -> Self {
		Self {
			colors: vec![
				Color::rgb(180, 210, 255), // Ice
				Color::rgb(140, 160, 255), // Electric blue
				Color::rgb(200, 170, 255), // Lilac
			],
		}
	}

	/// Cool-to-hot activation colors for the brain scan visualization.
	pub fn scan() -> Self {
		Self {
			colors: vec![
				Color::rgb(70, 110, 200),  // Resting
				Color::rgb(90, 200, 220),  // Cyan
				Color::rgb(250, 200, 80),  // Active
				Color::rgb(240, 100, 70),  // Hot
			],
		}
	}

	/// Color at `index`, wrapping around. An empty palette yields white.
	pub fn get(&self, index: usize) -> Color {
		if self.colors.is_empty() {
			return Color::rgb(255, 255, 255);
		}
		self.colors[index % self.colors.len()]
	}

	pub fn len(&self) -> usize {
		self.colors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::journal()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_hex_and_functional_colors() {
		assert_eq!(parse_color("#ff8000"), Some(Color::rgb(255, 128, 0)));
		assert_eq!(
			parse_color("rgba(10, 20, 30, 0.5)"),
			Some(Color::rgba(10, 20, 30, 0.5))
		);
		assert_eq!(parse_color("rgb(1,2,3)"), Some(Color::rgb(1, 2, 3)));
		assert_eq!(parse_color("cornflowerblue"), None);
		assert_eq!(parse_color("#12345"), None);
	}

	#[test]
	fn test_parse_rejects_non_ascii_hex() {
		// Seven bytes, but the slices would split multi-byte characters.
		assert_eq!("#aé€".len(), 7);
		assert_eq!(parse_color("#aé€"), None);
		assert_eq!(parse_color("#ffffé"), None);
		assert!(serde_json::from_str::<Color>(r##""#aé€""##).is_err());
	}

	#[test]
	fn test_color_deserializes_from_css_string() {
		let palette: Palette = serde_json::from_str(r##"["#000000", "rgb(255, 255, 255)"]"##).unwrap();
		assert_eq!(palette.len(), 2);
		assert_eq!(palette.get(3), Color::rgb(255, 255, 255));
		assert!(serde_json::from_str::<Color>(r#""nope""#).is_err());
	}

	#[test]
	fn test_empty_palette_falls_back_to_white() {
		let palette = Palette { colors: Vec::new() };
		assert_eq!(palette.get(7), Color::rgb(255, 255, 255));
	}

	#[test]
	fn test_css_output() {
		assert_eq!(Color::rgb(255, 0, 16).to_css(), "#ff0010");
		assert_eq!(
			Color::rgba(1, 2, 3, 0.25).to_css(),
			"rgba(1, 2, 3, 0.25)"
		);
		assert_eq!(Color::rgb(0, 0, 0).lighten(1.0), Color::rgb(255, 255, 255));
		assert_eq!(Color::rgb(200, 100, 50).darken(0.5), Color::rgb(100, 50, 25));
		assert_eq!(Color::rgb(9, 9, 9).darken(1.0), Color::rgb(0, 0, 0));
	}
}
