//! Frame timing.

/// Duration of one frame at the nominal 60 Hz refresh rate.
pub const NOMINAL_FRAME_SECONDS: f64 = 1.0 / 60.0;

/// Largest timestep handed to the simulation. Frames that arrive later than
/// this (a backgrounded tab, a debugger pause) are treated as slow frames
/// instead of a jump.
pub const MAX_FRAME_SECONDS: f64 = 2.0 * NOMINAL_FRAME_SECONDS;

/// Integrator ticks per simulated second.
pub const TICKS_PER_SECOND: f64 = 60.0;

/// Turns animation-frame timestamps into bounded timesteps.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
	last_ms: Option<f64>,
}

impl FrameClock {
	pub fn new() -> Self {
		Self::default()
	}

	/// Forgets the previous timestamp; the next tick is nominal.
	pub fn reset(&mut self) {
		self.last_ms = None;
	}

	/// Seconds since the previous call, in `(0, MAX_FRAME_SECONDS]`.
	///
	/// The first frame, and any timestamp that is not finite or does not move
	/// forward, yields [`NOMINAL_FRAME_SECONDS`].
	pub fn tick(&mut self, timestamp_ms: f64) -> f64 {
		if !timestamp_ms.is_finite() {
			return NOMINAL_FRAME_SECONDS;
		}
		let previous = self.last_ms.replace(timestamp_ms);
		match previous {
			Some(last) if timestamp_ms > last => {
				((timestamp_ms - last) / 1_000.0).min(MAX_FRAME_SECONDS)
			}
			_ => NOMINAL_FRAME_SECONDS,
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::rngs::SmallRng;
	use rand::{Rng, SeedableRng};

	use super::*;

	#[test]
	fn test_first_frame_is_nominal() {
		let mut clock = FrameClock::new();
		assert_eq!(clock.tick(12_345.0), NOMINAL_FRAME_SECONDS);
	}

	#[test]
	fn test_regular_frames_pass_through() {
		let mut clock = FrameClock::new();
		clock.tick(1_000.0);
		let dt = clock.tick(1_020.0);
		assert!((dt - 0.020).abs() < 1e-12);
	}

	#[test]
	fn test_backgrounded_tab_gap_is_capped() {
		let mut clock = FrameClock::new();
		clock.tick(1_000.0);
		assert_eq!(clock.tick(61_000.0), MAX_FRAME_SECONDS);
		let dt = clock.tick(61_016.0);
		assert!((dt - 0.016).abs() < 1e-12);
	}

	#[test]
	fn test_non_increasing_and_garbage_timestamps() {
		let mut clock = FrameClock::new();
		clock.tick(500.0);
		assert_eq!(clock.tick(500.0), NOMINAL_FRAME_SECONDS);
		assert_eq!(clock.tick(100.0), NOMINAL_FRAME_SECONDS);
		assert_eq!(clock.tick(f64::NAN), NOMINAL_FRAME_SECONDS);
		assert_eq!(clock.tick(f64::INFINITY), NOMINAL_FRAME_SECONDS);
	}

	#[test]
	fn test_any_sequence_stays_bounded_and_positive() {
		let mut rng = SmallRng::seed_from_u64(99);
		let mut clock = FrameClock::new();
		let mut t = 0.0;
		for _ in 0..10_000 {
			t += match rng.gen_range(0..10) {
				0 => rng.gen_range(1_000.0..600_000.0),
				1 => -rng.gen_range(0.0..50.0),
				_ => rng.gen_range(0.0..40.0),
			};
			let dt = clock.tick(t);
			assert!(dt > 0.0);
			assert!(dt <= MAX_FRAME_SECONDS);
		}
	}

	#[test]
	fn test_reset_forgets_last_timestamp() {
		let mut clock = FrameClock::new();
		clock.tick(0.0);
		clock.reset();
		assert_eq!(clock.tick(5_000.0), NOMINAL_FRAME_SECONDS);
	}
}
