//! Particle backdrop engine.
//!
//! A backdrop is a fixed population of particles integrated under a set of
//! independent force contributors, optionally joined by lightning bolts, and
//! drawn every animation frame onto a canvas behind the page:
//! - Particles respawn in place when they expire or leave the viewport
//! - Forces (gravity, drag, turbulence, pointer, buoyancy, magnetism, tether)
//!   are switched on per effect
//! - Rendering goes through a 2D canvas or, for large counts, WebGL2 points
//!
//! # Example
//!
//! ```ignore
//! use journal_backdrop::{EffectConfig, ParticleBackground};
//!
//! view! { <ParticleBackground config=EffectConfig::embers() /> }
//! ```

mod browser;
pub mod clock;
mod component;
pub mod config;
pub mod display;
pub mod driver;
pub mod effect;
pub mod forces;
pub mod integrator;
pub mod lightning;
pub mod particle;
pub mod render;
pub mod theme;
mod webgl;

pub use component::ParticleBackground;
pub use config::{EffectConfig, Tuning, parse_backdrops};
pub use effect::ParticleEffect;
pub use theme::{Color, Palette};
