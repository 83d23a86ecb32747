//! UI components.

pub mod particle_effect;
