//! Helixio library - audio-reactive helix, satellites, particles and trails

pub mod audio;
pub mod cli;
pub mod error;
pub mod motion;
pub mod params;
pub mod scene;
pub mod signal;
pub mod trail;
