//! Per-frame signal pipeline: band extraction, smoothing, beat tracking.

mod bands;
mod beat;
mod listener;
mod smoother;

// Re-export public types
pub use bands::{Band, BandEnergies, BandExtractor};
pub use beat::{BeatEvent, BeatTracker};
pub use listener::Listener;
pub use smoother::{SmoothedSignals, Smoother};
