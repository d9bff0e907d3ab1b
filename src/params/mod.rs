//! Parameter definitions with units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Units (world units, seconds, milliseconds, bins)
//! - Documented ranges and meanings
//! - Validation before the frame loop starts
//!
//! Every struct deserializes with `#[serde(default)]`, so a TOML file only
//! needs to name the values it overrides.

mod audio;
mod beat;
mod listen;
mod motion;
mod trail;

use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::signal::{Band, BandExtractor};

// Re-export all types
pub use audio::{AnalyserParams, SpectrumParams};
pub use beat::BeatParams;
pub use listen::{BandRate, BandSpan, LayoutSpec, ListenerParams, ListenerSet};
pub use motion::{
    hex_rgb, HelixParams, OrbParams, ParticleParams, RotationParams, SatelliteParams,
    SatelliteSpec,
};
pub use trail::TrailParams;

pub(crate) use motion::check_rate;

/// Complete visualizer configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VisualizerParams {
    pub spectrum: SpectrumParams,
    pub listeners: ListenerSet,
    pub beat: BeatParams,
    pub rotation: RotationParams,
    pub helix: HelixParams,
    pub satellites: SatelliteParams,
    pub particles: ParticleParams,
    pub orb: OrbParams,
    pub trail: TrailParams,
}

impl VisualizerParams {
    /// Validate every section, including band layouts against the bin count
    pub fn validate(&self) -> Result<()> {
        self.spectrum.validate()?;

        let bin_count = self.spectrum.bin_count;
        let listeners = [
            ("helix", &self.listeners.helix),
            ("satellites", &self.listeners.satellites),
            ("particles", &self.listeners.particles),
            ("orb", &self.listeners.orb),
        ];
        for (name, listener) in listeners {
            BandExtractor::new(name, &listener.layout, bin_count)?;
            crate::signal::SmoothedSignals::new(&listener.layout, &listener.rates, listener.neutral)?;
        }

        let listeners = &self.listeners;
        require_band("helix", &listeners.helix, Band::Bass, "beat tracker")?;
        require_band("particles", &listeners.particles, Band::Mid, "particle field")?;
        require_band("orb", &listeners.orb, Band::Bass, "orb")?;
        for (i, satellite) in self.satellites.satellites.iter().enumerate() {
            require_band(
                "satellites",
                &listeners.satellites,
                satellite.band,
                &format!("satellite {i}"),
            )?;
        }

        self.beat.validate()?;
        self.rotation.validate()?;
        self.helix.validate()?;
        self.particles.validate()?;
        self.orb.validate()?;
        self.trail.validate()?;
        Ok(())
    }
}

fn require_band(
    layout: &'static str,
    listener: &ListenerParams,
    band: Band,
    consumer: &str,
) -> Result<()> {
    if listener.layout.bands().contains(&band) {
        Ok(())
    } else {
        Err(ConfigError::MissingBand {
            layout,
            consumer: consumer.to_string(),
            band: band.to_string(),
        })
    }
}

/// Parse configuration from TOML text (unnamed values keep their defaults)
pub fn from_toml_str(text: &str) -> Result<VisualizerParams> {
    let params: VisualizerParams = toml::from_str(text)?;
    params.validate()?;
    Ok(params)
}

/// Load and validate configuration from a TOML file
pub fn load(path: impl AsRef<Path>) -> Result<VisualizerParams> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let params = from_toml_str(&text)?;
    debug!("Loaded visualizer config from {}", path.display());
    Ok(params)
}
