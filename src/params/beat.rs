//! Beat detection thresholds and tempo estimation constants.

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Beat detector parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BeatParams {
    /// Energy history length (frames) for the rolling average
    pub history_len: usize,

    /// Relative spike threshold: beat requires energy > average * this
    pub spike_ratio: f32,

    /// Absolute floor: beat requires energy > this (rejects quiet passages)
    pub energy_floor: f32,

    /// Minimum time between two detected beats (milliseconds)
    pub refractory_ms: f64,

    /// Plausible inter-beat interval window (milliseconds, exclusive)
    /// 200..2000 ms = 300..30 BPM
    pub min_interval_ms: f64,
    pub max_interval_ms: f64,

    /// Weight of a new interval when blended into the estimate
    /// Formula: estimate = estimate * (1 - blend) + interval * blend
    pub tempo_blend: f64,

    /// Initial interval estimate before any beat (milliseconds, 500 = 120 BPM)
    pub seed_interval_ms: f64,
}

impl Default for BeatParams {
    fn default() -> Self {
        Self {
            history_len: 30,
            spike_ratio: 1.3,
            energy_floor: 0.4,
            refractory_ms: 200.0,
            min_interval_ms: 200.0,
            max_interval_ms: 2000.0,
            tempo_blend: 0.3,
            seed_interval_ms: 500.0,
        }
    }
}

impl BeatParams {
    pub fn validate(&self) -> Result<()> {
        if self.history_len == 0 {
            return Err(ConfigError::Capacity {
                what: "beat history length",
                min: 1,
                got: 0,
            });
        }
        if !(self.tempo_blend > 0.0 && self.tempo_blend <= 1.0) {
            return Err(ConfigError::InvalidParameter(format!(
                "tempo blend must be in (0, 1], got {}",
                self.tempo_blend
            )));
        }
        if self.min_interval_ms >= self.max_interval_ms {
            return Err(ConfigError::InvalidParameter(format!(
                "interval window {}..{} ms is empty",
                self.min_interval_ms, self.max_interval_ms
            )));
        }
        if self.seed_interval_ms <= 0.0 || self.refractory_ms < 0.0 {
            return Err(ConfigError::InvalidParameter(
                "seed interval must be > 0 and refractory period >= 0".to_string(),
            ));
        }
        Ok(())
    }
}
