//! Ribbon trail geometry parameters.

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Ribbon trail configuration (shared by every trailed object)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrailParams {
    /// Positions kept per object (oldest evicted on overflow)
    pub history_capacity: usize,

    /// Ribbon segments M (2 * M vertices, constant regardless of history)
    pub vertex_budget: usize,

    /// Head half-width (world units)
    pub width: f32,

    /// Extra half-width for bass-driven objects
    pub bass_width_bonus: f32,

    /// Fraction of width lost at the tail
    /// Formula: half_width = width * (1 - progress * taper)
    /// 0.9 → tail keeps 10% of full width, never degenerate
    pub taper: f32,
}

impl Default for TrailParams {
    fn default() -> Self {
        Self {
            history_capacity: 80,
            vertex_budget: 60,
            width: 0.06,
            bass_width_bonus: 0.02,
            taper: 0.9,
        }
    }
}

impl TrailParams {
    pub fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            return Err(ConfigError::Capacity {
                what: "trail history capacity",
                min: 1,
                got: 0,
            });
        }
        if self.vertex_budget < 2 {
            return Err(ConfigError::Capacity {
                what: "ribbon vertex budget",
                min: 2,
                got: self.vertex_budget,
            });
        }
        if !(0.0..1.0).contains(&self.taper) {
            return Err(ConfigError::InvalidParameter(format!(
                "taper must be in [0, 1), got {}",
                self.taper
            )));
        }
        Ok(())
    }
}
