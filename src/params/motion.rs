//! Per-object motion parameters: how energy and tempo become poses.

use serde::Deserialize;
use std::f32::consts::PI;

use crate::error::{ConfigError, Result};
use crate::signal::Band;

/// Global rotation driven by the tempo estimate
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RotationParams {
    /// BPM that maps to speed 1.0 (radians per second)
    /// Formula: target = clamp(bpm / bpm_scale, min_speed, max_speed)
    pub bpm_scale: f32,

    /// Speed clamp (radians per second)
    pub min_speed: f32,
    pub max_speed: f32,

    /// Smoothing rate of the speed itself (slow, avoids jumps when BPM updates)
    pub rate: f32,

    /// Speed before the first frame (radians per second)
    pub initial_speed: f32,
}

impl Default for RotationParams {
    fn default() -> Self {
        Self {
            bpm_scale: 180.0,
            min_speed: 0.15,
            max_speed: 0.6,
            rate: 0.02,
            initial_speed: 0.3,
        }
    }
}

/// Double helix of glowing nodes
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HelixParams {
    /// Nodes per strand (two strands)
    pub node_count: usize,

    /// Radius at zero energy (world units)
    pub base_radius: f32,

    /// Total height along Y (world units)
    pub height: f32,

    /// Full turns over the height
    pub turns: f32,

    /// Node sphere scale at zero energy
    pub node_size: f32,

    /// Formula: radius = base_radius * (1 + energy * radius_gain)
    pub radius_gain: f32,

    /// Formula: scale = node_size * (1 + energy * scale_gain)
    pub scale_gain: f32,

    /// Connector every N nodes
    pub connector_stride: usize,

    /// Formula: opacity = connector_opacity + energy * connector_opacity_gain
    pub connector_opacity: f32,
    pub connector_opacity_gain: f32,
}

impl Default for HelixParams {
    fn default() -> Self {
        Self {
            node_count: 35,
            base_radius: 1.1,
            height: 9.0,
            turns: 2.5,
            node_size: 0.1,
            radius_gain: 0.7,
            scale_gain: 0.4,
            connector_stride: 4,
            connector_opacity: 0.2,
            connector_opacity_gain: 0.4,
        }
    }
}

/// One orbiting satellite
#[derive(Debug, Clone, Deserialize)]
pub struct SatelliteSpec {
    /// Orbit radius at zero energy (world units)
    pub orbit_radius: f32,

    /// Angular speed (radians per second, negative = clockwise)
    pub orbit_speed: f32,

    /// Orbit plane tilt, XYZ Euler angles (radians)
    pub tilt: [f32; 3],

    /// Body scale at zero energy
    pub size: f32,

    /// Band this satellite listens to
    pub band: Band,

    /// Starting angle (radians)
    pub phase: f32,
}

/// Orbiting satellites with trails
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SatelliteParams {
    pub satellites: Vec<SatelliteSpec>,

    /// Formula: radius = orbit_radius + energy * radius_push
    pub radius_push: f32,

    /// Formula: scale = size * (1 + energy * scale_gain)
    pub scale_gain: f32,
}

impl Default for SatelliteParams {
    fn default() -> Self {
        Self {
            satellites: vec![
                SatelliteSpec {
                    orbit_radius: 3.8,
                    orbit_speed: 0.22,
                    tilt: [0.35, 0.0, 0.15],
                    size: 0.14,
                    band: Band::Bass,
                    phase: 0.0,
                },
                SatelliteSpec {
                    orbit_radius: 4.5,
                    orbit_speed: -0.18,
                    tilt: [-0.4, 0.25, 0.0],
                    size: 0.11,
                    band: Band::Mid,
                    phase: PI * 0.5,
                },
                SatelliteSpec {
                    orbit_radius: 5.0,
                    orbit_speed: 0.15,
                    tilt: [0.25, -0.35, 0.2],
                    size: 0.09,
                    band: Band::High,
                    phase: PI,
                },
                SatelliteSpec {
                    orbit_radius: 3.2,
                    orbit_speed: -0.25,
                    tilt: [-0.2, 0.4, -0.15],
                    size: 0.1,
                    band: Band::Bass,
                    phase: PI * 1.5,
                },
            ],
            radius_push: 0.3,
            scale_gain: 0.4,
        }
    }
}

/// Ambient particle cloud
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParticleParams {
    pub count: usize,

    /// Cloud radius (world units); particles spawn in [0.5, 1.0] * radius
    pub radius: f32,

    /// Layout seed (same seed = same cloud)
    pub seed: u64,

    /// Max drift per frame per axis (world units)
    pub drift: f32,

    /// Outward push per frame at full energy (only active outward)
    pub push_gain: f32,

    /// Soft outer boundary as a multiple of radius, and pull-back per frame
    pub outer_limit: f32,
    pub pull_back: f32,

    /// Soft inner boundary (world units), and push-out per frame
    pub inner_limit: f32,
    pub push_out: f32,

    /// Group spin (radians per second) and wobble amplitude (radians)
    pub spin_speed: f32,
    pub tilt_amplitude: f32,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            count: 100,
            radius: 8.0,
            seed: 42,
            drift: 0.001,
            push_gain: 0.01,
            outer_limit: 1.2,
            pull_back: 0.01,
            inner_limit: 2.0,
            push_out: 0.005,
            spin_speed: 0.02,
            tilt_amplitude: 0.1,
        }
    }
}

/// Central breathing orb (off by default)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrbParams {
    pub enabled: bool,

    /// Resting scales of the layered spheres
    pub outer_scale: f32,
    pub inner_scale: f32,
    pub core_scale: f32,
    pub glow_scale: f32,

    /// Breathing frequency (radians per second)
    pub breathe_speed: f32,

    /// Palette cycle frequency (radians per second)
    pub color_speed: f32,

    /// Palette as linear RGB
    pub palette: Vec<[f32; 3]>,
}

impl Default for OrbParams {
    fn default() -> Self {
        Self {
            enabled: false,
            outer_scale: 1.6,
            inner_scale: 0.5,
            core_scale: 0.35,
            glow_scale: 2.2,
            breathe_speed: 0.5,
            color_speed: 0.1,
            palette: vec![
                hex_rgb(0x4a90d9), // Soft blue
                hex_rgb(0x7b68ee), // Medium purple
                hex_rgb(0x9370db), // Medium orchid
                hex_rgb(0xda70d6), // Orchid
                hex_rgb(0x87ceeb), // Sky blue
                hex_rgb(0x40e0d0), // Turquoise
            ],
        }
    }
}

/// 0xRRGGBB → [r, g, b] in 0..1
pub const fn hex_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

impl RotationParams {
    pub fn validate(&self) -> Result<()> {
        if self.min_speed > self.max_speed || self.bpm_scale <= 0.0 {
            return Err(ConfigError::InvalidParameter(format!(
                "rotation clamp {}..{} or bpm scale {} invalid",
                self.min_speed, self.max_speed, self.bpm_scale
            )));
        }
        check_rate("rotation speed", self.rate)
    }
}

impl HelixParams {
    pub fn validate(&self) -> Result<()> {
        if self.node_count < 2 {
            return Err(ConfigError::Capacity {
                what: "helix node count",
                min: 2,
                got: self.node_count,
            });
        }
        if self.connector_stride == 0 {
            return Err(ConfigError::Capacity {
                what: "connector stride",
                min: 1,
                got: 0,
            });
        }
        Ok(())
    }
}

impl ParticleParams {
    pub fn validate(&self) -> Result<()> {
        if !self.drift.is_finite() || !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::InvalidParameter(format!(
                "particle drift {} and radius {} must be finite (radius > 0)",
                self.drift, self.radius
            )));
        }
        Ok(())
    }
}

impl OrbParams {
    pub fn validate(&self) -> Result<()> {
        if self.palette.is_empty() {
            return Err(ConfigError::Capacity {
                what: "orb palette size",
                min: 1,
                got: 0,
            });
        }
        Ok(())
    }
}

pub(crate) fn check_rate(signal: &str, rate: f32) -> Result<()> {
    if rate > 0.0 && rate <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::Rate {
            signal: signal.to_string(),
            rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_rgb() {
        assert_eq!(hex_rgb(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(hex_rgb(0x00ff00), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_rate_bounds() {
        assert!(check_rate("bass", 1.0).is_ok());
        assert!(check_rate("bass", 0.0).is_err());
        assert!(check_rate("bass", 1.5).is_err());
    }

    #[test]
    fn test_default_satellites_match_band_table() {
        let params = SatelliteParams::default();
        let bands: Vec<Band> = params.satellites.iter().map(|s| s.band).collect();
        assert_eq!(bands, vec![Band::Bass, Band::Mid, Band::High, Band::Bass]);
    }
}
