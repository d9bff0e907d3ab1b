//! Spectrum input configuration and analyser constants.

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Shape of the spectrum snapshot the core reads every frame
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpectrumParams {
    /// Number of frequency bins per snapshot (power of 2, fixed per session)
    /// Standard analyser with transform size 512 → 256 bins
    pub bin_count: usize,

    /// Treat an all-zero snapshot as "no audio" and fall back to neutral energies
    pub silence_as_idle: bool,
}

impl Default for SpectrumParams {
    fn default() -> Self {
        Self {
            bin_count: 256,
            silence_as_idle: true,
        }
    }
}

impl SpectrumParams {
    /// Validate configuration (bin count must be power of 2)
    pub fn validate(&self) -> Result<()> {
        if !self.bin_count.is_power_of_two() {
            return Err(ConfigError::BinCount(self.bin_count));
        }
        Ok(())
    }
}

/// Byte-spectrum analyser configuration (used by the WAV source)
///
/// Mirrors a browser-style analyser: Hann window, magnitude scaled by
/// 1/fft_size, per-bin temporal smoothing, then a dB window mapped to 0..255.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyserParams {
    /// FFT window size (must be power of 2, produces fft_size / 2 bins)
    pub fft_size: usize,

    /// Per-bin smoothing between successive analyses (0 = none, <1)
    pub smoothing_time_constant: f32,

    /// Magnitude mapped to byte 0 (dB)
    pub min_decibels: f32,

    /// Magnitude mapped to byte 255 (dB)
    pub max_decibels: f32,
}

impl Default for AnalyserParams {
    fn default() -> Self {
        Self {
            fft_size: 512,
            smoothing_time_constant: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
        }
    }
}

impl AnalyserParams {
    /// Number of byte bins produced per analysis
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate configuration (FFT size must be power of 2, dB window ordered)
    pub fn validate(&self) -> Result<()> {
        if !self.fft_size.is_power_of_two() || self.fft_size < 32 {
            return Err(ConfigError::InvalidParameter(format!(
                "FFT size must be a power of 2 >= 32, got {}",
                self.fft_size
            )));
        }
        if !(0.0..1.0).contains(&self.smoothing_time_constant) {
            return Err(ConfigError::InvalidParameter(format!(
                "smoothing time constant must be in [0, 1), got {}",
                self.smoothing_time_constant
            )));
        }
        if self.min_decibels >= self.max_decibels {
            return Err(ConfigError::InvalidParameter(format!(
                "min_decibels ({}) must be below max_decibels ({})",
                self.min_decibels, self.max_decibels
            )));
        }
        Ok(())
    }
}
