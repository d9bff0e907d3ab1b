//! Exponential low-pass filters, one per tracked signal.

use crate::error::{ConfigError, Result};
use crate::params::{check_rate, BandRate, LayoutSpec};

use super::bands::{Band, BandEnergies};

/// Single exponential smoother
///
/// Formula: value += (raw - value) * rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoother {
    value: f32,
    rate: f32,
}

impl Smoother {
    pub const fn new(initial: f32, rate: f32) -> Self {
        Self {
            value: initial,
            rate,
        }
    }

    /// Advance one frame toward `raw`, returning the new value
    pub fn step(&mut self, raw: f32) -> f32 {
        self.value += (raw - self.value) * self.rate;
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }
}

/// Smoother bank keyed by band, with a non-zero neutral starting value
#[derive(Debug, Clone)]
pub struct SmoothedSignals {
    signals: [Option<Smoother>; Band::COUNT],
    tracked: usize,
    neutral: f32,
}

impl SmoothedSignals {
    /// Build one smoother per band in `layout`, each starting at `neutral`
    ///
    /// # Errors
    /// Every layout band needs exactly one rate in (0, 1], no rate may name a
    /// band outside the layout, and `neutral` must be in (0, 1].
    pub fn new(layout: &LayoutSpec, rates: &[BandRate], neutral: f32) -> Result<Self> {
        if !(neutral > 0.0 && neutral <= 1.0) {
            return Err(ConfigError::InvalidParameter(format!(
                "neutral value must be in (0, 1], got {}",
                neutral
            )));
        }

        let layout_bands = layout.bands();
        let mut signals = [None; Band::COUNT];

        for entry in rates {
            check_rate(entry.band.name(), entry.rate)?;
            if !layout_bands.contains(&entry.band) {
                return Err(ConfigError::InvalidParameter(format!(
                    "smoothing rate given for band {} which the layout does not extract",
                    entry.band
                )));
            }
            if signals[entry.band.index()].is_some() {
                return Err(ConfigError::InvalidParameter(format!(
                    "smoothing rate for band {} given twice",
                    entry.band
                )));
            }
            signals[entry.band.index()] = Some(Smoother::new(neutral, entry.rate));
        }

        if let Some(missing) = layout_bands.iter().find(|b| signals[b.index()].is_none()) {
            return Err(ConfigError::InvalidParameter(format!(
                "no smoothing rate for band {}",
                missing
            )));
        }

        Ok(Self {
            signals,
            tracked: layout_bands.len(),
            neutral,
        })
    }

    /// Step every tracked signal toward its raw value
    pub fn update(&mut self, raw: &BandEnergies) {
        for band in Band::ALL {
            if let Some(signal) = &mut self.signals[band.index()] {
                signal.step(raw[band]);
            }
        }
    }

    /// Current smoothed value (neutral for bands this bank does not track)
    pub fn get(&self, band: Band) -> f32 {
        self.signals[band.index()].map_or(self.neutral, |s| s.value())
    }

    /// Unweighted mean of the tracked signals, recomputed on demand
    pub fn overall(&self) -> f32 {
        let sum: f32 = self.signals.iter().flatten().map(Smoother::value).sum();
        sum / self.tracked as f32
    }

    pub fn neutral(&self) -> f32 {
        self.neutral
    }
}
