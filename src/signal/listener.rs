//! One object class's view of the spectrum: layout + smoother bank.

use crate::error::Result;
use crate::params::ListenerParams;

use super::bands::{Band, BandEnergies, BandExtractor};
use super::smoother::SmoothedSignals;

/// Band extractor paired with its smoother bank and neutral fallback
pub struct Listener {
    extractor: BandExtractor,
    signals: SmoothedSignals,
    /// Raw energies of the current frame (scratch, reused every frame)
    raw: BandEnergies,
}

impl Listener {
    pub fn new(name: &'static str, params: &ListenerParams, bin_count: usize) -> Result<Self> {
        let extractor = BandExtractor::new(name, &params.layout, bin_count)?;
        let signals = SmoothedSignals::new(&params.layout, &params.rates, params.neutral)?;
        Ok(Self {
            extractor,
            signals,
            raw: BandEnergies::splat(params.neutral),
        })
    }

    /// Extract and smooth one frame
    ///
    /// `None` means no audio this frame: every band reads the neutral value.
    pub fn listen(&mut self, spectrum: Option<&[u8]>) {
        match spectrum {
            Some(bins) => self.extractor.extract(bins, &mut self.raw),
            None => self.extractor.fill(self.signals.neutral(), &mut self.raw),
        }
        self.signals.update(&self.raw);
    }

    /// Un-smoothed energy of the current frame
    pub fn raw(&self, band: Band) -> f32 {
        self.raw[band]
    }

    pub fn smoothed(&self, band: Band) -> f32 {
        self.signals.get(band)
    }

    pub fn overall(&self) -> f32 {
        self.signals.overall()
    }

    pub fn neutral(&self) -> f32 {
        self.signals.neutral()
    }

    pub fn signals(&self) -> &SmoothedSignals {
        &self.signals
    }
}
