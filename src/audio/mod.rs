//! Spectrum sources feeding the visualizer.
//!
//! The visualizer only ever asks for "the current spectrum as N bytes".
//! Sources here stand in for a live capture: silence, a synthetic bass
//! pulse, and WAV playback through a browser-style byte analyser.

mod analyser;
mod pulse;
mod wav;

// Re-export public types
pub use analyser::{hann_window, ByteAnalyser};
pub use pulse::PulseSource;
pub use wav::WavSpectrumSource;

/// Anything that can produce a byte magnitude spectrum on demand
pub trait SpectrumSource {
    /// Spectrum at `time_s`, or `None` when no audio is available
    fn spectrum(&mut self, time_s: f64) -> Option<&[u8]>;

    /// Short label for logs
    fn name(&self) -> &str;
}

/// Source with no audio: either absent or digital silence
pub struct SilentSource {
    zeros: Option<Vec<u8>>,
}

impl SilentSource {
    /// Never yields a spectrum
    pub fn absent() -> Self {
        Self { zeros: None }
    }

    /// Yields an all-zero spectrum of `bin_count` bins
    pub fn zeros(bin_count: usize) -> Self {
        Self {
            zeros: Some(vec![0; bin_count]),
        }
    }
}

impl SpectrumSource for SilentSource {
    fn spectrum(&mut self, _time_s: f64) -> Option<&[u8]> {
        self.zeros.as_deref()
    }

    fn name(&self) -> &str {
        "silence"
    }
}
