//! WAV file playback analysed into byte spectra.

use hound::{SampleFormat, WavReader};
use std::path::Path;
use tracing::debug;

use super::{ByteAnalyser, SpectrumSource};
use crate::error::SourceError;
use crate::params::AnalyserParams;

/// Spectrum source replaying a decoded WAV file
///
/// The file is decoded and mixed to mono once at open; each frame analyses
/// the `fft_size` samples ending at the requested time.
pub struct WavSpectrumSource {
    samples: Vec<f32>,
    sample_rate: u32,
    analyser: ByteAnalyser,
}

impl WavSpectrumSource {
    /// Decode `path` (integer or float PCM, any channel count)
    pub fn open(path: impl AsRef<Path>, params: AnalyserParams) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let reader = WavReader::open(path)?;
        let spec = reader.spec();
        let channels = spec.channels as usize;
        if channels == 0 {
            return Err(SourceError::Invalid(format!(
                "{} declares zero channels",
                path.display()
            )));
        }

        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
            SampleFormat::Int => {
                let scale = 1.0 / (1u64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<Result<_, _>>()?
            }
        };

        let samples: Vec<f32> = interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();

        debug!(
            "Opened {}: {} Hz, {} channel(s), {:.2} s",
            path.display(),
            spec.sample_rate,
            channels,
            samples.len() as f32 / spec.sample_rate as f32
        );

        Self::from_samples(samples, spec.sample_rate, params)
    }

    /// Wrap already-decoded mono samples
    pub fn from_samples(
        samples: Vec<f32>,
        sample_rate: u32,
        params: AnalyserParams,
    ) -> Result<Self, SourceError> {
        if sample_rate == 0 {
            return Err(SourceError::Invalid("sample rate is zero".to_string()));
        }
        Ok(Self {
            samples,
            sample_rate,
            analyser: ByteAnalyser::new(params)?,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Playback length (seconds)
    pub fn duration_s(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn bin_count(&self) -> usize {
        self.analyser.bin_count()
    }
}

impl SpectrumSource for WavSpectrumSource {
    /// `None` before time zero and once playback has ended
    fn spectrum(&mut self, time_s: f64) -> Option<&[u8]> {
        if !time_s.is_finite() || time_s < 0.0 || time_s > self.duration_s() {
            return None;
        }
        let end = ((time_s * self.sample_rate as f64) as usize).min(self.samples.len());
        let start = end.saturating_sub(self.analyser.fft_size());
        Some(self.analyser.analyse(&self.samples[start..end]))
    }

    fn name(&self) -> &str {
        "wav"
    }
}
