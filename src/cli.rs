//! Command-line argument parsing.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::audio::{PulseSource, SilentSource, SpectrumSource, WavSpectrumSource};
use crate::error::SourceError;
use crate::params::{self, AnalyserParams, VisualizerParams};

/// Where spectrum frames come from
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// All-zero spectrum (idle motion)
    Silence,
    /// Synthetic bass pulse at --bpm
    Pulse,
    /// Analysed WAV file from --wav
    Wav,
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "helixio")]
#[command(about = "Headless audio-reactive helix visualizer", long_about = None)]
pub struct Args {
    /// Spectrum source
    #[arg(long, value_enum, default_value = "pulse")]
    pub source: SourceKind,

    /// Tempo of the synthetic pulse (beats per minute)
    #[arg(long, value_name = "BPM", default_value = "128")]
    pub bpm: f32,

    /// WAV file for the wav source
    #[arg(long, value_name = "PATH", required_if_eq("source", "wav"))]
    pub wav: Option<PathBuf>,

    /// Simulated run length (seconds)
    #[arg(long, value_name = "SECONDS", default_value = "10")]
    pub seconds: f32,

    /// Simulated frame rate
    #[arg(long, value_name = "FPS", default_value = "60")]
    pub fps: u32,

    /// TOML file overriding default parameters
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable the central orb
    #[arg(long)]
    pub orb: bool,

    /// Log filter when RUST_LOG is unset (e.g. info, debug, helixio=trace)
    #[arg(long, value_name = "FILTER", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Load the parameter file (or defaults) and apply flag overrides
    pub fn visualizer_params(&self) -> crate::error::Result<VisualizerParams> {
        let mut params = match &self.config {
            Some(path) => params::load(path)?,
            None => VisualizerParams::default(),
        };
        if self.orb {
            params.orb.enabled = true;
        }
        Ok(params)
    }

    /// Build the selected spectrum source for `bin_count` bins
    pub fn spectrum_source(
        &self,
        bin_count: usize,
    ) -> Result<Box<dyn SpectrumSource>, SourceError> {
        match self.source {
            SourceKind::Silence => Ok(Box::new(SilentSource::zeros(bin_count))),
            SourceKind::Pulse => Ok(Box::new(PulseSource::new(bin_count, self.bpm))),
            SourceKind::Wav => {
                let path = self
                    .wav
                    .as_ref()
                    .ok_or_else(|| SourceError::Invalid("--wav PATH is required".to_string()))?;
                let analyser = AnalyserParams {
                    fft_size: bin_count * 2,
                    ..Default::default()
                };
                Ok(Box::new(WavSpectrumSource::open(path, analyser)?))
            }
        }
    }

    /// Number of frames to simulate
    pub fn frame_count(&self) -> u64 {
        if self.fps == 0 || self.seconds.is_nan() || self.seconds <= 0.0 {
            return 0;
        }
        (self.seconds as f64 * self.fps as f64).round() as u64
    }
}
