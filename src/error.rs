//! Error types for visualizer configuration and spectrum sources.
//!
//! Only initialization can fail. Once a [`Visualizer`](crate::scene::Visualizer)
//! exists, every per-frame edge case has a defined fallback.

use thiserror::Error;

/// Configuration errors, rejected before the frame loop starts
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Spectrum bin count must be a non-zero power of two
    #[error("bin count must be a power of two, got {0}")]
    BinCount(usize),

    /// A band layout contains no bands
    #[error("band layout '{0}' is empty")]
    EmptyLayout(&'static str),

    /// A band's range is empty or inverted
    #[error("band {band} in layout '{layout}' has an empty range {start}..{end}")]
    EmptyBand {
        layout: &'static str,
        band: String,
        start: f32,
        end: f32,
    },

    /// Two bands in one layout overlap or are out of order
    #[error("bands {previous} and {band} in layout '{layout}' overlap or are out of order")]
    Overlap {
        layout: &'static str,
        previous: String,
        band: String,
    },

    /// A proportional layout leaves part of the spectrum uncovered
    #[error("layout '{layout}' does not cover 0..1 contiguously (gap at {at})")]
    Gap { layout: &'static str, at: f32 },

    /// An absolute band reaches past the last spectrum bin
    #[error("band {band} in layout '{layout}' ends at bin {end}, past bin count {bin_count}")]
    OutOfBounds {
        layout: &'static str,
        band: String,
        end: usize,
        bin_count: usize,
    },

    /// A consumer reads a band its listener layout does not produce
    #[error("{consumer} reads band {band}, which layout '{layout}' does not produce")]
    MissingBand {
        layout: &'static str,
        consumer: String,
        band: String,
    },

    /// Smoothing rate outside (0, 1]
    #[error("smoothing rate for {signal} must be in (0, 1], got {rate}")]
    Rate { signal: String, rate: f32 },

    /// A buffer capacity or vertex budget is too small
    #[error("{what} must be at least {min}, got {got}")]
    Capacity {
        what: &'static str,
        min: usize,
        got: usize,
    },

    /// Any other out-of-range parameter
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Errors opening or decoding a spectrum source
#[derive(Error, Debug)]
pub enum SourceError {
    /// WAV decoding error
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// Analyser configuration rejected
    #[error("analyser config: {0}")]
    Config(#[from] ConfigError),

    /// Source parameters are unusable
    #[error("invalid source: {0}")]
    Invalid(String),
}

/// Result type for configuration
pub type Result<T> = std::result::Result<T, ConfigError>;
