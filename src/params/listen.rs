//! Band layouts and smoothing rates, one listener per object class.
//!
//! Different visual objects listen to different slices of the same spectrum
//! snapshot: the helix splits the whole spectrum proportionally into five
//! bands, while satellites, particles and the orb read fixed bin ranges.

use serde::Deserialize;

use crate::signal::Band;

/// One band's slice of the spectrum
///
/// `T = f32` for fractions of the bin count, `T = usize` for absolute bins.
/// The range is half-open: `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BandSpan<T> {
    pub band: Band,
    pub start: T,
    pub end: T,
}

impl<T> BandSpan<T> {
    pub const fn new(band: Band, start: T, end: T) -> Self {
        Self { band, start, end }
    }
}

/// How a listener partitions the spectrum
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutSpec {
    /// Contiguous fractions of the bin count covering 0..1
    Proportional { bands: Vec<BandSpan<f32>> },

    /// Fixed bin ranges (non-overlapping, need not cover the spectrum)
    Absolute { bands: Vec<BandSpan<usize>> },
}

impl LayoutSpec {
    /// Bands this layout produces, in layout order
    pub fn bands(&self) -> Vec<Band> {
        match self {
            LayoutSpec::Proportional { bands } => bands.iter().map(|s| s.band).collect(),
            LayoutSpec::Absolute { bands } => bands.iter().map(|s| s.band).collect(),
        }
    }
}

/// Smoothing rate for one band signal
///
/// Formula: smoothed += (raw - smoothed) * rate
/// Larger rate = snappier, smaller = smoother. Must be in (0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BandRate {
    pub band: Band,
    pub rate: f32,
}

impl BandRate {
    pub const fn new(band: Band, rate: f32) -> Self {
        Self { band, rate }
    }
}

/// Band layout + smoothing bank for one object class
#[derive(Debug, Clone, Deserialize)]
pub struct ListenerParams {
    pub layout: LayoutSpec,

    /// One rate per band in the layout
    pub rates: Vec<BandRate>,

    /// Initial smoothed value, and the raw value used when no audio is available
    /// Must be non-zero so objects render with visible scale before audio arrives
    pub neutral: f32,
}

impl ListenerParams {
    /// Helix: five proportional bands, lower frequencies allowed to move faster
    pub fn helix() -> Self {
        Self {
            layout: LayoutSpec::Proportional {
                bands: vec![
                    BandSpan::new(Band::Bass, 0.0, 0.10),
                    BandSpan::new(Band::LowMid, 0.10, 0.25),
                    BandSpan::new(Band::Mid, 0.25, 0.50),
                    BandSpan::new(Band::HighMid, 0.50, 0.75),
                    BandSpan::new(Band::High, 0.75, 1.0),
                ],
            },
            rates: vec![
                BandRate::new(Band::Bass, 0.08),
                BandRate::new(Band::LowMid, 0.06),
                BandRate::new(Band::Mid, 0.05),
                BandRate::new(Band::HighMid, 0.04),
                BandRate::new(Band::High, 0.03),
            ],
            neutral: 0.3,
        }
    }

    /// Satellites: bass/mid/high from fixed bins of a 256-bin snapshot
    pub fn satellites() -> Self {
        Self {
            layout: LayoutSpec::Absolute {
                bands: vec![
                    BandSpan::new(Band::Bass, 0, 25),
                    BandSpan::new(Band::Mid, 25, 90),
                    BandSpan::new(Band::High, 90, 180),
                ],
            },
            rates: vec![
                BandRate::new(Band::Bass, 0.08),
                BandRate::new(Band::Mid, 0.06),
                BandRate::new(Band::High, 0.05),
            ],
            neutral: 0.2,
        }
    }

    /// Particles: a single mid slice driving the outward push
    pub fn particles() -> Self {
        Self {
            layout: LayoutSpec::Absolute {
                bands: vec![BandSpan::new(Band::Mid, 20, 80)],
            },
            rates: vec![BandRate::new(Band::Mid, 0.05)],
            neutral: 0.05,
        }
    }

    /// Orb: a wide bass zone
    pub fn orb() -> Self {
        Self {
            layout: LayoutSpec::Absolute {
                bands: vec![BandSpan::new(Band::Bass, 0, 40)],
            },
            rates: vec![BandRate::new(Band::Bass, 0.08)],
            neutral: 0.2,
        }
    }
}

/// Listener configuration for every object class
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenerSet {
    pub helix: ListenerParams,
    pub satellites: ListenerParams,
    pub particles: ListenerParams,
    pub orb: ListenerParams,
}

impl Default for ListenerSet {
    fn default() -> Self {
        Self {
            helix: ListenerParams::helix(),
            satellites: ListenerParams::satellites(),
            particles: ListenerParams::particles(),
            orb: ListenerParams::orb(),
        }
    }
}
