//! Band extraction: spectrum bytes → mean normalized energy per band.

use serde::Deserialize;
use std::fmt;
use std::ops::{Index, Range};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::params::{BandSpan, LayoutSpec};

/// Named frequency band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Bass,
    LowMid,
    Mid,
    HighMid,
    High,
}

impl Band {
    pub const COUNT: usize = 5;
    pub const ALL: [Band; Band::COUNT] =
        [Band::Bass, Band::LowMid, Band::Mid, Band::HighMid, Band::High];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Band::Bass => "bass",
            Band::LowMid => "low_mid",
            Band::Mid => "mid",
            Band::HighMid => "high_mid",
            Band::High => "high",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-band scalar values, indexed by [`Band`]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BandEnergies {
    values: [f32; Band::COUNT],
}

impl BandEnergies {
    pub const fn splat(value: f32) -> Self {
        Self {
            values: [value; Band::COUNT],
        }
    }

    pub fn get(&self, band: Band) -> f32 {
        self.values[band.index()]
    }

    pub fn set(&mut self, band: Band, value: f32) {
        self.values[band.index()] = value;
    }
}

impl Index<Band> for BandEnergies {
    type Output = f32;

    fn index(&self, band: Band) -> &f32 {
        &self.values[band.index()]
    }
}

/// Static partition of spectrum bins into named bands
///
/// Ranges are resolved against the session's bin count once, at construction.
/// Extraction then only sums bytes: no allocation, no failure.
#[derive(Debug, Clone)]
pub struct BandExtractor {
    ranges: Vec<(Band, Range<usize>)>,
}

impl BandExtractor {
    /// Resolve and validate a layout for `bin_count` bins
    ///
    /// # Errors
    /// Empty layouts, empty or inverted ranges, overlapping or duplicate bands,
    /// proportional layouts that do not cover 0..1, and absolute ranges past
    /// the last bin are all rejected.
    pub fn new(name: &'static str, spec: &LayoutSpec, bin_count: usize) -> Result<Self> {
        let ranges = match spec {
            LayoutSpec::Proportional { bands } => resolve_proportional(name, bands, bin_count)?,
            LayoutSpec::Absolute { bands } => resolve_absolute(name, bands, bin_count)?,
        };

        debug!("Band layout '{}' over {} bins: {:?}", name, bin_count, ranges);
        Ok(Self { ranges })
    }

    /// Write the mean normalized magnitude of each band into `out`
    ///
    /// Bands outside this layout are left untouched. A band whose range
    /// resolved to zero bins reads as 0.
    pub fn extract(&self, spectrum: &[u8], out: &mut BandEnergies) {
        for (band, range) in &self.ranges {
            out.set(*band, mean_magnitude(spectrum, range.clone()));
        }
    }

    /// Write the same value into every band of this layout
    pub fn fill(&self, value: f32, out: &mut BandEnergies) {
        for (band, _) in &self.ranges {
            out.set(*band, value);
        }
    }

    /// Bands in layout order
    pub fn bands(&self) -> impl Iterator<Item = Band> + '_ {
        self.ranges.iter().map(|(band, _)| *band)
    }

    /// Resolved bin range for a band, if this layout has it
    pub fn range(&self, band: Band) -> Option<Range<usize>> {
        self.ranges
            .iter()
            .find(|(b, _)| *b == band)
            .map(|(_, range)| range.clone())
    }
}

/// Mean of `spectrum[range]` scaled to 0..1 (0 for an empty range)
fn mean_magnitude(spectrum: &[u8], range: Range<usize>) -> f32 {
    let end = range.end.min(spectrum.len());
    let start = range.start.min(end);
    let bins = &spectrum[start..end];

    if bins.is_empty() {
        return 0.0;
    }

    let sum: u32 = bins.iter().map(|&b| b as u32).sum();
    sum as f32 / bins.len() as f32 / 255.0
}

fn check_duplicate(name: &'static str, seen: &[Band], band: Band) -> Result<()> {
    if seen.contains(&band) {
        return Err(ConfigError::InvalidParameter(format!(
            "band {} appears twice in layout '{}'",
            band, name
        )));
    }
    Ok(())
}

fn resolve_proportional(
    name: &'static str,
    spans: &[BandSpan<f32>],
    bin_count: usize,
) -> Result<Vec<(Band, Range<usize>)>> {
    const EPS: f32 = 1e-6;

    let Some(first) = spans.first() else {
        return Err(ConfigError::EmptyLayout(name));
    };
    if first.start.abs() > EPS {
        return Err(ConfigError::Gap { layout: name, at: 0.0 });
    }

    let mut seen = Vec::with_capacity(spans.len());
    let mut ranges = Vec::with_capacity(spans.len());
    let mut previous: Option<&BandSpan<f32>> = None;

    for span in spans {
        check_duplicate(name, &seen, span.band)?;
        seen.push(span.band);

        if !(span.start < span.end) || span.start < 0.0 || span.end > 1.0 + EPS {
            return Err(ConfigError::EmptyBand {
                layout: name,
                band: span.band.to_string(),
                start: span.start,
                end: span.end,
            });
        }

        if let Some(prev) = previous {
            if span.start < prev.end - EPS {
                return Err(ConfigError::Overlap {
                    layout: name,
                    previous: prev.band.to_string(),
                    band: span.band.to_string(),
                });
            }
            if span.start > prev.end + EPS {
                return Err(ConfigError::Gap {
                    layout: name,
                    at: prev.end,
                });
            }
        }
        previous = Some(span);

        let start = (bin_count as f32 * span.start).floor() as usize;
        let end = if span.end >= 1.0 - EPS {
            bin_count
        } else {
            (bin_count as f32 * span.end).floor() as usize
        };
        ranges.push((span.band, start..end));
    }

    if let Some(last) = previous {
        if last.end < 1.0 - EPS {
            return Err(ConfigError::Gap {
                layout: name,
                at: last.end,
            });
        }
    }

    Ok(ranges)
}

fn resolve_absolute(
    name: &'static str,
    spans: &[BandSpan<usize>],
    bin_count: usize,
) -> Result<Vec<(Band, Range<usize>)>> {
    if spans.is_empty() {
        return Err(ConfigError::EmptyLayout(name));
    }

    let mut sorted: Vec<&BandSpan<usize>> = spans.iter().collect();
    sorted.sort_by_key(|span| span.start);

    let mut seen = Vec::with_capacity(spans.len());
    for (i, span) in sorted.iter().enumerate() {
        check_duplicate(name, &seen, span.band)?;
        seen.push(span.band);

        if span.start >= span.end {
            return Err(ConfigError::EmptyBand {
                layout: name,
                band: span.band.to_string(),
                start: span.start as f32,
                end: span.end as f32,
            });
        }
        if span.end > bin_count {
            return Err(ConfigError::OutOfBounds {
                layout: name,
                band: span.band.to_string(),
                end: span.end,
                bin_count,
            });
        }
        if i > 0 && span.start < sorted[i - 1].end {
            return Err(ConfigError::Overlap {
                layout: name,
                previous: sorted[i - 1].band.to_string(),
                band: span.band.to_string(),
            });
        }
    }

    Ok(spans
        .iter()
        .map(|span| (span.band, span.start..span.end))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ListenerParams;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn helix_extractor(bin_count: usize) -> BandExtractor {
        BandExtractor::new("helix", &ListenerParams::helix().layout, bin_count).unwrap()
    }

    #[test]
    fn test_default_partition_bins() {
        let extractor = helix_extractor(256);

        // floor(256 * fraction), last band runs to the end
        assert_eq!(extractor.range(Band::Bass), Some(0..25));
        assert_eq!(extractor.range(Band::LowMid), Some(25..64));
        assert_eq!(extractor.range(Band::Mid), Some(64..128));
        assert_eq!(extractor.range(Band::HighMid), Some(128..192));
        assert_eq!(extractor.range(Band::High), Some(192..256));
    }

    #[test]
    fn test_all_zero_and_all_max() {
        let extractor = helix_extractor(256);
        let mut out = BandEnergies::splat(0.5);

        extractor.extract(&[0u8; 256], &mut out);
        for band in Band::ALL {
            assert_eq!(out[band], 0.0);
        }

        extractor.extract(&[255u8; 256], &mut out);
        for band in Band::ALL {
            assert_eq!(out[band], 1.0);
        }
    }

    #[test]
    fn test_mean_of_band_only() {
        let extractor = helix_extractor(256);
        let mut spectrum = [0u8; 256];
        // Half the bass bins at full scale
        for bin in spectrum.iter_mut().take(25).step_by(2) {
            *bin = 255;
        }
        let mut out = BandEnergies::default();
        extractor.extract(&spectrum, &mut out);

        assert_relative_eq!(out[Band::Bass], 13.0 / 25.0);
        assert_eq!(out[Band::LowMid], 0.0);
    }

    #[test]
    fn test_tiny_spectrum_empty_band_reads_zero() {
        // 4 bins: bass = floor(0.4) = 0..0 → no bins
        let extractor = helix_extractor(4);
        assert_eq!(extractor.range(Band::Bass), Some(0..0));

        let mut out = BandEnergies::splat(0.7);
        extractor.extract(&[255u8; 4], &mut out);
        assert_eq!(out[Band::Bass], 0.0);
        assert_eq!(out[Band::High], 1.0);
    }

    #[test]
    fn test_absolute_layout_leaves_other_bands() {
        let extractor =
            BandExtractor::new("satellites", &ListenerParams::satellites().layout, 256).unwrap();
        let mut out = BandEnergies::splat(0.9);
        extractor.extract(&[0u8; 256], &mut out);

        assert_eq!(out[Band::Bass], 0.0);
        assert_eq!(out[Band::Mid], 0.0);
        assert_eq!(out[Band::High], 0.0);
        assert_eq!(out[Band::LowMid], 0.9);
    }

    #[test]
    fn test_proportional_gap_rejected() {
        let spec = LayoutSpec::Proportional {
            bands: vec![
                BandSpan::new(Band::Bass, 0.0, 0.2),
                BandSpan::new(Band::High, 0.3, 1.0),
            ],
        };
        assert!(matches!(
            BandExtractor::new("test", &spec, 256),
            Err(ConfigError::Gap { .. })
        ));
    }

    #[test]
    fn test_proportional_overlap_rejected() {
        let spec = LayoutSpec::Proportional {
            bands: vec![
                BandSpan::new(Band::Bass, 0.0, 0.5),
                BandSpan::new(Band::High, 0.4, 1.0),
            ],
        };
        assert!(matches!(
            BandExtractor::new("test", &spec, 256),
            Err(ConfigError::Overlap { .. })
        ));
    }

    #[test]
    fn test_proportional_must_reach_one() {
        let spec = LayoutSpec::Proportional {
            bands: vec![BandSpan::new(Band::Bass, 0.0, 0.5)],
        };
        assert!(matches!(
            BandExtractor::new("test", &spec, 256),
            Err(ConfigError::Gap { .. })
        ));
    }

    #[test]
    fn test_absolute_out_of_bounds_rejected() {
        let spec = LayoutSpec::Absolute {
            bands: vec![BandSpan::new(Band::High, 90, 180)],
        };
        // Fine at 256 bins, too far for 128
        assert!(BandExtractor::new("test", &spec, 256).is_ok());
        assert!(matches!(
            BandExtractor::new("test", &spec, 128),
            Err(ConfigError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_empty_and_duplicate_rejected() {
        let empty = LayoutSpec::Absolute { bands: vec![] };
        assert!(matches!(
            BandExtractor::new("test", &empty, 256),
            Err(ConfigError::EmptyLayout("test"))
        ));

        let inverted = LayoutSpec::Absolute {
            bands: vec![BandSpan::new(Band::Bass, 10, 10)],
        };
        assert!(matches!(
            BandExtractor::new("test", &inverted, 256),
            Err(ConfigError::EmptyBand { .. })
        ));

        let duplicate = LayoutSpec::Absolute {
            bands: vec![
                BandSpan::new(Band::Bass, 0, 10),
                BandSpan::new(Band::Bass, 10, 20),
            ],
        };
        assert!(BandExtractor::new("test", &duplicate, 256).is_err());
    }

    proptest! {
        #[test]
        fn prop_band_energy_in_unit_range(spectrum in prop::collection::vec(any::<u8>(), 256)) {
            let extractor = helix_extractor(256);
            let mut out = BandEnergies::default();
            extractor.extract(&spectrum, &mut out);
            for band in Band::ALL {
                prop_assert!((0.0..=1.0).contains(&out[band]));
            }
        }
    }
}
