//! Synthetic spectrum: a steady floor with a bass pulse on every beat.

use super::SpectrumSource;

/// Bass pulse generator at a fixed tempo
///
/// Each beat lights the lowest `bin_count / 8` bins at `peak` for
/// `pulse_ms`; every other bin sits at `floor`.
pub struct PulseSource {
    interval_ms: f64,
    pulse_ms: f64,
    floor: u8,
    peak: u8,
    pulse_bins: usize,
    bins: Vec<u8>,
}

impl PulseSource {
    pub fn new(bin_count: usize, bpm: f32) -> Self {
        let interval_ms = if bpm.is_finite() && bpm > 0.0 {
            60_000.0 / bpm as f64
        } else {
            f64::INFINITY
        };

        Self {
            interval_ms,
            pulse_ms: 50.0,
            floor: 40,
            peak: 230,
            pulse_bins: (bin_count / 8).max(1),
            bins: vec![0; bin_count],
        }
    }

    /// Override the floor and peak magnitudes
    pub fn with_levels(mut self, floor: u8, peak: u8) -> Self {
        self.floor = floor;
        self.peak = peak;
        self
    }

    /// Override the pulse length (milliseconds)
    pub fn with_pulse_ms(mut self, pulse_ms: f64) -> Self {
        self.pulse_ms = pulse_ms;
        self
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Whether `time_s` falls inside a pulse
    pub fn is_pulsing(&self, time_s: f64) -> bool {
        if !self.interval_ms.is_finite() {
            return false;
        }
        // Nudge so frame times landing a hair before a beat boundary count as on it
        let phase = (time_s * 1000.0 + 1e-6).rem_euclid(self.interval_ms);
        phase < self.pulse_ms
    }
}

impl SpectrumSource for PulseSource {
    fn spectrum(&mut self, time_s: f64) -> Option<&[u8]> {
        let bass = if self.is_pulsing(time_s) {
            self.peak
        } else {
            self.floor
        };
        let split = self.pulse_bins.min(self.bins.len());
        self.bins[..split].fill(bass);
        self.bins[split..].fill(self.floor);
        Some(&self.bins)
    }

    fn name(&self) -> &str {
        "pulse"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_timing() {
        let source = PulseSource::new(256, 120.0);
        assert_eq!(source.interval_ms(), 500.0);
        assert!(source.is_pulsing(0.0));
        assert!(source.is_pulsing(0.049));
        assert!(!source.is_pulsing(0.06));
        assert!(!source.is_pulsing(0.499));
        assert!(source.is_pulsing(0.5));
        assert!(source.is_pulsing(10.0));
    }

    #[test]
    fn test_pulse_bins() {
        let mut source = PulseSource::new(256, 120.0);
        let on = source.spectrum(0.0).unwrap().to_vec();
        assert_eq!(on.len(), 256);
        assert!(on[..32].iter().all(|&b| b == 230));
        assert!(on[32..].iter().all(|&b| b == 40));

        let off = source.spectrum(0.25).unwrap();
        assert!(off.iter().all(|&b| b == 40));
    }

    #[test]
    fn test_zero_bpm_never_pulses() {
        let mut source = PulseSource::new(256, 0.0);
        for frame in 0..100 {
            let bins = source.spectrum(frame as f64 / 60.0).unwrap();
            assert!(bins.iter().all(|&b| b == 40));
        }
    }
}
