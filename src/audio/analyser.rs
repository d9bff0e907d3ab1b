//! Byte-spectrum analyser: windowed FFT, temporal smoothing, dB → 0..255.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

use crate::error::Result;
use crate::params::AnalyserParams;

/// Frequency analyser producing one byte per bin
///
/// All buffers are allocated once; [`Self::analyse`] never allocates.
pub struct ByteAnalyser {
    params: AnalyserParams,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    /// Smoothed linear magnitudes carried between analyses
    smoothed: Vec<f32>,
    bytes: Vec<u8>,
}

impl ByteAnalyser {
    pub fn new(params: AnalyserParams) -> Result<Self> {
        params.validate()?;

        let size = params.fft_size;
        let fft = FftPlanner::new().plan_fft_forward(size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];
        let bins = params.bin_count();

        Ok(Self {
            window: (0..size).map(|i| hann_window(i, size)).collect(),
            buffer: vec![Complex::new(0.0, 0.0); size],
            scratch,
            smoothed: vec![0.0; bins],
            bytes: vec![0; bins],
            fft,
            params,
        })
    }

    /// Samples consumed per analysis
    pub fn fft_size(&self) -> usize {
        self.params.fft_size
    }

    pub fn bin_count(&self) -> usize {
        self.bytes.len()
    }

    /// Analyse the most recent `fft_size` samples
    ///
    /// A shorter block is zero-padded at the front (the oldest end).
    pub fn analyse(&mut self, block: &[f32]) -> &[u8] {
        let size = self.params.fft_size;
        let block = &block[block.len().saturating_sub(size)..];
        let pad = size - block.len();

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = if i < pad { 0.0 } else { block[i - pad] };
            *slot = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        let tau = self.params.smoothing_time_constant;
        let norm = 1.0 / size as f32;
        let min_db = self.params.min_decibels;
        let range_db = self.params.max_decibels - min_db;

        for (k, (smoothed, byte)) in self
            .smoothed
            .iter_mut()
            .zip(self.bytes.iter_mut())
            .enumerate()
        {
            let magnitude = self.buffer[k].norm() * norm;
            *smoothed = tau * *smoothed + (1.0 - tau) * magnitude;

            let db = 20.0 * smoothed.max(1e-12).log10();
            let scaled = (255.0 / range_db * (db - min_db)).floor();
            *byte = scaled.clamp(0.0, 255.0) as u8;
        }

        &self.bytes
    }

    /// Bytes from the last analysis
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Forget smoothing history
    pub fn reset(&mut self) {
        self.smoothed.fill(0.0);
        self.bytes.fill(0);
    }
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq_hz: f32, amplitude: f32, sample_rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|n| (2.0 * PI * freq_hz * n as f32 / sample_rate).sin() * amplitude)
            .collect()
    }

    #[test]
    fn test_hann_window() {
        let size = 512;

        // Hann window should be 0 at edges, 1 at center
        assert!(hann_window(0, size).abs() < 0.01);
        assert!(hann_window(size - 1, size).abs() < 0.01);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_silence_is_all_zero() {
        let mut analyser = ByteAnalyser::new(AnalyserParams::default()).unwrap();
        let bytes = analyser.analyse(&[0.0; 512]);
        assert_eq!(bytes.len(), 256);
        assert!(bytes.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_sine_peaks_at_its_bin() {
        let mut analyser = ByteAnalyser::new(AnalyserParams::default()).unwrap();
        // Bin 20 at 44.1 kHz / 512
        let freq = 20.0 * 44_100.0 / 512.0;
        let block = sine(freq, 0.5, 44_100.0, 512);

        for _ in 0..30 {
            analyser.analyse(&block);
        }
        let bytes = analyser.bytes();
        let peak = (0..bytes.len()).max_by_key(|&k| bytes[k]).unwrap();
        assert!((19..=21).contains(&peak), "peak at bin {}", peak);
        assert_eq!(bytes[20], 255);
        assert_eq!(bytes[200], 0);
    }

    #[test]
    fn test_smoothing_rises_gradually() {
        let mut analyser = ByteAnalyser::new(AnalyserParams::default()).unwrap();
        let freq = 10.0 * 44_100.0 / 512.0;
        let block = sine(freq, 0.01, 44_100.0, 512);

        let first = analyser.analyse(&block)[10];
        for _ in 0..30 {
            analyser.analyse(&block);
        }
        let settled = analyser.bytes()[10];
        assert!(settled > first);

        analyser.reset();
        assert!(analyser.bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_short_block_is_padded() {
        let mut analyser = ByteAnalyser::new(AnalyserParams::default()).unwrap();
        let bytes = analyser.analyse(&[0.1; 10]);
        assert_eq!(bytes.len(), 256);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = AnalyserParams {
            fft_size: 500,
            ..Default::default()
        };
        assert!(ByteAnalyser::new(params).is_err());
    }
}
