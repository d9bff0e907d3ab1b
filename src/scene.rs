//! Per-frame entry point tying audio, tempo, motion and trails together.

use tracing::{debug, warn};

use crate::error::Result;
use crate::motion::{Connector, MotionDriver, ObjectId, OrbState, ParticleField, SceneObject};
use crate::params::VisualizerParams;
use crate::signal::{Band, BeatEvent, BeatTracker};
use crate::trail::{RibbonBuilder, RibbonGeometry, Trail};

/// Summary of the last advanced frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Scene time of the frame (seconds)
    pub time_s: f64,
    /// Current tempo estimate
    pub bpm: f32,
    /// Beats detected so far
    pub beats: u64,
    /// Mean smoothed helix energy
    pub overall: f32,
}

/// Spectrum snapshot after the per-frame checks
#[derive(Debug, Clone, Copy)]
enum Gated<'a> {
    Audio(&'a [u8]),
    /// All-zero snapshot while `silence_as_idle` is set
    Silent,
    /// No snapshot, or one of the wrong length
    Absent,
}

impl<'a> Gated<'a> {
    fn audio(self) -> Option<&'a [u8]> {
        match self {
            Gated::Audio(bins) => Some(bins),
            Gated::Silent | Gated::Absent => None,
        }
    }
}

/// Audio-reactive scene: the single per-frame entry point
pub struct Visualizer {
    params: VisualizerParams,
    beat: BeatTracker,
    motion: MotionDriver,
    ribbon: RibbonBuilder,
    /// One trail per satellite, same order
    trails: Vec<Trail>,
    stats: FrameStats,
    last_beat: Option<BeatEvent>,
    warned_length: bool,
}

impl Visualizer {
    /// Validate `params` and pre-allocate every buffer
    pub fn new(params: VisualizerParams) -> Result<Self> {
        params.validate()?;

        let motion = MotionDriver::new(&params)?;
        let ribbon = RibbonBuilder::new(params.trail.vertex_budget, params.trail.taper);

        let satellites = motion.satellites();
        let trails = (0..satellites.len())
            .map(|i| {
                let bonus = if satellites.band(i) == Some(Band::Bass) {
                    params.trail.bass_width_bonus
                } else {
                    0.0
                };
                Trail::new(&ribbon, params.trail.history_capacity, params.trail.width + bonus)
            })
            .collect();

        debug!(
            "Visualizer ready: {} objects, {} trails, {} particles, orb {}",
            motion.objects().len(),
            satellites.len(),
            motion.particles().len(),
            if params.orb.enabled { "on" } else { "off" }
        );

        Ok(Self {
            beat: BeatTracker::new(params.beat.clone()),
            params,
            motion,
            ribbon,
            trails,
            stats: FrameStats::default(),
            last_beat: None,
            warned_length: false,
        })
    }

    /// Advance one frame
    ///
    /// `spectrum` is the current magnitude snapshot (`None` when no audio is
    /// available). Wrong-length snapshots count as no audio. All-zero ones
    /// drive motion from the neutral values when `silence_as_idle` is set,
    /// but still feed zero bass to the beat tracker.
    pub fn advance(&mut self, spectrum: Option<&[u8]>, time_s: f64, delta_s: f32) -> &FrameStats {
        let gated = self.gate(spectrum);
        let now_ms = time_s * 1000.0;

        self.motion.listen(gated.audio());
        // Neutral input must not look like a spike, so absent frames skip the tracker
        self.last_beat = match gated {
            Gated::Audio(_) => self.beat.observe(self.motion.raw_bass(), now_ms),
            Gated::Silent => self.beat.observe(0.0, now_ms),
            Gated::Absent => None,
        };

        let time = time_s as f32;
        self.motion.drive(time, delta_s, self.beat.bpm());

        let satellites = self.motion.satellites();
        for (i, trail) in self.trails.iter_mut().enumerate() {
            trail.advance(&self.ribbon, satellites.position(i), satellites.energy(i));
        }

        self.stats = FrameStats {
            time_s,
            bpm: self.beat.bpm(),
            beats: self.beat.beat_count(),
            overall: self.motion.helix_overall(),
        };
        &self.stats
    }

    fn gate<'a>(&mut self, spectrum: Option<&'a [u8]>) -> Gated<'a> {
        let Some(bins) = spectrum else {
            return Gated::Absent;
        };
        let expected = self.params.spectrum.bin_count;

        if bins.len() != expected {
            if !self.warned_length {
                warn!(
                    "Spectrum has {} bins, expected {}; treating as no audio",
                    bins.len(),
                    expected
                );
                self.warned_length = true;
            }
            return Gated::Absent;
        }
        if self.params.spectrum.silence_as_idle && bins.iter().all(|&b| b == 0) {
            return Gated::Silent;
        }
        Gated::Audio(bins)
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Beat detected on the last frame, if any
    pub fn last_beat(&self) -> Option<BeatEvent> {
        self.last_beat
    }

    pub fn bpm(&self) -> f32 {
        self.beat.bpm()
    }

    pub fn beat_count(&self) -> u64 {
        self.beat.beat_count()
    }

    pub fn beat_tracker(&self) -> &BeatTracker {
        &self.beat
    }

    pub fn motion(&self) -> &MotionDriver {
        &self.motion
    }

    pub fn params(&self) -> &VisualizerParams {
        &self.params
    }

    pub fn objects(&self) -> &[SceneObject] {
        self.motion.objects()
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.motion.object(id)
    }

    pub fn connectors(&self) -> &[Connector] {
        self.motion.connectors()
    }

    pub fn trails(&self) -> &[Trail] {
        &self.trails
    }

    /// Ribbon geometry of satellite `i`'s trail
    pub fn ribbon(&self, i: usize) -> Option<&RibbonGeometry> {
        self.trails.get(i).map(|t| &t.ribbon)
    }

    /// Triangle list shared by every ribbon
    pub fn ribbon_indices(&self) -> &[u32] {
        self.ribbon.indices()
    }

    pub fn particles(&self) -> &ParticleField {
        self.motion.particles()
    }

    pub fn orb(&self) -> Option<&OrbState> {
        self.motion.orb()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{PulseSource, SpectrumSource};
    use approx::assert_relative_eq;

    const FRAME_S: f64 = 1.0 / 60.0;

    fn visualizer() -> Visualizer {
        Visualizer::new(VisualizerParams::default()).unwrap()
    }

    #[test]
    fn test_invalid_params_rejected() {
        let mut params = VisualizerParams::default();
        params.trail.vertex_budget = 1;
        assert!(Visualizer::new(params).is_err());

        let mut params = VisualizerParams::default();
        params.spectrum.bin_count = 100;
        assert!(Visualizer::new(params).is_err());
    }

    #[test]
    fn test_trail_widths() {
        let vis = visualizer();
        let widths: Vec<f32> = vis.trails().iter().map(|t| t.width).collect();
        // Satellites 1 and 4 follow bass
        assert_relative_eq!(widths[0], 0.08, epsilon = 1e-6);
        assert_relative_eq!(widths[1], 0.06, epsilon = 1e-6);
        assert_relative_eq!(widths[2], 0.06, epsilon = 1e-6);
        assert_relative_eq!(widths[3], 0.08, epsilon = 1e-6);
    }

    #[test]
    fn test_wrong_length_is_no_audio() {
        let mut vis = visualizer();
        let loud = [255u8; 128];
        for frame in 0..120 {
            vis.advance(Some(&loud), frame as f64 * FRAME_S, FRAME_S as f32);
        }
        assert_eq!(vis.beat_count(), 0);
        assert_eq!(vis.beat_tracker().history_len(), 0);
        assert_relative_eq!(vis.stats().overall, 0.3, epsilon = 1e-6);
    }

    #[test]
    fn test_all_zero_is_idle() {
        let mut vis = visualizer();
        let silent = [0u8; 256];
        for frame in 0..120 {
            vis.advance(Some(&silent), frame as f64 * FRAME_S, FRAME_S as f32);
        }
        // Motion idles, but the tracker still sees the silence
        assert_eq!(vis.beat_tracker().history_len(), 30);
        assert_eq!(vis.beat_count(), 0);
        assert_relative_eq!(vis.stats().overall, 0.3, epsilon = 1e-6);
    }

    #[test]
    fn test_hits_between_digital_silence_are_beats() {
        let mut vis = visualizer();
        let mut source = PulseSource::new(256, 120.0).with_levels(0, 230);
        for frame in 0..480 {
            let time_s = frame as f64 * FRAME_S;
            vis.advance(source.spectrum(time_s), time_s, FRAME_S as f32);
        }
        assert!(vis.beat_count() >= 12, "only {} beats", vis.beat_count());
        assert!((vis.bpm() - 120.0).abs() < 2.0, "bpm {}", vis.bpm());
    }

    #[test]
    fn test_all_zero_counts_when_idle_disabled() {
        let mut params = VisualizerParams::default();
        params.spectrum.silence_as_idle = false;
        let mut vis = Visualizer::new(params).unwrap();

        let silent = [0u8; 256];
        for frame in 0..120 {
            vis.advance(Some(&silent), frame as f64 * FRAME_S, FRAME_S as f32);
        }
        assert_eq!(vis.beat_tracker().history_len(), 30);
        assert!(vis.stats().overall < 0.3);
    }

    #[test]
    fn test_ribbons_follow_satellites() {
        let mut vis = visualizer();
        vis.advance(None, 0.0, FRAME_S as f32);
        assert!(!vis.ribbon(0).unwrap().is_renderable());

        vis.advance(None, FRAME_S, FRAME_S as f32);
        let ribbon = vis.ribbon(0).unwrap();
        assert!(ribbon.is_renderable());
        assert_eq!(ribbon.vertices.len(), 120);
        assert_eq!(vis.ribbon_indices().len(), 59 * 6);

        let id = vis.motion().satellite_id(0).unwrap();
        let head = vis.object(id).unwrap().pose.position;
        assert_eq!(vis.trails()[0].history.head(), Some(head));
        // Idle satellite energy
        assert_relative_eq!(ribbon.intensity(), 0.2);
    }

    #[test]
    fn test_stats_report_frame() {
        let mut vis = visualizer();
        let stats = *vis.advance(None, 2.5, FRAME_S as f32);
        assert_eq!(stats.time_s, 2.5);
        assert_relative_eq!(stats.bpm, 120.0);
        assert_eq!(stats.beats, 0);
    }
}
