//! Beat detection and tempo estimation from raw bass energy.
//!
//! Continuous detector: a beat is a spike of the raw bass energy above its own
//! rolling average, gated by an absolute floor and a refractory period. Each
//! plausible inter-beat interval is blended into a running estimate.

use std::collections::VecDeque;
use tracing::{debug, trace};

use crate::params::BeatParams;

/// A detected beat
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatEvent {
    /// Event time (milliseconds)
    pub at_ms: f64,

    /// Time since the previous beat (milliseconds)
    pub interval_ms: f64,

    /// Whether the interval was inside the plausible window and blended
    /// into the tempo estimate
    pub accepted: bool,
}

/// Beat detector with a fixed-capacity energy history
pub struct BeatTracker {
    params: BeatParams,
    history: VecDeque<f32>,
    last_beat_ms: f64,
    interval_ms: f64,
    beats: u64,
}

impl BeatTracker {
    /// A zero `history_len` is raised to one
    pub fn new(mut params: BeatParams) -> Self {
        params.history_len = params.history_len.max(1);
        let history = VecDeque::with_capacity(params.history_len);
        let interval_ms = params.seed_interval_ms;
        Self {
            params,
            history,
            last_beat_ms: 0.0,
            interval_ms,
            beats: 0,
        }
    }

    /// Feed one frame of raw bass energy observed at `now_ms`
    ///
    /// Note: an implausible interval still moves `last_beat_ms` forward even
    /// though it is not blended into the tempo estimate, so it consumes the
    /// refractory window without changing tempo.
    pub fn observe(&mut self, bass: f32, now_ms: f64) -> Option<BeatEvent> {
        while self.history.len() >= self.params.history_len {
            self.history.pop_front();
        }
        self.history.push_back(bass);

        let average = self.average_energy();
        let since_last = now_ms - self.last_beat_ms;

        let is_beat = bass > average * self.params.spike_ratio
            && bass > self.params.energy_floor
            && since_last > self.params.refractory_ms;

        if !is_beat {
            return None;
        }

        let accepted =
            since_last > self.params.min_interval_ms && since_last < self.params.max_interval_ms;
        if accepted {
            let blend = self.params.tempo_blend;
            self.interval_ms = self.interval_ms * (1.0 - blend) + since_last * blend;
            debug!(
                "Tempo update: interval {:.1} ms → estimate {:.1} ms ({:.1} BPM)",
                since_last,
                self.interval_ms,
                self.bpm()
            );
        }

        self.last_beat_ms = now_ms;
        self.beats += 1;
        trace!(
            "Beat #{} at {:.1} ms (bass {:.3}, avg {:.3})",
            self.beats,
            now_ms,
            bass,
            average
        );

        Some(BeatEvent {
            at_ms: now_ms,
            interval_ms: since_last,
            accepted,
        })
    }

    /// Mean of the energy history (0 before the first sample)
    pub fn average_energy(&self) -> f32 {
        if self.history.is_empty() {
            return 0.0;
        }
        self.history.iter().sum::<f32>() / self.history.len() as f32
    }

    /// Tempo derived from the interval estimate
    ///
    /// Unclamped: consumers clamp to their own useful range.
    pub fn bpm(&self) -> f32 {
        (60_000.0 / self.interval_ms) as f32
    }

    pub fn interval_estimate_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn last_beat_ms(&self) -> f64 {
        self.last_beat_ms
    }

    /// Beats detected since construction
    pub fn beat_count(&self) -> u64 {
        self.beats
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}
