//! Helixio - headless audio-reactive visualizer driver
//!
//! Feeds a spectrum source through the visualizer at a fixed frame rate and
//! logs a summary every simulated second. Nothing is rendered.

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use helixio::cli::Args;
use helixio::scene::Visualizer;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let params = args
        .visualizer_params()
        .context("failed to load visualizer parameters")?;
    let bin_count = params.spectrum.bin_count;
    let mut visualizer = Visualizer::new(params).context("invalid visualizer parameters")?;
    let mut source = args
        .spectrum_source(bin_count)
        .context("failed to open spectrum source")?;

    let frames = args.frame_count();
    let fps = args.fps.max(1);
    let delta_s = 1.0 / fps as f32;
    info!(
        "Helixio: {} source, {} frames at {} fps",
        source.name(),
        frames,
        fps
    );

    for frame in 0..frames {
        let time_s = frame as f64 / fps as f64;
        let spectrum = source.spectrum(time_s);
        let stats = *visualizer.advance(spectrum, time_s, delta_s);

        if let Some(beat) = visualizer.last_beat() {
            debug!(
                "Beat at {:.2} s (interval {:.0} ms{})",
                time_s,
                beat.interval_ms,
                if beat.accepted { "" } else { ", ignored" }
            );
        }

        if (frame + 1) % fps as u64 == 0 {
            let motion = visualizer.motion();
            info!(
                "t={:5.1}s  bpm={:6.1}  beats={:4}  energy={:.3}  spin={:.3} rad/s",
                stats.time_s,
                stats.bpm,
                stats.beats,
                stats.overall,
                motion.rotation_speed()
            );
            if let Some(orb) = visualizer.orb() {
                info!(
                    "         orb scale={:.3}  distort={:.3}",
                    orb.outer_scale, orb.distort
                );
            }
        }
    }

    let stats = visualizer.stats();
    info!(
        "Done: {:.1} s simulated, {} beats, final tempo {:.1} BPM",
        stats.time_s, stats.beats, stats.bpm
    );
    Ok(())
}
