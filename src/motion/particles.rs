//! Ambient particle cloud that drifts, wobbles and breathes outward with the mids.

use glam::{EulerRot, Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::{PI, TAU};

use crate::params::ParticleParams;

// Per-axis wobble: (angular frequency, amplitude per frame, phase multiplier)
const WOBBLE_X: (f32, f32, f32) = (0.3, 0.003, 1.0);
const WOBBLE_Y: (f32, f32, f32) = (0.2, 0.002, 1.0);
const WOBBLE_Z: (f32, f32, f32) = (0.25, 0.002, 0.5);

/// Particle positions and their fixed drift inputs
pub struct ParticleField {
    params: ParticleParams,
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    phases: Vec<f32>,
    rotation: Quat,
}

impl ParticleField {
    /// Lay out `params.count` particles in a shell, reproducibly from `params.seed`
    pub fn new(params: ParticleParams) -> Self {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let count = params.count;
        let drift = params.drift.abs();

        let mut positions = Vec::with_capacity(count);
        let mut velocities = Vec::with_capacity(count);
        let mut phases = Vec::with_capacity(count);

        for _ in 0..count {
            // Uniform direction on the sphere
            let theta = rng.random::<f32>() * TAU;
            let phi = (2.0 * rng.random::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
            let r = params.radius * (0.5 + rng.random::<f32>() * 0.5);

            positions.push(Vec3::new(
                r * phi.sin() * theta.cos(),
                r * phi.sin() * theta.sin(),
                r * phi.cos(),
            ));
            velocities.push(Vec3::new(
                rng.random_range(-drift..=drift),
                rng.random_range(-drift..=drift),
                rng.random_range(-drift..=drift),
            ));
            phases.push(rng.random::<f32>() * PI * 2.0);
        }

        Self {
            params,
            positions,
            velocities,
            phases,
            rotation: Quat::IDENTITY,
        }
    }

    /// Advance one frame with the smoothed push `intensity` (0..1)
    pub fn update(&mut self, intensity: f32, time_s: f32) {
        let p = &self.params;
        let push = intensity * p.push_gain;
        let outer = p.radius * p.outer_limit;

        for ((pos, vel), &phase) in self
            .positions
            .iter_mut()
            .zip(&self.velocities)
            .zip(&self.phases)
        {
            *pos += *vel + wobble(time_s, phase);

            let dist = pos.length();
            if dist <= f32::EPSILON {
                continue;
            }
            let dir = *pos / dist;

            if dist > 0.1 {
                *pos += dir * push;
            }
            if dist > outer {
                *pos -= dir * p.pull_back;
            }
            if dist < p.inner_limit {
                *pos += dir * p.push_out;
            }
        }

        self.rotation = Quat::from_euler(
            EulerRot::XYZ,
            (time_s * 0.1).sin() * p.tilt_amplitude,
            time_s * p.spin_speed,
            0.0,
        );
    }

    /// Local-space positions (apply [`Self::rotation`] for world space)
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Whole-cloud rotation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

fn wobble(time_s: f32, phase: f32) -> Vec3 {
    let axis = |(freq, amp, mult): (f32, f32, f32)| (time_s * freq + phase * mult).sin() * amp;
    Vec3::new(
        axis(WOBBLE_X),
        // Y wobble is a cosine
        (time_s * WOBBLE_Y.0 + phase * WOBBLE_Y.2).cos() * WOBBLE_Y.1,
        axis(WOBBLE_Z),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_seeded() {
        let a = ParticleField::new(ParticleParams::default());
        let b = ParticleField::new(ParticleParams::default());
        assert_eq!(a.positions(), b.positions());

        let c = ParticleField::new(ParticleParams {
            seed: 7,
            ..Default::default()
        });
        assert_ne!(a.positions(), c.positions());
    }

    #[test]
    fn test_layout_in_shell() {
        let field = ParticleField::new(ParticleParams::default());
        assert_eq!(field.len(), 100);
        for p in field.positions() {
            let r = p.length();
            assert!((4.0 - 1e-3..=8.0 + 1e-3).contains(&r), "radius {}", r);
        }
    }

    #[test]
    fn test_audio_pushes_outward() {
        let mut quiet = ParticleField::new(ParticleParams::default());
        let mut loud = ParticleField::new(ParticleParams::default());

        for frame in 0..60 {
            let t = frame as f32 / 60.0;
            quiet.update(0.0, t);
            loud.update(1.0, t);
        }

        let mean = |f: &ParticleField| {
            f.positions().iter().map(|p| p.length()).sum::<f32>() / f.len() as f32
        };
        assert!(mean(&loud) > mean(&quiet));
    }

    #[test]
    fn test_cloud_stays_bounded() {
        let mut field = ParticleField::new(ParticleParams::default());
        // Ten minutes of steady mids: the pull-back outweighs push + drift
        for frame in 0..36_000 {
            field.update(0.5, frame as f32 / 60.0);
        }
        for p in field.positions() {
            assert!(p.length() < 8.0 * 1.2 + 0.1);
            assert!(p.is_finite());
        }
    }

    #[test]
    fn test_particle_at_origin_does_not_explode() {
        let mut field = ParticleField::new(ParticleParams {
            count: 1,
            drift: 0.0,
            ..Default::default()
        });
        field.positions[0] = Vec3::ZERO;
        field.update(1.0, 0.0);
        assert!(field.positions()[0].is_finite());
    }
}
