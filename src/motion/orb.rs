//! Central orb: layered spheres that breathe, spin and cycle a palette.

use glam::Vec3;

use crate::params::OrbParams;
use crate::signal::Smoother;

// Easing rates toward each layer's target scale
const OUTER_EASE: f32 = 0.04;
const INNER_EASE: f32 = 0.05;
const GLOW_EASE: f32 = 0.03;
const COLOR_EASE: f32 = 0.02;
const EMISSIVE_EASE: f32 = 0.03;

/// Per-frame orb outputs for the renderer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbState {
    /// Smoothed bass energy
    pub intensity: f32,
    /// Slow 0..1 breathing cycle
    pub breathe: f32,

    pub outer_scale: f32,
    pub inner_scale: f32,
    pub core_scale: f32,
    pub glow_scale: f32,

    /// Euler angles (radians); outer accumulates, the rest follow time
    pub outer_rotation: Vec3,
    pub inner_rotation: Vec3,
    pub core_rotation: Vec3,
    pub glow_rotation: Vec3,

    /// Palette position 0..1 the colour is easing toward
    pub color_blend: f32,
    pub color: Vec3,
    pub emissive: Vec3,
    pub emissive_intensity: f32,

    /// Surface distortion amount and speed
    pub distort: f32,
    pub distort_speed: f32,
}

/// Orb animation state
pub struct Orb {
    palette: Vec<Vec3>,
    breathe_speed: f32,
    color_speed: f32,
    outer: Smoother,
    inner: Smoother,
    core: Smoother,
    glow: Smoother,
    base: [f32; 4],
    state: OrbState,
}

impl Orb {
    pub fn new(params: &OrbParams) -> Self {
        let palette: Vec<Vec3> = params.palette.iter().copied().map(Vec3::from_array).collect();
        let first = palette.first().copied().unwrap_or(Vec3::ONE);

        Self {
            breathe_speed: params.breathe_speed,
            color_speed: params.color_speed,
            outer: Smoother::new(params.outer_scale, OUTER_EASE),
            inner: Smoother::new(params.inner_scale, INNER_EASE),
            core: Smoother::new(params.core_scale, INNER_EASE),
            glow: Smoother::new(params.glow_scale, GLOW_EASE),
            base: [
                params.outer_scale,
                params.inner_scale,
                params.core_scale,
                params.glow_scale,
            ],
            state: OrbState {
                intensity: 0.0,
                breathe: 0.0,
                outer_scale: params.outer_scale,
                inner_scale: params.inner_scale,
                core_scale: params.core_scale,
                glow_scale: params.glow_scale,
                outer_rotation: Vec3::ZERO,
                inner_rotation: Vec3::ZERO,
                core_rotation: Vec3::ZERO,
                glow_rotation: Vec3::ZERO,
                color_blend: 0.0,
                color: first,
                emissive: Vec3::ZERO,
                emissive_intensity: 0.0,
                distort: 0.0,
                distort_speed: 0.0,
            },
            palette,
        }
    }

    /// Advance one frame with smoothed bass `intensity`
    pub fn update(&mut self, intensity: f32, time_s: f32) -> &OrbState {
        let i = intensity;
        let b = (time_s * self.breathe_speed).sin() * 0.5 + 0.5;
        let [outer, inner, core, glow] = self.base;
        let s = &mut self.state;

        s.intensity = i;
        s.breathe = b;
        s.distort = 0.25 + i * 0.3 + b * 0.05;
        s.distort_speed = 1.5 + i * 2.0;

        s.color_blend = ((time_s * self.color_speed).sin() * 0.5 + 0.5 + i * 0.2).rem_euclid(1.0);
        let target = lerp_palette(&self.palette, s.color_blend);
        s.color = s.color.lerp(target, COLOR_EASE);

        let emissive_t = ((time_s * 0.15 + 0.5).sin() * 0.5 + 0.5).rem_euclid(1.0);
        let emissive = lerp_palette(&self.palette, emissive_t) * (0.4 + i * 0.3);
        s.emissive = s.emissive.lerp(emissive, EMISSIVE_EASE);
        s.emissive_intensity = 0.6 + i * 0.8 + b * 0.1;

        s.outer_scale = self.outer.step(outer + i * 0.4 + b * 0.08);
        s.outer_rotation.x += 0.001 + i * 0.003;
        s.outer_rotation.y += 0.002 + i * 0.004;

        s.inner_scale = self.inner.step(inner + i * 0.15 + b * 0.05);
        s.inner_rotation = Vec3::new(time_s * 0.1, -time_s * 0.15, time_s * 0.08);

        s.core_scale = self.core.step(core + i * 0.1 + (1.0 - b) * 0.05);
        s.core_rotation = Vec3::new(-time_s * 0.08, time_s * 0.12, -time_s * 0.06);

        s.glow_scale = self.glow.step(glow + b * 0.15 + i * 0.3);
        s.glow_rotation = Vec3::new(0.0, time_s * 0.02, 0.0);

        &self.state
    }

    pub fn state(&self) -> &OrbState {
        &self.state
    }
}

/// Piecewise-linear colour at `t` (0..1) across `palette`
pub fn lerp_palette(palette: &[Vec3], t: f32) -> Vec3 {
    match palette.len() {
        0 => Vec3::ONE,
        1 => palette[0],
        n => {
            let index = t.clamp(0.0, 1.0) * (n - 1) as f32;
            let lower = (index.floor() as usize).min(n - 1);
            let upper = (lower + 1).min(n - 1);
            palette[lower].lerp(palette[upper], index - lower as f32)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lerp_palette_endpoints() {
        let palette = [Vec3::ZERO, Vec3::X, Vec3::Y];
        assert_eq!(lerp_palette(&palette, 0.0), Vec3::ZERO);
        assert_eq!(lerp_palette(&palette, 1.0), Vec3::Y);
        assert_eq!(lerp_palette(&palette, 0.5), Vec3::X);
        assert_eq!(lerp_palette(&palette, 0.25), Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(lerp_palette(&[], 0.3), Vec3::ONE);
    }

    #[test]
    fn test_scales_ease_toward_targets() {
        let mut orb = Orb::new(&OrbParams::default());
        let start = orb.state().outer_scale;
        for frame in 0..600 {
            orb.update(1.0, frame as f32 / 60.0);
        }
        // Loud bass grows the outer shell well past its resting size
        assert!(orb.state().outer_scale > start + 0.3);
    }

    #[test]
    fn test_color_blend_wraps() {
        let mut orb = Orb::new(&OrbParams::default());
        for frame in 0..2000 {
            let state = orb.update(1.0, frame as f32 * 0.1);
            assert!((0.0..1.0).contains(&state.color_blend));
        }
    }

    #[test]
    fn test_first_frame_values() {
        let mut orb = Orb::new(&OrbParams::default());
        let state = *orb.update(0.0, 0.0);

        // sin(0) = 0 → breathe at mid cycle
        assert_relative_eq!(state.breathe, 0.5);
        assert_relative_eq!(state.distort, 0.25 + 0.5 * 0.05);
        assert_relative_eq!(state.emissive_intensity, 0.6 + 0.05);
        assert_relative_eq!(state.outer_rotation.y, 0.002);
    }
}
