//! Bodies on tilted orbits, each listening to one band.

use glam::{EulerRot, Quat, Vec3};

use super::{modulate, ObjectUniforms, Pose, SceneObject};
use crate::params::{SatelliteParams, SatelliteSpec};
use crate::signal::{Band, Listener};

/// Orbit state for every satellite
pub struct Satellites {
    specs: Vec<SatelliteSpec>,
    tilts: Vec<Quat>,
    radius_push: f32,
    scale_gain: f32,
    /// This frame's positions (scratch, reused every frame)
    positions: Vec<Vec3>,
    /// This frame's band energy per satellite
    energies: Vec<f32>,
}

impl Satellites {
    pub fn new(params: SatelliteParams) -> Self {
        let tilts = params
            .satellites
            .iter()
            .map(|s| Quat::from_euler(EulerRot::XYZ, s.tilt[0], s.tilt[1], s.tilt[2]))
            .collect();
        let count = params.satellites.len();

        Self {
            specs: params.satellites,
            tilts,
            radius_push: params.radius_push,
            scale_gain: params.scale_gain,
            positions: vec![Vec3::ZERO; count],
            energies: vec![0.0; count],
        }
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn band(&self, i: usize) -> Option<Band> {
        self.specs.get(i).map(|s| s.band)
    }

    /// Position computed on the last update
    pub fn position(&self, i: usize) -> Vec3 {
        self.positions.get(i).copied().unwrap_or(Vec3::ZERO)
    }

    /// Band energy used on the last update (trail intensity)
    pub fn energy(&self, i: usize) -> f32 {
        self.energies.get(i).copied().unwrap_or(0.0)
    }

    /// Orbit every satellite to `time_s`, writing one object per satellite
    pub fn update(&mut self, listener: &Listener, time_s: f32, objects: &mut [SceneObject]) {
        for (i, spec) in self.specs.iter().enumerate() {
            let energy = listener.smoothed(spec.band);

            let angle = time_s * spec.orbit_speed + spec.phase;
            let radius = spec.orbit_radius + energy * self.radius_push;
            let flat = Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius);
            let position = self.tilts[i] * flat;

            objects[i].pose = Pose {
                position,
                scale: modulate(spec.size, energy, self.scale_gain),
                rotation: self.tilts[i],
            };
            objects[i].uniforms = ObjectUniforms {
                time: time_s,
                intensity: energy,
            };

            self.positions[i] = position;
            self.energies[i] = energy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::ObjectKind;
    use crate::params::ListenerParams;
    use approx::assert_relative_eq;

    fn setup() -> (Satellites, Listener, Vec<SceneObject>) {
        let satellites = Satellites::new(SatelliteParams::default());
        let listener = Listener::new("satellites", &ListenerParams::satellites(), 256).unwrap();
        let objects = (0..satellites.len())
            .map(|index| SceneObject::new(ObjectKind::Satellite { index }))
            .collect();
        (satellites, listener, objects)
    }

    #[test]
    fn test_orbit_radius_with_idle_energy() {
        let (mut satellites, listener, mut objects) = setup();
        satellites.update(&listener, 3.0, &mut objects);

        // Tilt is a rotation: distance from origin is the orbit radius
        let params = SatelliteParams::default();
        for (i, spec) in params.satellites.iter().enumerate() {
            let expected = spec.orbit_radius + 0.2 * 0.3;
            assert_relative_eq!(satellites.position(i).length(), expected, epsilon = 1e-5);
            assert_relative_eq!(objects[i].pose.scale, spec.size * (1.0 + 0.2 * 0.4));
            assert_eq!(objects[i].pose.position, satellites.position(i));
        }
    }

    #[test]
    fn test_untilted_orbit_starts_at_phase() {
        let mut params = SatelliteParams::default();
        params.satellites.truncate(1);
        params.satellites[0].tilt = [0.0; 3];
        let mut satellites = Satellites::new(params);
        let (_, listener, mut objects) = setup();

        satellites.update(&listener, 0.0, &mut objects);
        let p = satellites.position(0);
        assert_relative_eq!(p.x, 3.8 + 0.06, epsilon = 1e-5);
        assert_relative_eq!(p.y, 0.0);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_motion_is_deterministic() {
        let (mut a, listener, mut objects_a) = setup();
        let (mut b, _, mut objects_b) = setup();

        a.update(&listener, 12.5, &mut objects_a);
        b.update(&listener, 12.5, &mut objects_b);
        assert_eq!(objects_a, objects_b);
    }
}
