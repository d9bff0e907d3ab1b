//! Owns the listeners and object arena; turns one spectrum frame into poses.

use glam::{Quat, Vec3};

use super::{
    Connector, Helix, ObjectId, ObjectKind, Orb, OrbState, ParticleField, Satellites, SceneObject,
};
use crate::error::Result;
use crate::params::{RotationParams, VisualizerParams};
use crate::signal::{Band, Listener, Smoother};

/// Per-frame motion for every animated object
///
/// Object arena layout: helix strand 1, helix strand 2, then satellites.
pub struct MotionDriver {
    helix_listener: Listener,
    satellite_listener: Listener,
    particle_listener: Listener,
    orb_listener: Option<Listener>,

    rotation: RotationParams,
    speed: Smoother,
    /// Accumulated rotation about Y (radians)
    angle: f32,

    helix: Helix,
    satellites: Satellites,
    particles: ParticleField,
    orb: Option<Orb>,

    objects: Vec<SceneObject>,
    connectors: Vec<Connector>,
}

impl MotionDriver {
    pub fn new(params: &VisualizerParams) -> Result<Self> {
        params.rotation.validate()?;
        params.helix.validate()?;
        params.particles.validate()?;

        let bins = params.spectrum.bin_count;
        let listeners = &params.listeners;

        let helix = Helix::new(params.helix.clone());
        let satellites = Satellites::new(params.satellites.clone());
        let nodes = helix.node_count();

        let mut objects = Vec::with_capacity(nodes * 2 + satellites.len());
        for strand in 0..2u8 {
            objects.extend(
                (0..nodes).map(|index| SceneObject::new(ObjectKind::HelixNode { strand, index })),
            );
        }
        objects.extend(
            (0..satellites.len()).map(|index| SceneObject::new(ObjectKind::Satellite { index })),
        );

        let (orb_listener, orb) = if params.orb.enabled {
            (
                Some(Listener::new("orb", &listeners.orb, bins)?),
                Some(Orb::new(&params.orb)),
            )
        } else {
            (None, None)
        };

        Ok(Self {
            helix_listener: Listener::new("helix", &listeners.helix, bins)?,
            satellite_listener: Listener::new("satellites", &listeners.satellites, bins)?,
            particle_listener: Listener::new("particles", &listeners.particles, bins)?,
            orb_listener,
            rotation: params.rotation.clone(),
            speed: Smoother::new(params.rotation.initial_speed, params.rotation.rate),
            angle: 0.0,
            connectors: vec![Connector::default(); helix.connector_count()],
            helix,
            satellites,
            particles: ParticleField::new(params.particles.clone()),
            orb,
            objects,
        })
    }

    /// Extract and smooth this frame's spectrum for every listener
    pub fn listen(&mut self, spectrum: Option<&[u8]>) {
        self.helix_listener.listen(spectrum);
        self.satellite_listener.listen(spectrum);
        self.particle_listener.listen(spectrum);
        if let Some(listener) = &mut self.orb_listener {
            listener.listen(spectrum);
        }
    }

    /// Un-smoothed helix bass of the current frame (beat detector input)
    pub fn raw_bass(&self) -> f32 {
        self.helix_listener.raw(Band::Bass)
    }

    /// Advance every object to `time_s`, spinning the helix at a speed
    /// eased toward the tempo
    pub fn drive(&mut self, time_s: f32, delta_s: f32, bpm: f32) {
        let target = if bpm.is_finite() {
            (bpm / self.rotation.bpm_scale).clamp(self.rotation.min_speed, self.rotation.max_speed)
        } else {
            self.speed.value()
        };
        let speed = self.speed.step(target);
        if delta_s.is_finite() && delta_s > 0.0 {
            self.angle += delta_s * speed;
        }

        let strand_len = self.helix.node_count() * 2;
        let (strands, satellites) = self.objects.split_at_mut(strand_len);
        self.helix
            .update(&self.helix_listener, time_s, self.angle, strands, &mut self.connectors);
        self.satellites
            .update(&self.satellite_listener, time_s, satellites);

        self.particles
            .update(self.particle_listener.smoothed(Band::Mid), time_s);

        if let (Some(orb), Some(listener)) = (&mut self.orb, &self.orb_listener) {
            orb.update(listener.smoothed(Band::Bass), time_s);
        }
    }

    /// Id of helix node `index` on `strand` (0 or 1)
    pub fn helix_node_id(&self, strand: u8, index: usize) -> Option<ObjectId> {
        let nodes = self.helix.node_count();
        (strand < 2 && index < nodes).then(|| ObjectId(strand as usize * nodes + index))
    }

    pub fn satellite_id(&self, index: usize) -> Option<ObjectId> {
        (index < self.satellites.len()).then(|| ObjectId(self.helix.node_count() * 2 + index))
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.index())
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn satellites(&self) -> &Satellites {
        &self.satellites
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    /// Particle positions with the group rotation applied
    pub fn particle_world_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        let rotation: Quat = self.particles.rotation();
        self.particles.positions().iter().map(move |p| rotation * *p)
    }

    pub fn orb(&self) -> Option<&OrbState> {
        self.orb.as_ref().map(Orb::state)
    }

    /// Current smoothed rotation speed (radians per second)
    pub fn rotation_speed(&self) -> f32 {
        self.speed.value()
    }

    /// Accumulated helix rotation (radians)
    pub fn rotation_angle(&self) -> f32 {
        self.angle
    }

    pub fn helix_listener(&self) -> &Listener {
        &self.helix_listener
    }

    pub fn satellite_listener(&self) -> &Listener {
        &self.satellite_listener
    }

    /// Mean smoothed helix energy across its bands
    pub fn helix_overall(&self) -> f32 {
        self.helix_listener.overall()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn driver() -> MotionDriver {
        MotionDriver::new(&VisualizerParams::default()).unwrap()
    }

    #[test]
    fn test_arena_layout() {
        let driver = driver();
        assert_eq!(driver.objects().len(), 35 * 2 + 4);
        assert_eq!(driver.connectors().len(), 9);

        let id = driver.helix_node_id(1, 3).unwrap();
        assert_eq!(
            driver.object(id).unwrap().kind,
            ObjectKind::HelixNode { strand: 1, index: 3 }
        );
        let id = driver.satellite_id(2).unwrap();
        assert_eq!(driver.object(id).unwrap().kind, ObjectKind::Satellite { index: 2 });

        assert!(driver.helix_node_id(2, 0).is_none());
        assert!(driver.satellite_id(4).is_none());
        assert!(driver.orb().is_none());
    }

    #[test]
    fn test_rotation_speed_clamps() {
        let mut fast = driver();
        let mut slow = driver();
        for frame in 0..2000 {
            let t = frame as f32 / 60.0;
            fast.drive(t, 1.0 / 60.0, 400.0);
            slow.drive(t, 1.0 / 60.0, 10.0);
        }
        assert_relative_eq!(fast.rotation_speed(), 0.6, epsilon = 1e-4);
        assert_relative_eq!(slow.rotation_speed(), 0.15, epsilon = 1e-4);
    }

    #[test]
    fn test_rotation_eases_from_initial() {
        let mut driver = driver();
        driver.drive(0.0, 1.0 / 60.0, 90.0);
        // 0.3 + (0.5 - 0.3) * 0.02
        assert_relative_eq!(driver.rotation_speed(), 0.304, epsilon = 1e-6);
        assert_relative_eq!(driver.rotation_angle(), 0.304 / 60.0, epsilon = 1e-6);
    }

    #[test]
    fn test_non_finite_inputs_hold_speed() {
        let mut driver = driver();
        driver.drive(0.0, 1.0 / 60.0, f32::NAN);
        driver.drive(0.1, f32::NAN, f32::INFINITY);
        assert_relative_eq!(driver.rotation_speed(), 0.3, epsilon = 1e-6);
        assert_relative_eq!(driver.rotation_angle(), 0.3 / 60.0, epsilon = 1e-6);
        assert!(driver.objects().iter().all(|o| o.pose.position.is_finite()));
    }

    #[test]
    fn test_orb_enabled() {
        let mut params = VisualizerParams::default();
        params.orb.enabled = true;
        let mut driver = MotionDriver::new(&params).unwrap();

        driver.listen(None);
        driver.drive(0.0, 1.0 / 60.0, 120.0);
        let orb = driver.orb().unwrap();
        // Orb neutral bass
        assert_relative_eq!(orb.intensity, 0.2);
    }

    #[test]
    fn test_raw_bass_follows_spectrum() {
        let mut driver = driver();
        let mut spectrum = [0u8; 256];
        spectrum[..10].fill(255);
        driver.listen(Some(&spectrum));
        // Helix bass spans bins 0..25
        assert_relative_eq!(driver.raw_bass(), 10.0 / 25.0, epsilon = 1e-6);

        driver.listen(None);
        assert_relative_eq!(driver.raw_bass(), 0.3);
    }
}
