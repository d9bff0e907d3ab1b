//! Double helix whose radius bulges with the band under each node.

use glam::{Quat, Vec3};
use std::f32::consts::{PI, TAU};

use super::{modulate, Connector, ObjectUniforms, Pose, SceneObject};
use crate::params::HelixParams;
use crate::signal::{Band, Listener};

/// Position along the helix (0..1) → band, first entry with `t < bound` wins
///
/// A lookup, not an interpolation: band boundaries stay visible.
pub const HELIX_BAND_TABLE: [(f32, Band); 5] = [
    (0.2, Band::Bass),
    (0.4, Band::LowMid),
    (0.6, Band::Mid),
    (0.8, Band::HighMid),
    (f32::INFINITY, Band::High),
];

pub fn band_for_position(t: f32) -> Band {
    HELIX_BAND_TABLE
        .iter()
        .find(|(bound, _)| t < *bound)
        .map_or(Band::High, |(_, band)| *band)
}

/// Precomputed node on the helix centre line
#[derive(Clone, Copy, Debug)]
struct Node {
    angle: f32,
    y: f32,
    band: Band,
}

/// Helix layout plus per-frame pose computation
pub struct Helix {
    params: HelixParams,
    nodes: Vec<Node>,
    /// Node indices that carry a connector
    connectors: Vec<usize>,
}

impl Helix {
    pub fn new(params: HelixParams) -> Self {
        let count = params.node_count;
        let nodes = (0..count)
            .map(|i| {
                let t = i as f32 / (count - 1) as f32;
                Node {
                    angle: t * TAU * params.turns,
                    y: (t - 0.5) * params.height,
                    band: band_for_position(t),
                }
            })
            .collect();
        let connectors = (0..count).step_by(params.connector_stride).collect();

        Self {
            params,
            nodes,
            connectors,
        }
    }

    /// Nodes per strand
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    /// Band driving node `i`
    pub fn node_band(&self, i: usize) -> Option<Band> {
        self.nodes.get(i).map(|n| n.band)
    }

    /// Write both strands into `strands` (strand 1 then strand 2) and the
    /// connectors into `connectors`, rotated by `rotation` about Y
    pub fn update(
        &self,
        listener: &Listener,
        time_s: f32,
        rotation: f32,
        strands: &mut [SceneObject],
        connectors: &mut [Connector],
    ) {
        let group = Quat::from_rotation_y(rotation);
        let count = self.nodes.len();

        for (i, node) in self.nodes.iter().enumerate() {
            let energy = listener.smoothed(node.band);
            let radius = modulate(self.params.base_radius, energy, self.params.radius_gain);
            let scale = modulate(self.params.node_size, energy, self.params.scale_gain);
            let uniforms = ObjectUniforms {
                time: time_s,
                intensity: energy,
            };

            for (strand, offset) in [(0, 0.0), (1, PI)] {
                let position = group * strand_point(node.angle + offset, node.y, radius);
                strands[strand * count + i].pose = Pose {
                    position,
                    scale,
                    rotation: group,
                };
                strands[strand * count + i].uniforms = uniforms;
            }
        }

        for (slot, &i) in self.connectors.iter().enumerate() {
            let node = self.nodes[i];
            let energy = listener.smoothed(node.band);
            let radius = modulate(self.params.base_radius, energy, self.params.radius_gain);

            connectors[slot] = Connector {
                start: group * strand_point(node.angle, node.y, radius),
                end: group * strand_point(node.angle + PI, node.y, radius),
                opacity: self.params.connector_opacity
                    + energy * self.params.connector_opacity_gain,
            };
        }
    }
}

fn strand_point(angle: f32, y: f32, radius: f32) -> Vec3 {
    Vec3::new(angle.cos() * radius, y, angle.sin() * radius)
}
