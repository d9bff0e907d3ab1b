//! Tapering ribbon strip built from a position history.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use super::history::TrailHistory;

/// Ribbon vertex record (position + UV + fade inputs)
///
/// `uv.x` and `progress` run 0 at the head to 1 at the tail; `uv.y` is 0 on
/// the left edge and 1 on the right.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct RibbonVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub progress: f32,
    pub intensity: f32,
}

/// Pre-allocated vertex array for one trailed object
///
/// Always holds `2 * segments` vertices, however short the history is.
#[derive(Debug, Clone)]
pub struct RibbonGeometry {
    pub vertices: Vec<RibbonVertex>,
    intensity: f32,
    renderable: bool,
}

impl RibbonGeometry {
    pub fn new(segments: usize) -> Self {
        Self {
            vertices: vec![RibbonVertex::default(); segments * 2],
            intensity: 0.0,
            renderable: false,
        }
    }

    /// Fewer than two history points yields a collapsed ribbon; renderers
    /// may skip it
    pub fn is_renderable(&self) -> bool {
        self.renderable
    }

    /// Intensity written into every vertex on the last build
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// (left, right) vertex pair for segment `i`
    pub fn pair(&self, i: usize) -> Option<(&RibbonVertex, &RibbonVertex)> {
        Some((self.vertices.get(i * 2)?, self.vertices.get(i * 2 + 1)?))
    }
}

/// Builds ribbons with a fixed segment budget and a shared index table
pub struct RibbonBuilder {
    segments: usize,
    taper: f32,
    indices: Vec<u32>,
}

impl RibbonBuilder {
    /// Create a builder for `segments` vertex pairs
    ///
    /// `TrailParams` requires at least 2 segments; fewer yield no triangles.
    pub fn new(segments: usize, taper: f32) -> Self {
        // Two triangles per quad between consecutive pairs
        let mut indices = Vec::with_capacity(segments.saturating_sub(1) * 6);
        for i in 0..segments.saturating_sub(1) {
            let i2 = (i * 2) as u32;
            indices.extend_from_slice(&[i2, i2 + 1, i2 + 2, i2 + 1, i2 + 3, i2 + 2]);
        }

        Self {
            segments,
            taper,
            indices,
        }
    }

    /// Static triangle connectivity, identical for every ribbon and frame
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    /// Allocate a geometry sized for this builder
    pub fn geometry(&self) -> RibbonGeometry {
        RibbonGeometry::new(self.segments)
    }

    /// Normalized position along the ribbon for segment `i` (0 = head)
    pub fn progress(&self, i: usize) -> f32 {
        if self.segments < 2 {
            return 0.0;
        }
        i as f32 / (self.segments - 1) as f32
    }

    /// Half-width at `progress`: `width` at the head, `width * (1 - taper)` at the tail
    pub fn half_width(&self, width: f32, progress: f32) -> f32 {
        width * (1.0 - progress * self.taper)
    }

    /// Recompute every vertex of `out` from `history`
    ///
    /// Segments beyond the recorded history clamp to the oldest known point,
    /// collapsing the tail onto itself.
    pub fn build(
        &self,
        history: &TrailHistory,
        width: f32,
        intensity: f32,
        out: &mut RibbonGeometry,
    ) {
        let len = history.len();

        for i in 0..self.segments {
            let src = i.min(len.saturating_sub(1));
            let point = history.get(src).unwrap_or(Vec3::ZERO);

            let progress = self.progress(i);
            let tangent = tangent_at(history, i, src);
            let perp = perpendicular(tangent);
            let offset = perp * self.half_width(width, progress);

            out.vertices[i * 2] = RibbonVertex {
                position: (point - offset).to_array(),
                uv: [progress, 0.0],
                progress,
                intensity,
            };
            out.vertices[i * 2 + 1] = RibbonVertex {
                position: (point + offset).to_array(),
                uv: [progress, 1.0],
                progress,
                intensity,
            };
        }

        out.intensity = intensity;
        out.renderable = len >= 2;
    }
}

/// Unit tangent along the history at segment `i`
///
/// Central difference inside the history, forward difference at the head,
/// backward difference past the end. Falls back to +Y when the history is too
/// short or the neighbours coincide.
fn tangent_at(history: &TrailHistory, i: usize, src: usize) -> Vec3 {
    let len = history.len();
    if len < 2 {
        return Vec3::Y;
    }

    let at = |age: usize| history.get(age).unwrap_or(Vec3::ZERO);
    let delta = if i > 0 && i < len - 1 {
        at(src + 1) - at(src - 1)
    } else if i == 0 {
        at(1) - at(0)
    } else {
        at(len - 1) - at(len - 2)
    };

    delta.try_normalize().unwrap_or(Vec3::Y)
}

/// Unit vector across the ribbon, never zero-length
fn perpendicular(tangent: Vec3) -> Vec3 {
    let perp = tangent.cross(Vec3::Y).normalize_or_zero();
    if perp.length() < 0.1 {
        // Tangent parallel to up
        return tangent.cross(Vec3::X).normalize_or_zero();
    }
    perp
}
