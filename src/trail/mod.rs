//! Fading ribbon trails from rolling position histories.

mod history;
mod ribbon;

// Re-export public types
pub use history::TrailHistory;
pub use ribbon::{RibbonBuilder, RibbonGeometry, RibbonVertex};

use glam::Vec3;

/// Position history + ribbon geometry for one trailed object
#[derive(Debug, Clone)]
pub struct Trail {
    pub history: TrailHistory,
    pub ribbon: RibbonGeometry,
    /// Head half-width (world units)
    pub width: f32,
}

impl Trail {
    pub fn new(builder: &RibbonBuilder, capacity: usize, width: f32) -> Self {
        Self {
            history: TrailHistory::new(capacity),
            ribbon: builder.geometry(),
            width,
        }
    }

    /// Push this frame's position and rebuild the ribbon in place
    pub fn advance(&mut self, builder: &RibbonBuilder, position: Vec3, intensity: f32) {
        self.history.push(position);
        builder.build(&self.history, self.width, intensity, &mut self.ribbon);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_advance_tracks_head() {
        let builder = RibbonBuilder::new(60, 0.9);
        let mut trail = Trail::new(&builder, 80, 0.06);

        trail.advance(&builder, Vec3::X, 0.4);
        trail.advance(&builder, Vec3::Z, 0.4);

        assert_eq!(trail.history.head(), Some(Vec3::Z));
        assert!(trail.ribbon.is_renderable());
        assert_eq!(trail.ribbon.intensity(), 0.4);
    }
}
