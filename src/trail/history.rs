//! Bounded newest-first position history.

use glam::Vec3;
use std::collections::VecDeque;

/// Most-recent-first ring of positions
///
/// Length never exceeds capacity; pushing onto a full history evicts the
/// oldest entry. Storage is allocated once.
#[derive(Debug, Clone)]
pub struct TrailHistory {
    points: VecDeque<Vec3>,
    capacity: usize,
}

impl TrailHistory {
    /// Capacity is at least one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record the current frame's position as the new head
    pub fn push(&mut self, position: Vec3) {
        while self.points.len() >= self.capacity {
            self.points.pop_back();
        }
        self.points.push_front(position);
    }

    /// Position `age` frames ago (0 = newest)
    pub fn get(&self, age: usize) -> Option<Vec3> {
        self.points.get(age).copied()
    }

    pub fn head(&self) -> Option<Vec3> {
        self.points.front().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Newest to oldest
    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.points.iter().copied()
    }
}
