//! Rectangular play area
//!
//! World units with y pointing up. Entities descend from above `max.y`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};

/// Axis-aligned arena bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::new(ARENA_WIDTH, ARENA_HEIGHT))
    }
}

impl Arena {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Bounds shrunk by `padding` on every side. Collapses to the center
    /// line when the padding exceeds half the extent.
    pub fn inset(&self, padding: f32) -> Arena {
        let center = (self.min + self.max) * 0.5;
        let half = (self.size() * 0.5 - Vec2::splat(padding)).max(Vec2::ZERO);
        Arena {
            min: center - half,
            max: center + half,
        }
    }

    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    /// Uniformly sample a point inside the arena inset by `padding`
    pub fn sample_point<R: Rng>(&self, rng: &mut R, padding: f32) -> Vec2 {
        let area = self.inset(padding);
        let t = Vec2::new(rng.random::<f32>(), rng.random::<f32>());
        area.min + area.size() * t
    }
}
