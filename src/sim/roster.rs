//! Per-level spawn roster
//!
//! A fixed list of specs plus a pool of indices not yet drawn. Drawing
//! removes exactly one index; an exhausted category draws `None`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Category, EntitySpec};

/// Order in which specs leave the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrawPolicy {
    /// Lowest remaining index first
    #[default]
    Fixed,
    /// Uniform over the remaining entries
    Random,
}

#[derive(Debug, Clone)]
pub struct Roster {
    specs: Vec<EntitySpec>,
    /// Indices into `specs`, ascending
    remaining: Vec<usize>,
    policy: DrawPolicy,
}

impl Roster {
    /// Create a prepared roster
    pub fn new(specs: Vec<EntitySpec>, policy: DrawPolicy) -> Self {
        let mut roster = Self {
            specs,
            remaining: Vec::new(),
            policy,
        };
        roster.prepare();
        roster
    }

    /// Refill the pool with every spec
    pub fn prepare(&mut self) {
        self.remaining = (0..self.specs.len()).collect();
    }

    pub fn policy(&self) -> DrawPolicy {
        self.policy
    }

    pub fn specs(&self) -> &[EntitySpec] {
        &self.specs
    }

    /// Draw the next spec of `category`, or `None` when none remain
    pub fn draw_next<R: Rng>(&mut self, category: Category, rng: &mut R) -> Option<EntitySpec> {
        let candidates: Vec<usize> = self
            .remaining
            .iter()
            .enumerate()
            .filter(|(_, idx)| self.specs[**idx].category == category)
            .map(|(slot, _)| slot)
            .collect();

        let slot = match self.policy {
            DrawPolicy::Fixed => *candidates.first()?,
            DrawPolicy::Random => {
                if candidates.is_empty() {
                    return None;
                }
                candidates[rng.random_range(0..candidates.len())]
            }
        };

        let idx = self.remaining.remove(slot);
        Some(self.specs[idx].clone())
    }

    pub fn remaining_count(&self, category: Category) -> usize {
        self.remaining
            .iter()
            .filter(|idx| self.specs[**idx].category == category)
            .count()
    }

    pub fn total_count(&self, category: Category) -> usize {
        self.specs.iter().filter(|s| s.category == category).count()
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }
}
