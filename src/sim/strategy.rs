//! Category-specific behavior
//!
//! Good targets and decoys share one [`EntityInstance`](super::EntityInstance)
//! type; what differs between them is dispatched through [`CategoryStrategy`].

use glam::Vec2;

use super::entity::Category;
use super::events::{FeedbackCue, Outcome};

pub trait CategoryStrategy {
    /// Outcome reported when the player clicks this entity
    fn click_outcome(&self) -> Outcome;

    /// Feedback cue played on click
    fn click_feedback(&self) -> FeedbackCue;

    /// Repulsion direction overriding the roam target, if any
    fn repulsion(&self, pos: Vec2, decoys: &[Vec2], flee_radius: f32) -> Option<Vec2>;

    /// Whether straying past the max wander radius resolves the entity
    fn escapes(&self) -> bool;
}

pub struct GoodTargetStrategy;

pub struct DecoyStrategy;

impl CategoryStrategy for GoodTargetStrategy {
    fn click_outcome(&self) -> Outcome {
        Outcome::GoodClicked
    }

    fn click_feedback(&self) -> FeedbackCue {
        FeedbackCue::GoodHit
    }

    fn repulsion(&self, pos: Vec2, decoys: &[Vec2], flee_radius: f32) -> Option<Vec2> {
        let nearest = decoys
            .iter()
            .map(|d| (*d, d.distance_squared(pos)))
            .filter(|(_, dist_sq)| *dist_sq < flee_radius * flee_radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))?;

        let away = (pos - nearest.0).normalize_or_zero();
        // Sitting exactly on a decoy: pick a fixed direction rather than freezing
        Some(if away == Vec2::ZERO { Vec2::Y } else { away })
    }

    fn escapes(&self) -> bool {
        true
    }
}

impl CategoryStrategy for DecoyStrategy {
    fn click_outcome(&self) -> Outcome {
        Outcome::DecoyClicked
    }

    fn click_feedback(&self) -> FeedbackCue {
        FeedbackCue::DecoyHit
    }

    fn repulsion(&self, _pos: Vec2, _decoys: &[Vec2], _flee_radius: f32) -> Option<Vec2> {
        None
    }

    fn escapes(&self) -> bool {
        false
    }
}

impl Category {
    pub fn strategy(self) -> &'static dyn CategoryStrategy {
        match self {
            Category::Target => &GoodTargetStrategy,
            Category::Decoy => &DecoyStrategy,
        }
    }
}
