//! Score, high score and saved run progress.

use super::category::Category;
use crate::storage::SavedProgress;

/// Points for collecting a vegetable.
const VEGETABLE_POINTS: u32 = 10;

/// Points taken away for tapping a bomb.
const BOMB_PENALTY: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreManager {
    score: u32,
    high_score: u32,
    highest_level_reached: u32,
    last_played_level: u32,
    continuation_score: u32,
}

impl Default for ScoreManager {
    fn default() -> Self {
        Self::from_saved(&SavedProgress::default())
    }
}

impl ScoreManager {
    /// Restore persisted values. Levels saved as zero are treated as a first run.
    pub fn from_saved(saved: &SavedProgress) -> Self {
        Self {
            score: 0,
            high_score: saved.high_score,
            highest_level_reached: saved.highest_level.max(1),
            last_played_level: saved.last_played_level.max(1),
            continuation_score: saved.continuation_score,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn highest_level_reached(&self) -> u32 {
        self.highest_level_reached
    }

    pub fn last_played_level(&self) -> u32 {
        self.last_played_level
    }

    pub fn continuation_score(&self) -> u32 {
        self.continuation_score
    }

    /// Apply the points for a tapped item.
    pub fn add_score(&mut self, category: Category) {
        if category.is_vegetable() {
            self.score += VEGETABLE_POINTS;
            self.high_score = self.high_score.max(self.score);
        } else {
            self.score = self.score.saturating_sub(BOMB_PENALTY);
        }
    }

    pub fn reset_score(&mut self) {
        self.score = 0;
        self.continuation_score = 0;
    }

    pub fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    pub fn update_highest_level(&mut self, level: u32) {
        self.highest_level_reached = self.highest_level_reached.max(level);
    }

    pub fn save_last_played_level(&mut self, level: u32) {
        self.last_played_level = level;
    }

    /// Snapshot a score for the continue flow; `None` snapshots the current score.
    pub fn save_continuation_score(&mut self, score: Option<u32>) {
        self.continuation_score = score.unwrap_or(self.score);
    }

    pub fn write_to(&self, saved: &mut SavedProgress) {
        saved.high_score = self.high_score;
        saved.highest_level = self.highest_level_reached;
        saved.last_played_level = self.last_played_level;
        saved.continuation_score = self.continuation_score;
    }
}
