//! Lives and the missed-vegetable counter.
//!
//! Every third vegetable that falls off the bottom costs a life.
//! Tapping a bomb costs a life straight away.

use crate::storage::SavedProgress;

/// Lives at the start of a run, and the most a player can hold.
pub const MAX_LIVES: u32 = 5;

/// Misses that add up to one lost life.
pub const MISSES_PER_LIFE: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifeManager {
    remaining_lives: u32,
    missed_count: u32,
}

impl Default for LifeManager {
    fn default() -> Self {
        Self {
            remaining_lives: MAX_LIVES,
            missed_count: 0,
        }
    }
}

impl LifeManager {
    /// Restore lives from saved progress. A saved zero means the last run
    /// ended (or there never was one), so the player starts with full lives.
    pub fn from_saved(saved: &SavedProgress) -> Self {
        let remaining_lives = match saved.remaining_lives {
            0 => MAX_LIVES,
            lives => lives.min(MAX_LIVES),
        };
        Self {
            remaining_lives,
            missed_count: 0,
        }
    }

    pub fn remaining_lives(&self) -> u32 {
        self.remaining_lives
    }

    pub fn missed_count(&self) -> u32 {
        self.missed_count
    }

    /// Misses left before the next life is lost.
    pub fn remaining_chances(&self) -> u32 {
        MISSES_PER_LIFE - self.missed_count
    }

    /// Count a missed vegetable. Returns true if this miss cost a life.
    pub fn register_miss(&mut self) -> bool {
        self.missed_count += 1;
        if self.missed_count >= MISSES_PER_LIFE {
            self.missed_count = 0;
            self.lose_life();
            return true;
        }
        false
    }

    /// Lose one life. Returns true if the player is out of lives.
    pub fn lose_life(&mut self) -> bool {
        self.remaining_lives = self.remaining_lives.saturating_sub(1);
        self.remaining_lives == 0
    }

    /// Grant a bonus life. Returns false when already at the maximum.
    pub fn add_life(&mut self) -> bool {
        if self.remaining_lives < MAX_LIVES {
            self.remaining_lives += 1;
            return true;
        }
        false
    }

    pub fn reset_lives(&mut self) {
        self.remaining_lives = MAX_LIVES;
        self.missed_count = 0;
    }

    pub fn reset_misses(&mut self) {
        self.missed_count = 0;
    }

    pub fn set_lives(&mut self, lives: i64) {
        self.remaining_lives = lives.clamp(0, MAX_LIVES as i64) as u32;
    }

    pub fn write_to(&self, saved: &mut SavedProgress) {
        saved.remaining_lives = self.remaining_lives;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_third_miss_costs_a_life() {
        let mut lives = LifeManager::default();
        let mut lost = Vec::new();
        for _ in 0..9 {
            lost.push(lives.register_miss());
            if *lost.last().unwrap() {
                assert_eq!(lives.missed_count(), 0);
            }
        }
        assert_eq!(
            lost,
            vec![false, false, true, false, false, true, false, false, true]
        );
        assert_eq!(lives.remaining_lives(), MAX_LIVES - 3);
    }

    #[test]
    fn test_add_life_at_max_is_noop() {
        let mut lives = LifeManager::default();
        let before = lives.clone();
        assert!(!lives.add_life());
        assert_eq!(lives, before);
    }

    #[test]
    fn test_add_life_below_max() {
        let mut lives = LifeManager::default();
        lives.lose_life();
        assert!(lives.add_life());
        assert_eq!(lives.remaining_lives(), MAX_LIVES);
    }

    #[test]
    fn test_lose_life_reports_game_over() {
        let mut lives = LifeManager::default();
        lives.set_lives(2);
        assert!(!lives.lose_life());
        assert!(lives.lose_life());
        // Never goes below zero.
        assert!(lives.lose_life());
        assert_eq!(lives.remaining_lives(), 0);
    }

    #[test]
    fn test_set_lives_clamps() {
        let mut lives = LifeManager::default();
        lives.set_lives(9);
        assert_eq!(lives.remaining_lives(), MAX_LIVES);
        lives.set_lives(-3);
        assert_eq!(lives.remaining_lives(), 0);
    }

    #[test]
    fn test_reset_clears_misses() {
        let mut lives = LifeManager::default();
        lives.register_miss();
        lives.register_miss();
        lives.lose_life();
        lives.reset_lives();
        assert_eq!(lives.remaining_lives(), MAX_LIVES);
        assert_eq!(lives.missed_count(), 0);
        assert_eq!(lives.remaining_chances(), MISSES_PER_LIFE);
    }

    #[test]
    fn test_saved_zero_lives_means_full_lives() {
        let saved = SavedProgress {
            remaining_lives: 0,
            ..SavedProgress::default()
        };
        assert_eq!(LifeManager::from_saved(&saved).remaining_lives(), MAX_LIVES);

        let saved = SavedProgress {
            remaining_lives: 2,
            ..SavedProgress::default()
        };
        assert_eq!(LifeManager::from_saved(&saved).remaining_lives(), 2);
    }
}
