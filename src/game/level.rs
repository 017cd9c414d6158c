//! Level progression - targets, backgrounds, and which vegetables are in play.
//!
//! Each level draws 4 vegetables from the pool of 12. The level is complete
//! once the target count of every one of them has been collected. The bomb is
//! always in play but never counts towards completion.

use std::collections::BTreeMap;

use rand::{Rng, seq::SliceRandom};

use super::category::Category;

/// Vegetables drawn per level.
pub const CATEGORIES_PER_LEVEL: usize = 4;

/// Number of gameplay backgrounds; levels cycle through them.
pub const BACKGROUND_COUNT: u32 = 7;

/// Fall distance per simulation step on level 1.
pub const INITIAL_SPEED: f32 = 3.0;

/// Extra fall distance per step for every level after the first.
pub const SPEED_INCREMENT: f32 = 0.5;

/// Speed ceiling.
pub const MAX_SPEED: f32 = 8.0;

/// Collection target for a level: 4 on levels 1-3, 5 on 4-7, 6 from 8 on.
pub fn target_count_for(level: u32) -> u32 {
    match level {
        0..=3 => 4,
        4..=7 => 5,
        _ => 6,
    }
}

/// Background index in `1..=BACKGROUND_COUNT`.
pub fn background_for(level: u32) -> u32 {
    (level.max(1) - 1) % BACKGROUND_COUNT + 1
}

#[derive(Debug, Clone)]
pub struct LevelManager {
    current_level: u32,
    target_count: u32,
    background: u32,
    /// The level's vegetables, followed by the bomb.
    level_categories: Vec<Category>,
    collected: BTreeMap<Category, u32>,
}

impl LevelManager {
    pub fn new<R: Rng + ?Sized>(starting_level: u32, rng: &mut R) -> Self {
        let level = starting_level.max(1);
        let mut manager = Self {
            current_level: level,
            target_count: target_count_for(level),
            background: background_for(level),
            level_categories: Vec::with_capacity(CATEGORIES_PER_LEVEL + 1),
            collected: BTreeMap::new(),
        };
        manager.select_categories_for_level(rng);
        manager
    }

    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    pub fn target_count(&self) -> u32 {
        self.target_count
    }

    pub fn background(&self) -> u32 {
        self.background
    }

    /// Image name of the current background.
    pub fn background_name(&self) -> String {
        format!("gameplay_background{}", self.background)
    }

    /// Active categories: the 4 vegetables, then the bomb.
    pub fn level_categories(&self) -> &[Category] {
        &self.level_categories
    }

    pub fn collected(&self, category: Category) -> u32 {
        self.collected.get(&category).copied().unwrap_or(0)
    }

    #[allow(dead_code)]
    pub fn collected_counts(&self) -> &BTreeMap<Category, u32> {
        &self.collected
    }

    /// Fall distance per simulation step.
    pub fn speed_for_level(&self) -> f32 {
        (INITIAL_SPEED + (self.current_level - 1) as f32 * SPEED_INCREMENT).min(MAX_SPEED)
    }

    /// Spawns between bombs. Drops as levels go up, bottoming out at 6.
    pub fn bomb_frequency(&self) -> u32 {
        12u32.saturating_sub(self.current_level).max(6)
    }

    /// Shuffle the vegetable pool and take the first 4, then add the bomb.
    pub fn select_categories_for_level<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut pool = Category::VEGETABLES;
        pool.shuffle(rng);

        self.level_categories.clear();
        self.level_categories
            .extend_from_slice(&pool[..CATEGORIES_PER_LEVEL]);
        self.level_categories.push(Category::Bomb);

        self.reset_current_level();
    }

    /// Zero the collected counts without redrawing the categories.
    pub fn reset_current_level(&mut self) {
        self.collected = self
            .level_categories
            .iter()
            .filter(|c| c.is_vegetable())
            .map(|&c| (c, 0))
            .collect();
    }

    /// Count a collected item. Bombs are ignored.
    pub fn collect_item(&mut self, category: Category) {
        if !category.is_vegetable() {
            return;
        }
        *self.collected.entry(category).or_insert(0) += 1;
    }

    pub fn is_level_complete(&self) -> bool {
        self.level_categories
            .iter()
            .filter(|c| c.is_vegetable())
            .all(|&c| self.collected(c) >= self.target_count)
    }

    /// Active vegetables still short of the target.
    pub fn incomplete_categories(&self) -> Vec<Category> {
        self.level_categories
            .iter()
            .copied()
            .filter(|&c| c.is_vegetable() && self.collected(c) < self.target_count)
            .collect()
    }

    pub fn advance_to_next_level<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.set_level(self.current_level + 1, rng);
    }

    /// Jump straight to a level (used when continuing a saved run).
    pub fn set_level<R: Rng + ?Sized>(&mut self, level: u32, rng: &mut R) {
        self.current_level = level.max(1);
        self.target_count = target_count_for(self.current_level);
        self.background = background_for(self.current_level);
        self.select_categories_for_level(rng);
    }
}
