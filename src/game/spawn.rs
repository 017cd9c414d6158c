//! Spawn policy - how often items appear, when a bomb is due, and where
//! new items start.

use bevy::prelude::*;
use rand::{Rng, seq::IndexedRandom};

use super::{category::Category, field::ItemField, level::LevelManager};

/// Seconds between spawns for a level. Faster as levels go up, with a floor
/// per band so the screen never floods.
pub fn spawn_interval(level: u32) -> f32 {
    let level = level as f32;
    if level <= 3.0 {
        (1.3 - level * 0.05).max(0.8)
    } else if level <= 7.0 {
        (1.1 - (level - 3.0) * 0.05).max(0.7)
    } else {
        (0.9 - (level - 7.0) * 0.03).max(0.6)
    }
}

/// Bombs allowed on screen at once.
pub fn max_bombs_on_screen(level: u32) -> usize {
    match level {
        0..=5 => 2,
        6..=10 => 3,
        _ => 4,
    }
}

/// Vertical band (as fractions of the field height) new items start in.
/// From level 7 on everything drops in from the top.
pub fn spawn_band(level: u32) -> (f32, f32) {
    match level {
        0..=4 => (0.1, 0.4),
        5..=6 => (0.1, 0.3),
        _ => (0.1, 0.1),
    }
}

/// Where a new item starts: anywhere it fits horizontally, inside the
/// level's vertical band.
pub fn spawn_position<R: Rng + ?Sized>(
    category: Category,
    level: u32,
    field_size: Vec2,
    rng: &mut R,
) -> Vec2 {
    let half = category.size() * 0.5;
    let x = if field_size.x > category.size() {
        rng.random_range(half..=field_size.x - half)
    } else {
        field_size.x * 0.5
    };

    let (min, max) = spawn_band(level);
    let y = if max > min {
        rng.random_range(min * field_size.y..=max * field_size.y)
    } else {
        min * field_size.y
    };

    Vec2::new(x, y)
}

/// Tracks spawns since the last bomb and picks what comes next.
#[derive(Debug, Default, Clone)]
pub struct Spawner {
    spawn_counter: u32,
}

impl Spawner {
    pub fn spawn_counter(&self) -> u32 {
        self.spawn_counter
    }

    pub fn reset(&mut self) {
        self.spawn_counter = 0;
    }

    /// Choose the next item. A bomb is due once the counter reaches the
    /// level's bomb frequency and the screen has room for one; otherwise a
    /// vegetable still short of its target. `None` when nothing is needed.
    pub fn choose<R: Rng + ?Sized>(
        &mut self,
        level: &LevelManager,
        field: &ItemField,
        rng: &mut R,
    ) -> Option<Category> {
        self.spawn_counter += 1;

        let bomb_due = self.spawn_counter >= level.bomb_frequency();
        let room_for_bomb = field.falling_bombs() < max_bombs_on_screen(level.current_level());
        if bomb_due && room_for_bomb {
            self.spawn_counter = 0;
            return Some(Category::Bomb);
        }

        level.incomplete_categories().choose(rng).copied()
    }
}
