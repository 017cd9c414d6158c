//! The game loop - phases, timers, and the rules tying lives, score and
//! levels together.
//!
//! The controller knows nothing about rendering. The Bevy layer calls
//! [`GameController::tick`] every frame and forwards taps; in return it reads
//! a [`GameSnapshot`] and drains [`GameEvent`]s for sounds and effects.

use std::time::Duration;

use bevy::prelude::*;
use rand::rngs::StdRng;
use tracing::{debug, info};

use super::{
    category::Category,
    field::{FallingItem, ItemField, ItemId},
    level::LevelManager,
    life::LifeManager,
    score::ScoreManager,
    spawn::{Spawner, spawn_interval, spawn_position},
};
use crate::{
    services::{AdOutcome, AdService, AudioService, Sound},
    storage::{ProgressStore, SavedProgress},
};

/// Size and timing of the simulation.
#[derive(Resource, Debug, Clone, Copy)]
pub struct GameConfig {
    /// Playfield size in playfield units.
    pub field_size: Vec2,
    /// Length of one fall step. Items move by the level speed once per step.
    pub fall_step_secs: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_size: Vec2::new(390.0, 844.0),
            fall_step_secs: 1.0 / 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum Phase {
    #[default]
    Home,
    Playing,
    Paused,
    LevelComplete,
    GameOver,
}

/// Things that happened since the last [`GameController::drain_events`].
#[derive(Message, Debug, Clone, PartialEq)]
pub enum GameEvent {
    PhaseChanged { from: Phase, to: Phase },
    LevelStarted { level: u32 },
    ItemSpawned { id: ItemId, category: Category },
    ItemCollected { id: ItemId, category: Category, position: Vec2 },
    BombExploded { id: ItemId, position: Vec2 },
    ItemMissed { id: ItemId, category: Category, position: Vec2 },
    LifeLost { remaining: u32 },
    BonusLife { remaining: u32 },
    LevelCompleted { level: u32, score: u32 },
    GameOver { level: u32, score: u32 },
    Revived,
}

/// Everything the presentation layer needs to draw a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub level: u32,
    pub target_count: u32,
    pub background: u32,
    pub speed: f32,
    pub score: u32,
    pub high_score: u32,
    pub highest_level: u32,
    pub remaining_lives: u32,
    pub missed_count: u32,
    /// Active vegetables with their collected counts, in draw order.
    pub progress: Vec<(Category, u32)>,
    pub items: Vec<FallingItem>,
    pub can_continue: bool,
    pub continue_level: u32,
    pub rewarded_available: bool,
    pub music_enabled: bool,
    pub effects_enabled: bool,
}

#[derive(Resource)]
pub struct GameController {
    config: GameConfig,
    phase: Phase,
    level: LevelManager,
    score: ScoreManager,
    lives: LifeManager,
    field: ItemField,
    spawner: Spawner,
    fall_timer: Option<Timer>,
    spawn_timer: Option<Timer>,
    /// Score when the current level started; what a mid-level exit saves.
    level_start_score: u32,
    bomb_tick_playing: bool,
    music_enabled: bool,
    effects_enabled: bool,
    rng: StdRng,
    store: Box<dyn ProgressStore>,
    audio: Box<dyn AudioService>,
    ads: Box<dyn AdService>,
    events: Vec<GameEvent>,
}

impl GameController {
    pub fn new(
        config: GameConfig,
        store: impl ProgressStore,
        audio: impl AudioService,
        ads: impl AdService,
        mut rng: StdRng,
    ) -> Self {
        let saved = store.load();
        let level = LevelManager::new(1, &mut rng);

        let mut controller = Self {
            config,
            phase: Phase::Home,
            level,
            score: ScoreManager::from_saved(&saved),
            lives: LifeManager::from_saved(&saved),
            field: ItemField::new(config.field_size),
            spawner: Spawner::default(),
            fall_timer: None,
            spawn_timer: None,
            level_start_score: 0,
            bomb_tick_playing: false,
            music_enabled: saved.music_enabled,
            effects_enabled: saved.effects_enabled,
            rng,
            store: Box::new(store),
            audio: Box::new(audio),
            ads: Box::new(ads),
            events: Vec::new(),
        };

        controller.audio.set_music_enabled(controller.music_enabled);
        controller.audio.set_effects_enabled(controller.effects_enabled);
        controller.ads.prepare_interstitial();
        controller.ads.prepare_rewarded();
        controller.audio.play_background_music(Sound::GameHome);

        info!(
            "Game ready: high score {}, last level {}, {} lives",
            controller.score.high_score(),
            controller.score.last_played_level(),
            controller.lives.remaining_lives()
        );
        controller
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level(&self) -> &LevelManager {
        &self.level
    }

    #[allow(dead_code)]
    pub fn score(&self) -> &ScoreManager {
        &self.score
    }

    pub fn lives(&self) -> &LifeManager {
        &self.lives
    }

    pub fn field(&self) -> &ItemField {
        &self.field
    }

    pub fn music_enabled(&self) -> bool {
        self.music_enabled
    }

    pub fn effects_enabled(&self) -> bool {
        self.effects_enabled
    }

    /// Whether the home screen should offer to continue a saved run.
    pub fn can_continue(&self) -> bool {
        self.score.last_played_level() > 1 || self.score.continuation_score() > 0
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            level: self.level.current_level(),
            target_count: self.level.target_count(),
            background: self.level.background(),
            speed: self.level.speed_for_level(),
            score: self.score.score(),
            high_score: self.score.high_score(),
            highest_level: self.score.highest_level_reached(),
            remaining_lives: self.lives.remaining_lives(),
            missed_count: self.lives.missed_count(),
            progress: self
                .level
                .level_categories()
                .iter()
                .filter(|c| c.is_vegetable())
                .map(|&c| (c, self.level.collected(c)))
                .collect(),
            items: self.field.items().to_vec(),
            can_continue: self.can_continue(),
            continue_level: self.score.last_played_level() + 1,
            rewarded_available: self.ads.is_rewarded_available(),
            music_enabled: self.music_enabled,
            effects_enabled: self.effects_enabled,
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ---------------------------------------------------------------------
    // Transitions
    // ---------------------------------------------------------------------

    /// Home -> Playing, from level 1 with a fresh score and full lives.
    pub fn new_game(&mut self) {
        if self.phase != Phase::Home {
            debug!("Ignoring new game in {:?}", self.phase);
            return;
        }

        self.reset_run(1);
        self.score.save_last_played_level(1);
        self.score.save_continuation_score(Some(0));
        self.persist();

        info!("New game started");
        self.start_playing();
    }

    /// Home -> Playing, on the level after the last one completed, with the
    /// saved score and full lives.
    pub fn continue_game(&mut self) {
        if self.phase != Phase::Home || !self.can_continue() {
            debug!("Ignoring continue in {:?}", self.phase);
            return;
        }

        let next_level = self.score.last_played_level() + 1;
        let saved_score = self.score.continuation_score();

        self.reset_run(next_level);
        self.score.set_score(saved_score);
        self.score.save_continuation_score(Some(saved_score));
        self.score.update_highest_level(next_level);
        self.level_start_score = saved_score;
        self.persist();

        info!("Continuing at level {} with score {}", next_level, saved_score);
        self.start_playing();
    }

    pub fn pause(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        self.cancel_timers();
        self.audio.stop_background_music();
        self.set_phase(Phase::Paused);
    }

    pub fn resume(&mut self) {
        if self.phase != Phase::Paused {
            return;
        }
        self.audio.play_background_music(Sound::GamePlay);
        self.set_phase(Phase::Playing);
        self.start_timers();
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Playing => self.pause(),
            Phase::Paused => self.resume(),
            _ => debug!("Ignoring pause toggle in {:?}", self.phase),
        }
    }

    /// LevelComplete -> Playing on the next level, with a bonus life if
    /// there is room for one.
    pub fn start_next_level(&mut self) {
        if self.phase != Phase::LevelComplete {
            debug!("Ignoring next level in {:?}", self.phase);
            return;
        }

        let completed = self.level.current_level();
        self.score.save_last_played_level(completed);
        self.score.save_continuation_score(None);

        self.level.advance_to_next_level(&mut self.rng);
        self.score.update_highest_level(self.level.current_level());
        self.field.clear();
        self.spawner.reset();
        self.level_start_score = self.score.score();

        self.audio.stop_all();
        if self.lives.add_life() {
            self.audio.play_sound(Sound::GameBonus);
            self.events.push(GameEvent::BonusLife {
                remaining: self.lives.remaining_lives(),
            });
        }
        self.persist();

        info!(
            "Level {} complete, starting level {}",
            completed,
            self.level.current_level()
        );
        self.start_playing();
    }

    /// Back to the home screen, saving where the run can be continued from.
    pub fn go_home(&mut self) {
        match self.phase {
            Phase::GameOver => {
                self.score.save_continuation_score(Some(0));
                self.score.save_last_played_level(1);
                self.lives.reset_lives();
            }
            Phase::LevelComplete => {
                self.score
                    .save_last_played_level(self.level.current_level());
                self.score.save_continuation_score(None);
            }
            Phase::Paused => {
                // The level was left unfinished: continue replays it from
                // the score it started with.
                let last_completed = self.level.current_level().saturating_sub(1).max(1);
                self.score.save_last_played_level(last_completed);
                self.score
                    .save_continuation_score(Some(self.level_start_score));
            }
            Phase::Home | Phase::Playing => {
                debug!("Ignoring go home in {:?}", self.phase);
                return;
            }
        }

        self.cancel_timers();
        self.field.clear();
        self.audio.stop_all();
        self.audio.play_background_music(Sound::GameHome);
        self.persist();
        self.set_phase(Phase::Home);
    }

    /// GameOver -> Playing after a rewarded ad: one life back, same level.
    /// Returns false if no ad was available or it did not pay out.
    pub fn revive_with_reward(&mut self) -> bool {
        if self.phase != Phase::GameOver || !self.ads.is_rewarded_available() {
            return false;
        }

        let rewarded = self.ads.show_rewarded();
        // One attempt per slot, then line up the next one.
        self.ads.prepare_rewarded();
        if !rewarded {
            return false;
        }

        self.lives.set_lives(1);
        self.lives.reset_misses();
        self.field.clear();
        self.spawner.reset();
        self.audio.stop_all();
        self.events.push(GameEvent::Revived);
        self.persist();

        info!("Revived on level {}", self.level.current_level());
        self.start_playing();
        true
    }

    pub fn set_music_enabled(&mut self, enabled: bool) {
        self.music_enabled = enabled;
        self.audio.set_music_enabled(enabled);
        if enabled {
            let track = if self.phase == Phase::Home {
                Sound::GameHome
            } else {
                Sound::GamePlay
            };
            self.audio.play_background_music(track);
        }
        self.persist();
    }

    pub fn set_effects_enabled(&mut self, enabled: bool) {
        self.effects_enabled = enabled;
        self.audio.set_effects_enabled(enabled);
        self.persist();
    }

    // ---------------------------------------------------------------------
    // Simulation
    // ---------------------------------------------------------------------

    /// Advance the game by `delta` seconds.
    pub fn tick(&mut self, delta: f32) {
        let Ok(delta) = Duration::try_from_secs_f32(delta) else {
            return;
        };
        self.field.advance_animations(delta.as_secs_f32());

        if self.phase != Phase::Playing {
            return;
        }

        let fall_steps = Self::finished(&mut self.fall_timer, delta);
        for _ in 0..fall_steps {
            if self.phase != Phase::Playing {
                return;
            }
            self.fall_step();
        }

        let spawns = Self::finished(&mut self.spawn_timer, delta);
        for _ in 0..spawns {
            if self.phase != Phase::Playing {
                return;
            }
            self.spawn_item();
        }
    }

    /// Tap at a playfield point. Returns the item that was hit, if any.
    pub fn tap(&mut self, point: Vec2) -> Option<ItemId> {
        if self.phase != Phase::Playing {
            return None;
        }
        let id = self.field.item_at(point)?;
        self.collect(id).then_some(id)
    }

    /// Collect an item by id. Returns false if it was not there to collect.
    pub fn collect(&mut self, id: ItemId) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        let Some(item) = self.field.mark_collected(id) else {
            return false;
        };

        self.score.add_score(item.category);

        if item.category.is_vegetable() {
            self.audio.play_sound(Sound::Swipe);
            self.level.collect_item(item.category);
            self.events.push(GameEvent::ItemCollected {
                id,
                category: item.category,
                position: item.position,
            });
            if self.level.is_level_complete() {
                self.enter_level_complete();
            }
            self.persist();
        } else {
            self.audio.play_sound(Sound::Explosion);
            self.update_bomb_tick();
            self.events.push(GameEvent::BombExploded {
                id,
                position: item.position,
            });

            let out_of_lives = self.lives.lose_life();
            self.events.push(GameEvent::LifeLost {
                remaining: self.lives.remaining_lives(),
            });
            self.persist();
            if out_of_lives {
                self.enter_game_over();
            }
        }
        true
    }

    fn fall_step(&mut self) {
        let step = self.field.step(self.level.speed_for_level());

        for item in step.missed {
            self.events.push(GameEvent::ItemMissed {
                id: item.id,
                category: item.category,
                position: item.position,
            });
            self.audio.play_sound(Sound::LevelFail);

            if self.lives.register_miss() {
                self.events.push(GameEvent::LifeLost {
                    remaining: self.lives.remaining_lives(),
                });
                self.persist();
                if self.lives.remaining_lives() == 0 {
                    self.enter_game_over();
                    return;
                }
            }
        }

        self.update_bomb_tick();
    }

    fn spawn_item(&mut self) {
        let Some(category) = self.spawner.choose(&self.level, &self.field, &mut self.rng) else {
            return;
        };
        let position = spawn_position(
            category,
            self.level.current_level(),
            self.field.size(),
            &mut self.rng,
        );
        let id = self.field.spawn(category, position);
        self.events.push(GameEvent::ItemSpawned { id, category });

        if category == Category::Bomb {
            self.update_bomb_tick();
        }
    }

    /// Keep the bomb tick looping exactly while a bomb is falling.
    fn update_bomb_tick(&mut self) {
        let has_bomb = self.field.falling_bombs() > 0;
        if has_bomb && !self.bomb_tick_playing {
            self.audio.play_looping(Sound::BombTick);
            self.bomb_tick_playing = true;
        } else if !has_bomb && self.bomb_tick_playing {
            self.audio.stop_sound(Sound::BombTick);
            self.bomb_tick_playing = false;
        }
    }

    // ---------------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------------

    fn reset_run(&mut self, level: u32) {
        self.cancel_timers();
        self.level = LevelManager::new(level, &mut self.rng);
        self.score.reset_score();
        self.lives.reset_lives();
        self.field.clear();
        self.spawner.reset();
        self.level_start_score = 0;
        self.audio.stop_all();
    }

    fn start_playing(&mut self) {
        self.audio.play_background_music(Sound::GamePlay);
        self.set_phase(Phase::Playing);
        self.events.push(GameEvent::LevelStarted {
            level: self.level.current_level(),
        });
        self.start_timers();
    }

    fn enter_level_complete(&mut self) {
        self.cancel_timers();
        self.audio.stop_all();
        self.audio.play_sound(Sound::LevelWin);

        let level = self.level.current_level();
        self.events.push(GameEvent::LevelCompleted {
            level,
            score: self.score.score(),
        });
        self.set_phase(Phase::LevelComplete);

        if self.ads.show_interstitial_if_due(level) == AdOutcome::Shown {
            self.ads.prepare_interstitial();
        }
        info!("Level {} complete with score {}", level, self.score.score());
    }

    fn enter_game_over(&mut self) {
        self.cancel_timers();
        self.audio.stop_all();
        self.audio.play_sound(Sound::LevelFail);

        self.events.push(GameEvent::GameOver {
            level: self.level.current_level(),
            score: self.score.score(),
        });
        self.set_phase(Phase::GameOver);
        self.persist();
        info!(
            "Game over on level {} with score {}",
            self.level.current_level(),
            self.score.score()
        );
    }

    /// Restart both timers and put an item on screen straight away.
    fn start_timers(&mut self) {
        self.fall_timer = Some(Timer::from_seconds(
            self.config.fall_step_secs,
            TimerMode::Repeating,
        ));
        self.spawn_timer = Some(Timer::from_seconds(
            spawn_interval(self.level.current_level()),
            TimerMode::Repeating,
        ));
        self.spawn_item();
    }

    /// Safe to call with no timers running.
    fn cancel_timers(&mut self) {
        self.fall_timer = None;
        self.spawn_timer = None;
        if self.bomb_tick_playing {
            self.audio.stop_sound(Sound::BombTick);
            self.bomb_tick_playing = false;
        }
    }

    fn finished(timer: &mut Option<Timer>, delta: Duration) -> u32 {
        match timer {
            Some(timer) => {
                timer.tick(delta);
                timer.times_finished_this_tick()
            }
            None => 0,
        }
    }

    fn set_phase(&mut self, to: Phase) {
        let from = self.phase;
        if from == to {
            return;
        }
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
        debug!("Phase {:?} -> {:?}", from, to);
    }

    fn persist(&mut self) {
        let mut saved = SavedProgress {
            music_enabled: self.music_enabled,
            effects_enabled: self.effects_enabled,
            ..SavedProgress::default()
        };
        self.score.write_to(&mut saved);
        self.lives.write_to(&mut saved);
        self.store.save(&saved);
    }
}

#[cfg(test)]
mod tests;
