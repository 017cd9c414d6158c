use std::sync::{Arc, Mutex};

use rand::SeedableRng;

use super::*;
use crate::{
    game::{level::target_count_for, life::MAX_LIVES},
    services::{SilentAudio, SimulatedAds},
    storage::{JsonFileStore, MemoryStore},
};

const STEP: f32 = 0.02;

#[derive(Debug, Clone, PartialEq)]
enum AudioCall {
    Play(Sound),
    Loop(Sound),
    Stop(Sound),
    Music(Sound),
    StopMusic,
    StopAll,
}

#[derive(Clone, Default)]
struct RecordingAudio(Arc<Mutex<Vec<AudioCall>>>);

impl RecordingAudio {
    fn calls(&self) -> Vec<AudioCall> {
        self.0.lock().unwrap().clone()
    }

    fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    fn push(&self, call: AudioCall) {
        self.0.lock().unwrap().push(call);
    }
}

impl AudioService for RecordingAudio {
    fn play_sound(&mut self, sound: Sound) {
        self.push(AudioCall::Play(sound));
    }
    fn play_looping(&mut self, sound: Sound) {
        self.push(AudioCall::Loop(sound));
    }
    fn stop_sound(&mut self, sound: Sound) {
        self.push(AudioCall::Stop(sound));
    }
    fn play_background_music(&mut self, track: Sound) {
        self.push(AudioCall::Music(track));
    }
    fn stop_background_music(&mut self) {
        self.push(AudioCall::StopMusic);
    }
    fn stop_all(&mut self) {
        self.push(AudioCall::StopAll);
    }
    fn set_music_enabled(&mut self, _enabled: bool) {}
    fn set_effects_enabled(&mut self, _enabled: bool) {}
}

/// Ad service whose rewarded ads can be told to fail.
#[derive(Clone, Default)]
struct ScriptedAds {
    inner: Arc<Mutex<ScriptedAdsState>>,
}

#[derive(Default)]
struct ScriptedAdsState {
    rewarded_ready: bool,
    rewarded_pays: bool,
    interstitials_shown: Vec<u32>,
}

impl AdService for ScriptedAds {
    fn prepare_interstitial(&mut self) {}
    fn prepare_rewarded(&mut self) {
        self.inner.lock().unwrap().rewarded_ready = true;
    }
    fn show_interstitial_if_due(&mut self, level: u32) -> AdOutcome {
        self.inner.lock().unwrap().interstitials_shown.push(level);
        AdOutcome::Shown
    }
    fn is_rewarded_available(&self) -> bool {
        self.inner.lock().unwrap().rewarded_ready
    }
    fn show_rewarded(&mut self) -> bool {
        let mut state = self.inner.lock().unwrap();
        state.rewarded_ready = false;
        state.rewarded_pays
    }
}

/// Store whose contents outlive the controller, to simulate a restart.
#[derive(Clone, Default)]
struct SharedStore(Arc<Mutex<SavedProgress>>);

impl ProgressStore for SharedStore {
    fn load(&self) -> SavedProgress {
        self.0.lock().unwrap().clone()
    }
    fn save(&mut self, progress: &SavedProgress) {
        *self.0.lock().unwrap() = progress.clone();
    }
}

fn controller() -> GameController {
    GameController::new(
        GameConfig::default(),
        MemoryStore::default(),
        SilentAudio,
        SimulatedAds::default(),
        StdRng::seed_from_u64(42),
    )
}

fn controller_with_store(store: SharedStore) -> GameController {
    GameController::new(
        GameConfig::default(),
        store,
        RecordingAudio::default(),
        SimulatedAds::default(),
        StdRng::seed_from_u64(42),
    )
}

/// Start a game and clear out the item spawned on entry.
fn playing() -> GameController {
    let mut c = controller();
    c.new_game();
    c.field.clear();
    c.drain_events();
    c
}

fn place(c: &mut GameController, category: Category) -> ItemId {
    c.field.spawn(category, Vec2::new(200.0, 300.0))
}

fn place_at_bottom(c: &mut GameController, category: Category) -> ItemId {
    let y = c.config.field_size.y - 1.0;
    c.field.spawn(category, Vec2::new(200.0, y))
}

fn complete_level(c: &mut GameController) {
    let target = c.level.target_count();
    let vegetables: Vec<_> = c.level.level_categories()[..4].to_vec();
    for category in vegetables {
        for _ in 0..target {
            let id = place(c, category);
            assert!(c.collect(id));
        }
    }
}

#[test]
fn test_starts_at_home_with_defaults() {
    let c = controller();
    let snapshot = c.snapshot();
    assert_eq!(snapshot.phase, Phase::Home);
    assert_eq!(snapshot.remaining_lives, MAX_LIVES);
    assert_eq!(snapshot.score, 0);
    assert!(!snapshot.can_continue);
}

#[test]
fn test_new_game_starts_playing_level_one() {
    let mut c = controller();
    c.new_game();
    let snapshot = c.snapshot();
    assert_eq!(snapshot.phase, Phase::Playing);
    assert_eq!(snapshot.level, 1);
    assert_eq!(snapshot.target_count, 4);
    assert_eq!(snapshot.speed, 3.0);
    // Something is on screen immediately.
    assert_eq!(snapshot.items.len(), 1);

    let events = c.drain_events();
    assert!(events.contains(&GameEvent::PhaseChanged {
        from: Phase::Home,
        to: Phase::Playing
    }));
    assert!(events.contains(&GameEvent::LevelStarted { level: 1 }));
    assert!(c.drain_events().is_empty());
}

#[test]
fn test_ticks_move_items_down() {
    let mut c = playing();
    let id = place(&mut c, Category::Carrot);
    c.tick(STEP);
    let y = c.field.get(id).map(|item| item.position.y);
    assert_eq!(y, Some(303.0));
}

#[test]
fn test_spawn_timer_fills_the_field() {
    let mut c = playing();
    // Level 1 spawns every 1.25s.
    for _ in 0..240 {
        c.tick(STEP);
    }
    let spawned = c
        .drain_events()
        .iter()
        .filter(|e| matches!(e, GameEvent::ItemSpawned { .. }))
        .count();
    assert_eq!(spawned, 3);
}

#[test]
fn test_three_misses_cost_a_life() {
    let mut c = playing();
    for _ in 0..3 {
        place_at_bottom(&mut c, Category::Carrot);
        c.tick(STEP);
    }
    assert_eq!(c.lives.remaining_lives(), MAX_LIVES - 1);
    assert_eq!(c.lives.missed_count(), 0);

    let events = c.drain_events();
    let missed = events
        .iter()
        .filter(|e| matches!(e, GameEvent::ItemMissed { .. }))
        .count();
    assert_eq!(missed, 3);
    assert!(events.contains(&GameEvent::LifeLost {
        remaining: MAX_LIVES - 1
    }));
}

#[test]
fn test_bombs_fall_past_without_penalty() {
    let mut c = playing();
    place_at_bottom(&mut c, Category::Bomb);
    c.tick(STEP);
    assert!(c.field.items().is_empty());
    assert_eq!(c.lives.missed_count(), 0);
    assert_eq!(c.lives.remaining_lives(), MAX_LIVES);
}

#[test]
fn test_tap_collects_vegetable() {
    let mut c = playing();
    let category = c.level.level_categories()[0];
    let id = c.field.spawn(category, Vec2::new(100.0, 100.0));

    assert_eq!(c.tap(Vec2::new(105.0, 95.0)), Some(id));
    assert_eq!(c.score.score(), 10);
    assert_eq!(c.level.collected(category), 1);
    // Can't collect the same item twice.
    assert!(!c.collect(id));
    assert_eq!(c.tap(Vec2::new(100.0, 100.0)), None);
}

#[test]
fn test_bomb_tap_costs_life_and_points() {
    let mut c = playing();
    c.score.set_score(15);
    let id = place(&mut c, Category::Bomb);
    assert!(c.collect(id));
    assert_eq!(c.score.score(), 0);
    assert_eq!(c.lives.remaining_lives(), MAX_LIVES - 1);
    assert_eq!(c.phase(), Phase::Playing);
}

#[test]
fn test_last_life_lost_to_bomb_is_game_over() {
    let mut c = playing();
    c.lives.set_lives(1);
    let id = place(&mut c, Category::Bomb);
    c.collect(id);
    assert_eq!(c.phase(), Phase::GameOver);
    assert!(c.fall_timer.is_none());
    assert!(c.spawn_timer.is_none());
}

#[test]
fn test_last_life_lost_to_misses_is_game_over() {
    let mut c = playing();
    c.lives.set_lives(1);
    for _ in 0..3 {
        place_at_bottom(&mut c, Category::Corn);
        c.tick(STEP);
    }
    assert_eq!(c.phase(), Phase::GameOver);

    // No stale ticks after the transition.
    let id = place(&mut c, Category::Corn);
    c.tick(5.0);
    assert_eq!(c.field.get(id).map(|i| i.position.y), Some(300.0));
    assert_eq!(c.tap(Vec2::new(200.0, 300.0)), None);
}

#[test]
fn test_pause_freezes_simulation() {
    let mut c = playing();
    let id = place(&mut c, Category::Onion);
    c.toggle_pause();
    assert_eq!(c.phase(), Phase::Paused);
    c.tick(10.0);
    assert_eq!(c.field.get(id).map(|i| i.position.y), Some(300.0));
    assert!(!c.collect(id));

    c.toggle_pause();
    assert_eq!(c.phase(), Phase::Playing);
    c.tick(STEP);
    assert_eq!(c.field.get(id).map(|i| i.position.y), Some(303.0));
}

#[test]
fn test_pause_twice_is_harmless() {
    let mut c = playing();
    c.pause();
    c.pause();
    assert_eq!(c.phase(), Phase::Paused);
    c.resume();
    c.resume();
    assert_eq!(c.phase(), Phase::Playing);
}

#[test]
fn test_level_one_to_two() {
    let mut c = playing();
    // Lose a life first so the bonus has room.
    let bomb = place(&mut c, Category::Bomb);
    c.collect(bomb);
    assert_eq!(c.lives.remaining_lives(), MAX_LIVES - 1);

    complete_level(&mut c);
    assert!(c.level.is_level_complete());
    assert_eq!(c.phase(), Phase::LevelComplete);
    assert!(c.fall_timer.is_none());

    c.start_next_level();
    let snapshot = c.snapshot();
    assert_eq!(snapshot.phase, Phase::Playing);
    assert_eq!(snapshot.level, 2);
    assert_eq!(snapshot.target_count, 4);
    assert_eq!(snapshot.speed, 3.5);
    assert_eq!(snapshot.remaining_lives, MAX_LIVES);
    assert_eq!(snapshot.highest_level, 2);
    assert!(snapshot.progress.iter().all(|&(_, n)| n == 0));
    assert!(c.drain_events().contains(&GameEvent::BonusLife {
        remaining: MAX_LIVES
    }));
}

#[test]
fn test_no_bonus_life_at_max() {
    let mut c = playing();
    complete_level(&mut c);
    c.drain_events();
    c.start_next_level();
    assert_eq!(c.lives.remaining_lives(), MAX_LIVES);
    assert!(
        !c.drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::BonusLife { .. }))
    );
}

#[test]
fn test_level_complete_offers_interstitial() {
    let ads = ScriptedAds::default();
    let mut c = GameController::new(
        GameConfig::default(),
        MemoryStore::default(),
        RecordingAudio::default(),
        ads.clone(),
        StdRng::seed_from_u64(1),
    );
    c.new_game();
    complete_level(&mut c);
    assert_eq!(ads.inner.lock().unwrap().interstitials_shown, vec![1]);
}

#[test]
fn test_target_band_after_level_three() {
    let mut c = playing();
    for _ in 0..3 {
        complete_level(&mut c);
        c.start_next_level();
        c.field.clear();
    }
    assert_eq!(c.level.current_level(), 4);
    assert_eq!(c.level.target_count(), target_count_for(4));
    assert_eq!(c.level.target_count(), 5);
}

#[test]
fn test_go_home_after_level_complete_then_continue() {
    let store = SharedStore::default();
    let mut c = controller_with_store(store.clone());
    c.new_game();
    c.field.clear();
    complete_level(&mut c);
    let score = c.score.score();
    c.go_home();
    assert_eq!(c.phase(), Phase::Home);

    // Restart the app.
    let mut c = controller_with_store(store);
    assert_eq!(c.score.last_played_level(), 1);
    assert_eq!(c.score.continuation_score(), score);
    assert!(c.can_continue());
    assert_eq!(c.snapshot().continue_level, 2);

    c.continue_game();
    assert_eq!(c.phase(), Phase::Playing);
    assert_eq!(c.level.current_level(), 2);
    assert_eq!(c.score.score(), score);
    assert_eq!(c.lives.remaining_lives(), MAX_LIVES);
}

#[test]
fn test_go_home_mid_level_replays_that_level() {
    let mut c = playing();
    complete_level(&mut c);
    c.start_next_level();
    complete_level(&mut c);
    c.start_next_level();
    c.field.clear();
    let level_start = c.score.score();

    // Earn some points on level 3, then quit.
    let category = c.level.level_categories()[0];
    let id = place(&mut c, category);
    c.collect(id);
    c.pause();
    c.go_home();

    assert_eq!(c.score.last_played_level(), 2);
    assert_eq!(c.score.continuation_score(), level_start);

    c.continue_game();
    assert_eq!(c.level.current_level(), 3);
    assert_eq!(c.score.score(), level_start);
}

#[test]
fn test_go_home_after_game_over_resets_progress() {
    let store = SharedStore::default();
    let mut c = controller_with_store(store.clone());
    c.new_game();
    c.field.clear();
    complete_level(&mut c);
    c.start_next_level();
    c.field.clear();
    c.lives.set_lives(1);
    let bomb = place(&mut c, Category::Bomb);
    c.collect(bomb);
    assert_eq!(c.phase(), Phase::GameOver);

    c.go_home();
    assert_eq!(c.phase(), Phase::Home);
    assert!(!c.can_continue());

    let saved = store.load();
    assert_eq!(saved.last_played_level, 1);
    assert_eq!(saved.continuation_score, 0);
    assert_eq!(saved.remaining_lives, MAX_LIVES);
    assert!(saved.high_score > 0);
}

#[test]
fn test_go_home_ignored_while_playing() {
    let mut c = playing();
    c.go_home();
    assert_eq!(c.phase(), Phase::Playing);
}

#[test]
fn test_new_game_only_from_home() {
    let mut c = playing();
    let category = c.level.level_categories()[0];
    let id = place(&mut c, category);
    c.collect(id);
    c.new_game();
    assert_eq!(c.score.score(), 10);
}

#[test]
fn test_last_played_level_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.json");

    let mut c = GameController::new(
        GameConfig::default(),
        JsonFileStore::new(&path),
        RecordingAudio::default(),
        SimulatedAds::default(),
        StdRng::seed_from_u64(3),
    );
    c.score.save_last_played_level(6);
    c.persist();

    let c = GameController::new(
        GameConfig::default(),
        JsonFileStore::new(&path),
        RecordingAudio::default(),
        SimulatedAds::default(),
        StdRng::seed_from_u64(3),
    );
    assert_eq!(c.score.last_played_level(), 6);
}

#[test]
fn test_revive_with_reward() {
    let ads = ScriptedAds::default();
    ads.inner.lock().unwrap().rewarded_pays = true;
    let mut c = GameController::new(
        GameConfig::default(),
        MemoryStore::default(),
        RecordingAudio::default(),
        ads.clone(),
        StdRng::seed_from_u64(8),
    );
    c.new_game();
    c.field.clear();
    c.lives.set_lives(1);
    let bomb = place(&mut c, Category::Bomb);
    c.collect(bomb);
    assert_eq!(c.phase(), Phase::GameOver);
    assert!(c.snapshot().rewarded_available);

    assert!(c.revive_with_reward());
    assert_eq!(c.phase(), Phase::Playing);
    assert_eq!(c.lives.remaining_lives(), 1);
    assert_eq!(c.level.current_level(), 1);
    // The slot was prepared again for next time.
    assert!(ads.inner.lock().unwrap().rewarded_ready);
}

#[test]
fn test_failed_reward_stays_game_over() {
    let ads = ScriptedAds::default();
    let mut c = GameController::new(
        GameConfig::default(),
        MemoryStore::default(),
        RecordingAudio::default(),
        ads,
        StdRng::seed_from_u64(8),
    );
    c.new_game();
    c.field.clear();
    c.lives.set_lives(1);
    let bomb = place(&mut c, Category::Bomb);
    c.collect(bomb);

    assert!(!c.revive_with_reward());
    assert_eq!(c.phase(), Phase::GameOver);
}

#[test]
fn test_bomb_tick_follows_falling_bombs() {
    let audio = RecordingAudio::default();
    let mut c = GameController::new(
        GameConfig::default(),
        MemoryStore::default(),
        audio.clone(),
        SimulatedAds::default(),
        StdRng::seed_from_u64(2),
    );
    c.new_game();
    c.field.clear();
    audio.clear();

    let bomb = place(&mut c, Category::Bomb);
    c.tick(STEP);
    assert!(audio.calls().contains(&AudioCall::Loop(Sound::BombTick)));

    c.collect(bomb);
    let calls = audio.calls();
    assert!(calls.contains(&AudioCall::Play(Sound::Explosion)));
    assert!(calls.contains(&AudioCall::Stop(Sound::BombTick)));
}

#[test]
fn test_pause_stops_music() {
    let audio = RecordingAudio::default();
    let mut c = GameController::new(
        GameConfig::default(),
        MemoryStore::default(),
        audio.clone(),
        SimulatedAds::default(),
        StdRng::seed_from_u64(2),
    );
    c.new_game();
    audio.clear();
    c.pause();
    assert_eq!(audio.calls(), vec![AudioCall::StopMusic]);
    audio.clear();
    c.resume();
    assert_eq!(audio.calls().first(), Some(&AudioCall::Music(Sound::GamePlay)));
}

#[test]
fn test_audio_settings_are_saved() {
    let store = SharedStore::default();
    let mut c = controller_with_store(store.clone());
    c.set_music_enabled(false);
    c.set_effects_enabled(false);
    let saved = store.load();
    assert!(!saved.music_enabled);
    assert!(!saved.effects_enabled);

    let c = controller_with_store(store);
    let snapshot = c.snapshot();
    assert!(!snapshot.music_enabled);
    assert!(!snapshot.effects_enabled);
}

#[test]
fn test_bad_deltas_are_ignored() {
    let mut c = playing();
    let id = place(&mut c, Category::Carrot);
    c.tick(-1.0);
    c.tick(f32::NAN);
    assert_eq!(c.field.get(id).map(|i| i.position.y), Some(300.0));
}
