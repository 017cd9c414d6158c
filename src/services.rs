//! Audio and ad services the game core talks to.
//!
//! Both are fire-and-forget: the core never waits on them and carries on with
//! its transition whether or not a sound played or an ad showed.

use tracing::{debug, info};

/// Every sound the game plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    Swipe,
    BombTick,
    Explosion,
    GameHome,
    GamePlay,
    GameBonus,
    LevelFail,
    LevelWin,
}

impl Sound {
    pub const ALL: [Sound; 8] = [
        Sound::Swipe,
        Sound::BombTick,
        Sound::Explosion,
        Sound::GameHome,
        Sound::GamePlay,
        Sound::GameBonus,
        Sound::LevelFail,
        Sound::LevelWin,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Sound::Swipe => "swipe",
            Sound::BombTick => "bombtick",
            Sound::Explosion => "explosion",
            Sound::GameHome => "game_home",
            Sound::GamePlay => "game_play",
            Sound::GameBonus => "gamebonus",
            Sound::LevelFail => "levelfail",
            Sound::LevelWin => "levelwin",
        }
    }

    /// Music tracks are governed by the music toggle, the rest by effects.
    pub fn is_music(self) -> bool {
        matches!(self, Sound::GameHome | Sound::GamePlay)
    }

    pub fn asset_path(self) -> String {
        format!("audio/{}.ogg", self.name())
    }
}

pub trait AudioService: Send + Sync + 'static {
    fn play_sound(&mut self, sound: Sound);
    fn play_looping(&mut self, sound: Sound);
    fn stop_sound(&mut self, sound: Sound);
    fn play_background_music(&mut self, track: Sound);
    fn stop_background_music(&mut self);
    fn stop_all(&mut self);
    fn set_music_enabled(&mut self, enabled: bool);
    fn set_effects_enabled(&mut self, enabled: bool);
}

/// Plays nothing. For headless runs and tests that don't care about sound.
#[allow(dead_code)]
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioService for SilentAudio {
    fn play_sound(&mut self, _sound: Sound) {}
    fn play_looping(&mut self, _sound: Sound) {}
    fn stop_sound(&mut self, _sound: Sound) {}
    fn play_background_music(&mut self, _track: Sound) {}
    fn stop_background_music(&mut self) {}
    fn stop_all(&mut self) {}
    fn set_music_enabled(&mut self, _enabled: bool) {}
    fn set_effects_enabled(&mut self, _enabled: bool) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdOutcome {
    Shown,
    Skipped,
}

pub trait AdService: Send + Sync + 'static {
    fn prepare_interstitial(&mut self);
    fn prepare_rewarded(&mut self);
    /// Show an interstitial if one is loaded and this level calls for it.
    fn show_interstitial_if_due(&mut self, level: u32) -> AdOutcome;
    fn is_rewarded_available(&self) -> bool;
    /// Show a rewarded ad. Returns true if the player earned the reward.
    fn show_rewarded(&mut self) -> bool;
}

/// Stand-in ad network: ads load instantly and always complete.
#[derive(Debug, Clone)]
pub struct SimulatedAds {
    interstitial_ready: bool,
    rewarded_ready: bool,
    /// An interstitial is due on every level divisible by this.
    interstitial_every: u32,
}

impl Default for SimulatedAds {
    fn default() -> Self {
        Self {
            interstitial_ready: false,
            rewarded_ready: false,
            interstitial_every: 3,
        }
    }
}

impl AdService for SimulatedAds {
    fn prepare_interstitial(&mut self) {
        self.interstitial_ready = true;
        debug!("Interstitial ad ready");
    }

    fn prepare_rewarded(&mut self) {
        self.rewarded_ready = true;
        debug!("Rewarded ad ready");
    }

    fn show_interstitial_if_due(&mut self, level: u32) -> AdOutcome {
        let due = level > 1 && level % self.interstitial_every == 0;
        if !self.interstitial_ready || !due {
            return AdOutcome::Skipped;
        }
        self.interstitial_ready = false;
        info!("Showing interstitial ad after level {}", level);
        AdOutcome::Shown
    }

    fn is_rewarded_available(&self) -> bool {
        self.rewarded_ready
    }

    fn show_rewarded(&mut self) -> bool {
        if !self.rewarded_ready {
            return false;
        }
        self.rewarded_ready = false;
        info!("Showing rewarded ad");
        true
    }
}
