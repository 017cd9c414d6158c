//! The vegetable-catching game.
//!
//! The rules live in a rendering-free core:
//! - [`category`]: vegetable kinds and the bomb
//! - [`life`], [`score`], [`level`]: the three managers
//! - [`field`]: falling items, hit testing
//! - [`spawn`]: what spawns, when, and where
//! - [`controller`]: the state machine tying them together
//!
//! The remaining modules draw the core's state and feed it input.

pub mod category;
pub mod controller;
mod debug;
mod effects;
pub mod field;
mod hud;
mod input;
pub mod level;
pub mod life;
pub mod score;
pub mod spawn;
mod view;

use bevy::prelude::*;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    AppSystems, Pause,
    audio::{AudioQueue, BevyAudio},
    menus::Menu,
    screens::Screen,
    services::SimulatedAds,
    storage::JsonFileStore,
    theme::palette::level_background,
};
use controller::{GameConfig, GameController, GameEvent, Phase};

pub(super) fn plugin(app: &mut App) {
    let config = GameConfig::default();
    let queue = app.world_mut().get_resource_or_init::<AudioQueue>().clone();
    app.insert_resource(config);
    app.insert_resource(GameController::new(
        config,
        JsonFileStore::in_data_dir(),
        BevyAudio::new(queue),
        SimulatedAds::default(),
        StdRng::from_os_rng(),
    ));

    app.add_message::<GameEvent>();
    app.register_type::<Phase>();

    app.add_systems(
        Update,
        (
            tick_controller.in_set(AppSystems::TickTimers),
            publish_events.in_set(AppSystems::PublishEvents),
            (follow_phase, update_background).in_set(AppSystems::Update),
        ),
    );

    app.add_plugins((
        view::plugin,
        input::plugin,
        hud::plugin,
        effects::plugin,
        debug::plugin,
    ));
}

/// The playfield backdrop.
#[derive(Component)]
struct LevelBackground;

/// System to spawn the playfield when entering gameplay.
/// Called from `screens/gameplay.rs` on `OnEnter(Screen::Gameplay)`.
pub fn spawn_game(mut commands: Commands, controller: Res<GameController>) {
    let level = controller.level();
    commands.spawn((
        Name::new(level.background_name()),
        LevelBackground,
        Sprite::from_color(
            level_background(level.background()),
            controller.config().field_size,
        ),
        Transform::from_xyz(0.0, 0.0, -10.0),
        DespawnOnExit(Screen::Gameplay),
    ));

    info!("Playfield spawned for level {}", level.current_level());
}

fn tick_controller(time: Res<Time>, mut controller: ResMut<GameController>) {
    controller.tick(time.delta_secs());
}

/// Hand the controller's events to the rest of the app as messages.
fn publish_events(mut controller: ResMut<GameController>, mut writer: MessageWriter<GameEvent>) {
    let events = controller.drain_events();
    if !events.is_empty() {
        writer.write_batch(events);
    }
}

/// Keep screens, menus and the pause state in line with the game phase.
fn follow_phase(
    mut events: MessageReader<GameEvent>,
    screen: Res<State<Screen>>,
    mut next_screen: ResMut<NextState<Screen>>,
    mut next_menu: ResMut<NextState<Menu>>,
    mut next_pause: ResMut<NextState<Pause>>,
) {
    let Some(phase) = events
        .read()
        .filter_map(|event| match event {
            GameEvent::PhaseChanged { to, .. } => Some(*to),
            _ => None,
        })
        .last()
    else {
        return;
    };

    if phase == Phase::Home {
        next_screen.set(Screen::Title);
        next_pause.set(Pause(false));
        return;
    }

    if screen.get() != &Screen::Gameplay {
        next_screen.set(Screen::Gameplay);
    }
    next_pause.set(Pause(phase != Phase::Playing));
    next_menu.set(match phase {
        Phase::Paused => Menu::Pause,
        Phase::LevelComplete => Menu::LevelComplete,
        Phase::GameOver => Menu::GameOver,
        Phase::Home | Phase::Playing => Menu::None,
    });
}

fn update_background(
    mut events: MessageReader<GameEvent>,
    controller: Res<GameController>,
    mut background: Query<(&mut Sprite, &mut Name), With<LevelBackground>>,
) {
    if !events
        .read()
        .any(|event| matches!(event, GameEvent::LevelStarted { .. }))
    {
        return;
    }
    let Ok((mut sprite, mut name)) = background.single_mut() else {
        return;
    };
    let level = controller.level();
    sprite.color = level_background(level.background());
    *name = Name::new(level.background_name());
}
