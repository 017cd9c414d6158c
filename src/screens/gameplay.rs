//! The screen state for the main gameplay.

use bevy::{input::common_conditions::input_just_pressed, prelude::*, window::WindowFocused};

use crate::{Pause, game::controller::GameController, menus::Menu, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Gameplay), crate::game::spawn_game);

    // Pausing goes through the game; the pause menu follows its phase.
    app.add_systems(
        Update,
        pause_game.run_if(
            in_state(Screen::Gameplay)
                .and(in_state(Menu::None))
                .and(input_just_pressed(KeyCode::KeyP).or(input_just_pressed(KeyCode::Escape))),
        ),
    );
    app.add_systems(
        Update,
        pause_on_focus_loss.run_if(in_state(Screen::Gameplay)),
    );
    app.add_systems(OnEnter(Pause(true)), spawn_pause_overlay);
    app.add_systems(OnExit(Screen::Gameplay), (close_menu, unpause));
}

fn pause_game(mut controller: ResMut<GameController>) {
    controller.pause();
}

fn pause_on_focus_loss(
    mut focus_events: MessageReader<WindowFocused>,
    mut controller: ResMut<GameController>,
) {
    if focus_events.read().any(|event| !event.focused) {
        info!("Window lost focus, pausing");
        controller.pause();
    }
}

fn unpause(mut next_pause: ResMut<NextState<Pause>>) {
    next_pause.set(Pause(false));
}

fn spawn_pause_overlay(mut commands: Commands) {
    commands.spawn((
        Name::new("Pause Overlay"),
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        GlobalZIndex(1),
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
        DespawnOnExit(Pause(true)),
    ));
}

fn close_menu(mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::None);
}
