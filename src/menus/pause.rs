//! The pause menu.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use crate::{game::controller::GameController, menus::Menu, theme::widget};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::Pause), spawn_pause_menu);
    app.add_systems(
        Update,
        go_back.run_if(in_state(Menu::Pause).and(input_just_pressed(KeyCode::Escape))),
    );
}

fn spawn_pause_menu(mut commands: Commands, controller: Res<GameController>) {
    let snapshot = controller.snapshot();

    commands.spawn((
        widget::ui_root("Pause Menu"),
        GlobalZIndex(2),
        DespawnOnExit(Menu::Pause),
        children![
            widget::header("Game Paused"),
            widget::label(format!(
                "Level {} - score {}",
                snapshot.level, snapshot.score
            )),
            widget::button("Resume", resume_game),
            widget::button("Settings", open_settings_menu),
            widget::button("Home", quit_to_title),
        ],
    ));
}

fn open_settings_menu(_: On<Pointer<Click>>, mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Settings);
}

fn resume_game(_: On<Pointer<Click>>, mut controller: ResMut<GameController>) {
    controller.resume();
}

/// Leaving mid-level keeps the run continuable from the level start.
fn quit_to_title(_: On<Pointer<Click>>, mut controller: ResMut<GameController>) {
    controller.go_home();
}

fn go_back(mut controller: ResMut<GameController>) {
    controller.resume();
}
