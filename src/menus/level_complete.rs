//! Shown between levels.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use crate::{game::controller::GameController, menus::Menu, theme::widget};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::LevelComplete), spawn_level_complete_menu);
    app.add_systems(
        Update,
        next_level.run_if(
            in_state(Menu::LevelComplete)
                .and(input_just_pressed(KeyCode::Enter).or(input_just_pressed(KeyCode::Space))),
        ),
    );
}

fn spawn_level_complete_menu(mut commands: Commands, controller: Res<GameController>) {
    let snapshot = controller.snapshot();

    commands.spawn((
        widget::ui_root("Level Complete Menu"),
        GlobalZIndex(2),
        DespawnOnExit(Menu::LevelComplete),
        children![
            widget::header(format!("Level {} complete!", snapshot.level)),
            widget::label(format!("Score {}", snapshot.score)),
            widget::label(format!("High score {}", snapshot.high_score)),
            widget::button("Next Level", next_level_on_click),
            widget::button("Home", quit_to_title),
        ],
    ));
}

fn next_level_on_click(_: On<Pointer<Click>>, mut controller: ResMut<GameController>) {
    controller.start_next_level();
}

fn next_level(mut controller: ResMut<GameController>) {
    controller.start_next_level();
}

fn quit_to_title(_: On<Pointer<Click>>, mut controller: ResMut<GameController>) {
    controller.go_home();
}
