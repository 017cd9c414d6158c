//! The game over menu.

use bevy::{ecs::spawn::SpawnWith, prelude::*};

use crate::{game::controller::GameController, menus::Menu, theme::widget};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::GameOver), spawn_gameover_menu);
}

fn spawn_gameover_menu(mut commands: Commands, controller: Res<GameController>) {
    let snapshot = controller.snapshot();

    commands.spawn((
        widget::ui_root("Game Over Menu"),
        GlobalZIndex(2),
        DespawnOnExit(Menu::GameOver),
        Children::spawn(SpawnWith(move |parent: &mut ChildSpawner| {
            parent.spawn(widget::header("Game Over"));
            parent.spawn(widget::label(format!(
                "Level {} - score {}",
                snapshot.level, snapshot.score
            )));
            parent.spawn(widget::label(format!("High score {}", snapshot.high_score)));
            if snapshot.rewarded_available {
                parent.spawn(widget::button("Watch ad for a life", revive));
            }
            parent.spawn(widget::button("Home", quit_to_title));
        })),
    ));
}

fn revive(_: On<Pointer<Click>>, mut controller: ResMut<GameController>) {
    if !controller.revive_with_reward() {
        info!("No reward earned, staying on game over");
    }
}

fn quit_to_title(_: On<Pointer<Click>>, mut controller: ResMut<GameController>) {
    controller.go_home();
}
