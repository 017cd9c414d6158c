//! The main menu (seen on the title screen).

use bevy::{ecs::spawn::SpawnWith, prelude::*};

use crate::{game::controller::GameController, menus::Menu, theme::widget};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::Main), spawn_main_menu);
}

fn spawn_main_menu(mut commands: Commands, controller: Res<GameController>) {
    let snapshot = controller.snapshot();

    commands.spawn((
        widget::ui_root("Main Menu"),
        GlobalZIndex(2),
        DespawnOnExit(Menu::Main),
        Children::spawn(SpawnWith(move |parent: &mut ChildSpawner| {
            parent.spawn(widget::header("Dotrunner"));
            parent.spawn(widget::label(format!("High score {}", snapshot.high_score)));
            parent.spawn(widget::label(format!(
                "Best level {}",
                snapshot.highest_level
            )));

            parent.spawn(widget::button("New Game", start_new_game));
            if snapshot.can_continue {
                parent.spawn(widget::button(
                    format!("Continue (level {})", snapshot.continue_level),
                    continue_saved_game,
                ));
            }
            parent.spawn(widget::button("Settings", open_settings_menu));
            #[cfg(not(target_family = "wasm"))]
            parent.spawn(widget::button("Exit", exit_app));
        })),
    ));
}

fn start_new_game(_: On<Pointer<Click>>, mut controller: ResMut<GameController>) {
    controller.new_game();
}

fn continue_saved_game(_: On<Pointer<Click>>, mut controller: ResMut<GameController>) {
    controller.continue_game();
}

fn open_settings_menu(_: On<Pointer<Click>>, mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(Menu::Settings);
}

#[cfg(not(target_family = "wasm"))]
fn exit_app(_: On<Pointer<Click>>, mut app_exit: MessageWriter<AppExit>) {
    app_exit.write(AppExit::Success);
}
