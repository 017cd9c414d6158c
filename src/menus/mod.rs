//! The game's menus and transitions between them.

mod gameover;
mod level_complete;
mod main;
mod pause;
mod settings;

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.init_state::<Menu>();

    app.add_plugins((
        gameover::plugin,
        level_complete::plugin,
        main::plugin,
        pause::plugin,
        settings::plugin,
    ));
}

#[derive(States, Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Menu {
    #[default]
    None,
    Main,
    Settings,
    Pause,
    LevelComplete,
    GameOver,
}
