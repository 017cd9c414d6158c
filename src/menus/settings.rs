//! The settings menu.
//!
//! Music and sound effect toggles are saved with the rest of the progress.
//! Volume only lasts for the session.

use bevy::{audio::Volume, input::common_conditions::input_just_pressed, prelude::*};

use crate::{
    game::controller::GameController,
    menus::Menu,
    screens::Screen,
    theme::{palette::LABEL_TEXT, widget},
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::Settings), spawn_settings_menu);
    app.add_systems(
        Update,
        go_back.run_if(in_state(Menu::Settings).and(input_just_pressed(KeyCode::Escape))),
    );

    app.add_systems(
        Update,
        (update_global_volume_label, update_toggle_labels).run_if(in_state(Menu::Settings)),
    );
}

fn spawn_settings_menu(mut commands: Commands) {
    commands.spawn((
        widget::ui_root("Settings Menu"),
        GlobalZIndex(2),
        DespawnOnExit(Menu::Settings),
        children![
            widget::header("Settings"),
            (
                Name::new("Music Row"),
                setting_row(),
                children![
                    (widget::label(""), ToggleLabel::Music),
                    widget::button_medium("Switch", toggle_music),
                ],
            ),
            (
                Name::new("Effects Row"),
                setting_row(),
                children![
                    (widget::label(""), ToggleLabel::Effects),
                    widget::button_medium("Switch", toggle_effects),
                ],
            ),
            (
                Name::new("Volume Row"),
                setting_row(),
                children![
                    widget::label("Volume"),
                    widget::button_small("-", lower_global_volume),
                    (
                        Name::new("Volume Value"),
                        Text::new("100%"),
                        TextFont::from_font_size(22.0),
                        TextColor(LABEL_TEXT),
                        GlobalVolumeLabel,
                        Node {
                            width: Val::Px(60.0),
                            justify_content: JustifyContent::Center,
                            ..default()
                        },
                    ),
                    widget::button_small("+", raise_global_volume),
                ],
            ),
            widget::button("Back", go_back_on_click),
        ],
    ));
}

fn setting_row() -> Node {
    Node {
        flex_direction: FlexDirection::Row,
        align_items: AlignItems::Center,
        column_gap: Val::Px(15.0),
        ..default()
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
enum ToggleLabel {
    Music,
    Effects,
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

fn toggle_music(_: On<Pointer<Click>>, mut controller: ResMut<GameController>) {
    let enabled = !controller.music_enabled();
    controller.set_music_enabled(enabled);
    info!("Music {}", on_off(enabled));
}

fn toggle_effects(_: On<Pointer<Click>>, mut controller: ResMut<GameController>) {
    let enabled = !controller.effects_enabled();
    controller.set_effects_enabled(enabled);
    info!("Sound effects {}", on_off(enabled));
}

fn update_toggle_labels(
    controller: Res<GameController>,
    mut labels: Query<(&ToggleLabel, &mut Text)>,
) {
    for (label, mut text) in &mut labels {
        let content = match label {
            ToggleLabel::Music => format!("Music: {}", on_off(controller.music_enabled())),
            ToggleLabel::Effects => format!("Effects: {}", on_off(controller.effects_enabled())),
        };
        if text.0 != content {
            text.0 = content;
        }
    }
}

const MIN_VOLUME: f32 = 0.0;
const MAX_VOLUME: f32 = 3.0;

fn lower_global_volume(_: On<Pointer<Click>>, mut global_volume: ResMut<GlobalVolume>) {
    let linear = (global_volume.volume.to_linear() - 0.1).max(MIN_VOLUME);
    global_volume.volume = Volume::Linear(linear);
}

fn raise_global_volume(_: On<Pointer<Click>>, mut global_volume: ResMut<GlobalVolume>) {
    let linear = (global_volume.volume.to_linear() + 0.1).min(MAX_VOLUME);
    global_volume.volume = Volume::Linear(linear);
}

#[derive(Component, Reflect)]
#[reflect(Component)]
struct GlobalVolumeLabel;

fn update_global_volume_label(
    global_volume: Res<GlobalVolume>,
    mut label: Single<&mut Text, With<GlobalVolumeLabel>>,
) {
    let percent = 100.0 * global_volume.volume.to_linear();
    label.0 = format!("{percent:3.0}%");
}

fn back_to(screen: &Screen) -> Menu {
    if screen == &Screen::Title {
        Menu::Main
    } else {
        Menu::Pause
    }
}

fn go_back_on_click(
    _: On<Pointer<Click>>,
    screen: Res<State<Screen>>,
    mut next_menu: ResMut<NextState<Menu>>,
) {
    next_menu.set(back_to(screen.get()));
}

fn go_back(screen: Res<State<Screen>>, mut next_menu: ResMut<NextState<Menu>>) {
    next_menu.set(back_to(screen.get()));
}
