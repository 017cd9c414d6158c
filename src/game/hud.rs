//! Score, level, lives and per-vegetable progress over the playfield.

use bevy::prelude::*;

use super::{controller::GameController, life::MISSES_PER_LIFE};
use crate::{
    AppSystems,
    menus::Menu,
    screens::Screen,
    theme::{
        palette::{HUD_DONE_TEXT, HUD_TEXT},
        widget,
    },
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Gameplay), spawn_hud);
    app.add_systems(
        Update,
        update_hud
            .in_set(AppSystems::Update)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// One line of HUD text and what it shows.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
enum HudText {
    Score,
    Level,
    Lives,
    Misses,
    /// The nth active vegetable and its collected count.
    Progress(usize),
}

fn hud_text(kind: HudText) -> impl Bundle {
    (
        Name::new(format!("HUD {:?}", kind)),
        kind,
        Text::default(),
        TextFont::from_font_size(20.0),
        TextColor(HUD_TEXT),
    )
}

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Name::new("HUD"),
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            padding: UiRect::all(Val::Px(12.0)),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(6.0),
            ..default()
        },
        Pickable::IGNORE,
        DespawnOnExit(Screen::Gameplay),
        children![
            (
                Name::new("Status Row"),
                Node {
                    justify_content: JustifyContent::SpaceBetween,
                    align_items: AlignItems::Center,
                    column_gap: Val::Px(16.0),
                    ..default()
                },
                children![
                    hud_text(HudText::Level),
                    hud_text(HudText::Score),
                    hud_text(HudText::Lives),
                    hud_text(HudText::Misses),
                    widget::button_small("II", pause_on_click),
                ],
            ),
            (
                Name::new("Progress Row"),
                Node {
                    column_gap: Val::Px(14.0),
                    flex_wrap: FlexWrap::Wrap,
                    ..default()
                },
                children![
                    hud_text(HudText::Progress(0)),
                    hud_text(HudText::Progress(1)),
                    hud_text(HudText::Progress(2)),
                    hud_text(HudText::Progress(3)),
                ],
            ),
        ],
    ));
}

fn pause_on_click(
    _: On<Pointer<Click>>,
    menu: Res<State<Menu>>,
    mut controller: ResMut<GameController>,
) {
    if menu.get() == &Menu::None {
        controller.pause();
    }
}

fn update_hud(
    controller: Res<GameController>,
    mut texts: Query<(&HudText, &mut Text, &mut TextColor)>,
) {
    if !controller.is_changed() {
        return;
    }
    let snapshot = controller.snapshot();

    for (kind, mut text, mut color) in &mut texts {
        let content = match *kind {
            HudText::Score => format!("Score {}", snapshot.score),
            HudText::Level => format!("Level {}", snapshot.level),
            HudText::Lives => format!("Lives {}", snapshot.remaining_lives),
            HudText::Misses => format!(
                "Chances {}/{}",
                controller.lives().remaining_chances(),
                MISSES_PER_LIFE
            ),
            HudText::Progress(index) => match snapshot.progress.get(index) {
                Some(&(category, collected)) => {
                    color.0 = if collected >= snapshot.target_count {
                        HUD_DONE_TEXT
                    } else {
                        HUD_TEXT
                    };
                    format!(
                        "{} {}/{}",
                        category.name(),
                        collected.min(snapshot.target_count),
                        snapshot.target_count
                    )
                }
                None => String::new(),
            },
        };
        if text.0 != content {
            text.0 = content;
        }
    }
}
