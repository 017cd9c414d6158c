//! Tapping items with the mouse or a touch.

use bevy::{prelude::*, window::PrimaryWindow};

use super::{controller::GameController, view::world_to_field};
use crate::{AppSystems, menus::Menu, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        tap_items
            .in_set(AppSystems::RecordInput)
            .run_if(in_state(Screen::Gameplay).and(in_state(Menu::None))),
    );
}

/// Forward every new press to the game as a playfield tap.
fn tap_items(
    mouse_input: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    mut controller: ResMut<GameController>,
) {
    let mut presses: Vec<Vec2> = touches
        .iter_just_pressed()
        .map(|touch| touch.position())
        .collect();
    if mouse_input.just_pressed(MouseButton::Left)
        && let Ok(window) = window_query.single()
        && let Some(cursor) = window.cursor_position()
    {
        presses.push(cursor);
    }
    if presses.is_empty() {
        return;
    }

    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let field_size = controller.config().field_size;

    for press in presses {
        let Ok(world) = camera.viewport_to_world_2d(camera_transform, press) else {
            continue;
        };
        let point = world_to_field(field_size, world);
        if let Some(id) = controller.tap(point) {
            debug!("Tapped item {} at {:?}", id, point);
        }
    }
}
