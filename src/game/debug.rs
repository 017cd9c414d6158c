//! Debug overlay for the playfield.
//!
//! Toggle with the 'D' key during gameplay.
//! Shows:
//! - Playfield bounds and the spawn band for the current level
//! - Hit circles for every item (bombs in red)

use bevy::{color::palettes::css, input::common_conditions::input_just_pressed, prelude::*};

use super::{controller::GameController, spawn::spawn_band, view::field_to_world};
use crate::screens::Screen;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<DebugOverlayVisible>();

    app.add_systems(
        Update,
        toggle_debug.run_if(in_state(Screen::Gameplay).and(input_just_pressed(KeyCode::KeyD))),
    );

    app.add_systems(
        Update,
        draw_debug_overlay.run_if(in_state(Screen::Gameplay).and(debug_visible)),
    );
}

#[derive(Resource, Default)]
pub struct DebugOverlayVisible(pub bool);

fn debug_visible(debug: Res<DebugOverlayVisible>) -> bool {
    debug.0
}

fn toggle_debug(mut debug: ResMut<DebugOverlayVisible>) {
    debug.0 = !debug.0;
    let state = if debug.0 { "ON" } else { "OFF" };
    info!("Debug overlay: {}", state);
}

fn draw_debug_overlay(mut gizmos: Gizmos, controller: Res<GameController>) {
    let size = controller.config().field_size;

    gizmos.rect_2d(Isometry2d::IDENTITY, size, css::WHITE.with_alpha(0.6));

    // Spawn band
    let (min, max) = spawn_band(controller.level().current_level());
    for fraction in [min, max] {
        let y = field_to_world(size, Vec2::new(0.0, fraction * size.y)).y;
        gizmos.line_2d(
            Vec2::new(-size.x * 0.5, y),
            Vec2::new(size.x * 0.5, y),
            css::GOLD.with_alpha(0.5),
        );
    }

    for item in controller.field().items() {
        let color = if !item.is_falling() {
            css::GRAY.with_alpha(0.4)
        } else if item.category.is_vegetable() {
            css::LIMEGREEN.with_alpha(0.7)
        } else {
            css::INDIAN_RED.with_alpha(0.8)
        };
        let radius = item.category.size() * item.scale * 0.5;
        gizmos.circle_2d(
            Isometry2d::from_translation(field_to_world(size, item.position)),
            radius,
            color,
        );
    }
}
