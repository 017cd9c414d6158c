//! Game juice - screen shake, floating score text, and a red flash when a
//! life is lost.

use bevy::prelude::*;
use rand::Rng;

use super::{
    category::Category,
    controller::{GameController, GameEvent},
    view::field_to_world,
};
use crate::{AppSystems, PausableSystems, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    // Screen shake
    app.init_resource::<ScreenShake>();
    app.add_systems(
        Update,
        (
            trigger_shake_on_events.in_set(AppSystems::Update),
            // Keeps decaying while paused so the camera settles.
            apply_screen_shake.after(trigger_shake_on_events),
        )
            .run_if(in_state(Screen::Gameplay)),
    );
    app.add_systems(OnExit(Screen::Gameplay), reset_screen_shake);

    // Floating score text
    app.add_systems(
        Update,
        (
            spawn_floating_text.in_set(AppSystems::Update),
            animate_floating_text.in_set(PausableSystems),
        )
            .run_if(in_state(Screen::Gameplay)),
    );

    // Life lost flash
    app.add_systems(
        Update,
        (spawn_life_flash.in_set(AppSystems::Update), fade_life_flash)
            .run_if(in_state(Screen::Gameplay)),
    );
}

// =============================================================================
// SCREEN SHAKE
// =============================================================================

/// Resource tracking screen shake state.
#[derive(Resource, Default)]
pub struct ScreenShake {
    /// Current trauma level (0.0 to 1.0).
    pub trauma: f32,
    /// Base position to return to.
    pub base_position: Vec3,
}

impl ScreenShake {
    fn add_trauma(&mut self, amount: f32) {
        self.trauma = (self.trauma + amount).min(1.0);
    }
}

/// Maximum shake offset in world units.
const MAX_SHAKE_OFFSET: f32 = 14.0;
/// How fast trauma decays per second.
const TRAUMA_DECAY: f32 = 2.5;

/// Trauma added by each event, if any.
fn shake_for(event: &GameEvent) -> Option<f32> {
    match event {
        GameEvent::BombExploded { .. } => Some(0.9),
        GameEvent::LifeLost { .. } => Some(0.4),
        GameEvent::ItemMissed { .. } => Some(0.15),
        _ => None,
    }
}

fn trigger_shake_on_events(mut shake: ResMut<ScreenShake>, mut events: MessageReader<GameEvent>) {
    for event in events.read() {
        if let Some(amount) = shake_for(event) {
            shake.add_trauma(amount);
            debug!("Screen shake from {:?}, trauma={}", event, shake.trauma);
        }
    }
}

/// Apply screen shake to camera.
fn apply_screen_shake(
    time: Res<Time>,
    mut shake: ResMut<ScreenShake>,
    mut camera_query: Query<&mut Transform, With<Camera2d>>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    if shake.trauma > 0.0 {
        let mut rng = rand::rng();

        // Shake amount = trauma^2 (makes it feel more natural)
        let shake_amount = shake.trauma * shake.trauma;
        let offset_x = rng.random_range(-1.0..1.0) * MAX_SHAKE_OFFSET * shake_amount;
        let offset_y = rng.random_range(-1.0..1.0) * MAX_SHAKE_OFFSET * shake_amount;

        camera_transform.translation.x = shake.base_position.x + offset_x;
        camera_transform.translation.y = shake.base_position.y + offset_y;

        shake.trauma = (shake.trauma - TRAUMA_DECAY * time.delta_secs()).max(0.0);
    } else {
        camera_transform.translation.x = shake.base_position.x;
        camera_transform.translation.y = shake.base_position.y;
    }
}

fn reset_screen_shake(
    mut shake: ResMut<ScreenShake>,
    mut camera_query: Query<&mut Transform, With<Camera2d>>,
) {
    shake.trauma = 0.0;
    if let Ok(mut camera_transform) = camera_query.single_mut() {
        camera_transform.translation = shake.base_position;
    }
}

// =============================================================================
// FLOATING TEXT
// =============================================================================

/// Score text that drifts up from a collected item and fades.
#[derive(Component)]
pub struct FloatingText {
    pub timer: f32,
    pub duration: f32,
    pub start_y: f32,
    pub float_distance: f32,
    pub color: Color,
}

const POINTS_COLOR: Color = Color::srgb(0.15, 0.6, 0.2);
const PENALTY_COLOR: Color = Color::srgb(0.85, 0.15, 0.1);

/// Text, color and playfield position to float for an event.
fn floating_text_for(event: &GameEvent) -> Option<(String, Color, Vec2)> {
    match event {
        GameEvent::ItemCollected { position, .. } => {
            Some(("+10".to_string(), POINTS_COLOR, *position))
        }
        GameEvent::BombExploded { position, .. } => {
            Some(("-20".to_string(), PENALTY_COLOR, *position))
        }
        GameEvent::ItemMissed {
            category, position, ..
        } => Some((
            format!("Missed {}", category.name()),
            PENALTY_COLOR,
            // Just above the bottom edge, where the item left.
            *position - Vec2::Y * Category::Carrot.size(),
        )),
        _ => None,
    }
}

fn spawn_floating_text(
    mut commands: Commands,
    mut events: MessageReader<GameEvent>,
    controller: Res<GameController>,
) {
    let field_size = controller.config().field_size;
    for event in events.read() {
        let Some((text, color, position)) = floating_text_for(event) else {
            continue;
        };
        let world = field_to_world(field_size, position);

        commands.spawn((
            Name::new("Floating Text"),
            FloatingText {
                timer: 0.0,
                duration: 0.8,
                start_y: world.y,
                float_distance: 50.0,
                color,
            },
            Text2d::new(text),
            TextFont {
                font_size: 28.0,
                ..default()
            },
            TextColor(color),
            Transform::from_translation(world.extend(10.0)).with_scale(Vec3::splat(0.5)),
            DespawnOnExit(Screen::Gameplay),
        ));
    }
}

/// Float upward and fade out.
fn animate_floating_text(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, &mut FloatingText, &mut TextColor)>,
) {
    for (entity, mut transform, mut floating, mut color) in &mut query {
        floating.timer += time.delta_secs();
        let progress = (floating.timer / floating.duration).min(1.0);

        // Pop in, then hold
        let scale = if progress < 0.2 {
            0.5 + progress / 0.2 * 0.7
        } else {
            1.2
        };
        transform.scale = Vec3::splat(scale);
        transform.translation.y = floating.start_y + floating.float_distance * progress;

        let alpha = if progress > 0.6 {
            1.0 - (progress - 0.6) / 0.4
        } else {
            1.0
        };
        color.0 = floating.color.with_alpha(alpha);

        if progress >= 1.0 {
            commands.entity(entity).despawn();
        }
    }
}

// =============================================================================
// LIFE LOST FLASH
// =============================================================================

/// Full-screen red overlay that fades out.
#[derive(Component)]
struct LifeFlash {
    remaining: f32,
}

const FLASH_SECS: f32 = 0.35;
const FLASH_ALPHA: f32 = 0.35;

fn spawn_life_flash(mut commands: Commands, mut events: MessageReader<GameEvent>) {
    if !events
        .read()
        .any(|event| matches!(event, GameEvent::LifeLost { .. }))
    {
        return;
    }

    commands.spawn((
        Name::new("Life Flash"),
        LifeFlash {
            remaining: FLASH_SECS,
        },
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        BackgroundColor(PENALTY_COLOR.with_alpha(FLASH_ALPHA)),
        Pickable::IGNORE,
        GlobalZIndex(3),
        DespawnOnExit(Screen::Gameplay),
    ));
}

fn fade_life_flash(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut LifeFlash, &mut BackgroundColor)>,
) {
    for (entity, mut flash, mut background) in &mut query {
        flash.remaining -= time.delta_secs();
        if flash.remaining <= 0.0 {
            commands.entity(entity).despawn();
            continue;
        }
        let alpha = FLASH_ALPHA * flash.remaining / FLASH_SECS;
        background.0 = PENALTY_COLOR.with_alpha(alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::field::ItemId;

    #[test]
    fn test_bombs_shake_hardest() {
        let bomb = shake_for(&GameEvent::BombExploded {
            id: ItemId(1),
            position: Vec2::ZERO,
        });
        let life = shake_for(&GameEvent::LifeLost { remaining: 2 });
        assert!(bomb > life);
        assert_eq!(shake_for(&GameEvent::Revived), None);
    }

    #[test]
    fn test_trauma_is_capped() {
        let mut shake = ScreenShake::default();
        shake.add_trauma(0.9);
        shake.add_trauma(0.9);
        assert_eq!(shake.trauma, 1.0);
    }

    #[test]
    fn test_floating_text_for_points() {
        let collected = GameEvent::ItemCollected {
            id: ItemId(4),
            category: Category::Corn,
            position: Vec2::new(10.0, 20.0),
        };
        let (text, color, position) = floating_text_for(&collected).unwrap();
        assert_eq!(text, "+10");
        assert_eq!(color, POINTS_COLOR);
        assert_eq!(position, Vec2::new(10.0, 20.0));

        assert!(floating_text_for(&GameEvent::LevelStarted { level: 2 }).is_none());
    }
}
