//! Item sprites. Each falling item gets an entity that mirrors it every
//! frame; the field stays the source of truth.

use std::collections::HashMap;

use bevy::prelude::*;

use super::{
    category::Category,
    controller::GameController,
    field::{COLLECT_ANIMATION_SECS, FallingItem, ItemId, ItemState},
};
use crate::{AppSystems, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<ItemMeshes>();
    app.add_systems(
        Update,
        sync_item_sprites
            .in_set(AppSystems::Update)
            .run_if(in_state(Screen::Gameplay)),
    );
    app.add_systems(OnExit(Screen::Gameplay), clear_meshes);
}

/// Marks the entity drawing a field item.
#[derive(Component, Debug, Clone, Copy)]
pub struct ItemSprite(pub ItemId);

/// One circle mesh per category size, shared by all items of that kind.
#[derive(Resource, Default)]
struct ItemMeshes(HashMap<Category, Handle<Mesh>>);

/// Convert a playfield point (origin top left, y down) to world space
/// (origin at the field's center, y up).
pub fn field_to_world(field_size: Vec2, point: Vec2) -> Vec2 {
    Vec2::new(point.x - field_size.x * 0.5, field_size.y * 0.5 - point.y)
}

/// Inverse of [`field_to_world`].
pub fn world_to_field(field_size: Vec2, point: Vec2) -> Vec2 {
    Vec2::new(point.x + field_size.x * 0.5, field_size.y * 0.5 - point.y)
}

/// Scale and alpha to draw an item with. Collected items grow toward their
/// final scale and fade out over the collect animation.
fn display_scale_and_alpha(item: &FallingItem) -> (f32, f32) {
    match item.state {
        ItemState::Falling => (item.scale, item.opacity),
        ItemState::Collected { remaining } => {
            let t = (1.0 - remaining / COLLECT_ANIMATION_SECS).clamp(0.0, 1.0);
            (1.0 + (item.scale - 1.0) * t, 1.0 - t)
        }
    }
}

fn sync_item_sprites(
    mut commands: Commands,
    controller: Res<GameController>,
    mut item_meshes: ResMut<ItemMeshes>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut sprites: Query<(
        Entity,
        &ItemSprite,
        &mut Transform,
        &MeshMaterial2d<ColorMaterial>,
    )>,
) {
    let field_size = controller.config().field_size;
    let mut items: HashMap<ItemId, &FallingItem> = controller
        .field()
        .items()
        .iter()
        .map(|item| (item.id, item))
        .collect();

    for (entity, sprite, mut transform, material) in &mut sprites {
        let Some(item) = items.remove(&sprite.0) else {
            commands.entity(entity).despawn();
            continue;
        };

        let (scale, alpha) = display_scale_and_alpha(item);
        let position = field_to_world(field_size, item.position);
        transform.translation = position.extend(transform.translation.z);
        transform.scale = Vec3::splat(scale);
        if let Some(material) = materials.get_mut(&material.0) {
            material.color = item.category.tint().with_alpha(alpha);
        }
    }

    // Whatever is left has no sprite yet.
    for item in items.into_values() {
        let mesh = item_meshes
            .0
            .entry(item.category)
            .or_insert_with(|| meshes.add(Circle::new(item.category.size() * 0.5)))
            .clone();
        // Newer items draw on top, matching hit testing.
        let z = 1.0 + (item.id.0 % 1000) as f32 * 0.001;
        let position = field_to_world(field_size, item.position);

        commands.spawn((
            Name::new(format!("{} {}", item.category.asset_name(), item.id)),
            ItemSprite(item.id),
            Mesh2d(mesh),
            MeshMaterial2d(materials.add(ColorMaterial::from_color(item.category.tint()))),
            Transform::from_translation(position.extend(z)),
            DespawnOnExit(Screen::Gameplay),
            children![(
                Name::new("Item Label"),
                Text2d::new(item.category.name()),
                TextFont::from_font_size(14.0),
                TextColor(Color::WHITE),
                Transform::from_xyz(0.0, 0.0, 0.01),
            )],
        ));
    }
}

fn clear_meshes(mut item_meshes: ResMut<ItemMeshes>) {
    item_meshes.0.clear();
}
