use bevy::prelude::*;

/// Light text for the dark menu panels
pub const LABEL_TEXT: Color = Color::srgb(0.93, 0.93, 0.88);

/// Warm yellow for headers
pub const HEADER_TEXT: Color = Color::srgb(0.98, 0.85, 0.35);

/// Off-white text for buttons
pub const BUTTON_TEXT: Color = Color::srgb(0.96, 0.95, 0.9);
/// #3f8f4a
pub const BUTTON_BACKGROUND: Color = Color::srgb(0.247, 0.561, 0.290);
/// #57b363
pub const BUTTON_HOVERED_BACKGROUND: Color = Color::srgb(0.341, 0.702, 0.388);
/// #2d6636
pub const BUTTON_PRESSED_BACKGROUND: Color = Color::srgb(0.176, 0.400, 0.212);

/// Backdrop behind full-screen menus
pub const MENU_BACKGROUND: Color = Color::srgba(0.08, 0.12, 0.08, 0.92);

/// HUD text over the playfield
pub const HUD_TEXT: Color = Color::srgb(0.1, 0.1, 0.1);
/// A category that has reached its target
pub const HUD_DONE_TEXT: Color = Color::srgb(0.15, 0.55, 0.2);

/// One backdrop per level background, cycling every seven levels.
pub const LEVEL_BACKGROUNDS: [Color; 7] = [
    Color::srgb(0.78, 0.90, 0.97),
    Color::srgb(0.85, 0.95, 0.80),
    Color::srgb(0.99, 0.91, 0.76),
    Color::srgb(0.93, 0.84, 0.95),
    Color::srgb(0.98, 0.86, 0.82),
    Color::srgb(0.82, 0.93, 0.91),
    Color::srgb(0.95, 0.95, 0.80),
];

/// Backdrop color for a 1-based background number.
pub fn level_background(background: u32) -> Color {
    let index = background.saturating_sub(1) as usize % LEVEL_BACKGROUNDS.len();
    LEVEL_BACKGROUNDS[index]
}
