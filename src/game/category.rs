//! Item categories - the vegetables the player collects and the bomb they avoid.

use bevy::prelude::*;

/// Diameter of a regular vegetable in playfield units.
pub const STANDARD_ITEM_SIZE: f32 = 80.0;

/// Diameter of a bomb.
pub const BOMB_SIZE: f32 = 70.0;

/// Beetroot sprites are drawn slightly larger than the others.
pub const BEETROOT_SIZE: f32 = 90.0;

/// Everything that can fall down the playfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub enum Category {
    Carrot,
    Broccoli,
    Corn,
    Potato,
    Beetroot,
    BottleGourd,
    Brinjal,
    Cabbage,
    Cauliflower,
    Cucumber,
    Mango,
    Onion,
    Bomb,
}

impl Category {
    /// The vegetable pool levels draw their active categories from.
    pub const VEGETABLES: [Category; 12] = [
        Category::Carrot,
        Category::Broccoli,
        Category::Corn,
        Category::Potato,
        Category::Beetroot,
        Category::BottleGourd,
        Category::Brinjal,
        Category::Cabbage,
        Category::Cauliflower,
        Category::Cucumber,
        Category::Mango,
        Category::Onion,
    ];

    pub fn is_vegetable(self) -> bool {
        self != Category::Bomb
    }

    /// Asset stem used for the item sprite (`images/items/<stem>.png`).
    pub fn asset_name(self) -> &'static str {
        match self {
            Category::Carrot => "carrot",
            Category::Broccoli => "broccoli",
            Category::Corn => "corn",
            Category::Potato => "potato",
            Category::Beetroot => "beetroot",
            Category::BottleGourd => "bottlegourd",
            Category::Brinjal => "brinjal",
            Category::Cabbage => "cabbage",
            Category::Cauliflower => "cauliflower",
            Category::Cucumber => "cucumber",
            Category::Mango => "mango",
            Category::Onion => "onion",
            Category::Bomb => "bomb",
        }
    }

    /// Display name for the HUD.
    pub fn name(self) -> &'static str {
        match self {
            Category::Carrot => "Carrot",
            Category::Broccoli => "Broccoli",
            Category::Corn => "Corn",
            Category::Potato => "Potato",
            Category::Beetroot => "Beetroot",
            Category::BottleGourd => "Bottle Gourd",
            Category::Brinjal => "Brinjal",
            Category::Cabbage => "Cabbage",
            Category::Cauliflower => "Cauliflower",
            Category::Cucumber => "Cucumber",
            Category::Mango => "Mango",
            Category::Onion => "Onion",
            Category::Bomb => "Bomb",
        }
    }

    /// Diameter used for spawning, hit testing and rendering.
    pub fn size(self) -> f32 {
        match self {
            Category::Bomb => BOMB_SIZE,
            Category::Beetroot => BEETROOT_SIZE,
            _ => STANDARD_ITEM_SIZE,
        }
    }

    /// Tint used when drawing the item and its HUD progress bar.
    pub fn tint(self) -> Color {
        match self {
            Category::Carrot => Color::srgb(0.95, 0.5, 0.1),
            Category::Broccoli | Category::Cabbage => Color::srgb(0.2, 0.7, 0.3),
            Category::Corn | Category::Mango => Color::srgb(0.95, 0.85, 0.2),
            Category::Potato => Color::srgb(0.6, 0.4, 0.2),
            Category::Beetroot => Color::srgb(0.75, 0.1, 0.3),
            Category::BottleGourd | Category::Cucumber => Color::srgb(0.4, 0.85, 0.55),
            Category::Brinjal | Category::Onion => Color::srgb(0.55, 0.25, 0.7),
            Category::Cauliflower => Color::srgb(0.92, 0.92, 0.88),
            Category::Bomb => Color::srgb(0.9, 0.15, 0.1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bomb_is_not_a_vegetable() {
        assert!(!Category::Bomb.is_vegetable());
        assert!(Category::VEGETABLES.iter().all(|c| c.is_vegetable()));
    }

    #[test]
    fn test_item_sizes() {
        assert_eq!(Category::Bomb.size(), BOMB_SIZE);
        assert_eq!(Category::Beetroot.size(), BEETROOT_SIZE);
        assert_eq!(Category::Onion.size(), STANDARD_ITEM_SIZE);
    }
}
