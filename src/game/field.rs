//! The playfield and the items falling through it.
//!
//! Positions are in playfield units with the origin at the top-left corner
//! and y growing downwards, so an item is missed once its y passes the
//! field height.

use bevy::prelude::*;

use super::category::Category;

/// How long a collected item lingers (scaling up and fading out) before removal.
pub const COLLECT_ANIMATION_SECS: f32 = 0.3;

/// Scale a collected vegetable grows to while fading.
const COLLECTED_SCALE: f32 = 1.5;

/// Scale an exploding bomb grows to while fading.
const EXPLODED_SCALE: f32 = 2.0;

/// Unique id of an item within a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemState {
    Falling,
    /// Tapped; removed once the animation runs out.
    Collected { remaining: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FallingItem {
    pub id: ItemId,
    pub category: Category,
    pub position: Vec2,
    pub scale: f32,
    pub opacity: f32,
    pub state: ItemState,
}

impl FallingItem {
    pub fn is_falling(&self) -> bool {
        self.state == ItemState::Falling
    }

    /// Whether a point lands on the item.
    pub fn contains(&self, point: Vec2) -> bool {
        let radius = self.category.size() * self.scale * 0.5;
        self.position.distance_squared(point) <= radius * radius
    }
}

/// Outcome of moving every item one step down.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FallStep {
    /// Vegetables that fell past the bottom edge this step.
    pub missed: Vec<FallingItem>,
    /// Bombs that fell past the bottom edge; they carry no penalty.
    pub dropped_bombs: Vec<FallingItem>,
}

#[derive(Debug, Clone)]
pub struct ItemField {
    size: Vec2,
    items: Vec<FallingItem>,
    next_id: u64,
}

impl ItemField {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            items: Vec::new(),
            next_id: 1,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn items(&self) -> &[FallingItem] {
        &self.items
    }

    #[allow(dead_code)]
    pub fn get(&self, id: ItemId) -> Option<&FallingItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn spawn(&mut self, category: Category, position: Vec2) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.items.push(FallingItem {
            id,
            category,
            position,
            scale: 1.0,
            opacity: 1.0,
            state: ItemState::Falling,
        });
        id
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Bombs still falling (exploding bombs don't count).
    pub fn falling_bombs(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.category == Category::Bomb && item.is_falling())
            .count()
    }

    /// Move falling items down by `speed` and take out those past the bottom.
    pub fn step(&mut self, speed: f32) -> FallStep {
        let bottom = self.size.y;
        let mut result = FallStep::default();

        self.items.retain_mut(|item| {
            if !item.is_falling() {
                return true;
            }
            item.position.y += speed;
            if item.position.y <= bottom {
                return true;
            }
            if item.category.is_vegetable() {
                result.missed.push(item.clone());
            } else {
                result.dropped_bombs.push(item.clone());
            }
            false
        });

        result
    }

    /// The topmost falling item under a point. Later spawns are drawn on top.
    pub fn item_at(&self, point: Vec2) -> Option<ItemId> {
        self.items
            .iter()
            .rev()
            .find(|item| item.is_falling() && item.contains(point))
            .map(|item| item.id)
    }

    /// Start the collect animation. Returns the item if it was still falling.
    pub fn mark_collected(&mut self, id: ItemId) -> Option<FallingItem> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id && item.is_falling())?;
        item.scale = if item.category.is_vegetable() {
            COLLECTED_SCALE
        } else {
            EXPLODED_SCALE
        };
        item.opacity = 0.0;
        item.state = ItemState::Collected {
            remaining: COLLECT_ANIMATION_SECS,
        };
        Some(item.clone())
    }

    /// Run down collect animations and drop the finished ones.
    pub fn advance_animations(&mut self, delta: f32) {
        self.items.retain_mut(|item| match &mut item.state {
            ItemState::Falling => true,
            ItemState::Collected { remaining } => {
                *remaining -= delta;
                *remaining > 0.0
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> ItemField {
        ItemField::new(Vec2::new(400.0, 800.0))
    }

    #[test]
    fn test_ids_are_unique() {
        let mut field = field();
        let a = field.spawn(Category::Carrot, Vec2::new(100.0, 100.0));
        let b = field.spawn(Category::Carrot, Vec2::new(100.0, 100.0));
        assert_ne!(a, b);
        field.clear();
        let c = field.spawn(Category::Carrot, Vec2::new(100.0, 100.0));
        assert!(c > b);
    }

    #[test]
    fn test_step_splits_misses_and_bombs() {
        let mut field = field();
        field.spawn(Category::Corn, Vec2::new(50.0, 798.0));
        field.spawn(Category::Bomb, Vec2::new(150.0, 799.0));
        let kept = field.spawn(Category::Onion, Vec2::new(250.0, 100.0));

        let step = field.step(3.0);
        assert_eq!(step.missed.len(), 1);
        assert_eq!(step.missed[0].category, Category::Corn);
        assert_eq!(step.dropped_bombs.len(), 1);
        assert_eq!(field.items().len(), 1);
        assert_eq!(field.get(kept).map(|i| i.position.y), Some(103.0));
    }

    #[test]
    fn test_collected_items_stop_and_expire() {
        let mut field = field();
        let id = field.spawn(Category::Bomb, Vec2::new(200.0, 200.0));
        let item = field.mark_collected(id).unwrap();
        assert_eq!(item.scale, 2.0);
        assert_eq!(item.opacity, 0.0);

        field.step(5.0);
        assert_eq!(field.get(id).map(|i| i.position.y), Some(200.0));
        assert_eq!(field.falling_bombs(), 0);
        assert!(field.mark_collected(id).is_none());

        field.advance_animations(0.2);
        assert!(field.get(id).is_some());
        field.advance_animations(0.2);
        assert!(field.get(id).is_none());
    }

    #[test]
    fn test_item_at_prefers_topmost() {
        let mut field = field();
        let _below = field.spawn(Category::Carrot, Vec2::new(100.0, 100.0));
        let above = field.spawn(Category::Mango, Vec2::new(110.0, 100.0));
        assert_eq!(field.item_at(Vec2::new(105.0, 100.0)), Some(above));
        assert_eq!(field.item_at(Vec2::new(300.0, 300.0)), None);
    }
}
