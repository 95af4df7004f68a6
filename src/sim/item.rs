//! Grid items and their id-keyed store

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::grid::Cell;
use super::schedule::TimerId;

/// Stable item identity; ids are never reused within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u32);

/// Item variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Tier-1 flower
    Daisy,
    /// Tier-2 flower
    Tulip,
    /// Tier-3 flower
    Rose,
    /// Harmful pest
    Caterpillar,
    /// Hops to a neighboring cell every couple of seconds
    Butterfly,
    /// Grows copies of itself into neighboring cells
    Weed,
    /// Rare and short-lived
    Golden,
    /// Clears its neighborhood when clicked or when the fuse runs out
    Bomb,
}

impl ItemKind {
    pub fn base_points(&self) -> i32 {
        match self {
            ItemKind::Daisy => 10,
            ItemKind::Tulip => 15,
            ItemKind::Rose => 20,
            ItemKind::Caterpillar => -5,
            ItemKind::Butterfly => 50,
            ItemKind::Weed => 25,
            ItemKind::Golden => 100,
            ItemKind::Bomb => -10,
        }
    }

    pub fn is_special(&self) -> bool {
        matches!(
            self,
            ItemKind::Butterfly | ItemKind::Weed | ItemKind::Golden | ItemKind::Bomb
        )
    }

    /// Clicking a harmful item breaks the combo
    pub fn is_harmful(&self) -> bool {
        matches!(self, ItemKind::Caterpillar | ItemKind::Bomb)
    }
}

/// Scheduled-action handles owned by an item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTimers {
    /// Natural expiry, or the fuse for bombs
    pub lifetime: Option<TimerId>,
    /// Recurring relocate/spread
    pub behavior: Option<TimerId>,
}

impl ItemTimers {
    pub fn handles(&self) -> impl Iterator<Item = TimerId> {
        self.lifetime.into_iter().chain(self.behavior)
    }
}

/// An item occupying a grid slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    pub cell: Cell,
    pub points: i32,
    pub special: bool,
    /// Effective lifetime (fuse for bombs)
    pub lifetime_ms: u64,
    pub spawned_at_ms: u64,
    #[serde(skip)]
    pub timers: ItemTimers,
}

/// Id-keyed arena of live items (iteration is by id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemStore {
    items: BTreeMap<ItemId, Item>,
    next_id: u32,
}

impl Default for ItemStore {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl ItemStore {
    /// Allocate an id and store a new item
    pub fn insert(&mut self, kind: ItemKind, cell: Cell, lifetime_ms: u64, now_ms: u64) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.items.insert(
            id,
            Item {
                id,
                kind,
                cell,
                points: kind.base_points(),
                special: kind.is_special(),
                lifetime_ms,
                spawned_at_ms: now_ms,
                timers: ItemTimers::default(),
            },
        );
        id
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        self.items.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn count_kind(&self, kind: ItemKind) -> usize {
        self.items.values().filter(|i| i.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_values() {
        let flowers = [ItemKind::Daisy, ItemKind::Tulip, ItemKind::Rose];
        assert_eq!(flowers.map(|k| k.base_points()), [10, 15, 20]);
        assert_eq!(ItemKind::Caterpillar.base_points(), -5);
        assert_eq!(ItemKind::Bomb.base_points(), -10);
        assert_eq!(ItemKind::Golden.base_points(), 100);
    }

    #[test]
    fn test_special_and_harmful() {
        assert!(ItemKind::Weed.is_special());
        assert!(!ItemKind::Caterpillar.is_special());
        assert!(ItemKind::Bomb.is_special() && ItemKind::Bomb.is_harmful());
        assert!(!ItemKind::Butterfly.is_harmful());
    }

    #[test]
    fn test_ids_never_reused() {
        let mut store = ItemStore::default();
        let a = store.insert(ItemKind::Daisy, Cell::new(0, 0), 1000, 0);
        store.remove(a);
        let b = store.insert(ItemKind::Daisy, Cell::new(0, 0), 1000, 0);
        assert_ne!(a, b);
        assert_eq!(store.len(), 1);
        assert!(store.get(a).is_none());
    }
}
