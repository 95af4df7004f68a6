//! Spawn scheduling: when, where and what

use rand::Rng;
use rand::seq::IteratorRandom;

use super::difficulty::{DifficultySettings, MsRange};
use super::grid::{Cell, Grid};
use super::item::ItemKind;
use crate::consts::*;
use crate::settings::LayoutClass;

/// Special item by percentile roll: Butterfly 40, Weed 30, Bomb 20, Golden 10
pub fn special_kind(roll: u32) -> ItemKind {
    match roll % 100 {
        0..40 => ItemKind::Butterfly,
        40..70 => ItemKind::Weed,
        70..90 => ItemKind::Bomb,
        _ => ItemKind::Golden,
    }
}

/// Flower tier by percentile roll: 50 / 30 / 20
pub fn flower_kind(roll: u32) -> ItemKind {
    match roll % 100 {
        0..50 => ItemKind::Daisy,
        50..80 => ItemKind::Tulip,
        _ => ItemKind::Rose,
    }
}

/// Two-stage weighted pick: special branch first, then caterpillar vs flower
pub fn choose_kind<R: Rng>(rng: &mut R, settings: &DifficultySettings) -> ItemKind {
    if rng.random::<f64>() < settings.special_item_chance {
        return special_kind(rng.random_range(0..100));
    }
    if rng.random::<f64>() < settings.caterpillar_ratio {
        return ItemKind::Caterpillar;
    }
    flower_kind(rng.random_range(0..100))
}

pub fn random_in<R: Rng>(rng: &mut R, range: MsRange) -> u64 {
    if range.max <= range.min {
        return range.min;
    }
    rng.random_range(range.min..=range.max)
}

/// Lifetime for a freshly spawned item (the fuse, for bombs)
pub fn effective_lifetime<R: Rng>(
    rng: &mut R,
    kind: ItemKind,
    settings: &DifficultySettings,
    layout: LayoutClass,
) -> u64 {
    if kind == ItemKind::Bomb {
        return random_in(rng, MsRange::new(BOMB_FUSE_MS.0, BOMB_FUSE_MS.1));
    }

    let mut lifetime = random_in(rng, settings.lifetime) as f64;
    if kind == ItemKind::Golden {
        lifetime *= rng.random_range(GOLDEN_LIFETIME_SCALE.0..GOLDEN_LIFETIME_SCALE.1);
    }
    if layout.is_narrow() && !kind.is_special() {
        lifetime *= MOBILE_LIFETIME_SCALE;
    }
    lifetime.round() as u64
}

/// Lifetime of a weed grown by spreading (independent of difficulty)
pub fn offshoot_lifetime<R: Rng>(rng: &mut R) -> u64 {
    random_in(
        rng,
        MsRange::new(WEED_OFFSHOOT_LIFETIME_MS.0, WEED_OFFSHOOT_LIFETIME_MS.1),
    )
}

pub fn next_spawn_delay<R: Rng>(rng: &mut R, settings: &DifficultySettings) -> u64 {
    random_in(rng, settings.spawn_delay).max(MIN_SPAWN_DELAY_MS)
}

/// Uniformly random empty slot, or None on a full grid
pub fn choose_slot<R: Rng>(rng: &mut R, grid: &Grid) -> Option<Cell> {
    grid.find_empty_slots().choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DifficultyPreset;
    use crate::sim::item::ItemId;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_weight_tables() {
        let specials: Vec<_> = (0..100).map(special_kind).collect();
        let count = |kind| specials.iter().filter(|&&k| k == kind).count();
        assert_eq!(count(ItemKind::Butterfly), 40);
        assert_eq!(count(ItemKind::Weed), 30);
        assert_eq!(count(ItemKind::Bomb), 20);
        assert_eq!(count(ItemKind::Golden), 10);

        let flowers: Vec<_> = (0..100).map(flower_kind).collect();
        assert_eq!(flowers.iter().filter(|&&k| k == ItemKind::Daisy).count(), 50);
        assert_eq!(flowers.iter().filter(|&&k| k == ItemKind::Tulip).count(), 30);
        assert_eq!(flowers.iter().filter(|&&k| k == ItemKind::Rose).count(), 20);
    }

    #[test]
    fn test_no_specials_no_caterpillars() {
        let mut rng = Pcg32::seed_from_u64(1);
        let settings = DifficultySettings {
            special_item_chance: 0.0,
            caterpillar_ratio: 0.0,
            ..DifficultySettings::preset(DifficultyPreset::Normal)
        };
        for _ in 0..500 {
            let kind = choose_kind(&mut rng, &settings);
            assert!(matches!(kind, ItemKind::Daisy | ItemKind::Tulip | ItemKind::Rose));
        }
    }

    #[test]
    fn test_all_caterpillars() {
        let mut rng = Pcg32::seed_from_u64(2);
        let settings = DifficultySettings {
            special_item_chance: 0.0,
            caterpillar_ratio: 1.0,
            ..DifficultySettings::preset(DifficultyPreset::Hard)
        };
        assert!((0..100).all(|_| choose_kind(&mut rng, &settings) == ItemKind::Caterpillar));
    }

    #[test]
    fn test_lifetime_adjustments() {
        let mut rng = Pcg32::seed_from_u64(3);
        let settings = DifficultySettings::preset(DifficultyPreset::Normal);
        let (lo, hi) = (settings.lifetime.min as f64, settings.lifetime.max as f64);
        for _ in 0..200 {
            let bomb = effective_lifetime(&mut rng, ItemKind::Bomb, &settings, LayoutClass::Mobile);
            assert!((BOMB_FUSE_MS.0..=BOMB_FUSE_MS.1).contains(&bomb));

            let golden =
                effective_lifetime(&mut rng, ItemKind::Golden, &settings, LayoutClass::Desktop) as f64;
            assert!(golden >= (lo * 0.5).floor() && golden <= (hi * 0.6).ceil());

            let daisy =
                effective_lifetime(&mut rng, ItemKind::Daisy, &settings, LayoutClass::Mobile) as f64;
            assert!(daisy >= (lo * 1.3).floor() && daisy <= (hi * 1.3).ceil());

            // Specials are not stretched on mobile
            let weed =
                effective_lifetime(&mut rng, ItemKind::Weed, &settings, LayoutClass::Mobile) as f64;
            assert!(weed >= lo && weed <= hi);
        }
    }

    #[test]
    fn test_choose_slot() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut grid = Grid::new(2, 2);
        for (i, cell) in [Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 0)]
            .into_iter()
            .enumerate()
        {
            grid.place(ItemId(i as u32 + 1), cell).unwrap();
        }
        assert_eq!(choose_slot(&mut rng, &grid), Some(Cell::new(1, 1)));
        grid.place(ItemId(9), Cell::new(1, 1)).unwrap();
        assert_eq!(choose_slot(&mut rng, &grid), None);
    }

    #[test]
    fn test_spawn_delay_in_range() {
        let mut rng = Pcg32::seed_from_u64(5);
        let settings = DifficultySettings::preset(DifficultyPreset::Easy);
        for _ in 0..100 {
            let delay = next_spawn_delay(&mut rng, &settings);
            assert!((1000..=2000).contains(&delay));
        }
    }
}
