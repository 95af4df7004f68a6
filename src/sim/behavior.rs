//! Special-item behaviors: butterfly hops, weed spreading, bomb detonation
//!
//! Every handler re-validates that the item it was scheduled for still
//! occupies its slot before doing anything.

use rand::seq::IteratorRandom;

use super::grid::Cell;
use super::item::{ItemId, ItemKind};
use super::schedule::TimerAction;
use super::spawner;
use super::state::{GameEvent, GameState, RemovalReason};
use crate::consts::*;

/// Initial behavior timer for a freshly placed item, if its kind has one
pub(super) fn first_behavior(kind: ItemKind) -> Option<(u64, fn(ItemId) -> TimerAction)> {
    match kind {
        ItemKind::Butterfly => Some((BUTTERFLY_MOVE_INTERVAL_MS, TimerAction::Relocate)),
        ItemKind::Weed => Some((WEED_SPREAD_INTERVAL_MS, TimerAction::Spread)),
        _ => None,
    }
}

/// Re-arm a recurring behavior timer on a still-live item
fn rearm(state: &mut GameState, id: ItemId, delay_ms: u64, action: TimerAction) {
    let timer = state.scheduler.schedule(delay_ms, action);
    match state.items.get_mut(id) {
        Some(item) => item.timers.behavior = Some(timer),
        None => {
            state.scheduler.cancel(timer);
        }
    }
}

/// Move a butterfly to a random empty neighbor; returns the new cell
pub fn relocate(state: &mut GameState, id: ItemId) -> Option<Cell> {
    if !state.is_current(id) {
        return None;
    }
    let from = state.items.get(id)?.cell;
    let target = state
        .grid
        .adjacent_empty_slots(from)
        .choose(&mut state.rng);

    if let Some(to) = target {
        if state.grid.remove(id, from) && state.grid.place(id, to).is_ok() {
            if let Some(item) = state.items.get_mut(id) {
                item.cell = to;
            }
            log::debug!("Butterfly {:?} hopped {} -> {}", id, from, to);
            state.emit(GameEvent::ItemMoved { id, from, to });
        }
    }

    rearm(state, id, BUTTERFLY_MOVE_INTERVAL_MS, TimerAction::Relocate(id));
    target
}

/// Most weeds the grid will hold before spreading stalls
pub fn weed_population_cap(slot_count: usize) -> usize {
    ((slot_count as f64 * WEED_POPULATION_CAP_RATIO).floor() as usize).max(1)
}

/// Grow a new weed into a random empty neighbor; returns the offshoot
pub fn spread(state: &mut GameState, id: ItemId) -> Option<ItemId> {
    if !state.is_current(id) {
        return None;
    }
    let origin = state.items.get(id)?.cell;

    let capped =
        state.items.count_kind(ItemKind::Weed) >= weed_population_cap(state.grid.slot_count());
    let target = if capped {
        log::debug!("Weed {:?} at {} held back by population cap", id, origin);
        None
    } else {
        state
            .grid
            .adjacent_empty_slots(origin)
            .choose(&mut state.rng)
    };

    let offshoot = target.and_then(|cell| {
        let lifetime = spawner::offshoot_lifetime(&mut state.rng);
        state.spawn_item(ItemKind::Weed, cell, lifetime).ok()
    });
    if let Some(child) = offshoot {
        log::debug!("Weed {:?} spread to {:?}", id, child);
    }

    rearm(state, id, WEED_SPREAD_INTERVAL_MS, TimerAction::Spread(id));
    offshoot
}

/// Blow up a bomb: one combo reset and penalty, then clear its 3x3 area.
/// Bombs caught in the blast are removed without detonating.
pub fn detonate(state: &mut GameState, id: ItemId) -> Vec<ItemId> {
    if !state.is_current(id) {
        return Vec::new();
    }
    let Some(bomb) = state.items.get(id) else {
        return Vec::new();
    };
    let (center, points) = (bomb.cell, bomb.points);

    state.penalize(points);

    let targets: Vec<ItemId> = state
        .grid
        .blast_area(center)
        .filter_map(|cell| state.grid.get(cell))
        .collect();
    for &target in &targets {
        state.remove_item(target, RemovalReason::Exploded);
    }
    log::debug!("Bomb {:?} at {} cleared {} items", id, center, targets.len());
    targets
}
