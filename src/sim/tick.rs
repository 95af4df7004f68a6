//! Clock advance and timer dispatch
//!
//! The host drives the session by advancing the clock. Every action that
//! falls due inside the advanced window runs in order, including actions
//! scheduled by earlier ones in the same window.

use super::behavior;
use super::schedule::TimerAction;
use super::spawner;
use super::state::{GameEvent, GamePhase, GameState, RemovalReason};
use crate::consts::*;

/// Advance the session clock by `dt_ms`
pub fn tick(state: &mut GameState, dt_ms: u64) {
    let until = state.now_ms().saturating_add(dt_ms);
    while let Some((_, action)) = state.scheduler.pop_due(until) {
        dispatch(state, action);
    }
    state.scheduler.advance_to(until);
}

fn dispatch(state: &mut GameState, action: TimerAction) {
    if state.phase != GamePhase::Active {
        log::warn!("Dropping {:?} outside an active session", action);
        return;
    }

    match action {
        TimerAction::Spawn => spawn_tick(state),
        TimerAction::Countdown => countdown_tick(state),
        TimerAction::ComboPoll => combo_poll(state),
        TimerAction::Expire(id) => {
            if state.is_current(id) {
                state.remove_item(id, RemovalReason::Expired);
            }
        }
        TimerAction::Relocate(id) => {
            behavior::relocate(state, id);
        }
        TimerAction::Spread(id) => {
            behavior::spread(state, id);
        }
        TimerAction::Detonate(id) => {
            if let Some(item) = state.items.get_mut(id) {
                item.timers.lifetime = None;
            }
            behavior::detonate(state, id);
        }
    }
}

fn spawn_tick(state: &mut GameState) {
    // A full grid is a normal steady state: skip and try again later
    if let Some(cell) = spawner::choose_slot(&mut state.rng, &state.grid) {
        let kind = spawner::choose_kind(&mut state.rng, &state.difficulty);
        let lifetime =
            spawner::effective_lifetime(&mut state.rng, kind, &state.difficulty, state.layout);
        if let Err(e) = state.spawn_item(kind, cell, lifetime) {
            log::warn!("Spawn skipped: {}", e);
        }
    }

    let delay = spawner::next_spawn_delay(&mut state.rng, &state.difficulty);
    state.timers.spawn = Some(state.scheduler.schedule(delay, TimerAction::Spawn));
}

fn countdown_tick(state: &mut GameState) {
    state.time_left_secs = state.time_left_secs.saturating_sub(1);
    state.emit(GameEvent::TimeChanged {
        seconds: state.time_left_secs,
    });
    state.update_difficulty();

    if state.time_left_secs == 0 {
        state.timers.countdown = None;
        state.end_session();
        return;
    }
    state.timers.countdown = Some(
        state
            .scheduler
            .schedule(COUNTDOWN_INTERVAL_MS, TimerAction::Countdown),
    );
}

fn combo_poll(state: &mut GameState) {
    if state.combo.timed_out(state.now_ms()) {
        log::debug!("Combo of {} timed out", state.combo.streak);
        state.combo.reset();
        state.emit_combo();
    }
    state.timers.combo_poll = Some(
        state
            .scheduler
            .schedule(COMBO_POLL_INTERVAL_MS, TimerAction::ComboPoll),
    );
}
