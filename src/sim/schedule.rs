//! Cooperative timer queue
//!
//! Single-threaded: actions are popped in due-time order (ties in scheduling
//! order) and dispatched by the session. Cancellation is immediate.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::item::ItemId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

/// Everything that can be scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerAction {
    Spawn,
    Countdown,
    ComboPoll,
    Expire(ItemId),
    Relocate(ItemId),
    Spread(ItemId),
    Detonate(ItemId),
}

impl TimerAction {
    /// Item this action targets, if any
    pub fn target(&self) -> Option<ItemId> {
        match *self {
            TimerAction::Expire(id)
            | TimerAction::Relocate(id)
            | TimerAction::Spread(id)
            | TimerAction::Detonate(id) => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    queue: BTreeMap<(u64, TimerId), TimerAction>,
    due_by_id: HashMap<TimerId, u64>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `action` to run `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: u64, action: TimerAction) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = self.now_ms + delay_ms;
        self.queue.insert((due, id), action);
        self.due_by_id.insert(id, due);
        id
    }

    /// Cancel a pending timer; returns false if it already ran or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.due_by_id.remove(&id) {
            Some(due) => self.queue.remove(&(due, id)).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.due_by_id.contains_key(&id)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Pending actions in due order
    pub fn actions(&self) -> impl Iterator<Item = TimerAction> + '_ {
        self.queue.values().copied()
    }

    /// Due time of a pending timer
    pub fn due_at(&self, id: TimerId) -> Option<u64> {
        self.due_by_id.get(&id).copied()
    }

    /// Pop the earliest action due at or before `until_ms`, moving the clock to it
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerId, TimerAction)> {
        let (&(due, id), _) = self.queue.first_key_value()?;
        if due > until_ms {
            return None;
        }
        let action = self.queue.remove(&(due, id))?;
        self.due_by_id.remove(&id);
        self.now_ms = self.now_ms.max(due);
        Some((id, action))
    }

    /// Move the clock forward without running anything
    pub fn advance_to(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Drop every pending timer
    pub fn cancel_all(&mut self) {
        self.queue.clear();
        self.due_by_id.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule(300, TimerAction::Countdown);
        s.schedule(100, TimerAction::Spawn);
        s.schedule(100, TimerAction::ComboPoll);

        assert!(s.pop_due(50).is_none());
        assert_eq!(s.pop_due(1000).map(|(_, a)| a), Some(TimerAction::Spawn));
        assert_eq!(s.now_ms(), 100);
        assert_eq!(s.pop_due(1000).map(|(_, a)| a), Some(TimerAction::ComboPoll));
        assert_eq!(s.pop_due(1000).map(|(_, a)| a), Some(TimerAction::Countdown));
        assert_eq!(s.now_ms(), 300);
        assert!(s.pop_due(1000).is_none());
    }

    #[test]
    fn test_cancel_is_immediate_and_idempotent() {
        let mut s = Scheduler::new();
        let id = s.schedule(10, TimerAction::Expire(ItemId(1)));
        assert!(s.is_pending(id));
        assert!(s.cancel(id));
        assert!(!s.cancel(id));
        assert!(s.pop_due(u64::MAX).is_none());
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_delays_are_relative_to_clock() {
        let mut s = Scheduler::new();
        s.advance_to(5_000);
        let id = s.schedule(250, TimerAction::Spawn);
        assert_eq!(s.due_at(id), Some(5_250));
    }

    #[test]
    fn test_action_target() {
        assert_eq!(TimerAction::Spread(ItemId(4)).target(), Some(ItemId(4)));
        assert_eq!(TimerAction::Countdown.target(), None);
    }
}
