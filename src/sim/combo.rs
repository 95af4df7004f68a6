//! Combo streak, multiplier and score arithmetic

use serde::{Deserialize, Serialize};

use crate::consts::COMBO_TIMEOUT_MS;

/// Multiplier for a streak length: 0-2 ×1, 3-5 ×1.5, 6-9 ×2, 10-14 ×2.5, 15+ ×3
pub fn multiplier_for_streak(streak: u32) -> f64 {
    match streak {
        0..3 => 1.0,
        3..6 => 1.5,
        6..10 => 2.0,
        10..15 => 2.5,
        _ => 3.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComboState {
    pub streak: u32,
    pub max_streak: u32,
    pub multiplier: f64,
    pub last_good_click_ms: Option<u64>,
    pub timeout_ms: u64,
}

impl Default for ComboState {
    fn default() -> Self {
        Self {
            streak: 0,
            max_streak: 0,
            multiplier: 1.0,
            last_good_click_ms: None,
            timeout_ms: COMBO_TIMEOUT_MS,
        }
    }
}

impl ComboState {
    /// Register a good click and return the points it earns
    ///
    /// The multiplier is taken after the streak is incremented, so the third
    /// consecutive click is the first at ×1.5.
    pub fn good_click(&mut self, base_points: i32, now_ms: u64) -> i32 {
        self.streak += 1;
        self.max_streak = self.max_streak.max(self.streak);
        self.last_good_click_ms = Some(now_ms);
        self.multiplier = multiplier_for_streak(self.streak);
        (base_points as f64 * self.multiplier).round() as i32
    }

    /// Break the streak; returns whether anything changed
    pub fn reset(&mut self) -> bool {
        let changed = self.streak != 0 || self.multiplier != 1.0;
        self.streak = 0;
        self.multiplier = 1.0;
        changed
    }

    /// Whether the streak has outlived the timeout window
    pub fn timed_out(&self, now_ms: u64) -> bool {
        self.streak > 0
            && self
                .last_good_click_ms
                .is_some_and(|last| now_ms.saturating_sub(last) > self.timeout_ms)
    }
}

/// Apply a signed delta to a score that never drops below zero
pub fn apply_delta(score: u64, delta: i32) -> u64 {
    score.saturating_add_signed(delta as i64)
}
