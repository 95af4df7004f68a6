//! Difficulty presets and progressive scaling
//!
//! A session snapshots its preset as the base and recomputes the live values
//! from that base every time the level rises, so scaling never compounds
//! on already-scaled values.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::DifficultyPreset;

/// Inclusive millisecond range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsRange {
    pub min: u64,
    pub max: u64,
}

impl MsRange {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Scale both bounds, keeping them at or above `floor`
    fn scaled(&self, factor: f64, floor: u64) -> Self {
        let scale = |v: u64| ((v as f64 * factor).round() as u64).max(floor);
        let min = scale(self.min);
        let max = scale(self.max).max(min);
        Self { min, max }
    }
}

/// Per-level scaling applied every `DIFFICULTY_STEP_MS` of play
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    /// Multiplier on spawn delays (< 1 spawns faster)
    pub spawn_rate: f64,
    /// Multiplier on item lifetimes (< 1 expires sooner)
    pub lifetime: f64,
    /// Added to the caterpillar ratio
    pub caterpillar_increment: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySettings {
    pub spawn_delay: MsRange,
    pub lifetime: MsRange,
    pub caterpillar_ratio: f64,
    /// Session length in seconds
    pub game_time_secs: u32,
    pub special_item_chance: f64,
    pub progression: Progression,
}

impl DifficultySettings {
    pub fn preset(preset: DifficultyPreset) -> Self {
        match preset {
            DifficultyPreset::Easy => Self {
                spawn_delay: MsRange::new(1000, 2000),
                lifetime: MsRange::new(3000, 5000),
                caterpillar_ratio: 0.2,
                game_time_secs: 45,
                special_item_chance: 0.1,
                progression: Progression {
                    spawn_rate: 0.95,
                    lifetime: 0.97,
                    caterpillar_increment: 0.02,
                },
            },
            DifficultyPreset::Normal => Self {
                spawn_delay: MsRange::new(800, 1500),
                lifetime: MsRange::new(2500, 4000),
                caterpillar_ratio: 0.35,
                game_time_secs: 30,
                special_item_chance: 0.15,
                progression: Progression {
                    spawn_rate: 0.92,
                    lifetime: 0.95,
                    caterpillar_increment: 0.03,
                },
            },
            DifficultyPreset::Hard => Self {
                spawn_delay: MsRange::new(500, 1000),
                lifetime: MsRange::new(1500, 3000),
                caterpillar_ratio: 0.45,
                game_time_secs: 25,
                special_item_chance: 0.2,
                progression: Progression {
                    spawn_rate: 0.9,
                    lifetime: 0.93,
                    caterpillar_increment: 0.04,
                },
            },
        }
    }

    /// Live settings for `level`, derived from this (base) preset.
    /// Progression never eases: factors above 1 and negative increments are clamped.
    pub fn at_level(&self, level: u32) -> Self {
        let p = self.progression;
        let exp = level.min(i32::MAX as u32) as i32;
        let step = |factor: f64| factor.clamp(0.0, 1.0).powi(exp);
        let increment = p.caterpillar_increment.max(0.0);
        Self {
            spawn_delay: self
                .spawn_delay
                .scaled(step(p.spawn_rate), MIN_SPAWN_DELAY_MS),
            lifetime: self.lifetime.scaled(step(p.lifetime), MIN_LIFETIME_MS),
            caterpillar_ratio: (self.caterpillar_ratio + increment * level as f64)
                .min(MAX_CATERPILLAR_RATIO),
            ..*self
        }
    }
}

/// Progressive level for the elapsed play time
pub fn level_for_elapsed(elapsed_ms: u64) -> u32 {
    (elapsed_ms / DIFFICULTY_STEP_MS).min(u32::MAX as u64) as u32
}
