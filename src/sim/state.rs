//! Session state and lifecycle
//!
//! `GameState` owns the grid, the item store, the timer queue and the
//! outbound event queue. All mutation funnels through here so that every
//! removal path cancels the item's timers before its slot is cleared.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::behavior;
use super::combo::{ComboState, apply_delta};
use super::difficulty::{DifficultySettings, level_for_elapsed};
use super::grid::{Cell, Grid};
use super::item::{Item, ItemId, ItemKind, ItemStore};
use super::schedule::{Scheduler, TimerAction, TimerId};
use super::spawner;
use crate::consts::*;
use crate::error::{GridError, SessionError};
use crate::settings::{DifficultyPreset, LayoutClass};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Grid empty, no timers
    Idle,
    /// Timers running, clicks accepted
    Active,
    /// Time ran out; terminal until restart
    Ended,
}

/// Why an item left the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalReason {
    Clicked,
    Expired,
    Exploded,
    SessionEnded,
}

/// Outbound notifications, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged { score: u64 },
    TimeChanged { seconds: u32 },
    ComboChanged { streak: u32, multiplier: f64 },
    DifficultyChanged { level: u32 },
    GameEnded { final_score: u64 },
    ItemSpawned { id: ItemId, cell: Cell, kind: ItemKind },
    ItemMoved { id: ItemId, from: Cell, to: Cell },
    ItemRemoved { id: ItemId, cell: Cell, reason: RemovalReason },
}

/// End-of-session recap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub score: u64,
    pub max_streak: u32,
    pub level: u32,
    /// Preset the session was started with; `None` for custom settings
    pub difficulty: Option<DifficultyPreset>,
}

/// Handles of the three session-wide schedules
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct SessionTimers {
    pub(super) spawn: Option<TimerId>,
    pub(super) countdown: Option<TimerId>,
    pub(super) combo_poll: Option<TimerId>,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub layout: LayoutClass,
    /// Preset used by the next start
    pub preset: DifficultyPreset,
    /// Snapshot taken at start; progression is computed from it
    pub base: DifficultySettings,
    /// Live values for the current level
    pub difficulty: DifficultySettings,
    pub level: u32,
    pub score: u64,
    pub time_left_secs: u32,
    pub combo: ComboState,
    pub grid: Grid,
    pub items: ItemStore,
    pub(super) scheduler: Scheduler,
    pub(super) timers: SessionTimers,
    pub(super) rng: Pcg32,
    session_preset: Option<DifficultyPreset>,
    started_at_ms: u64,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Idle session with an entropy-seeded generator
    pub fn new(layout: LayoutClass) -> Self {
        Self::with_seed(layout, rand::rng().random())
    }

    pub fn with_seed(layout: LayoutClass, seed: u64) -> Self {
        let preset = DifficultyPreset::default();
        let base = DifficultySettings::preset(preset);
        Self {
            phase: GamePhase::Idle,
            layout,
            preset,
            base,
            difficulty: base,
            level: 0,
            score: 0,
            time_left_secs: base.game_time_secs,
            combo: ComboState::default(),
            grid: Grid::new(layout.rows(), layout.cols()),
            items: ItemStore::default(),
            scheduler: Scheduler::new(),
            timers: SessionTimers::default(),
            rng: Pcg32::seed_from_u64(seed),
            session_preset: None,
            started_at_ms: 0,
            events: Vec::new(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn elapsed_ms(&self) -> u64 {
        match self.phase {
            GamePhase::Idle => 0,
            _ => self.now_ms().saturating_sub(self.started_at_ms),
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Active
    }

    /// Pending notifications, oldest first
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(super) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Pick the preset for the next start; unknown keys change nothing
    pub fn select_difficulty(&mut self, key: &str) -> bool {
        match DifficultyPreset::from_str(key) {
            Some(preset) => {
                self.preset = preset;
                true
            }
            None => {
                log::warn!("Ignoring unknown difficulty `{}`", key);
                false
            }
        }
    }

    /// Change the grid geometry; only honored while idle
    pub fn set_layout(&mut self, layout: LayoutClass) -> bool {
        if self.phase != GamePhase::Idle {
            return false;
        }
        self.clear_items();
        self.layout = layout;
        self.grid = Grid::new(layout.rows(), layout.cols());
        true
    }

    /// Start a session with a preset key
    pub fn start(&mut self, key: &str) -> Result<(), SessionError> {
        let preset = DifficultyPreset::from_str(key)
            .ok_or_else(|| SessionError::UnknownDifficulty(key.to_string()))?;
        if self.phase != GamePhase::Idle {
            return Err(SessionError::NotIdle(self.phase));
        }
        self.preset = preset;
        self.begin(DifficultySettings::preset(preset), Some(preset));
        Ok(())
    }

    /// Start a session with explicit settings
    pub fn start_custom(&mut self, settings: DifficultySettings) -> Result<(), SessionError> {
        if self.phase != GamePhase::Idle {
            return Err(SessionError::NotIdle(self.phase));
        }
        self.begin(settings, None);
        Ok(())
    }

    fn begin(&mut self, settings: DifficultySettings, preset: Option<DifficultyPreset>) {
        self.clear_items();
        self.session_preset = preset;
        self.base = settings;
        self.difficulty = settings;
        self.level = 0;
        self.score = 0;
        self.time_left_secs = settings.game_time_secs;
        self.combo = ComboState::default();
        self.grid = Grid::new(self.layout.rows(), self.layout.cols());
        self.started_at_ms = self.now_ms();
        self.phase = GamePhase::Active;

        let spawn_delay = spawner::next_spawn_delay(&mut self.rng, &self.difficulty);
        self.timers = SessionTimers {
            spawn: Some(self.scheduler.schedule(spawn_delay, TimerAction::Spawn)),
            countdown: Some(
                self.scheduler
                    .schedule(COUNTDOWN_INTERVAL_MS, TimerAction::Countdown),
            ),
            combo_poll: Some(
                self.scheduler
                    .schedule(COMBO_POLL_INTERVAL_MS, TimerAction::ComboPoll),
            ),
        };

        log::info!(
            "Session started: {} ({}s, {}x{} grid)",
            preset.map_or("custom", |p| p.as_str()),
            self.time_left_secs,
            self.grid.rows(),
            self.grid.cols()
        );
        self.emit(GameEvent::ScoreChanged { score: 0 });
        self.emit(GameEvent::TimeChanged {
            seconds: self.time_left_secs,
        });
        self.emit_combo();
    }

    /// Return to idle from any phase, dropping every timer and item
    pub fn restart(&mut self) {
        self.cancel_session_timers();
        self.clear_items();
        self.scheduler.cancel_all();
        self.phase = GamePhase::Idle;
        self.session_preset = None;
        self.base = DifficultySettings::preset(self.preset);
        self.difficulty = self.base;
        self.level = 0;
        self.score = 0;
        self.time_left_secs = self.base.game_time_secs;
        self.combo = ComboState::default();
        log::info!("Session reset to idle");
    }

    pub(super) fn end_session(&mut self) {
        self.cancel_session_timers();
        self.clear_items();
        self.phase = GamePhase::Ended;
        log::info!(
            "Session ended: score {} (max streak {}, level {})",
            self.score,
            self.combo.max_streak,
            self.level
        );
        self.emit(GameEvent::GameEnded {
            final_score: self.score,
        });
    }

    fn cancel_session_timers(&mut self) {
        let timers = std::mem::take(&mut self.timers);
        for id in [timers.spawn, timers.countdown, timers.combo_poll]
            .into_iter()
            .flatten()
        {
            self.scheduler.cancel(id);
        }
    }

    fn clear_items(&mut self) {
        let ids: Vec<ItemId> = self.items.iter().map(|item| item.id).collect();
        for id in ids {
            self.remove_item(id, RemovalReason::SessionEnded);
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            score: self.score,
            max_streak: self.combo.max_streak,
            level: self.level,
            difficulty: self.session_preset,
        }
    }

    pub fn item_at(&self, cell: Cell) -> Option<&Item> {
        self.grid.get(cell).and_then(|id| self.items.get(id))
    }

    /// Whether `id` is live and still occupies the slot it believes it holds
    pub fn is_current(&self, id: ItemId) -> bool {
        self.items
            .get(id)
            .is_some_and(|item| self.grid.holds(item.cell, id))
    }

    /// Place a new item and arm its lifetime and behavior timers; active sessions only
    pub fn spawn_item(
        &mut self,
        kind: ItemKind,
        cell: Cell,
        lifetime_ms: u64,
    ) -> Result<ItemId, GridError> {
        if self.phase != GamePhase::Active {
            return Err(GridError::Inactive { phase: self.phase });
        }
        if !self.grid.is_empty_at(cell) {
            return Err(if self.grid.contains(cell) {
                GridError::SlotOccupied { cell }
            } else {
                GridError::OutOfBounds { cell }
            });
        }

        let now = self.now_ms();
        let id = self.items.insert(kind, cell, lifetime_ms, now);
        self.grid.place(id, cell)?;

        let lifetime_action = match kind {
            ItemKind::Bomb => TimerAction::Detonate(id),
            _ => TimerAction::Expire(id),
        };
        let lifetime = self.scheduler.schedule(lifetime_ms, lifetime_action);
        let behavior = behavior::first_behavior(kind)
            .map(|(delay, action)| self.scheduler.schedule(delay, action(id)));
        if let Some(item) = self.items.get_mut(id) {
            item.timers.lifetime = Some(lifetime);
            item.timers.behavior = behavior;
        }

        log::debug!("Spawned {:?} {:?} at {} ({}ms)", kind, id, cell, lifetime_ms);
        self.emit(GameEvent::ItemSpawned { id, cell, kind });
        Ok(id)
    }

    /// Remove an item by any path: cancel its timers, then clear its slot
    pub fn remove_item(&mut self, id: ItemId, reason: RemovalReason) -> Option<Item> {
        let item = self.items.remove(id)?;
        for timer in item.timers.handles() {
            self.scheduler.cancel(timer);
        }
        if self.grid.remove(id, item.cell) {
            log::debug!("Removed {:?} {:?} at {} ({:?})", item.kind, id, item.cell, reason);
            self.emit(GameEvent::ItemRemoved {
                id,
                cell: item.cell,
                reason,
            });
        }
        Some(item)
    }

    /// Good-click scoring; returns the points awarded
    pub(super) fn reward(&mut self, base_points: i32) -> i32 {
        let now = self.now_ms();
        let points = self.combo.good_click(base_points, now);
        self.score = apply_delta(self.score, points);
        self.emit(GameEvent::ScoreChanged { score: self.score });
        self.emit_combo();
        points
    }

    /// Bad-click scoring: break the combo and apply the raw value, floored at zero
    pub(super) fn penalize(&mut self, base_points: i32) {
        if self.combo.reset() {
            self.emit_combo();
        }
        self.score = apply_delta(self.score, base_points);
        self.emit(GameEvent::ScoreChanged { score: self.score });
    }

    pub(super) fn emit_combo(&mut self) {
        self.emit(GameEvent::ComboChanged {
            streak: self.combo.streak,
            multiplier: self.combo.multiplier,
        });
    }

    /// Recompute live difficulty if the elapsed time crossed a level boundary
    pub(super) fn update_difficulty(&mut self) {
        let level = level_for_elapsed(self.elapsed_ms());
        if level <= self.level {
            return;
        }
        self.level = level;
        self.difficulty = self.base.at_level(level);
        log::info!(
            "Difficulty level {}: spawn {}-{}ms, lifetime {}-{}ms, caterpillars {:.2}",
            level,
            self.difficulty.spawn_delay.min,
            self.difficulty.spawn_delay.max,
            self.difficulty.lifetime.min,
            self.difficulty.lifetime.max,
            self.difficulty.caterpillar_ratio
        );
        self.emit(GameEvent::DifficultyChanged { level });
    }
}
