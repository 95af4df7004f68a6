//! Click resolution: pointer position -> grid item -> scoring and removal

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::behavior;
use super::grid::Cell;
use super::item::{ItemId, ItemKind};
use super::state::{GameState, RemovalReason};
use crate::consts::GRID_TOP_PX;
use crate::settings::LayoutClass;

/// Maps a screen point to the grid slot under it
pub trait HitTest {
    fn cell_at(&self, point: Vec2) -> Option<Cell>;
}

/// Screen placement of the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    /// Top-left corner of cell (0, 0)
    pub origin: Vec2,
    pub cell_size: f32,
    pub rows: usize,
    pub cols: usize,
}

impl GridLayout {
    pub fn new(layout: LayoutClass, origin: Vec2) -> Self {
        Self {
            origin,
            cell_size: layout.cell_size(),
            rows: layout.rows(),
            cols: layout.cols(),
        }
    }

    /// Grid centered horizontally in the viewport, hanging from the HUD line
    pub fn centered(layout: LayoutClass, viewport_width: f32) -> Self {
        let width = layout.cols() as f32 * layout.cell_size();
        Self::new(
            layout,
            Vec2::new((viewport_width - width) / 2.0, GRID_TOP_PX),
        )
    }

    pub fn cell_center(&self, cell: Cell) -> Vec2 {
        self.origin
            + Vec2::new(cell.col as f32 + 0.5, cell.row as f32 + 0.5) * self.cell_size
    }
}

impl HitTest for GridLayout {
    fn cell_at(&self, point: Vec2) -> Option<Cell> {
        let local = (point - self.origin) / self.cell_size;
        if !local.is_finite() || local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let cell = Cell::new(local.y.floor() as usize, local.x.floor() as usize);
        (cell.row < self.rows && cell.col < self.cols).then_some(cell)
    }
}

/// What a resolved click did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickOutcome {
    pub item: ItemId,
    pub kind: ItemKind,
    /// Actual score change after the zero floor
    pub delta: i64,
    /// Everything that left the grid because of this click
    pub removed: Vec<ItemId>,
}

/// Resolve a pointer hit through the host's hit test
pub fn resolve_click<H: HitTest + ?Sized>(
    state: &mut GameState,
    point: Vec2,
    hit: &H,
) -> Option<ClickOutcome> {
    let cell = hit.cell_at(point)?;
    click_cell(state, cell)
}

/// Click whatever occupies `cell`; empty slots and inactive sessions do nothing
pub fn click_cell(state: &mut GameState, cell: Cell) -> Option<ClickOutcome> {
    if !state.is_active() {
        return None;
    }
    let (id, kind, points) = state.item_at(cell).map(|i| (i.id, i.kind, i.points))?;
    let before = state.score;

    let removed = match kind {
        ItemKind::Bomb => behavior::detonate(state, id),
        ItemKind::Caterpillar => {
            state.penalize(points);
            state.remove_item(id, RemovalReason::Clicked);
            vec![id]
        }
        _ => {
            state.reward(points);
            state.remove_item(id, RemovalReason::Clicked);
            vec![id]
        }
    };

    let delta = state.score as i64 - before as i64;
    log::debug!("Clicked {:?} at {}: {:+} ({} removed)", kind, cell, delta, removed.len());
    Some(ClickOutcome {
        item: id,
        kind,
        delta,
        removed,
    })
}
