//! Fixed-size slot store
//!
//! Each slot holds at most one item id. The grid is the source of truth for
//! occupancy: scheduled actions check it before touching an item.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::item::ItemId;
use crate::error::GridError;

/// A slot address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Chebyshev (king-move) distance
    pub fn chebyshev(&self, other: Cell) -> usize {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    slots: Vec<Option<ItemId>>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            slots: vec![None; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        self.contains(cell).then(|| cell.row * self.cols + cell.col)
    }

    /// Occupant of a slot (None when empty or out of bounds)
    pub fn get(&self, cell: Cell) -> Option<ItemId> {
        self.index(cell).and_then(|i| self.slots[i])
    }

    pub fn is_empty_at(&self, cell: Cell) -> bool {
        self.contains(cell) && self.get(cell).is_none()
    }

    /// Whether `id` is the item currently occupying `cell`
    pub fn holds(&self, cell: Cell, id: ItemId) -> bool {
        self.get(cell) == Some(id)
    }

    /// Put an item into an empty slot; never overwrites
    pub fn place(&mut self, id: ItemId, cell: Cell) -> Result<(), GridError> {
        let i = self.index(cell).ok_or(GridError::OutOfBounds { cell })?;
        if self.slots[i].is_some() {
            return Err(GridError::SlotOccupied { cell });
        }
        self.slots[i] = Some(id);
        Ok(())
    }

    /// Clear a slot only if it still holds `id`; returns whether it did
    pub fn remove(&mut self, id: ItemId, cell: Cell) -> bool {
        match self.index(cell) {
            Some(i) if self.slots[i] == Some(id) => {
                self.slots[i] = None;
                true
            }
            _ => false,
        }
    }

    /// Empty every slot, returning what was there
    pub fn clear(&mut self) -> Vec<(Cell, ItemId)> {
        let occupied: Vec<_> = self.occupied().collect();
        self.slots.fill(None);
        occupied
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + Clone + use<> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Cell::new(row, col)))
    }

    pub fn occupied(&self) -> impl Iterator<Item = (Cell, ItemId)> + '_ {
        self.cells()
            .filter_map(move |cell| self.get(cell).map(|id| (cell, id)))
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Unoccupied slots in row-major order; lazy and restartable via `clone`
    pub fn find_empty_slots(&self) -> impl Iterator<Item = Cell> + Clone + '_ {
        self.cells().filter(move |&cell| self.get(cell).is_none())
    }

    /// The up-to-8 Moore neighbors of `cell`, clipped to bounds
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + Clone + '_ {
        let rows = cell.row.saturating_sub(1)..=(cell.row + 1).min(self.rows.saturating_sub(1));
        let cols = cell.col.saturating_sub(1)..=(cell.col + 1).min(self.cols.saturating_sub(1));
        rows.flat_map(move |row| cols.clone().map(move |col| Cell::new(row, col)))
            .filter(move |&n| n != cell && self.contains(n))
    }

    /// Empty Moore neighbors of `cell`
    pub fn adjacent_empty_slots(&self, cell: Cell) -> impl Iterator<Item = Cell> + Clone + '_ {
        self.neighbors(cell).filter(move |&n| self.get(n).is_none())
    }

    /// All cells within Chebyshev distance 1 of `cell`, including itself
    pub fn blast_area(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        std::iter::once(cell)
            .filter(move |&c| self.contains(c))
            .chain(self.neighbors(cell))
    }
}
