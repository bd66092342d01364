//! Settled blocks left behind by landed pieces

use serde::{Deserialize, Serialize};

use super::piece::Cell;

/// Unordered collection of landed cells, each owned independently
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettledSet {
    cells: Vec<Cell>,
}

impl SettledSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    /// Add the body cells of a landed piece
    pub fn merge<'a>(&mut self, body: impl IntoIterator<Item = &'a Cell>) {
        self.cells.extend(body.into_iter().filter(|c| c.is_body).copied());
    }

    /// Remove every cell at the given spot; returns how many went
    pub fn remove_at(&mut self, x: i32, y: i32) -> usize {
        let before = self.cells.len();
        self.cells.retain(|c| !(c.x == x && c.y == y));
        before - self.cells.len()
    }

    /// Any body cell sitting directly above a settled cell.
    ///
    /// This is the landing contact test; it compares against the row below,
    /// not the cell's own row.
    pub fn supports<'a>(&self, body: impl IntoIterator<Item = &'a Cell>) -> bool {
        body.into_iter()
            .filter(|b| b.is_body)
            .any(|b| self.cells.iter().any(|s| b.rests_on(s)))
    }

    /// Any body cell on the same spot as a settled cell
    pub fn overlaps<'a>(&self, body: impl IntoIterator<Item = &'a Cell>) -> bool {
        body.into_iter()
            .filter(|b| b.is_body)
            .any(|b| self.cells.iter().any(|s| b.same_spot(s)))
    }

    /// Direct access for scenario setup
    #[cfg(test)]
    pub fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }
}
