//! Piece catalog, handed out in a fixed round-robin order

use serde::{Deserialize, Serialize};

use super::piece::Piece;
use crate::consts::{SPAWN_COL, SPAWN_ROW};

/// A shape definition: square occupancy matrix plus its color
#[derive(Debug, Clone, Copy)]
pub struct Shape {
    pub color: u32,
    pub mask: &'static [&'static [u8]],
}

/// All shapes, in spawn order
pub const SHAPES: [Shape; 5] = [
    // O
    Shape {
        color: 0xF1CF48,
        mask: &[&[1, 1], &[1, 1]],
    },
    // I (three long)
    Shape {
        color: 0x7CC661,
        mask: &[&[0, 0, 0], &[1, 1, 1], &[0, 0, 0]],
    },
    // T
    Shape {
        color: 0xFE7633,
        mask: &[&[1, 1, 1], &[0, 1, 0], &[0, 0, 0]],
    },
    // S
    Shape {
        color: 0x3F42E7,
        mask: &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]],
    },
    // L
    Shape {
        color: 0xFA524D,
        mask: &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]],
    },
];

impl Shape {
    /// Instantiate at the spawn offset above the well
    pub fn spawn(&self) -> Piece {
        Piece::from_mask(self.mask, self.color, SPAWN_COL, SPAWN_ROW)
    }
}

/// Round-robin cursor over `SHAPES`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    index: usize,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh piece for the next shape in order
    pub fn next_piece(&mut self) -> Piece {
        let shape = &SHAPES[self.index];
        self.index = (self.index + 1) % SHAPES.len();
        shape.spawn()
    }

    /// Index of the shape the next call will produce
    #[cfg(test)]
    pub fn peek_index(&self) -> usize {
        self.index
    }
}
