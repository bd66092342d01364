//! Cells and the falling piece
//!
//! A piece is a square matrix of cells that all share one color. Only cells
//! flagged `is_body` are solid; the rest keep the matrix layout so rotation
//! can remap occupancy without moving anything.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// One grid-aligned cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Left edge in pixels (multiple of `CELL_SIZE`)
    pub x: i32,
    /// Top edge in pixels (multiple of `CELL_SIZE`, negative above the well)
    pub y: i32,
    /// 24-bit RGB
    pub color: u32,
    /// Solid part of its shape; placeholders never collide or render
    pub is_body: bool,
}

impl Cell {
    /// Row index inside the well (negative above it)
    pub fn row(&self) -> i32 {
        self.y.div_euclid(CELL_SIZE)
    }

    /// Same position, ignoring color and occupancy
    pub fn same_spot(&self, other: &Cell) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// True when `other` sits exactly one row below this cell
    pub fn rests_on(&self, other: &Cell) -> bool {
        self.x == other.x && self.y == other.y - CELL_SIZE
    }

    /// True when the cell lies outside the well. The top stays open so
    /// freshly spawned pieces can fall in.
    pub fn out_of_well(&self) -> bool {
        self.x < 0 || self.x >= WELL_WIDTH || self.y >= WELL_HEIGHT
    }
}

/// Rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

/// The player-controlled falling arrangement of cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    /// Row-major cell matrix (always square)
    pub rows: Vec<Vec<Cell>>,
}

impl Piece {
    /// Build a piece from an occupancy matrix with its top-left cell at
    /// (`col`, `row`) in grid units
    pub fn from_mask(mask: &[&[u8]], color: u32, col: i32, row: i32) -> Self {
        let rows = mask
            .iter()
            .enumerate()
            .map(|(y, line)| {
                line.iter()
                    .enumerate()
                    .map(|(x, &flag)| Cell {
                        x: (col + x as i32) * CELL_SIZE,
                        y: (row + y as i32) * CELL_SIZE,
                        color,
                        is_body: flag == 1,
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Occupied cells only
    pub fn body(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().flatten().filter(|c| c.is_body)
    }

    pub fn body_count(&self) -> usize {
        self.body().count()
    }

    /// Copy of the piece moved by (`dx`, `dy`) pixels
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        let rows = self
            .rows
            .iter()
            .map(|line| {
                line.iter()
                    .map(|c| Cell {
                        x: c.x + dx,
                        y: c.y + dy,
                        ..*c
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Occupancy flags as a plain matrix
    pub fn mask(&self) -> Vec<Vec<bool>> {
        self.rows
            .iter()
            .map(|line| line.iter().map(|c| c.is_body).collect())
            .collect()
    }
}

/// Rotate an occupancy matrix a quarter turn.
///
/// Clockwise transposes then reverses each row; counter-clockwise reverses
/// the column order then transposes.
pub fn rotate_mask(mask: &[Vec<bool>], direction: Rotation) -> Vec<Vec<bool>> {
    let height = mask.len();
    let width = mask.first().map_or(0, Vec::len);

    match direction {
        Rotation::Clockwise => (0..width)
            .map(|i| (0..height).rev().map(|j| mask[j][i]).collect())
            .collect(),
        Rotation::CounterClockwise => (0..width)
            .rev()
            .map(|i| (0..height).map(|j| mask[j][i]).collect())
            .collect(),
    }
}

/// Rotate a piece in place on the grid: positions and color stay put, only
/// which cells are body changes.
pub fn rotate(piece: &Piece, direction: Rotation) -> Piece {
    let rotated = rotate_mask(&piece.mask(), direction);
    let rows = piece
        .rows
        .iter()
        .enumerate()
        .map(|(i, line)| {
            line.iter()
                .enumerate()
                .map(|(j, c)| Cell {
                    is_body: rotated
                        .get(i)
                        .and_then(|r| r.get(j))
                        .copied()
                        .unwrap_or(false),
                    ..*c
                })
                .collect()
        })
        .collect();
    Piece { rows }
}
