//! Collision detection between a round ball and square cells or walls
//!
//! Cells are axis-aligned squares, so the closest point on a cell to the ball
//! center is a per-axis clamp. The reflection axis is the one the ball
//! penetrates least.

use glam::Vec2;

use super::piece::Cell;
use crate::consts::CELL_SIZE;

/// Axis whose velocity component gets flipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Result of a ball-vs-cell check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Axis to reflect along (meaningful only on hit)
    pub axis: Axis,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            axis: Axis::Vertical,
        }
    }
}

/// Closest point on a cell's square to `pos`
#[inline]
pub fn closest_point(pos: Vec2, cell: &Cell) -> Vec2 {
    let min = Vec2::new(cell.x as f32, cell.y as f32);
    let max = min + Vec2::splat(CELL_SIZE as f32);
    pos.clamp(min, max)
}

/// Check a ball against one cell.
///
/// Touching counts as a hit (`distance² <= radius²`). Horizontal reflection
/// wins only when its overlap is strictly smaller.
pub fn ball_cell_collision(ball_pos: Vec2, ball_radius: f32, cell: &Cell) -> CollisionResult {
    if !cell.is_body {
        return CollisionResult::miss();
    }

    let point = closest_point(ball_pos, cell);
    let delta = ball_pos - point;
    if delta.length_squared() > ball_radius * ball_radius {
        return CollisionResult::miss();
    }

    let overlap_x = ball_radius - delta.x.abs();
    let overlap_y = ball_radius - delta.y.abs();
    let axis = if overlap_x < overlap_y {
        Axis::Horizontal
    } else {
        Axis::Vertical
    };

    CollisionResult {
        hit: true,
        axis,
    }
}

/// Would moving from `pos` by `step` leave the band `[radius, extent - radius]`?
#[inline]
pub fn crosses_wall(pos: f32, step: f32, radius: f32, extent: f32) -> bool {
    let next = pos + step;
    next > extent - radius || next < radius
}
