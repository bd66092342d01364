//! Bouncing balls

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Axis;
use crate::consts::*;

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    /// Center in pixels
    pub pos: Vec2,
    /// Pixels per ball tick; only ever sign-flipped
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    /// New ball in the top-left corner heading down-right
    pub fn new(id: u32) -> Self {
        Self {
            id,
            pos: Vec2::splat(BALL_RADIUS),
            vel: Vec2::splat(BALL_AXIS_SPEED),
            radius: BALL_RADIUS,
        }
    }

    /// Flip the velocity component on one axis
    pub fn reflect(&mut self, axis: Axis) {
        match axis {
            Axis::Horizontal => self.vel.x = -self.vel.x,
            Axis::Vertical => self.vel.y = -self.vel.y,
        }
    }

    #[cfg(test)]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}
