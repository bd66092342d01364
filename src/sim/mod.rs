//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed ticks only, never scaled by frame time
//! - Stable iteration order (settled-set order, ball spawn order)
//! - No rendering or platform dependencies; side effects leave as `GameEvent`s

pub mod ball;
pub mod catalog;
pub mod collision;
pub mod piece;
pub mod scheduler;
pub mod settled;
pub mod state;
pub mod tick;

pub use ball::Ball;
pub use catalog::{Catalog, SHAPES, Shape};
pub use collision::{Axis, CollisionResult, ball_cell_collision};
pub use piece::{Cell, Piece, Rotation, rotate};
pub use scheduler::{Scheduler, StepReport};
pub use settled::SettledSet;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{PlayerAction, advance_balls, apply_action, descend};
