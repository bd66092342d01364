//! Tetrout - falling blocks meet Breakout
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pieces, settled blocks, balls, scheduler)
//! - `renderer`: Layered WebGPU rendering
//! - `platform`: Browser/native platform abstraction (storage, keys)
//! - `score`: Score line and persisted high score
//! - `settings`: Audio preferences
//! - `audio`: Procedural Web Audio cues

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod score;
pub mod settings;
pub mod sim;

pub use score::HighScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Edge length of one grid cell in pixels
    pub const CELL_SIZE: i32 = 20;

    /// Well dimensions in cells
    pub const WELL_COLS: i32 = 9;
    pub const WELL_ROWS: i32 = 16;

    /// Well dimensions in pixels
    pub const WELL_WIDTH: i32 = CELL_SIZE * WELL_COLS;
    pub const WELL_HEIGHT: i32 = CELL_SIZE * WELL_ROWS;

    /// Spawn offset of a new piece, in cells (top-left of its matrix)
    pub const SPAWN_COL: i32 = 3;
    pub const SPAWN_ROW: i32 = -3;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 5.0;
    /// Per-axis speed in pixels per ball tick (unit diagonal)
    pub const BALL_AXIS_SPEED: f32 = 0.7071;

    /// Timer intervals (milliseconds)
    pub const CLOCK_INTERVAL_MS: f64 = 1000.0;
    pub const BALL_INTERVAL_MS: f64 = 6.0;
    pub const DESCENT_INTERVAL_MS: f64 = 180.0;
    pub const THEME_INTERVAL_MS: f64 = 40_000.0;

    /// One-shot delays (milliseconds)
    pub const THEME_START_DELAY_MS: f64 = 2000.0;
    pub const SECOND_BALL_DELAY_MS: f64 = 20_000.0;

    /// Largest frame gap fed to the scheduler, prevents a tick backlog
    pub const MAX_FRAME_MS: f64 = 100.0;
}
