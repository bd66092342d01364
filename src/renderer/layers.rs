//! Cached drawing layers
//!
//! Three layers are kept as vertex lists: the static grid background, the
//! blocks (settled cells plus the falling piece) and the balls. Each layer is
//! rebuilt only when its state changes; composition concatenates them in
//! back-to-front order.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::sim::{Ball, Cell, GameState};

/// Layer slots, in draw order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Background = 0,
    Blocks = 1,
    Balls = 2,
}

const LAYER_COUNT: usize = 3;
const GRID_LINE_WIDTH: f32 = 1.0;
const OUTLINE_WIDTH: f32 = 1.0;
const BALL_RIM_WIDTH: f32 = 2.0;
const BALL_SEGMENTS: u32 = 24;

/// Per-layer vertex caches plus the composed frame
#[derive(Debug, Clone, Default)]
pub struct LayerStack {
    layers: [Vec<Vertex>; LAYER_COUNT],
    composed: Vec<Vertex>,
    stale: bool,
}

impl LayerStack {
    /// New stack with the background painted
    pub fn new() -> Self {
        let mut stack = Self::default();
        stack.replace(Layer::Background, background_vertices());
        stack
    }

    /// Rebuild the block layer
    pub fn paint_blocks(&mut self, state: &GameState) {
        let cells = state.settled.iter().chain(state.piece.body());
        self.replace(Layer::Blocks, block_vertices(cells));
    }

    /// Rebuild the ball layer
    pub fn paint_balls(&mut self, state: &GameState) {
        self.replace(Layer::Balls, ball_vertices(&state.balls));
    }

    /// Repaint everything that depends on game state
    pub fn paint_all(&mut self, state: &GameState) {
        self.paint_blocks(state);
        self.paint_balls(state);
    }

    #[cfg(test)]
    pub fn layer(&self, layer: Layer) -> &[Vertex] {
        &self.layers[layer as usize]
    }

    /// True when some layer changed since the last composition
    #[cfg(test)]
    pub fn needs_compose(&self) -> bool {
        self.stale
    }

    /// Flatten all layers, back to front
    pub fn compose(&mut self) -> &[Vertex] {
        if self.stale {
            self.composed.clear();
            for layer in &self.layers {
                self.composed.extend_from_slice(layer);
            }
            self.stale = false;
        }
        &self.composed
    }

    fn replace(&mut self, layer: Layer, vertices: Vec<Vertex>) {
        self.layers[layer as usize] = vertices;
        self.stale = true;
    }
}

/// Grey fill with a line on every cell boundary
fn background_vertices() -> Vec<Vertex> {
    let width = WELL_WIDTH as f32;
    let height = WELL_HEIGHT as f32;
    let mut vertices = shapes::rect(Vec2::ZERO, Vec2::new(width, height), colors::BACKGROUND);

    for col in 0..=WELL_COLS {
        let x = (col * CELL_SIZE) as f32;
        vertices.extend(shapes::line(
            Vec2::new(x, 0.0),
            Vec2::new(x, height),
            GRID_LINE_WIDTH,
            colors::GRID_LINE,
        ));
    }
    for row in 0..=WELL_ROWS {
        let y = (row * CELL_SIZE) as f32;
        vertices.extend(shapes::line(
            Vec2::new(0.0, y),
            Vec2::new(width, y),
            GRID_LINE_WIDTH,
            colors::GRID_LINE,
        ));
    }

    vertices
}

/// Filled, outlined squares for every body cell
fn block_vertices<'a>(cells: impl Iterator<Item = &'a Cell>) -> Vec<Vertex> {
    let size = Vec2::splat(CELL_SIZE as f32);
    let mut vertices = Vec::new();

    for cell in cells.filter(|c| c.is_body) {
        let min = Vec2::new(cell.x as f32, cell.y as f32);
        vertices.extend(shapes::rect(min, size, colors::rgb(cell.color)));
        vertices.extend(shapes::rect_outline(
            min,
            size,
            OUTLINE_WIDTH,
            colors::BLOCK_OUTLINE,
        ));
    }

    vertices
}

/// White discs with a light rim
fn ball_vertices(balls: &[Ball]) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for ball in balls {
        vertices.extend(shapes::circle(
            ball.pos,
            ball.radius,
            colors::BALL,
            BALL_SEGMENTS,
        ));
        vertices.extend(shapes::ring(
            ball.pos,
            ball.radius - BALL_RIM_WIDTH / 2.0,
            ball.radius + BALL_RIM_WIDTH / 2.0,
            colors::BALL_RIM,
            BALL_SEGMENTS,
        ));
    }

    vertices
}
