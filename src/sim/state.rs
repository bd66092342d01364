//! Game state and core simulation types
//!
//! Everything a running game mutates lives in `GameState`; the driver owns
//! it and hands `&mut` to each tick handler.

use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::catalog::Catalog;
use super::piece::Piece;
use super::settled::SettledSet;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Pieces falling, balls bouncing
    Playing,
    /// A landed piece poked through the top of the well
    GameOver,
}

/// Side effects for platform collaborators (audio, logging, HUD)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A ball bounced off a well wall
    WallBounce,
    /// A ball hit a settled cell
    BlockBreak,
    /// The falling piece merged into the settled set
    PieceLanded,
    /// A ball joined the game
    BallSpawned,
    /// Time to (re)start the theme
    ThemeCue,
    /// The run ended
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Current phase
    pub phase: GamePhase,
    /// Round-robin piece source
    pub catalog: Catalog,
    /// Player-controlled piece
    pub piece: Piece,
    /// Landed cells
    pub settled: SettledSet,
    /// Active balls (spawn order)
    pub balls: Vec<Ball>,
    /// Whole seconds since the run started
    pub elapsed_secs: u64,
    /// Ball-vs-cell hits so far
    pub broken: u64,
    /// Pending side effects, drained by the driver
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh run: first catalog piece, one ball, zeroed counters
    pub fn new() -> Self {
        let mut catalog = Catalog::new();
        let piece = catalog.next_piece();
        let mut state = Self {
            phase: GamePhase::Playing,
            catalog,
            piece,
            settled: SettledSet::new(),
            balls: Vec::new(),
            elapsed_secs: 0,
            broken: 0,
            events: Vec::new(),
            next_id: 1,
        };

        state.spawn_ball();
        state.events.clear();

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a ball at the starting corner
    pub fn spawn_ball(&mut self) {
        let id = self.next_entity_id();
        self.balls.push(Ball::new(id));
        self.events.push(GameEvent::BallSpawned);
    }

    /// Current score
    pub fn score(&self) -> u64 {
        self.elapsed_secs + self.broken
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.piece.body_count(), 4);
        assert!(state.settled.is_empty());
        assert_eq!(state.score(), 0);
        assert!(state.events.is_empty());
        assert_eq!(state.catalog.peek_index(), 1);
    }

    #[test]
    fn test_score_sums_time_and_hits() {
        let mut state = GameState::new();
        state.elapsed_secs = 12;
        state.broken = 7;
        assert_eq!(state.score(), 19);
    }

    #[test]
    fn test_ball_ids_increase() {
        let mut state = GameState::new();
        state.spawn_ball();
        assert_eq!(state.balls[0].id, 1);
        assert_eq!(state.balls[1].id, 2);
        assert_eq!(state.drain_events(), vec![GameEvent::BallSpawned]);
        assert!(state.events.is_empty());
    }
}
