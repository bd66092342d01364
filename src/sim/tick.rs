//! Tick handlers
//!
//! Each handler advances one simulation component by one fixed step. None of
//! them look at wall-clock time; the scheduler decides when they run.

use super::collision::{ball_cell_collision, crosses_wall};
use super::piece::{Piece, Rotation, rotate};
use super::settled::SettledSet;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Player commands, applied between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    MoveLeft,
    MoveRight,
    RotateClockwise,
    RotateCounterClockwise,
}

/// Whether a candidate piece may be committed
fn fits(settled: &SettledSet, piece: &Piece) -> bool {
    !piece.body().any(|c| c.out_of_well())
        && !settled.overlaps(piece.body())
        && !settled.supports(piece.body())
}

/// Apply one player action. Returns true if the piece changed.
///
/// The candidate is adopted whole or not at all.
pub fn apply_action(state: &mut GameState, action: PlayerAction) -> bool {
    if state.is_over() {
        return false;
    }

    let candidate = match action {
        PlayerAction::MoveLeft => state.piece.shifted(-CELL_SIZE, 0),
        PlayerAction::MoveRight => state.piece.shifted(CELL_SIZE, 0),
        PlayerAction::RotateClockwise => rotate(&state.piece, Rotation::Clockwise),
        PlayerAction::RotateCounterClockwise => rotate(&state.piece, Rotation::CounterClockwise),
    };

    if fits(&state.settled, &candidate) {
        state.piece = candidate;
        true
    } else {
        log::debug!("{:?} rejected", action);
        false
    }
}

/// Move the falling piece down one row, landing or ending the game as needed.
///
/// Returns true if the block layer changed.
pub fn descend(state: &mut GameState) -> bool {
    if state.is_over() {
        return false;
    }

    let candidate = state.piece.shifted(0, CELL_SIZE);

    // A rotation can leave the body on the floor row; land it there
    if candidate.body().any(|c| c.y >= WELL_HEIGHT) {
        land(state);
        return true;
    }

    let touches = state.settled.supports(candidate.body());

    if touches && candidate.body().any(|c| c.y <= 0) {
        log::info!(
            "Game over at {} s with {} hits, score {}",
            state.elapsed_secs,
            state.broken,
            state.score()
        );
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver);
        return true;
    }

    state.piece = candidate;
    let on_floor = state
        .piece
        .body()
        .any(|c| c.y >= WELL_HEIGHT - CELL_SIZE);

    if touches || on_floor {
        land(state);
    }

    true
}

/// Merge the current piece into the settled set and spawn the next one
fn land(state: &mut GameState) {
    state.settled.merge(state.piece.body());
    state.piece = state.catalog.next_piece();
    state.events.push(GameEvent::PieceLanded);
    log::info!("Piece landed, {} settled cells", state.settled.len());
}

/// Advance every ball by one fast tick. Returns true if a settled cell was
/// eroded.
///
/// Every cell the ball touches counts as a hit and flips velocity, but only
/// the last one touched (in settled-set order) is removed per ball per tick.
/// Wall checks use the velocity the ball entered the tick with.
pub fn advance_balls(state: &mut GameState) -> bool {
    if state.is_over() {
        return false;
    }

    let GameState {
        balls,
        settled,
        broken,
        events,
        ..
    } = state;

    let mut eroded = false;

    for ball in balls.iter_mut() {
        let entry_vel = ball.vel;
        let mut last_hit = None;

        for cell in settled.iter() {
            let result = ball_cell_collision(ball.pos, ball.radius, cell);
            if result.hit {
                *broken += 1;
                ball.reflect(result.axis);
                last_hit = Some((cell.x, cell.y));
                events.push(GameEvent::BlockBreak);
            }
        }

        if let Some((x, y)) = last_hit {
            settled.remove_at(x, y);
            eroded = true;
        }

        if crosses_wall(ball.pos.x, entry_vel.x, ball.radius, WELL_WIDTH as f32) {
            ball.vel.x = -entry_vel.x;
            events.push(GameEvent::WallBounce);
        }
        if crosses_wall(ball.pos.y, entry_vel.y, ball.radius, WELL_HEIGHT as f32) {
            ball.vel.y = -entry_vel.y;
            events.push(GameEvent::WallBounce);
        }

        // Moves with the velocity after this tick's flips
        ball.pos += ball.vel;
    }

    eroded
}

/// One second of play time
pub fn clock_tick(state: &mut GameState) {
    if !state.is_over() {
        state.elapsed_secs += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ball::Ball;
    use crate::sim::collision::Axis;
    use crate::sim::piece::Cell;
    use glam::Vec2;
    use proptest::prelude::*;

    fn flipped(v: Vec2, axis: Axis) -> Vec2 {
        match axis {
            Axis::Horizontal => Vec2::new(-v.x, v.y),
            Axis::Vertical => Vec2::new(v.x, -v.y),
        }
    }

    fn cell(col: i32, row: i32) -> Cell {
        Cell {
            x: col * CELL_SIZE,
            y: row * CELL_SIZE,
            color: 0xAAAAAA,
            is_body: true,
        }
    }

    fn spots(piece: &Piece) -> Vec<(i32, i32)> {
        piece.body().map(|c| (c.x, c.y)).collect()
    }

    /// State with no balls so piece tests stay isolated
    fn piece_only() -> GameState {
        let mut state = GameState::new();
        state.balls.clear();
        state
    }

    #[test]
    fn test_descend_moves_down_one_cell() {
        let mut state = piece_only();
        let before = spots(&state.piece);
        assert!(descend(&mut state));
        let after = spots(&state.piece);
        for ((x0, y0), (x1, y1)) in before.iter().zip(after.iter()) {
            assert_eq!(x0, x1);
            assert_eq!(*y1, y0 + CELL_SIZE);
        }
    }

    #[test]
    fn test_piece_lands_on_floor() {
        let mut state = piece_only();
        let mut landed = false;
        for _ in 0..30 {
            descend(&mut state);
            if state.events.contains(&GameEvent::PieceLanded) {
                landed = true;
                break;
            }
        }
        assert!(landed);
        // 2x2 square sits on the last two rows
        let mut rows: Vec<i32> = state.settled.iter().map(|c| c.row()).collect();
        rows.sort();
        assert_eq!(rows, vec![WELL_ROWS - 2, WELL_ROWS - 2, WELL_ROWS - 1, WELL_ROWS - 1]);
        // Next catalog piece is in play
        assert_eq!(state.piece.rows[0][0].color, 0x7CC661);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_rotated_onto_floor_row_lands_in_place() {
        let mut state = piece_only();
        state.piece = state.catalog.next_piece();
        // Bar body starts on row -2; bring it to row 14
        for _ in 0..16 {
            descend(&mut state);
        }
        assert!(state.events.is_empty());
        assert!(apply_action(&mut state, PlayerAction::RotateClockwise));
        assert_eq!(state.piece.body().map(|c| c.row()).max(), Some(WELL_ROWS - 1));

        descend(&mut state);
        assert!(state.events.contains(&GameEvent::PieceLanded));
        assert!(state.settled.iter().all(|c| c.row() < WELL_ROWS));
        assert_eq!(state.settled.len(), 3);
    }

    #[test]
    fn test_piece_lands_on_settled() {
        let mut state = piece_only();
        state.settled.push(cell(3, 10));
        for _ in 0..30 {
            descend(&mut state);
            if state.events.contains(&GameEvent::PieceLanded) {
                break;
            }
        }
        // Square rests with its bottom row directly above the settled cell
        assert_eq!(state.settled.len(), 5);
        assert!(state.settled.iter().any(|c| c.x == 3 * CELL_SIZE && c.row() == 9));
        assert!(state.settled.iter().any(|c| c.x == 4 * CELL_SIZE && c.row() == 8));
    }

    #[test]
    fn test_game_over_when_stack_reaches_top() {
        let mut state = piece_only();
        // Square spawns in rows -3..-2. The third descent's candidate covers
        // rows 0..1 and rests on row 2.
        state.settled.push(cell(3, 2));
        descend(&mut state);
        assert_eq!(state.phase, GamePhase::Playing);
        let committed = spots(&state.piece);
        descend(&mut state);
        assert_eq!(state.phase, GamePhase::Playing);
        descend(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver));
        // Candidate was not committed
        assert_eq!(spots(&state.piece).len(), committed.len());
        assert!(!descend(&mut state));

        // Restart brings everything back to a fresh run
        state = GameState::new();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.settled.is_empty());
        assert_eq!(state.score(), 0);
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.piece.rows[0][0].color, 0xF1CF48);
    }

    #[test]
    fn test_move_rejected_at_wall() {
        let mut state = piece_only();
        let mut moves = 0;
        while apply_action(&mut state, PlayerAction::MoveLeft) {
            moves += 1;
        }
        assert_eq!(moves, 3);
        assert_eq!(state.piece.body().map(|c| c.x).min(), Some(0));

        let mut state = piece_only();
        let mut moves = 0;
        while apply_action(&mut state, PlayerAction::MoveRight) {
            moves += 1;
        }
        // Square occupies columns 3-4, the well has 9 columns
        assert_eq!(moves, 4);
        assert_eq!(state.piece.body().map(|c| c.x).max(), Some(WELL_WIDTH - CELL_SIZE));
    }

    #[test]
    fn test_move_rejected_above_settled() {
        let mut state = piece_only();
        for _ in 0..10 {
            descend(&mut state);
        }
        // Square body now covers rows 7..8, columns 3..4
        let bottom = state.piece.body().map(|c| c.row()).max().unwrap_or_default();
        state.settled.push(cell(5, bottom + 1));
        let before = state.piece.clone();
        assert!(!apply_action(&mut state, PlayerAction::MoveRight));
        assert_eq!(state.piece, before);
        assert!(apply_action(&mut state, PlayerAction::MoveLeft));
    }

    #[test]
    fn test_move_rejected_into_settled_cell() {
        let mut state = piece_only();
        for _ in 0..10 {
            descend(&mut state);
        }
        let top = state.piece.body().map(|c| c.row()).min().unwrap_or_default();
        state.settled.push(cell(2, top));
        assert!(!apply_action(&mut state, PlayerAction::MoveLeft));
    }

    #[test]
    fn test_rotation_rejected_at_wall() {
        let mut state = piece_only();
        // Second catalog piece: horizontal bar in the middle row
        state.piece = state.catalog.next_piece();
        for _ in 0..6 {
            descend(&mut state);
        }
        assert!(apply_action(&mut state, PlayerAction::RotateClockwise));
        // Now vertical in the middle column; push it against the left wall
        while apply_action(&mut state, PlayerAction::MoveLeft) {}
        let before = state.piece.clone();
        // Rotating back needs the column left of the wall
        assert!(!apply_action(&mut state, PlayerAction::RotateCounterClockwise));
        assert_eq!(state.piece, before);
    }

    #[test]
    fn test_rotation_keeps_body_count() {
        let mut state = piece_only();
        state.piece = state.catalog.next_piece();
        state.piece = state.catalog.next_piece();
        for _ in 0..6 {
            descend(&mut state);
        }
        let count = state.piece.body_count();
        assert!(apply_action(&mut state, PlayerAction::RotateClockwise));
        assert_eq!(state.piece.body_count(), count);
        assert!(apply_action(&mut state, PlayerAction::RotateCounterClockwise));
        assert_eq!(state.piece.body_count(), count);
    }

    #[test]
    fn test_actions_ignored_after_game_over() {
        let mut state = piece_only();
        state.phase = GamePhase::GameOver;
        let before = state.piece.clone();
        assert!(!apply_action(&mut state, PlayerAction::MoveLeft));
        assert_eq!(state.piece, before);
    }

    #[test]
    fn test_ball_reflects_off_left_wall() {
        let mut state = piece_only();
        let mut ball = Ball::new(1);
        ball.pos = Vec2::new(BALL_RADIUS, 100.0);
        ball.vel = Vec2::new(-BALL_AXIS_SPEED, BALL_AXIS_SPEED);
        state.balls.push(ball);

        advance_balls(&mut state);
        let ball = &state.balls[0];
        assert!(ball.vel.x > 0.0);
        assert_eq!(ball.vel.y, BALL_AXIS_SPEED);
        assert!(ball.pos.x > BALL_RADIUS);
        assert_eq!(state.events, vec![GameEvent::WallBounce]);
    }

    #[test]
    fn test_bounce_moves_with_flipped_velocity() {
        let mut state = piece_only();
        let mut ball = Ball::new(1);
        ball.pos = Vec2::new(5.0, 100.0);
        ball.vel = Vec2::new(-BALL_AXIS_SPEED, BALL_AXIS_SPEED);
        state.balls.push(ball);

        advance_balls(&mut state);
        let pos = state.balls[0].pos;
        assert!((pos.x - (5.0 + BALL_AXIS_SPEED)).abs() < 1e-4);
        assert!((pos.y - (100.0 + BALL_AXIS_SPEED)).abs() < 1e-4);
    }

    #[test]
    fn test_ball_erodes_cell() {
        let mut state = piece_only();
        state.settled.push(cell(4, 8));
        let mut ball = Ball::new(1);
        // Just above the cell's top edge, heading down
        ball.pos = Vec2::new(90.0, 8.0 * CELL_SIZE as f32 - 4.0);
        ball.vel = Vec2::new(BALL_AXIS_SPEED, BALL_AXIS_SPEED);
        state.balls.push(ball);

        assert!(advance_balls(&mut state));
        assert!(state.settled.is_empty());
        assert_eq!(state.broken, 1);
        assert!(state.balls[0].vel.y < 0.0);
        assert!(state.events.contains(&GameEvent::BlockBreak));
    }

    #[test]
    fn test_only_last_touched_cell_is_removed() {
        let mut state = piece_only();
        // Two side-by-side cells, ball straddles their shared top corner
        state.settled.push(cell(4, 8));
        state.settled.push(cell(5, 8));
        let mut ball = Ball::new(1);
        ball.pos = Vec2::new(100.0, 8.0 * CELL_SIZE as f32 - 3.0);
        state.balls.push(ball);

        advance_balls(&mut state);
        assert_eq!(state.broken, 2);
        assert_eq!(state.settled.len(), 1);
        assert_eq!(state.settled.iter().next().map(|c| c.x), Some(4 * CELL_SIZE));
        // Two vertical flips cancel out
        assert!(state.balls[0].vel.y > 0.0);
    }

    #[test]
    fn test_clock_tick() {
        let mut state = piece_only();
        clock_tick(&mut state);
        clock_tick(&mut state);
        assert_eq!(state.elapsed_secs, 2);
        state.phase = GamePhase::GameOver;
        clock_tick(&mut state);
        assert_eq!(state.elapsed_secs, 2);
    }

    fn arb_action() -> impl Strategy<Value = Option<PlayerAction>> {
        prop_oneof![
            Just(None),
            Just(Some(PlayerAction::MoveLeft)),
            Just(Some(PlayerAction::MoveRight)),
            Just(Some(PlayerAction::RotateClockwise)),
            Just(Some(PlayerAction::RotateCounterClockwise)),
        ]
    }

    proptest! {
        #[test]
        fn prop_committed_piece_never_overlaps_settled(
            stack in prop::collection::vec((0..WELL_COLS, 1..WELL_ROWS), 0..20),
            steps in prop::collection::vec(arb_action(), 1..200),
        ) {
            let mut state = piece_only();
            for (col, row) in stack {
                state.settled.push(cell(col, row));
            }
            for step in steps {
                match step {
                    Some(action) => {
                        let before = state.piece.clone();
                        if !apply_action(&mut state, action) {
                            prop_assert_eq!(&state.piece, &before);
                        }
                    }
                    None => {
                        descend(&mut state);
                    }
                }
                if state.is_over() {
                    break;
                }
                prop_assert!(!state.settled.overlaps(state.piece.body()));
                prop_assert!(!state.piece.body().any(|c| c.out_of_well()));
            }
        }

        #[test]
        fn prop_wall_flip_matches_next_step(
            x in BALL_RADIUS..(WELL_WIDTH as f32 - BALL_RADIUS),
            y in BALL_RADIUS..(WELL_HEIGHT as f32 - BALL_RADIUS),
            left in any::<bool>(),
            up in any::<bool>(),
        ) {
            let mut state = piece_only();
            let mut ball = Ball::new(1);
            ball.pos = Vec2::new(x, y);
            ball.vel = Vec2::new(
                if left { -BALL_AXIS_SPEED } else { BALL_AXIS_SPEED },
                if up { -BALL_AXIS_SPEED } else { BALL_AXIS_SPEED },
            );
            let entry = ball.vel;
            state.balls.push(ball);

            advance_balls(&mut state);
            let mut expected = entry;
            if crosses_wall(x, entry.x, BALL_RADIUS, WELL_WIDTH as f32) {
                expected = flipped(expected, Axis::Horizontal);
            }
            if crosses_wall(y, entry.y, BALL_RADIUS, WELL_HEIGHT as f32) {
                expected = flipped(expected, Axis::Vertical);
            }
            prop_assert_eq!(state.balls[0].vel, expected);
        }

        #[test]
        fn prop_speed_invariant_and_ball_contained(
            stack in prop::collection::vec((0..WELL_COLS, 0..WELL_ROWS), 0..30),
            ticks in 1usize..3000,
        ) {
            let mut state = GameState::new();
            for (col, row) in stack {
                state.settled.push(cell(col, row));
            }
            for _ in 0..ticks {
                advance_balls(&mut state);
            }
            let ball = &state.balls[0];
            prop_assert_eq!(ball.vel.x.abs(), BALL_AXIS_SPEED);
            prop_assert_eq!(ball.vel.y.abs(), BALL_AXIS_SPEED);
        }
    }
}
