//! Fixed-rate timer scheduler
//!
//! One loop owns every timer the game needs. The driver feeds it elapsed
//! milliseconds from a monotonic clock; due timers fire in chronological
//! order against the game state. Game over is checked before each firing, so
//! nothing runs once the run has ended.

use super::state::{GameEvent, GameState};
use super::tick;
use crate::consts::*;

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Elapsed-seconds counter
    Clock,
    /// Ball advancement
    Ball,
    /// Piece descent
    Descent,
    /// Theme audio replay
    Theme,
    /// One-shot second ball
    SecondBall,
}

#[derive(Debug, Clone)]
struct Timer {
    kind: TimerKind,
    /// `None` for one-shot timers
    interval: Option<f64>,
    next_due: f64,
}

impl Timer {
    fn periodic(kind: TimerKind, first_due: f64, interval: f64) -> Self {
        Self {
            kind,
            interval: Some(interval),
            next_due: first_due,
        }
    }

    fn once(kind: TimerKind, due: f64) -> Self {
        Self {
            kind,
            interval: None,
            next_due: due,
        }
    }

    fn reschedule(&mut self) {
        self.next_due = match self.interval {
            Some(interval) => self.next_due + interval,
            None => f64::INFINITY,
        };
    }
}

/// Which layers a step touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Piece or settled set changed
    pub blocks_dirty: bool,
    /// A ball moved or joined
    pub balls_dirty: bool,
    /// Number of timer firings processed
    pub fired: u32,
}

/// Chronological driver for all game timers
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Simulated time since the run started (ms)
    now_ms: f64,
    /// Ordered by tie-break priority
    timers: Vec<Timer>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            timers: vec![
                Timer::periodic(TimerKind::Clock, CLOCK_INTERVAL_MS, CLOCK_INTERVAL_MS),
                Timer::periodic(TimerKind::Ball, BALL_INTERVAL_MS, BALL_INTERVAL_MS),
                Timer::periodic(TimerKind::Descent, DESCENT_INTERVAL_MS, DESCENT_INTERVAL_MS),
                Timer::periodic(TimerKind::Theme, THEME_START_DELAY_MS, THEME_INTERVAL_MS),
                Timer::once(TimerKind::SecondBall, SECOND_BALL_DELAY_MS),
            ],
        }
    }

    /// Simulated milliseconds since the run started
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Run every timer due within the next `dt_ms` milliseconds.
    ///
    /// Frame gaps above `MAX_FRAME_MS` are clamped so a backgrounded tab
    /// doesn't come back to a wall of ticks.
    pub fn advance(&mut self, state: &mut GameState, dt_ms: f64) -> StepReport {
        let mut report = StepReport::default();
        let target = self.now_ms + dt_ms.clamp(0.0, MAX_FRAME_MS);

        loop {
            if state.is_over() {
                return report;
            }

            // Earliest due timer; ties go to the first in list order
            let Some(index) = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, t)| t.next_due <= target)
                .min_by(|(_, a), (_, b)| a.next_due.total_cmp(&b.next_due))
                .map(|(i, _)| i)
            else {
                break;
            };

            let timer = &mut self.timers[index];
            self.now_ms = timer.next_due;
            let kind = timer.kind;
            timer.reschedule();

            fire(kind, state, &mut report);
            report.fired += 1;
        }

        self.now_ms = target;
        report
    }
}

fn fire(kind: TimerKind, state: &mut GameState, report: &mut StepReport) {
    match kind {
        TimerKind::Clock => tick::clock_tick(state),
        TimerKind::Ball => {
            if tick::advance_balls(state) {
                report.blocks_dirty = true;
            }
            report.balls_dirty = true;
        }
        TimerKind::Descent => {
            if tick::descend(state) {
                report.blocks_dirty = true;
            }
        }
        TimerKind::Theme => state.events.push(GameEvent::ThemeCue),
        TimerKind::SecondBall => {
            state.spawn_ball();
            log::info!("Second ball in play");
            report.balls_dirty = true;
        }
    }
}
