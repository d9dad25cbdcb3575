//! Countdown widget for timed habits.
//!
//! ## State Transitions
//!
//! ```text
//! Idle ──start──> Running ──pause──> Paused ──start──> Running
//!                    │
//!                    └──tick (remaining == 1)──> Expired ──start──> Running (full duration)
//!
//! any ──reset──> Idle
//! ```
//!
//! The widget owns at most one tick-source guard, held exactly while the
//! state is `Running`.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::tick::{ManualTickSource, Tick, TickSource};
use crate::events::Event;
use crate::habit::Habit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Expired,
}

pub struct TimerWidget<S: TickSource = ManualTickSource> {
    duration_secs: u64,
    remaining_secs: u64,
    state: TimerState,
    source: S,
    guard: Option<S::Guard>,
    generation: u64,
}

impl<S: TickSource> fmt::Debug for TimerWidget<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerWidget")
            .field("duration_secs", &self.duration_secs)
            .field("remaining_secs", &self.remaining_secs)
            .field("state", &self.state)
            .field("ticking", &self.guard.is_some())
            .field("generation", &self.generation)
            .finish()
    }
}

impl<S: TickSource> TimerWidget<S> {
    /// Idle timer with `remaining` set to the full duration.
    pub fn new(duration_secs: u64, source: S) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            state: TimerState::Idle,
            source,
            guard: None,
            generation: 0,
        }
    }

    /// Timer configured from a habit's target duration.
    pub fn for_habit(habit: &Habit, source: S) -> Self {
        Self::new(habit.target_seconds.unwrap_or(0), source)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    /// Seconds counted down so far.
    pub fn elapsed(&self) -> u64 {
        self.duration_secs.saturating_sub(self.remaining_secs)
    }

    /// Whether a tick source is currently held.
    pub fn is_ticking(&self) -> bool {
        self.guard.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// `MM:SS`, minutes not wrapped at 60.
    pub fn display(&self) -> String {
        format_clock(self.remaining_secs)
    }

    pub fn snapshot(&self) -> Event {
        Event::TimerSnapshot {
            state: self.state,
            remaining_secs: self.remaining_secs,
            duration_secs: self.duration_secs,
            display: self.display(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => None,
            TimerState::Idle | TimerState::Paused | TimerState::Expired => {
                if self.duration_secs == 0 {
                    debug!("timer has no duration, not starting");
                    return None;
                }
                if self.remaining_secs == 0 {
                    self.remaining_secs = self.duration_secs;
                }
                self.state = TimerState::Running;
                self.generation += 1;
                self.guard = Some(self.source.start(self.generation));
                Some(Event::TimerStarted {
                    remaining_secs: self.remaining_secs,
                    duration_secs: self.duration_secs,
                    at: Utc::now(),
                })
            }
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                self.release();
                self.state = TimerState::Paused;
                Some(Event::TimerPaused {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Count down one second. Returns `Some(Event::TimerExpired)` on the
    /// tick that reaches zero; ticks outside `Running` are ignored.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        if self.remaining_secs > 1 {
            self.remaining_secs -= 1;
            return None;
        }
        self.remaining_secs = 0;
        self.state = TimerState::Expired;
        self.release();
        Some(Event::TimerExpired {
            duration_secs: self.duration_secs,
            at: Utc::now(),
        })
    }

    /// Apply a tick delivered by the source, dropping stale ones.
    pub fn on_tick(&mut self, tick: Tick) -> Option<Event> {
        if tick.generation != self.generation || self.guard.is_none() {
            return None;
        }
        self.tick()
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.release();
        self.state = TimerState::Idle;
        self.remaining_secs = self.duration_secs;
        Some(Event::TimerReset {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Release the tick source when the owning row goes away.
    /// A running countdown is left paused.
    pub fn teardown(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
        }
        self.release();
    }

    fn release(&mut self) {
        if self.guard.take().is_some() {
            debug!(generation = self.generation, "tick source released");
        }
    }
}

/// Render seconds as `MM:SS`.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
