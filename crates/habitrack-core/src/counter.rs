//! Bounded counter used by counter habits.
//!
//! `achieved` never exceeds `target` when a target is set and never goes
//! below zero. Text entry is sanitized rather than rejected.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterWidget {
    habit_id: Option<i64>,
    achieved: u32,
    target: Option<u32>,
}

impl CounterWidget {
    pub fn new(target: Option<u32>) -> Self {
        Self {
            habit_id: None,
            achieved: 0,
            target,
        }
    }

    pub fn achieved(&self) -> u32 {
        self.achieved
    }

    pub fn target(&self) -> Option<u32> {
        self.target
    }

    pub fn habit_id(&self) -> Option<i64> {
        self.habit_id
    }

    pub fn is_full(&self) -> bool {
        self.target.is_some_and(|t| self.achieved >= t)
    }

    /// Attach the widget to a habit row.
    ///
    /// Switching to a different habit resets progress to zero; rebinding the
    /// same habit keeps it, clamped to the (possibly new) target.
    pub fn bind(&mut self, habit_id: i64, target: Option<u32>) -> Option<Event> {
        let before = self.achieved;
        if self.habit_id != Some(habit_id) {
            self.achieved = 0;
        }
        self.habit_id = Some(habit_id);
        self.target = target;
        self.achieved = self.clamp(self.achieved);
        self.changed(before)
    }

    /// Bind and restore progress already recorded on the backend.
    pub fn bind_with_progress(
        &mut self,
        habit_id: i64,
        target: Option<u32>,
        achieved: u32,
    ) -> Option<Event> {
        let before = if self.habit_id == Some(habit_id) {
            self.achieved
        } else {
            0
        };
        self.habit_id = Some(habit_id);
        self.target = target;
        self.achieved = self.clamp(achieved);
        self.changed(before)
    }

    /// Take the digits out of `raw`; no digits means zero.
    ///
    /// A digit string too large to represent keeps the current value.
    pub fn set_from_text(&mut self, raw: &str) -> Option<Event> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        let before = self.achieved;
        let parsed = if digits.is_empty() {
            Some(0)
        } else {
            digits.parse::<u32>().ok()
        };
        if let Some(value) = parsed {
            self.achieved = self.clamp(value);
        }
        self.changed(before)
    }

    pub fn increment(&mut self) -> Option<Event> {
        let before = self.achieved;
        self.achieved = self.clamp(self.achieved.saturating_add(1));
        self.changed(before)
    }

    pub fn decrement(&mut self) -> Option<Event> {
        let before = self.achieved;
        self.achieved = self.achieved.saturating_sub(1);
        self.changed(before)
    }

    fn clamp(&self, value: u32) -> u32 {
        match self.target {
            Some(target) => value.min(target),
            None => value,
        }
    }

    fn changed(&self, before: u32) -> Option<Event> {
        (before != self.achieved).then(|| Event::CounterChanged {
            habit_id: self.habit_id,
            achieved: self.achieved,
            target: self.target,
            at: Utc::now(),
        })
    }
}
