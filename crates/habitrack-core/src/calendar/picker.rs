//! Date picker widget state.
//!
//! The picker keeps two values: `supplied`, the last date its owner accepted
//! and handed back in, and `committed`, what the widget currently shows.
//! A day click commits immediately; `cancel()` rolls `committed` back to
//! `supplied`. Navigation never touches either value, and closing without
//! applying drops it: the cursor returns to the committed month, or to the
//! month shown when the popover was opened.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::math::{month_grid, parse_iso, DayCell, MonthCursor};
use crate::events::Event;

/// Where a pointer-down landed relative to the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerTarget {
    /// The input/toggle control.
    Trigger,
    /// Inside the open calendar popover.
    Popover,
    Outside,
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatePicker {
    cursor: MonthCursor,
    opened_on: MonthCursor,
    committed: String,
    supplied: String,
    is_open: bool,
}

impl DatePicker {
    /// Closed picker showing the month of `value`, or of `today` when the
    /// value is empty or unparseable.
    pub fn new(value: impl Into<String>, today: NaiveDate) -> Self {
        let value = value.into();
        let cursor = parse_iso(&value)
            .map(MonthCursor::of)
            .unwrap_or_else(|| MonthCursor::of(today));
        Self {
            cursor,
            opened_on: cursor,
            committed: value.clone(),
            supplied: value,
            is_open: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    pub fn value(&self) -> &str {
        &self.committed
    }

    pub fn supplied_value(&self) -> &str {
        &self.supplied
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Day cells for the displayed month.
    pub fn grid(&self, today: Option<NaiveDate>) -> Vec<DayCell> {
        month_grid(self.cursor, parse_iso(&self.committed), today)
    }

    /// Header label, e.g. "March 2025".
    pub fn title(&self) -> String {
        let name = MONTH_NAMES
            .get(self.cursor.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("");
        format!("{name} {}", self.cursor.year)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn open(&mut self) {
        if !self.is_open {
            self.opened_on = self.cursor;
            self.is_open = true;
        }
    }

    /// Close without applying.
    pub fn close(&mut self) {
        if self.is_open {
            self.dismiss();
        }
    }

    pub fn toggle(&mut self) {
        if self.is_open {
            self.dismiss();
        } else {
            self.open();
        }
    }

    pub fn navigate(&mut self, delta: i32) {
        self.cursor = self.cursor.shift(delta);
    }

    pub fn previous_month(&mut self) {
        self.navigate(-1);
    }

    pub fn next_month(&mut self) {
        self.navigate(1);
    }

    /// Commit `day` of the displayed month.
    ///
    /// Returns `None` without changing anything when `day` is outside
    /// `[1, days_in_month]`.
    pub fn select_day(&mut self, day: u32) -> Option<Event> {
        let value = self.cursor.date_string(day)?;
        self.committed = value.clone();
        Some(Event::DateSelected {
            value,
            at: Utc::now(),
        })
    }

    /// Re-confirm the committed date and close. No-op while nothing is selected.
    pub fn apply(&mut self) -> Option<Event> {
        if self.committed.is_empty() {
            return None;
        }
        self.is_open = false;
        Some(Event::DateSelected {
            value: self.committed.clone(),
            at: Utc::now(),
        })
    }

    /// Revert to the owner-supplied value and close.
    pub fn cancel(&mut self) -> Option<Event> {
        let reverted = self.committed != self.supplied;
        self.committed = self.supplied.clone();
        self.dismiss();
        if !reverted {
            return None;
        }
        Some(Event::DateReverted {
            value: self.committed.clone(),
            at: Utc::now(),
        })
    }

    /// Owner hands in a newly accepted value.
    pub fn set_value(&mut self, value: impl Into<String>) {
        let value = value.into();
        if let Some(date) = parse_iso(&value) {
            self.cursor = MonthCursor::of(date);
        }
        self.committed = value.clone();
        self.supplied = value;
    }

    /// Outside clicks dismiss the popover; the committed value is kept.
    pub fn pointer_down(&mut self, target: PointerTarget) {
        if self.is_open && target == PointerTarget::Outside {
            self.dismiss();
        }
    }

    fn dismiss(&mut self) {
        self.is_open = false;
        self.cursor = parse_iso(&self.committed)
            .map(MonthCursor::of)
            .unwrap_or(self.opened_on);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::days_in_month;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()
    }

    #[test]
    fn starts_on_supplied_month_or_today() {
        let picker = DatePicker::new("2024-11-03", today());
        assert_eq!(picker.cursor(), MonthCursor::new(2024, 11).unwrap());
        assert_eq!(picker.title(), "November 2024");

        let empty = DatePicker::new("", today());
        assert_eq!(empty.cursor(), MonthCursor::new(2025, 2).unwrap());
        assert!(!empty.is_open());
    }

    #[test]
    fn select_day_commits_immediately() {
        let mut picker = DatePicker::new("", today());
        picker.open();
        let event = picker.select_day(14).expect("valid day");
        assert_eq!(picker.value(), "2025-02-14");
        assert!(matches!(event, Event::DateSelected { ref value, .. } if value == "2025-02-14"));
        assert!(picker.is_open(), "day click does not close the popover");
    }

    #[test]
    fn every_valid_day_selects_within_displayed_month() {
        let mut picker = DatePicker::new("", today());
        for delta in 0..24 {
            let cursor = picker.cursor();
            for day in 1..=days_in_month(cursor.year, cursor.month) {
                assert!(picker.select_day(day).is_some());
                let date = parse_iso(picker.value()).unwrap();
                assert!(cursor.contains(date), "delta {delta} day {day}");
            }
            picker.next_month();
        }
    }

    #[test]
    fn out_of_range_day_is_ignored() {
        let mut picker = DatePicker::new("2025-02-01", today());
        assert!(picker.select_day(29).is_none());
        assert!(picker.select_day(0).is_none());
        assert_eq!(picker.value(), "2025-02-01");
    }

    #[test]
    fn navigation_leaves_value_untouched() {
        let mut picker = DatePicker::new("2025-02-01", today());
        picker.previous_month();
        picker.previous_month();
        assert_eq!(picker.cursor(), MonthCursor::new(2024, 12).unwrap());
        assert_eq!(picker.value(), "2025-02-01");
    }

    #[test]
    fn cancel_restores_supplied_value() {
        let mut picker = DatePicker::new("2025-02-01", today());
        picker.open();
        picker.next_month();
        picker.select_day(5);
        assert_eq!(picker.value(), "2025-03-05");

        let event = picker.cancel();
        assert!(matches!(event, Some(Event::DateReverted { ref value, .. }) if value == "2025-02-01"));
        assert_eq!(picker.value(), "2025-02-01");
        assert!(!picker.is_open());
        assert!(picker.cancel().is_none());
    }

    #[test]
    fn apply_requires_a_selection() {
        let mut picker = DatePicker::new("", today());
        picker.open();
        assert!(picker.apply().is_none());
        assert!(picker.is_open());

        picker.select_day(3);
        assert!(picker.apply().is_some());
        assert!(!picker.is_open());
    }

    #[test]
    fn set_value_moves_cursor_and_becomes_cancel_target() {
        let mut picker = DatePicker::new("", today());
        picker.set_value("2023-7-9");
        assert_eq!(picker.cursor(), MonthCursor::new(2023, 7).unwrap());
        picker.select_day(20);
        picker.cancel();
        assert_eq!(picker.value(), "2023-7-9");
    }

    #[test]
    fn closing_discards_navigation() {
        let mut picker = DatePicker::new("2025-02-01", today());
        picker.open();
        picker.next_month();
        picker.next_month();
        picker.close();
        assert_eq!(picker.cursor(), MonthCursor::new(2025, 2).unwrap());

        let mut empty = DatePicker::new("", today());
        empty.toggle();
        empty.previous_month();
        empty.pointer_down(PointerTarget::Outside);
        assert_eq!(empty.cursor(), MonthCursor::new(2025, 2).unwrap());
        assert_eq!(empty.value(), "");
    }

    #[test]
    fn closing_after_selection_shows_selected_month() {
        let mut picker = DatePicker::new("2025-02-01", today());
        picker.open();
        picker.next_month();
        picker.select_day(9);
        picker.next_month();
        picker.toggle();
        assert_eq!(picker.value(), "2025-03-09");
        assert_eq!(picker.cursor(), MonthCursor::new(2025, 3).unwrap());
    }

    #[test]
    fn outside_pointer_closes_without_changing_value() {
        let mut picker = DatePicker::new("", today());
        picker.toggle();
        picker.select_day(1);

        picker.pointer_down(PointerTarget::Popover);
        assert!(picker.is_open());
        picker.pointer_down(PointerTarget::Trigger);
        assert!(picker.is_open());

        picker.pointer_down(PointerTarget::Outside);
        assert!(!picker.is_open());
        assert_eq!(picker.value(), "2025-02-01");
    }

    #[test]
    fn grid_marks_committed_day() {
        let mut picker = DatePicker::new("", today());
        picker.select_day(10);
        let grid = picker.grid(Some(today()));
        let marked: Vec<_> = grid
            .iter()
            .filter_map(|c| match c {
                DayCell::Day {
                    day,
                    selected: true,
                    today,
                } => Some((*day, *today)),
                _ => None,
            })
            .collect();
        assert_eq!(marked, vec![(10, true)]);
    }
}
