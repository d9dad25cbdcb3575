//! Habit domain model.
//!
//! A [`Habit`] is the normalized, render-ready view of what the backend
//! returns as a [`wire::HabitWire`]. Conversion between the two lives in
//! [`mapper`]; the create/edit form and its validation live in [`form`].

pub mod form;
pub mod mapper;
pub mod wire;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use form::{HabitForm, Progress};

/// Name shown for habits whose category tag list is empty.
pub const UNCATEGORIZED_NAME: &str = "Uncategorized";
/// Neutral gray used with [`UNCATEGORIZED_NAME`].
pub const UNCATEGORIZED_COLOR: &str = "#607D8B";

/// Progress mechanism of a habit. Fixed at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum HabitKind {
    /// No progress tracking
    #[default]
    Plain,
    /// Bounded tally
    Counter,
    /// Countdown
    Timed,
}

impl HabitKind {
    /// Tag string used by the backend's `tipo` field.
    pub fn wire_tag(self) -> &'static str {
        match self {
            HabitKind::Plain => "Normal",
            HabitKind::Counter => "Contadora",
            HabitKind::Timed => "Cronometrada",
        }
    }

    /// Numeric `idTipo` sent on create/update.
    pub fn type_code(self) -> u8 {
        match self {
            HabitKind::Plain => 1,
            HabitKind::Counter => 2,
            HabitKind::Timed => 3,
        }
    }

    /// Inverse of [`HabitKind::type_code`].
    pub fn from_type_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(HabitKind::Plain),
            2 => Some(HabitKind::Counter),
            3 => Some(HabitKind::Timed),
            _ => None,
        }
    }

    /// Parse a wire or form tag. Returns `None` for unknown tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "normal" | "plain" => Some(HabitKind::Plain),
            "contadora" | "contador" | "counter" => Some(HabitKind::Counter),
            "cronometrada" | "pomodoro" | "timed" => Some(HabitKind::Timed),
            _ => None,
        }
    }
}

impl fmt::Display for HabitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HabitKind::Plain => "plain",
            HabitKind::Counter => "counter",
            HabitKind::Timed => "timed",
        };
        f.write_str(s)
    }
}

/// Lifecycle partition a habit currently belongs to.
///
/// ```text
/// Active ──complete──> Completed
///    └─────skip──────> Skipped
/// ```
///
/// Moves only happen through explicit complete/skip actions; editing a
/// habit never changes its state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    #[default]
    Active,
    Completed,
    Skipped,
}

impl LifecycleState {
    /// Backend `idEstado` value.
    pub fn code(self) -> u8 {
        match self {
            LifecycleState::Active => 1,
            LifecycleState::Completed => 2,
            LifecycleState::Skipped => 3,
        }
    }

    /// Map a backend state code. Absent or unknown codes mean Active.
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(2) => LifecycleState::Completed,
            Some(3) => LifecycleState::Skipped,
            _ => LifecycleState::Active,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleState::Active => "active",
            LifecycleState::Completed => "completed",
            LifecycleState::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// Weak reference to a category by its name/color pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRef {
    pub name: String,
    pub color: String,
}

impl CategoryRef {
    pub fn uncategorized() -> Self {
        Self {
            name: UNCATEGORIZED_NAME.to_string(),
            color: UNCATEGORIZED_COLOR.to_string(),
        }
    }

    pub fn is_uncategorized(&self) -> bool {
        self.name == UNCATEGORIZED_NAME && self.color == UNCATEGORIZED_COLOR
    }
}

/// One tracked activity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Habit {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub kind: HabitKind,
    pub category: CategoryRef,
    /// ISO calendar date
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Time-of-day string, display only
    pub reminder: Option<String>,
    /// Counter habits only
    pub target_count: Option<u32>,
    pub achieved_count: Option<u32>,
    /// Timed habits only
    pub target_seconds: Option<u64>,
    pub achieved_seconds: Option<u64>,
    pub lifecycle: LifecycleState,
}

impl Habit {
    /// Progress carried forward when the habit is edited as `kind`.
    ///
    /// Only the sub-object matching the new kind is carried; a kind change
    /// leaves the other counter untouched on the backend side.
    pub fn carried_progress(&self, kind: HabitKind) -> u64 {
        match kind {
            HabitKind::Plain => 0,
            HabitKind::Counter => self.achieved_count.map(u64::from).unwrap_or(0),
            HabitKind::Timed => self.achieved_seconds.unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_codes_round_trip_and_default_to_active() {
        for state in [
            LifecycleState::Active,
            LifecycleState::Completed,
            LifecycleState::Skipped,
        ] {
            assert_eq!(LifecycleState::from_code(Some(i64::from(state.code()))), state);
        }
        assert_eq!(LifecycleState::from_code(None), LifecycleState::Active);
        assert_eq!(LifecycleState::from_code(Some(9)), LifecycleState::Active);
        assert_eq!(LifecycleState::from_code(Some(-1)), LifecycleState::Active);
        assert_eq!(LifecycleState::from_code(Some(1002)), LifecycleState::Active);
    }

    #[test]
    fn kind_tags_accept_form_aliases() {
        assert_eq!(HabitKind::from_tag("Contadora"), Some(HabitKind::Counter));
        assert_eq!(HabitKind::from_tag("Contador"), Some(HabitKind::Counter));
        assert_eq!(HabitKind::from_tag("Pomodoro"), Some(HabitKind::Timed));
        assert_eq!(HabitKind::from_tag(" normal "), Some(HabitKind::Plain));
        assert_eq!(HabitKind::from_tag("weekly"), None);
    }

    #[test]
    fn kind_wire_tags_parse_back() {
        for kind in [HabitKind::Plain, HabitKind::Counter, HabitKind::Timed] {
            assert_eq!(HabitKind::from_tag(kind.wire_tag()), Some(kind));
        }
    }
}
