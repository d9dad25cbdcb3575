use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::habit::LifecycleState;
use crate::timer::TimerState;

/// Every state change in the tracking core produces an Event.
/// The presentation shell renders them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A day click (or apply) committed a date in the picker.
    DateSelected {
        value: String,
        at: DateTime<Utc>,
    },
    /// The picker rolled back to the owner-supplied value.
    DateReverted {
        value: String,
        at: DateTime<Utc>,
    },
    CounterChanged {
        habit_id: Option<i64>,
        achieved: u32,
        target: Option<u32>,
        at: DateTime<Utc>,
    },
    TimerStarted {
        remaining_secs: u64,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerExpired {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerSnapshot {
        state: TimerState,
        remaining_secs: u64,
        duration_secs: u64,
        display: String,
        at: DateTime<Utc>,
    },
    /// Partitions were replaced from a fresh backend snapshot.
    HabitsLoaded {
        active: usize,
        completed: usize,
        skipped: usize,
        at: DateTime<Utc>,
    },
    HabitStateChanged {
        id: i64,
        state: LifecycleState,
        at: DateTime<Utc>,
    },
    HabitSaved {
        id: i64,
        created: bool,
        at: DateTime<Utc>,
    },
    HabitDeleted {
        id: i64,
        at: DateTime<Utc>,
    },
    ProgressRecorded {
        id: i64,
        achieved: u64,
        at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = Event::HabitStateChanged {
            id: 7,
            state: LifecycleState::Completed,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "HabitStateChanged");
        assert_eq!(json["id"], 7);
        assert_eq!(json["state"], "completed");
    }
}
