//! # Habitrack Core Library
//!
//! This library provides the core logic for habitrack, a personal habit
//! tracker. It follows a CLI-first philosophy: every operation is available
//! through the standalone `habitrack` binary, and any graphical shell is a
//! thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Widgets**: [`DatePicker`], [`CounterWidget`] and [`TimerWidget`] are
//!   plain state machines. Commands return an [`Event`] when something
//!   changed; nothing here renders.
//! - **Store**: [`HabitStore`] partitions habits into active, completed and
//!   skipped lists and owns the [`CategoryRegistry`].
//! - **Service**: [`HabitService`] is the only path to the backend, with a
//!   REST binding ([`HttpHabitService`]) and an in-process one
//!   ([`InMemoryHabitService`]).
//! - **Config**: TOML configuration under `~/.config/habitrack/`.

pub mod calendar;
pub mod category;
pub mod config;
pub mod counter;
pub mod error;
pub mod events;
pub mod habit;
pub mod service;
pub mod store;
pub mod timer;

pub use calendar::{DatePicker, DayCell, MonthCursor, PointerTarget};
pub use category::{Category, CategoryRegistry};
pub use config::Config;
pub use counter::CounterWidget;
pub use error::{ConfigError, CoreError, TransportError, ValidationError};
pub use events::Event;
pub use habit::{CategoryRef, Habit, HabitForm, HabitKind, LifecycleState, Progress};
pub use service::{HabitService, HttpHabitService, InMemoryHabitService};
pub use store::{HabitStore, Partitions, StoreConfig};
pub use timer::{IntervalTickSource, ManualTickSource, Tick, TickSource, TimerState, TimerWidget};
