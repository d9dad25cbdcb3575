//! The habit-persistence service seam.
//!
//! The store talks to the backend only through [`HabitService`]. Two
//! bindings ship with the crate: [`HttpHabitService`] for the real REST API
//! and [`InMemoryHabitService`], a fake backend for tests and embedding.

mod http;
mod memory;

use std::future::Future;

pub use http::HttpHabitService;
pub use memory::InMemoryHabitService;

use crate::error::TransportError;
use crate::habit::wire::{CategoryWire, CounterWire, HabitPayload, HabitWire, TimerWire};

/// Every backend binding implements this trait.
///
/// Futures are `Send` so the store can be driven from any tokio runtime.
pub trait HabitService: Send + Sync {
    fn list_habits(&self) -> impl Future<Output = Result<Vec<HabitWire>, TransportError>> + Send;

    fn get_habit(&self, id: i64) -> impl Future<Output = Result<HabitWire, TransportError>> + Send;

    fn create_habit(
        &self,
        user_id: i64,
        payload: &HabitPayload,
    ) -> impl Future<Output = Result<HabitWire, TransportError>> + Send;

    fn update_habit(
        &self,
        id: i64,
        user_id: i64,
        payload: &HabitPayload,
    ) -> impl Future<Output = Result<HabitWire, TransportError>> + Send;

    fn delete_habit(&self, id: i64) -> impl Future<Output = Result<(), TransportError>> + Send;

    fn set_habit_state(
        &self,
        id: i64,
        state_code: u8,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    fn list_categories_for_user(
        &self,
        user_id: i64,
    ) -> impl Future<Output = Result<Vec<CategoryWire>, TransportError>> + Send;

    fn update_counter_progress(
        &self,
        id: i64,
        progress: CounterWire,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    fn update_timer_progress(
        &self,
        id: i64,
        progress: TimerWire,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}
