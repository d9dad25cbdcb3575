mod tick;
mod widget;

pub use tick::{IntervalGuard, IntervalTickSource, ManualGuard, ManualTickSource, Tick, TickSource};
pub use widget::{format_clock, TimerState, TimerWidget};
