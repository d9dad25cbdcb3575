//! Calendar grid math and the date picker built on it.
//!
//! Everything here is plain data: the grid is a `Vec<DayCell>` that any
//! rendering layer can draw, the picker holds no UI handles.

mod math;
mod picker;

pub use math::{
    days_in_month, first_weekday_offset, format_iso, is_leap_year, month_grid, parse_iso, DayCell,
    MonthCursor,
};
pub use picker::{DatePicker, PointerTarget};
