//! Pure month/day-grid arithmetic.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of days in `month` (1-12) of `year`, Gregorian rules.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Weekday of the first day of the month, Sunday = 0 .. Saturday = 6.
pub fn first_weekday_offset(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

/// Zero-padded `YYYY-MM-DD`.
pub fn format_iso(year: i32, month: u32, day: u32) -> String {
    format!("{year:04}-{month:02}-{day:02}")
}

/// Parse `YYYY-MM-DD`, also accepting unpadded `Y-M-D`.
pub fn parse_iso(value: &str) -> Option<NaiveDate> {
    let mut parts = value.trim().splitn(3, '-');
    let year = parts.next()?.parse::<i32>().ok()?;
    let month = parts.next()?.parse::<u32>().ok()?;
    let day = parts.next()?.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// The month a calendar is currently displaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthCursor {
    pub year: i32,
    /// 1-12
    pub month: u32,
}

impl MonthCursor {
    /// Returns `None` when `month` is outside 1-12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Move by `delta` months, carrying into the year.
    pub fn shift(self, delta: i32) -> Self {
        let index = i64::from(self.year) * 12 + i64::from(self.month) - 1 + i64::from(delta);
        let year = index.div_euclid(12);
        let month = index.rem_euclid(12) as u32 + 1;
        Self {
            year: i32::try_from(year).unwrap_or(if year < 0 { i32::MIN } else { i32::MAX }),
            month,
        }
    }

    pub fn days(self) -> u32 {
        days_in_month(self.year, self.month)
    }

    pub fn first_weekday_offset(self) -> u32 {
        first_weekday_offset(self.year, self.month)
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// ISO date of `day` within this month, or `None` when out of range.
    pub fn date_string(self, day: u32) -> Option<String> {
        (1..=self.days())
            .contains(&day)
            .then(|| format_iso(self.year, self.month, day))
    }
}

/// One cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DayCell {
    /// Leading padding before the 1st.
    Blank,
    Day { day: u32, selected: bool, today: bool },
}

/// Grid for `cursor`: `first_weekday_offset` blanks followed by every day.
pub fn month_grid(
    cursor: MonthCursor,
    selected: Option<NaiveDate>,
    today: Option<NaiveDate>,
) -> Vec<DayCell> {
    let offset = cursor.first_weekday_offset();
    let days = cursor.days();
    let marks = |date: Option<NaiveDate>| {
        date.filter(|d| cursor.contains(*d)).map(|d| d.day())
    };
    let selected_day = marks(selected);
    let today_day = marks(today);

    let mut cells = Vec::with_capacity((offset + days) as usize);
    cells.extend((0..offset).map(|_| DayCell::Blank));
    cells.extend((1..=days).map(|day| DayCell::Day {
        day,
        selected: selected_day == Some(day),
        today: today_day == Some(day),
    }));
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_years_follow_gregorian_rule() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 12), 31);
    }

    #[test]
    fn first_weekday_is_sunday_based() {
        // 1 June 2025 was a Sunday, 1 January 2025 a Wednesday.
        assert_eq!(first_weekday_offset(2025, 6), 0);
        assert_eq!(first_weekday_offset(2025, 1), 3);
        // 1 March 2025 was a Saturday.
        assert_eq!(first_weekday_offset(2025, 3), 6);
    }

    #[test]
    fn cursor_shift_crosses_year_boundaries() {
        let jan = MonthCursor::new(2025, 1).unwrap();
        assert_eq!(jan.shift(-1), MonthCursor::new(2024, 12).unwrap());
        assert_eq!(jan.shift(12), MonthCursor::new(2026, 1).unwrap());
        assert_eq!(jan.shift(-25), MonthCursor::new(2022, 12).unwrap());
        assert!(MonthCursor::new(2025, 13).is_none());
    }

    #[test]
    fn grid_is_padded_and_marks_selection() {
        let cursor = MonthCursor::new(2025, 1).unwrap();
        let selected = NaiveDate::from_ymd_opt(2025, 1, 15);
        let elsewhere = NaiveDate::from_ymd_opt(2025, 2, 3);
        let grid = month_grid(cursor, selected, elsewhere);

        assert_eq!(grid.len(), 3 + 31);
        assert!(grid[..3].iter().all(|c| *c == DayCell::Blank));
        assert_eq!(
            grid[3],
            DayCell::Day {
                day: 1,
                selected: false,
                today: false
            }
        );
        assert_eq!(
            grid[3 + 14],
            DayCell::Day {
                day: 15,
                selected: true,
                today: false
            }
        );
        assert!(!grid
            .iter()
            .any(|c| matches!(c, DayCell::Day { today: true, .. })));
    }

    #[test]
    fn iso_parsing_accepts_unpadded_dates() {
        assert_eq!(parse_iso("2025-3-7"), NaiveDate::from_ymd_opt(2025, 3, 7));
        assert_eq!(parse_iso("2025-03-07"), NaiveDate::from_ymd_opt(2025, 3, 7));
        assert_eq!(parse_iso("03/07/2025"), None);
        assert_eq!(parse_iso("2025-02-30"), None);
        assert_eq!(format_iso(2025, 3, 7), "2025-03-07");
    }

    #[test]
    fn date_string_rejects_out_of_range_days() {
        let feb = MonthCursor::new(2023, 2).unwrap();
        assert_eq!(feb.date_string(28).as_deref(), Some("2023-02-28"));
        assert_eq!(feb.date_string(29), None);
        assert_eq!(feb.date_string(0), None);
    }
}
