use chrono::Local;
use clap::Subcommand;
use habitrack_core::calendar::{days_in_month, parse_iso};
use habitrack_core::{DatePicker, DayCell};

use super::{print_json, CmdResult};

const WEEKDAY_HEADER: &str = "Su Mo Tu We Th Fr Sa";

#[derive(Subcommand)]
pub enum CalendarAction {
    /// Print a month grid
    Show {
        /// Any date inside the month to show (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Months to move from that date (negative goes back)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset: i32,
        /// Emit the grid cells as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the number of days in a month
    Days { year: i32, month: u32 },
}

pub fn run(action: CalendarAction) -> CmdResult {
    let today = Local::now().date_naive();
    match action {
        CalendarAction::Show { date, offset, json } => {
            let value = match date.as_deref() {
                Some(raw) => {
                    let parsed = parse_iso(raw).ok_or_else(|| format!("invalid date: {raw}"))?;
                    parsed.format("%Y-%m-%d").to_string()
                }
                None => String::new(),
            };
            let mut picker = DatePicker::new(value, today);
            picker.navigate(offset);
            let grid = picker.grid(Some(today));
            if json {
                print_json(&grid)?;
            } else {
                println!("{}", render(&picker.title(), &grid));
            }
        }
        CalendarAction::Days { year, month } => {
            if !(1..=12).contains(&month) {
                return Err(format!("month must be 1-12, got {month}").into());
            }
            println!("{}", days_in_month(year, month));
        }
    }
    Ok(())
}

fn render(title: &str, grid: &[DayCell]) -> String {
    let mut out = format!("{title:^20}\n{WEEKDAY_HEADER}\n");
    for week in grid.chunks(7) {
        let line: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                DayCell::Blank => "  ".to_string(),
                DayCell::Day { day, .. } => format!("{day:>2}"),
            })
            .collect();
        out.push_str(line.join(" ").trim_end());
        out.push('\n');
    }
    out
}

