use std::io::Write;

use clap::Subcommand;
use habitrack_core::{HabitKind, IntervalTickSource, Progress, TimerWidget};

use super::{connect, print_event, CmdResult};
use crate::Globals;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Count down in the foreground, printing events as JSON lines
    Run {
        /// Countdown length in seconds
        #[arg(long, conflicts_with = "minutes")]
        seconds: Option<u64>,
        /// Countdown length in minutes
        #[arg(long)]
        minutes: Option<u64>,
        /// Timed habit to count down; its elapsed time is recorded on expiry
        #[arg(long)]
        habit: Option<i64>,
        /// Do not draw the clock on stderr
        #[arg(long)]
        quiet: bool,
    },
}

pub async fn run(action: TimerAction, globals: &Globals) -> CmdResult {
    match action {
        TimerAction::Run {
            seconds,
            minutes,
            habit,
            quiet,
        } => {
            let explicit = seconds.or(minutes.map(|m| m.saturating_mul(60)));

            let store = match habit {
                Some(_) => Some(connect(globals).await?),
                None => None,
            };
            let bound = match (&store, habit) {
                (Some(store), Some(id)) => {
                    let habit = store
                        .find(id)
                        .await
                        .ok_or_else(|| format!("habit {id} not found"))?;
                    if habit.kind != HabitKind::Timed {
                        return Err(format!("habit {id} is {}, not timed", habit.kind).into());
                    }
                    Some(habit)
                }
                _ => None,
            };

            let (source, mut ticks) = IntervalTickSource::every_second();
            let mut timer = match (&bound, explicit) {
                (_, Some(secs)) => TimerWidget::new(secs, source),
                (Some(habit), None) => TimerWidget::for_habit(habit, source),
                (None, None) => return Err("one of --seconds, --minutes, --habit is required".into()),
            };

            let Some(started) = timer.start() else {
                return Err("timer has no duration".into());
            };
            println!("{}", serde_json::to_string(&started)?);

            while let Some(tick) = ticks.recv().await {
                let expired = timer.on_tick(tick);
                if !quiet {
                    let mut err = std::io::stderr();
                    write!(err, "\r{}", timer.display())?;
                    err.flush()?;
                }
                if let Some(event) = expired {
                    if !quiet {
                        eprintln!();
                    }
                    println!("{}", serde_json::to_string(&event)?);
                    break;
                }
            }

            if let (Some(store), Some(habit)) = (&store, &bound) {
                let elapsed = timer.elapsed();
                print_event(store.record_progress(habit.id, Progress::Seconds(elapsed)).await?)?;
            }
        }
    }
    Ok(())
}
