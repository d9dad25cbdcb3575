use clap::{Args, Subcommand, ValueEnum};
use habitrack_core::habit::UNCATEGORIZED_COLOR;
use habitrack_core::{CounterWidget, HabitForm, HabitKind, HabitStore, HttpHabitService, Progress};

use super::{connect, print_event, print_json, CmdResult};
use crate::Globals;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KindArg {
    Plain,
    Counter,
    Timed,
}

impl From<KindArg> for HabitKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Plain => HabitKind::Plain,
            KindArg::Counter => HabitKind::Counter,
            KindArg::Timed => HabitKind::Timed,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum StateFilter {
    #[default]
    All,
    Active,
    Completed,
    Skipped,
}

/// Form fields shared by create and edit. Omitted fields keep the
/// form's current value.
#[derive(Args, Debug, Default)]
pub struct FormArgs {
    /// Habit name
    #[arg(long)]
    name: Option<String>,
    /// Description
    #[arg(long)]
    description: Option<String>,
    /// Progress mechanism
    #[arg(long, value_enum)]
    kind: Option<KindArg>,
    /// Category slug (see `category list`)
    #[arg(long)]
    category: Option<String>,
    /// Register a new category with this name and use it
    #[arg(long, conflicts_with = "category")]
    new_category: Option<String>,
    /// Color for --new-category (defaults to gray)
    #[arg(long)]
    color: Option<String>,
    /// Start date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    start: Option<String>,
    /// End date (YYYY-MM-DD)
    #[arg(long)]
    end: Option<String>,
    /// Reminder time, e.g. 07:30
    #[arg(long)]
    reminder: Option<String>,
    /// Target repetitions (counter habits)
    #[arg(long)]
    target: Option<String>,
    /// Duration in minutes (timed habits)
    #[arg(long)]
    minutes: Option<String>,
}

#[derive(Subcommand)]
pub enum HabitAction {
    /// List habits by lifecycle state
    List {
        #[arg(long, value_enum, default_value = "all")]
        state: StateFilter,
    },
    /// Show one habit as JSON
    Show { id: i64 },
    /// Create a habit
    Create {
        #[command(flatten)]
        form: FormArgs,
    },
    /// Edit a habit; progress and lifecycle state are kept
    Edit {
        id: i64,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Mark a habit completed
    Complete { id: i64 },
    /// Mark a habit skipped
    Skip { id: i64 },
    /// Delete a habit
    Remove { id: i64 },
    /// Record counter or timer progress
    Progress {
        id: i64,
        /// Set the counter to this value (digits only)
        #[arg(long, conflicts_with_all = ["increment", "decrement", "seconds"])]
        set: Option<String>,
        /// Add one repetition
        #[arg(long, conflicts_with_all = ["decrement", "seconds"])]
        increment: bool,
        /// Remove one repetition
        #[arg(long, conflicts_with = "seconds")]
        decrement: bool,
        /// Seconds spent on a timed habit
        #[arg(long)]
        seconds: Option<u64>,
    },
}

pub async fn run(action: HabitAction, globals: &Globals) -> CmdResult {
    let store = connect(globals).await?;
    match action {
        HabitAction::List { state } => {
            let partitions = store.partitions().await;
            match state {
                StateFilter::All => print_json(&partitions)?,
                StateFilter::Active => print_json(&partitions.active)?,
                StateFilter::Completed => print_json(&partitions.completed)?,
                StateFilter::Skipped => print_json(&partitions.skipped)?,
            }
        }
        HabitAction::Show { id } => match store.find(id).await {
            Some(habit) => print_json(&habit)?,
            None => return Err(format!("habit {id} not found").into()),
        },
        HabitAction::Create { form } => {
            let form = build_form(&store, HabitForm::default(), form).await;
            print_event(store.upsert(&form, None).await?)?;
        }
        HabitAction::Edit { id, form } => {
            let habit = store
                .find(id)
                .await
                .ok_or_else(|| format!("habit {id} not found"))?;
            let current = HabitForm::from_habit(&habit, &store.categories().await);
            let form = build_form(&store, current, form).await;
            print_event(store.upsert(&form, Some(id)).await?)?;
        }
        HabitAction::Complete { id } => print_event(store.complete(id).await?)?,
        HabitAction::Skip { id } => print_event(store.skip(id).await?)?,
        HabitAction::Remove { id } => print_event(store.remove(id).await?)?,
        HabitAction::Progress {
            id,
            set,
            increment,
            decrement,
            seconds,
        } => {
            let habit = store
                .find(id)
                .await
                .ok_or_else(|| format!("habit {id} not found"))?;
            let progress = match seconds {
                Some(secs) => Progress::Seconds(secs),
                None => {
                    let mut counter = CounterWidget::new(habit.target_count);
                    counter.bind_with_progress(
                        habit.id,
                        habit.target_count,
                        habit.achieved_count.unwrap_or(0),
                    );
                    let changed = if let Some(raw) = set {
                        counter.set_from_text(&raw)
                    } else if increment {
                        counter.increment()
                    } else if decrement {
                        counter.decrement()
                    } else {
                        return Err("one of --set, --increment, --decrement, --seconds is required".into());
                    };
                    if let Some(event) = changed {
                        eprintln!("{}", serde_json::to_string(&event)?);
                    }
                    Progress::Count(counter.achieved())
                }
            };
            print_event(store.record_progress(id, progress).await?)?;
        }
    }
    Ok(())
}

async fn build_form(
    store: &HabitStore<HttpHabitService>,
    mut form: HabitForm,
    args: FormArgs,
) -> HabitForm {
    if let Some(name) = args.name {
        form.name = name;
    }
    if let Some(description) = args.description {
        form.description = description;
    }
    if let Some(kind) = args.kind {
        form.kind = kind.into();
    }
    if let Some(name) = args.new_category {
        let color = args
            .color
            .unwrap_or_else(|| UNCATEGORIZED_COLOR.to_string());
        form.category = Some(store.register_category(&name, &color).await);
    } else if let Some(slug) = args.category {
        form.category = Some(slug);
    }
    if let Some(start) = args.start {
        form.start_date = start;
    }
    if let Some(end) = args.end {
        form.end_date = Some(end);
    }
    if let Some(reminder) = args.reminder {
        form.reminder = Some(reminder);
    }
    if let Some(target) = args.target {
        form.target_count = Some(target);
    }
    if let Some(minutes) = args.minutes {
        form.duration_minutes = Some(minutes);
    }
    form
}
