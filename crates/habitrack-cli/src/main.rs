use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "habitrack", version, about = "Habitrack CLI")]
pub struct Cli {
    #[command(flatten)]
    globals: Globals,

    #[command(subcommand)]
    command: Commands,
}

/// Per-invocation overrides of the config file.
#[derive(Args, Clone, Debug, Default)]
pub struct Globals {
    /// Backend base URL (overrides api.base_url)
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    /// User id (overrides user.id)
    #[arg(long, global = true)]
    pub user_id: Option<i64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Category listing and slugs
    Category {
        #[command(subcommand)]
        action: commands::category::CategoryAction,
    },
    /// Month grids
    Calendar {
        #[command(subcommand)]
        action: commands::calendar::CalendarAction,
    },
    /// Countdown timer
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() {
    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let globals = cli.globals;
    let result = match cli.command {
        Commands::Habit { action } => commands::habit::run(action, &globals).await,
        Commands::Category { action } => commands::category::run(action, &globals).await,
        Commands::Calendar { action } => commands::calendar::run(action),
        Commands::Timer { action } => commands::timer::run(action, &globals).await,
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
