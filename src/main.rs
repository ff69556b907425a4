/// Command line front-end for the habit grid store
///
/// Sets up logging, resolves configuration, and runs one store operation per
/// invocation. `habit-grid widget` instead serves the widget extension over
/// JSON-RPC on stdin/stdout.
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use tracing::{debug, info};

use habit_grid::config::default_database_path;
use habit_grid::deeplink::handle_url;
use habit_grid::theme::{day_color, Appearance};
use habit_grid::transfer::{export_csv, import_csv};
use habit_grid::{
    AppError, ColorTheme, Config, DeepLinkAction, Habit, HabitId, HabitStore, HabitType,
    SqliteStorage, TracingSignal, WidgetExtension, WidgetHost,
};

/// Command line arguments for habit-grid
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses HABIT_GRID_DATABASE or a default location in the user's home directory
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Maximum number of habits
    #[arg(long, global = true)]
    max_habits: Option<usize>,

    /// Deep link URL scheme
    #[arg(long, global = true)]
    scheme: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a habit
    Add {
        name: String,
        #[arg(long, default_value = "")]
        emoji: String,
        #[arg(long, default_value = "Green")]
        theme: ColorTheme,
        #[arg(long = "type", default_value = "Checkbox")]
        habit_type: HabitType,
        /// Daily maximum (count habits)
        #[arg(long)]
        max: Option<u32>,
    },
    /// List habits with today's progress
    List,
    /// Edit a habit's name, emoji, theme or daily maximum
    Edit {
        #[arg(value_parser = parse_habit_id)]
        id: HabitId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        emoji: Option<String>,
        #[arg(long)]
        theme: Option<ColorTheme>,
        #[arg(long)]
        max: Option<u32>,
    },
    /// Delete a habit and all of its logs
    Remove {
        #[arg(value_parser = parse_habit_id)]
        id: HabitId,
    },
    /// Put habits in the given order
    Reorder {
        #[arg(value_parser = parse_habit_id, required = true)]
        ids: Vec<HabitId>,
    },
    /// Check a habit in
    CheckIn {
        #[arg(value_parser = parse_habit_id)]
        id: HabitId,
        /// Day to check in (yyyy-mm-dd), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show streak statistics
    Stats {
        #[arg(value_parser = parse_habit_id)]
        id: HabitId,
    },
    /// Print the last days of a habit's heatmap
    Heatmap {
        #[arg(value_parser = parse_habit_id)]
        id: HabitId,
        #[arg(long, default_value_t = 28)]
        days: u32,
        /// Use dark-mode colors
        #[arg(long)]
        dark: bool,
    },
    /// Export all logs as CSV
    Export {
        /// Output file, stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Import habits and logs from CSV
    Import { file: PathBuf },
    /// Handle a deep link
    OpenUrl { url: String },
    /// Serve the widget extension over stdin/stdout
    Widget,
}

fn parse_habit_id(raw: &str) -> Result<HabitId, String> {
    HabitId::from_string(raw).map_err(|_| format!("Invalid habit ID format: {}", raw))
}

fn resolve_config(args: &Args) -> Result<Config, AppError> {
    let mut config = Config::default().apply_env();

    match &args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            config.database_path = path.clone();
        }
        None if std::env::var_os("HABIT_GRID_DATABASE").is_none() => {
            config.database_path = default_database_path()?;
        }
        None => {}
    }

    if let Some(max) = args.max_habits {
        config.max_habits = max;
    }
    if let Some(scheme) = &args.scheme {
        config.url_scheme = scheme.clone();
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Set up logging based on command line flags
    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("habit_grid={}", log_level))
        .with_writer(std::io::stderr) // Send logs to stderr, not stdout
        .init();

    let config = resolve_config(&args)?;
    info!("Using database at: {}", config.database_path.display());

    let storage = SqliteStorage::new(&config.database_path)?;

    if let Command::Widget = args.command {
        let extension = WidgetExtension::new(storage, TracingSignal, config);
        WidgetHost::new(extension).run().await?;
        info!("Widget host shutdown complete");
        return Ok(());
    }

    let mut store = HabitStore::open(storage, TracingSignal, config)?;
    store.subscribe(|event| debug!("Store event: {:?}", event));

    run_command(&mut store, args.command)?;
    Ok(())
}

fn run_command(store: &mut HabitStore<SqliteStorage>, command: Command) -> Result<(), AppError> {
    let today = Local::now().date_naive();

    match command {
        Command::Add {
            name,
            emoji,
            theme,
            habit_type,
            max,
        } => {
            let max = max.unwrap_or(store.config().default_max_check_in);
            let habit = Habit::new(name, emoji, theme, habit_type, max)?;
            let id = habit.id;
            if !store.add_habit(habit)? {
                return Err(AppError::Rejected(format!(
                    "Habit limit of {} reached",
                    store.config().max_habits
                )));
            }
            println!("{}", id);
        }
        Command::List => {
            for (index, habit) in store.habits().iter().enumerate() {
                println!(
                    "{:>2}. {}  {}  [{} / {}]  today {}/{}  streak {}",
                    index + 1,
                    habit.id,
                    habit.display_name(),
                    habit.habit_type,
                    habit.color_theme,
                    store.get_log_count_for_date(&habit.id, today),
                    habit.max_check_in_count,
                    store.current_streak(&habit.id, today),
                );
            }
        }
        Command::Edit {
            id,
            name,
            emoji,
            theme,
            max,
        } => {
            let mut habit = store
                .habit(&id)
                .cloned()
                .ok_or_else(|| AppError::HabitNotFound(id.to_string()))?;
            habit.edit(name, emoji, theme, max)?;
            store.update_habit(habit)?;
        }
        Command::Remove { id } => {
            if !store.remove_habit(&id)? {
                return Err(AppError::HabitNotFound(id.to_string()));
            }
        }
        Command::Reorder { ids } => {
            store.update_habit_order(&ids)?;
        }
        Command::CheckIn { id, date } => {
            let date = date.unwrap_or(today);
            let outcome = store
                .log_habit(&id, date)?
                .ok_or_else(|| AppError::HabitNotFound(id.to_string()))?;
            println!("{}: {:?} (count {})", date, outcome, outcome.count());
        }
        Command::Stats { id } => {
            let streak = store
                .streak(&id, today)
                .ok_or_else(|| AppError::HabitNotFound(id.to_string()))?;
            println!("{}", serde_json::to_string_pretty(&streak)?);
        }
        Command::Heatmap { id, days, dark } => {
            let habit = store
                .habit(&id)
                .cloned()
                .ok_or_else(|| AppError::HabitNotFound(id.to_string()))?;
            let appearance = Appearance::from_dark_mode(dark);
            for cell in store.heatmap(&id, today, days) {
                println!(
                    "{}  {:>3}  level {}  {}",
                    cell.date,
                    cell.count,
                    cell.level,
                    day_color(&habit, cell.count, appearance).to_hex()
                );
            }
        }
        Command::Export { output } => {
            let rows = match output {
                Some(path) => export_csv(store, BufWriter::new(File::create(path)?))?,
                None => export_csv(store, io::stdout().lock())?,
            };
            info!("Exported {} rows", rows);
        }
        Command::Import { file } => {
            let summary = import_csv(store, BufReader::new(File::open(file)?))?;
            println!(
                "Imported {} habits and {} logs",
                summary.habits, summary.logs
            );
        }
        Command::OpenUrl { url } => match handle_url(store, &url)? {
            Some(DeepLinkAction::CheckedIn(id, outcome)) => {
                println!("Checked in {}: {:?}", id, outcome)
            }
            Some(DeepLinkAction::Focused(id)) => println!("Focus {}", id),
            None => println!("Ignored"),
        },
        Command::Widget => {}
    }

    Ok(())
}
