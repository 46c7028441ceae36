/*!
# moodtab - A Calendar Mood Journal

moodtab records one mood and one short note per calendar day and shows them on a
month grid. Entries live in a local SQLite database.

## Usage

```
moodtab [OPTIONS] [COMMAND]

Commands:
  month    Show a month grid (default: current month)
  week     Show the Monday-to-Sunday week containing a date (default: today)
  set      Record the mood (and optional note) for a date, replacing any existing entry
  delete   Delete the entry for a date
  theme    Show or change the theme
  welcome  Show, reset, or complete the welcome flow

Options:
  -v, --verbose                  Print verbose output
      --log-format <LOG_FORMAT>  Log format on stderr (text or json)
      --json                     Print the resulting state as JSON
  -h, --help                     Print help
  -V, --version                  Print version
```

## Configuration

- `MOODTAB_DIR`: directory holding the database (defaults to `~/.local/share/moodtab`)
- `MOODTAB_DB_POOL_SIZE`: pooled SQLite connections, 1 to 16 (defaults to 4)
- `MOODTAB_LOG`: tracing filter directive (defaults to `info`)
- `MOODTAB_LOG_FORMAT`: `text` or `json`
*/

use chrono::Local;
use moodtab::cli::{CliArgs, Command};
use moodtab::config::Config;
use moodtab::constants::{TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME};
use moodtab::db::Database;
use moodtab::domain::{DailyEntry, YearMonth};
use moodtab::errors::AppResult;
use moodtab::logging;
use moodtab::ops;
use moodtab::preferences::{OnboardingStore, ThemePreferenceStore};
use moodtab::repository::{MoodRepository, SqliteMoodRepository};
use moodtab::store::EntryStore;
use std::sync::Arc;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

#[tokio::main]
async fn run() -> AppResult<()> {
    let args = CliArgs::parse_args();

    let log_format = logging::resolve_log_format(args.log_format.as_deref())?;
    logging::init_tracing(&log_format, args.verbose)?;

    let correlation_id = Uuid::new_v4();
    let span = info_span!(
        TRACING_ROOT_SPAN_NAME,
        service_name = TRACING_SERVICE_NAME,
        correlation_id = %correlation_id
    );

    dispatch(args).instrument(span).await
}

async fn dispatch(args: CliArgs) -> AppResult<()> {
    info!("Starting moodtab");
    debug!("CLI arguments: {:?}", args);

    let config = Config::load()?;
    config.validate()?;
    config.ensure_data_dir()?;
    debug!("Configuration: {:?}", config);

    let db = Database::open(&config.db_path(), config.pool_size)?;
    db.initialize_schema()?;

    let command = args.command();
    let onboarding = OnboardingStore::new(db.clone());
    if !matches!(command, Command::Welcome { .. }) && onboarding.should_show_welcome().await? {
        eprintln!("First time here? Run `moodtab welcome` for a short tour.");
    }

    let repository: Arc<dyn MoodRepository> =
        Arc::new(SqliteMoodRepository::new(EntryStore::new(db.clone())));
    let today = Local::now().date_naive();

    let output = match command {
        Command::Month { month } => {
            let month = month.unwrap_or_else(|| YearMonth::containing(today));
            ops::show_month(repository, month, today, args.json).await?
        }
        Command::Week { date } => {
            ops::show_week(repository, date.unwrap_or(today), args.json).await?
        }
        Command::Set { date, mood, note } => {
            let entry = DailyEntry::new(date, mood, note.unwrap_or_default())?;
            ops::save_entry(repository, entry, today, args.json).await?
        }
        Command::Delete { date } => ops::delete_entry(repository, date, today, args.json).await?,
        Command::Theme { mode } => {
            let themes = ThemePreferenceStore::open(db).await?;
            ops::theme(&themes, mode, args.json).await?
        }
        Command::Welcome { reset, complete } => {
            ops::welcome(&onboarding, reset, complete).await?
        }
    };

    println!("{}", output);
    info!("Done");
    Ok(())
}
