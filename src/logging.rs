//! Tracing subscriber setup for the binary.

use crate::constants::{
    DEFAULT_LOG_LEVEL, ENV_VAR_MOODTAB_LOG, ENV_VAR_MOODTAB_LOG_FORMAT, LOG_FORMAT_JSON,
    LOG_FORMAT_TEXT,
};
use crate::errors::{AppError, AppResult};
use std::io::IsTerminal;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Resolves the log format from the CLI flag, then `MOODTAB_LOG_FORMAT`.
pub fn resolve_log_format(cli_format: Option<&str>) -> AppResult<String> {
    let format = match cli_format {
        Some(format) => format.to_string(),
        None => std::env::var(ENV_VAR_MOODTAB_LOG_FORMAT)
            .unwrap_or_else(|_| LOG_FORMAT_TEXT.to_string()),
    };

    match format.as_str() {
        LOG_FORMAT_TEXT | LOG_FORMAT_JSON => Ok(format),
        other => Err(AppError::Config(format!(
            "Unknown log format '{}'. Expected '{}' or '{}'",
            other, LOG_FORMAT_TEXT, LOG_FORMAT_JSON
        ))),
    }
}

/// Installs the global subscriber. Logs go to stderr so command output on
/// stdout stays clean.
///
/// `verbose` raises the default level to `debug` when `MOODTAB_LOG` is unset.
pub fn init_tracing(format: &str, verbose: bool) -> AppResult<()> {
    let default_level = if verbose { "debug" } else { DEFAULT_LOG_LEVEL };
    let env_filter = EnvFilter::try_from_env(ENV_VAR_MOODTAB_LOG)
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let init_result = if format == LOG_FORMAT_JSON {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_ansi(std::io::stderr().is_terminal()),
            )
            .try_init()
    };

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
