//! Persisted user preferences: the theme mode and the onboarding flags.
//!
//! Both stores are ordinary values built from a [`Database`] handle and passed to
//! whoever needs them; nothing here is process-global.

pub mod onboarding;

pub use onboarding::{OnboardingStore, WelcomeFlow};

use crate::constants::PREF_THEME_MODE;
use crate::db::{preferences, Database};
use crate::errors::{AppError, AppResult};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{info, warn};

/// Colour scheme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThemeMode {
    Light,
    Dark,
    /// Follow the platform setting.
    #[default]
    System,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "LIGHT",
            ThemeMode::Dark => "DARK",
            ThemeMode::System => "SYSTEM",
        }
    }

    /// Parses a persisted name (`LIGHT`, `DARK`, `SYSTEM`).
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "LIGHT" => Some(ThemeMode::Light),
            "DARK" => Some(ThemeMode::Dark),
            "SYSTEM" => Some(ThemeMode::System),
            _ => None,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_lowercase())
    }
}

impl FromStr for ThemeMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThemeMode::from_name(&s.trim().to_uppercase()).ok_or_else(|| {
            AppError::Config(format!(
                "Unknown theme '{}'. Expected one of: light, dark, system",
                s
            ))
        })
    }
}

/// Live, persisted theme mode.
///
/// The stored value is read once in [`ThemePreferenceStore::open`]; after that
/// the in-memory value is authoritative and every write goes to the database
/// before it is published to observers.
pub struct ThemePreferenceStore {
    db: Database,
    mode: watch::Sender<ThemeMode>,
}

impl ThemePreferenceStore {
    pub async fn open(db: Database) -> AppResult<Self> {
        let stored = db
            .run(|conn| preferences::get_preference(conn, PREF_THEME_MODE))
            .await?;

        let mode = match stored.as_deref() {
            None => ThemeMode::default(),
            Some(name) => ThemeMode::from_name(name).unwrap_or_else(|| {
                warn!("Ignoring unknown stored theme '{}'", name);
                ThemeMode::default()
            }),
        };

        let (mode, _) = watch::channel(mode);
        Ok(ThemePreferenceStore { db, mode })
    }

    pub fn current(&self) -> ThemeMode {
        *self.mode.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemeMode> {
        self.mode.subscribe()
    }

    /// Stream yielding the current mode and then each change.
    pub fn theme_mode(&self) -> WatchStream<ThemeMode> {
        WatchStream::new(self.mode.subscribe())
    }

    pub async fn set_theme_mode(&self, mode: ThemeMode) -> AppResult<()> {
        self.db
            .run(move |conn| preferences::set_preference(conn, PREF_THEME_MODE, mode.as_str()))
            .await?;
        self.mode.send_replace(mode);
        info!("Theme set to {}", mode);
        Ok(())
    }
}
