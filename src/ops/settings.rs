//! Theme and onboarding operations.

use crate::constants::WELCOME_LAST_STEP;
use crate::errors::{AppError, AppResult};
use crate::preferences::{OnboardingStore, ThemeMode, ThemePreferenceStore, WelcomeFlow};
use serde_json::json;

const WELCOME_STEPS: [&str; WELCOME_LAST_STEP as usize + 1] = [
    "Welcome to moodtab: one mood and one note per day.",
    "Record a day with `moodtab set DATE MOOD [NOTE]`.",
    "Browse with `moodtab month` and `moodtab week`.",
    "Everything stays in a local database on this machine.",
];

/// Prints the theme, changing it first when `mode` is given.
pub async fn theme(
    store: &ThemePreferenceStore,
    mode: Option<ThemeMode>,
    json: bool,
) -> AppResult<String> {
    if let Some(mode) = mode {
        store.set_theme_mode(mode).await?;
    }

    let current = store.current();
    if json {
        Ok(json!({ "theme_mode": current }).to_string())
    } else {
        Ok(format!("Theme: {}", current))
    }
}

/// Walks through the welcome steps, or resets/completes the flow.
pub async fn welcome(store: &OnboardingStore, reset: bool, complete: bool) -> AppResult<String> {
    match (reset, complete) {
        (true, true) => Err(AppError::Config(
            "--reset and --complete cannot be combined".to_string(),
        )),
        (true, false) => {
            store.reset_welcome().await?;
            Ok("Welcome flow will show again on next launch.".to_string())
        }
        (false, true) => {
            store.complete_welcome().await?;
            Ok("Welcome flow completed.".to_string())
        }
        (false, false) => Ok(walkthrough()),
    }
}

fn walkthrough() -> String {
    let mut flow = WelcomeFlow::new();
    let mut lines = Vec::with_capacity(WELCOME_STEPS.len());
    loop {
        let step = flow.step();
        lines.push(format!(
            "{}/{} {}",
            step + 1,
            WELCOME_STEPS.len(),
            WELCOME_STEPS[usize::from(step)]
        ));
        if flow.is_last_step() {
            break;
        }
        flow.next_step();
    }
    lines.join("\n")
}
