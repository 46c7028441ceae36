//! First-launch flags and the welcome walkthrough.

use crate::constants::{PREF_FIRST_LAUNCH, PREF_WELCOME_COMPLETED, WELCOME_LAST_STEP};
use crate::db::{preferences, Database};
use crate::errors::AppResult;
use tracing::info;

/// Persisted onboarding state.
#[derive(Clone)]
pub struct OnboardingStore {
    db: Database,
}

impl OnboardingStore {
    pub fn new(db: Database) -> Self {
        OnboardingStore { db }
    }

    /// True until the welcome flow has been completed.
    pub async fn should_show_welcome(&self) -> AppResult<bool> {
        self.db
            .run(|conn| {
                let first_launch = preferences::get_flag(conn, PREF_FIRST_LAUNCH, true)?;
                let completed = preferences::get_flag(conn, PREF_WELCOME_COMPLETED, false)?;
                Ok(first_launch && !completed)
            })
            .await
    }

    pub async fn complete_welcome(&self) -> AppResult<()> {
        self.write_flags(false, true).await?;
        info!("Welcome flow completed");
        Ok(())
    }

    /// Makes the welcome flow show again on the next launch.
    pub async fn reset_welcome(&self) -> AppResult<()> {
        self.write_flags(true, false).await?;
        info!("Welcome flow reset");
        Ok(())
    }

    async fn write_flags(&self, first_launch: bool, completed: bool) -> AppResult<()> {
        self.db
            .run(move |conn| {
                let tx = conn.unchecked_transaction()?;
                preferences::set_flag(&tx, PREF_FIRST_LAUNCH, first_launch)?;
                preferences::set_flag(&tx, PREF_WELCOME_COMPLETED, completed)?;
                tx.commit()?;
                Ok(())
            })
            .await
    }
}

/// Position in the welcome walkthrough, bounded to `0..=WELCOME_LAST_STEP`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WelcomeFlow {
    step: u8,
}

impl WelcomeFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn is_last_step(&self) -> bool {
        self.step == WELCOME_LAST_STEP
    }

    pub fn next_step(&mut self) {
        if self.step < WELCOME_LAST_STEP {
            self.step += 1;
        }
    }

    pub fn previous_step(&mut self) {
        self.step = self.step.saturating_sub(1);
    }

    /// Jumps to `step`; out-of-range values are ignored.
    pub fn set_step(&mut self, step: u8) {
        if step <= WELCOME_LAST_STEP {
            self.step = step;
        }
    }
}
