//! High-level operations behind each subcommand.
//!
//! Each operation takes the services it needs, performs the work and returns the
//! text to print on stdout.

pub mod calendar;
pub mod settings;

pub use calendar::{delete_entry, save_entry, show_month, show_week};
pub use settings::{theme, welcome};
