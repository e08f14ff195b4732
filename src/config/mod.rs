//! Configuration module for the counting game
//!
//! Settings come from environment variables so the game itself takes no
//! arguments. Anything left unset falls back to a default next to the
//! executable.

pub mod settings;

pub use settings::{GameSettings, SettingsError};
