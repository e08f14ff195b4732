//! Game orchestration layer
//!
//! This module owns the counting state machine and the controller that
//! turns its transitions into images, sounds and animation.

pub mod controller;
pub mod state;

pub use controller::{AppError, GameController};
