//! Platform-specific Windows implementations
//!
//! This module encapsulates the Win32 helpers used by the game window.

#[cfg(windows)]
pub mod windows;
