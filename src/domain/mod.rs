//! Domain types shared by layout and platform code
//!
//! This module contains pure geometry that is independent of Win32 and
//! of the renderer.

pub mod core;
