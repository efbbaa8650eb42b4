//! Service modules for wrapping operations.
//!
//! These sit between the wrapping engine and the front ends (CLI and TUI)
//! so each can be tested without a terminal.

pub mod batch;
pub mod clipboard;
pub mod editor;
