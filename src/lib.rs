//! `colwrap` - reflow code comments and prose to a column width.
//!
//! The [`wrap`] module holds the wrapping engine. [`services`] applies it to
//! buffers and files, and [`app`], [`input`] and [`ui`] build the terminal
//! editor on top.

pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod services;
pub mod ui;
pub mod wrap;
