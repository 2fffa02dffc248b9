//! hubmove - move, revert and export content between content hubs
//!
//! This crate provides the core functionality for the `hubmove` CLI tool.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`action_log`] - Append-only log of what a command changed
//! - [`migrate`] - Moving items (copy, then archive) and reverting moves
//! - [`export`] - Exporting entities to JSON files, diffed against earlier exports
//! - [`api`] - Content API trait and HTTP client
//! - [`model`] - Data types (`ContentItem`, `Event`, `Edition`, `Slot`)
//! - [`config`] - Credentials, endpoints and configuration file
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action_log;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod migrate;
pub mod model;

pub use error::{Error, Result};

/// Global quiet flag for `--quiet`.
///
/// When set, commands print no human-readable summaries. Errors and
/// explicitly requested JSON are still written.
pub static QUIET: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Check if quiet mode is active.
#[inline]
pub fn is_quiet() -> bool {
    QUIET.load(std::sync::atomic::Ordering::Relaxed)
}
