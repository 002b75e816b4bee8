//! Nested task tracker CLI library.
//!
//! This crate provides the CLI interface for the task tracker.

mod cli;
pub mod commands;
mod config;
mod editor;

pub use cli::{Cli, Commands};
pub use config::Config;
