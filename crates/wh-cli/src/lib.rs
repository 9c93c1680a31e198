//! Work hours clock CLI library.
//!
//! This crate provides the CLI interface for the work hours clock.

mod cli;
pub mod commands;
mod config;
pub mod ticker;

pub use cli::{Cli, Commands, EditArgs};
pub use config::{Backend, Config};
