//! Loot-ledger CLI library.
//!
//! This crate provides the CLI interface over `ll-core` and `ll-db`.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
