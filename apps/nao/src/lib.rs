//! # nao
//!
//! Library half of the `nao` admin binary, split out so the command layer
//! can be driven from integration tests.
//!
//! - `cli`    → argument parsing and command implementations
//! - `config` → database settings from file, environment and flags

pub mod cli;
pub mod config;

pub use cli::{Cli, CliError, Commands, execute};
pub use config::Config;
