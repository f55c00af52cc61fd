//! swagcheck CLI library
//!
//! Argument definitions, terminal output and the subcommand handlers behind
//! the `swagcheck` binary.

#![warn(missing_docs)]

mod commands;
mod error;
mod output;
mod runner;

pub use commands::{BrowserArg, Cli, ColorArg, Commands, EnvsArgs, ListArgs, RunArgs};
pub use error::{CliError, CliResult};
pub use output::Output;
pub use runner::{envs, list, run, SIMULATED_OUTPUT_ROOT};
