//! The `cashflow_cli` shell: registry-driven commands over one loaded profile.

pub mod commands;
pub mod context;
pub mod output;
pub mod registry;
pub mod shell;

#[cfg(test)]
mod tests;

pub use context::{CliMode, CommandError, CommandResult, ProfileChange, ShellContext};
pub use shell::run_cli;
