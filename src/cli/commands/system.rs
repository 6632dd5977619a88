use cashflow_domain::CURRENT_SCHEMA_VERSION;

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("version", "Show build metadata", &["version"], cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            &["help [command]"],
            cmd_help,
        ),
        CommandEntry::new(
            "exit",
            "Save pending changes and leave the shell",
            &["exit"],
            cmd_exit,
        ),
    ]
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Cashflow {}", meta.version));
    output::info(format!("  Schema ver   : v{}", CURRENT_SCHEMA_VERSION));
    output::info(format!(
        "  Build hash   : {} ({})",
        meta.git_hash, meta.git_status
    ));
    output::info(format!("  Built at     : {}", meta.timestamp));
    output::info(format!("  Target       : {}", meta.target));
    output::info(format!("  Profile      : {}", meta.profile));
    output::info(format!("  Rustc        : {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        Some(name) => match context.command(&name.to_lowercase()) {
            Some(entry) => print_command(entry),
            None => context.suggest_command(name),
        },
        None => print_overview(&context.registry),
    }
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

fn print_overview(registry: &CommandRegistry) {
    output::section("Available commands");
    let width = registry.names().map(str::len).max().unwrap_or(0);
    for entry in registry.list() {
        output::line(format!("  {:<width$}  {}", entry.name, entry.description));
    }
    output::hint("Use `help <command>` for details.");
}

fn print_command(entry: &CommandEntry) {
    output::section(format!("Help: {}", entry.name));
    output::line(format!("  {}", entry.description));
    for usage in entry.usage {
        output::line(format!("    {usage}"));
    }
}
