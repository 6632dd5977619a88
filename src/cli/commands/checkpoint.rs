use cashflow_core::ProfileService;

use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::output::{self, Align};
use crate::cli::registry::CommandEntry;

use super::{parse_date, parse_money, split_action, usage};

const USAGE: &[&str] = &["checkpoint add <date> <balance>", "checkpoint list"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "checkpoint",
        "Record observed account balances",
        USAGE,
        cmd_checkpoint,
    )]
}

fn cmd_checkpoint(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args);
    match action.as_deref() {
        Some("add") => checkpoint_add(context, rest),
        Some("list") | None => checkpoint_list(context),
        Some(_) => Err(usage(&USAGE.join(" | "))),
    }
}

fn checkpoint_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [date, balance] = args else {
        return Err(usage(USAGE[0]));
    };
    let date = parse_date(date)?;
    let balance = parse_money(balance)?;
    context.edit_profile(|profile| {
        ProfileService::record_checkpoint(profile, date, balance);
        Ok(())
    })?;
    output::success(format!("Checkpoint {date} recorded at {balance}."));
    Ok(())
}

fn checkpoint_list(context: &mut ShellContext) -> CommandResult {
    let profile = context.profile()?;
    if profile.checkpoints.is_empty() {
        output::info("No checkpoints recorded.");
        return Ok(());
    }
    output::section("Checkpoints");
    let rows: Vec<Vec<String>> = profile
        .checkpoints
        .iter()
        .map(|checkpoint| vec![checkpoint.date.to_string(), checkpoint.net_position.to_string()])
        .collect();
    output::print_table(&[("Date", Align::Left), ("Balance", Align::Right)], &rows);
    Ok(())
}
