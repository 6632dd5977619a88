use cashflow_core::ProfileService;

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, Align};
use crate::cli::registry::CommandEntry;

use super::{oneoff::parse_one_off, series::parse_series, short_id, split_action, usage};

const USAGE: &[&str] = &[
    "budget new <name>",
    "budget use <name>",
    "budget none",
    "budget list",
    "budget remove <name>",
    "budget add-series <budget> <category> <description> <amount> <days> <months> [first|-] [last|-] [tags]",
    "budget add-oneoff <budget> <category> <description> <amount> <date> [tags]",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "budget",
        "Maintain budget plans and pick the one compared with the ledger",
        USAGE,
        cmd_budget,
    )]
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args);
    match action.as_deref() {
        Some("new") => budget_new(context, rest),
        Some("use") => budget_use(context, rest),
        Some("none") => budget_none(context),
        Some("list") | None => budget_list(context),
        Some("remove") | Some("rm") => budget_remove(context, rest),
        Some("add-series") => budget_add_series(context, rest),
        Some("add-oneoff") => budget_add_one_off(context, rest),
        Some(_) => Err(usage(&USAGE.join(" | "))),
    }
}

fn budget_new(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name] = args else {
        return Err(usage(USAGE[0]));
    };
    context.edit_profile(|profile| ProfileService::create_budget(profile, name))?;
    output::success(format!("Budget `{name}` created."));
    Ok(())
}

fn budget_use(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name] = args else {
        return Err(usage(USAGE[1]));
    };
    if context.profile()?.budget(name).is_none() {
        return Err(CommandError::InvalidArguments(format!(
            "budget `{name}` does not exist; see `budget list`"
        )));
    }
    context.config.active_budget = Some(name.to_string());
    context.persist_config()?;
    output::success(format!("Budget `{name}` is now compared with the ledger."));
    Ok(())
}

fn budget_none(context: &mut ShellContext) -> CommandResult {
    context.config.active_budget = None;
    context.persist_config()?;
    output::success("Budget comparison disabled.");
    Ok(())
}

fn budget_list(context: &mut ShellContext) -> CommandResult {
    let active = context.active_budget();
    let profile = context.profile()?;
    if profile.budgets.is_empty() {
        output::info("No budgets defined.");
        return Ok(());
    }
    output::section("Budgets");
    let rows: Vec<Vec<String>> = profile
        .budgets
        .iter()
        .map(|(name, plan)| {
            let marker = if active.as_deref() == Some(name.as_str()) {
                "*"
            } else {
                ""
            };
            vec![
                marker.to_string(),
                name.clone(),
                plan.series.len().to_string(),
                plan.one_offs.len().to_string(),
            ]
        })
        .collect();
    output::print_table(
        &[
            ("", Align::Left),
            ("Budget", Align::Left),
            ("Series", Align::Right),
            ("One-offs", Align::Right),
        ],
        &rows,
    );
    Ok(())
}

fn budget_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name] = args else {
        return Err(usage(USAGE[4]));
    };
    context.edit_profile(|profile| ProfileService::remove_budget(profile, name))?;
    if context.config.active_budget.as_deref() == Some(*name) {
        context.config.active_budget = None;
        context.persist_config()?;
    }
    output::success(format!("Budget `{name}` removed."));
    Ok(())
}

fn budget_add_series(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((budget, rest)) = args.split_first() else {
        return Err(usage(USAGE[5]));
    };
    let series = parse_series(rest, USAGE[5])?;
    let id = context
        .edit_profile(|profile| ProfileService::add_budget_series(profile, budget, series))?;
    output::success(format!("Series {} added to budget `{budget}`.", short_id(&id)));
    Ok(())
}

fn budget_add_one_off(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((budget, rest)) = args.split_first() else {
        return Err(usage(USAGE[6]));
    };
    let one_off = parse_one_off(rest, USAGE[6])?;
    let id = context
        .edit_profile(|profile| ProfileService::add_budget_one_off(profile, budget, one_off))?;
    output::success(format!("One-off {} added to budget `{budget}`.", short_id(&id)));
    Ok(())
}
