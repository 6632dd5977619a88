use cashflow_core::ProfileService;
use cashflow_domain::{Displayable, RecurringSeries};

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, Align};
use crate::cli::registry::CommandEntry;

use super::{
    parse_cadence, parse_money, parse_optional_date, resolve, short_id, split_action,
    tags_argument, usage,
};

const USAGE: &[&str] = &[
    "series add <category> <description> <amount> <days> <months> [first|-] [last|-] [tags]",
    "series list",
    "series remove <#|id>",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "series",
        "Manage recurring series (negative amount = outflow)",
        USAGE,
        cmd_series,
    )]
}

fn cmd_series(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args);
    match action.as_deref() {
        Some("add") => series_add(context, rest),
        Some("list") | None => series_list(context),
        Some("remove") | Some("rm") => series_remove(context, rest),
        Some(_) => Err(usage(&USAGE.join(" | "))),
    }
}

/// Parses the shared `<category> <description> <amount> <days> <months> [first] [last] [tags]` form.
pub(crate) fn parse_series(
    args: &[&str],
    usage_text: &str,
) -> Result<RecurringSeries, CommandError> {
    if args.len() < 5 {
        return Err(usage(usage_text));
    }
    let amount = parse_money(args[2])?;
    let cadence = parse_cadence(args[3], args[4])?;
    let mut series = RecurringSeries::new(args[0], args[1], amount, cadence)
        .with_tags(tags_argument(args.get(7)));
    if let Some(first) = parse_optional_date(args.get(5))? {
        series = series.starting(first);
    }
    if let Some(last) = parse_optional_date(args.get(6))? {
        series = series.ending(last);
    }
    Ok(series)
}

fn series_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let series = parse_series(args, USAGE[0])?;
    let label = series.display_label();
    let id = context.edit_profile(|profile| ProfileService::add_series(profile, series))?;
    output::success(format!("Series {} added: {label}", short_id(&id)));
    Ok(())
}

fn series_list(context: &mut ShellContext) -> CommandResult {
    let profile = context.profile()?;
    if profile.series.is_empty() {
        output::info("No recurring series yet.");
        return Ok(());
    }
    output::section("Recurring series");
    let rows: Vec<Vec<String>> = profile
        .series
        .iter()
        .enumerate()
        .map(|(index, series)| {
            vec![
                (index + 1).to_string(),
                short_id(&series.id).to_string(),
                series.category.clone(),
                series.description.clone(),
                series.amount.to_string(),
                series.cadence().label(),
                series.first.map(|date| date.to_string()).unwrap_or_else(|| "-".into()),
                series.last.map(|date| date.to_string()).unwrap_or_else(|| "-".into()),
            ]
        })
        .collect();
    output::print_table(
        &[
            ("#", Align::Right),
            ("Id", Align::Left),
            ("Category", Align::Left),
            ("Description", Align::Left),
            ("Amount", Align::Right),
            ("Cadence", Align::Left),
            ("First", Align::Left),
            ("Last", Align::Left),
        ],
        &rows,
    );
    Ok(())
}

fn series_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(token) = args.first() else {
        return Err(usage(USAGE[2]));
    };
    let id = resolve(&context.profile()?.series, token, "series")?.id.clone();
    let removed = context.edit_profile(|profile| ProfileService::remove_series(profile, &id))?;
    output::success(format!("Series `{}` removed.", removed.description));
    Ok(())
}
