use cashflow_core::ProfileService;
use cashflow_domain::OccurrenceOverride;

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, Align};
use crate::cli::registry::CommandEntry;

use super::{parse_date, parse_money, resolve, short_id, split_action, usage};

const USAGE: &[&str] = &[
    "override set <series> <date> <amount>",
    "override ignore <series> <date>",
    "override restore <series> <date>",
    "override clear <series> <date>",
    "override list",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "override",
        "Edit or cancel single occurrences of a series",
        USAGE,
        cmd_override,
    )]
}

fn cmd_override(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args);
    match action.as_deref() {
        Some("set") => override_set(context, rest),
        Some("ignore") => override_ignore(context, rest),
        Some("restore") => override_restore(context, rest),
        Some("clear") => override_clear(context, rest),
        Some("list") | None => override_list(context),
        Some(_) => Err(usage(&USAGE.join(" | "))),
    }
}

fn series_id(context: &ShellContext, token: &str) -> Result<String, CommandError> {
    Ok(resolve(&context.profile()?.series, token, "series")?.id.clone())
}

fn override_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [series, date, amount] = args else {
        return Err(usage(USAGE[0]));
    };
    let id = series_id(context, series)?;
    let date = parse_date(date)?;
    let amount = parse_money(amount)?;
    context.edit_profile(|profile| {
        ProfileService::set_override_amount(profile, &id, date, amount)
    })?;
    output::success(format!("Occurrence {date} of {} set to {amount}.", short_id(&id)));
    Ok(())
}

fn override_ignore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [series, date] = args else {
        return Err(usage(USAGE[1]));
    };
    let id = series_id(context, series)?;
    let date = parse_date(date)?;
    context.edit_profile(|profile| ProfileService::cancel_occurrence(profile, &id, date))?;
    output::success(format!("Occurrence {date} of {} ignored.", short_id(&id)));
    Ok(())
}

fn override_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [series, date] = args else {
        return Err(usage(USAGE[2]));
    };
    let id = series_id(context, series)?;
    let date = parse_date(date)?;
    if context.edit_profile(|profile| ProfileService::restore_occurrence(profile, &id, date))? {
        output::success(format!("Occurrence {date} of {} restored.", short_id(&id)));
    } else {
        output::info(format!("Occurrence {date} of {} was not ignored.", short_id(&id)));
    }
    Ok(())
}

fn override_clear(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [series, date] = args else {
        return Err(usage(USAGE[3]));
    };
    // Overrides of removed series can still be cleared by their full id.
    let id = series_id(context, series).unwrap_or_else(|_| series.to_string());
    let date = parse_date(date)?;
    if context.edit_profile(|profile| ProfileService::clear_override(profile, &id, date))? {
        output::success(format!("Override on {date} of {} cleared.", short_id(&id)));
    } else {
        output::info(format!("No override on {date} of {}.", short_id(&id)));
    }
    Ok(())
}

fn override_list(context: &mut ShellContext) -> CommandResult {
    let profile = context.profile()?;
    if profile.overrides.is_empty() {
        output::info("No overrides recorded.");
        return Ok(());
    }
    output::section("Occurrence overrides");
    let rows: Vec<Vec<String>> = profile
        .overrides
        .iter()
        .map(|(series_id, date, value)| {
            let description = profile
                .series(series_id)
                .map(|series| series.description.clone())
                .unwrap_or_else(|| "(unknown series)".into());
            let effect = match value {
                OccurrenceOverride::Cancel => "ignored".to_string(),
                OccurrenceOverride::Amount(amount) => amount.to_string(),
            };
            vec![
                short_id(series_id).to_string(),
                description,
                date.to_string(),
                effect,
            ]
        })
        .collect();
    output::print_table(
        &[
            ("Series", Align::Left),
            ("Description", Align::Left),
            ("Date", Align::Left),
            ("Override", Align::Right),
        ],
        &rows,
    );
    Ok(())
}
