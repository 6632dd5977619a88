use cashflow_core::ProfileService;
use cashflow_domain::{Displayable, OneOff};

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, Align};
use crate::cli::registry::CommandEntry;

use super::{parse_date, parse_money, resolve, short_id, split_action, tags_argument, usage};

const USAGE: &[&str] = &[
    "oneoff add <category> <description> <amount> <date> [tags]",
    "oneoff list",
    "oneoff remove <#|id>",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "oneoff",
        "Manage one-off movements (positive amount = spent)",
        USAGE,
        cmd_oneoff,
    )]
}

fn cmd_oneoff(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args);
    match action.as_deref() {
        Some("add") => oneoff_add(context, rest),
        Some("list") | None => oneoff_list(context),
        Some("remove") | Some("rm") => oneoff_remove(context, rest),
        Some(_) => Err(usage(&USAGE.join(" | "))),
    }
}

/// Parses the shared `<category> <description> <amount> <date> [tags]` form.
pub(crate) fn parse_one_off(args: &[&str], usage_text: &str) -> Result<OneOff, CommandError> {
    if args.len() < 4 {
        return Err(usage(usage_text));
    }
    let amount = parse_money(args[2])?;
    let date = parse_date(args[3])?;
    Ok(OneOff::new(args[0], args[1], amount, date).with_tags(tags_argument(args.get(4))))
}

fn oneoff_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let one_off = parse_one_off(args, USAGE[0])?;
    let label = one_off.display_label();
    let id = context.edit_profile(|profile| ProfileService::add_one_off(profile, one_off))?;
    output::success(format!("One-off {} added: {label}", short_id(&id)));
    Ok(())
}

fn oneoff_list(context: &mut ShellContext) -> CommandResult {
    let profile = context.profile()?;
    if profile.one_offs.is_empty() {
        output::info("No one-off movements yet.");
        return Ok(());
    }
    output::section("One-off movements");
    let rows: Vec<Vec<String>> = profile
        .one_offs
        .iter()
        .enumerate()
        .map(|(index, one_off)| {
            vec![
                (index + 1).to_string(),
                short_id(&one_off.id).to_string(),
                one_off.date.to_string(),
                one_off.category.clone(),
                one_off.description.clone(),
                one_off.amount.to_string(),
                one_off.tags.join(","),
            ]
        })
        .collect();
    output::print_table(
        &[
            ("#", Align::Right),
            ("Id", Align::Left),
            ("Date", Align::Left),
            ("Category", Align::Left),
            ("Description", Align::Left),
            ("Amount", Align::Right),
            ("Tags", Align::Left),
        ],
        &rows,
    );
    Ok(())
}

fn oneoff_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(token) = args.first() else {
        return Err(usage(USAGE[2]));
    };
    let id = resolve(&context.profile()?.one_offs, token, "one-off")?.id.clone();
    let removed = context.edit_profile(|profile| ProfileService::remove_one_off(profile, &id))?;
    output::success(format!("One-off `{}` removed.", removed.description));
    Ok(())
}
