use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

use super::{parse_number, split_action, usage};

const USAGE: &[&str] = &[
    "config show",
    "config first-day <1-31>",
    "config horizon <months>",
    "config step-days <days|off>",
    "config category <name>",
    "config color <on|off>",
    "config backup [note]",
    "config backups",
    "config restore <#|name>",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Inspect and change preferences",
        USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args);
    match action.as_deref() {
        Some("show") | None => config_show(context),
        Some("first-day") => config_first_day(context, rest),
        Some("horizon") => config_horizon(context, rest),
        Some("step-days") => config_step_days(context, rest),
        Some("category") => config_category(context, rest),
        Some("color") => config_color(context, rest),
        Some("backup") => config_backup(context, rest),
        Some("backups") => config_backups(context),
        Some("restore") => config_restore(context, rest),
        Some(_) => Err(usage(&USAGE.join(" | "))),
    }
}

fn config_show(context: &mut ShellContext) -> CommandResult {
    let config = &context.config;
    output::section("Configuration");
    output::line(format!("  first day        : {}", config.first_day));
    output::line(format!("  horizon (months) : {}", config.horizon_months));
    output::line(format!("  adjustment cat.  : {}", config.adjustment_category));
    output::line(format!(
        "  adjustment step  : {}",
        config
            .effective_step_days()
            .map(|days| format!("{days} days"))
            .unwrap_or_else(|| "off".into())
    ));
    output::line(format!(
        "  active budget    : {}",
        config.active_budget.as_deref().unwrap_or("-")
    ));
    output::line(format!(
        "  colors           : {}",
        if config.ui_color_enabled { "on" } else { "off" }
    ));
    output::line(format!(
        "  file             : {}",
        context.config_manager().config_path().display()
    ));
    Ok(())
}

fn config_first_day(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [day] = args else {
        return Err(usage(USAGE[1]));
    };
    let day: u32 = parse_number(day, "day of month")?;
    context.config.set_first_day(day)?;
    save_and_reframe(context)?;
    output::success(format!("Cycles now start on day {day}."));
    Ok(())
}

fn config_horizon(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [months] = args else {
        return Err(usage(USAGE[2]));
    };
    let months: u32 = parse_number(months, "month count")?;
    context.config.set_horizon_months(months)?;
    save_and_reframe(context)?;
    output::success(format!("Windows now span {months} month(s)."));
    Ok(())
}

fn config_step_days(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        return Err(usage(USAGE[3]));
    };
    let step = match raw.to_lowercase().as_str() {
        "off" | "none" | "0" => None,
        value => Some(parse_number::<u32>(value, "day count")?),
    };
    context.config.adjustment_step_days = step;
    context.persist_config()?;
    match step {
        Some(days) => output::success(format!("Adjustments are spread every {days} days.")),
        None => output::success("Adjustments are booked on the checkpoint date."),
    }
    Ok(())
}

fn config_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(usage(USAGE[4]));
    }
    let category = args.join(" ");
    context.config.set_adjustment_category(&category)?;
    context.persist_config()?;
    output::success(format!("Adjustments are filed under `{category}`."));
    Ok(())
}

fn config_color(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let enabled = match args {
        ["on"] => true,
        ["off"] => false,
        _ => return Err(usage(USAGE[5])),
    };
    let mut config = context.config.clone();
    config.ui_color_enabled = enabled;
    context.replace_config(config)?;
    context.persist_config()?;
    output::success(format!("Colors {}.", if enabled { "enabled" } else { "disabled" }));
    Ok(())
}

fn config_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = (!args.is_empty()).then(|| args.join(" "));
    let name = context
        .config_manager()
        .backup(&context.config, note.as_deref())?;
    output::success(format!("Configuration backup `{name}` written."));
    Ok(())
}

fn config_backups(context: &mut ShellContext) -> CommandResult {
    let backups = context.config_manager().list_backups()?;
    if backups.is_empty() {
        output::info("No configuration backups.");
        return Ok(());
    }
    output::section("Configuration backups");
    for (index, name) in backups.iter().enumerate() {
        output::line(format!("{:>3}  {name}", index + 1));
    }
    Ok(())
}

fn config_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [token] = args else {
        return Err(usage(USAGE[8]));
    };
    let backups = context.config_manager().list_backups()?;
    let name = token
        .parse::<usize>()
        .ok()
        .and_then(|position| position.checked_sub(1))
        .and_then(|index| backups.get(index))
        .or_else(|| backups.iter().find(|name| name.as_str() == *token))
        .cloned()
        .ok_or_else(|| CommandError::InvalidArguments(format!("no backup matches `{token}`")))?;
    let restored = context.config_manager().restore(&name)?;
    context.replace_config(restored)?;
    output::success(format!("Configuration restored from `{name}`."));
    Ok(())
}

fn save_and_reframe(context: &mut ShellContext) -> CommandResult {
    context.persist_config()?;
    context.reset_window()
}
