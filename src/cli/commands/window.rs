use cashflow_domain::{shift_months, DateWindow};

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

use super::{parse_date, parse_number, split_action, usage};

const USAGE: &[&str] = &[
    "window [show]",
    "window next",
    "window prev",
    "window set <start> <months>",
    "window today",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "window",
        "Show or move the period being projected",
        USAGE,
        cmd_window,
    )]
}

fn cmd_window(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args);
    match action.as_deref() {
        Some("show") | None => {}
        Some("next") => context.window = context.window.shift_months(1)?,
        Some("prev") | Some("previous") => context.window = context.window.shift_months(-1)?,
        Some("set") => context.window = parse_window(rest)?,
        Some("today") => context.reset_window()?,
        Some(_) => return Err(usage(&USAGE.join(" | "))),
    }
    output::info(format!(
        "Window {} ({} days)",
        context.window,
        context.window.length_days()
    ));
    Ok(())
}

fn parse_window(args: &[&str]) -> Result<DateWindow, CommandError> {
    let [start, months] = args else {
        return Err(usage(USAGE[3]));
    };
    let start = parse_date(start)?;
    let months: u32 = parse_number(months, "month count")?;
    if months == 0 {
        return Err(CommandError::InvalidArguments(
            "a window spans at least one month".into(),
        ));
    }
    let end = i32::try_from(months)
        .ok()
        .and_then(|months| shift_months(start, months))
        .ok_or_else(|| CommandError::InvalidArguments("window end is out of range".into()))?;
    Ok(DateWindow::new(start, end)?)
}
