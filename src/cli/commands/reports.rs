use cashflow_core::{CashflowView, ProfileService};
use cashflow_domain::{LedgerEntry, Money};

use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::output::{self, Align};
use crate::cli::registry::CommandEntry;

use super::{short_id, usage};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "ledger",
            "List the window's ledger (real, or the active budget with `ledger budget`)",
            &["ledger", "ledger budget"],
            cmd_ledger,
        ),
        CommandEntry::new(
            "balance",
            "Daily projected balance over the window",
            &["balance", "balance budget"],
            cmd_balance,
        ),
        CommandEntry::new(
            "offset",
            "Opening balance calibrated from the latest checkpoint",
            &["offset"],
            cmd_offset,
        ),
        CommandEntry::new(
            "adjustments",
            "Synthetic entries reconciling checkpoints with the ledger",
            &["adjustments"],
            cmd_adjustments,
        ),
        CommandEntry::new(
            "provisions",
            "Amounts to set aside for irregular series",
            &["provisions"],
            cmd_provisions,
        ),
        CommandEntry::new(
            "stats",
            "Outflows per category, compared with the active budget",
            &["stats"],
            cmd_stats,
        ),
        CommandEntry::new(
            "rename-category",
            "Rename a category on every record",
            &["rename-category <old> <new>"],
            cmd_rename_category,
        ),
    ]
}

fn wants_budget(args: &[&str]) -> bool {
    matches!(args.first(), Some(flag) if flag.eq_ignore_ascii_case("budget"))
}

fn cmd_ledger(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let view = context.compute_view()?;
    let (title, ledger) = match (wants_budget(args), &view.budget) {
        (true, Some(budget)) => (format!("Budget ledger `{}`", budget.name), &budget.ledger),
        (true, None) => {
            output::warning("No active budget; showing the real ledger.");
            ("Ledger".to_string(), &view.ledger)
        }
        (false, _) => ("Ledger".to_string(), &view.ledger),
    };
    output::section(format!("{title} {}", view.window));
    if ledger.is_empty() {
        output::info("No movements in this window.");
        return Ok(());
    }
    let mut entries: Vec<&LedgerEntry> = ledger.iter().collect();
    entries.sort_by_key(|entry| entry.date);
    let rows: Vec<Vec<String>> = entries
        .into_iter()
        .map(|entry| {
            vec![
                entry.date.to_string(),
                entry.category.clone(),
                entry.description.clone(),
                entry.amount.to_string(),
                entry_source(entry),
            ]
        })
        .collect();
    output::print_table(
        &[
            ("Date", Align::Left),
            ("Category", Align::Left),
            ("Description", Align::Left),
            ("Amount", Align::Right),
            ("Source", Align::Left),
        ],
        &rows,
    );
    Ok(())
}

fn entry_source(entry: &LedgerEntry) -> String {
    match (&entry.series_id, entry.is_ignored) {
        (Some(id), true) => format!("series {} (ignored)", short_id(id)),
        (Some(id), false) => format!("series {}", short_id(id)),
        (None, _) => "one-off".to_string(),
    }
}

fn cmd_balance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let view = context.compute_view()?;
    let budget = if wants_budget(args) {
        if view.budget.is_none() {
            output::warning("No active budget; showing the real balance only.");
        }
        view.budget.as_ref()
    } else {
        None
    };
    output::section(format!("Balance {}", view.window));
    let today = context.today();
    let rows: Vec<Vec<String>> = view
        .balance
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let mut row = vec![point.date.to_string(), point.balance.to_string()];
            if let Some(plan) = budget {
                row.push(
                    plan.balance
                        .get(index)
                        .map(|point| point.balance.to_string())
                        .unwrap_or_default(),
                );
            }
            if point.date == today {
                row.push("<- today".to_string());
            }
            row
        })
        .collect();
    let mut headers = vec![("Date", Align::Left), ("Balance", Align::Right)];
    if budget.is_some() {
        headers.push(("Budget", Align::Right));
    }
    headers.push(("", Align::Left));
    output::print_table(&headers, &rows);
    summarize(&view);
    Ok(())
}

fn summarize(view: &CashflowView) {
    output::info(format!("Opening offset : {}", view.offset));
    output::info(format!("Closing balance: {}", view.closing_balance()));
    output::info(format!("Period net     : {}", view.period_net));
    if let Some(today) = view.today_balance {
        output::info(format!("Today          : {today}"));
    }
}

fn cmd_offset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let view = context.compute_view()?;
    let profile = context.profile()?;
    match profile.checkpoints.latest() {
        Some(anchor) => output::info(format!(
            "Offset at {}: {} (calibrated from checkpoint {} = {})",
            view.window.start, view.offset, anchor.date, anchor.net_position
        )),
        None => output::info(format!(
            "Offset at {}: {} (no checkpoint recorded)",
            view.window.start, view.offset
        )),
    }
    Ok(())
}

fn cmd_adjustments(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let view = context.compute_view()?;
    if view.adjustments.is_empty() {
        output::info("Checkpoints are fully explained by the ledger.");
        return Ok(());
    }
    output::section(format!("Adjustments {}", view.window));
    let rows: Vec<Vec<String>> = view
        .adjustments
        .iter()
        .map(|adjustment| {
            vec![
                adjustment.date.to_string(),
                adjustment.category.clone(),
                adjustment.ledger_amount().to_string(),
                adjustment.description.clone(),
            ]
        })
        .collect();
    output::print_table(
        &[
            ("Date", Align::Left),
            ("Category", Align::Left),
            ("Amount", Align::Right),
            ("Description", Align::Left),
        ],
        &rows,
    );
    let total: Money = view.adjustments.iter().map(|adjustment| adjustment.ledger_amount()).sum();
    output::info(format!("Unrecorded movements: {total}"));
    Ok(())
}

fn cmd_provisions(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let view = context.compute_view()?;
    if view.provisions.is_empty() {
        output::info("No provisions needed for this window.");
        return Ok(());
    }
    output::section(format!("Provisions {}", view.window));
    let rows: Vec<Vec<String>> = view
        .provisions
        .iter()
        .map(|row| {
            vec![
                row.description.clone(),
                row.period_total.to_string(),
                row.year_total.to_string(),
                row.smoothed.to_string(),
                row.provision.to_string(),
            ]
        })
        .collect();
    output::print_table(
        &[
            ("Series", Align::Left),
            ("In window", Align::Right),
            ("Yearly", Align::Right),
            ("Smoothed", Align::Right),
            ("Provision", Align::Right),
        ],
        &rows,
    );
    let total: Money = view.provisions.iter().map(|row| row.provision).sum();
    output::info(format!("Total provision: {total}"));
    Ok(())
}

fn cmd_stats(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let view = context.compute_view()?;
    match view.category_comparison() {
        Some(rows) => {
            output::section(format!("Outflows vs budget {}", view.window));
            let rows: Vec<Vec<String>> = rows
                .iter()
                .map(|row| {
                    vec![
                        row.category.clone(),
                        row.real.to_string(),
                        row.budget.to_string(),
                        row.overspend().to_string(),
                    ]
                })
                .collect();
            output::print_table(
                &[
                    ("Category", Align::Left),
                    ("Real", Align::Right),
                    ("Budget", Align::Right),
                    ("Over", Align::Right),
                ],
                &rows,
            );
        }
        None => {
            output::section(format!("Outflows {}", view.window));
            let rows: Vec<Vec<String>> = view
                .category_outflows()
                .iter()
                .map(|row| vec![row.category.clone(), row.total.to_string()])
                .collect();
            if rows.is_empty() {
                output::info("No outflows in this window.");
            } else {
                output::print_table(&[("Category", Align::Left), ("Total", Align::Right)], &rows);
            }
        }
    }
    Ok(())
}

fn cmd_rename_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [old, new] = args else {
        return Err(usage("rename-category <old> <new>"));
    };
    let changed =
        context.edit_profile(|profile| ProfileService::rename_category(profile, old, new))?;
    output::success(format!("Renamed `{old}` to `{new}` on {changed} record(s)."));
    Ok(())
}
