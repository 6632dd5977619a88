use cashflow_core::{CoreError, ProfileService};
use cashflow_storage_json::canonical_name;

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, Align};
use crate::cli::registry::CommandEntry;

use super::{split_action, usage};

const USAGE: &[&str] = &[
    "profile new <name>",
    "profile load <name>",
    "profile save",
    "profile list",
    "profile backup [note]",
    "profile backups",
    "profile restore <#|backup-id>",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "profile",
        "Create, open, save and back up profiles",
        USAGE,
        cmd_profile,
    )]
}

fn cmd_profile(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args);
    match action.as_deref() {
        Some("new") => profile_new(context, rest),
        Some("load") => profile_load(context, rest),
        Some("save") => profile_save(context),
        Some("list") | None => profile_list(context),
        Some("backup") => profile_backup(context, rest),
        Some("backups") => profile_backups(context),
        Some("restore") => profile_restore(context, rest),
        Some(_) => Err(usage(&USAGE.join(" | "))),
    }
}

fn profile_new(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(usage(USAGE[0]));
    }
    let name = args.join(" ");
    match context.storage().load_profile(&name) {
        Ok(_) => {
            return Err(CommandError::Message(format!(
                "Profile `{name}` already exists; use `profile load {name}`."
            )))
        }
        Err(CoreError::ProfileNotFound(_)) => {}
        Err(err) => return Err(err.into()),
    }

    context.flush_pending()?;
    let profile = ProfileService::create(name)?;
    let name = profile.name.clone();
    context.attach_profile(profile);
    context.save_profile()?;
    output::success(format!("Profile `{name}` created."));
    Ok(())
}

fn profile_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(usage(USAGE[1]));
    }
    let name = args.join(" ");
    let profile = context.storage().load_profile(&name)?;
    context.flush_pending()?;
    let loaded = profile.name.clone();
    context.attach_profile(profile);
    context.remember_profile(Some(&loaded))?;
    output::success(format!("Profile `{loaded}` loaded."));
    Ok(())
}

fn profile_save(context: &mut ShellContext) -> CommandResult {
    let name = context.save_profile()?;
    output::success(format!("Profile `{name}` saved."));
    Ok(())
}

fn profile_list(context: &mut ShellContext) -> CommandResult {
    let names = context.storage().list_profiles()?;
    if names.is_empty() {
        output::info("No saved profiles yet.");
        return Ok(());
    }
    let current = context
        .profile()
        .ok()
        .map(|profile| canonical_name(&profile.name));
    output::section("Profiles");
    for name in names {
        let marker = if current.as_deref() == Some(name.as_str()) {
            "*"
        } else {
            " "
        };
        output::line(format!("{marker} {name}"));
    }
    Ok(())
}

fn profile_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = (!args.is_empty()).then(|| args.join(" "));
    let profile = context.profile()?;
    let backup = context
        .storage()
        .backup_profile(&profile.name, profile, note.as_deref())?;
    output::success(format!("Backup `{}` written.", backup.id));
    Ok(())
}

fn profile_backups(context: &mut ShellContext) -> CommandResult {
    let profile = context.profile()?;
    let backups = context.storage().list_backups(&profile.name)?;
    if backups.is_empty() {
        output::info(format!("No backups for profile `{}`.", profile.name));
        return Ok(());
    }
    output::section(format!("Backups of {}", profile.name));
    let rows: Vec<Vec<String>> = backups
        .iter()
        .enumerate()
        .map(|(index, backup)| {
            vec![
                (index + 1).to_string(),
                backup.created_at.clone(),
                backup.id.clone(),
            ]
        })
        .collect();
    output::print_table(
        &[("#", Align::Right), ("Created", Align::Left), ("Backup", Align::Left)],
        &rows,
    );
    Ok(())
}

fn profile_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(token) = args.first() else {
        return Err(usage(USAGE[6]));
    };
    let name = context.profile()?.name.clone();
    let backups = context.storage().list_backups(&name)?;
    let chosen = token
        .parse::<usize>()
        .ok()
        .and_then(|position| position.checked_sub(1))
        .and_then(|index| backups.get(index))
        .or_else(|| backups.iter().find(|backup| backup.id == *token))
        .ok_or_else(|| CommandError::InvalidArguments(format!("no backup matches `{token}`")))?;
    let restored = context.storage().restore_backup(chosen)?;
    context.attach_profile(restored);
    output::success(format!("Profile `{name}` restored from `{}`.", chosen.id));
    Ok(())
}
