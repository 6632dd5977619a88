//! Shell state, dispatch and error reporting.

use std::io;

use chrono::NaiveDate;
use strsim::levenshtein;
use tracing::{info, warn};

use cashflow_config::{Config, ConfigError, ConfigManager};
use cashflow_core::{
    storage::{profile_warnings, ProfileStorage},
    time::{Clock, SystemClock},
    AdjustmentPolicy, CashflowView, CoreError, SessionContext,
};
use cashflow_domain::{
    BudgetPlan, CadenceError, DateWindow, DateWindowError, MoneyError, OneOff, Profile,
    RecurringSeries,
};
use cashflow_storage_json::JsonProfileStorage;

use crate::errors::{CashflowError, CliError};
use crate::utils::paths;

use super::commands;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Outcome of a profile edit, telling whether anything was modified.
pub trait ProfileChange {
    fn changed(&self) -> bool {
        true
    }
}

impl ProfileChange for () {}
impl ProfileChange for String {}
impl ProfileChange for RecurringSeries {}
impl ProfileChange for OneOff {}
impl ProfileChange for BudgetPlan {}

impl ProfileChange for bool {
    fn changed(&self) -> bool {
        *self
    }
}

/// Count of records touched.
impl ProfileChange for usize {
    fn changed(&self) -> bool {
        *self > 0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Profile not loaded. Use `profile new` or `profile load` first.")]
    ProfileNotLoaded,
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Core(#[from] CashflowError),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        match CashflowError::from(err) {
            CashflowError::ProfileNotLoaded => CommandError::ProfileNotLoaded,
            other => CommandError::Core(other),
        }
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        CommandError::Core(err.into())
    }
}

impl From<DateWindowError> for CommandError {
    fn from(err: DateWindowError) -> Self {
        CommandError::InvalidArguments(err.to_string())
    }
}

impl From<MoneyError> for CommandError {
    fn from(err: MoneyError) -> Self {
        CommandError::InvalidArguments(err.to_string())
    }
}

impl From<CadenceError> for CommandError {
    fn from(err: CadenceError) -> Self {
        CommandError::InvalidArguments(err.to_string())
    }
}

impl From<io::Error> for CommandError {
    fn from(err: io::Error) -> Self {
        CommandError::Core(err.into())
    }
}

/// Everything a command handler may read or change.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub running: bool,
    pub last_command: Option<String>,
    pub(crate) config: Config,
    pub(crate) window: DateWindow,
    config_manager: ConfigManager,
    storage: Box<dyn ProfileStorage>,
    clock: Box<dyn Clock>,
    profile: Option<Profile>,
    dirty: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager =
            ConfigManager::with_base_dir(paths::app_data_dir()).map_err(CashflowError::from)?;
        let config = match config_manager.load() {
            Ok(config) => config,
            Err(err) => {
                output::warning(format!(
                    "Configuration could not be loaded ({err}); using defaults."
                ));
                Config::default()
            }
        };
        let storage =
            JsonProfileStorage::new(paths::storage_paths(&config)).map_err(CashflowError::from)?;
        let mut context = Self::with_parts(
            mode,
            config_manager,
            config,
            Box::new(storage),
            Box::new(SystemClock),
        )?;
        context.auto_load_last();
        Ok(context)
    }

    /// Builds a context from explicit collaborators.
    pub fn with_parts(
        mode: CliMode,
        config_manager: ConfigManager,
        config: Config,
        storage: Box<dyn ProfileStorage>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        output::set_preferences(OutputPreferences {
            color_enabled: config.ui_color_enabled && mode == CliMode::Interactive,
        });

        let window =
            DateWindow::cycle_containing(clock.today(), config.first_day, config.horizon_months)
                .map_err(CashflowError::from)?;

        Ok(Self {
            mode,
            registry,
            running: true,
            last_command: None,
            config,
            window,
            config_manager,
            storage,
            clock,
            profile: None,
            dirty: false,
        })
    }

    fn auto_load_last(&mut self) {
        if self.mode != CliMode::Interactive {
            return;
        }
        let Some(name) = self.config.last_opened_profile.clone() else {
            return;
        };
        match self.storage.load_profile(&name) {
            Ok(profile) => {
                self.attach_profile(profile);
                output::success(format!("Automatically loaded last profile `{name}`."));
            }
            Err(err) => warn!(profile = %name, error = %err, "could not reopen last profile"),
        }
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn prompt(&self) -> String {
        match &self.profile {
            Some(profile) if self.dirty => format!("cashflow({}*)> ", profile.name),
            Some(profile) => format!("cashflow({})> ", profile.name),
            None => "cashflow> ".to_string(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn storage(&self) -> &dyn ProfileStorage {
        self.storage.as_ref()
    }

    pub fn profile(&self) -> Result<&Profile, CommandError> {
        self.profile.as_ref().ok_or(CommandError::ProfileNotLoaded)
    }

    pub fn has_profile(&self) -> bool {
        self.profile.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Applies an edit to the loaded profile and marks it unsaved when the
    /// edit reports a change.
    pub fn edit_profile<T: ProfileChange>(
        &mut self,
        edit: impl FnOnce(&mut Profile) -> Result<T, CoreError>,
    ) -> Result<T, CommandError> {
        let profile = self.profile.as_mut().ok_or(CommandError::ProfileNotLoaded)?;
        let value = edit(profile)?;
        if value.changed() {
            self.dirty = true;
        }
        Ok(value)
    }

    /// Makes `profile` the current one, reporting dangling references.
    pub fn attach_profile(&mut self, profile: Profile) {
        for warning in profile_warnings(&profile) {
            output::warning(warning);
        }
        if let Some(budget) = self.config.active_budget.as_deref() {
            if profile.budget(budget).is_none() {
                output::warning(format!(
                    "Active budget `{budget}` does not exist in this profile; budget view disabled."
                ));
            }
        }
        self.profile = Some(profile);
        self.dirty = false;
    }

    /// Writes the current profile and remembers it as the last opened one.
    pub fn save_profile(&mut self) -> Result<String, CommandError> {
        let profile = self.profile.as_mut().ok_or(CommandError::ProfileNotLoaded)?;
        profile.touch();
        let name = profile.name.clone();
        self.storage.save_profile(&name, profile)?;
        self.dirty = false;
        info!(profile = %name, "profile saved");
        self.remember_profile(Some(&name))?;
        Ok(name)
    }

    /// Saves pending edits before the current profile is replaced or the shell exits.
    pub fn flush_pending(&mut self) -> Result<(), CommandError> {
        if self.dirty && self.profile.is_some() {
            let name = self.save_profile()?;
            output::info(format!("Saved pending changes to profile `{name}`."));
        }
        Ok(())
    }

    pub fn remember_profile(&mut self, name: Option<&str>) -> CommandResult {
        self.config.last_opened_profile = name.map(str::to_string);
        self.persist_config()
    }

    pub fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub fn config_manager(&self) -> &ConfigManager {
        &self.config_manager
    }

    /// Replaces the whole configuration, e.g. after a restore.
    pub fn replace_config(&mut self, config: Config) -> CommandResult {
        self.config = config;
        output::set_preferences(OutputPreferences {
            color_enabled: self.config.ui_color_enabled && self.mode == CliMode::Interactive,
        });
        self.reset_window()
    }

    /// Recomputes the window around today from the configured cycle.
    pub fn reset_window(&mut self) -> CommandResult {
        self.window = DateWindow::cycle_containing(
            self.today(),
            self.config.first_day,
            self.config.horizon_months,
        )?;
        Ok(())
    }

    /// The active budget, when the loaded profile defines it.
    pub fn active_budget(&self) -> Option<String> {
        let name = self.config.active_budget.as_deref()?;
        let profile = self.profile.as_ref()?;
        profile.budget(name).map(|_| name.to_string())
    }

    pub fn adjustment_policy(&self) -> AdjustmentPolicy {
        AdjustmentPolicy {
            category: self.config.adjustment_category.clone(),
            tags: self.config.adjustment_tags.clone(),
            step_days: self.config.effective_step_days(),
        }
    }

    pub fn session(&self) -> SessionContext {
        SessionContext::new(self.window, self.today())
            .with_policy(self.adjustment_policy())
            .with_budget(self.active_budget())
    }

    pub fn compute_view(&self) -> Result<CashflowView, CommandError> {
        let profile = self.profile()?;
        Ok(CashflowView::compute(profile, &self.session())?)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match super::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err.to_string());
                return Ok(LoopControl::Continue);
            }
        };
        let Some((first, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        self.dispatch(&first.to_lowercase(), first, &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &input.to_lowercase()), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::ProfileNotLoaded => {
                output::error("Profile not loaded. Use `profile new` or `profile load` first.");
                output::hint("Try `profile new Household` to get started.");
            }
            other => output::error(other.to_string()),
        }
    }

    /// Persists pending edits when the shell stops.
    pub fn shutdown(&mut self) -> Result<(), CliError> {
        self.flush_pending()
            .map_err(|err| CliError::Command(err.to_string()))
    }
}
