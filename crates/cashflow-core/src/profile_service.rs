//! Mutation helpers for [`Profile`] instances.

use chrono::NaiveDate;
use tracing::info;

use cashflow_domain::{
    BudgetPlan, Categorized, Checkpoint, Money, OneOff, Profile, RecurringSeries,
};

use crate::CoreError;

/// Provides validated edits for profiles; every successful edit touches the profile.
pub struct ProfileService;

impl ProfileService {
    pub fn create(name: impl Into<String>) -> Result<Profile, CoreError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::Validation("profile name must not be empty".into()));
        }
        Ok(Profile::new(name.trim()))
    }

    pub fn add_series(profile: &mut Profile, series: RecurringSeries) -> Result<String, CoreError> {
        validate_series(&series)?;
        Ok(profile.add_series(series))
    }

    /// Removes a series together with every override recorded against it.
    pub fn remove_series(profile: &mut Profile, id: &str) -> Result<RecurringSeries, CoreError> {
        let index = profile
            .series
            .iter()
            .position(|series| series.id == id)
            .ok_or_else(|| CoreError::SeriesNotFound(id.to_string()))?;
        let removed = profile.series.remove(index);
        let dropped = profile.overrides.remove_series(id);
        if dropped > 0 {
            info!(series = id, dropped, "dropped overrides of removed series");
        }
        profile.touch();
        Ok(removed)
    }

    pub fn add_one_off(profile: &mut Profile, one_off: OneOff) -> Result<String, CoreError> {
        validate_description(&one_off.description)?;
        Ok(profile.add_one_off(one_off))
    }

    pub fn remove_one_off(profile: &mut Profile, id: &str) -> Result<OneOff, CoreError> {
        let index = profile
            .one_offs
            .iter()
            .position(|one_off| one_off.id == id)
            .ok_or_else(|| CoreError::OneOffNotFound(id.to_string()))?;
        let removed = profile.one_offs.remove(index);
        profile.touch();
        Ok(removed)
    }

    pub fn record_checkpoint(profile: &mut Profile, date: NaiveDate, net_position: Money) {
        profile.record_checkpoint(Checkpoint::new(date, net_position));
    }

    pub fn set_override_amount(
        profile: &mut Profile,
        series_id: &str,
        date: NaiveDate,
        amount: Money,
    ) -> Result<(), CoreError> {
        ensure_series(profile, series_id)?;
        profile.overrides.set_amount(series_id, date, amount);
        profile.touch();
        Ok(())
    }

    pub fn cancel_occurrence(
        profile: &mut Profile,
        series_id: &str,
        date: NaiveDate,
    ) -> Result<(), CoreError> {
        ensure_series(profile, series_id)?;
        profile.overrides.cancel(series_id, date);
        profile.touch();
        Ok(())
    }

    /// Lifts a cancellation, returning whether one was present.
    pub fn restore_occurrence(
        profile: &mut Profile,
        series_id: &str,
        date: NaiveDate,
    ) -> Result<bool, CoreError> {
        ensure_series(profile, series_id)?;
        let restored = profile.overrides.restore(series_id, date);
        if restored {
            profile.touch();
        }
        Ok(restored)
    }

    pub fn clear_override(
        profile: &mut Profile,
        series_id: &str,
        date: NaiveDate,
    ) -> Result<bool, CoreError> {
        let cleared = profile.overrides.clear(series_id, date);
        if cleared {
            profile.touch();
        }
        Ok(cleared)
    }

    pub fn create_budget(profile: &mut Profile, name: &str) -> Result<(), CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("budget name must not be empty".into()));
        }
        if profile.budgets.contains_key(name) {
            return Err(CoreError::InvalidOperation(format!(
                "budget `{name}` already exists"
            )));
        }
        profile.budgets.insert(name.to_string(), BudgetPlan::default());
        profile.touch();
        Ok(())
    }

    pub fn remove_budget(profile: &mut Profile, name: &str) -> Result<BudgetPlan, CoreError> {
        let removed = profile
            .budgets
            .remove(name)
            .ok_or_else(|| CoreError::BudgetNotFound(name.to_string()))?;
        profile.touch();
        Ok(removed)
    }

    /// Adds a budget series, authored as an outflow magnitude.
    pub fn add_budget_series(
        profile: &mut Profile,
        budget: &str,
        series: RecurringSeries,
    ) -> Result<String, CoreError> {
        validate_series(&series)?;
        let plan = budget_mut(profile, budget)?;
        let id = series.id.clone();
        plan.series.push(series);
        profile.touch();
        Ok(id)
    }

    pub fn add_budget_one_off(
        profile: &mut Profile,
        budget: &str,
        one_off: OneOff,
    ) -> Result<String, CoreError> {
        validate_description(&one_off.description)?;
        let plan = budget_mut(profile, budget)?;
        let id = one_off.id.clone();
        plan.one_offs.push(one_off);
        profile.touch();
        Ok(id)
    }

    /// Renames a category on every record, budgets included. Returns the
    /// number of records changed.
    pub fn rename_category(profile: &mut Profile, old: &str, new: &str) -> Result<usize, CoreError> {
        let new = new.trim();
        if new.is_empty() {
            return Err(CoreError::Validation("category name must not be empty".into()));
        }
        let mut changed = rename_all(&mut profile.series, old, new);
        changed += rename_all(&mut profile.one_offs, old, new);
        for plan in profile.budgets.values_mut() {
            changed += rename_all(&mut plan.series, old, new);
            changed += rename_all(&mut plan.one_offs, old, new);
        }
        if changed > 0 {
            profile.touch();
            info!(from = old, to = new, changed, "renamed category");
        }
        Ok(changed)
    }
}

fn rename_all<T: Categorized>(records: &mut [T], old: &str, new: &str) -> usize {
    let mut changed = 0;
    for record in records.iter_mut().filter(|record| record.category() == old) {
        record.set_category(new.to_string());
        changed += 1;
    }
    changed
}

fn ensure_series(profile: &Profile, series_id: &str) -> Result<(), CoreError> {
    profile
        .series(series_id)
        .map(|_| ())
        .ok_or_else(|| CoreError::SeriesNotFound(series_id.to_string()))
}

fn budget_mut<'a>(profile: &'a mut Profile, name: &str) -> Result<&'a mut BudgetPlan, CoreError> {
    profile
        .budgets
        .get_mut(name)
        .ok_or_else(|| CoreError::BudgetNotFound(name.to_string()))
}

fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.trim().is_empty() {
        return Err(CoreError::Validation("description must not be empty".into()));
    }
    Ok(())
}

fn validate_series(series: &RecurringSeries) -> Result<(), CoreError> {
    validate_description(&series.description)?;
    if let (Some(first), Some(last)) = (series.first, series.last) {
        if last < first {
            return Err(CoreError::Validation(format!(
                "series ends on {last} before its first date {first}"
            )));
        }
    }
    Ok(())
}
