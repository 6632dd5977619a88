use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    checkpoint::{Checkpoint, CheckpointLog},
    common::Identifiable,
    overrides::OverrideStore,
    transaction::{OneOff, RecurringSeries},
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
/// Hypothetical series and one-offs compared against the real ledger.
///
/// Budget series are authored as outflow magnitudes, like one-offs.
pub struct BudgetPlan {
    #[serde(default)]
    pub series: Vec<RecurringSeries>,
    #[serde(default)]
    pub one_offs: Vec<OneOff>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Everything a single user keeps: movements, checkpoints, overrides and budgets.
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub series: Vec<RecurringSeries>,
    #[serde(default)]
    pub one_offs: Vec<OneOff>,
    #[serde(default)]
    pub checkpoints: CheckpointLog,
    #[serde(default)]
    pub overrides: OverrideStore,
    #[serde(default)]
    pub budgets: BTreeMap<String, BudgetPlan>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Profile::schema_version_default")]
    pub schema_version: u8,
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            series: Vec::new(),
            one_offs: Vec::new(),
            checkpoints: CheckpointLog::new(),
            overrides: OverrideStore::new(),
            budgets: BTreeMap::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_series(&mut self, series: RecurringSeries) -> String {
        let id = series.id.clone();
        self.series.push(series);
        self.touch();
        id
    }

    pub fn add_one_off(&mut self, one_off: OneOff) -> String {
        let id = one_off.id.clone();
        self.one_offs.push(one_off);
        self.touch();
        id
    }

    pub fn record_checkpoint(&mut self, checkpoint: Checkpoint) {
        self.checkpoints.record(checkpoint);
        self.touch();
    }

    pub fn series(&self, id: &str) -> Option<&RecurringSeries> {
        self.series.iter().find(|series| series.id() == id)
    }

    pub fn one_off(&self, id: &str) -> Option<&OneOff> {
        self.one_offs.iter().find(|one_off| one_off.id() == id)
    }

    pub fn budget(&self, name: &str) -> Option<&BudgetPlan> {
        self.budgets.get(name)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
