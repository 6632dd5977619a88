//! Observed real-world balances used as ground truth.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{money::Money, window::DateWindow};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Checkpoint {
    pub date: NaiveDate,
    pub net_position: Money,
}

impl Checkpoint {
    pub fn new(date: NaiveDate, net_position: Money) -> Self {
        Self { date, net_position }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "Vec<Checkpoint>", into = "Vec<Checkpoint>")]
/// Append-only checkpoint history kept in ascending date order.
pub struct CheckpointLog {
    entries: Vec<Checkpoint>,
}

impl CheckpointLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts after every checkpoint dated on or before `checkpoint.date`.
    pub fn record(&mut self, checkpoint: Checkpoint) {
        let position = self
            .entries
            .partition_point(|existing| existing.date <= checkpoint.date);
        self.entries.insert(position, checkpoint);
    }

    /// The most recent checkpoint, used as the default calibration anchor.
    pub fn latest(&self) -> Option<&Checkpoint> {
        self.entries.last()
    }

    /// The last checkpoint before `window.start` followed by every checkpoint
    /// on or after it.
    pub fn for_window(&self, window: &DateWindow) -> Vec<Checkpoint> {
        let split = self
            .entries
            .partition_point(|checkpoint| checkpoint.date < window.start);
        let from = split.saturating_sub(1);
        self.entries[from..].to_vec()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Checkpoint] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<Checkpoint>> for CheckpointLog {
    fn from(mut entries: Vec<Checkpoint>) -> Self {
        entries.sort_by_key(|checkpoint| checkpoint.date);
        Self { entries }
    }
}

impl From<CheckpointLog> for Vec<Checkpoint> {
    fn from(log: CheckpointLog) -> Self {
        log.entries
    }
}
