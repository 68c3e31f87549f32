//! Append-only step log

use serde::{Deserialize, Serialize};

use crate::model::{StepRecord, StepReport};

/// Collects the `StepRecord`s of one run in step order.
///
/// Records are only ever appended; there is no way to edit or remove one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepRecorder {
    records: Vec<StepRecord>,
}

impl StepRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(steps: usize) -> Self {
        Self {
            records: Vec::with_capacity(steps),
        }
    }

    pub fn record(&mut self, record: StepRecord) -> &StepRecord {
        debug_assert!(
            self.records.last().is_none_or(|last| last.step < record.step),
            "step records must be appended in increasing step order"
        );
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Everything recorded so far, oldest first
    pub fn history(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&StepRecord> {
        self.records.last()
    }

    pub fn get(&self, step: u32) -> Option<&StepRecord> {
        self.records.iter().find(|r| r.step == step)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Balance after each step, in order
    pub fn balances(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.balance)
    }

    pub fn purchases(&self) -> impl Iterator<Item = &StepRecord> {
        self.records.iter().filter(|r| r.is_purchase())
    }

    pub fn total_fees(&self) -> f64 {
        self.records.iter().filter_map(StepRecord::fee).sum()
    }

    pub fn reports(&self) -> impl Iterator<Item = StepReport> + '_ {
        self.records.iter().map(StepRecord::report)
    }
}
