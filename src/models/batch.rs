// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Per-drop aggregation: one reserved slot per dropped file, reported once every slot is filled.

use std::fmt;

use super::file_record::{FileRecord, ReadOutcome};

/// Identifies one drop gesture within a drop zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BatchId(pub u64);

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Every file of a drop, read successfully, in drop order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropBatch {
    id: BatchId,
    records: Vec<FileRecord>,
}

impl DropBatch {
    pub fn id(&self) -> BatchId {
        self.id
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter()
    }
}

/// A drop where at least one read failed. Outcomes keep drop order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedBatch {
    id: BatchId,
    outcomes: Vec<ReadOutcome>,
}

impl FailedBatch {
    pub fn id(&self) -> BatchId {
        self.id
    }

    pub fn outcomes(&self) -> &[ReadOutcome] {
        &self.outcomes
    }

    /// Records that were read successfully.
    pub fn loaded(&self) -> impl Iterator<Item = &FileRecord> {
        self.outcomes.iter().filter_map(|o| match o {
            ReadOutcome::Loaded(record) => Some(record),
            ReadOutcome::Failed { .. } => None,
        })
    }

    /// `(name, cause)` for every failed read.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|o| match o {
            ReadOutcome::Failed { name, cause } => Some((name.as_str(), cause.as_str())),
            ReadOutcome::Loaded(_) => None,
        })
    }
}

/// Final state of a drop once every read has resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchReport {
    Complete(DropBatch),
    Partial(FailedBatch),
}

impl BatchReport {
    pub fn id(&self) -> BatchId {
        match self {
            BatchReport::Complete(batch) => batch.id(),
            BatchReport::Partial(failed) => failed.id(),
        }
    }

    /// Number of files in the originating drop.
    pub fn file_count(&self) -> usize {
        match self {
            BatchReport::Complete(batch) => batch.len(),
            BatchReport::Partial(failed) => failed.outcomes().len(),
        }
    }
}

/// Countdown over the reads of one drop.
///
/// Slots are reserved up front so records land at their drop index regardless of the
/// order in which reads complete.
#[derive(Debug)]
pub struct PendingBatch {
    id: BatchId,
    slots: Vec<Option<ReadOutcome>>,
    filled: usize,
    reported: bool,
}

impl PendingBatch {
    pub fn new(id: BatchId, expected: usize) -> Self {
        Self {
            id,
            slots: vec![None; expected],
            filled: 0,
            reported: false,
        }
    }

    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Store the outcome for `index`. Returns the report when this fill completes the batch.
    ///
    /// Out-of-range or repeated fills are ignored, so the report is produced at most once.
    pub fn fill(&mut self, index: usize, outcome: ReadOutcome) -> Option<BatchReport> {
        if self.reported {
            log::warn!("batch {} already reported; ignoring read {index}", self.id);
            return None;
        }
        let Some(slot) = self.slots.get_mut(index) else {
            log::warn!(
                "batch {} has {} slots; ignoring read {index}",
                self.id,
                self.slots.len()
            );
            return None;
        };
        if slot.is_some() {
            log::warn!("batch {} slot {index} already filled", self.id);
            return None;
        }
        *slot = Some(outcome);
        self.filled += 1;

        if self.filled < self.slots.len() {
            return None;
        }
        self.reported = true;
        let outcomes: Vec<ReadOutcome> = self.slots.iter_mut().filter_map(Option::take).collect();
        Some(build_report(self.id, outcomes))
    }
}

fn build_report(id: BatchId, outcomes: Vec<ReadOutcome>) -> BatchReport {
    if outcomes.iter().all(ReadOutcome::is_loaded) {
        let records = outcomes
            .into_iter()
            .filter_map(|o| match o {
                ReadOutcome::Loaded(record) => Some(record),
                ReadOutcome::Failed { .. } => None,
            })
            .collect();
        BatchReport::Complete(DropBatch { id, records })
    } else {
        BatchReport::Partial(FailedBatch { id, outcomes })
    }
}

#[cfg(test)]
mod tests {
    use super::{BatchId, BatchReport, PendingBatch};
    use crate::models::file_record::{FileRecord, ReadOutcome};

    fn loaded(name: &str) -> ReadOutcome {
        ReadOutcome::Loaded(FileRecord {
            name: name.into(),
            size: 1,
            mime: "text/plain".into(),
            last_modified: None,
            data: name.to_uppercase(),
        })
    }

    #[test]
    fn reports_once_all_slots_fill_in_drop_order() {
        let mut pending = PendingBatch::new(BatchId(1), 3);

        assert!(pending.fill(2, loaded("c")).is_none());
        assert!(pending.fill(0, loaded("a")).is_none());
        assert_eq!(pending.filled(), 2);
        let report = pending.fill(1, loaded("b")).expect("third fill completes");

        let BatchReport::Complete(batch) = report else {
            panic!("expected complete batch");
        };
        let names: Vec<_> = batch.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(batch.id(), BatchId(1));
    }

    #[test]
    fn ignores_duplicate_and_out_of_range_fills() {
        let mut pending = PendingBatch::new(BatchId(7), 2);

        assert!(pending.fill(0, loaded("a")).is_none());
        assert!(pending.fill(0, loaded("again")).is_none());
        assert!(pending.fill(5, loaded("stray")).is_none());
        assert_eq!(pending.filled(), 1);

        assert!(pending.fill(1, loaded("b")).is_some());
        assert!(pending.fill(1, loaded("late")).is_none());
    }

    // A failed read still resolves the batch, as a partial report.
    #[test]
    fn failed_read_yields_partial_report() {
        let mut pending = PendingBatch::new(BatchId(2), 2);
        pending.fill(1, loaded("b"));
        let report = pending
            .fill(
                0,
                ReadOutcome::Failed {
                    name: "a".into(),
                    cause: "permission denied".into(),
                },
            )
            .expect("batch resolves");

        assert_eq!(report.file_count(), 2);
        let BatchReport::Partial(failed) = report else {
            panic!("expected partial batch");
        };
        assert_eq!(failed.failures().collect::<Vec<_>>(), [("a", "permission denied")]);
        assert_eq!(failed.loaded().count(), 1);
        assert_eq!(failed.outcomes()[1].name(), "b");
    }
}
