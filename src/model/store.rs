use crate::model::{ExpenseRecord, RecordKey};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use std::ops::Bound;

/// The merged, deduplicated set of records from every source.
///
/// Records are kept in the order they were first seen, both overall and per date. A record whose
/// key has been seen before is a duplicate and is dropped, so merging the same input twice has no
/// effect.
#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    keys: HashSet<RecordKey>,
    records: Vec<ExpenseRecord>,
    by_date: BTreeMap<NaiveDate, Vec<ExpenseRecord>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every record whose key is new and returns how many were added.
    pub fn merge(&mut self, records: impl IntoIterator<Item = ExpenseRecord>) -> usize {
        let mut added = 0;
        for record in records {
            if !self.keys.insert(record.key()) {
                continue;
            }
            self.by_date
                .entry(record.date())
                .or_default()
                .push(record.clone());
            self.records.push(record);
            added += 1;
        }
        added
    }

    /// The records on `date` in the order they were merged.
    pub fn records_on(&self, date: NaiveDate) -> &[ExpenseRecord] {
        self.by_date.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The dates that have records and lie strictly between `start` and `end`, ascending.
    pub fn dates_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        if start >= end {
            return Vec::new();
        }
        self.by_date
            .range((Bound::Excluded(start), Bound::Excluded(end)))
            .map(|(date, _)| *date)
            .collect()
    }

    /// All records in the order they were first seen.
    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
