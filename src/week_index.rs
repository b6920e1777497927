//! Derives the set of week segments that contain at least one transaction, keyed by segment start
//! date and presented most recent first.

use crate::calendar::{self, Segmentation, WeekSegment};
use crate::model::Transaction;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Which part of its natural week a segment covers.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekPart {
    /// The whole natural week.
    Whole,
    /// Monday up to the last day of the month.
    FirstHalf,
    /// The 1st of the next month up to the original Sunday.
    SecondHalf,
}

serde_plain::derive_display_from_serialize!(WeekPart);

/// A single entry of the index.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct IndexEntry {
    segment: WeekSegment,
    part: WeekPart,
}

impl IndexEntry {
    pub fn segment(&self) -> WeekSegment {
        self.segment
    }

    pub fn part(&self) -> WeekPart {
        self.part
    }

    pub fn key(&self) -> NaiveDate {
        self.segment.key()
    }
}

/// All week segments present in a transaction set.
///
/// Both halves of a split week are indexed even if only one of them holds a transaction. Each
/// entry records which half it is, so resolving a key never has to guess from the date.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct WeekIndex {
    entries: BTreeMap<NaiveDate, IndexEntry>,
}

impl WeekIndex {
    /// Builds the index from every transaction that has a date. Undated transactions are skipped.
    pub fn build<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut entries = BTreeMap::new();
        let mut skipped = 0usize;
        for date in transactions.into_iter().map(Transaction::date) {
            let Some(date) = date else {
                skipped += 1;
                continue;
            };
            match calendar::segmentation_of(date) {
                Segmentation::Whole(segment) => {
                    insert(&mut entries, segment, WeekPart::Whole);
                }
                Segmentation::Split(first, second) => {
                    insert(&mut entries, first, WeekPart::FirstHalf);
                    insert(&mut entries, second, WeekPart::SecondHalf);
                }
            }
        }
        debug!(
            "Built week index with {} segments, skipped {skipped} undated transactions",
            entries.len()
        );
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: NaiveDate) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn get(&self, key: NaiveDate) -> Option<&IndexEntry> {
        self.entries.get(&key)
    }

    /// Keys, most recent first.
    pub fn keys(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.entries.keys().rev().copied()
    }

    /// Entries, most recent first.
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> + '_ {
        self.entries.values().rev()
    }

    /// Returns the segment for `key`. Keys recorded in the index use the recorded segment; any
    /// other key (e.g. a week with no transactions) is reconstructed from the calendar.
    pub fn resolve(&self, key: NaiveDate) -> WeekSegment {
        match self.entries.get(&key) {
            Some(entry) => entry.segment,
            None => calendar::resolve_segment(key),
        }
    }
}

fn insert(entries: &mut BTreeMap<NaiveDate, IndexEntry>, segment: WeekSegment, part: WeekPart) {
    // Duplicates carry identical values, so overwriting is harmless.
    entries.insert(segment.key(), IndexEntry { segment, part });
}
