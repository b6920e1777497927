//! The selected week segment and everything derived from it.
//!
//! All derived state is a pure function of the transaction set and the selected key, and is
//! recomputed whenever either changes.

use crate::aggregate::Summary;
use crate::calendar::{self, WeekSegment};
use crate::day_group::{group_by_day, DayGroup};
use crate::model::Transaction;
use crate::week_index::{WeekIndex, WeekPart};
use chrono::NaiveDate;
use serde::Serialize;

/// Holds the key of the selected week segment.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Selection {
    key: NaiveDate,
}

impl Selection {
    pub fn new(key: NaiveDate) -> Self {
        Self { key }
    }

    /// The initial selection: the segment starting the natural week that contains `today`.
    pub fn current(today: NaiveDate) -> Self {
        Self::new(calendar::segment_for(today).key())
    }

    pub fn key(&self) -> NaiveDate {
        self.key
    }

    pub fn select(&mut self, key: NaiveDate) {
        self.key = key;
    }

    /// The date range of the selected segment.
    pub fn active_segment(&self, index: &WeekIndex) -> WeekSegment {
        index.resolve(self.key)
    }
}

/// One choice in the week selector.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct WeekOption {
    pub key: NaiveDate,
    pub segment: WeekSegment,
    pub part: WeekPart,
    pub label: String,
}

impl WeekOption {
    /// All options of an index, most recent first.
    pub fn list(index: &WeekIndex) -> Vec<WeekOption> {
        index
            .entries()
            .map(|entry| WeekOption {
                key: entry.key(),
                segment: entry.segment(),
                part: entry.part(),
                label: entry.segment().label(),
            })
            .collect()
    }
}

/// Everything needed to display the selected week.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct WeekView {
    pub key: NaiveDate,
    pub segment: WeekSegment,
    pub label: String,
    pub weeks: Vec<WeekOption>,
    pub summary: Summary,
    pub days: Vec<DayGroup>,
}

impl WeekView {
    pub fn derive(transactions: &[Transaction], selection: &Selection) -> Self {
        let index = WeekIndex::build(transactions);
        let segment = selection.active_segment(&index);
        let weekly = transactions
            .iter()
            .filter(|t| t.date().is_some_and(|d| segment.contains(d)));
        Self {
            key: selection.key(),
            segment,
            label: segment.label(),
            weeks: WeekOption::list(&index),
            summary: Summary::compute(transactions, segment),
            days: group_by_day(weekly),
        }
    }

    /// The number of transactions in the selected segment.
    pub fn transaction_count(&self) -> usize {
        self.days.iter().map(|d| d.transactions().len()).sum()
    }
}
