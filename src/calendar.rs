//! Partitions the calendar into Monday-start weeks and splits any week that crosses a month
//! boundary into two segments bounded by the month edge.
//!
//! A segment is identified by its start date (its key). Keys are either Mondays, or the 1st of a
//! month that is not itself a Monday. The latter is always the second half of a split week: if the
//! 1st is a Monday the natural week starts there and nothing was split.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The date format used for segment keys. Keys in this format sort chronologically as strings.
pub const KEY_FORMAT: &str = "%Y-%m-%d";

/// The Monday-through-Sunday span containing a date.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct NaturalWeek {
    pub monday: NaiveDate,
    pub sunday: NaiveDate,
}

impl NaturalWeek {
    pub fn crosses_month(&self) -> bool {
        self.monday.month() != self.sunday.month()
    }
}

/// A contiguous, inclusive date range that never spans two calendar months.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct WeekSegment {
    start: NaiveDate,
    end: NaiveDate,
}

impl WeekSegment {
    fn new(start: NaiveDate, end: NaiveDate) -> Self {
        debug_assert!(start <= end);
        debug_assert_eq!((start.year(), start.month()), (end.year(), end.month()));
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// The key identifying this segment, which is its start date.
    pub fn key(&self) -> NaiveDate {
        self.start
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The year and month that this segment lies in.
    pub fn year_month(&self) -> (i32, u32) {
        (self.start.year(), self.start.month())
    }

    /// Human-readable range, e.g. `Jan 29 - Jan 31, 2024`.
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%b %d"),
            self.end.format("%b %d, %Y")
        )
    }
}

impl Display for WeekSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}..={}",
            self.start.format(KEY_FORMAT),
            self.end.format(KEY_FORMAT)
        )
    }
}

/// How a natural week maps onto segments.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Segmentation {
    /// The natural week lies within one month.
    Whole(WeekSegment),
    /// The natural week crosses a month boundary. The first segment ends on the last day of the
    /// first month and the second begins the following day.
    Split(WeekSegment, WeekSegment),
}

/// Returns the natural week containing `date`. Weeks always start on Monday regardless of locale.
///
/// At the edges of the representable range the week is clipped to `NaiveDate::MIN` or
/// `NaiveDate::MAX`. Both lie on a year boundary, so clipping never makes a week cross a month.
pub fn natural_week_of(date: NaiveDate) -> NaturalWeek {
    let monday = date
        .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
        .unwrap_or(NaiveDate::MIN);
    NaturalWeek {
        monday,
        sunday: monday
            .checked_add_days(Days::new(6))
            .unwrap_or(NaiveDate::MAX),
    }
}

/// Returns the last day of the month that `date` is in.
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = match date.month() {
        12 => (date.year() + 1, 1),
        m => (date.year(), m + 1),
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        // Only reachable at the very end of chrono's representable range.
        .unwrap_or(NaiveDate::MAX)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Splits the natural week containing `date` into one or two segments.
pub fn segmentation_of(date: NaiveDate) -> Segmentation {
    let week = natural_week_of(date);
    if !week.crosses_month() {
        return Segmentation::Whole(WeekSegment::new(week.monday, week.sunday));
    }
    Segmentation::Split(
        WeekSegment::new(week.monday, end_of_month(week.monday)),
        WeekSegment::new(first_of_month(week.sunday), week.sunday),
    )
}

/// Returns the segment that starts the natural week containing `date`: the whole week, or its
/// first half when the week crosses a month boundary. The second half of a split week is only
/// reachable through `resolve_segment` with its own key.
pub fn segment_for(date: NaiveDate) -> WeekSegment {
    match segmentation_of(date) {
        Segmentation::Whole(segment) | Segmentation::Split(segment, _) => segment,
    }
}

/// Returns the segment that actually contains `date`.
pub fn containing_segment(date: NaiveDate) -> WeekSegment {
    match segmentation_of(date) {
        Segmentation::Whole(segment) => segment,
        Segmentation::Split(first, second) => {
            if first.contains(date) {
                first
            } else {
                second
            }
        }
    }
}

/// True if a segment starting at `key` must be the second half of a split week.
pub fn is_second_half_key(key: NaiveDate) -> bool {
    key.day() == 1 && key.weekday() != Weekday::Mon
}

/// Reconstructs a segment from its key.
///
/// A key on the 1st of a month that is not a Monday is the second half of a split week and runs
/// to the Sunday of the natural week it came from. Any other key runs six days forward, clipped
/// to the end of its month.
pub fn resolve_segment(key: NaiveDate) -> WeekSegment {
    if is_second_half_key(key) {
        // A 1st that is not a Monday shares its natural week with the day before it.
        return WeekSegment::new(key, natural_week_of(key).sunday);
    }
    let end = key
        .checked_add_days(Days::new(6))
        .unwrap_or(NaiveDate::MAX)
        .min(end_of_month(key));
    WeekSegment::new(key, end)
}

/// Parses a segment key in `YYYY-MM-DD` form.
pub fn parse_key(s: &str) -> chrono::ParseResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), KEY_FORMAT)
}
