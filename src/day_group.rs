//! Buckets a week's transactions by calendar day for display.

use crate::model::Transaction;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// The transactions of one calendar day.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct DayGroup {
    date: NaiveDate,
    /// e.g. `Jan 29, 2024`
    label: String,
    /// e.g. `Monday`
    weekday: String,
    transactions: Vec<Transaction>,
}

impl DayGroup {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            label: date.format("%b %d, %Y").to_string(),
            weekday: date.format("%A").to_string(),
            transactions: Vec::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn weekday(&self) -> &str {
        &self.weekday
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }
}

/// Groups transactions by date, most recent day first. Within a day the transactions keep the
/// order in which they were encountered. Undated transactions are dropped.
pub fn group_by_day<'a, I>(transactions: I) -> Vec<DayGroup>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut days: BTreeMap<NaiveDate, DayGroup> = BTreeMap::new();
    for t in transactions {
        if let Some(date) = t.date() {
            days.entry(date)
                .or_insert_with(|| DayGroup::new(date))
                .transactions
                .push(t.clone());
        }
    }
    days.into_values().rev().collect()
}

/// Which day groups are collapsed in the display.
///
/// Every group starts collapsed. Toggles survive re-rendering, but all groups collapse again when
/// the selected segment or the number of groups changes.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct CollapsedDays {
    scope: Option<(NaiveDate, usize)>,
    expanded: BTreeMap<NaiveDate, bool>,
}

impl CollapsedDays {
    /// Brings the state in line with the groups currently displayed for `segment_key`.
    pub fn sync(&mut self, segment_key: NaiveDate, groups: &[DayGroup]) {
        let scope = Some((segment_key, groups.len()));
        if self.scope != scope {
            self.scope = scope;
            self.expanded = groups.iter().map(|g| (g.date, false)).collect();
        }
    }

    pub fn is_collapsed(&self, date: NaiveDate) -> bool {
        !self.expanded.get(&date).copied().unwrap_or(false)
    }

    pub fn toggle(&mut self, date: NaiveDate) {
        let entry = self.expanded.entry(date).or_insert(false);
        *entry = !*entry;
    }

    /// Expands every group of the current scope.
    pub fn expand_all(&mut self) {
        self.expanded.values_mut().for_each(|v| *v = true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::parse_key;
    use serde_json::json;

    fn d(s: &str) -> NaiveDate {
        parse_key(s).unwrap()
    }

    fn tx(date: Option<&str>, category: &str) -> Transaction {
        Transaction::from_record(&json!({
            "date": date,
            "type": "expense",
            "category": category,
            "amount": 1,
        }))
    }

    #[test]
    fn test_groups_most_recent_first_in_encounter_order() {
        let txs = vec![
            tx(Some("2024-01-29"), "a"),
            tx(Some("2024-01-31"), "b"),
            tx(Some("2024-01-29"), "c"),
            tx(None, "d"),
            tx(Some("2024-01-30"), "e"),
        ];
        let groups = group_by_day(&txs);
        let dates: Vec<_> = groups.iter().map(|g| g.date()).collect();
        assert_eq!(dates, vec![d("2024-01-31"), d("2024-01-30"), d("2024-01-29")]);

        let monday: Vec<_> = groups[2]
            .transactions()
            .iter()
            .map(|t| t.category())
            .collect();
        assert_eq!(monday, vec!["a", "c"]);
    }

    #[test]
    fn test_labels() {
        let groups = group_by_day(&[tx(Some("2024-01-29"), "a")]);
        assert_eq!(groups[0].label(), "Jan 29, 2024");
        assert_eq!(groups[0].weekday(), "Monday");
    }

    #[test]
    fn test_empty() {
        assert!(group_by_day(&Vec::<Transaction>::new()).is_empty());
    }

    #[test]
    fn test_collapsed_by_default_and_toggle() {
        let groups = group_by_day(&[tx(Some("2024-01-29"), "a"), tx(Some("2024-01-30"), "b")]);
        let mut state = CollapsedDays::default();
        state.sync(d("2024-01-29"), &groups);
        assert!(state.is_collapsed(d("2024-01-29")));
        assert!(state.is_collapsed(d("2024-01-30")));

        state.toggle(d("2024-01-30"));
        assert!(!state.is_collapsed(d("2024-01-30")));

        // Same scope: the toggle survives.
        state.sync(d("2024-01-29"), &groups);
        assert!(!state.is_collapsed(d("2024-01-30")));
    }

    #[test]
    fn test_reset_on_scope_change() {
        let groups = group_by_day(&[tx(Some("2024-01-29"), "a"), tx(Some("2024-01-30"), "b")]);
        let mut state = CollapsedDays::default();
        state.sync(d("2024-01-29"), &groups);
        state.expand_all();
        assert!(!state.is_collapsed(d("2024-01-29")));

        // A new group appears: everything collapses again.
        let more = group_by_day(&[
            tx(Some("2024-01-29"), "a"),
            tx(Some("2024-01-30"), "b"),
            tx(Some("2024-01-31"), "c"),
        ]);
        state.sync(d("2024-01-29"), &more);
        assert!(state.is_collapsed(d("2024-01-29")));

        state.expand_all();
        state.sync(d("2024-02-01"), &more);
        assert!(state.is_collapsed(d("2024-01-31")));
    }
}
