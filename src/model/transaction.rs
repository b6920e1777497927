use crate::model::{legacy, Amount, Identifiable, RecordId};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

impl TransactionType {
    /// Case-insensitive parse. Returns `None` for anything other than income or expense.
    pub fn parse(s: &str) -> Option<Self> {
        s.trim().to_lowercase().parse().ok()
    }
}

/// A single income or expense record as fetched from the store.
///
/// Transactions are immutable values. An edit replaces the record in the store and the whole set
/// is fetched again.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
pub struct Transaction {
    id: Option<RecordId>,
    date: Option<NaiveDate>,
    #[serde(rename = "type")]
    kind: Option<TransactionType>,
    category: String,
    amount: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

impl Transaction {
    pub fn new(
        id: Option<RecordId>,
        date: Option<NaiveDate>,
        kind: Option<TransactionType>,
        category: impl Into<String>,
        amount: Amount,
        note: Option<String>,
    ) -> Self {
        Self {
            id,
            date,
            kind,
            category: category.into(),
            amount,
            note,
        }
    }

    /// Decodes a record of loosely-defined shape. This never fails: fields that are missing or
    /// cannot be understood are left empty so that the record is simply excluded from whatever
    /// needs them.
    pub fn from_record(record: &Value) -> Self {
        let id = typed_id(record).or_else(|| {
            let found = legacy::find_id(record);
            if found.is_some() {
                debug!("Using a legacy identifier field for record {record}");
            }
            found
        });
        let map = match record {
            Value::Object(map) => map,
            _ => {
                warn!("Record is not a JSON object, only its identifier can be read: {record}");
                return Self {
                    id,
                    ..Self::default()
                };
            }
        };
        Self {
            id,
            date: map.get("date").and_then(parse_date),
            kind: str_field(map, "type").and_then(TransactionType::parse),
            category: str_field(map, "category").unwrap_or_default().to_string(),
            amount: Amount::from_json_lenient(map.get("amount")),
            note: str_field(map, "note")
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn kind(&self) -> Option<TransactionType> {
        self.kind
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn is(&self, kind: TransactionType) -> bool {
        self.kind == Some(kind)
    }
}

impl Identifiable for Transaction {
    fn record_id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

/// A record whose `id` field is present takes it as is.
fn typed_id(record: &Value) -> Option<RecordId> {
    record
        .as_object()
        .and_then(|map| map.get("id"))
        .and_then(RecordId::from_json)
}

fn str_field<'a>(map: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    map.get(name).and_then(Value::as_str)
}

/// Accepts `YYYY-MM-DD`, or a date-time (RFC 3339 or naive ISO) whose date part is taken.
pub(crate) fn parse_date(value: &Value) -> Option<NaiveDate> {
    let s = value.as_str()?.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = s.parse::<NaiveDateTime>() {
        return Some(dt.date());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::str::FromStr;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_from_record_full() {
        let t = Transaction::from_record(&json!({
            "id": 12,
            "date": "2024-01-29",
            "type": "Expense",
            "category": "Food",
            "amount": 50,
            "note": "lunch"
        }));
        assert_eq!(t.record_id(), Some(&RecordId::Number(12)));
        assert_eq!(t.date(), Some(d("2024-01-29")));
        assert_eq!(t.kind(), Some(TransactionType::Expense));
        assert_eq!(t.category(), "Food");
        assert_eq!(t.amount().value(), Decimal::from(50));
        assert_eq!(t.note(), Some("lunch"));
    }

    #[test]
    fn test_from_record_datetime() {
        let t = Transaction::from_record(&json!({"date": "2024-02-02T00:00:00.000Z"}));
        assert_eq!(t.date(), Some(d("2024-02-02")));
        let t = Transaction::from_record(&json!({"date": "2024-02-02T13:45:00"}));
        assert_eq!(t.date(), Some(d("2024-02-02")));
    }

    #[test]
    fn test_from_record_bad_fields() {
        let t = Transaction::from_record(&json!({
            "date": null,
            "type": "transfer",
            "amount": "lots"
        }));
        assert_eq!(t.date(), None);
        assert_eq!(t.kind(), None);
        assert!(t.amount().is_zero());
        assert_eq!(t.category(), "");
        assert_eq!(t.note(), None);
        assert_eq!(t.record_id(), None);

        let t = Transaction::from_record(&json!({"date": "yesterday"}));
        assert_eq!(t.date(), None);
    }

    #[test]
    fn test_from_record_legacy_id() {
        let t = Transaction::from_record(&json!({"rowNumber": 8, "date": "2024-01-01"}));
        assert_eq!(t.record_id(), Some(&RecordId::Number(8)));
    }

    #[test]
    fn test_from_record_array() {
        let t = Transaction::from_record(&json!(["r-1", "2024-01-01"]));
        assert_eq!(t.record_id(), Some(&RecordId::Text("r-1".into())));
        assert_eq!(t.date(), None);
    }

    #[test]
    fn test_type_parse_case_insensitive() {
        assert_eq!(
            TransactionType::parse("INCOME"),
            Some(TransactionType::Income)
        );
        assert_eq!(
            TransactionType::parse(" expense "),
            Some(TransactionType::Expense)
        );
        assert_eq!(TransactionType::parse("refund"), None);
        assert_eq!(TransactionType::Income.to_string(), "income");
    }

    #[test]
    fn test_amount_string() {
        let t = Transaction::from_record(&json!({"amount": "19.99"}));
        assert_eq!(t.amount().value(), Decimal::from_str("19.99").unwrap());
    }
}
