use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The key under which the store knows a record.
///
/// Stores hand out either integers (e.g. a spreadsheet row number) or opaque strings. The id is
/// sent back to the store in the same JSON shape it arrived in.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// Reads an id from a JSON value. Values that JavaScript would consider falsy (`null`, `false`,
    /// `0`, `""`) are not ids.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(0) => None,
                Some(i) => Some(RecordId::Number(i)),
                None => {
                    let s = n.to_string();
                    if n.as_f64() == Some(0.0) {
                        None
                    } else {
                        Some(RecordId::Text(s))
                    }
                }
            },
            Value::String(s) if !s.is_empty() => Some(RecordId::Text(s.clone())),
            Value::Bool(true) => Some(RecordId::Text("true".to_string())),
            _ => None,
        }
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Number(i) => write!(f, "{i}"),
            RecordId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for RecordId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(i) => RecordId::Number(i),
            Err(_) => RecordId::Text(s.to_string()),
        })
    }
}

/// Anything the store can address by a stable key.
pub trait Identifiable {
    /// The record's key, if it has one.
    fn record_id(&self) -> Option<&RecordId>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        assert_eq!(RecordId::from_json(&json!(12)), Some(RecordId::Number(12)));
        assert_eq!(
            RecordId::from_json(&json!("abc")),
            Some(RecordId::Text("abc".to_string()))
        );
        assert_eq!(RecordId::from_json(&json!(0)), None);
        assert_eq!(RecordId::from_json(&json!("")), None);
        assert_eq!(RecordId::from_json(&json!(null)), None);
        assert_eq!(RecordId::from_json(&json!(false)), None);
    }

    #[test]
    fn test_serializes_in_original_shape() {
        assert_eq!(serde_json::to_string(&RecordId::Number(7)).unwrap(), "7");
        assert_eq!(
            serde_json::to_string(&RecordId::Text("x1".into())).unwrap(),
            "\"x1\""
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!(RecordId::from_str("42").unwrap(), RecordId::Number(42));
        assert_eq!(
            RecordId::from_str("tx-42").unwrap(),
            RecordId::Text("tx-42".to_string())
        );
    }
}
