use crate::model::{Amount, Transaction, TransactionType};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The message shown when a required field is missing.
pub const MISSING_FIELDS: &str = "Please fill date, category, and amount.";

/// The user's input for a new or edited transaction, exactly as typed.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionForm {
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub amount: String,
    pub note: String,
}

impl Default for TransactionForm {
    fn default() -> Self {
        Self {
            date: String::new(),
            kind: TransactionType::Expense.to_string(),
            category: String::new(),
            amount: String::new(),
            note: String::new(),
        }
    }
}

impl TransactionForm {
    /// Pre-fills a form from an existing transaction for editing.
    pub fn from_transaction(t: &Transaction) -> Self {
        Self {
            date: t
                .date()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            kind: t.kind().unwrap_or(TransactionType::Expense).to_string(),
            category: t.category().to_string(),
            amount: if t.amount().is_zero() {
                String::new()
            } else {
                t.amount().value().to_string()
            },
            note: t.note().unwrap_or_default().to_string(),
        }
    }

    /// Checks the form and converts it into the fields sent to the store.
    pub fn validate(&self) -> Result<TransactionFields> {
        let date = self.date.trim();
        let category = self.category.trim();
        let amount = self.amount.trim();
        if date.is_empty() || category.is_empty() || amount.is_empty() {
            bail!(MISSING_FIELDS);
        }

        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{date}', expected YYYY-MM-DD"))?;
        let kind = TransactionType::parse(&self.kind).with_context(|| {
            format!(
                "Invalid type '{}', expected income or expense",
                self.kind.trim()
            )
        })?;
        let amount =
            Amount::from_str(amount).with_context(|| format!("Invalid amount '{amount}'"))?;
        if amount.is_negative() {
            bail!("Amount cannot be negative");
        }

        Ok(TransactionFields {
            date,
            kind,
            category: category.to_string(),
            amount,
            note: self.note.trim().to_string(),
        })
    }
}

/// Validated transaction fields in the shape the store expects.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct TransactionFields {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    pub amount: Amount,
    pub note: String,
}
