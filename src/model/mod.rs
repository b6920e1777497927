//! Types that represent the core data model, such as `Transaction` and `Amount`.
mod amount;
mod form;
mod id;
mod legacy;
mod transaction;

pub use amount::{Amount, AmountError};
pub use form::{TransactionFields, TransactionForm, MISSING_FIELDS};
pub use id::{Identifiable, RecordId};
pub use transaction::{Transaction, TransactionType};

/// Decodes every record fetched from the store.
pub fn transactions_from_records(records: &[serde_json::Value]) -> Vec<Transaction> {
    records.iter().map(Transaction::from_record).collect()
}
