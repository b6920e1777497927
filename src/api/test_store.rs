//! Implements the `Store` trait using records held in a JSON file for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without a remote store.

use crate::api::Store;
use crate::model::{
    transactions_from_records, Identifiable, RecordId, Transaction, TransactionFields,
};
use crate::utils;
use anyhow::{bail, Context, Result};
use serde_json::{json, Map, Value};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// An implementation of the `Store` trait that does not talk to a server. It holds raw JSON records
/// and, when given a path, writes them back after every mutation. By default, it is seeded with
/// some existing data.
pub struct TestStore {
    path: Option<PathBuf>,
    records: Vec<Value>,
}

impl TestStore {
    /// Create a new in-memory `TestStore` holding `records`.
    pub fn new(records: Vec<Value>) -> Self {
        Self {
            path: None,
            records,
        }
    }

    /// Opens the store kept at `path`. If the file does not exist yet it is created with the seed
    /// data.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = if path.is_file() {
            utils::deserialize(&path).await?
        } else {
            debug!("Seeding the test store at {}", path.display());
            seed_records()?
        };
        let store = Self {
            path: Some(path),
            records,
        };
        store.save().await?;
        Ok(store)
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let data =
            serde_json::to_string_pretty(&self.records).context("Unable to serialize records")?;
        utils::write(path, data).await
    }

    fn position(&self, id: &RecordId) -> Result<usize> {
        self.records
            .iter()
            .position(|r| Transaction::from_record(r).record_id() == Some(id))
            .with_context(|| format!("No record with id '{id}'"))
    }
}

#[async_trait::async_trait]
impl Store for TestStore {
    async fn fetch_all(&mut self) -> Result<Vec<Transaction>> {
        Ok(transactions_from_records(&self.records))
    }

    async fn create(&mut self, fields: &TransactionFields) -> Result<Transaction> {
        let id = uuid::Uuid::new_v4().to_string();
        let record = to_record(json!(id), fields)?;
        trace!("Creating test record {record}");
        self.records.push(record.clone());
        self.save().await?;
        Ok(Transaction::from_record(&record))
    }

    async fn update(&mut self, id: &RecordId, fields: &TransactionFields) -> Result<Transaction> {
        let i = self.position(id)?;
        let id_value = serde_json::to_value(id).context("Unable to serialize id")?;
        let record = to_record(id_value, fields)?;
        trace!("Replacing test record {} with {record}", self.records[i]);
        self.records[i] = record.clone();
        self.save().await?;
        Ok(Transaction::from_record(&record))
    }

    async fn delete(&mut self, id: &RecordId) -> Result<()> {
        let i = self.position(id)?;
        let removed = self.records.remove(i);
        trace!("Deleted test record {removed}");
        self.save().await
    }
}

impl Default for TestStore {
    /// Loads seed data from this module into memory.
    fn default() -> Self {
        // The seed data is a constant that is covered by tests.
        Self::new(seed_records().unwrap_or_default())
    }
}

fn to_record(id: Value, fields: &TransactionFields) -> Result<Value> {
    let mut record = match serde_json::to_value(fields).context("Unable to serialize fields")? {
        Value::Object(map) => map,
        other => bail!("Expected transaction fields to serialize as an object, got {other}"),
    };
    record.insert("id".to_string(), id);
    Ok(Value::Object(record))
}

/// Turns the seed CSV into JSON records. Numeric-looking ids and amounts become JSON numbers, an
/// empty cell is left out of the record.
fn seed_records() -> Result<Vec<Value>> {
    let rows = load_csv(TRANSACTION_DATA)?;
    let mut rows = rows.into_iter();
    let header = rows.next().context("Seed data has no header row")?;
    let records = rows
        .map(|row| {
            let map: Map<String, Value> = header
                .iter()
                .zip(row)
                .filter(|(_, cell)| !cell.is_empty())
                .map(|(name, cell)| (name.clone(), seed_value(name, cell)))
                .collect();
            Value::Object(map)
        })
        .collect();
    Ok(records)
}

fn seed_value(name: &str, cell: String) -> Value {
    if name == "id" || name == "amount" {
        if let Ok(n) = cell.parse::<i64>() {
            return json!(n);
        }
        if let Ok(f) = cell.parse::<f64>() {
            return json!(f);
        }
    }
    Value::String(cell)
}

/// Loads data from a CSV-formatted string.
fn load_csv(csv_data: &str) -> Result<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(Cursor::new(csv_data.as_bytes()));

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }
    Ok(rows)
}

/// Seed transaction data. The week of Jan 29, 2024 crosses into February.
const TRANSACTION_DATA: &str = r##"id,date,type,category,amount,note
1,2024-01-02,income,Salary,4200,January salary
2,2024-01-03,expense,Rent,1500,
3,2024-01-09,expense,Groceries,86.40,Weekly shop
4,2024-01-12,expense,Transport,25,Fuel
5,2024-01-17,expense,Dining,42.90,Dinner with friends
6,2024-01-23,expense,Groceries,73.15,
7,2024-01-29,expense,Groceries,50,
8,2024-01-31,expense,Utilities,120.35,Electricity
9,2024-02-01,income,Salary,4200,February salary
10,2024-02-02,expense,Dining,30,
11,2024-02-04,expense,Transport,18.60,Parking
12,2024-02-06,expense,Rent,1500,
13,2024-02-08,expense,Groceries,12.50,Bakery
"##;
