//! The remote transaction store.
//!
//! The rest of the crate talks to the store only through the `Store` trait. `Mode` decides whether
//! the real HTTP store or the file-backed test store is used.

mod http_store;
mod test_store;

use crate::model::{RecordId, Transaction, TransactionFields};
use crate::Config;
use anyhow::Result;
use tracing::debug;

pub(crate) use http_store::HttpStore;
pub use test_store::TestStore;

/// The environment variable that, when set and non-empty, selects `Mode::Test`.
pub const TEST_MODE_ENV: &str = "LEDGER_IN_TEST_MODE";

/// Which `Store` implementation to use.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Mode {
    /// Talk to the configured store URL over HTTP.
    #[default]
    Http,
    /// Use records kept in a JSON file in the ledger home directory.
    Test,
}

impl Mode {
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(v) if !v.is_empty() => Mode::Test,
            _ => Mode::Http,
        }
    }
}

/// The four operations the ledger needs from a transaction store. Each call is a single request
/// with no retry.
#[async_trait::async_trait]
pub trait Store {
    /// Fetches every transaction.
    async fn fetch_all(&mut self) -> Result<Vec<Transaction>>;

    /// Creates a transaction. The store assigns its id.
    async fn create(&mut self, fields: &TransactionFields) -> Result<Transaction>;

    /// Replaces the transaction with `id`.
    async fn update(&mut self, id: &RecordId, fields: &TransactionFields) -> Result<Transaction>;

    /// Deletes the transaction with `id`.
    async fn delete(&mut self, id: &RecordId) -> Result<()>;
}

/// Creates the `Store` selected by `mode`.
pub async fn store(config: &Config, mode: Mode) -> Result<Box<dyn Store + Send>> {
    debug!("Using {mode:?} store");
    Ok(match mode {
        Mode::Http => Box::new(HttpStore::new(config.store_url().clone())?),
        Mode::Test => Box::new(TestStore::load(config.test_store_path()).await?),
    })
}
