//! The client controller.
//!
//! A `Session` owns the store and the last transaction set that was loaded successfully. Every
//! mutation is followed by a full reload instead of a local merge, and a failure never touches the
//! transactions already held.

use crate::api::{self, Mode, Store};
use crate::error::IntoResult;
use crate::model::{Identifiable, RecordId, Transaction, TransactionFields, TransactionForm};
use crate::{Config, Error, ErrorType, Result};
use anyhow::Context;
use tracing::{debug, error, trace};

/// The message used when a record has no identifier the store would understand.
pub const ID_NOT_FOUND: &str = "Transaction ID not found";

/// Asks the user to confirm a destructive operation.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

pub struct Session {
    store: Box<dyn Store + Send>,
    transactions: Vec<Transaction>,
    loading: bool,
    pending: bool,
}

impl Session {
    /// Creates a session over `store`. Nothing is loaded until `reload` is called.
    pub fn new(store: Box<dyn Store + Send>) -> Self {
        Self {
            store,
            transactions: Vec::new(),
            loading: false,
            pending: false,
        }
    }

    /// Creates the store selected by `mode` and loads the transaction set.
    pub async fn open(config: &Config, mode: Mode) -> Result<Self> {
        let store = api::store(config, mode)
            .await
            .pub_result(ErrorType::Config)?;
        let mut session = Self::new(store);
        session.reload().await?;
        Ok(session)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// True while a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True while a create, update or delete is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Finds a loaded transaction by its identifier.
    pub fn find(&self, id: &RecordId) -> Result<&Transaction> {
        self.transactions
            .iter()
            .find(|t| t.record_id() == Some(id))
            .ok_or_else(|| {
                Error::msg(
                    ErrorType::IdentifierNotFound,
                    format!("No transaction with id '{id}'"),
                )
            })
    }

    /// Fetches the whole transaction set. On failure the previously loaded set is kept.
    pub async fn reload(&mut self) -> Result<()> {
        trace!("Reloading transactions");
        self.loading = true;
        let result = self.store.fetch_all().await;
        self.loading = false;
        match result {
            Ok(transactions) => {
                debug!("Loaded {} transactions", transactions.len());
                self.transactions = transactions;
                Ok(())
            }
            Err(e) => {
                error!("Error loading data: {e:#}");
                Err(e)
                    .context("Error loading data")
                    .pub_result(ErrorType::Load)
            }
        }
    }

    /// Creates a transaction from `form`, then reloads.
    pub async fn add(&mut self, form: &TransactionForm) -> Result<Transaction> {
        let fields = form.validate().pub_result(ErrorType::Validation)?;
        self.pending = true;
        let result = self.store.create(&fields).await;
        self.pending = false;
        let created = mutation_result(result, "Error adding transaction")?;
        self.reload().await?;
        Ok(created)
    }

    /// Replaces `record` with the contents of `form`, then reloads.
    pub async fn update(
        &mut self,
        record: &Transaction,
        form: &TransactionForm,
    ) -> Result<Transaction> {
        let fields = form.validate().pub_result(ErrorType::Validation)?;
        let id = require_id(record)?;
        self.send_update(&id, &fields).await
    }

    /// Deletes `record` once `confirm` agrees, then reloads. Returns `false` when the user
    /// declined, in which case nothing was sent.
    pub async fn delete<C>(&mut self, record: &Transaction, mut confirm: C) -> Result<bool>
    where
        C: Confirm,
    {
        let id = require_id(record)?;
        if !confirm.confirm("Delete this transaction?") {
            debug!("Deletion of {id} was not confirmed");
            return Ok(false);
        }
        self.pending = true;
        let result = self.store.delete(&id).await;
        self.pending = false;
        mutation_result(result, "Error deleting transaction")?;
        self.reload().await?;
        Ok(true)
    }

    async fn send_update(
        &mut self,
        id: &RecordId,
        fields: &TransactionFields,
    ) -> Result<Transaction> {
        self.pending = true;
        let result = self.store.update(id, fields).await;
        self.pending = false;
        let updated = mutation_result(result, "Error updating transaction")?;
        self.reload().await?;
        Ok(updated)
    }
}

fn require_id(record: &Transaction) -> Result<RecordId> {
    record
        .record_id()
        .cloned()
        .ok_or_else(|| Error::msg(ErrorType::IdentifierNotFound, ID_NOT_FOUND))
}

fn mutation_result<T>(result: anyhow::Result<T>, message: &'static str) -> Result<T> {
    result
        .inspect_err(|e| error!("{message}: {e:#}"))
        .context(message)
        .pub_result(ErrorType::Mutation)
}
