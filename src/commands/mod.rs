//! Command handlers for the ledger CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod add;
mod delete;
mod init;
mod summary;
mod update;
mod weeks;

use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use add::add;
pub use delete::{delete, Prompt};
pub use init::init;
pub use summary::summary;
pub use update::update;
pub use weeks::weeks;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Describes a transaction on one line, e.g. `#7 2024-01-29 expense Groceries RM 50.00 (note)`.
pub(crate) fn describe(t: &crate::model::Transaction, currency: &str) -> String {
    use crate::model::Identifiable;
    let mut parts = Vec::new();
    if let Some(id) = t.record_id() {
        parts.push(format!("#{id}"));
    }
    if let Some(date) = t.date() {
        parts.push(date.to_string());
    }
    if let Some(kind) = t.kind() {
        parts.push(kind.to_string());
    }
    if !t.category().is_empty() {
        parts.push(t.category().to_string());
    }
    parts.push(t.amount().display_with(currency));
    if let Some(note) = t.note() {
        parts.push(format!("({note})"));
    }
    parts.join(" ")
}
