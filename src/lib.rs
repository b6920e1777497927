//! A client for a personal income and expense ledger kept in a remote store.
//!
//! Transactions are grouped into week segments: Monday-to-Sunday weeks, split in two where a week
//! crosses a month boundary. For a selected segment the crate derives the monthly totals, the
//! weekly expense and the transactions grouped by day.

pub mod aggregate;
pub mod api;
pub mod args;
pub mod calendar;
pub mod commands;
mod config;
pub mod day_group;
mod error;
pub mod model;
pub mod selection;
pub mod session;
mod utils;
pub mod week_index;

pub use api::Mode;
pub use config::Config;
pub use error::{Error, ErrorType, IntoResult, Result};
