use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the ledger home directory and an initial `config.json` inside it.
///
/// # Arguments
/// - `ledger_home` - The directory that will be the root of the data directory, e.g.
///   `$HOME/ledger`
/// - `store_url` - The URL of the remote transaction store.
/// - `currency` - The prefix used when displaying money. `RM` when not given.
///
/// # Errors
/// - Returns an error if the URL is invalid or if any file operations fail.
pub async fn init(
    ledger_home: &Path,
    store_url: &str,
    currency: Option<&str>,
) -> Result<Out<()>> {
    let config = Config::create(ledger_home, store_url, currency)
        .await
        .context("Unable to create the ledger home directory and config")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the ledger config at {}",
        config.config_path().display()
    )
    .into())
}
