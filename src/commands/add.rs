use crate::args::AddArgs;
use crate::commands::{describe, Out};
use crate::model::Transaction;
use crate::session::Session;
use crate::{Config, Mode, Result};

/// Adds a transaction to the store and reloads the transaction set.
///
/// # Errors
/// - `ErrorType::Validation` if the date, category or amount is missing or cannot be parsed. No
///   request is sent in that case.
/// - `ErrorType::Mutation` if the store rejects the request.
pub async fn add(config: Config, mode: Mode, args: &AddArgs) -> Result<Out<Transaction>> {
    let mut session = Session::open(&config, mode).await?;
    let created = session.add(&args.form()).await?;
    let message = format!(
        "Added transaction {}",
        describe(&created, config.currency())
    );
    Ok(Out::new(message, created))
}
