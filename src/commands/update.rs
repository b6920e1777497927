//! Update command handler.

use crate::args::UpdateArgs;
use crate::commands::{describe, Out};
use crate::model::{Transaction, TransactionForm};
use crate::session::Session;
use crate::{Config, Mode, Result};

/// Changes the transaction with the given id. The current record is pre-filled into a form, the
/// fields given on the command line are overwritten, and the result replaces the record.
///
/// # Errors
/// - `ErrorType::IdentifierNotFound` if no loaded transaction has the id.
/// - `ErrorType::Validation` if the edited form is incomplete or invalid.
/// - `ErrorType::Mutation` if the store rejects the request.
pub async fn update(config: Config, mode: Mode, args: &UpdateArgs) -> Result<Out<Transaction>> {
    let mut session = Session::open(&config, mode).await?;
    let record = session.find(args.id())?.clone();
    let mut form = TransactionForm::from_transaction(&record);
    args.apply(&mut form);
    let updated = session.update(&record, &form).await?;
    let message = format!(
        "Updated transaction {}",
        describe(&updated, config.currency())
    );
    Ok(Out::new(message, updated))
}
