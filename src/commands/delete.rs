//! Delete command handler.

use crate::args::DeleteArgs;
use crate::commands::{describe, Out};
use crate::model::RecordId;
use crate::session::{Confirm, Session};
use crate::{Config, Mode, Result};
use std::io::{BufRead, Write};
use tracing::warn;

/// Deletes the transaction with the given id after asking `confirm`, unless `--yes` was given.
///
/// Declining is not an error: nothing is sent and the returned `Out` has no structure.
///
/// # Errors
/// - `ErrorType::IdentifierNotFound` if no loaded transaction has the id.
/// - `ErrorType::Mutation` if the store rejects the request.
pub async fn delete<C>(
    config: Config,
    mode: Mode,
    args: &DeleteArgs,
    confirm: C,
) -> Result<Out<RecordId>>
where
    C: Confirm,
{
    let mut session = Session::open(&config, mode).await?;
    let record = session.find(args.id())?.clone();
    let description = describe(&record, config.currency());
    let deleted = if args.yes() {
        session.delete(&record, |_: &str| true).await?
    } else {
        session.delete(&record, confirm).await?
    };
    if deleted {
        Ok(Out::new(
            format!("Deleted transaction {description}"),
            args.id().clone(),
        ))
    } else {
        Ok(Out::new_message("Nothing was deleted"))
    }
}

/// Asks for confirmation on a terminal, accepting `y` or `yes`.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R, W> Prompt<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R, W> Confirm for Prompt<R, W>
where
    R: BufRead,
    W: Write,
{
    fn confirm(&mut self, message: &str) -> bool {
        if let Err(e) = write!(self.output, "{message} [y/N] ").and_then(|_| self.output.flush()) {
            warn!("Unable to show the confirmation prompt: {e}");
            return false;
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(_) => matches!(line.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                warn!("Unable to read the confirmation: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Identifiable;
    use crate::test::TestEnv;
    use std::io::Cursor;

    fn prompt(answer: &str) -> Prompt<Cursor<Vec<u8>>, Vec<u8>> {
        Prompt::new(Cursor::new(answer.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_prompt_answers() {
        assert!(prompt("y\n").confirm("Delete?"));
        assert!(prompt(" YES \n").confirm("Delete?"));
        assert!(!prompt("\n").confirm("Delete?"));
        assert!(!prompt("").confirm("Delete?"));
        assert!(!prompt("nope\n").confirm("Delete?"));

        let mut p = prompt("n\n");
        p.confirm("Delete this transaction?");
        assert_eq!(
            String::from_utf8(p.output).unwrap(),
            "Delete this transaction? [y/N] "
        );
    }

    #[tokio::test]
    async fn test_delete_confirmed() {
        let env = TestEnv::new().await;
        let args = DeleteArgs::new(RecordId::Number(2), false);
        let out = delete(env.config(), env.mode(), &args, prompt("y\n"))
            .await
            .unwrap();
        assert_eq!(
            out.message(),
            "Deleted transaction #2 2024-01-03 expense Rent RM 1500.00"
        );
        let stored = env.transactions().await;
        assert_eq!(stored.len(), 12);
        assert!(!stored
            .iter()
            .any(|t| t.record_id() == Some(&RecordId::Number(2))));
    }

    #[tokio::test]
    async fn test_delete_declined() {
        let env = TestEnv::new().await;
        let args = DeleteArgs::new(RecordId::Number(2), false);
        let out = delete(env.config(), env.mode(), &args, prompt("n\n"))
            .await
            .unwrap();
        assert!(out.structure().is_none());
        assert_eq!(env.transactions().await.len(), 13);
    }

    #[tokio::test]
    async fn test_delete_yes_skips_prompt() {
        let env = TestEnv::new().await;
        let args = DeleteArgs::new(RecordId::Number(13), true);
        let out = delete(env.config(), env.mode(), &args, prompt(""))
            .await
            .unwrap();
        assert_eq!(out.structure(), Some(&RecordId::Number(13)));
        assert_eq!(env.transactions().await.len(), 12);
    }
}
