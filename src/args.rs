//! These structs provide the CLI interface for the ledger CLI.

use crate::model::{RecordId, TransactionForm};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// ledger: A command-line client for a personal income and expense ledger.
///
/// Transactions live in a remote store reachable over HTTP. This program fetches them and shows
/// weekly spending against monthly income. Weeks start on Monday, and a week that crosses into a
/// new month is shown as two halves so that every week belongs to exactly one month.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the ledger home directory and its configuration file.
    ///
    /// This is the first command you should run. You need the URL of the endpoint that serves your
    /// transactions. By default the ledger home is $HOME/ledger, pass --ledger-home if you want it
    /// somewhere else.
    Init(InitArgs),
    /// List the weeks that have transactions, most recent first.
    Weeks,
    /// Show the monthly totals and the transactions of a week.
    Summary(SummaryArgs),
    /// Add a transaction.
    Add(AddArgs),
    /// Change an existing transaction.
    Update(UpdateArgs),
    /// Delete a transaction.
    Delete(DeleteArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where ledger configuration is held. Defaults to ~/ledger
    #[arg(long, env = "LEDGER_HOME", default_value_t = default_ledger_home())]
    ledger_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, ledger_home: PathBuf) -> Self {
        Self {
            log_level,
            ledger_home: ledger_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn ledger_home(&self) -> &DisplayPath {
        &self.ledger_home
    }
}

/// (Not shown): Args for the `ledger init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The URL of the transaction store, e.g.
    /// https://script.google.com/macros/s/AKfycbx1a7Km9FxQwRbPt82Jv/exec
    #[arg(long)]
    store_url: String,

    /// The prefix used when displaying money. Defaults to RM.
    #[arg(long)]
    currency: Option<String>,
}

impl InitArgs {
    pub fn new(store_url: impl Into<String>, currency: Option<String>) -> Self {
        Self {
            store_url: store_url.into(),
            currency,
        }
    }

    pub fn store_url(&self) -> &str {
        &self.store_url
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }
}

/// (Not shown): Args for the `ledger summary` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct SummaryArgs {
    /// The start date of the week to show, as listed by `ledger weeks`. Defaults to the current
    /// week.
    #[arg(long)]
    week: Option<NaiveDate>,

    /// Show the transactions of every day instead of only the day headers.
    #[arg(long)]
    expand: bool,
}

impl SummaryArgs {
    pub fn new(week: Option<NaiveDate>, expand: bool) -> Self {
        Self { week, expand }
    }

    pub fn week(&self) -> Option<NaiveDate> {
        self.week
    }

    pub fn expand(&self) -> bool {
        self.expand
    }
}

/// (Not shown): Args for the `ledger add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The date of the transaction as YYYY-MM-DD.
    #[arg(long)]
    date: String,

    /// Either income or expense.
    #[arg(long = "type", default_value = "expense")]
    kind: String,

    #[arg(long)]
    category: String,

    /// A non-negative amount, e.g. 12.50
    #[arg(long)]
    amount: String,

    #[arg(long, default_value = "")]
    note: String,
}

impl AddArgs {
    pub fn new(
        date: impl Into<String>,
        kind: impl Into<String>,
        category: impl Into<String>,
        amount: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            kind: kind.into(),
            category: category.into(),
            amount: amount.into(),
            note: note.into(),
        }
    }

    pub fn form(&self) -> TransactionForm {
        TransactionForm {
            date: self.date.clone(),
            kind: self.kind.clone(),
            category: self.category.clone(),
            amount: self.amount.clone(),
            note: self.note.clone(),
        }
    }
}

/// (Not shown): Args for the `ledger update` command. Fields that are not given keep their
/// current value.
#[derive(Debug, Parser, Clone)]
pub struct UpdateArgs {
    /// The id of the transaction to change.
    #[arg(long)]
    id: RecordId,

    #[arg(long)]
    date: Option<String>,

    #[arg(long = "type")]
    kind: Option<String>,

    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    amount: Option<String>,

    #[arg(long)]
    note: Option<String>,
}

impl UpdateArgs {
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            date: None,
            kind: None,
            category: None,
            amount: None,
            note: None,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Overwrites the fields of `form` that were given on the command line.
    pub fn apply(&self, form: &mut TransactionForm) {
        let overrides = [
            (&self.date, &mut form.date),
            (&self.kind, &mut form.kind),
            (&self.category, &mut form.category),
            (&self.amount, &mut form.amount),
            (&self.note, &mut form.note),
        ];
        for (value, field) in overrides {
            if let Some(value) = value {
                field.clone_from(value);
            }
        }
    }
}

/// (Not shown): Args for the `ledger delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The id of the transaction to delete.
    #[arg(long)]
    id: RecordId,

    /// Do not ask for confirmation.
    #[arg(long)]
    yes: bool,
}

impl DeleteArgs {
    pub fn new(id: RecordId, yes: bool) -> Self {
        Self { id, yes }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

fn default_ledger_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("ledger"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --ledger-home or LEDGER_HOME instead of relying on the default \
                ledger home directory.",
            );
            PathBuf::from("ledger")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_summary() {
        let args = Args::try_parse_from([
            "ledger",
            "--ledger-home",
            "/tmp/l",
            "summary",
            "--week",
            "2024-02-01",
            "--expand",
        ])
        .unwrap();
        assert_eq!(args.common().ledger_home().path(), Path::new("/tmp/l"));
        let Command::Summary(summary) = args.command() else {
            panic!("expected summary, got {:?}", args.command());
        };
        assert_eq!(summary.week(), NaiveDate::from_ymd_opt(2024, 2, 1));
        assert!(summary.expand());
    }

    #[test]
    fn test_parse_add_defaults_to_expense() {
        let args = Args::try_parse_from([
            "ledger",
            "add",
            "--date",
            "2024-02-02",
            "--category",
            "Food",
            "--amount",
            "3.5",
        ])
        .unwrap();
        let Command::Add(add) = args.command() else {
            panic!("expected add");
        };
        let form = add.form();
        assert_eq!(form.kind, "expense");
        assert_eq!(form.note, "");
    }

    #[test]
    fn test_update_apply_keeps_unspecified_fields() {
        let mut form = TransactionForm {
            date: "2024-02-02".into(),
            kind: "expense".into(),
            category: "Food".into(),
            amount: "30".into(),
            note: "lunch".into(),
        };
        UpdateArgs::new(RecordId::Number(1))
            .with_amount("35")
            .with_note("")
            .apply(&mut form);
        assert_eq!(form.amount, "35");
        assert_eq!(form.note, "");
        assert_eq!(form.category, "Food");
        assert_eq!(form.date, "2024-02-02");
    }

    #[test]
    fn test_text_id() {
        let args = Args::try_parse_from(["ledger", "delete", "--id", "abc-1", "--yes"]).unwrap();
        let Command::Delete(delete) = args.command() else {
            panic!("expected delete");
        };
        assert_eq!(delete.id(), &RecordId::Text("abc-1".into()));
        assert!(delete.yes());
    }
}
