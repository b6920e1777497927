use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;
use week_ledger::args::{Args, Command};
use week_ledger::commands::{self, Prompt};
use week_ledger::{Config, ErrorType, IntoResult, Mode, Result};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with {} error: {e}", e.error_type());
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().ledger_home().path();

    // This allows for running the program without a remote store. When LEDGER_IN_TEST_MODE is set
    // and non-zero in length, then the mode will be Mode::Test, otherwise it will be Mode::Http.
    let mode = Mode::from_env();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => {
            commands::init(home, init_args.store_url(), init_args.currency())
                .await?
                .print()
        }

        Command::Weeks => commands::weeks(load(home).await?, mode).await?.print(),

        Command::Summary(summary_args) => commands::summary(
            load(home).await?,
            mode,
            summary_args.week(),
            summary_args.expand(),
        )
        .await?
        .print(),

        Command::Add(add_args) => commands::add(load(home).await?, mode, add_args)
            .await?
            .print(),

        Command::Update(update_args) => commands::update(load(home).await?, mode, update_args)
            .await?
            .print(),

        Command::Delete(delete_args) => {
            let prompt = Prompt::new(std::io::stdin().lock(), std::io::stderr());
            commands::delete(load(home).await?, mode, delete_args, prompt)
                .await?
                .print()
        }
    };
    Ok(())
}

async fn load(home: &Path) -> Result<Config> {
    Config::load(home).await.pub_result(ErrorType::Config)
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
