//! Configuration file handling for the ledger.
//!
//! The configuration file is stored at `$LEDGER_HOME/config.json` and holds the URL of the remote
//! transaction store and the currency prefix used when displaying money.

use crate::utils;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const APP_NAME: &str = "ledger";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const TEST_STORE_JSON: &str = "test_store.json";

/// The currency prefix used when none is configured.
pub const DEFAULT_CURRENCY: &str = "RM";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$LEDGER_HOME` and from there it loads `$LEDGER_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    store_url: Url,
}

impl Config {
    /// Creates the ledger home directory and an initial `config.json` inside it.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the data directory, e.g. `$HOME/ledger`
    /// - `store_url` - The URL of the remote transaction store.
    /// - `currency` - The prefix used when displaying money, e.g. `RM`.
    ///
    /// # Errors
    /// - Returns an error if `store_url` is not a valid URL or if any file operations fail.
    pub async fn create(
        dir: impl Into<PathBuf>,
        store_url: &str,
        currency: Option<&str>,
    ) -> Result<Self> {
        let store_url = parse_store_url(store_url)?;

        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the ledger home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;
        let config_path = root.join(CONFIG_JSON);

        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            store_url: store_url.to_string(),
            currency: currency.map(str::to_string),
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
            store_url,
        })
    }

    /// This will
    /// - validate that `ledger_home` exists and that the config file exists
    /// - load and validate the config file
    /// - return the loaded configuration object
    pub async fn load(ledger_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = ledger_home.into();
        if !maybe_relative.is_dir() {
            bail!(
                "The ledger home directory is missing '{}', run 'ledger init' first",
                maybe_relative.display()
            )
        }
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;
        let store_url = parse_store_url(&config_file.store_url)?;

        Ok(Self {
            root,
            config_path,
            config_file,
            store_url,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn store_url(&self) -> &Url {
        &self.store_url
    }

    pub fn currency(&self) -> &str {
        self.config_file.currency()
    }

    /// Where the file-backed test store keeps its records when running in `Mode::Test`.
    pub fn test_store_path(&self) -> PathBuf {
        self.root.join(TEST_STORE_JSON)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "ledger",
///   "config_version": 1,
///   "store_url": "https://script.example.com/macros/s/AKfycbx/exec",
///   "currency": "RM"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "ledger"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// URL of the remote transaction store
    store_url: String,

    /// Prefix for displayed money. Defaults to `RM` if not specified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    currency: Option<String>,
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path and checks its `app_name`.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }
}

fn parse_store_url(s: &str) -> Result<Url> {
    let url = Url::parse(s).with_context(|| format!("Invalid store URL '{s}'"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("Unsupported store URL scheme '{other}', expected http or https"),
    }
}
