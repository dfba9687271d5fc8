//! Configuration file handling for lens.
//!
//! The configuration file is stored at `$LENS_HOME/config.json` and contains the path
//! to the ledger export file and, optionally, the account uid to keep.

use crate::{utils, Home, Result};
use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "lens";
const CONFIG_VERSION: u8 = 1;

/// The `Config` object represents the configuration of the app. You instantiate it by
/// providing the path to `$LENS_HOME` and from there it loads
/// `$LENS_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    home: Home,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory and:
    /// - Creates an initial `config.json` file pointing at `ledger_path`
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the data directory, e.g.
    ///   `$HOME/lens`
    /// - `ledger_path` - The ledger export file that the commands will read.
    /// - `uid` - The account uid to keep when the export mixes accounts. When `None`,
    ///   the account of the first record in the export is used.
    ///
    /// # Errors
    /// - Returns an error if the ledger file does not exist or if any file operation
    ///   fails.
    pub async fn create(
        dir: impl Into<PathBuf>,
        ledger_path: &Path,
        uid: Option<u64>,
    ) -> Result<Self> {
        let home = Home::new(dir).await?;
        if !ledger_path.is_file() {
            bail!(
                "The ledger export file is missing '{}'",
                ledger_path.display()
            );
        }
        let ledger_path = utils::canonicalize(ledger_path).await?;
        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            ledger_path,
            uid,
        };
        config_file.save(home.config()).await?;
        Ok(Self { home, config_file })
    }

    /// Loads the configuration from an existing data directory.
    pub async fn load(dir: impl Into<PathBuf>) -> Result<Self> {
        let home = Home::new(dir).await?;
        if !home.config().is_file() {
            bail!(
                "The config file is missing '{}', run 'lens init' first",
                home.config().display()
            );
        }
        let config_file = ConfigFile::load(home.config()).await?;
        Ok(Self { home, config_file })
    }

    pub fn home(&self) -> &Home {
        &self.home
    }

    /// The ledger export file that the commands read.
    pub fn ledger_path(&self) -> &Path {
        &self.config_file.ledger_path
    }

    /// The account whose records are kept, if pinned at init time.
    pub fn uid(&self) -> Option<u64> {
        self.config_file.uid
    }
}

/// The serde representation of `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "lens"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Path to the ledger export file (JSON or CSV)
    ledger_path: PathBuf,

    /// The account uid to keep when the export mixes accounts
    #[serde(skip_serializing_if = "Option::is_none")]
    uid: Option<u64>,
}

impl ConfigFile {
    async fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        utils::write(path, json).await
    }

    async fn load(path: &Path) -> Result<Self> {
        let config: ConfigFile = utils::deserialize(path).await?;

        // Validate app_name
        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn config_round_trips_through_create_and_load() {
        let dir = TempDir::new().unwrap();
        let ledger = dir.path().join("ledger.json");
        std::fs::write(&ledger, "[]").unwrap();
        let home_dir = dir.path().join("lens");

        let created = Config::create(&home_dir, &ledger, Some(42)).await.unwrap();
        assert_eq!(created.uid(), Some(42));

        let loaded = Config::load(&home_dir).await.unwrap();
        assert_eq!(loaded.uid(), Some(42));
        assert_eq!(loaded.ledger_path(), created.ledger_path());
    }

    #[tokio::test]
    async fn load_fails_without_an_init() {
        let dir = TempDir::new().unwrap();
        let error = Config::load(dir.path().join("lens")).await.unwrap_err();
        assert!(format!("{error}").contains("run 'lens init' first"));
    }
}
