use crate::{utils, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};

const CONFIG_JSON: &str = "config.json";

/// The `Home` object represents the file paths of the `$LENS_HOME` directory and those paths
/// which are not configurable within `$LENS_HOME` such as `$LENS_HOME/config.json`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Home {
    root: PathBuf,
    config: PathBuf,
}

impl Home {
    /// This will create the `lens_home` directory, if it does not exist, and canonicalize itself.
    pub async fn new(lens_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = lens_home.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create lens home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;
        let config = root.join(CONFIG_JSON);
        Ok(Self { root, config })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Path {
        &self.config
    }
}

#[tokio::test]
async fn test_home() {
    use tempfile::TempDir;
    let dir = TempDir::new().unwrap();
    let home_dir = dir.path().join("lens");
    let home = Home::new(home_dir).await.unwrap();
    assert!(home.root().is_dir());
    assert!(home.config().ends_with(CONFIG_JSON));
}
