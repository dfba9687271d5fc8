//! These structs provide the CLI interface for the lens CLI.

use crate::model::RecordType;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// lens: A command-line tool for exploring game currency ledgers.
///
/// The purpose of this program is to load a currency ledger export for one game
/// account and answer filter questions about it: which years, months and action
/// categories hold records, which records match the current filters, and what those
/// records sum to.
///
/// Point the program at a JSON or CSV export file with `lens init`, then use
/// `lens facets` to see what can be filtered on and `lens query` to list matching
/// records with their total.
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
    /// Create the data directory and initialize the configuration file.
    ///
    /// This is the first command you should run when setting up the lens CLI.
    ///
    /// - Decide what directory you want configuration stored in and pass this as
    ///   --lens-home. By default, it will be $HOME/lens.
    ///
    /// - Get a ledger export file for your account and pass its path as --ledger. A
    ///   JSON export is either a bare array of records or an API detail response with
    ///   a `list` field; a CSV export uses the same field names as column headers.
    ///
    Init(InitArgs),
    /// Show each facet's valid options under the given filters.
    Facets(FacetsArgs),
    /// List the records matching the given filters, with their count and total.
    Query(QueryArgs),
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

    /// The directory where lens configuration is held. Defaults to ~/lens
    #[arg(long, env = "LENS_HOME", default_value_t = default_lens_home())]
    lens_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, lens_home: PathBuf) -> Self {
        Self {
            log_level,
            lens_home: lens_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn lens_home(&self) -> &DisplayPath {
        &self.lens_home
    }
}

/// Args for the `lens init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The path to the ledger export file (.json or .csv). The path is stored in the
    /// configuration; the file itself stays where it is and is re-read on each query.
    #[arg(long)]
    ledger: PathBuf,

    /// Keep only records belonging to this account uid. Defaults to the account of
    /// the first record in the export.
    #[arg(long)]
    uid: Option<u64>,
}

impl InitArgs {
    pub fn new(ledger: impl Into<PathBuf>, uid: Option<u64>) -> Self {
        Self {
            ledger: ledger.into(),
            uid,
        }
    }

    pub fn ledger(&self) -> &Path {
        &self.ledger
    }

    pub fn uid(&self) -> Option<u64> {
        self.uid
    }
}

/// Args for the `lens facets` command.
#[derive(Debug, Parser, Clone)]
pub struct FacetsArgs {
    /// The record type facet.
    #[arg(long = "type", value_enum, default_value_t = RecordType::Primary)]
    record_type: RecordType,

    /// The year facet, e.g. 2024. Omit for all years.
    #[arg(long)]
    year: Option<String>,

    /// The month facet as a two-digit month, e.g. 05. Omit for all months.
    #[arg(long)]
    month: Option<String>,
}

impl FacetsArgs {
    pub fn new(record_type: RecordType, year: Option<String>, month: Option<String>) -> Self {
        Self {
            record_type,
            year,
            month,
        }
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn year(&self) -> Option<&str> {
        self.year.as_deref()
    }

    pub fn month(&self) -> Option<&str> {
        self.month.as_deref()
    }
}

/// Args for the `lens query` command.
#[derive(Debug, Parser, Clone)]
pub struct QueryArgs {
    /// The record type facet.
    #[arg(long = "type", value_enum, default_value_t = RecordType::Primary)]
    record_type: RecordType,

    /// The year facet, e.g. 2024. Omit for all years.
    #[arg(long)]
    year: Option<String>,

    /// The month facet as a two-digit month, e.g. 05. Omit for all months.
    #[arg(long)]
    month: Option<String>,

    /// The category facet: an action label exactly as shown by `lens facets`. Omit
    /// for all categories.
    #[arg(long)]
    category: Option<String>,

    /// The output format for the record listing.
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,
}

impl QueryArgs {
    pub fn new(
        record_type: RecordType,
        year: Option<String>,
        month: Option<String>,
        category: Option<String>,
        format: Format,
    ) -> Self {
        Self {
            record_type,
            year,
            month,
            category,
            format,
        }
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn year(&self) -> Option<&str> {
        self.year.as_deref()
    }

    pub fn month(&self) -> Option<&str> {
        self.month.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn format(&self) -> Format {
        self.format
    }
}

/// Controls how `lens query` prints matching records.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// A markdown table followed by a count/total summary line.
    #[default]
    Table,
    /// A JSON object with the settled selections, option sets, records and totals.
    Json,
    /// CSV rows matching the export column layout.
    Csv,
}

serde_plain::derive_display_from_serialize!(Format);
serde_plain::derive_fromstr_from_deserialize!(Format);

fn default_lens_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("lens"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --lens-home or LENS_HOME instead of relying on the default \
                lens home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("lens")
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
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
