//! Command handlers for the lens CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod facets;
mod init;
mod query;

pub use facets::{facets, FacetOptions};
pub use init::init;
pub use query::query;

use crate::DerivedView;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info, warn};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data for callers that want more than the printed text.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Warns for each requested facet value the engine ignored as unknown. The engine
/// ignores such values silently; at the CLI they were typed by the user, so each one
/// is surfaced.
pub(crate) fn warn_unmatched(
    view: &DerivedView,
    year: Option<&str>,
    month: Option<&str>,
    category: Option<&str>,
) {
    let selection = view.selection();
    if let Some(year) = year {
        if selection.year() != year {
            warn!("Year '{year}' is not in the ledger; showing all years");
        }
    }
    if let Some(month) = month {
        if selection.month() != month {
            warn!("Month '{month}' matched no records under the current filters; showing all months");
        }
    }
    if let Some(category) = category {
        if selection.category() != category {
            warn!("Category '{category}' matched no records under the current filters; showing all categories");
        }
    }
}
