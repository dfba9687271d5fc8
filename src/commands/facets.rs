//! The facets command: show each facet's valid options under the current filters.

use crate::args::FacetsArgs;
use crate::commands::{warn_unmatched, Out};
use crate::{store, Config, FilterEngine, Result};
use serde::Serialize;

/// The three option sets, sentinel first, as the engine derived them.
#[derive(Debug, Clone, Serialize)]
pub struct FacetOptions {
    pub years: Vec<String>,
    pub months: Vec<String>,
    pub categories: Vec<String>,
}

/// Loads the configured ledger and reports the facet option sets for the selections
/// in `args`. Selections are applied upstream-first (type, year, month) so each
/// downstream option set is scoped to the settled upstream values.
pub async fn facets(config: Config, args: FacetsArgs) -> Result<Out<FacetOptions>> {
    let records = store::load_records(config.ledger_path(), config.uid()).await?;
    let mut engine = FilterEngine::new();
    engine.load(records);
    engine.set_type(args.record_type());
    if let Some(year) = args.year() {
        engine.set_year(year);
    }
    if let Some(month) = args.month() {
        engine.set_month(month);
    }
    let view = engine.current_view();
    warn_unmatched(view, args.year(), args.month(), None);

    let options = FacetOptions {
        years: view.years().to_vec(),
        months: view.months().to_vec(),
        categories: view.categories().to_vec(),
    };
    let message = format!(
        "Years:      {}\nMonths:     {}\nCategories: {}",
        options.years.join(", "),
        options.months.join(", "),
        options.categories.join(", "),
    );
    Ok(Out::new(message, options))
}
