//! The cascading filter engine.
//!
//! Holds the facet selection state for one account's records and keeps it consistent:
//! after every operation, each selected value is a member of the option set it belongs
//! to. Facets depend on each other in a fixed order (type → year → month → category),
//! so changing an upstream facet revalidates everything downstream of it. The
//! revalidation sequence for each facet is: clear the selection, recompute the option
//! set from the settled upstream values, then restore the previous value only if the
//! new option set still offers it, falling back to the [`ALL`] sentinel.

mod facets;
mod view;

pub use facets::ALL;
pub use view::{DerivedView, FacetSelection};

use crate::model::{Record, RecordType};
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::mem;
use tracing::debug;

/// Callback invoked with the new view after each completed operation.
type ChangeCallback = Box<dyn FnMut(&DerivedView) + Send>;

/// The filter engine for one account's ledger records.
///
/// All operations are synchronous and run to completion; the engine performs no I/O
/// and must not be shared across concurrent callers. A `set_*` call with a value that
/// is not currently offered is silently ignored: option lists can go stale between
/// the caller reading them and submitting a change, and a stale submission must not
/// disturb the state.
pub struct FilterEngine {
    /// All loaded records, descending by time with the id as tie-break.
    records: Vec<Record>,
    selection: FacetSelection,
    years: Vec<String>,
    months: Vec<String>,
    categories: Vec<String>,
    view: DerivedView,
    on_change: Option<ChangeCallback>,
}

impl Debug for FilterEngine {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterEngine")
            .field("records", &self.records.len())
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterEngine {
    /// Creates an engine with no records: sentinel-only option sets, an empty
    /// filtered set and a zero total.
    pub fn new() -> Self {
        let mut engine = Self {
            records: Vec::new(),
            selection: FacetSelection::default(),
            years: Vec::new(),
            months: Vec::new(),
            categories: Vec::new(),
            view: DerivedView {
                selection: FacetSelection::default(),
                years: Vec::new(),
                months: Vec::new(),
                categories: Vec::new(),
                records: Vec::new(),
                total_amount: 0,
                record_count: 0,
            },
            on_change: None,
        };
        engine.revalidate_years();
        engine.revalidate_months();
        engine.revalidate_categories();
        engine.rebuild_view();
        engine
    }

    /// Replaces the record set and resets every facet to its default. The caller
    /// guarantees that all records belong to one account.
    pub fn load(&mut self, mut records: Vec<Record>) -> &DerivedView {
        records.sort_by(|a, b| b.time().cmp(&a.time()).then(b.id().cmp(&a.id())));
        debug!("Loaded {} records", records.len());
        self.records = records;
        self.selection = FacetSelection::default();
        self.revalidate_years();
        self.revalidate_months();
        self.revalidate_categories();
        self.rebuild_view()
    }

    /// Switches the record type facet. Setting the already-selected type is a no-op.
    /// The year list is type-independent but is revalidated with the rest of the
    /// chain for uniformity.
    pub fn set_type(&mut self, record_type: RecordType) -> &DerivedView {
        if self.selection.record_type == record_type {
            return &self.view;
        }
        self.selection.record_type = record_type;
        self.revalidate_years();
        self.revalidate_months();
        self.revalidate_categories();
        self.rebuild_view()
    }

    /// Selects a year, or the [`ALL`] sentinel. Unknown values are ignored.
    pub fn set_year(&mut self, year: &str) -> &DerivedView {
        if !self.years.iter().any(|y| y == year) {
            debug!("Ignoring unknown year '{year}'");
            return &self.view;
        }
        self.selection.year = year.to_string();
        self.revalidate_months();
        self.revalidate_categories();
        self.rebuild_view()
    }

    /// Selects a month, or the [`ALL`] sentinel. Unknown values are ignored.
    pub fn set_month(&mut self, month: &str) -> &DerivedView {
        if !self.months.iter().any(|m| m == month) {
            debug!("Ignoring unknown month '{month}'");
            return &self.view;
        }
        self.selection.month = month.to_string();
        self.revalidate_categories();
        self.rebuild_view()
    }

    /// Selects a category, or the [`ALL`] sentinel. Unknown values are ignored.
    /// Categories have no downstream facets, so nothing else is revalidated.
    pub fn set_category(&mut self, category: &str) -> &DerivedView {
        if !self.categories.iter().any(|c| c == category) {
            debug!("Ignoring unknown category '{category}'");
            return &self.view;
        }
        self.selection.category = category.to_string();
        self.rebuild_view()
    }

    /// The current view, without recomputing anything.
    pub fn current_view(&self) -> &DerivedView {
        &self.view
    }

    /// Registers a callback fired once per completed operation with the new view.
    /// Ignored submissions and no-op type changes do not fire it.
    pub fn on_change(&mut self, callback: impl FnMut(&DerivedView) + Send + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    fn revalidate_years(&mut self) {
        // The selection is cleared before the new option list is swapped in, so no
        // observer can catch a value the list no longer contains.
        let previous = mem::take(&mut self.selection.year);
        self.years = facets::available_years(&self.records);
        self.selection.year = restore_or_all(previous, &self.years);
    }

    fn revalidate_months(&mut self) {
        let previous = mem::take(&mut self.selection.month);
        self.months = facets::available_months(
            &self.records,
            self.selection.record_type,
            &self.selection.year,
        );
        self.selection.month = restore_or_all(previous, &self.months);
    }

    fn revalidate_categories(&mut self) {
        let previous = mem::take(&mut self.selection.category);
        self.categories = facets::available_categories(
            &self.records,
            self.selection.record_type,
            &self.selection.year,
            &self.selection.month,
        );
        self.selection.category = restore_or_all(previous, &self.categories);
    }

    fn rebuild_view(&mut self) -> &DerivedView {
        let records: Vec<Record> = self
            .records
            .iter()
            .filter(|r| self.selection.matches(r))
            .cloned()
            .collect();
        let total_amount: i64 = records.iter().map(Record::amount).sum();
        self.view = DerivedView {
            selection: self.selection.clone(),
            years: self.years.clone(),
            months: self.months.clone(),
            categories: self.categories.clone(),
            total_amount,
            record_count: records.len(),
            records,
        };
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.view);
        }
        &self.view
    }
}

/// The previous selection survives only if the fresh option list still offers it.
fn restore_or_all(previous: String, options: &[String]) -> String {
    if options.iter().any(|option| *option == previous) {
        previous
    } else {
        ALL.to_string()
    }
}
