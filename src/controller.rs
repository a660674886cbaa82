//! Session state and the controller that owns it.
//!
//! [`ViewState`] is immutable: every user action builds a new one and swaps
//! it in whole. The visible set is recomputed at construction time and is
//! never edited afterwards.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error};

use crate::engine;
use crate::error::{DataFetchError, Result};
use crate::models::{FilterSpec, FinancialRecord, SortKey, SortSpec};
use crate::source::IncomeSource;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    original: Arc<Vec<FinancialRecord>>,
    filter: FilterSpec,
    sort: SortSpec,
    visible: Vec<FinancialRecord>,
    filtered_remotely: bool,
}

impl ViewState {
    /// Build a state and derive its visible set.
    ///
    /// When `filtered_remotely` is set the records already reflect `filter`,
    /// so only the sort is applied locally.
    pub fn new(
        records: Vec<FinancialRecord>,
        filter: FilterSpec,
        sort: SortSpec,
        filtered_remotely: bool,
    ) -> Self {
        Self::derive(Arc::new(records), filter, sort, filtered_remotely)
    }

    fn derive(
        original: Arc<Vec<FinancialRecord>>,
        filter: FilterSpec,
        sort: SortSpec,
        filtered_remotely: bool,
    ) -> Self {
        let visible = if filtered_remotely {
            engine::apply_sort(&original, &sort)
        } else {
            engine::visible(&original, &filter, &sort)
        };
        Self {
            original,
            filter,
            sort,
            visible,
            filtered_remotely,
        }
    }

    pub fn empty(filtered_remotely: bool) -> Self {
        Self::new(Vec::new(), FilterSpec::default(), SortSpec::default(), filtered_remotely)
    }

    pub fn with_records(&self, records: Vec<FinancialRecord>) -> Self {
        Self::derive(Arc::new(records), self.filter, self.sort, self.filtered_remotely)
    }

    pub fn with_filter(&self, filter: FilterSpec) -> Self {
        Self::derive(self.original.clone(), filter, self.sort, self.filtered_remotely)
    }

    pub fn with_sort(&self, sort: SortSpec) -> Self {
        Self::derive(self.original.clone(), self.filter, sort, self.filtered_remotely)
    }

    pub fn original(&self) -> &[FinancialRecord] {
        &self.original
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn visible(&self) -> &[FinancialRecord] {
        &self.visible
    }

    pub fn filtered_remotely(&self) -> bool {
        self.filtered_remotely
    }
}

// ---------------------------------------------------------------------------
// ErrorEvent
// ---------------------------------------------------------------------------

/// A recorded fetch failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEvent {
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Current [`ViewState`] plus the error log, without a data source attached.
///
/// Shared by the blocking [`Controller`] and the async front end.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: Arc<ViewState>,
    errors: Vec<ErrorEvent>,
}

impl Session {
    pub fn new(filtered_remotely: bool) -> Self {
        Self {
            state: Arc::new(ViewState::empty(filtered_remotely)),
            errors: Vec::new(),
        }
    }

    pub fn state(&self) -> Arc<ViewState> {
        self.state.clone()
    }

    pub fn errors(&self) -> &[ErrorEvent] {
        &self.errors
    }

    fn replace(&mut self, next: ViewState) -> Arc<ViewState> {
        self.state = Arc::new(next);
        self.state.clone()
    }

    /// Apply a column-header click.
    pub fn click_column(&mut self, key: SortKey) -> Arc<ViewState> {
        let sort = self.state.sort().toggle(key);
        debug!(key = %sort.key, order = %sort.order, "sort changed");
        let next = self.state.with_sort(sort);
        self.replace(next)
    }

    /// Replace the sort outright.
    pub fn set_sort(&mut self, sort: SortSpec) -> Arc<ViewState> {
        let next = self.state.with_sort(sort);
        self.replace(next)
    }

    /// Apply a submitted filter to the records already held.
    pub fn apply_filter(&mut self, filter: FilterSpec) -> Arc<ViewState> {
        debug!(bounds = filter.bounds().len(), "filter applied locally");
        let next = self.state.with_filter(filter);
        self.replace(next)
    }

    /// Install the result of a fetch made for `filter`.
    ///
    /// A failure is logged, recorded as one [`ErrorEvent`] and leaves an
    /// empty record set behind.
    pub fn finish_fetch(
        &mut self,
        filter: FilterSpec,
        result: Result<Vec<FinancialRecord>>,
    ) -> Arc<ViewState> {
        let records = self.records_or_empty(result);
        let next = self.state.with_filter(filter).with_records(records);
        self.replace(next)
    }

    /// Install the result of an unfiltered fetch, keeping whatever filter and
    /// sort are active at completion.
    pub fn finish_load(&mut self, result: Result<Vec<FinancialRecord>>) -> Arc<ViewState> {
        let records = self.records_or_empty(result);
        let next = self.state.with_records(records);
        self.replace(next)
    }

    fn records_or_empty(&mut self, result: Result<Vec<FinancialRecord>>) -> Vec<FinancialRecord> {
        match result {
            Ok(records) => {
                debug!(count = records.len(), "income statements loaded");
                records
            }
            Err(err) => {
                self.record_error(&err);
                Vec::new()
            }
        }
    }

    fn record_error(&mut self, err: &DataFetchError) {
        error!(error = %err, "failed to fetch income statements");
        self.errors.push(ErrorEvent {
            message: err.to_string(),
            occurred_at: Utc::now(),
        });
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owns the data source and the session, and turns user actions into state
/// replacements.
///
/// Fetch failures never escape: they end up in [`errors()`](Self::errors).
pub struct Controller<S> {
    source: S,
    session: Session,
}

impl<S: IncomeSource> Controller<S> {
    pub fn new(source: S) -> Self {
        let session = Session::new(source.filters_remotely());
        Self { source, session }
    }

    /// Fetch the statement series. Called once on start-up.
    pub fn load(&mut self) -> Arc<ViewState> {
        let filter = *self.session.state().filter();
        self.fetch(filter)
    }

    /// Submit a filter from the form.
    ///
    /// Local wiring re-derives the visible set from the held records; remote
    /// wiring issues a new fetch carrying the filter.
    pub fn submit_filter(&mut self, filter: FilterSpec) -> Arc<ViewState> {
        if self.source.filters_remotely() {
            self.fetch(filter)
        } else {
            self.session.apply_filter(filter)
        }
    }

    /// Fetch once with `filter` already active.
    ///
    /// Remote wiring sends the filter with that single request; local
    /// wiring applies it to the fetched records.
    pub fn load_with_filter(&mut self, filter: FilterSpec) -> Arc<ViewState> {
        self.fetch(filter)
    }

    pub fn click_column(&mut self, key: SortKey) -> Arc<ViewState> {
        self.session.click_column(key)
    }

    pub fn set_sort(&mut self, sort: SortSpec) -> Arc<ViewState> {
        self.session.set_sort(sort)
    }

    pub fn state(&self) -> Arc<ViewState> {
        self.session.state()
    }

    pub fn errors(&self) -> &[ErrorEvent] {
        self.session.errors()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn fetch(&mut self, filter: FilterSpec) -> Arc<ViewState> {
        let result = self.source.fetch_income_statements(&filter);
        self.session.finish_fetch(filter, result)
    }
}
