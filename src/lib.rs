//! Income statement explorer.
//!
//! Fetches a company's annual income statements from a financial data
//! provider (or from a proxy backend that filters server side), filters them
//! by year, revenue and net income ranges, and sorts them for display.
//!
//! # Quick start
//!
//! ```no_run
//! use income_explorer::{FilterSpec, IncomeExplorer, SortKey};
//!
//! let mut explorer = IncomeExplorer::builder()
//!     .api_key("demo")
//!     .symbol("AAPL")
//!     .build()
//!     .unwrap();
//!
//! explorer.load();
//! explorer.submit_filter(FilterSpec::new().start_year(2022));
//! explorer.click_column(SortKey::Revenue);
//! println!("{}", explorer.table().render());
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod models;
pub mod source;
pub mod view;

#[cfg(feature = "async")]
pub use async_client::AsyncController;
pub use config::Config;
pub use controller::{Controller, ErrorEvent, Session, ViewState};
pub use engine::{apply_filters, apply_sort};
pub use error::{DataFetchError, Result};
pub use models::{FilterSpec, FinancialRecord, SortKey, SortOrder, SortSpec};
pub use source::{DirectSource, IncomeSource, ProxySource};
pub use view::{FilterForm, ResultsTable};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Type-erased data source chosen at build time.
pub type BoxedSource = Box<dyn IncomeSource + Send + Sync>;

// ---------------------------------------------------------------------------
// IncomeExplorerBuilder
// ---------------------------------------------------------------------------

/// Builder for an [`IncomeExplorer`].
///
/// Starts from [`Config::default()`]; use [`from_env()`](Self::from_env) to
/// pick up the environment first.
#[derive(Debug, Default)]
pub struct IncomeExplorerBuilder {
    config: Config,
}

impl IncomeExplorerBuilder {
    /// Replace the whole configuration with what the environment provides.
    pub fn from_env(mut self) -> Self {
        self.config = Config::from_env();
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the provider credential.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.config.symbol = symbol.into();
        self
    }

    /// Reporting period selector, e.g. `annual` or `quarter`.
    pub fn period(mut self, period: impl Into<String>) -> Self {
        self.config.period = period.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Route fetches through a proxy backend. Filtering then happens on the
    /// backend and each filter submission issues a new request.
    pub fn backend_url(mut self, url: impl Into<String>) -> Self {
        self.config.backend_url = Some(url.into());
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the explorer. No request is made until [`IncomeExplorer::load`].
    pub fn build(self) -> Result<IncomeExplorer> {
        let source: BoxedSource = if self.config.uses_proxy() {
            Box::new(ProxySource::new(&self.config)?)
        } else {
            Box::new(DirectSource::new(&self.config)?)
        };
        Ok(IncomeExplorer::with_source(self.config, source))
    }
}

// ---------------------------------------------------------------------------
// IncomeExplorer
// ---------------------------------------------------------------------------

/// Top-level entry point: a [`Controller`] over the configured source.
pub struct IncomeExplorer {
    config: Config,
    controller: Controller<BoxedSource>,
}

impl IncomeExplorer {
    pub fn builder() -> IncomeExplorerBuilder {
        IncomeExplorerBuilder::default()
    }

    /// Wrap an arbitrary source, e.g. a fixture in tests.
    pub fn with_source(config: Config, source: BoxedSource) -> Self {
        Self {
            config,
            controller: Controller::new(source),
        }
    }

    /// Fetch the statement series. Failures are recorded in
    /// [`errors()`](Self::errors) and leave an empty record set.
    pub fn load(&mut self) -> Arc<ViewState> {
        self.controller.load()
    }

    /// Fetch once with `filter` already applied. Through a proxy this is a
    /// single filtered request rather than a load followed by a submit.
    pub fn load_with_filter(&mut self, filter: FilterSpec) -> Arc<ViewState> {
        self.controller.load_with_filter(filter)
    }

    pub fn submit_filter(&mut self, filter: FilterSpec) -> Arc<ViewState> {
        self.controller.submit_filter(filter)
    }

    /// Submit the form's current inputs.
    pub fn submit_form(
        &mut self,
        form: &FilterForm,
    ) -> std::result::Result<Arc<ViewState>, view::FormError> {
        let filter = form.submit()?;
        Ok(self.controller.submit_filter(filter))
    }

    pub fn click_column(&mut self, key: SortKey) -> Arc<ViewState> {
        self.controller.click_column(key)
    }

    pub fn set_sort(&mut self, sort: SortSpec) -> Arc<ViewState> {
        self.controller.set_sort(sort)
    }

    pub fn state(&self) -> Arc<ViewState> {
        self.controller.state()
    }

    pub fn errors(&self) -> &[ErrorEvent] {
        self.controller.errors()
    }

    /// Table model for the current visible set.
    pub fn table(&self) -> ResultsTable {
        ResultsTable::from_state(&self.controller.state())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl fmt::Display for IncomeExplorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.controller.state();
        write!(
            f,
            "IncomeExplorer(symbol={}, proxy={}, records={}, visible={}, sort={} {})",
            self.config.symbol,
            self.config.backend_url.as_deref().unwrap_or("none"),
            state.original().len(),
            state.visible().len(),
            state.sort().key,
            state.sort().order,
        )
    }
}
