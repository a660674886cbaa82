//! Async front end around [`Session`] for use inside Tokio.
//!
//! The blocking fetch runs on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], bounded by a timeout. Only one fetch may
//! be in flight at a time; a second trigger is rejected with
//! [`DataFetchError::Busy`] instead of queueing.
//!
//! # Example
//!
//! ```no_run
//! use income_explorer::{AsyncController, Config, DirectSource};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env();
//!     let source = tokio::task::spawn_blocking(move || DirectSource::new(&config))
//!         .await
//!         .unwrap()
//!         .unwrap();
//!     let controller = AsyncController::new(source);
//!     let state = controller.load().await.unwrap();
//!     println!("{} records", state.visible().len());
//! }
//! ```

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, warn};

use crate::config;
use crate::controller::{ErrorEvent, Session, ViewState};
use crate::error::{DataFetchError, Result};
use crate::models::{FilterSpec, FinancialRecord, SortKey, SortSpec};
use crate::source::IncomeSource;

/// Async counterpart of [`Controller`](crate::Controller).
///
/// Fetch failures (including timeouts) are recorded in the session like the
/// blocking controller does. The only errors returned to the caller are
/// [`DataFetchError::Busy`] and [`DataFetchError::Cancelled`], both of which
/// leave the state untouched.
///
/// A cancelled or timed-out fetch keeps the controller busy until its
/// upstream call actually returns, so at most one request is ever running.
pub struct AsyncController<S> {
    source: Arc<S>,
    session: Mutex<Session>,
    in_flight: Arc<AtomicBool>,
    timeout: Duration,
}

/// Holds the in-flight flag; clears it on drop.
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(Self(flag.clone()))
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S> AsyncController<S>
where
    S: IncomeSource + Send + Sync + 'static,
{
    pub fn new(source: S) -> Self {
        let session = Session::new(source.filters_remotely());
        Self {
            source: Arc::new(source),
            session: Mutex::new(session),
            in_flight: Arc::new(AtomicBool::new(false)),
            timeout: config::DEFAULT_TIMEOUT,
        }
    }

    /// Bound every fetch by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch the statement series.
    pub async fn load(&self) -> Result<Arc<ViewState>> {
        self.load_until(std::future::pending::<()>()).await
    }

    /// Fetch the statement series, abandoning it when `cancel` resolves first.
    pub async fn load_until<C>(&self, cancel: C) -> Result<Arc<ViewState>>
    where
        C: Future<Output = ()>,
    {
        let filter = *self.session().state().filter();
        self.fetch(filter, cancel).await
    }

    /// Submit a filter from the form. Remote sources fetch again; local
    /// sources re-derive the visible set without suspending.
    pub async fn submit_filter(&self, filter: FilterSpec) -> Result<Arc<ViewState>> {
        self.submit_filter_until(filter, std::future::pending::<()>())
            .await
    }

    pub async fn submit_filter_until<C>(
        &self,
        filter: FilterSpec,
        cancel: C,
    ) -> Result<Arc<ViewState>>
    where
        C: Future<Output = ()>,
    {
        if self.source.filters_remotely() {
            self.fetch(filter, cancel).await
        } else {
            Ok(self.session().apply_filter(filter))
        }
    }

    pub fn click_column(&self, key: SortKey) -> Arc<ViewState> {
        self.session().click_column(key)
    }

    pub fn set_sort(&self, sort: SortSpec) -> Arc<ViewState> {
        self.session().set_sort(sort)
    }

    pub fn state(&self) -> Arc<ViewState> {
        self.session().state()
    }

    pub fn errors(&self) -> Vec<ErrorEvent> {
        self.session().errors().to_vec()
    }

    /// True while a fetch is running, including an abandoned one whose
    /// upstream call has not returned yet.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn fetch<C>(&self, filter: FilterSpec, cancel: C) -> Result<Arc<ViewState>>
    where
        C: Future<Output = ()>,
    {
        let guard = InFlight::acquire(&self.in_flight).ok_or_else(|| {
            warn!("fetch already in flight; trigger ignored");
            DataFetchError::Busy
        })?;

        let source = self.source.clone();
        let mut task =
            tokio::task::spawn_blocking(move || source.fetch_income_statements(&filter));

        let outcome = tokio::select! {
            joined = tokio::time::timeout(self.timeout, &mut task) => match joined {
                Ok(joined) => Outcome::Settled(joined),
                Err(_) => Outcome::TimedOut,
            },
            _ = cancel => Outcome::Cancelled,
        };

        let result = match outcome {
            Outcome::Settled(Ok(result)) => result,
            Outcome::Settled(Err(e)) => Err(DataFetchError::Task(e.to_string())),
            Outcome::TimedOut => {
                release_when_settled(task, guard);
                Err(DataFetchError::Timeout(self.timeout))
            }
            Outcome::Cancelled => {
                warn!("fetch cancelled");
                release_when_settled(task, guard);
                return Err(DataFetchError::Cancelled);
            }
        };

        let mut session = self.session();
        if self.source.filters_remotely() {
            Ok(session.finish_fetch(filter, result))
        } else {
            Ok(session.finish_load(result))
        }
    }
}

type FetchTask = JoinHandle<Result<Vec<FinancialRecord>>>;

enum Outcome {
    Settled(std::result::Result<Result<Vec<FinancialRecord>>, JoinError>),
    TimedOut,
    Cancelled,
}

/// Keep the in-flight flag raised until an abandoned upstream call returns,
/// then drop its result.
fn release_when_settled(task: FetchTask, guard: InFlight) {
    tokio::spawn(async move {
        match task.await {
            Ok(Ok(records)) => debug!(count = records.len(), "discarded late fetch result"),
            Ok(Err(err)) => debug!(error = %err, "discarded late fetch failure"),
            Err(err) => debug!(error = %err, "abandoned fetch task failed"),
        }
        drop(guard);
    });
}
