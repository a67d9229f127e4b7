use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use fastrace::future::FutureExt;
use fastrace::Span;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use userdir_source::DirectorySource;
use userdir_types::{AgeRange, FilterCriteria, Gender};

use crate::state::{ViewPhase, ViewState};

/// A live directory view: owns the filter criteria and the single fetch
/// that populates it.
///
/// Dropping the view aborts an outstanding fetch. A result that still
/// arrives after teardown is discarded without touching any state.
pub struct DirectoryView {
    state: Arc<Mutex<ViewState>>,
    settled: watch::Receiver<bool>,
    fetch: JoinHandle<()>,
}

impl DirectoryView {
    /// Starts the fetch and returns immediately in the `Loading` phase.
    /// Must be called from within a tokio runtime.
    pub fn activate(source: Arc<dyn DirectorySource>) -> Self {
        let state = Arc::new(Mutex::new(ViewState::new()));
        let (settled_tx, settled) = watch::channel(false);
        let fetch = spawn_fetch(source, Arc::downgrade(&state), settled_tx);

        Self {
            state,
            settled,
            fetch,
        }
    }

    /// Resolves once the fetch has produced a result (or can no longer).
    pub async fn wait_settled(&self) {
        let mut settled = self.settled.clone();
        if settled.wait_for(|done| *done).await.is_err() {
            debug!("Fetch task ended without settling the view");
        }
    }

    pub fn phase(&self) -> ViewPhase {
        self.lock().phase()
    }

    pub fn no_matches(&self) -> bool {
        self.lock().no_matches()
    }

    pub fn total_records(&self) -> usize {
        self.lock().total_records()
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.lock().criteria().clone()
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.lock().update_criteria(|c| c.search_query = query);
    }

    pub fn set_age_range(&self, range: Option<AgeRange>) {
        self.lock().update_criteria(|c| c.age_range = range);
    }

    /// Sets the age constraint from user text. Empty input clears it, and
    /// input without a numeric lower bound also leaves the age unconstrained.
    /// Returns whether a constraint is now active.
    pub fn set_age_range_str(&self, input: &str) -> bool {
        let range = AgeRange::parse(input);
        if range.is_none() && !input.trim().is_empty() {
            warn!("Ignoring unparseable age range '{}'", input);
        }
        self.set_age_range(range);
        range.is_some()
    }

    pub fn set_nationality(&self, code: Option<String>) {
        let code = code.filter(|c| !c.is_empty());
        self.lock().update_criteria(|c| c.nationality = code);
    }

    /// Exclusive choice: selecting one gender replaces the other.
    pub fn set_gender(&self, gender: Option<Gender>) {
        self.lock().update_criteria(|c| c.gender = gender);
    }

    pub fn replace_criteria(&self, criteria: FilterCriteria) {
        self.lock().update_criteria(|c| *c = criteria);
    }

    pub fn clear_criteria(&self) {
        self.replace_criteria(FilterCriteria::default());
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for DirectoryView {
    fn drop(&mut self) {
        self.fetch.abort();
    }
}

fn spawn_fetch(
    source: Arc<dyn DirectorySource>,
    state: Weak<Mutex<ViewState>>,
    settled: watch::Sender<bool>,
) -> JoinHandle<()> {
    let span = Span::enter_with_local_parent("directory_fetch");
    tokio::spawn(
        async move {
            let result = source.fetch_records().await;

            let Some(state) = state.upgrade() else {
                debug!("View torn down before fetch completed, discarding result");
                return;
            };

            state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .apply_fetch_result(result);
            let _ = settled.send(true);
        }
        .in_span(span),
    )
}
