use std::sync::Arc;

use tracing::{debug, warn};
use userdir_filter::apply_filters;
use userdir_source::FetchError;
use userdir_types::{FilterCriteria, ProfileRecord};

/// What the view shows at the top level.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewPhase {
    Loading,
    Errored(FetchError),
    Ready(Vec<ProfileRecord>),
}

impl ViewPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewPhase::Loading)
    }
}

#[derive(Debug, Clone)]
enum SourcePhase {
    Loading,
    Errored(FetchError),
    Loaded(Arc<[ProfileRecord]>),
}

/// Criteria plus whatever the source produced, with the visible subset
/// kept in sync after every change.
#[derive(Debug, Clone)]
pub struct ViewState {
    source: SourcePhase,
    criteria: FilterCriteria,
    visible: Vec<ProfileRecord>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            source: SourcePhase::Loading,
            criteria: FilterCriteria::default(),
            visible: Vec::new(),
        }
    }

    /// Moves out of `Loading`. Only the first result is taken; returns
    /// whether this call changed the state.
    pub fn apply_fetch_result(&mut self, result: Result<Vec<ProfileRecord>, FetchError>) -> bool {
        if !matches!(self.source, SourcePhase::Loading) {
            debug!("Ignoring fetch result, view already settled");
            return false;
        }

        self.source = match result {
            Ok(records) => SourcePhase::Loaded(records.into()),
            Err(err) => {
                warn!("Fetching directory failed: {}", err);
                SourcePhase::Errored(err)
            }
        };
        self.recompute();
        true
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn update_criteria(&mut self, update: impl FnOnce(&mut FilterCriteria)) {
        update(&mut self.criteria);
        self.recompute();
    }

    pub fn phase(&self) -> ViewPhase {
        match &self.source {
            SourcePhase::Loading => ViewPhase::Loading,
            SourcePhase::Errored(err) => ViewPhase::Errored(err.clone()),
            SourcePhase::Loaded(_) => ViewPhase::Ready(self.visible.clone()),
        }
    }

    /// Number of records the source returned, before filtering.
    pub fn total_records(&self) -> usize {
        match &self.source {
            SourcePhase::Loaded(records) => records.len(),
            _ => 0,
        }
    }

    /// True when records were loaded but none survive the current criteria.
    pub fn no_matches(&self) -> bool {
        self.total_records() > 0 && self.visible.is_empty()
    }

    fn recompute(&mut self) {
        self.visible = match &self.source {
            SourcePhase::Loaded(records) => apply_filters(records, &self.criteria),
            _ => Vec::new(),
        };
    }
}
