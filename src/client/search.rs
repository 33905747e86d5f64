use parking_lot::Mutex;
use tracing::debug;

use super::{AdvocateSource, ClientError, SearchParams};
use crate::db::Advocate;
use crate::search::{SortDirection, SortField};

// ============================================================================
// Busy/error state
// ============================================================================

/// Loading and error flags for an in-progress directory search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub is_loading: bool,
    pub error: Option<String>,
}

impl SearchState {
    /// A search is starting: mark busy and forget the previous error.
    pub fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// The request settled, whatever its outcome.
    pub fn settle(&mut self) {
        self.is_loading = false;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

// ============================================================================
// Column sort cycling
// ============================================================================

/// Which column the listing is sorted by, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    pub field: Option<SortField>,
    pub direction: Option<SortDirection>,
}

impl SortState {
    /// Advance the sort after a click on `field`'s header.
    ///
    /// A new column starts ascending; the active column goes ascending →
    /// descending → unsorted.
    pub fn toggle(&mut self, field: SortField) {
        *self = if self.field == Some(field) {
            match self.direction {
                Some(SortDirection::Asc) => Self {
                    field: Some(field),
                    direction: Some(SortDirection::Desc),
                },
                Some(SortDirection::Desc) => Self::default(),
                None => Self {
                    field: Some(field),
                    direction: Some(SortDirection::Asc),
                },
            }
        } else {
            Self {
                field: Some(field),
                direction: Some(SortDirection::Asc),
            }
        };
    }

    /// Direction shown on `field`'s header, `None` when it is not the active column.
    pub fn direction_for(&self, field: SortField) -> Option<SortDirection> {
        if self.field == Some(field) {
            self.direction
        } else {
            None
        }
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Runs directory searches against a source and tracks their busy/error state.
///
/// Searches are not cancelled: when two overlap, whichever settles last
/// determines the final state.
pub struct AdvocateSearch<S> {
    source: S,
    state: Mutex<SearchState>,
}

impl<S: AdvocateSource> AdvocateSearch<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(SearchState::default()),
        }
    }

    /// Fetch advocates for `params`.
    ///
    /// On failure the error message is recorded in the state and the error is
    /// returned to the caller as well.
    pub async fn search(&self, params: &SearchParams) -> Result<Vec<Advocate>, ClientError> {
        self.state.lock().begin();

        let result = self.source.get_advocates(params).await;

        let mut state = self.state.lock();
        if let Err(ref e) = result {
            state.fail(e.to_string());
        }
        state.settle();
        debug!(ok = result.is_ok(), "advocate search settled");

        result
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SearchState {
        self.state.lock().clone()
    }

    pub fn clear_error(&self) {
        self.state.lock().clear_error();
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
