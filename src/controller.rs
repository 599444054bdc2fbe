use serde::Serialize;
use tracing::{debug, info, warn};

use crate::filter::{FilterCategory, FilterState, filter_jobs};
use crate::models::JobRecord;
use crate::sort::{SortDirection, SortField, SortState, sort_jobs};
use crate::store::{Persistence, SnapshotStore};
use crate::summary::{Summary, summarize};

/// Everything the user has selected about how the job list is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub filters: FilterState,
    pub sort: SortState,
}

/// What the presentation layer draws: the visible jobs in display order and
/// the counter.
#[derive(Debug, Clone, PartialEq)]
pub struct View<'a> {
    pub jobs: Vec<&'a JobRecord>,
    pub summary: Summary,
    pub filters_active: bool,
}

impl View<'_> {
    pub fn empty_message(&self) -> Option<&'static str> {
        self.summary.empty_message(self.filters_active)
    }
}

/// Owns the view state and the record set. Each transition re-derives the
/// view and persists the new state before returning.
pub struct ViewController<S> {
    state: ViewState,
    records: Vec<JobRecord>,
    persistence: Persistence<S>,
}

impl<S: SnapshotStore> ViewController<S> {
    pub fn new(records: Vec<JobRecord>, store: S) -> Self {
        Self {
            state: ViewState::default(),
            records,
            persistence: Persistence::new(store),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    /// Restores the last saved state, or defaults if there is none.
    pub fn initialize(&mut self) -> View<'_> {
        self.state = match self.persistence.load() {
            Some(state) => {
                info!(filters = ?state.filters, sort = ?state.sort, "restored view state");
                state
            }
            None => ViewState::default(),
        };
        self.view()
    }

    pub fn toggle_filter(&mut self, category: FilterCategory, token: &str) -> View<'_> {
        let selected = self.state.filters.toggle(category, token);
        debug!(category = category.as_str(), token, selected, "toggled filter");
        self.commit()
    }

    /// Toggle from an untyped category name. Unknown categories change nothing.
    pub fn toggle_filter_named(&mut self, category: &str, token: &str) -> View<'_> {
        match FilterCategory::parse(category) {
            Some(category) => self.toggle_filter(category, token),
            None => {
                warn!(category, token, "ignoring toggle for unknown filter category");
                self.view()
            }
        }
    }

    /// Same field flips direction, a new field starts ascending.
    pub fn set_sort(&mut self, field: SortField) -> View<'_> {
        let sort = &mut self.state.sort;
        if sort.field == Some(field) {
            sort.direction = sort.direction.toggle();
        } else {
            sort.field = Some(field);
            sort.direction = SortDirection::Asc;
        }
        debug!(field = field.as_str(), direction = sort.direction.as_str(), "set sort");
        self.commit()
    }

    /// Sort from an untyped column name. Unknown names change nothing.
    pub fn set_sort_named(&mut self, field: &str) -> View<'_> {
        match SortField::parse(field) {
            Some(field) => self.set_sort(field),
            None => {
                warn!(field, "ignoring unknown sort field");
                self.view()
            }
        }
    }

    pub fn reset(&mut self) -> View<'_> {
        self.state = ViewState::default();
        debug!("reset view state");
        self.commit()
    }

    /// Swap in a freshly fetched record set. The view state is unchanged.
    pub fn replace_records(&mut self, records: Vec<JobRecord>) -> View<'_> {
        self.records = records;
        self.view()
    }

    /// Filter, then sort, then count.
    pub fn view(&self) -> View<'_> {
        let filtered = filter_jobs(&self.records, &self.state.filters);
        let summary = summarize(&self.records, &filtered);
        let jobs = sort_jobs(&filtered, &self.state.sort);
        debug!(matched = summary.matched, total = summary.total, "derived view");
        View {
            jobs,
            summary,
            filters_active: self.state.filters.is_active(),
        }
    }

    fn commit(&mut self) -> View<'_> {
        self.persistence.save(&self.state);
        self.view()
    }
}
