//! Most-recently-used memory of applied inbox filters ("saved views").

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::filter::{PriorityFilter, StatusFilter, TicketFilter};

/// Bounded capacity: inserting a sixth snapshot evicts the oldest.
pub const MAX_RECENT_FILTERS: usize = 5;

/// One recorded filter combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSnapshot {
    pub query: String,
    pub status: StatusFilter,
    pub priority: PriorityFilter,
}

impl FilterSnapshot {
    /// Equality for dedup purposes: query compares case-insensitively.
    fn same_as(&self, other: &Self) -> bool {
        self.query.eq_ignore_ascii_case(&other.query)
            && self.status == other.status
            && self.priority == other.priority
    }

    /// Rebuild the applicable filter from a snapshot.
    #[must_use]
    pub fn to_filter(&self) -> TicketFilter {
        TicketFilter {
            status: self.status,
            priority: self.priority,
            query: self.query.clone(),
        }
    }
}

/// The MRU list, newest first. Serializes as a plain array so consumers can
/// persist it next to the other collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentFilters {
    entries: Vec<FilterSnapshot>,
}

impl RecentFilters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> &[FilterSnapshot] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record an applied filter.
    ///
    /// Trivial combinations (query shorter than two characters with both
    /// dropdowns on `All`) are not worth remembering. A duplicate moves to
    /// the front instead of creating a second entry; overflow evicts the
    /// oldest. Returns whether anything was recorded.
    pub fn record(&mut self, filter: &TicketFilter) -> bool {
        let query = filter.query.trim().to_string();
        if query.len() < 2 && filter.status.is_all() && filter.priority.is_all() {
            return false;
        }

        let snapshot = FilterSnapshot {
            query,
            status: filter.status,
            priority: filter.priority,
        };
        self.entries.retain(|existing| !existing.same_as(&snapshot));
        self.entries.insert(0, snapshot);
        if self.entries.len() > MAX_RECENT_FILTERS {
            debug!("recent filter list full, evicting oldest");
            self.entries.truncate(MAX_RECENT_FILTERS);
        }
        true
    }

    /// Drop one remembered snapshot by position.
    pub fn remove(&mut self, index: usize) -> Option<FilterSnapshot> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
