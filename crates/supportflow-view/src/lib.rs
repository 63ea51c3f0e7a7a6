#![forbid(unsafe_code)]
//! supportflow-view library.
//!
//! Pure read-side projections over the entity store's collections. Nothing
//! here mutates a ticket; every function takes slices and returns new
//! sequences, so the store stays the single writer.
//!
//! # Conventions
//!
//! - **Errors**: projections are total; only parsing returns `Result`.
//! - **Logging**: use `tracing` macros (`debug!`, `trace!`).

pub mod filter;
pub mod page;
pub mod recent;
pub mod sort;
pub mod stats;

pub use filter::{filter_tickets, search_articles, PriorityFilter, StatusFilter, TicketFilter};
pub use page::{paginate, Page, DEFAULT_PAGE_SIZE};
pub use recent::{FilterSnapshot, RecentFilters, MAX_RECENT_FILTERS};
pub use sort::{sort_by_recency, sorted_by_recency};
pub use stats::TicketStats;
