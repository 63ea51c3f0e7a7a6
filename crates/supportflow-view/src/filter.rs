//! Ticket and article filtering.
//!
//! Status and priority filters are exact enum matches behind an `All`
//! sentinel; the free-text query is a case-insensitive substring match over
//! subject OR requester email. All three predicates are ANDed.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use supportflow_core::model::{KbArticle, ParseEnumError, Priority, Status, Ticket};

/// Status predicate: everything, or one exact state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum StatusFilter {
    All,
    Is(Status),
}

impl Default for StatusFilter {
    fn default() -> Self {
        Self::All
    }
}

impl StatusFilter {
    #[must_use]
    pub fn matches(self, status: Status) -> bool {
        match self {
            Self::All => true,
            Self::Is(wanted) => status == wanted,
        }
    }

    #[must_use]
    pub const fn is_all(self) -> bool {
        matches!(self, Self::All)
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Is(status) => status.fmt(f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        Status::from_str(s).map(Self::Is)
    }
}

impl From<StatusFilter> for String {
    fn from(filter: StatusFilter) -> Self {
        filter.to_string()
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Priority predicate: everything, or one exact priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PriorityFilter {
    All,
    Is(Priority),
}

impl Default for PriorityFilter {
    fn default() -> Self {
        Self::All
    }
}

impl PriorityFilter {
    #[must_use]
    pub fn matches(self, priority: Priority) -> bool {
        match self {
            Self::All => true,
            Self::Is(wanted) => priority == wanted,
        }
    }

    #[must_use]
    pub const fn is_all(self) -> bool {
        matches!(self, Self::All)
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Is(priority) => priority.fmt(f),
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        Priority::from_str(s).map(Self::Is)
    }
}

impl From<PriorityFilter> for String {
    fn from(filter: PriorityFilter) -> Self {
        filter.to_string()
    }
}

impl TryFrom<String> for PriorityFilter {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The combined inbox filter. An empty query matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TicketFilter {
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    pub query: String,
}

impl TicketFilter {
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        let query = self.query.to_lowercase();
        self.status.matches(ticket.status)
            && self.priority.matches(ticket.priority)
            && (ticket.subject.to_lowercase().contains(&query)
                || ticket.requester_email.to_lowercase().contains(&query))
    }
}

/// Apply the filter, keeping input order. Never mutates the input.
#[must_use]
pub fn filter_tickets<'a>(tickets: &'a [Ticket], filter: &TicketFilter) -> Vec<&'a Ticket> {
    tickets.iter().filter(|t| filter.matches(t)).collect()
}

/// Knowledge-base search: case-insensitive substring over title, body, or
/// any tag.
#[must_use]
pub fn search_articles<'a>(articles: &'a [KbArticle], query: &str) -> Vec<&'a KbArticle> {
    let query = query.to_lowercase();
    articles
        .iter()
        .filter(|a| {
            a.title.to_lowercase().contains(&query)
                || a.body.to_lowercase().contains(&query)
                || a.tags.iter().any(|t| t.to_lowercase().contains(&query))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{filter_tickets, search_articles, PriorityFilter, StatusFilter, TicketFilter};
    use chrono::Utc;
    use std::str::FromStr;
    use supportflow_core::model::{Priority, Status, Ticket};
    use supportflow_core::seed;

    fn tickets() -> Vec<Ticket> {
        seed::demo(Utc::now()).tickets
    }

    #[test]
    fn query_403_finds_exactly_the_login_ticket() {
        let tickets = tickets();
        let filter = TicketFilter {
            query: "403".to_string(),
            ..TicketFilter::default()
        };
        let hits = filter_tickets(&tickets, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 102);
        assert_eq!(hits[0].subject, "Cannot login to Dashboard - 403 Forbidden");
    }

    #[test]
    fn query_matches_requester_email_too() {
        let tickets = tickets();
        let filter = TicketFilter {
            query: "MEGACORP".to_string(),
            ..TicketFilter::default()
        };
        let hits = filter_tickets(&tickets, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 103);
    }

    #[test]
    fn predicates_are_anded() {
        let tickets = tickets();
        let filter = TicketFilter {
            status: StatusFilter::Is(Status::Open),
            priority: PriorityFilter::Is(Priority::Urgent),
            query: String::new(),
        };
        let hits = filter_tickets(&tickets, &filter);
        assert_eq!(hits.iter().map(|t| t.id).collect::<Vec<_>>(), vec![101]);
    }

    #[test]
    fn all_sentinel_matches_everything() {
        let tickets = tickets();
        let hits = filter_tickets(&tickets, &TicketFilter::default());
        assert_eq!(hits.len(), tickets.len());
    }

    #[test]
    fn substring_is_not_prefix_matching() {
        let tickets = tickets();
        let filter = TicketFilter {
            query: "latency".to_string(),
            ..TicketFilter::default()
        };
        // "latency" appears mid-subject of #101.
        assert_eq!(filter_tickets(&tickets, &filter)[0].id, 101);
    }

    #[test]
    fn filters_parse_and_render() {
        assert_eq!(StatusFilter::from_str("all").unwrap(), StatusFilter::All);
        assert_eq!(
            StatusFilter::from_str("open").unwrap(),
            StatusFilter::Is(Status::Open)
        );
        assert_eq!(StatusFilter::Is(Status::Closed).to_string(), "Closed");
        assert_eq!(
            PriorityFilter::from_str("URGENT").unwrap(),
            PriorityFilter::Is(Priority::Urgent)
        );
        assert_eq!(PriorityFilter::All.to_string(), "All");
        assert!(StatusFilter::from_str("stale").is_err());
    }

    #[test]
    fn filters_serialize_as_strings() {
        let json = serde_json::to_string(&StatusFilter::Is(Status::Pending)).unwrap();
        assert_eq!(json, "\"Pending\"");
        let back: StatusFilter = serde_json::from_str("\"All\"").unwrap();
        assert_eq!(back, StatusFilter::All);
    }

    #[test]
    fn article_search_covers_title_body_and_tags() {
        let articles = seed::demo(Utc::now()).articles;
        assert_eq!(search_articles(&articles, "refund").len(), 1);
        assert_eq!(search_articles(&articles, "graphql").len(), 1);
        let billing = search_articles(&articles, "billing");
        assert_eq!(billing.len(), 2);
        assert!(search_articles(&articles, "kubernetes").is_empty());
    }
}
