use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::user::{normalize, ParseEnumError};

/// The four ticket lifecycle states.
///
/// Any state is reachable from any other; `Open` is the only initial value
/// and there is no terminal state. A `Closed` ticket is reopened by an agent
/// reply, so tickets stay reply-able after closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Open,
    Pending,
    Answered,
    Closed,
}

impl Status {
    pub const ALL: [Self; 4] = [Self::Open, Self::Pending, Self::Answered, Self::Closed];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Pending => "Pending",
            Self::Answered => "Answered",
            Self::Closed => "Closed",
        }
    }

    /// Answered and Closed tickets both count as resolved in reporting.
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Answered | Self::Closed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "pending" => Ok(Self::Pending),
            "answered" => Ok(Self::Answered),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseEnumError {
                expected: "status",
                got: s.to_string(),
            }),
        }
    }
}

/// Ticket priority, set by the requester at creation and re-triaged by agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(ParseEnumError {
                expected: "priority",
                got: s.to_string(),
            }),
        }
    }
}

/// One customer-visible message on a ticket timeline. Immutable once created.
///
/// `ticket_id` is a non-owning back-reference for lookup; the ticket
/// exclusively owns its messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketMessage {
    pub id: u64,
    pub ticket_id: u64,
    pub body: String,
    pub from_agent: bool,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

/// An agent-only annotation, never shown to the requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalNote {
    pub id: u64,
    pub ticket_id: u64,
    pub body: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

/// A customer support request tracked through status/priority/assignment.
///
/// Invariants maintained by the lifecycle engine:
/// - `updated_at >= created_at` after every operation
/// - at least one message (the requester's initial report) at all times
/// - ids are monotonic and never reused
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: u64,
    pub subject: String,
    pub requester_email: String,
    pub status: Status,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_id: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<TicketMessage>,
    pub notes: Vec<InternalNote>,
}

/// A message or note in the merged detail timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineEntry<'a> {
    Message(&'a TicketMessage),
    Note(&'a InternalNote),
}

impl TimelineEntry<'_> {
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::Message(m) => m.created_at,
            Self::Note(n) => n.created_at,
        }
    }

    /// Internal notes must be suppressed in requester-facing output.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Note(_))
    }
}

impl Ticket {
    /// Merged messages and notes in chronological order. Ties keep messages
    /// ahead of notes (stable merge).
    #[must_use]
    pub fn timeline(&self) -> Vec<TimelineEntry<'_>> {
        let mut entries: Vec<TimelineEntry<'_>> = self
            .messages
            .iter()
            .map(TimelineEntry::Message)
            .chain(self.notes.iter().map(TimelineEntry::Note))
            .collect();
        entries.sort_by_key(TimelineEntry::created_at);
        entries
    }

    /// The most recent requester-authored message, used to seed reply drafts.
    #[must_use]
    pub fn last_requester_message(&self) -> Option<&TicketMessage> {
        self.messages.iter().rev().find(|m| !m.from_agent)
    }
}
