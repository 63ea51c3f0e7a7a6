//! Copy-on-write transitions for tickets.
//!
//! Every operation produces a new [`Ticket`] value; the store replaces the
//! old one and handles the side effects (outbox append, notification
//! dispatch, persistence). Nothing here mutates shared state.

use chrono::{DateTime, Utc};

use crate::error::Error;
use crate::model::{InternalNote, Priority, Status, Ticket, TicketMessage, User};

/// First ticket id handed out when the collection is empty. Seeded demo
/// tickets occupy 101–106, so fresh workspaces continue from here.
pub const TICKET_ID_FLOOR: u64 = 107;

/// Fixed input for ticket creation. Every field is required except the
/// requester display name, which falls back to the local part of the email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTicketInput {
    pub subject: String,
    pub requester_email: String,
    pub priority: Priority,
    pub message: String,
    pub requester_name: Option<String>,
}

fn require(field: &'static str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Build a new ticket from validated input.
///
/// Status is forced to `Open` and the requester's report becomes the seed
/// message, so a ticket is never message-less. `created_at == updated_at`
/// at birth.
pub fn create(
    input: &CreateTicketInput,
    id: u64,
    message_id: u64,
    now: DateTime<Utc>,
) -> Result<Ticket, Error> {
    require("subject", &input.subject)?;
    require("requester email", &input.requester_email)?;
    require("message", &input.message)?;

    let requester_email = input.requester_email.trim().to_string();
    let author_name = input
        .requester_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map_or_else(
            || {
                requester_email
                    .split('@')
                    .next()
                    .unwrap_or(requester_email.as_str())
                    .to_string()
            },
            ToString::to_string,
        );

    Ok(Ticket {
        id,
        subject: input.subject.trim().to_string(),
        requester_email,
        status: Status::Open,
        priority: input.priority,
        assigned_id: None,
        created_at: now,
        updated_at: now,
        messages: vec![TicketMessage {
            id: message_id,
            ticket_id: id,
            body: input.message.clone(),
            from_agent: false,
            author_name,
            created_at: now,
        }],
        notes: vec![],
    })
}

impl Ticket {
    /// Refresh `updated_at`, never letting it precede `created_at` (the
    /// wall clock may step backwards between operations).
    fn touched(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.max(self.created_at)
    }

    /// Append an agent reply and set status to `Answered` unconditionally;
    /// replying to a `Closed` ticket intentionally reopens it.
    #[must_use]
    pub fn with_reply(
        &self,
        message_id: u64,
        body: &str,
        author: &User,
        now: DateTime<Utc>,
    ) -> Self {
        let mut next = self.clone();
        next.messages.push(TicketMessage {
            id: message_id,
            ticket_id: self.id,
            body: body.to_string(),
            from_agent: true,
            author_name: author.name.clone(),
            created_at: now,
        });
        next.status = Status::Answered;
        next.updated_at = self.touched(now);
        next
    }

    /// Append an internal note. Status is left unchanged.
    #[must_use]
    pub fn with_note(&self, note_id: u64, body: &str, author: &User, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.notes.push(InternalNote {
            id: note_id,
            ticket_id: self.id,
            body: body.to_string(),
            author_name: author.name.clone(),
            created_at: now,
        });
        next.updated_at = self.touched(now);
        next
    }

    #[must_use]
    pub fn with_status(&self, status: Status, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.status = status;
        next.updated_at = self.touched(now);
        next
    }

    #[must_use]
    pub fn with_priority(&self, priority: Priority, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.priority = priority;
        next.updated_at = self.touched(now);
        next
    }

    /// Change or clear the assignee. Notification fan-out is decided by the
    /// dispatcher from the before/after pair, not here.
    #[must_use]
    pub fn with_assignee(&self, assigned_id: Option<u64>, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.assigned_id = assigned_id;
        next.updated_at = self.touched(now);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::{create, CreateTicketInput, TICKET_ID_FLOOR};
    use crate::model::{Priority, Role, Status, User};
    use chrono::{Duration, Utc};

    fn input() -> CreateTicketInput {
        CreateTicketInput {
            subject: "Cannot export reports".to_string(),
            requester_email: "jane@example.com".to_string(),
            priority: Priority::High,
            message: "The export button spins forever.".to_string(),
            requester_name: None,
        }
    }

    fn agent() -> User {
        User {
            id: 2,
            email: "agent@supportflow.com".to_string(),
            name: "Sam Agent".to_string(),
            role: Role::Agent,
        }
    }

    #[test]
    fn create_seeds_one_requester_message() {
        let now = Utc::now();
        let ticket = create(&input(), TICKET_ID_FLOOR, 1, now).unwrap();
        assert_eq!(ticket.id, TICKET_ID_FLOOR);
        assert_eq!(ticket.status, Status::Open);
        assert_eq!(ticket.created_at, ticket.updated_at);
        assert_eq!(ticket.messages.len(), 1);
        assert!(!ticket.messages[0].from_agent);
        assert_eq!(ticket.messages[0].author_name, "jane");
        assert!(ticket.notes.is_empty());
        assert_eq!(ticket.assigned_id, None);
    }

    #[test]
    fn create_prefers_explicit_requester_name() {
        let mut req = input();
        req.requester_name = Some("Jane Doe".to_string());
        let ticket = create(&req, TICKET_ID_FLOOR, 1, Utc::now()).unwrap();
        assert_eq!(ticket.messages[0].author_name, "Jane Doe");
    }

    #[test]
    fn create_rejects_blank_required_fields() {
        let mut req = input();
        req.subject = "   ".to_string();
        let err = create(&req, TICKET_ID_FLOOR, 1, Utc::now()).unwrap_err();
        assert!(err.to_string().contains("subject"), "{err}");

        let mut req = input();
        req.requester_email = String::new();
        let err = create(&req, TICKET_ID_FLOOR, 1, Utc::now()).unwrap_err();
        assert!(err.to_string().contains("requester email"), "{err}");

        let mut req = input();
        req.message = "\n\t".to_string();
        let err = create(&req, TICKET_ID_FLOOR, 1, Utc::now()).unwrap_err();
        assert!(err.to_string().contains("message"), "{err}");
    }

    #[test]
    fn reply_reopens_a_closed_ticket() {
        let now = Utc::now();
        let ticket = create(&input(), 107, 1, now)
            .unwrap()
            .with_status(Status::Closed, now + Duration::minutes(1));
        let replied = ticket.with_reply(2, "We shipped a fix.", &agent(), now + Duration::minutes(2));
        assert_eq!(replied.status, Status::Answered);
        assert_eq!(replied.messages.len(), 2);
        assert!(replied.messages[1].from_agent);
        assert!(replied.updated_at > ticket.updated_at);
    }

    #[test]
    fn note_leaves_status_alone() {
        let now = Utc::now();
        let ticket = create(&input(), 107, 1, now).unwrap();
        let noted = ticket.with_note(1, "Checked the export queue.", &agent(), now + Duration::minutes(5));
        assert_eq!(noted.status, Status::Open);
        assert_eq!(noted.notes.len(), 1);
        assert_eq!(noted.messages.len(), 1);
    }

    #[test]
    fn updated_at_never_precedes_created_at() {
        let now = Utc::now();
        let ticket = create(&input(), 107, 1, now).unwrap();
        // Simulate a clock stepping backwards.
        let stale = now - Duration::hours(1);
        let bumped = ticket.with_priority(Priority::Urgent, stale);
        assert!(bumped.updated_at >= bumped.created_at);
    }

    #[test]
    fn assignee_can_be_cleared() {
        let now = Utc::now();
        let ticket = create(&input(), 107, 1, now)
            .unwrap()
            .with_assignee(Some(2), now);
        assert_eq!(ticket.assigned_id, Some(2));
        let cleared = ticket.with_assignee(None, now);
        assert_eq!(cleared.assigned_id, None);
    }
}
