//! Notification dispatch and read-state operations.
//!
//! Assignment changes are the only automatic notification source: the
//! dispatcher fires when a ticket gains an assignee it did not have before.
//! Everything else in the collection is seeded demo data.

use chrono::{DateTime, Utc};

use crate::model::{AppNotification, Ticket};

/// Decide whether an assignment change produces a notification.
///
/// Fires only when the new assignee is defined and differs from the
/// previous one; clearing an assignee or re-assigning the same user is
/// silent. The message embeds the ticket id and subject verbatim.
#[must_use]
pub fn on_assignee_changed(
    ticket: &Ticket,
    previous: Option<u64>,
    new: Option<u64>,
    id: u64,
    now: DateTime<Utc>,
) -> Option<AppNotification> {
    let assignee = new?;
    if previous == Some(assignee) {
        return None;
    }
    Some(AppNotification {
        id,
        user_id: assignee,
        message: format!(
            "Ticket #{} (\"{}\") has been assigned to you.",
            ticket.id, ticket.subject
        ),
        ticket_id: Some(ticket.id),
        read: false,
        created_at: now,
    })
}

/// Mark one notification read. Idempotent: marking an already-read record
/// changes nothing. Returns `false` when the id is absent.
pub fn mark_read(notifications: &mut [AppNotification], id: u64) -> bool {
    match notifications.iter_mut().find(|n| n.id == id) {
        Some(notification) => {
            notification.read = true;
            true
        }
        None => false,
    }
}

/// Mark every notification belonging to `user_id` read. Other users'
/// records are untouched. Returns the number newly marked.
pub fn mark_all_read(notifications: &mut [AppNotification], user_id: u64) -> usize {
    let mut marked = 0;
    for notification in notifications
        .iter_mut()
        .filter(|n| n.user_id == user_id && !n.read)
    {
        notification.read = true;
        marked += 1;
    }
    marked
}

/// Count unread notifications for one user.
#[must_use]
pub fn unread_count(notifications: &[AppNotification], user_id: u64) -> usize {
    notifications
        .iter()
        .filter(|n| n.user_id == user_id && !n.read)
        .count()
}

/// All notifications addressed to one user, in stored order (newest first).
#[must_use]
pub fn for_user(notifications: &[AppNotification], user_id: u64) -> Vec<&AppNotification> {
    notifications
        .iter()
        .filter(|n| n.user_id == user_id)
        .collect()
}
