//! Recency ordering for ticket listings.

use supportflow_core::model::Ticket;

/// Stable sort by `updated_at` descending. Stability matters: bulk-seeded
/// tickets can share a timestamp at millisecond granularity, and ties must
/// keep their original relative order.
pub fn sort_by_recency(tickets: &mut [Ticket]) {
    tickets.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

/// Non-mutating variant for callers holding a shared slice.
#[must_use]
pub fn sorted_by_recency(tickets: &[Ticket]) -> Vec<Ticket> {
    let mut sorted = tickets.to_vec();
    sort_by_recency(&mut sorted);
    sorted
}

#[cfg(test)]
mod tests {
    use super::{sort_by_recency, sorted_by_recency};
    use chrono::{DateTime, Duration, Utc};
    use supportflow_core::model::{Priority, Status, Ticket};

    fn ticket(id: u64, updated_at: DateTime<Utc>) -> Ticket {
        Ticket {
            id,
            subject: format!("ticket {id}"),
            requester_email: "someone@example.com".to_string(),
            status: Status::Open,
            priority: Priority::Medium,
            assigned_id: None,
            created_at: updated_at - Duration::hours(1),
            updated_at,
            messages: vec![],
            notes: vec![],
        }
    }

    #[test]
    fn most_recently_updated_comes_first() {
        let now = Utc::now();
        let mut tickets = vec![
            ticket(1, now - Duration::hours(2)),
            ticket(2, now),
            ticket(3, now - Duration::hours(1)),
        ];
        sort_by_recency(&mut tickets);
        assert_eq!(tickets.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2, 3, 1]);
    }

    #[test]
    fn ties_keep_original_relative_order() {
        let now = Utc::now();
        let mut tickets = vec![
            ticket(10, now),
            ticket(20, now),
            ticket(30, now + Duration::milliseconds(1)),
            ticket(40, now),
        ];
        sort_by_recency(&mut tickets);
        assert_eq!(
            tickets.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![30, 10, 20, 40]
        );
    }

    #[test]
    fn sorting_is_idempotent() {
        let now = Utc::now();
        let tickets = vec![
            ticket(1, now),
            ticket(2, now - Duration::minutes(5)),
            ticket(3, now),
        ];
        let once = sorted_by_recency(&tickets);
        let twice = sorted_by_recency(&once);
        assert_eq!(once, twice);
    }
}
