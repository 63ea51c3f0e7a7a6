//! Workspace overview numbers for the dashboard.

use serde::Serialize;

use supportflow_core::model::{Priority, Status, Ticket};

/// Counts over the full ticket collection, relative to one viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TicketStats {
    pub total: usize,
    pub open: usize,
    pub pending: usize,
    pub urgent: usize,
    pub assigned_to_me: usize,
    pub resolved: usize,
}

impl TicketStats {
    #[must_use]
    pub fn collect(tickets: &[Ticket], viewer_id: u64) -> Self {
        let mut stats = Self {
            total: tickets.len(),
            open: 0,
            pending: 0,
            urgent: 0,
            assigned_to_me: 0,
            resolved: 0,
        };
        for ticket in tickets {
            match ticket.status {
                Status::Open => stats.open += 1,
                Status::Pending => stats.pending += 1,
                Status::Answered | Status::Closed => stats.resolved += 1,
            }
            if ticket.priority == Priority::Urgent {
                stats.urgent += 1;
            }
            if ticket.assigned_id == Some(viewer_id) {
                stats.assigned_to_me += 1;
            }
        }
        stats
    }

    /// Resolved share as a rounded percentage; zero for an empty workspace.
    #[must_use]
    pub const fn resolution_rate(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            (self.resolved * 100 + self.total / 2) / self.total
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TicketStats;
    use chrono::Utc;
    use supportflow_core::seed;

    #[test]
    fn seed_counts_add_up() {
        let tickets = seed::demo(Utc::now()).tickets;
        let stats = TicketStats::collect(&tickets, 2);
        assert_eq!(stats.total, 6);
        assert_eq!(stats.open, 3);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.resolved, 2);
        assert_eq!(stats.urgent, 1);
        assert_eq!(stats.assigned_to_me, 3);
        assert_eq!(stats.open + stats.pending + stats.resolved, stats.total);
    }

    #[test]
    fn resolution_rate_rounds_and_handles_empty() {
        let stats = TicketStats::collect(&[], 1);
        assert_eq!(stats.resolution_rate(), 0);

        let tickets = seed::demo(Utc::now()).tickets;
        let stats = TicketStats::collect(&tickets, 2);
        // 2 of 6 resolved -> 33%.
        assert_eq!(stats.resolution_rate(), 33);
    }
}
