//! Demo dataset used to provision a fresh workspace.
//!
//! Timestamps are expressed relative to `now` at seed time so listings and
//! "time ago" rendering look live. The seeded notifications and outbox
//! history are static records, not dispatcher output.

use chrono::{DateTime, Duration, Utc};

use crate::model::{
    AppNotification, InternalNote, KbArticle, OutboxMessage, Priority, Role, Status, Ticket,
    TicketMessage, User,
};

/// Initial contents for every store collection.
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub users: Vec<User>,
    pub tickets: Vec<Ticket>,
    pub articles: Vec<KbArticle>,
    pub outbox: Vec<OutboxMessage>,
    pub notifications: Vec<AppNotification>,
}

impl SeedData {
    /// Empty workspace: no users means nobody can log in, so this is mostly
    /// for tests that provision their own fixtures.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

/// A canned reply snippet for the compose flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyTemplate {
    pub name: &'static str,
    pub content: &'static str,
}

/// The canned reply snippets offered when composing a reply.
pub const REPLY_TEMPLATES: [ReplyTemplate; 3] = [
    ReplyTemplate {
        name: "Refund Policy",
        content: "Our refund policy allows customers to request a full refund within 30 days of purchase if they are unsatisfied with the product.",
    },
    ReplyTemplate {
        name: "Password Reset",
        content: "To reset your password, go to the login page, click \"Forgot Password\", and enter your registered email address.",
    },
    ReplyTemplate {
        name: "Welcome",
        content: "Hi there, thank you for contacting SupportFlow. I'd be happy to help you with that.",
    },
];

fn message(
    id: u64,
    ticket_id: u64,
    body: &str,
    from_agent: bool,
    author_name: &str,
    created_at: DateTime<Utc>,
) -> TicketMessage {
    TicketMessage {
        id,
        ticket_id,
        body: body.to_string(),
        from_agent,
        author_name: author_name.to_string(),
        created_at,
    }
}

fn note(
    id: u64,
    ticket_id: u64,
    body: &str,
    author_name: &str,
    created_at: DateTime<Utc>,
) -> InternalNote {
    InternalNote {
        id,
        ticket_id,
        body: body.to_string(),
        author_name: author_name.to_string(),
        created_at,
    }
}

/// The demo workspace: three users, six tickets (#101–#106), four KB
/// articles, five outbox records, and six static notifications.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn demo(now: DateTime<Utc>) -> SeedData {
    let users = vec![
        User {
            id: 1,
            email: "admin@supportflow.com".to_string(),
            name: "Alex Admin".to_string(),
            role: Role::Admin,
        },
        User {
            id: 2,
            email: "agent@supportflow.com".to_string(),
            name: "Sam Agent".to_string(),
            role: Role::Agent,
        },
        User {
            id: 3,
            email: "kifayat@supportflow.com".to_string(),
            name: "Kifayat Engineer".to_string(),
            role: Role::Agent,
        },
    ];

    let articles = vec![
        KbArticle {
            id: 1,
            title: "Enterprise Refund Policy".to_string(),
            body: "Our refund policy allows customers to request a full refund within 30 days of purchase if they are unsatisfied with the product. For enterprise clients, pro-rated refunds are available for annual plans if cancelled within the first 60 days.".to_string(),
            tags: vec!["billing".into(), "refund".into(), "policy".into(), "enterprise".into()],
        },
        KbArticle {
            id: 2,
            title: "Password Security & Reset".to_string(),
            body: "To reset your password, go to the login page, click \"Forgot Password\", and enter your registered email address. Ensure your new password is at least 12 characters long and contains a mix of letters, numbers, and symbols.".to_string(),
            tags: vec!["account".into(), "security".into(), "password".into()],
        },
        KbArticle {
            id: 3,
            title: "Updating Billing Methods".to_string(),
            body: "You can add a new credit card or PayPal account in the Billing section of your dashboard settings. We support Visa, Mastercard, AMEX, and direct wire transfers for enterprise accounts.".to_string(),
            tags: vec!["billing".into(), "payment".into(), "enterprise".into()],
        },
        KbArticle {
            id: 4,
            title: "API Integration Guide".to_string(),
            body: "To integrate with our API, generate an API key from the Developer Settings. Our documentation supports REST and GraphQL endpoints with 99.9% uptime guaranteed.".to_string(),
            tags: vec!["dev".into(), "api".into(), "integration".into()],
        },
    ];

    let tickets = vec![
        Ticket {
            id: 101,
            subject: "Urgent: Production API latency spikes".to_string(),
            requester_email: "dev-ops@fintech-ultra.com".to_string(),
            status: Status::Open,
            priority: Priority::Urgent,
            assigned_id: Some(2),
            created_at: now - Duration::minutes(30),
            updated_at: now,
            messages: vec![message(
                1,
                101,
                "We are seeing 500ms+ latency on the /v1/transactions endpoint since the last deploy. This is affecting our customer checkout experience. Please check the US-East load balancers.",
                false,
                "David Ops",
                now - Duration::minutes(30),
            )],
            notes: vec![note(
                1,
                101,
                "Monitoring shows a sudden spike in DB connections. Investigating read-replica lag.",
                "Alex Admin",
                now - Duration::minutes(10),
            )],
        },
        Ticket {
            id: 102,
            subject: "Cannot login to Dashboard - 403 Forbidden".to_string(),
            requester_email: "jane.doe@marketing-pro.io".to_string(),
            status: Status::Open,
            priority: Priority::High,
            assigned_id: Some(3),
            created_at: now - Duration::hours(1),
            updated_at: now,
            messages: vec![message(
                2,
                102,
                "Every time I try to log in, I see a 403 Forbidden page. My teammates can log in just fine. I tried clearing my cookies but it didn't help.",
                false,
                "Jane Doe",
                now - Duration::hours(1),
            )],
            notes: vec![],
        },
        Ticket {
            id: 103,
            subject: "Clarification on Seat Add-on Pricing".to_string(),
            requester_email: "finance-lead@megacorp.com".to_string(),
            status: Status::Pending,
            priority: Priority::Medium,
            assigned_id: Some(2),
            created_at: now - Duration::days(1),
            updated_at: now - Duration::hours(12),
            messages: vec![
                message(
                    3,
                    103,
                    "We want to add 50 more seats to our Enterprise plan mid-cycle. Will this be pro-rated or is there a bulk discount available for teams over 500?",
                    false,
                    "Finance Lead",
                    now - Duration::days(1),
                ),
                message(
                    4,
                    103,
                    "Hi there, I'd be happy to check that for you. Generally, seat additions are pro-rated to the end of your billing cycle. I'm checking with our sales team for the bulk discount info.",
                    true,
                    "Sam Agent",
                    now - Duration::hours(12),
                ),
            ],
            notes: vec![note(
                2,
                103,
                "Sent query to Sales Dept regarding MegaCorp discount eligibility.",
                "Sam Agent",
                now - Duration::seconds(40_000),
            )],
        },
        Ticket {
            id: 104,
            subject: "Refund request for duplicate charge".to_string(),
            requester_email: "accounts@smallbiz.net".to_string(),
            status: Status::Answered,
            priority: Priority::Low,
            assigned_id: Some(3),
            created_at: now - Duration::days(2),
            updated_at: now - Duration::days(1),
            messages: vec![
                message(
                    5,
                    104,
                    "Hi, I noticed two identical charges of $149 on our June invoice. Can you please refund the duplicate one?",
                    false,
                    "Accounting",
                    now - Duration::days(2),
                ),
                message(
                    6,
                    104,
                    "Hi! I've confirmed the duplicate charge and have issued a full refund of $149 for the second transaction. You should see it in your bank statement in 3-5 business days.",
                    true,
                    "Kifayat Engineer",
                    now - Duration::days(1),
                ),
            ],
            notes: vec![],
        },
        Ticket {
            id: 105,
            subject: "Request for custom SSO integration".to_string(),
            requester_email: "it-admin@enterprise-stack.com".to_string(),
            status: Status::Open,
            priority: Priority::Medium,
            assigned_id: Some(2),
            created_at: now - Duration::hours(2),
            updated_at: now,
            messages: vec![message(
                7,
                105,
                "We are moving our entire stack to Okta and need to set up custom SAML SSO for our support portal. Do you have a guide for this?",
                false,
                "IT Admin",
                now - Duration::hours(2),
            )],
            notes: vec![],
        },
        Ticket {
            id: 106,
            subject: "Feature Request: Dark Mode for Dashboard".to_string(),
            requester_email: "ux-designer@creative-studio.com".to_string(),
            status: Status::Closed,
            priority: Priority::Low,
            assigned_id: Some(3),
            created_at: now - Duration::weeks(1),
            updated_at: now - Duration::days(6),
            messages: vec![
                message(
                    8,
                    106,
                    "I spend 8 hours a day in the dashboard. A dark mode option would be amazing for my eyes!",
                    false,
                    "Designer Kim",
                    now - Duration::weeks(1),
                ),
                message(
                    9,
                    106,
                    "Great news! Dark mode is actually on our roadmap for Q4. I've added your vote to the feature request list. Closing this for now, but thanks for the feedback!",
                    true,
                    "Kifayat Engineer",
                    now - Duration::days(6),
                ),
            ],
            notes: vec![],
        },
    ];

    let outbox = vec![
        OutboxMessage {
            id: 1,
            to_email: "accounts@smallbiz.net".to_string(),
            content: "Hi there,\n\nI've confirmed the duplicate charge and have issued a full refund of $149 for the second transaction. You should see it in your bank statement in 3-5 business days.\n\nBest regards,\nSupportFlow Billing Team".to_string(),
            sent_at: now - Duration::days(1),
        },
        OutboxMessage {
            id: 2,
            to_email: "ux-designer@creative-studio.com".to_string(),
            content: "Hi Designer Kim,\n\nGreat news! Dark mode is actually on our roadmap for Q4. I've added your vote to the feature request list. Closing this for now, but thanks for the feedback!\n\nCheers,\nSupportFlow Product Team".to_string(),
            sent_at: now - Duration::days(6),
        },
        OutboxMessage {
            id: 3,
            to_email: "finance-lead@megacorp.com".to_string(),
            content: "Hi Finance Lead,\n\nGenerally, seat additions are pro-rated to the end of your billing cycle. I'm checking with our sales team for the bulk discount info you requested.\n\nI will get back to you by EOD tomorrow with the final quote.".to_string(),
            sent_at: now - Duration::hours(12),
        },
        OutboxMessage {
            id: 4,
            to_email: "it-admin@enterprise-stack.com".to_string(),
            content: "Hi IT Admin,\n\nI've reviewed your request for the Okta SAML integration. You can find the step-by-step guide in our Knowledge Base under 'API & Integrations'.\n\nLet us know if you hit any snags during the configuration!".to_string(),
            sent_at: now - Duration::hours(3),
        },
        OutboxMessage {
            id: 5,
            to_email: "dev-ops@fintech-ultra.com".to_string(),
            content: "Hi David,\n\nOur engineering team has identified the cause of the latency spikes. It was a configuration drift in the US-East load balancer cluster. We have rolled back the change and performance is now baseline.\n\nThank you for alerting us.".to_string(),
            sent_at: now - Duration::minutes(30),
        },
    ];

    let notifications = vec![
        AppNotification {
            id: 1,
            user_id: 2,
            message: "NEW URGENT TICKET: Production API latency spikes (#101)".to_string(),
            ticket_id: Some(101),
            read: false,
            created_at: now - Duration::minutes(30),
        },
        AppNotification {
            id: 2,
            user_id: 3,
            message: "New High Priority Ticket #102 assigned to you: 'Login 403 Forbidden'"
                .to_string(),
            ticket_id: Some(102),
            read: false,
            created_at: now - Duration::hours(1),
        },
        AppNotification {
            id: 3,
            user_id: 2,
            message: "Customer IT Admin updated Ticket #105: 'Custom SSO integration'".to_string(),
            ticket_id: Some(105),
            read: false,
            created_at: now - Duration::hours(2),
        },
        AppNotification {
            id: 4,
            user_id: 3,
            message: "Knowledge Base Alert: Your article 'Password Security' was updated by Admin."
                .to_string(),
            ticket_id: None,
            read: true,
            created_at: now - Duration::days(1),
        },
        AppNotification {
            id: 5,
            user_id: 2,
            message: "Billing inquiry from MegaCorp (#103) is approaching SLA deadline."
                .to_string(),
            ticket_id: Some(103),
            read: true,
            created_at: now - Duration::hours(36),
        },
        AppNotification {
            id: 6,
            user_id: 1,
            message: "SYSTEM: Weekly support efficiency report is ready.".to_string(),
            ticket_id: None,
            read: false,
            created_at: now - Duration::hours(12),
        },
    ];

    SeedData {
        users,
        tickets,
        articles,
        outbox,
        notifications,
    }
}

#[cfg(test)]
mod tests {
    use super::demo;
    use crate::model::Status;
    use chrono::Utc;

    #[test]
    fn demo_dataset_matches_expected_shape() {
        let seed = demo(Utc::now());
        assert_eq!(seed.users.len(), 3);
        assert_eq!(seed.tickets.len(), 6);
        assert_eq!(seed.articles.len(), 4);
        assert_eq!(seed.outbox.len(), 5);
        assert_eq!(seed.notifications.len(), 6);
    }

    #[test]
    fn every_seed_ticket_has_a_requester_report() {
        let seed = demo(Utc::now());
        for ticket in &seed.tickets {
            assert!(!ticket.messages.is_empty(), "ticket {} is message-less", ticket.id);
            assert!(!ticket.messages[0].from_agent);
            assert!(ticket.updated_at >= ticket.created_at);
        }
    }

    #[test]
    fn ticket_102_keeps_the_403_subject() {
        let seed = demo(Utc::now());
        let ticket = seed.tickets.iter().find(|t| t.id == 102).unwrap();
        assert_eq!(ticket.subject, "Cannot login to Dashboard - 403 Forbidden");
        assert_eq!(ticket.status, Status::Open);
    }
}
