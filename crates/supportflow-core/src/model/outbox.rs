use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One outbound customer-facing reply, recorded for audit.
///
/// The outbox is append-only: exactly one record per agent reply, never
/// mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboxMessage {
    pub id: u64,
    pub to_email: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}
