use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An in-app notification for one user.
///
/// Append-only except for `read`, which transitions false to true exactly
/// once and never reverses. `ticket_id` is an optional deep-link target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppNotification {
    pub id: u64,
    pub user_id: u64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<u64>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::AppNotification;
    use chrono::Utc;

    #[test]
    fn ticket_link_is_optional() {
        let notification = AppNotification {
            id: 4,
            user_id: 3,
            message: "Your article 'Password Security' was updated.".to_string(),
            ticket_id: None,
            read: true,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&notification).unwrap();
        assert!(json.get("ticketId").is_none());
        assert!(json.get("userId").is_some());
        let back: AppNotification = serde_json::from_value(json).unwrap();
        assert_eq!(back, notification);
    }
}
