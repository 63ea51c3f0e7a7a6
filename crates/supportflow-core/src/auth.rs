//! Session identity for the workspace.
//!
//! Login is a case-insensitive email match against the provisioned user
//! list; the returned token is an opaque credential the consumer persists
//! between runs. Password hashing and JWT issuance belong to the broader
//! platform, not this core.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::User;

/// An authenticated session: the resolved user plus an opaque token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Resolve an email against the user list, case-insensitively.
///
/// `None` means invalid credentials; the caller decides how to surface it.
#[must_use]
pub fn authenticate(users: &[User], email: &str) -> Option<Session> {
    let user = users.iter().find(|u| u.matches_email(email))?;
    debug!(user = user.id, "authenticated");
    Some(Session {
        user: user.clone(),
        token: issue_token(&user.email),
    })
}

/// Derive an opaque token from the email and the issue instant.
fn issue_token(email: &str) -> String {
    let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let material = format!("{}:{stamp}", email.to_ascii_lowercase());
    blake3::hash(material.as_bytes()).to_hex().to_string()
}
