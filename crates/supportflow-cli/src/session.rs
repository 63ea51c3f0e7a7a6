//! Persisted login session for the CLI.
//!
//! `sf login` stores the opaque token plus the resolved user id under the
//! workspace data directory; later commands resolve the acting user from
//! it. The token is a credential for the session, not a JWT; server-side
//! issuance belongs to the broader platform.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use supportflow_core::auth::Session;
use supportflow_core::model::User;

use crate::output::{render_error, CliError, OutputMode};
use crate::workspace::Workspace;

const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user_id: u64,
}

pub fn save(data_dir: &Path, session: &Session) -> Result<()> {
    let stored = StoredSession {
        token: session.token.clone(),
        user_id: session.user.id,
    };
    let path = data_dir.join(SESSION_FILE);
    let content = serde_json::to_string_pretty(&stored)?;
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
}

#[must_use]
pub fn load(data_dir: &Path) -> Option<StoredSession> {
    let content = fs::read_to_string(data_dir.join(SESSION_FILE)).ok()?;
    serde_json::from_str(&content).ok()
}

/// Remove the stored session. Logging out twice is fine.
pub fn clear(data_dir: &Path) -> Result<()> {
    let path = data_dir.join(SESSION_FILE);
    if path.exists() {
        fs::remove_file(&path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Resolve the acting user for a mutating command. A stale session (user
/// removed or never logged in) renders a structured error and fails.
pub fn current_user(workspace: &Workspace, output: OutputMode) -> Result<User> {
    let not_logged_in = || {
        render_error(
            output,
            &CliError::new(
                "not logged in",
                "E1002",
                Some("Run `sf login <email>` first."),
            ),
        );
        anyhow::anyhow!("not logged in")
    };

    let stored = load(&workspace.data_dir).ok_or_else(not_logged_in)?;
    workspace
        .store
        .find_user(stored.user_id)
        .cloned()
        .ok_or_else(not_logged_in)
}
