//! `sf login` / `sf logout` / `sf whoami` — session management.

use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use supportflow_core::auth;

use crate::output::{pretty_kv, render, render_error, CliError, OutputMode};
use crate::{session, workspace};

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Email of a provisioned user (matched case-insensitively).
    pub email: String,
}

#[derive(Debug, Serialize)]
struct LoginOutput {
    ok: bool,
    user_id: u64,
    name: String,
    role: String,
    token: String,
}

pub fn run_login(args: &LoginArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let workspace = workspace::open(project_root, output)?;

    let Some(session) = auth::authenticate(workspace.store.users(), &args.email) else {
        render_error(
            output,
            &CliError::new(
                format!("no user with email '{}'", args.email.trim()),
                "E2001",
                Some("Check provisioned users with `sf users list`."),
            ),
        );
        anyhow::bail!("invalid credentials");
    };

    session::save(&workspace.data_dir, &session)?;

    render(
        output,
        &LoginOutput {
            ok: true,
            user_id: session.user.id,
            name: session.user.name.clone(),
            role: session.user.role.to_string(),
            token: session.token.clone(),
        },
        |out, w| {
            writeln!(w, "Logged in as {} ({})", out.name, out.role)
        },
    )
}

#[derive(Debug, Serialize)]
struct LogoutOutput {
    ok: bool,
}

pub fn run_logout(output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let workspace = workspace::open(project_root, output)?;
    session::clear(&workspace.data_dir)?;
    render(output, &LogoutOutput { ok: true }, |_, w| {
        writeln!(w, "Logged out.")
    })
}

#[derive(Debug, Serialize)]
struct WhoamiOutput {
    user_id: u64,
    name: String,
    email: String,
    role: String,
    unread_notifications: usize,
}

pub fn run_whoami(output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let workspace = workspace::open(project_root, output)?;
    let user = session::current_user(&workspace, output)?;
    let unread = workspace.store.unread_count(user.id);

    render(
        output,
        &WhoamiOutput {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.to_string(),
            unread_notifications: unread,
        },
        |out, w| {
            pretty_kv(w, "User", format!("{} (#{})", out.name, out.user_id))?;
            pretty_kv(w, "Email", &out.email)?;
            pretty_kv(w, "Role", &out.role)?;
            pretty_kv(w, "Unread", out.unread_notifications.to_string())
        },
    )
}
