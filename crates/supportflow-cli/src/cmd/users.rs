//! `sf users` — team management. Role changes are admin-gated by the store.

use clap::{Args, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use supportflow_core::model::{Role, User};

use crate::output::{fail, render, render_error, CliError, OutputMode};
use crate::{session, workspace};

#[derive(Args, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// List provisioned users.
    List,

    /// Change a user's role (admin only).
    SetRole {
        /// User id.
        id: u64,
        /// New role: admin or agent.
        role: String,
    },
}

#[derive(Debug, Serialize)]
struct UsersList {
    users: Vec<User>,
}

#[derive(Debug, Serialize)]
struct RoleOutput {
    ok: bool,
    user_id: u64,
    role: String,
}

pub fn run_users(args: &UsersArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let mut workspace = workspace::open(project_root, output)?;

    match &args.command {
        UsersCommand::List => render(
            output,
            &UsersList {
                users: workspace.store.users().to_vec(),
            },
            |out, w| {
                for user in &out.users {
                    writeln!(w, "#{:<2} {:<18} {:<6} {}", user.id, user.name, user.role, user.email)?;
                }
                Ok(())
            },
        ),
        UsersCommand::SetRole { id, role } => {
            let actor = session::current_user(&workspace, output)?;

            let Ok(role) = Role::from_str(role) else {
                render_error(
                    output,
                    &CliError::new(
                        format!("invalid role: '{role}'"),
                        "E1001",
                        Some("Use admin or agent."),
                    ),
                );
                anyhow::bail!("invalid role");
            };

            let user = workspace
                .store
                .set_user_role(*id, role, actor.role)
                .map_err(|err| fail(output, &err))?;

            render(
                output,
                &RoleOutput {
                    ok: true,
                    user_id: user.id,
                    role: user.role.to_string(),
                },
                |out, w| writeln!(w, "User #{} is now {}.", out.user_id, out.role),
            )
        }
    }
}
