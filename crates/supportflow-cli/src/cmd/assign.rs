//! `sf assign` / `sf unassign` — route tickets to agents.
//!
//! Assigning a new user notifies them; re-assigning the same user or
//! clearing the assignee stays silent.

use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::output::{fail, render, render_error, CliError, OutputMode};
use crate::{session, workspace};

#[derive(Args, Debug)]
pub struct AssignArgs {
    /// Ticket id.
    pub id: u64,

    /// Assignee: a user id, or `me` for the logged-in user.
    #[arg(value_name = "ASSIGNEE")]
    pub assignee: String,
}

#[derive(Args, Debug)]
pub struct UnassignArgs {
    /// Ticket id.
    pub id: u64,
}

#[derive(Debug, Serialize)]
struct AssignOutput {
    ok: bool,
    ticket_id: u64,
    #[serde(rename = "assignedId", skip_serializing_if = "Option::is_none")]
    assigned_id: Option<u64>,
    assignee: Option<String>,
}

pub fn run_assign(args: &AssignArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let mut workspace = workspace::open(project_root, output)?;

    let assignee_id = if args.assignee.eq_ignore_ascii_case("me") {
        session::current_user(&workspace, output)?.id
    } else {
        match args.assignee.parse::<u64>() {
            Ok(id) => id,
            Err(_) => {
                render_error(
                    output,
                    &CliError::new(
                        format!("invalid assignee: '{}'", args.assignee),
                        "E1001",
                        Some("Pass a numeric user id, or `me`."),
                    ),
                );
                anyhow::bail!("invalid assignee");
            }
        }
    };

    let ticket = workspace
        .store
        .set_assignee(args.id, Some(assignee_id))
        .map_err(|err| fail(output, &err))?;
    let assignee = workspace
        .store
        .find_user(assignee_id)
        .map(|u| u.name.clone());

    render(
        output,
        &AssignOutput {
            ok: true,
            ticket_id: ticket.id,
            assigned_id: ticket.assigned_id,
            assignee,
        },
        |out, w| {
            writeln!(
                w,
                "Ticket #{} assigned to {}.",
                out.ticket_id,
                out.assignee.as_deref().unwrap_or("nobody")
            )
        },
    )
}

pub fn run_unassign(
    args: &UnassignArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut workspace = workspace::open(project_root, output)?;

    let ticket = workspace
        .store
        .set_assignee(args.id, None)
        .map_err(|err| fail(output, &err))?;

    render(
        output,
        &AssignOutput {
            ok: true,
            ticket_id: ticket.id,
            assigned_id: None,
            assignee: None,
        },
        |out, w| writeln!(w, "Ticket #{} is now unassigned.", out.ticket_id),
    )
}
