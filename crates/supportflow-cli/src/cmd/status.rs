//! `sf status` — move a ticket to any lifecycle state.
//!
//! All transitions are allowed; triage stays flexible and a closed ticket
//! can always come back.

use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use supportflow_core::model::Status;

use crate::output::{fail, render, render_error, CliError, OutputMode};
use crate::workspace;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Ticket id.
    pub id: u64,

    /// New status: open, pending, answered, closed.
    pub status: String,
}

#[derive(Debug, Serialize)]
struct StatusOutput {
    ok: bool,
    ticket_id: u64,
    status: String,
}

pub fn run_status(args: &StatusArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let mut workspace = workspace::open(project_root, output)?;

    let Ok(status) = Status::from_str(&args.status) else {
        render_error(
            output,
            &CliError::new(
                format!("invalid status: '{}'", args.status),
                "E1001",
                Some("Use one of: open, pending, answered, closed."),
            ),
        );
        anyhow::bail!("invalid status");
    };

    let ticket = workspace
        .store
        .set_status(args.id, status)
        .map_err(|err| fail(output, &err))?;

    render(
        output,
        &StatusOutput {
            ok: true,
            ticket_id: ticket.id,
            status: ticket.status.to_string(),
        },
        |out, w| writeln!(w, "Ticket #{} is now {}.", out.ticket_id, out.status),
    )
}
