//! `sf priority` — re-triage a ticket's priority.

use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use supportflow_core::model::Priority;

use crate::output::{fail, render, render_error, CliError, OutputMode};
use crate::workspace;

#[derive(Args, Debug)]
pub struct PriorityArgs {
    /// Ticket id.
    pub id: u64,

    /// New priority: low, medium, high, urgent.
    pub priority: String,
}

#[derive(Debug, Serialize)]
struct PriorityOutput {
    ok: bool,
    ticket_id: u64,
    priority: String,
}

pub fn run_priority(
    args: &PriorityArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut workspace = workspace::open(project_root, output)?;

    let Ok(priority) = Priority::from_str(&args.priority) else {
        render_error(
            output,
            &CliError::new(
                format!("invalid priority: '{}'", args.priority),
                "E1001",
                Some("Use one of: low, medium, high, urgent."),
            ),
        );
        anyhow::bail!("invalid priority");
    };

    let ticket = workspace
        .store
        .set_priority(args.id, priority)
        .map_err(|err| fail(output, &err))?;

    render(
        output,
        &PriorityOutput {
            ok: true,
            ticket_id: ticket.id,
            priority: ticket.priority.to_string(),
        },
        |out, w| writeln!(w, "Ticket #{} is now {} priority.", out.ticket_id, out.priority),
    )
}
