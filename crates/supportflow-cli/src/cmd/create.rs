//! `sf create` — open a ticket on behalf of a requester.

use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use supportflow_core::lifecycle::CreateTicketInput;
use supportflow_core::model::{Priority, Ticket};

use crate::output::{fail, render, render_error, CliError, OutputMode};
use crate::workspace;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// One-line summary of the issue.
    #[arg(short, long)]
    pub subject: String,

    /// Requester email address.
    #[arg(short, long = "requester")]
    pub requester_email: String,

    /// Initial message from the requester.
    #[arg(short, long)]
    pub message: String,

    /// Priority: low, medium, high, urgent.
    #[arg(short, long, default_value = "medium")]
    pub priority: String,

    /// Requester display name (defaults to the email's local part).
    #[arg(long)]
    pub requester_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateOutput {
    ok: bool,
    ticket: Ticket,
}

pub fn run_create(args: &CreateArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
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

    let input = CreateTicketInput {
        subject: args.subject.clone(),
        requester_email: args.requester_email.clone(),
        priority,
        message: args.message.clone(),
        requester_name: args.requester_name.clone(),
    };

    let ticket = workspace
        .store
        .create_ticket(&input)
        .map_err(|err| fail(output, &err))?;

    render(
        output,
        &CreateOutput { ok: true, ticket },
        |out, w| {
            writeln!(
                w,
                "Created ticket #{}: {} [{} / {}]",
                out.ticket.id, out.ticket.subject, out.ticket.status, out.ticket.priority
            )
        },
    )
}
