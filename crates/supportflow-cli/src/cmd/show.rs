//! `sf show` — one ticket with its merged timeline.

use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use supportflow_core::model::{Ticket, TimelineEntry};

use crate::output::{fail, pretty_kv, pretty_rule, render, OutputMode};
use crate::workspace;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Ticket id.
    pub id: u64,

    /// Hide internal notes from the timeline.
    #[arg(long)]
    pub public_only: bool,
}

#[derive(Debug, Serialize)]
struct ShowOutput {
    ticket: Ticket,
    assignee: Option<String>,
}

pub fn run_show(args: &ShowArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let workspace = workspace::open(project_root, output)?;
    let ticket = workspace
        .store
        .ticket(args.id)
        .map_err(|err| fail(output, &err))?
        .clone();
    let assignee = ticket
        .assigned_id
        .and_then(|id| workspace.store.find_user(id))
        .map(|u| u.name.clone());

    render(
        output,
        &ShowOutput { ticket, assignee },
        |out, w| {
            let ticket = &out.ticket;
            writeln!(w, "Ticket #{}: {}", ticket.id, ticket.subject)?;
            pretty_rule(w)?;
            pretty_kv(w, "Requester", &ticket.requester_email)?;
            pretty_kv(w, "Status", ticket.status.to_string())?;
            pretty_kv(w, "Priority", ticket.priority.to_string())?;
            pretty_kv(
                w,
                "Assignee",
                out.assignee.as_deref().unwrap_or("Unassigned"),
            )?;
            pretty_kv(w, "Created", ticket.created_at.format("%Y-%m-%d %H:%M").to_string())?;
            pretty_kv(w, "Updated", ticket.updated_at.format("%Y-%m-%d %H:%M").to_string())?;
            pretty_rule(w)?;
            for entry in ticket.timeline() {
                if args.public_only && entry.is_internal() {
                    continue;
                }
                match entry {
                    TimelineEntry::Message(message) => {
                        writeln!(
                            w,
                            "[{}] {} ({}):",
                            message.created_at.format("%Y-%m-%d %H:%M"),
                            message.author_name,
                            if message.from_agent { "agent" } else { "requester" },
                        )?;
                        writeln!(w, "  {}", message.body)?;
                    }
                    TimelineEntry::Note(note) => {
                        writeln!(
                            w,
                            "[{}] {} (internal note):",
                            note.created_at.format("%Y-%m-%d %H:%M"),
                            note.author_name,
                        )?;
                        writeln!(w, "  {}", note.body)?;
                    }
                }
            }
            Ok(())
        },
    )
}
