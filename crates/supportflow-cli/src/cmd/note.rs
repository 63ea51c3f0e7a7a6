//! `sf note` — attach an internal note, invisible to the requester.

use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::output::{fail, render, OutputMode};
use crate::{session, workspace};

#[derive(Args, Debug)]
pub struct NoteArgs {
    /// Ticket id.
    pub id: u64,

    /// Note body.
    #[arg(short, long)]
    pub message: String,
}

#[derive(Debug, Serialize)]
struct NoteOutput {
    ok: bool,
    ticket_id: u64,
    status: String,
    notes: usize,
}

pub fn run_note(args: &NoteArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let mut workspace = workspace::open(project_root, output)?;
    let author = session::current_user(&workspace, output)?;

    let ticket = workspace
        .store
        .append_note(args.id, &args.message, author.id)
        .map_err(|err| fail(output, &err))?;

    render(
        output,
        &NoteOutput {
            ok: true,
            ticket_id: ticket.id,
            status: ticket.status.to_string(),
            notes: ticket.notes.len(),
        },
        |out, w| {
            writeln!(
                w,
                "Added internal note to ticket #{} ({} notes, status unchanged: {}).",
                out.ticket_id, out.notes, out.status
            )
        },
    )
}
