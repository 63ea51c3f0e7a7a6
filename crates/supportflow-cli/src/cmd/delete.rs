//! `sf delete` — permanently remove a ticket. Admin only; messages and
//! notes go with it, no tombstone.

use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::output::{fail, render, OutputMode};
use crate::{session, workspace};

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Ticket id.
    pub id: u64,
}

#[derive(Debug, Serialize)]
struct DeleteOutput {
    ok: bool,
    deleted_id: u64,
}

pub fn run_delete(args: &DeleteArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let mut workspace = workspace::open(project_root, output)?;
    let actor = session::current_user(&workspace, output)?;

    workspace
        .store
        .delete_ticket(args.id, actor.role)
        .map_err(|err| fail(output, &err))?;

    render(
        output,
        &DeleteOutput {
            ok: true,
            deleted_id: args.id,
        },
        |out, w| writeln!(w, "Ticket #{} permanently deleted.", out.deleted_id),
    )
}
