//! `sf reply` — answer the requester.
//!
//! The reply lands on the ticket timeline, flips status to Answered (even
//! from Closed), and is logged to the outbox addressed to the requester.

use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use supportflow_core::seed::REPLY_TEMPLATES;

use crate::output::{fail, render, render_error, CliError, OutputMode};
use crate::{session, workspace};

#[derive(Args, Debug)]
pub struct ReplyArgs {
    /// Ticket id.
    pub id: u64,

    /// Reply body.
    #[arg(short, long, default_value = "")]
    pub message: String,

    /// Start from a canned template: refund-policy, password-reset, welcome.
    #[arg(short, long)]
    pub template: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReplyOutput {
    ok: bool,
    ticket_id: u64,
    status: String,
    to_email: String,
    messages: usize,
}

fn template_body(name: &str) -> Option<&'static str> {
    REPLY_TEMPLATES
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(&name.replace('-', " ")))
        .map(|t| t.content)
}

/// Compose the final body: template first, then the typed message.
fn compose(template: Option<&str>, message: &str) -> String {
    match (template, message.trim().is_empty()) {
        (Some(canned), true) => canned.to_string(),
        (Some(canned), false) => format!("{canned}\n\n{message}"),
        (None, _) => message.to_string(),
    }
}

pub fn run_reply(args: &ReplyArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let mut workspace = workspace::open(project_root, output)?;
    let author = session::current_user(&workspace, output)?;

    let template = match args.template.as_deref() {
        None => None,
        Some(name) => match template_body(name) {
            Some(body) => Some(body),
            None => {
                render_error(
                    output,
                    &CliError::new(
                        format!("unknown template '{name}'"),
                        "E2001",
                        Some("Templates: refund-policy, password-reset, welcome."),
                    ),
                );
                anyhow::bail!("unknown template");
            }
        },
    };

    let body = compose(template, &args.message);
    let ticket = workspace
        .store
        .append_reply(args.id, &body, author.id)
        .map_err(|err| fail(output, &err))?;

    render(
        output,
        &ReplyOutput {
            ok: true,
            ticket_id: ticket.id,
            status: ticket.status.to_string(),
            to_email: ticket.requester_email.clone(),
            messages: ticket.messages.len(),
        },
        |out, w| {
            writeln!(
                w,
                "Replied to ticket #{} (now {}). Outbound mail logged for {}.",
                out.ticket_id, out.status, out.to_email
            )
        },
    )
}
