//! `sf ai` — best-effort enrichment over a ticket.
//!
//! The call runs on a worker thread with the client's timeout bounding it;
//! any failure (no key, network, malformed output) degrades to the static
//! fallback instead of surfacing an error.

use clap::{Args, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use supportflow_core::model::{KbArticle, Ticket};
use supportflow_enrich::{
    background, draft_or_fallback, suggest_or_fallback, summarize_or_fallback, GeminiClient,
    FALLBACK_DRAFT, FALLBACK_SUMMARY,
};

use crate::output::{fail, pretty_rule, render, OutputMode};
use crate::workspace::{self, Workspace};

#[derive(Args, Debug)]
pub struct AiArgs {
    #[command(subcommand)]
    pub command: AiCommand,
}

#[derive(Subcommand, Debug)]
pub enum AiCommand {
    /// Summarize the ticket conversation.
    Summarize {
        /// Ticket id.
        id: u64,
    },

    /// Suggest relevant knowledge-base articles for the ticket.
    Suggest {
        /// Ticket id.
        id: u64,
    },

    /// Draft a reply to the requester's latest message.
    Draft {
        /// Ticket id.
        id: u64,
    },
}

#[derive(Debug, Serialize)]
struct TextOutput {
    ticket_id: u64,
    text: String,
    fallback: bool,
}

#[derive(Debug, Serialize)]
struct SuggestOutput {
    ticket_id: u64,
    article_ids: Vec<u64>,
    titles: Vec<String>,
}

fn load_ticket(workspace: &Workspace, id: u64, output: OutputMode) -> anyhow::Result<Ticket> {
    workspace
        .store
        .ticket(id)
        .map(Clone::clone)
        .map_err(|err| fail(output, &err))
}

/// Run one enrichment call off-thread so a hung collaborator cannot wedge
/// the command past its timeout; a dead worker degrades to the fallback.
fn enrich_in_background<T: Send + 'static>(
    work: impl FnOnce() -> T + Send + 'static,
    fallback: T,
) -> T {
    background::spawn(work).wait().unwrap_or(fallback)
}

pub fn run_ai(args: &AiArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let workspace = workspace::open(project_root, output)?;
    let enrich_config = workspace.config.enrich.clone();

    match &args.command {
        AiCommand::Summarize { id } => {
            let ticket = load_ticket(&workspace, *id, output)?;
            let text = enrich_in_background(
                {
                    let ticket = ticket.clone();
                    move || match GeminiClient::from_config(&enrich_config) {
                        Ok(client) => summarize_or_fallback(&client, &ticket),
                        Err(_) => FALLBACK_SUMMARY.to_string(),
                    }
                },
                FALLBACK_SUMMARY.to_string(),
            );
            render(
                output,
                &TextOutput {
                    ticket_id: *id,
                    fallback: text == FALLBACK_SUMMARY,
                    text,
                },
                |out, w| {
                    writeln!(w, "Summary for ticket #{}", out.ticket_id)?;
                    pretty_rule(w)?;
                    writeln!(w, "{}", out.text)
                },
            )
        }
        AiCommand::Suggest { id } => {
            let ticket = load_ticket(&workspace, *id, output)?;
            let articles: Vec<KbArticle> = workspace.store.articles().to_vec();
            let issue = ticket
                .messages
                .first()
                .map(|m| m.body.clone())
                .unwrap_or_default();
            let ids = enrich_in_background(
                {
                    let articles = articles.clone();
                    move || match GeminiClient::from_config(&enrich_config) {
                        Ok(client) => suggest_or_fallback(&client, &issue, &articles),
                        Err(_) => Vec::new(),
                    }
                },
                Vec::new(),
            );
            let titles = ids
                .iter()
                .filter_map(|id| articles.iter().find(|a| a.id == *id))
                .map(|a| a.title.clone())
                .collect();
            render(
                output,
                &SuggestOutput {
                    ticket_id: *id,
                    article_ids: ids,
                    titles,
                },
                |out, w| {
                    if out.article_ids.is_empty() {
                        return writeln!(w, "No article suggestions available.");
                    }
                    writeln!(w, "Suggested articles for ticket #{}", out.ticket_id)?;
                    for (article_id, title) in out.article_ids.iter().zip(&out.titles) {
                        writeln!(w, "  #{article_id} {title}")?;
                    }
                    Ok(())
                },
            )
        }
        AiCommand::Draft { id } => {
            let ticket = load_ticket(&workspace, *id, output)?;
            let text = enrich_in_background(
                {
                    let ticket = ticket.clone();
                    move || match GeminiClient::from_config(&enrich_config) {
                        Ok(client) => draft_or_fallback(&client, &ticket),
                        Err(_) => FALLBACK_DRAFT.to_string(),
                    }
                },
                FALLBACK_DRAFT.to_string(),
            );
            render(
                output,
                &TextOutput {
                    ticket_id: *id,
                    fallback: text == FALLBACK_DRAFT,
                    text,
                },
                |out, w| {
                    writeln!(w, "Draft reply for ticket #{}", out.ticket_id)?;
                    pretty_rule(w)?;
                    writeln!(w, "{}", out.text)?;
                    writeln!(w)?;
                    writeln!(w, "Send it with `sf reply {} --message ...`", out.ticket_id)
                },
            )
        }
    }
}
