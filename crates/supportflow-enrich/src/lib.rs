#![forbid(unsafe_code)]
//! supportflow-enrich library.
//!
//! Best-effort AI enrichment layered on top of ticket data: a conversation
//! summary, suggested knowledge-base articles, and a reply draft. Nothing
//! here is authoritative: every call degrades to a static fallback and the
//! core stays fully usable when the collaborator is down, slow, or
//! unconfigured.
//!
//! # Conventions
//!
//! - **Errors**: `supportflow_core::Error::Enrichment`, logged and swallowed
//!   at the `*_or_fallback` boundary.
//! - **Logging**: use `tracing` macros (`warn!`, `debug!`).

pub mod background;
pub mod gemini;

use tracing::warn;

use supportflow_core::model::{KbArticle, Ticket};
use supportflow_core::Error;

pub use gemini::GeminiClient;

/// Shown in place of a summary when the collaborator fails.
pub const FALLBACK_SUMMARY: &str =
    "AI insight is unavailable for this ticket right now. Review the timeline manually.";

/// Seeded into the compose pane when drafting fails.
pub const FALLBACK_DRAFT: &str = "Hi there,\n\nThanks for reaching out. ";

/// The drafting collaborator contract. Implementations may block for the
/// duration of one network call; callers that must not block use
/// [`background::spawn`].
pub trait Drafting {
    /// Condense the ticket conversation into a few bullet points.
    fn summarize(&self, ticket: &Ticket) -> Result<String, Error>;

    /// Rank the given articles by relevance to the issue text, returning
    /// ids only, best first. An empty list is a valid answer.
    fn suggest_articles(&self, issue: &str, articles: &[KbArticle]) -> Result<Vec<u64>, Error>;

    /// Draft a reply to the requester's latest message.
    fn draft_reply(&self, ticket: &Ticket) -> Result<String, Error>;
}

/// Summarize, degrading to [`FALLBACK_SUMMARY`] on any failure.
pub fn summarize_or_fallback(service: &dyn Drafting, ticket: &Ticket) -> String {
    match service.summarize(ticket) {
        Ok(summary) => summary,
        Err(err) => {
            warn!(ticket = ticket.id, %err, "summary enrichment failed");
            FALLBACK_SUMMARY.to_string()
        }
    }
}

/// Suggest articles, degrading to an empty list on any failure.
pub fn suggest_or_fallback(
    service: &dyn Drafting,
    issue: &str,
    articles: &[KbArticle],
) -> Vec<u64> {
    match service.suggest_articles(issue, articles) {
        Ok(ids) => ids,
        Err(err) => {
            warn!(%err, "article suggestion enrichment failed");
            Vec::new()
        }
    }
}

/// Draft a reply, degrading to [`FALLBACK_DRAFT`] on any failure.
pub fn draft_or_fallback(service: &dyn Drafting, ticket: &Ticket) -> String {
    match service.draft_reply(ticket) {
        Ok(draft) => draft,
        Err(err) => {
            warn!(ticket = ticket.id, %err, "reply draft enrichment failed");
            FALLBACK_DRAFT.to_string()
        }
    }
}
