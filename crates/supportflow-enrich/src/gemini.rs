//! Blocking Gemini client for the drafting contract.
//!
//! One HTTPS call per operation against the `generateContent` endpoint,
//! bounded by the configured timeout. Malformed model output is treated the
//! same as a transport failure: the caller falls back.

use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use supportflow_core::config::EnrichConfig;
use supportflow_core::model::{KbArticle, Ticket};
use supportflow_core::Error;

use crate::Drafting;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiClient {
    agent: ureq::Agent,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Build a client from config. Missing API key is an enrichment error so
    /// an unconfigured workspace degrades instead of panicking.
    pub fn from_config(config: &EnrichConfig) -> Result<Self, Error> {
        let api_key = config
            .resolved_api_key()
            .ok_or_else(|| Error::Enrichment("no API key configured".to_string()))?;
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Ok(Self {
            agent,
            api_key,
            model: config.model.clone(),
        })
    }

    fn generate(&self, prompt: &str, json_response: bool) -> Result<String, Error> {
        let url = format!("{API_BASE}/{}:generateContent?key={}", self.model, self.api_key);
        let mut body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });
        if json_response {
            body["generationConfig"] = json!({ "responseMimeType": "application/json" });
        }

        debug!(model = %self.model, "calling generateContent");
        let response = self
            .agent
            .post(&url)
            .send_json(body)
            .map_err(|err| Error::Enrichment(err.to_string()))?;
        let payload: Value = response
            .into_json()
            .map_err(|err| Error::Enrichment(err.to_string()))?;

        extract_text(&payload)
            .ok_or_else(|| Error::Enrichment("response carried no text".to_string()))
    }
}

/// Pull the generated text out of a `generateContent` response.
fn extract_text(payload: &Value) -> Option<String> {
    let parts = payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    if text.is_empty() { None } else { Some(text) }
}

/// Ticket conversation as alternating `Agent:`/`User:` lines.
fn conversation_text(ticket: &Ticket) -> String {
    ticket
        .messages
        .iter()
        .map(|m| {
            format!(
                "{}: {}",
                if m.from_agent { "Agent" } else { "User" },
                m.body
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tolerant parse of the suggestion response: a JSON array of ids, possibly
/// wrapped in a markdown fence. Anything else is an empty suggestion list.
pub(crate) fn parse_suggestions(text: &str) -> Vec<u64> {
    let trimmed = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(items)) => items.iter().filter_map(Value::as_u64).collect(),
        _ => Vec::new(),
    }
}

impl Drafting for GeminiClient {
    fn summarize(&self, ticket: &Ticket) -> Result<String, Error> {
        let prompt = format!(
            "Summarize the following support ticket conversation in 2-3 concise bullet \
             points:\n\nSubject: {}\n\n{}",
            ticket.subject,
            conversation_text(ticket)
        );
        self.generate(&prompt, false)
    }

    fn suggest_articles(&self, issue: &str, articles: &[KbArticle]) -> Result<Vec<u64>, Error> {
        let catalog = articles
            .iter()
            .map(|a| format!("ID: {} - Title: {}", a.id, a.title))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "Given the customer issue, which of these Knowledge Base articles are most \
             relevant? Return ONLY a JSON array of IDs.\n\nIssue: {issue}\n\nArticles:\n{catalog}"
        );
        let text = self.generate(&prompt, true)?;
        Ok(parse_suggestions(&text))
    }

    fn draft_reply(&self, ticket: &Ticket) -> Result<String, Error> {
        let last_message = ticket
            .last_requester_message()
            .map(|m| m.body.as_str())
            .unwrap_or_default();
        let prompt = format!(
            "Draft a professional support reply to this message: \"{last_message}\". Keep it \
             friendly, helpful, and concise. Start with \"Hi there,\"."
        );
        self.generate(&prompt, false)
    }
}
