//! Shared output layer for human/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its result
//! accordingly: labeled text for humans, stable JSON for scripts and
//! agents. Errors render the core's machine-readable code and hint.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{self, Write};

use supportflow_core::Error;

/// Shared width for human output separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<12} {}", format!("{key}:"), value.as_ref())
}

/// The two output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-optimized output (sections, key/value framing).
    Human,
    /// Machine-readable JSON (one object per result).
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    #[must_use]
    pub fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Render a serializable value: pretty JSON in JSON mode, the provided
/// closure otherwise.
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    human: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Human => human(value, &mut out)?,
    }
    Ok(())
}

/// A structured failure with a stable code and optional hint.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub ok: bool,
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl CliError {
    #[must_use]
    pub fn new(error: impl Into<String>, code: impl Into<String>, hint: Option<&str>) -> Self {
        Self {
            ok: false,
            error: error.into(),
            code: code.into(),
            hint: hint.map(ToString::to_string),
        }
    }
}

impl From<&Error> for CliError {
    fn from(err: &Error) -> Self {
        let code = err.code();
        Self::new(err.to_string(), code.code(), code.hint())
    }
}

/// Print a structured error: JSON object in JSON mode, `error[CODE]` lines
/// otherwise. Errors go to stderr in human mode so piped output stays clean.
pub fn render_error(mode: OutputMode, err: &CliError) {
    if mode.is_json() {
        if let Ok(body) = serde_json::to_string_pretty(err) {
            println!("{body}");
        }
    } else {
        eprintln!("error[{}]: {}", err.code, err.error);
        if let Some(hint) = &err.hint {
            eprintln!("  hint: {hint}");
        }
    }
}

/// Render a domain error and convert it for `?` propagation, so the process
/// exits non-zero after the structured output has been printed.
pub fn fail(mode: OutputMode, err: &Error) -> anyhow::Error {
    render_error(mode, &CliError::from(err));
    anyhow::anyhow!("{err}")
}

/// Compact relative timestamp for listings.
#[must_use]
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        return "Just now".to_string();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    then.format("%Y-%m-%d").to_string()
}
