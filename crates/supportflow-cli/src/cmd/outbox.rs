//! `sf outbox` — the append-only log of outbound customer replies.

use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use supportflow_core::model::OutboxMessage;

use crate::output::{pretty_rule, render, OutputMode};
use crate::workspace;

#[derive(Args, Debug)]
pub struct OutboxArgs {
    /// Show full message bodies instead of a one-line preview.
    #[arg(long)]
    pub full: bool,
}

#[derive(Debug, Serialize)]
struct OutboxOutput {
    messages: Vec<OutboxMessage>,
    total: usize,
}

fn preview(content: &str) -> String {
    let first_line = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    if first_line.chars().count() > 60 {
        let cut: String = first_line.chars().take(57).collect();
        format!("{cut}...")
    } else {
        first_line.to_string()
    }
}

pub fn run_outbox(args: &OutboxArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let workspace = workspace::open(project_root, output)?;

    // Newest first for display; the stored order stays append-only.
    let mut messages = workspace.store.outbox().to_vec();
    messages.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));

    render(
        output,
        &OutboxOutput {
            total: messages.len(),
            messages,
        },
        |out, w| {
            if out.messages.is_empty() {
                return writeln!(w, "Outbox is empty.");
            }
            for message in &out.messages {
                writeln!(
                    w,
                    "#{:<3} {}  to {}",
                    message.id,
                    message.sent_at.format("%Y-%m-%d %H:%M"),
                    message.to_email
                )?;
                if args.full {
                    writeln!(w, "{}", message.content)?;
                    pretty_rule(w)?;
                } else {
                    writeln!(w, "     {}", preview(&message.content))?;
                }
            }
            writeln!(w, "{} outbound messages", out.total)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::preview;

    #[test]
    fn preview_takes_the_first_nonempty_line() {
        assert_eq!(preview("Hi there,\n\nAll fixed."), "Hi there,");
        assert_eq!(preview("\n\nLate greeting"), "Late greeting");
        assert_eq!(preview(""), "");
    }

    #[test]
    fn preview_truncates_long_lines() {
        let long = "x".repeat(80);
        let short = preview(&long);
        assert_eq!(short.chars().count(), 60);
        assert!(short.ends_with("..."));
    }
}
