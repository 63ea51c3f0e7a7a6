//! `sf stats` — the dashboard numbers, relative to the logged-in user.

use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use supportflow_view::TicketStats;

use crate::output::{pretty_kv, pretty_rule, render, OutputMode};
use crate::{session, workspace};

#[derive(Args, Debug)]
pub struct StatsArgs {}

#[derive(Debug, Serialize)]
struct StatsOutput {
    #[serde(flatten)]
    stats: TicketStats,
    resolution_rate: usize,
    unread_notifications: usize,
}

pub fn run_stats(_args: &StatsArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let workspace = workspace::open(project_root, output)?;
    let user = session::current_user(&workspace, output)?;

    let stats = TicketStats::collect(workspace.store.tickets(), user.id);
    let unread = workspace.store.unread_count(user.id);

    render(
        output,
        &StatsOutput {
            stats,
            resolution_rate: stats.resolution_rate(),
            unread_notifications: unread,
        },
        |out, w| {
            writeln!(w, "Workspace overview")?;
            pretty_rule(w)?;
            pretty_kv(w, "Total", out.stats.total.to_string())?;
            pretty_kv(w, "Open", out.stats.open.to_string())?;
            pretty_kv(w, "Pending", out.stats.pending.to_string())?;
            pretty_kv(w, "Urgent", out.stats.urgent.to_string())?;
            pretty_kv(w, "My queue", out.stats.assigned_to_me.to_string())?;
            pretty_kv(w, "Resolved", format!("{} ({}%)", out.stats.resolved, out.resolution_rate))?;
            pretty_kv(w, "Unread", out.unread_notifications.to_string())
        },
    )
}
