//! `sf list` — the support inbox: filter, sort, paginate, saved views.

use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use supportflow_core::model::Ticket;
use supportflow_view::{
    filter_tickets, paginate, PriorityFilter, RecentFilters, StatusFilter, TicketFilter,
};

use crate::output::{pretty_rule, render, render_error, time_ago, CliError, OutputMode};
use crate::workspace::{self, Workspace};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by status: all, open, pending, answered, closed.
    #[arg(short, long, default_value = "all")]
    pub status: String,

    /// Filter by priority: all, low, medium, high, urgent.
    #[arg(short, long, default_value = "all")]
    pub priority: String,

    /// Case-insensitive search over subject and requester email.
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// How many pages of results to show ("load more" count).
    #[arg(long, default_value = "1")]
    pub pages: usize,

    /// Show everything, ignoring pagination.
    #[arg(long)]
    pub all: bool,

    /// Re-apply a saved view by number (see --views).
    #[arg(long)]
    pub view: Option<usize>,

    /// List saved views instead of tickets.
    #[arg(long)]
    pub views: bool,

    /// Forget one saved view by number.
    #[arg(long)]
    pub forget_view: Option<usize>,

    /// Forget every saved view.
    #[arg(long)]
    pub clear_views: bool,
}

#[derive(Debug, Serialize)]
struct TicketRow {
    id: u64,
    subject: String,
    #[serde(rename = "requesterEmail")]
    requester_email: String,
    status: String,
    priority: String,
    #[serde(rename = "assignedId", skip_serializing_if = "Option::is_none")]
    assigned_id: Option<u64>,
    assignee: Option<String>,
    #[serde(rename = "updatedAt")]
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct ListOutput {
    tickets: Vec<TicketRow>,
    total: usize,
    shown: usize,
    has_more: bool,
}

#[derive(Debug, Serialize)]
struct ViewsOutput {
    views: Vec<ViewRow>,
}

#[derive(Debug, Serialize)]
struct ViewRow {
    number: usize,
    query: String,
    status: String,
    priority: String,
}

fn parse_filter(args: &ListArgs, output: OutputMode) -> anyhow::Result<TicketFilter> {
    let status = StatusFilter::from_str(&args.status);
    let priority = PriorityFilter::from_str(&args.priority);
    match (status, priority) {
        (Ok(status), Ok(priority)) => Ok(TicketFilter {
            status,
            priority,
            query: args.query.clone(),
        }),
        (Err(err), _) | (_, Err(err)) => {
            render_error(
                output,
                &CliError::new(
                    err.to_string(),
                    "E1001",
                    Some("Statuses: open, pending, answered, closed. Priorities: low, medium, high, urgent."),
                ),
            );
            anyhow::bail!("invalid filter")
        }
    }
}

fn row(ticket: &Ticket, workspace: &Workspace) -> TicketRow {
    let assignee = ticket
        .assigned_id
        .and_then(|id| workspace.store.find_user(id))
        .map(|u| u.name.clone());
    TicketRow {
        id: ticket.id,
        subject: ticket.subject.clone(),
        requester_email: ticket.requester_email.clone(),
        status: ticket.status.to_string(),
        priority: ticket.priority.to_string(),
        assigned_id: ticket.assigned_id,
        assignee,
        updated_at: ticket.updated_at,
    }
}

fn render_views(recent: &RecentFilters, output: OutputMode) -> anyhow::Result<()> {
    let views = recent
        .entries()
        .iter()
        .enumerate()
        .map(|(i, snapshot)| ViewRow {
            number: i + 1,
            query: snapshot.query.clone(),
            status: snapshot.status.to_string(),
            priority: snapshot.priority.to_string(),
        })
        .collect();
    render(output, &ViewsOutput { views }, |out, w| {
        if out.views.is_empty() {
            return writeln!(w, "No saved views yet. Apply a filter to record one.");
        }
        for view in &out.views {
            let label = if view.query.is_empty() {
                "Filtered View".to_string()
            } else {
                view.query.clone()
            };
            writeln!(
                w,
                "{:>2}. {label} [{} / {}]",
                view.number, view.status, view.priority
            )?;
        }
        Ok(())
    })
}

#[allow(clippy::too_many_lines)]
pub fn run_list(args: &ListArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let workspace = workspace::open(project_root, output)?;
    let mut recent = workspace.load_recent_filters();

    if args.views {
        return render_views(&recent, output);
    }
    if args.clear_views {
        recent.clear();
        workspace.save_recent_filters(&recent);
        return render_views(&recent, output);
    }
    if let Some(number) = args.forget_view {
        if recent.remove(number.saturating_sub(1)).is_none() {
            render_error(
                output,
                &CliError::new(format!("no saved view #{number}"), "E2001", None),
            );
            anyhow::bail!("no such view");
        }
        workspace.save_recent_filters(&recent);
        return render_views(&recent, output);
    }

    let filter = if let Some(number) = args.view {
        let Some(snapshot) = recent.entries().get(number.saturating_sub(1)) else {
            render_error(
                output,
                &CliError::new(
                    format!("no saved view #{number}"),
                    "E2001",
                    Some("List saved views with `sf list --views`."),
                ),
            );
            anyhow::bail!("no such view");
        };
        snapshot.to_filter()
    } else {
        parse_filter(args, output)?
    };

    // Applying a non-trivial filter records it, duplicate-to-front.
    if recent.record(&filter) {
        workspace.save_recent_filters(&recent);
    }

    // The store keeps tickets in recency order already.
    let filtered = filter_tickets(workspace.store.tickets(), &filter);
    let page_size = if args.all {
        filtered.len().max(1)
    } else {
        workspace.config.list.page_size
    };
    let page = paginate(&filtered, page_size, args.pages.max(1));

    let rows: Vec<TicketRow> = page.items.iter().map(|t| row(t, &workspace)).collect();
    let now = Utc::now();

    render(
        output,
        &ListOutput {
            shown: rows.len(),
            total: page.total,
            has_more: page.has_more,
            tickets: rows,
        },
        |out, w| {
            if out.tickets.is_empty() {
                return writeln!(w, "No tickets match your filters.");
            }
            for ticket in &out.tickets {
                writeln!(
                    w,
                    "#{:<4} {:<9} {:<7} {:<12} {}",
                    ticket.id,
                    ticket.status,
                    ticket.priority,
                    time_ago(ticket.updated_at, now),
                    ticket.subject
                )?;
                writeln!(
                    w,
                    "      {} / {}",
                    ticket.requester_email,
                    ticket.assignee.as_deref().unwrap_or("Unassigned")
                )?;
            }
            pretty_rule(w)?;
            writeln!(w, "{} of {} tickets", out.shown, out.total)?;
            if out.has_more {
                writeln!(
                    w,
                    "More remain: re-run with --pages {} or --all",
                    args.pages.max(1) + 1
                )?;
            }
            Ok(())
        },
    )
}
