//! `sf notifications` — the logged-in user's notification feed.

use clap::{Args, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use supportflow_core::model::AppNotification;

use crate::output::{fail, render, OutputMode};
use crate::{session, workspace};

#[derive(Args, Debug)]
pub struct NotifyArgs {
    #[command(subcommand)]
    pub command: NotifyCommand,
}

#[derive(Subcommand, Debug)]
pub enum NotifyCommand {
    /// Show your notifications, unread first flagged.
    List {
        /// Only unread notifications.
        #[arg(long)]
        unread: bool,
    },

    /// Mark one notification read (marking twice is a no-op).
    Read {
        /// Notification id.
        id: u64,
    },

    /// Mark all of your notifications read.
    ReadAll,
}

#[derive(Debug, Serialize)]
struct NotifyList {
    notifications: Vec<AppNotification>,
    unread: usize,
}

#[derive(Debug, Serialize)]
struct ReadOutput {
    ok: bool,
    marked: usize,
    unread: usize,
}

pub fn run_notifications(
    args: &NotifyArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut workspace = workspace::open(project_root, output)?;
    let user = session::current_user(&workspace, output)?;

    match &args.command {
        NotifyCommand::List { unread } => {
            let notifications: Vec<AppNotification> = workspace
                .store
                .notifications_for(user.id)
                .into_iter()
                .filter(|n| !unread || !n.read)
                .cloned()
                .collect();
            let unread_count = workspace.store.unread_count(user.id);
            render(
                output,
                &NotifyList {
                    notifications,
                    unread: unread_count,
                },
                |out, w| {
                    if out.notifications.is_empty() {
                        return writeln!(w, "No notifications.");
                    }
                    for notification in &out.notifications {
                        let marker = if notification.read { " " } else { "*" };
                        let link = notification
                            .ticket_id
                            .map(|id| format!(" (ticket #{id})"))
                            .unwrap_or_default();
                        writeln!(
                            w,
                            "{marker} #{:<3} {}{link}",
                            notification.id, notification.message
                        )?;
                    }
                    writeln!(w, "{} unread", out.unread)
                },
            )
        }
        NotifyCommand::Read { id } => {
            workspace
                .store
                .mark_notification_read(*id)
                .map_err(|err| fail(output, &err))?;
            let unread = workspace.store.unread_count(user.id);
            render(
                output,
                &ReadOutput {
                    ok: true,
                    marked: 1,
                    unread,
                },
                |out, w| writeln!(w, "Marked read. {} unread remaining.", out.unread),
            )
        }
        NotifyCommand::ReadAll => {
            let marked = workspace.store.mark_all_notifications_read(user.id);
            let unread = workspace.store.unread_count(user.id);
            render(
                output,
                &ReadOutput {
                    ok: true,
                    marked,
                    unread,
                },
                |out, w| {
                    writeln!(
                        w,
                        "Marked {} notifications read. {} unread remaining.",
                        out.marked, out.unread
                    )
                },
            )
        }
    }
}
