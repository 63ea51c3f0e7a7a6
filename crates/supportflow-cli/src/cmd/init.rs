//! `sf init` — provision a workspace in the current directory.
//!
//! Creates `.supportflow/`, writes the default config, and lands the demo
//! dataset on disk so every later command has collections to load.

use chrono::Utc;
use clap::Args;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

use supportflow_core::config::{ProjectConfig, DATA_DIR};
use supportflow_core::persist::JsonDirStore;
use supportflow_core::{seed, Store};

use crate::output::{render, OutputMode};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Re-seed an existing workspace, overwriting its collections.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct InitOutput {
    ok: bool,
    data_dir: String,
    users: usize,
    tickets: usize,
    articles: usize,
}

const COLLECTION_FILES: [&str; 5] = [
    JsonDirStore::USERS,
    JsonDirStore::TICKETS,
    JsonDirStore::ARTICLES,
    JsonDirStore::OUTBOX,
    JsonDirStore::NOTIFICATIONS,
];

pub fn run_init(args: &InitArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let data_dir = project_root.join(DATA_DIR);
    let already_initialized = data_dir.exists();

    if already_initialized && !args.force {
        return render(
            output,
            &InitOutput {
                ok: false,
                data_dir: data_dir.display().to_string(),
                users: 0,
                tickets: 0,
                articles: 0,
            },
            |out, w| {
                writeln!(w, "Workspace already initialized at {}", out.data_dir)?;
                writeln!(w, "Use --force to re-seed it.")
            },
        );
    }

    fs::create_dir_all(&data_dir)?;

    if args.force {
        // Remove the collections so the seed wins over stale disk state.
        for file in COLLECTION_FILES {
            let _ = fs::remove_file(data_dir.join(file));
        }
    }

    let config_path = data_dir.join("config.toml");
    if !config_path.exists() {
        let config = toml::to_string_pretty(&ProjectConfig::default())?;
        fs::write(&config_path, config)?;
    }

    let store = Store::init(
        seed::demo(Utc::now()),
        Box::new(JsonDirStore::new(&data_dir)),
    );
    store.persist_all();

    render(
        output,
        &InitOutput {
            ok: true,
            data_dir: data_dir.display().to_string(),
            users: store.users().len(),
            tickets: store.tickets().len(),
            articles: store.articles().len(),
        },
        |out, w| {
            if args.force {
                writeln!(w, "Re-seeded workspace at {}", out.data_dir)?;
            } else {
                writeln!(w, "Initialized workspace at {}", out.data_dir)?;
            }
            writeln!(
                w,
                "Seeded {} users, {} tickets, {} KB articles.",
                out.users, out.tickets, out.articles
            )?;
            writeln!(w, "Log in with `sf login agent@supportflow.com`.")
        },
    )
}
