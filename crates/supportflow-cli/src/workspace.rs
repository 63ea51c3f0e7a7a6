//! Workspace discovery and store construction for CLI commands.

use anyhow::Result;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use supportflow_core::config::{self, ProjectConfig, DATA_DIR};
use supportflow_core::persist::JsonDirStore;
use supportflow_core::{seed, Store};
use supportflow_view::RecentFilters;

use crate::output::{render_error, CliError, OutputMode};

const RECENT_FILTERS_FILE: &str = "recent_filters.json";

/// An opened workspace: data directory, effective config, and the store
/// hydrated from disk (seed fallback for absent collections).
pub struct Workspace {
    pub data_dir: PathBuf,
    pub config: ProjectConfig,
    pub store: Store,
}

/// Open the workspace containing `start`, walking parent directories the
/// way version-control tools do. Renders a structured error and fails when
/// no workspace exists.
pub fn open(start: &Path, output: OutputMode) -> Result<Workspace> {
    let Some(data_dir) = config::find_data_dir(start) else {
        render_error(
            output,
            &CliError::new(
                format!("no {DATA_DIR} workspace found here or in any parent directory"),
                "E4001",
                Some("Run `sf init` to create a workspace here."),
            ),
        );
        anyhow::bail!("workspace not initialized");
    };
    open_at(data_dir)
}

/// Open a known data directory without discovery.
pub fn open_at(data_dir: PathBuf) -> Result<Workspace> {
    let config = config::load_project_config(&data_dir)?;
    let store = Store::init(
        seed::demo(Utc::now()),
        Box::new(JsonDirStore::new(&data_dir)),
    );
    Ok(Workspace {
        data_dir,
        config,
        store,
    })
}

impl Workspace {
    /// Saved-view memory, absent or corrupt files degrading to empty.
    #[must_use]
    pub fn load_recent_filters(&self) -> RecentFilters {
        let path = self.data_dir.join(RECENT_FILTERS_FILE);
        let Ok(content) = fs::read_to_string(&path) else {
            return RecentFilters::new();
        };
        serde_json::from_str(&content).unwrap_or_else(|err| {
            warn!(path = %path.display(), %err, "failed to parse saved views, starting fresh");
            RecentFilters::new()
        })
    }

    /// Best-effort save, same contract as collection persistence.
    pub fn save_recent_filters(&self, recent: &RecentFilters) {
        let path = self.data_dir.join(RECENT_FILTERS_FILE);
        match serde_json::to_string_pretty(recent) {
            Ok(content) => {
                if let Err(err) = fs::write(&path, content) {
                    warn!(path = %path.display(), %err, "failed to save views; in-memory state kept");
                }
            }
            Err(err) => warn!(%err, "failed to serialize saved views"),
        }
    }
}
