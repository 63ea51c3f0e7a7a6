use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the workspace data directory, created by `sf init`.
pub const DATA_DIR: &str = ".supportflow";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProjectConfig {
    #[serde(default)]
    pub list: ListConfig,
    #[serde(default)]
    pub enrich: EnrichConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Settings for the AI drafting collaborator. The API key may come from the
/// `GEMINI_API_KEY` env var instead of the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl EnrichConfig {
    /// Config key first, then environment.
    #[must_use]
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| env::var("GEMINI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }
}

/// Locate the workspace data directory by walking up from `start`.
#[must_use]
pub fn find_data_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(DATA_DIR);
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

pub fn load_project_config(data_dir: &Path) -> Result<ProjectConfig> {
    let path = data_dir.join("config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

const fn default_page_size() -> usize {
    10
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::{find_data_dir, load_project_config, ProjectConfig, DATA_DIR};
    use tempfile::TempDir;

    #[test]
    fn missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = load_project_config(dir.path()).unwrap();
        assert_eq!(cfg.list.page_size, 10);
        assert_eq!(cfg.enrich.model, "gemini-3-flash-preview");
        assert_eq!(cfg.enrich.timeout_secs, 10);
        assert!(cfg.enrich.api_key.is_none());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "[list]\npage_size = 25\n",
        )
        .unwrap();
        let cfg = load_project_config(dir.path()).unwrap();
        assert_eq!(cfg.list.page_size, 25);
        assert_eq!(cfg.enrich.timeout_secs, 10);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "[list\npage_size").unwrap();
        assert!(load_project_config(dir.path()).is_err());
    }

    #[test]
    fn data_dir_is_found_from_a_subdirectory() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join(DATA_DIR);
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&data).unwrap();
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_data_dir(&nested).unwrap(), data);
    }

    #[test]
    fn default_config_serializes_cleanly() {
        let cfg = ProjectConfig::default();
        let rendered = toml::to_string_pretty(&cfg).unwrap();
        assert!(rendered.contains("page_size"));
    }
}
