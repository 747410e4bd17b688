use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::compare::SelectionLimits;

/// Environment variable naming the dataset file.
pub const DATA_ENV: &str = "GANZHI_DATA";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub compare: CompareConfig,
    #[serde(default)]
    pub graph: GraphConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// Dataset file, relative paths resolved against the project root.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareConfig {
    #[serde(default = "default_min_selection")]
    pub min_selection: usize,
    #[serde(default = "default_max_selection")]
    pub max_selection: usize,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            min_selection: default_min_selection(),
            max_selection: default_max_selection(),
        }
    }
}

impl CompareConfig {
    #[must_use]
    pub const fn limits(&self) -> SelectionLimits {
        SelectionLimits {
            min: self.min_selection,
            max: self.max_selection,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Per relation type color overrides, keyed by label (`"六冲" = "#ff0000"`).
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    pub resolved_output: String,
    pub resolved_data: Option<PathBuf>,
}

pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(".ganzhi/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("ganzhi/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn resolve_config(
    project_root: &Path,
    cli_json: bool,
    cli_data: Option<&Path>,
) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;

    let env_format = env::var("FORMAT").ok();
    let resolved_output = resolve_output(cli_json, user.output.clone(), env_format);

    let env_data = env::var_os(DATA_ENV).map(PathBuf::from);
    let resolved_data = resolve_data_path(project_root, cli_data, env_data, &project.data);

    Ok(EffectiveConfig {
        project,
        user,
        resolved_output,
        resolved_data,
    })
}

/// Dataset path precedence: CLI flag, then `GANZHI_DATA`, then project config.
fn resolve_data_path(
    project_root: &Path,
    cli_data: Option<&Path>,
    env_data: Option<PathBuf>,
    config: &DataConfig,
) -> Option<PathBuf> {
    if let Some(path) = cli_data {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env_data.filter(|p| !p.as_os_str().is_empty()) {
        return Some(path);
    }
    config.path.as_ref().map(|p| {
        if p.is_absolute() {
            p.clone()
        } else {
            project_root.join(p)
        }
    })
}

fn resolve_output(cli_json: bool, user_output: Option<String>, env_format: Option<String>) -> String {
    fn normalize_output_mode(raw: &str) -> Option<&'static str> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" | "human" => Some("pretty"),
            "text" | "table" => Some("text"),
            "json" => Some("json"),
            _ => None,
        }
    }

    if cli_json {
        return "json".to_string();
    }

    if let Some(mode) = env_format.as_deref().and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if let Some(mode) = user_output.as_deref().and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if std::io::stdout().is_terminal() {
        "pretty".to_string()
    } else {
        "text".to_string()
    }
}

const fn default_min_selection() -> usize {
    2
}

const fn default_max_selection() -> usize {
    10
}
