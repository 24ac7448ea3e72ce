use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ErrorCode;

/// Failures loading a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } => ErrorCode::InternalUnexpected,
            Self::Parse { .. } => ErrorCode::ConfigParseError,
        }
    }
}

/// Project-level settings from `.coursetree/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub roots: RootsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootsConfig {
    /// Promote drafts whose parent is a sequential to subtree roots.
    #[serde(default = "default_true")]
    pub use_parent_category: bool,
}

impl Default for RootsConfig {
    fn default() -> Self {
        Self {
            use_parent_category: default_true(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: Option<String>,
}

/// Per-user settings from `<config_dir>/coursetree/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

/// Project and user config, loaded together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
}

impl EffectiveConfig {
    /// Output format named in config: the project's `[output] format`, else
    /// the user's `output`. Flags, `FORMAT` and TTY detection are applied by
    /// the caller.
    pub fn configured_output(&self) -> Option<&str> {
        self.project
            .output
            .format
            .as_deref()
            .or(self.user.output.as_deref())
    }
}

pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".coursetree/config.toml")
}

fn load_toml<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed = toml::from_str::<T>(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parsed)
}

pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_config_path(project_root);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }
    load_toml(&path)
}

pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("coursetree/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }
    load_toml(&path)
}

/// Load the project config under `project_root` and the user config.
pub fn resolve_config(project_root: &Path) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;
    Ok(EffectiveConfig { project, user })
}

const fn default_true() -> bool {
    true
}
