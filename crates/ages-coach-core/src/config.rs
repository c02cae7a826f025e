//! Coach configuration loading and credential resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::CoachError;

/// Project-local config location, relative to the project root.
pub const PROJECT_CONFIG_PATH: &str = ".ages-coach/config.yaml";

/// Coach configuration, loaded from `.ages-coach/config.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachConfig {
    /// Model used when a request does not name one
    #[serde(default = "default_model")]
    pub model: String,

    /// Output token cap for coaching calls
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Output token cap for screenshot parsing
    #[serde(default = "default_vision_max_tokens")]
    pub vision_max_tokens: u32,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_anthropic_version")]
    pub anthropic_version: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Inline API key, used only when the environment variable is unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Strategy YAML directory (relative to project root)
    #[serde(default = "default_strategy_dir")]
    pub strategy_dir: PathBuf,

    /// Prompt markdown directory (relative to project root)
    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: PathBuf,
}

pub fn default_model() -> String {
    "claude-sonnet-4-6".to_string()
}
fn default_max_tokens() -> u32 {
    1500
}
fn default_vision_max_tokens() -> u32 {
    2000
}
fn default_api_base_url() -> String {
    "https://api.anthropic.com".to_string()
}
fn default_anthropic_version() -> String {
    "2023-06-01".to_string()
}
fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}
fn default_strategy_dir() -> PathBuf {
    PathBuf::from("strategy")
}
fn default_prompts_dir() -> PathBuf {
    PathBuf::from("prompts")
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            vision_max_tokens: default_vision_max_tokens(),
            api_base_url: default_api_base_url(),
            anthropic_version: default_anthropic_version(),
            api_key_env: default_api_key_env(),
            api_key: None,
            strategy_dir: default_strategy_dir(),
            prompts_dir: default_prompts_dir(),
        }
    }
}

impl CoachConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        Ok(config)
    }

    /// Candidate config files, first match wins.
    pub fn search_path(project_root: &Path) -> Vec<PathBuf> {
        let mut paths = vec![project_root.join(PROJECT_CONFIG_PATH)];
        if let Some(dirs) = ProjectDirs::from("", "", "ages-coach") {
            paths.push(dirs.config_dir().join("config.yaml"));
        }
        paths
    }

    /// Load the first config found on the search path, or defaults.
    pub fn load_from_project(project_root: &Path) -> Result<Self> {
        match Self::search_path(project_root).into_iter().find(|p| p.is_file()) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading config");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Resolve paths relative to project root
    pub fn resolve_paths(&mut self, project_root: &Path) {
        self.strategy_dir = project_root.join(&self.strategy_dir);
        self.prompts_dir = project_root.join(&self.prompts_dir);
    }

    /// The API key from the environment, else from the config file.
    pub fn api_key(&self) -> Result<String, CoachError> {
        let from_env = std::env::var(&self.api_key_env).ok();
        resolve_api_key(from_env.as_deref(), self.api_key.as_deref()).ok_or_else(|| {
            CoachError::configuration(format!(
                "{} environment variable is not set",
                self.api_key_env
            ))
        })
    }
}

fn resolve_api_key(from_env: Option<&str>, inline: Option<&str>) -> Option<String> {
    [from_env, inline]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|k| !k.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CoachConfig::default();
        assert_eq!(config.model, "claude-sonnet-4-6");
        assert_eq!(config.max_tokens, 1500);
        assert_eq!(config.vision_max_tokens, 2000);
        assert_eq!(config.api_key_env, "ANTHROPIC_API_KEY");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: CoachConfig = serde_yaml::from_str("model: claude-opus-4-6\nmax_tokens: 3000\n").unwrap();
        assert_eq!(config.model, "claude-opus-4-6");
        assert_eq!(config.max_tokens, 3000);
        assert_eq!(config.vision_max_tokens, 2000);
        assert_eq!(config.strategy_dir, PathBuf::from("strategy"));
    }

    #[test]
    fn test_load_from_project_and_resolve() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".ages-coach")).unwrap();
        std::fs::write(
            dir.path().join(PROJECT_CONFIG_PATH),
            "strategy_dir: knowledge\napi_key: from-file\n",
        )
        .unwrap();

        let mut config = CoachConfig::load_from_project(dir.path()).unwrap();
        config.resolve_paths(dir.path());

        assert_eq!(config.strategy_dir, dir.path().join("knowledge"));
        assert_eq!(config.prompts_dir, dir.path().join("prompts"));
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_malformed_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "max_tokens: [lots").unwrap();
        let err = CoachConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_api_key_precedence() {
        assert_eq!(resolve_api_key(Some("env"), Some("file")).as_deref(), Some("env"));
        assert_eq!(resolve_api_key(Some("  "), Some("file")).as_deref(), Some("file"));
        assert_eq!(resolve_api_key(None, Some("file")).as_deref(), Some("file"));
        assert_eq!(resolve_api_key(None, None), None);
    }

    #[test]
    fn test_missing_api_key_is_configuration_error() {
        let config = CoachConfig {
            api_key_env: "AGES_COACH_TEST_KEY_THAT_IS_NEVER_SET".into(),
            ..Default::default()
        };
        let err = config.api_key().unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("AGES_COACH_TEST_KEY_THAT_IS_NEVER_SET"));
    }
}
