use crate::handoff::MarkdownFormatter;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_YAML: &str = include_str!("../cbt-diary.yaml");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiaryConfig {
    /// Draft storage directory. Relative paths resolve against the diary home.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Whether to append flow events to `logs/events.jsonl`. Default: true
    #[serde(default = "default_event_log")]
    pub event_log: bool,
    /// Chat session used by `finalize` when none is passed explicitly.
    #[serde(default)]
    pub chat_session_id: Option<String>,
    #[serde(default)]
    pub formatter: FormatterConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FormatterConfig {
    #[serde(default)]
    pub include_empty_steps: bool,
}

fn default_event_log() -> bool {
    true
}

impl DiaryConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file as YAML: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// The configuration embedded from `cbt-diary.yaml`.
    pub fn default_config() -> Result<Self> {
        serde_yaml::from_str(DEFAULT_CONFIG_YAML).context("Failed to parse embedded cbt-diary.yaml")
    }

    /// Loads `path` when it exists, otherwise the embedded defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            Self::load(path)
        } else {
            Self::default_config()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(id) = &self.chat_session_id {
            if id.trim().is_empty() {
                anyhow::bail!("chat_session_id must not be empty when set");
            }
        }
        if let Some(dir) = &self.data_dir {
            if dir.as_os_str().is_empty() {
                anyhow::bail!("data_dir must not be empty when set");
            }
        }
        Ok(())
    }

    /// Draft storage directory, resolved against `home`.
    pub fn drafts_dir(&self, home: &Path) -> PathBuf {
        match &self.data_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => home.join(dir),
            None => home.join("drafts"),
        }
    }

    pub fn formatter(&self) -> MarkdownFormatter {
        MarkdownFormatter::new(self.formatter.include_empty_steps)
    }
}
