//! Home-based storage paths for the diary CLI.
//!
//! Everything lives under `~/.cbt-diary/`:
//! - `config.yaml` - optional user configuration
//! - `drafts/` - draft storage (overridable via `data_dir`)
//! - `logs/events.jsonl` - structured flow event log

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// The name of the diary directory under the home directory.
const DIARY_DIR: &str = ".cbt-diary";

/// Environment variable that replaces `~/.cbt-diary` entirely.
pub const HOME_ENV: &str = "CBT_DIARY_HOME";

/// Returns the diary home directory, creating it if needed.
///
/// `CBT_DIARY_HOME` wins over `~/.cbt-diary/` when set and non-empty.
///
/// # Errors
///
/// Returns an error if:
/// - Home directory cannot be determined
/// - Directory creation fails
pub fn diary_home_dir() -> Result<PathBuf> {
    let dir = match std::env::var(HOME_ENV) {
        Ok(value) if !value.trim().is_empty() => PathBuf::from(value),
        _ => dirs::home_dir()
            .context("Could not determine home directory for diary storage")?
            .join(DIARY_DIR),
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create diary directory: {}", dir.display()))?;
    Ok(dir)
}

/// Returns the user config path: `<home>/config.yaml`. The file may not exist.
pub fn config_path() -> Result<PathBuf> {
    Ok(diary_home_dir()?.join("config.yaml"))
}

/// Returns the logs directory: `<home>/logs/`
///
/// Creates the directory if it doesn't exist.
pub fn logs_dir() -> Result<PathBuf> {
    let dir = diary_home_dir()?.join("logs");
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create logs directory: {}", dir.display()))?;
    Ok(dir)
}
