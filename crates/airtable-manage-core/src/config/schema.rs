//! Structured configuration loaded from environment variables.

use super::env_keys::{layout as layout_keys, observability as obv_keys};
use super::loader::{env_bool, env_optional, env_or, ConfigError};
use std::path::{Path, PathBuf};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub log_json: bool,
    pub quiet: bool,
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        Self {
            log_level: env_or(obv_keys::AIRTABLE_MANAGE_LOG_LEVEL, || "info".to_string()),
            log_json: env_bool(obv_keys::AIRTABLE_MANAGE_LOG_JSON, false),
            quiet: env_bool(obv_keys::AIRTABLE_MANAGE_QUIET, false),
        }
    }
}

/// Fixed on-disk layout around the service tools directory.
///
/// ```text
/// <addon root>/package.py
/// <addon root>/service_tools/          <- dir
///     .env  requirements.txt  main.py  .venv/  .venv-tests/
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutConfig {
    pub dir: PathBuf,
}

impl LayoutConfig {
    /// Relative directories are resolved against the current directory, so
    /// child commands can change `cwd` without breaking any derived path.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let dir = std::path::absolute(&dir).unwrap_or(dir);
        Self { dir }
    }

    /// `AIRTABLE_MANAGE_DIR`, else the current working directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        let dir = match env_optional(layout_keys::AIRTABLE_MANAGE_DIR) {
            Some(d) => PathBuf::from(d),
            None => std::env::current_dir().map_err(ConfigError::CurrentDir)?,
        };
        Ok(Self::new(dir))
    }

    pub fn overlay_file(&self) -> PathBuf {
        self.dir.join(".env")
    }

    pub fn requirements(&self) -> PathBuf {
        self.dir.join("requirements.txt")
    }

    pub fn main_entry(&self) -> PathBuf {
        self.dir.join("main.py")
    }

    pub fn service_runtime(&self) -> PathBuf {
        self.dir.join(".venv")
    }

    pub fn test_runtime(&self) -> PathBuf {
        self.dir.join(".venv-tests")
    }

    pub fn addon_root(&self) -> PathBuf {
        self.dir
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.dir.join(".."))
    }

    pub fn package_metadata(&self) -> PathBuf {
        self.addon_root().join("package.py")
    }

    /// Interpreter override for bootstrapping new runtimes.
    pub fn bootstrap_python() -> Option<String> {
        env_optional(layout_keys::AIRTABLE_MANAGE_PYTHON)
    }
}
