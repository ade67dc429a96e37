//! Addon identity: fixed addon name plus the version declared in `package.py`.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::config::env_keys::identity as keys;
use crate::EnvBlock;

/// Addon name as registered on the AYON server.
pub const ADDON_NAME: &str = "airtable";

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Failed to read package metadata {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No `version = \"...\"` assignment found in {0}")]
    MissingVersion(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonIdentity {
    pub name: String,
    pub version: String,
}

fn version_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^\s*version\s*(?::\s*\w+\s*)?=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("version pattern is valid")
    })
}

/// Extract the top-level `version` string from package metadata source.
pub fn parse_version(content: &str) -> Option<String> {
    let caps = version_pattern().captures(content)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AddonIdentity {
    pub fn from_package_metadata(path: &Path) -> Result<Self, IdentityError> {
        let content = std::fs::read_to_string(path).map_err(|source| IdentityError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let version =
            parse_version(&content).ok_or_else(|| IdentityError::MissingVersion(path.to_path_buf()))?;
        Ok(Self {
            name: ADDON_NAME.to_string(),
            version,
        })
    }

    pub fn apply(&self, env: &mut EnvBlock) {
        env.set(keys::AYON_ADDON_NAME, self.name.as_str());
        env.set(keys::AYON_ADDON_VERSION, self.version.as_str());
    }
}
