//! Environment variable helpers and `.env` overlay loading.
//!
//! The overlay is never written into the launcher's own process environment;
//! callers merge it into an [`EnvBlock`](crate::EnvBlock) that is handed to
//! the child at spawn time.

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read overlay file {path}: {source}")]
    ReadOverlay {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot determine service tools directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

/// Name/value pairs read from a `.env` file, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub path: PathBuf,
    pub entries: Vec<(String, String)>,
}

impl Overlay {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse overlay content.
///
/// Each line is split on its first `=`. The name is trimmed; the line is
/// skipped when there is no `=`, the name is empty, or the name contains `#`.
/// Values are kept verbatim apart from a trailing carriage return.
pub fn parse_overlay(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let (name, value) = line.split_once('=')?;
            let name = name.trim();
            if name.is_empty() || name.contains('#') {
                return None;
            }
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

/// Load the overlay file at `path`. A missing file is not an error.
pub fn load_overlay(path: &Path) -> Result<Option<Overlay>, ConfigError> {
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "No overlay file");
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadOverlay {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = parse_overlay(&content);
    let skipped = content.lines().count() - entries.len();
    if skipped > 0 {
        tracing::debug!(path = %path.display(), skipped, "Skipped blank, comment or malformed overlay lines");
    }
    Ok(Some(Overlay {
        path: path.to_path_buf(),
        entries,
    }))
}

/// Read `key`, falling back to `default` when unset or empty.
pub fn env_or<F>(key: &str, default: F) -> String
where
    F: FnOnce() -> String,
{
    env::var(key)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default)
}

/// Trimmed value of `key`; empty values count as unset.
pub fn env_optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Boolean variable: 0/false/no/off are false, anything else set is true.
pub fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key).ok().as_deref() {
        Some(s) => !matches!(
            s.trim().to_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        ),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overlay_basic() {
        let entries = parse_overlay("AIRTABLE_API_KEY=abc\nAYON_SERVER_URL=http://localhost:5000\n");
        assert_eq!(
            entries,
            vec![
                ("AIRTABLE_API_KEY".to_string(), "abc".to_string()),
                ("AYON_SERVER_URL".to_string(), "http://localhost:5000".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_overlay_splits_on_first_equals() {
        let entries = parse_overlay("TOKEN=a=b=c");
        assert_eq!(entries, vec![("TOKEN".to_string(), "a=b=c".to_string())]);
    }

    #[test]
    fn test_parse_overlay_skips_comments_and_empty_names() {
        let entries = parse_overlay("# FOO=bar\n=bar\n   =baz\nno equals here\n\nFOO#x=1\nKEEP=1");
        assert_eq!(entries, vec![("KEEP".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_parse_overlay_keeps_value_verbatim() {
        let entries = parse_overlay("GREETING= hello # not a comment \r\nEMPTY=\n");
        assert_eq!(
            entries,
            vec![
                ("GREETING".to_string(), " hello # not a comment ".to_string()),
                ("EMPTY".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_load_overlay_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let overlay = load_overlay(&tmp.path().join(".env")).unwrap();
        assert!(overlay.is_none());
    }

    #[test]
    fn test_load_overlay_reads_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".env");
        std::fs::write(&path, "A=1\n# B=2\nC=3\n").unwrap();
        let overlay = load_overlay(&path).unwrap().unwrap();
        assert_eq!(overlay.len(), 2);
        assert_eq!(overlay.path, path);
        assert_eq!(overlay.entries[1], ("C".to_string(), "3".to_string()));
    }

    #[test]
    fn test_env_bool_default_when_unset() {
        assert!(env_bool("AIRTABLE_MANAGE_TEST_SURELY_UNSET", true));
        assert!(!env_bool("AIRTABLE_MANAGE_TEST_SURELY_UNSET", false));
    }

    #[test]
    fn test_env_optional_unset() {
        assert_eq!(env_optional("AIRTABLE_MANAGE_TEST_SURELY_UNSET"), None);
        assert_eq!(
            env_or("AIRTABLE_MANAGE_TEST_SURELY_UNSET", || "fallback".to_string()),
            "fallback"
        );
    }
}
