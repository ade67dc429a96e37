//! Explicit environment record for child processes.
//!
//! The launcher snapshots its own environment once, layers identity, overlay
//! and activation changes on top, and hands the result to the child at spawn
//! time. Its own process environment is left untouched.
//!
//! Values are `OsString`, so non-UTF-8 variables survive the snapshot. Keys
//! compare case-insensitively on Windows (`Path` and `PATH` are one variable).

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};

use crate::config::Overlay;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvBlock {
    /// folded key -> (key as last written, value)
    vars: BTreeMap<OsString, (OsString, OsString)>,
}

#[cfg(windows)]
fn fold(key: &OsStr) -> OsString {
    key.to_string_lossy().to_uppercase().into()
}

#[cfg(not(windows))]
fn fold(key: &OsStr) -> OsString {
    key.to_os_string()
}

impl EnvBlock {
    /// Snapshot of the current process environment.
    pub fn from_process() -> Self {
        Self::from_vars(std::env::vars_os())
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<OsStr>,
        V: Into<OsString>,
    {
        let mut block = Self::default();
        for (k, v) in vars {
            block.set(k, v);
        }
        block
    }

    /// UTF-8 view of a value; `None` when unset or not valid UTF-8.
    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&str> {
        self.get_os(key).and_then(OsStr::to_str)
    }

    pub fn get_os(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.vars
            .get(&fold(key.as_ref()))
            .map(|(_, v)| v.as_os_str())
    }

    pub fn contains(&self, key: impl AsRef<OsStr>) -> bool {
        self.vars.contains_key(&fold(key.as_ref()))
    }

    pub fn set(&mut self, key: impl AsRef<OsStr>, value: impl Into<OsString>) {
        let key = key.as_ref();
        self.vars
            .insert(fold(key), (key.to_os_string(), value.into()));
    }

    pub fn remove(&mut self, key: impl AsRef<OsStr>) -> Option<OsString> {
        self.vars.remove(&fold(key.as_ref())).map(|(_, v)| v)
    }

    /// Merge overlay entries, later entries winning. Applying the same overlay
    /// again yields the same block.
    pub fn apply_overlay(&mut self, overlay: &Overlay) {
        for (name, value) in &overlay.entries {
            self.set(name, value.as_str());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.values().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_overlay;
    use std::path::PathBuf;

    fn overlay(content: &str) -> Overlay {
        Overlay {
            path: PathBuf::from(".env"),
            entries: parse_overlay(content),
        }
    }

    #[test]
    fn test_apply_overlay_overwrites() {
        let mut block = EnvBlock::from_vars([("FOO", "old"), ("KEEP", "1")]);
        block.apply_overlay(&overlay("FOO=new\nBAR=2"));
        assert_eq!(block.get("FOO"), Some("new"));
        assert_eq!(block.get("BAR"), Some("2"));
        assert_eq!(block.get("KEEP"), Some("1"));
    }

    #[test]
    fn test_apply_overlay_idempotent() {
        let ov = overlay("A=1\nB=two\nA=3\n");
        let mut once = EnvBlock::from_vars([("PATH", "/usr/bin")]);
        once.apply_overlay(&ov);
        let mut twice = once.clone();
        twice.apply_overlay(&ov);
        assert_eq!(once, twice);
        assert_eq!(once.get("A"), Some("3"));
    }

    #[test]
    fn test_commented_line_leaves_existing_untouched() {
        let mut block = EnvBlock::from_vars([("FOO", "original")]);
        block.apply_overlay(&overlay("# FOO=bar\n=bar\n"));
        assert_eq!(block.get("FOO"), Some("original"));
        assert_eq!(block.len(), 1);
    }

    #[test]
    fn test_from_process_does_not_mutate_process_env() {
        let mut block = EnvBlock::from_process();
        block.set("AIRTABLE_MANAGE_TEST_BLOCK_ONLY", "1");
        assert!(std::env::var("AIRTABLE_MANAGE_TEST_BLOCK_ONLY").is_err());
        assert!(block.contains("AIRTABLE_MANAGE_TEST_BLOCK_ONLY"));
    }

    #[test]
    fn test_from_process_keeps_every_variable() {
        let block = EnvBlock::from_process();
        assert_eq!(block.len(), std::env::vars_os().count());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_value_is_kept() {
        use std::os::unix::ffi::OsStrExt;
        let raw = OsStr::from_bytes(b"caf\xe9");
        let block = EnvBlock::from_vars([("LEGACY", raw)]);
        assert_eq!(block.get_os("LEGACY"), Some(raw));
        assert_eq!(block.get("LEGACY"), None);
        assert_eq!(block.iter().count(), 1);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_keys_are_case_sensitive_off_windows() {
        let block = EnvBlock::from_vars([("Path", "a"), ("PATH", "b")]);
        assert_eq!(block.len(), 2);
        assert_eq!(block.get("Path"), Some("a"));
    }

    #[cfg(windows)]
    #[test]
    fn test_keys_are_case_insensitive_on_windows() {
        let mut block = EnvBlock::from_vars([("Path", r"C:\Windows")]);
        assert_eq!(block.get("PATH"), Some(r"C:\Windows"));
        block.set("PATH", r"C:\venv\Scripts");
        assert_eq!(block.len(), 1);
        assert_eq!(block.get("Path"), Some(r"C:\venv\Scripts"));
    }
}
