//! Build isolated Python runtimes (venv) on demand.

use std::path::{Path, PathBuf};
use std::process::Command;

use airtable_manage_core::config::LayoutConfig;

use crate::error::RuntimeError;

/// A venv location on disk. Nothing is created until a provisioner runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsolatedRuntime {
    pub root: PathBuf,
}

impl IsolatedRuntime {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn exists(&self) -> bool {
        self.root.exists()
    }

    /// `bin/` on Unix-style venvs, `Scripts/` on Windows.
    pub fn bin_dir(&self) -> PathBuf {
        let scripts = self.root.join("Scripts");
        if cfg!(windows) || scripts.join("python.exe").exists() {
            scripts
        } else {
            self.root.join("bin")
        }
    }

    pub fn interpreter(&self) -> PathBuf {
        let bin = self.root.join("bin").join("python");
        if bin.exists() {
            return bin;
        }
        let scripts = self.root.join("Scripts").join("python.exe");
        if scripts.exists() {
            return scripts;
        }
        if cfg!(windows) {
            scripts
        } else {
            bin
        }
    }

    pub fn has_interpreter(&self) -> bool {
        self.interpreter().exists()
    }
}

/// Creates a runtime when its directory does not exist yet.
pub trait RuntimeProvisioner {
    fn ensure(&self, runtime: &IsolatedRuntime) -> Result<(), RuntimeError>;
}

/// Provisioner backed by `python -m venv`.
#[derive(Debug, Clone)]
pub struct VenvProvisioner {
    python: Option<PathBuf>,
}

impl VenvProvisioner {
    pub fn new(python: Option<PathBuf>) -> Self {
        Self { python }
    }

    /// Bootstrap interpreter from `AIRTABLE_MANAGE_PYTHON`, else PATH lookup at creation time.
    pub fn from_env() -> Self {
        Self::new(LayoutConfig::bootstrap_python().map(PathBuf::from))
    }

    fn bootstrap_python(&self) -> Result<PathBuf, RuntimeError> {
        if let Some(ref p) = self.python {
            return Ok(p.clone());
        }
        ["python3", "python"]
            .iter()
            .find_map(|name| which::which(name).ok())
            .ok_or(RuntimeError::PythonNotFound)
    }
}

impl Default for VenvProvisioner {
    fn default() -> Self {
        Self::from_env()
    }
}

impl RuntimeProvisioner for VenvProvisioner {
    fn ensure(&self, runtime: &IsolatedRuntime) -> Result<(), RuntimeError> {
        if runtime.exists() {
            tracing::debug!(path = %runtime.root.display(), "Runtime already present");
            return Ok(());
        }
        create_venv(&self.bootstrap_python()?, &runtime.root)
    }
}

fn create_venv(python: &Path, root: &Path) -> Result<(), RuntimeError> {
    tracing::info!(path = %root.display(), python = %python.display(), "Creating isolated runtime");
    if let Some(parent) = root.parent() {
        std::fs::create_dir_all(parent).map_err(|source| RuntimeError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let out = Command::new(python)
        .arg("-m")
        .arg("venv")
        .arg(root)
        .output()
        .map_err(|source| RuntimeError::Spawn {
            program: python.display().to_string(),
            source,
        })?;
    if !out.status.success() {
        // Leave no half-built venv behind, or the next run would skip creation.
        let _ = std::fs::remove_dir_all(root);
        return Err(RuntimeError::Create {
            path: root.to_path_buf(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpreter_prefers_existing_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let rt = IsolatedRuntime::new(tmp.path().join(".venv"));
        assert!(!rt.exists());
        assert!(!rt.has_interpreter());

        std::fs::create_dir_all(rt.root.join("bin")).unwrap();
        std::fs::write(rt.root.join("bin").join("python"), "").unwrap();
        assert!(rt.has_interpreter());
        assert_eq!(rt.interpreter(), rt.root.join("bin").join("python"));
    }

    #[test]
    fn test_ensure_skips_existing_runtime() {
        let tmp = tempfile::tempdir().unwrap();
        let rt = IsolatedRuntime::new(tmp.path().join(".venv"));
        std::fs::create_dir_all(&rt.root).unwrap();
        // Bogus interpreter: it must never be invoked for an existing runtime.
        let provisioner = VenvProvisioner::new(Some(tmp.path().join("no-such-python")));
        provisioner.ensure(&rt).unwrap();
    }

    #[test]
    fn test_ensure_reports_spawn_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let rt = IsolatedRuntime::new(tmp.path().join(".venv"));
        let provisioner = VenvProvisioner::new(Some(tmp.path().join("no-such-python")));
        let err = provisioner.ensure(&rt).unwrap_err();
        assert!(matches!(err, RuntimeError::Spawn { .. }));
        assert!(!rt.exists());
    }
}
