use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("python3 or python not found in PATH (set AIRTABLE_MANAGE_PYTHON to override)")]
    PythonNotFound,

    #[error("Failed to create runtime directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("venv creation at {path} failed: {stderr}")]
    Create { path: PathBuf, stderr: String },

    #[error("Runtime at {0} has no Python interpreter; remove it and run create-env")]
    Activate(PathBuf),

    #[error("Runtime at {0} is not active")]
    NotActive(PathBuf),

    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
