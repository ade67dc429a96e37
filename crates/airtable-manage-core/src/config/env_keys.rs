//! Environment variable key constants.

/// Addon identity, set on every invocation.
pub mod identity {
    pub const AYON_ADDON_NAME: &str = "AYON_ADDON_NAME";
    pub const AYON_ADDON_VERSION: &str = "AYON_ADDON_VERSION";
}

/// Service identity, set only for the processor target.
pub mod service {
    pub const AYON_SERVICE_NAME: &str = "AYON_SERVICE_NAME";
    pub const AYON_SERVICE_TYPE: &str = "AYON_SERVICE_TYPE";
}

/// Variables touched by venv activation.
pub mod venv {
    pub const VIRTUAL_ENV: &str = "VIRTUAL_ENV";
    pub const PATH: &str = "PATH";
    pub const PYTHONHOME: &str = "PYTHONHOME";
    pub const OLD_VIRTUAL_PATH: &str = "_OLD_VIRTUAL_PATH";
    pub const OLD_VIRTUAL_PYTHONHOME: &str = "_OLD_VIRTUAL_PYTHONHOME";
}

/// Launcher layout
pub mod layout {
    /// Service-tools directory (defaults to the current directory)
    pub const AIRTABLE_MANAGE_DIR: &str = "AIRTABLE_MANAGE_DIR";
    /// Interpreter used to bootstrap new venvs
    pub const AIRTABLE_MANAGE_PYTHON: &str = "AIRTABLE_MANAGE_PYTHON";
}

/// Observability and logging
pub mod observability {
    pub const AIRTABLE_MANAGE_LOG_LEVEL: &str = "AIRTABLE_MANAGE_LOG_LEVEL";
    pub const AIRTABLE_MANAGE_LOG_JSON: &str = "AIRTABLE_MANAGE_LOG_JSON";
    pub const AIRTABLE_MANAGE_QUIET: &str = "AIRTABLE_MANAGE_QUIET";
}
