//! Isolated runtime builder: Python venvs for the service and test targets.
//!
//! Callers pass a runtime location; this module creates the venv when it is
//! missing. Activation and process spawning live in sibling modules.

pub mod builder;
