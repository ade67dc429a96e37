//! Unified configuration layer.
//!
//! Every environment variable the launcher reads goes through this module;
//! the rest of the workspace accesses structured config instead of calling
//! `std::env::var` directly.
//!
//! - `loader`: `env_or`, `env_optional`, `env_bool` helpers and `.env` overlay parsing
//! - `schema`: `ObservabilityConfig`, `LayoutConfig`
//! - `env_keys`: key constants

pub mod env_keys;
pub mod loader;
pub mod schema;

pub use loader::{env_bool, env_optional, env_or, load_overlay, parse_overlay, ConfigError, Overlay};
pub use schema::{LayoutConfig, ObservabilityConfig};
