pub mod config;
pub mod env_block;
pub mod identity;
pub mod observability;
pub mod target;

pub use env_block::EnvBlock;
pub use identity::{AddonIdentity, IdentityError};
pub use target::{Target, UnknownTarget};
