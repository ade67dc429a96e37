pub mod activation;
pub mod env;
pub mod error;
pub mod runner;

pub use activation::{Activation, Activator, VenvActivator};
pub use env::builder::{IsolatedRuntime, RuntimeProvisioner, VenvProvisioner};
pub use error::RuntimeError;
pub use runner::{CommandRunner, CommandSpec, SystemRunner};
