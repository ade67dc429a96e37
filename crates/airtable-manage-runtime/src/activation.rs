//! Scoped runtime activation.
//!
//! [`Activation`] applies a runtime to an [`EnvBlock`] on acquire and undoes it
//! when dropped, so deactivation runs on every exit path: normal return, `?`
//! propagation, or an early return from the dispatch step.

use std::ffi::OsStr;
use std::path::PathBuf;

use airtable_manage_core::config::env_keys::venv as keys;
use airtable_manage_core::EnvBlock;

use crate::env::builder::IsolatedRuntime;
use crate::error::RuntimeError;

pub trait Activator {
    fn activate(&self, runtime: &IsolatedRuntime, env: &mut EnvBlock) -> Result<(), RuntimeError>;
    fn deactivate(&self, runtime: &IsolatedRuntime, env: &mut EnvBlock)
        -> Result<(), RuntimeError>;
}

/// Mirrors what a venv `activate` script does to the environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct VenvActivator;

impl Activator for VenvActivator {
    fn activate(&self, runtime: &IsolatedRuntime, env: &mut EnvBlock) -> Result<(), RuntimeError> {
        if !runtime.has_interpreter() {
            return Err(RuntimeError::Activate(runtime.root.clone()));
        }

        let bin = runtime.bin_dir();
        let old_path = env.get_os(keys::PATH).map(OsStr::to_os_string);
        let mut entries = vec![bin];
        if let Some(ref old) = old_path {
            env.set(keys::OLD_VIRTUAL_PATH, old.clone());
            entries.extend(std::env::split_paths(old));
        }
        let new_path = std::env::join_paths(entries)
            .unwrap_or_else(|_| runtime.bin_dir().into_os_string());
        env.set(keys::PATH, new_path);

        if let Some(home) = env.remove(keys::PYTHONHOME) {
            env.set(keys::OLD_VIRTUAL_PYTHONHOME, home);
        }
        env.set(keys::VIRTUAL_ENV, runtime.root.clone());
        tracing::debug!(path = %runtime.root.display(), "Runtime activated");
        Ok(())
    }

    fn deactivate(
        &self,
        runtime: &IsolatedRuntime,
        env: &mut EnvBlock,
    ) -> Result<(), RuntimeError> {
        if env.get_os(keys::VIRTUAL_ENV) != Some(runtime.root.as_os_str()) {
            return Err(RuntimeError::NotActive(runtime.root.clone()));
        }

        match env.remove(keys::OLD_VIRTUAL_PATH) {
            Some(old) => env.set(keys::PATH, old),
            None => {
                env.remove(keys::PATH);
            }
        }
        if let Some(home) = env.remove(keys::OLD_VIRTUAL_PYTHONHOME) {
            env.set(keys::PYTHONHOME, home);
        }
        env.remove(keys::VIRTUAL_ENV);
        tracing::debug!(path = %runtime.root.display(), "Runtime deactivated");
        Ok(())
    }
}

/// Guard for an active runtime. Dropping it deactivates, ignoring failures.
pub struct Activation<'a> {
    activator: &'a dyn Activator,
    runtime: &'a IsolatedRuntime,
    env: &'a mut EnvBlock,
}

impl<'a> Activation<'a> {
    pub fn acquire(
        activator: &'a dyn Activator,
        runtime: &'a IsolatedRuntime,
        env: &'a mut EnvBlock,
    ) -> Result<Self, RuntimeError> {
        activator.activate(runtime, env)?;
        Ok(Self {
            activator,
            runtime,
            env,
        })
    }

    /// Environment with the runtime applied.
    pub fn env(&self) -> &EnvBlock {
        &*self.env
    }

    pub fn interpreter(&self) -> PathBuf {
        self.runtime.interpreter()
    }
}

impl Drop for Activation<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.activator.deactivate(self.runtime, &mut *self.env) {
            tracing::warn!("Runtime deactivation failed (ignored): {}", e);
        }
    }
}
