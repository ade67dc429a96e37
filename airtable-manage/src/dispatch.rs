//! Target dispatch.
//!
//! Each target resolves to a short list of child commands. The launcher
//! ensures the matching runtime, activates it for the lifetime of the
//! dispatch, runs the commands in order and stops at the first failure.

use std::path::Path;

use anyhow::{bail, Result};

use airtable_manage_core::config::env_keys::{identity as identity_keys, service as service_keys};
use airtable_manage_core::config::LayoutConfig;
use airtable_manage_core::identity::ADDON_NAME;
use airtable_manage_core::{EnvBlock, Target};
use airtable_manage_runtime::{
    Activation, Activator, CommandRunner, CommandSpec, IsolatedRuntime, RuntimeProvisioner,
};

pub struct Launcher<'a> {
    layout: &'a LayoutConfig,
    provisioner: &'a dyn RuntimeProvisioner,
    activator: &'a dyn Activator,
    runner: &'a dyn CommandRunner,
}

impl<'a> Launcher<'a> {
    pub fn new(
        layout: &'a LayoutConfig,
        provisioner: &'a dyn RuntimeProvisioner,
        activator: &'a dyn Activator,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            layout,
            provisioner,
            activator,
            runner,
        }
    }

    pub fn runtime_for(&self, target: Target) -> IsolatedRuntime {
        if target.uses_test_runtime() {
            IsolatedRuntime::new(self.layout.test_runtime())
        } else {
            IsolatedRuntime::new(self.layout.service_runtime())
        }
    }

    /// Run `target` and return the exit code of the last command executed.
    pub fn run(&self, target: Target, passthrough: &[String], mut env: EnvBlock) -> Result<i32> {
        let runtime = self.runtime_for(target);
        self.provisioner.ensure(&runtime)?;

        let active = Activation::acquire(self.activator, &runtime, &mut env)?;
        let steps = plan(target, self.layout, &active.interpreter(), active.env(), passthrough)?;
        for step in &steps {
            let code = self.runner.run(step)?;
            if code != 0 {
                tracing::warn!(target = %target, code, "Command failed: {}", step.display_line());
                return Ok(code);
            }
        }
        tracing::debug!(target = %target, "Dispatch finished");
        Ok(0)
    }
}

/// Resolve the child commands for `target`.
pub fn plan(
    target: Target,
    layout: &LayoutConfig,
    python: &Path,
    env: &EnvBlock,
    passthrough: &[String],
) -> Result<Vec<CommandSpec>> {
    let python_cmd = |args: Vec<String>, cwd: &Path, env: EnvBlock| CommandSpec {
        program: python.to_path_buf(),
        args,
        cwd: cwd.to_path_buf(),
        env,
    };

    let steps = match target {
        Target::CreateEnv => {
            let requirements = layout.requirements();
            if !requirements.is_file() {
                bail!("Requirements manifest not found: {}", requirements.display());
            }
            let mut args = strings(["-m", "pip", "install", "-r"]);
            args.push(requirements.display().to_string());
            args.extend(passthrough.iter().cloned());
            vec![python_cmd(args, &layout.dir, env.clone())]
        }
        Target::RunTests => {
            let root = layout.addon_root();
            let mut install = strings(["-m", "pip", "install", "-e"]);
            install.push(format!("{}[test]", root.display()));
            let mut pytest = strings(["-m", "pytest"]);
            pytest.extend(passthrough.iter().cloned());
            vec![
                python_cmd(install, &root, env.clone()),
                python_cmd(pytest, &root, env.clone()),
            ]
        }
        Target::Leecher | Target::Processor | Target::Transmitter | Target::Services => {
            let Some(flag) = target.service_flag() else {
                bail!("Target {} has no service flag", target);
            };
            let mut service_env = env.clone();
            if target == Target::Processor {
                let addon = env.get(identity_keys::AYON_ADDON_NAME).unwrap_or(ADDON_NAME);
                service_env.set(service_keys::AYON_SERVICE_NAME, format!("{}-processor", addon));
                service_env.set(service_keys::AYON_SERVICE_TYPE, "processor");
            }
            let mut args = vec![
                layout.main_entry().display().to_string(),
                "--service".to_string(),
                flag.to_string(),
            ];
            args.extend(passthrough.iter().cloned());
            vec![python_cmd(args, &layout.dir, service_env)]
        }
    };
    Ok(steps)
}

fn strings<const N: usize>(items: [&str; N]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
