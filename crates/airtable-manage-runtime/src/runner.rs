//! Child process execution.
//!
//! The child gets exactly the environment in its [`CommandSpec`]: the parent
//! environment is cleared first, so the `EnvBlock` snapshot is the single
//! source of truth. Stdio is inherited and the call blocks until exit.

use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use airtable_manage_core::EnvBlock;

use crate::error::RuntimeError;

/// One fully resolved child invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub env: EnvBlock,
}

impl CommandSpec {
    /// Program and arguments joined for logs.
    pub fn display_line(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub trait CommandRunner {
    /// Run to completion and return the exit code.
    fn run(&self, spec: &CommandSpec) -> Result<i32, RuntimeError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<i32, RuntimeError> {
        tracing::info!(cwd = %spec.cwd.display(), "Running: {}", spec.display_line());
        let status = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.cwd)
            .env_clear()
            .envs(spec.env.iter())
            .status()
            .map_err(|source| RuntimeError::Spawn {
                program: spec.program.display().to_string(),
                source,
            })?;
        let code = exit_code(status);
        tracing::debug!(code, "Child exited");
        Ok(code)
    }
}

/// Exit code of a finished child. Signal deaths map to `128 + signal` on Unix.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str, env: EnvBlock) -> CommandSpec {
        CommandSpec {
            program: PathBuf::from("/bin/sh"),
            args: vec!["-c".to_string(), script.to_string()],
            cwd: std::env::temp_dir(),
            env,
        }
    }

    #[test]
    fn test_exit_code_propagates() {
        assert_eq!(SystemRunner.run(&sh("exit 0", EnvBlock::default())).unwrap(), 0);
        assert_eq!(SystemRunner.run(&sh("exit 3", EnvBlock::default())).unwrap(), 3);
    }

    #[test]
    fn test_signal_maps_to_128_plus_signal() {
        assert_eq!(SystemRunner.run(&sh("kill -9 $$", EnvBlock::default())).unwrap(), 137);
    }

    #[test]
    fn test_child_sees_only_block_env() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("env.txt");
        let env = EnvBlock::from_vars([("AYON_ADDON_NAME", "airtable")]);
        let script = format!(
            "printf '%s|%s' \"$AYON_ADDON_NAME\" \"${{HOME:-unset}}\" > '{}'",
            out.display()
        );
        assert_eq!(SystemRunner.run(&sh(&script, env)).unwrap(), 0);
        assert_eq!(std::fs::read_to_string(out).unwrap(), "airtable|unset");
    }

    #[test]
    fn test_child_receives_non_utf8_value() {
        use std::os::unix::ffi::OsStrExt;
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("raw.txt");
        let env = EnvBlock::from_vars([("LEGACY", std::ffi::OsStr::from_bytes(b"caf\xe9"))]);
        let script = format!("printf '%s' \"$LEGACY\" > '{}'", out.display());
        assert_eq!(SystemRunner.run(&sh(&script, env)).unwrap(), 0);
        assert_eq!(std::fs::read(out).unwrap(), b"caf\xe9".to_vec());
    }

    #[test]
    fn test_spawn_failure() {
        let spec = CommandSpec {
            program: PathBuf::from("/definitely/not/a/program"),
            args: vec![],
            cwd: std::env::temp_dir(),
            env: EnvBlock::default(),
        };
        assert!(matches!(SystemRunner.run(&spec), Err(RuntimeError::Spawn { .. })));
    }

    #[test]
    fn test_display_line() {
        let spec = sh("true", EnvBlock::default());
        assert_eq!(spec.display_line(), "/bin/sh -c true");
    }
}
