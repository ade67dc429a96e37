mod cli;
mod dispatch;
mod launch;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Result;

use airtable_manage_core::config::LayoutConfig;
use airtable_manage_core::{observability, EnvBlock, Target};
use airtable_manage_runtime::{SystemRunner, VenvActivator, VenvProvisioner};

use cli::{Cli, Invocation};
use dispatch::Launcher;

fn main() -> ExitCode {
    observability::init_tracing();
    let invocation = Cli::parse_invocation(std::env::args()).unwrap_or_else(|e| e.exit());

    match run(invocation, &mut io::stdout(), &mut io::stderr()) {
        Ok(code) => to_exit_code(code),
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run<O: Write, E: Write>(invocation: Invocation, out: &mut O, err: &mut E) -> Result<i32> {
    let Some(target) = resolve_target(invocation.target.as_deref(), out, err)? else {
        return Ok(0);
    };

    let layout = LayoutConfig::from_env()?;
    tracing::debug!(dir = %layout.dir.display(), target = %target, "Launching");
    let env = launch::prepare_environment(&layout, EnvBlock::from_process())?;

    let provisioner = VenvProvisioner::from_env();
    let launcher = Launcher::new(&layout, &provisioner, &VenvActivator, &SystemRunner);
    launcher.run(target, &invocation.passthrough, env)
}

/// `None` means usage was printed and the launcher exits 0. An unknown target
/// is a user error, not a launcher failure.
fn resolve_target<O: Write, E: Write>(
    raw: Option<&str>,
    out: &mut O,
    err: &mut E,
) -> io::Result<Option<Target>> {
    let Some(raw) = raw else {
        cli::write_help(out)?;
        return Ok(None);
    };
    match raw.parse::<Target>() {
        Ok(t) => Ok(Some(t)),
        Err(e) => {
            tracing::warn!("{}", e);
            writeln!(err, "{}", e)?;
            cli::write_help(out)?;
            Ok(None)
        }
    }
}

fn to_exit_code(code: i32) -> ExitCode {
    match u8::try_from(code) {
        Ok(c) => ExitCode::from(c),
        Err(_) => ExitCode::FAILURE,
    }
}
