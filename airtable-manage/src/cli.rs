use std::io::Write;

use airtable_manage_core::Target;
use clap::{CommandFactory, Parser};

/// Service launcher for the AYON Airtable addon
#[derive(Parser, Debug)]
#[command(name = "airtable-manage")]
#[command(author, version, about, long_about = None)]
#[command(override_usage = "airtable-manage [TARGET] [ARGS]...")]
#[command(after_help = targets_help())]
pub struct Cli {
    /// Target to run; case and punctuation are ignored (run-tests == RunTests).
    /// Everything after it, e.g. `--variant staging`, is forwarded unchanged.
    #[arg(value_name = "TARGET")]
    pub target: Option<String>,
}

/// Target name plus the arguments forwarded to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub target: Option<String>,
    pub passthrough: Vec<String>,
}

impl Cli {
    /// Launcher flags (`--help`, `--version`) are only recognised before
    /// TARGET; every argument after it is forwarded verbatim, `--` included.
    pub fn parse_invocation<I, T>(argv: I) -> Result<Invocation, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        let split = argv
            .iter()
            .skip(1)
            .position(|a| !a.starts_with('-'))
            .map(|i| i + 2)
            .unwrap_or(argv.len());
        let cli = Cli::try_parse_from(&argv[..split])?;
        Ok(Invocation {
            target: cli.target,
            passthrough: argv[split..].to_vec(),
        })
    }
}

/// Target listing appended to `--help`.
pub fn targets_help() -> String {
    let mut out = String::from("Targets:\n");
    for target in Target::ALL {
        out.push_str(&format!("  {:<12} {}\n", target.keyword(), target.description()));
    }
    out
}

pub fn write_help<W: Write>(out: &mut W) -> std::io::Result<()> {
    Cli::command().write_help(out)
}
