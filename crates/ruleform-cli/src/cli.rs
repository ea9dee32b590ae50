//! CLI argument parsing

use crate::commands::{self, CheckArgs, ParseArgs};
use clap::{Parser, Subcommand};
use std::process::ExitCode;

/// Ruleform - validate form snapshots against declarative field rules
#[derive(Parser, Debug)]
#[command(name = "ruleform")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log skipped and malformed rules to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a form snapshot file
    Check(CheckArgs),

    /// Parse and normalize a rule string
    Parse(ParseArgs),

    /// List the predefined rules
    Rules,
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Commands::Check(args) => commands::check(args),
            Commands::Parse(args) => commands::parse(args),
            Commands::Rules => commands::list_rules(),
        }
    }
}
