//! Parse command: show how a rule string is read

use anyhow::Result;
use clap::Args;
use console::style;
use ruleform_validate::{format_rule_spec, parse_rule, split_rules, RuleRegistry, RuleToken};
use std::process::ExitCode;

/// Arguments for the `parse` command
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Rule list, e.g. "[NOTEMPTY, L>=6]"
    pub rules: String,
}

/// Print each rule with its kind, flag dropped ones, then the normalized list.
///
/// Exits with 1 when any rule would be skipped during validation.
pub fn parse(args: ParseArgs) -> Result<ExitCode> {
    let registry = RuleRegistry::builtin();
    let mut tokens = Vec::new();
    let mut skipped = 0;

    for rule in split_rules(&args.rules) {
        match parse_rule(&rule) {
            Ok(token) => {
                let unknown = match &token {
                    RuleToken::Predefined(name) => !registry.contains(name),
                    _ => false,
                };
                if unknown {
                    skipped += 1;
                    println!(
                        "{} {} {}",
                        style(format!("{:<12}", token.kind().as_str())).dim(),
                        style(&token).yellow(),
                        style("(unknown rule, skipped)").yellow()
                    );
                } else {
                    println!(
                        "{} {}",
                        style(format!("{:<12}", token.kind().as_str())).dim(),
                        style(&token).cyan()
                    );
                }
                tokens.push(token);
            }
            Err(err) => {
                skipped += 1;
                println!(
                    "{} {} {}",
                    style(format!("{:<12}", "invalid")).red(),
                    style(&rule).red(),
                    style(format!("({err})")).red()
                );
            }
        }
    }

    println!();
    println!("{}", style(format_rule_spec(&tokens)).bold());

    Ok(if skipped == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
