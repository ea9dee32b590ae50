//! Rules command: list the predefined rules

use anyhow::Result;
use console::style;
use ruleform_validate::{Operator, RuleRegistry};
use std::process::ExitCode;

/// Print every predefined rule with its pattern and message template.
pub fn list_rules() -> Result<ExitCode> {
    let registry = RuleRegistry::builtin();

    println!("{}", style("Predefined rules").bold());
    for rule in registry.rules() {
        println!(
            "  {} {}",
            style(format!("{:<10}", rule.name())).cyan().bold(),
            style(rule.pattern()).dim()
        );
        println!("  {:<10} {}", "", rule.message());
    }

    println!();
    println!("{}", style("Comparisons (L = length, V = value)").bold());
    for op in Operator::ALL {
        println!(
            "  {} {}",
            style(format!("{:<10}", op.as_str())).cyan().bold(),
            registry.comparison_message(op)
        );
    }

    println!();
    println!(
        "{} {}",
        style("Custom regex default:").bold(),
        registry.default_message()
    );

    Ok(ExitCode::SUCCESS)
}
