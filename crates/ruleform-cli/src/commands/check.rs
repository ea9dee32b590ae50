//! Check command: validate a form snapshot file

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use console::{style, Emoji};
use ruleform_validate::settings::load_dotenv;
use ruleform_validate::{EngineSettings, ErrorModel, Form, ValidationEngine};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

static CROSS: Emoji<'_, '_> = Emoji("✗ ", "x ");
static CHECK: Emoji<'_, '_> = Emoji("✓ ", "ok ");

/// Arguments for the `check` command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Form snapshot file (`.json` or `.toml`)
    pub file: PathBuf,

    /// Report every failing rule of a field, not just the first
    #[arg(long)]
    pub all_errors: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    Text,
    /// `{ "valid": .., "errors": { field: [messages] } }`
    Json,
    /// Error body with a flat list of field messages
    Api,
}

#[derive(Serialize)]
struct Report<'a> {
    valid: bool,
    errors: &'a ErrorModel,
}

/// Validate every field of the snapshot; exits with 1 when any field fails.
pub fn check(args: CheckArgs) -> Result<ExitCode> {
    load_dotenv();
    let mut settings =
        EngineSettings::from_env().context("Failed to read RULEFORM_ settings")?;
    if args.all_errors {
        settings.all_errors = true;
    }

    let form = load_form(&args.file)?;
    let engine = ValidationEngine::default().with_settings(settings);
    let errors = engine.validate_form(&form);

    info!(
        file = %args.file.display(),
        fields = form.fields.len(),
        failed = errors.fields_in_error().len(),
        "form checked"
    );

    match args.format {
        OutputFormat::Text => print_text(&form, &errors),
        OutputFormat::Json => {
            let report = Report {
                valid: errors.is_empty(),
                errors: &errors,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Api => {
            println!("{}", serde_json::to_string_pretty(&errors.to_api_error())?);
        }
    }

    Ok(if errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn load_form(path: &Path) -> Result<Form> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        toml::from_str(&content).with_context(|| format!("Invalid TOML form in {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON form in {}", path.display()))
    }
}

fn print_text(form: &Form, errors: &ErrorModel) {
    for field in form.validatable_fields() {
        match errors.get(&field.name) {
            Some(messages) => {
                println!("{}{}", CROSS, style(&field.name).red().bold());
                for message in messages {
                    println!("    {}", message);
                }
            }
            None => println!("{}{}", CHECK, style(&field.name).green()),
        }
    }

    println!();
    if errors.is_empty() {
        println!("{}", style("All fields are valid.").green().bold());
    } else {
        println!("{}", style(errors.to_string()).red().bold());
    }
}
