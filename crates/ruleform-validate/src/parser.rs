//! Rule-list parsing and normalization.
//!
//! Rule text is a comma-separated list of predefined names (any case) and
//! comparison expressions, optionally wrapped in `[...]`:
//!
//! ```text
//! NOTEMPTY, L>=6
//! [notempty, v>=6, L==confirm]
//! ```

use crate::error::RuleConfigError;
use crate::rule::{Operand, Operator, RuleToken, Subject};
use regex::Regex;
use std::fmt::Display;
use std::sync::OnceLock;
use tracing::debug;

static COMPARISON_REGEX: OnceLock<Regex> = OnceLock::new();

fn comparison_regex() -> &'static Regex {
    COMPARISON_REGEX.get_or_init(|| {
        Regex::new(r"^\s*([LVlv])\s*([<>]=?|==|!=)\s*([^<>=!]+?)\s*$").unwrap()
    })
}

fn is_pure_letters(rule: &str) -> bool {
    !rule.is_empty() && rule.chars().all(|c| c.is_ascii_alphabetic())
}

/// Strip all whitespace and a wrapping `[...]`.
fn strip_wrapping(text: &str) -> String {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    match compact
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
    {
        Some(inner) => inner.to_string(),
        None => compact,
    }
}

/// Normalize one rule: whitespace removed, brackets stripped, pure-letter
/// names uppercased.
pub fn format_rule(rule: &str) -> String {
    let rule = strip_wrapping(rule);
    if is_pure_letters(&rule) {
        rule.to_ascii_uppercase()
    } else {
        rule
    }
}

/// Split rule text into normalized raw rule strings.
///
/// Nothing is validated here; empty segments are kept so callers can see
/// exactly what the text contained.
pub fn split_rules(text: &str) -> Vec<String> {
    strip_wrapping(text)
        .split(',')
        .map(|rule| {
            if is_pure_letters(rule) {
                rule.to_ascii_uppercase()
            } else {
                rule.to_string()
            }
        })
        .collect()
}

/// Parse a single rule.
pub fn parse_rule(rule: &str) -> Result<RuleToken, RuleConfigError> {
    let rule = format_rule(rule);
    if is_pure_letters(&rule) {
        return Ok(RuleToken::Predefined(rule));
    }

    let captures = comparison_regex()
        .captures(&rule)
        .ok_or_else(|| RuleConfigError::MalformedRule(rule.clone()))?;

    let subject = Subject::from_letter(&captures[1])
        .ok_or_else(|| RuleConfigError::MalformedRule(rule.clone()))?;
    let operator: Operator = captures[2].parse()?;
    let operand = Operand::parse(&captures[3]);

    Ok(RuleToken::comparison(subject, operator, operand))
}

/// Parse rule text into tokens, dropping malformed rules.
///
/// Predefined names are not checked against the registry here; unknown
/// names are reported when the rule is evaluated.
pub fn parse_rule_spec(text: &str) -> Vec<RuleToken> {
    split_rules(text)
        .iter()
        .filter_map(|raw| match parse_rule(raw) {
            Ok(token) => Some(token),
            Err(err) => {
                debug!(rule = %raw, error = %err, "dropping validation rule");
                None
            }
        })
        .collect()
}

/// Parse a sequence of rule strings, as if joined with `,`.
pub fn parse_rule_list<I, S>(rules: I) -> Vec<RuleToken>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = rules
        .into_iter()
        .map(|rule| rule.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(",");
    parse_rule_spec(&joined)
}

/// Join rules into the bracketed attribute form: `[A, B]`.
pub fn join_rules<T: Display>(rules: &[T]) -> String {
    let parts: Vec<String> = rules.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}

/// Render tokens back to normalized rule text.
pub fn format_rule_spec(tokens: &[RuleToken]) -> String {
    join_rules(tokens)
}

fn split_existing(existing: Option<&str>) -> Vec<String> {
    match existing {
        Some(text) if !text.trim().is_empty() => split_rules(text)
            .into_iter()
            .filter(|rule| !rule.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn split_all<I, S>(rules: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    rules
        .into_iter()
        .flat_map(|rule| split_rules(rule.as_ref()))
        .filter(|rule| !rule.is_empty())
        .collect()
}

/// Add rules to an attribute value, skipping rules already present.
///
/// Returns the re-joined attribute, or `None` when no rules remain.
pub fn add_rules<I, S>(existing: Option<&str>, additions: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut rules = split_existing(existing);
    for rule in split_all(additions) {
        if !rules.contains(&rule) {
            rules.push(rule);
        }
    }

    if rules.is_empty() {
        None
    } else {
        Some(join_rules(&rules))
    }
}

/// Remove rules from an attribute value.
///
/// Returns `None` when no rules remain and the attribute should be dropped.
pub fn remove_rules<I, S>(existing: Option<&str>, removals: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut rules = split_existing(existing);
    for rule in split_all(removals) {
        if let Some(index) = rules.iter().position(|r| *r == rule) {
            rules.remove(index);
        }
    }

    if rules.is_empty() {
        None
    } else {
        Some(join_rules(&rules))
    }
}
