//! Catalogue of predefined rules and message templates.
//!
//! The registry is immutable once built. The built-in catalogue lives behind
//! a `OnceLock` and is shared by `Arc`; extra rules or replacement messages go
//! through [`RuleRegistryBuilder`] before the registry is handed to an engine.

use crate::error::RuleConfigError;
use crate::rule::Operator;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

static BUILTIN: OnceLock<Arc<RuleRegistry>> = OnceLock::new();

/// Name, pattern, default message.
const BUILTIN_RULES: &[(&str, &str, &str)] = &[
    ("NOTEMPTY", r".", "$ must not be empty."),
    ("NUMERIC", r"^[0-9]+$", "$ must be numeric."),
    (
        "MIXED",
        r"^[0-9A-Za-z_\s-]+$",
        "$ must be letters or numbers (no special characters).",
    ),
    ("NOSPACE", r"^\S+$", "$ must not contain spaces."),
    (
        "TRIM",
        r"^\S.*\S$",
        "$ must not start or end with space character.",
    ),
    (
        "DATE",
        r"^[0-9]{4}-[0-9]{2}-[0-9]{2}(\s[0-9]{2}:[0-9]{2}(:[0-9]{2})?)?$",
        "$ is not a valid with format YYYY-MM-DD.",
    ),
    (
        "EMAIL",
        r"(?i)^([^@]+?)@(([a-z0-9]-*)*[a-z0-9]+\.)+([a-z0-9]+)$",
        "$ is not valid.",
    ),
    (
        "URL",
        r"^(https?://)?((([a-z0-9]-*)*[a-z0-9]+\.?)*([a-z0-9]+))(/[0-9A-Za-z_?=.-]*)*$",
        "$ is not valid.",
    ),
    (
        "PHONE",
        r"^(\()?[0-9]{3}(\))?(-|\s)?[0-9]{3}(-|\s)[0-9]{4}$",
        "$ is not a valid phone number.",
    ),
    ("OPTIONAL", r"(?s)^.*$", "$ contain error(s)."),
];

const DEFAULT_MESSAGE: &str = "$ contain error(s).";

fn builtin_comparison_message(op: Operator) -> &'static str {
    match op {
        Operator::Lt => "$ must be less than % characters.",
        Operator::Le => "$ must be less or equal to % characters.",
        Operator::Gt => "$ must be greater than % characters.",
        Operator::Ge => "$ must be greater or equal to % characters.",
        Operator::Eq => "$ must be equal to %",
        Operator::Ne => "$ must be different than %",
    }
}

/// Which pattern outcome signals a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailsOn {
    /// Content rules: the value must match.
    Mismatch,
    /// Catch-all rules: a match means the value contains an error.
    Match,
}

/// A named pattern test with its default message template.
#[derive(Debug, Clone)]
pub struct PredefinedRule {
    name: String,
    pattern: Regex,
    message: String,
    fails_on: FailsOn,
}

impl PredefinedRule {
    /// Compile a rule that fails when the value does not match `pattern`.
    ///
    /// Names must be pure ASCII letters; they are stored uppercased.
    pub fn new(
        name: &str,
        pattern: &str,
        message: impl Into<String>,
    ) -> Result<Self, RuleConfigError> {
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(RuleConfigError::MalformedRule(name.to_string()));
        }
        let compiled = Regex::new(pattern).map_err(|source| RuleConfigError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            name: name.to_ascii_uppercase(),
            pattern: compiled,
            message: message.into(),
            fails_on: FailsOn::Mismatch,
        })
    }

    /// Change which pattern outcome signals failure.
    pub fn fails_on(mut self, fails_on: FailsOn) -> Self {
        self.fails_on = fails_on;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Default message template.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// True when `value` fails this rule.
    pub fn is_violated_by(&self, value: &str) -> bool {
        let matched = self.pattern.is_match(value);
        match self.fails_on {
            FailsOn::Mismatch => !matched,
            FailsOn::Match => matched,
        }
    }
}

/// Immutable catalogue of predefined rules and message templates.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: Vec<PredefinedRule>,
    default_message: String,
    comparison_messages: HashMap<Operator, String>,
}

impl RuleRegistry {
    /// The built-in catalogue.
    pub fn builtin() -> &'static RuleRegistry {
        Self::shared_ref()
    }

    /// Shared handle to the built-in catalogue.
    pub fn shared() -> Arc<RuleRegistry> {
        Arc::clone(Self::shared_ref())
    }

    fn shared_ref() -> &'static Arc<RuleRegistry> {
        BUILTIN.get_or_init(|| {
            let rules = BUILTIN_RULES
                .iter()
                .map(|(name, pattern, message)| {
                    PredefinedRule::new(name, pattern, *message)
                        .expect("built-in rule patterns are valid")
                })
                .collect();

            Arc::new(RuleRegistry {
                rules,
                default_message: DEFAULT_MESSAGE.to_string(),
                comparison_messages: Operator::ALL
                    .into_iter()
                    .map(|op| (op, builtin_comparison_message(op).to_string()))
                    .collect(),
            })
        })
    }

    /// Start from the built-in catalogue.
    pub fn builder() -> RuleRegistryBuilder {
        RuleRegistryBuilder::new()
    }

    /// Look up a predefined rule by name, ignoring case.
    pub fn resolve(&self, name: &str) -> Result<&PredefinedRule, RuleConfigError> {
        self.rules
            .iter()
            .find(|rule| rule.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| RuleConfigError::UnknownRule(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    /// Rules in catalogue order.
    pub fn rules(&self) -> impl Iterator<Item = &PredefinedRule> {
        self.rules.iter()
    }

    /// Message used for custom regex failures without an override.
    pub fn default_message(&self) -> &str {
        &self.default_message
    }

    /// Message template for a failed comparison.
    pub fn comparison_message(&self, op: Operator) -> &str {
        self.comparison_messages
            .get(&op)
            .map(String::as_str)
            .unwrap_or_else(|| builtin_comparison_message(op))
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

/// Builds a [`RuleRegistry`] on top of the built-in catalogue.
///
/// ## Example
///
/// ```rust
/// use ruleform_validate::RuleRegistry;
///
/// let registry = RuleRegistry::builder()
///     .rule("ZIP", r"^[0-9]{5}$", "$ is not a valid zip code.")
///     .unwrap()
///     .default_message("$ is invalid.")
///     .build();
///
/// assert!(registry.contains("zip"));
/// ```
#[derive(Debug, Clone)]
pub struct RuleRegistryBuilder {
    inner: RuleRegistry,
}

impl RuleRegistryBuilder {
    pub fn new() -> Self {
        Self {
            inner: RuleRegistry::builtin().clone(),
        }
    }

    /// Add a rule, replacing any rule with the same name.
    pub fn rule(
        self,
        name: &str,
        pattern: &str,
        message: impl Into<String>,
    ) -> Result<Self, RuleConfigError> {
        let rule = PredefinedRule::new(name, pattern, message)?;
        Ok(self.predefined(rule))
    }

    /// Add an already-built rule, replacing any rule with the same name.
    pub fn predefined(mut self, rule: PredefinedRule) -> Self {
        match self.inner.rules.iter_mut().find(|r| r.name == rule.name) {
            Some(existing) => *existing = rule,
            None => self.inner.rules.push(rule),
        }
        self
    }

    /// Replace the message template for an operator.
    pub fn comparison_message(mut self, op: Operator, template: impl Into<String>) -> Self {
        self.inner.comparison_messages.insert(op, template.into());
        self
    }

    /// Replace the custom regex fallback message.
    pub fn default_message(mut self, template: impl Into<String>) -> Self {
        self.inner.default_message = template.into();
        self
    }

    pub fn build(self) -> RuleRegistry {
        self.inner
    }
}

impl Default for RuleRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
