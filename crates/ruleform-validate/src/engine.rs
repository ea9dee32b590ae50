//! Field validation engine.
//!
//! [`ValidationEngine`] evaluates one field's rule list against its value and
//! renders every failure into a display message. Evaluation is pure: the
//! same inputs always produce the same [`ValidationOutcome`].
//!
//! ## Example
//!
//! ```rust
//! use ruleform_validate::prelude::*;
//!
//! let engine = ValidationEngine::default();
//! let rules = parse_rule_spec("NOTEMPTY, L>=6");
//!
//! let outcome = engine.validate_field("password", "abc", &rules, &FieldOptions::new(), &NoFields);
//! assert!(!outcome.ok);
//! assert_eq!(outcome.messages, ["Password must be greater or equal to 6 characters."]);
//! ```

use crate::comparison::{ComparisonEvaluator, Verdict};
use crate::lookup::FieldValueLookup;
use crate::message::{capitalize, display_name, interpolate, interpolate_subject};
use crate::registry::RuleRegistry;
use crate::rule::{CustomRegex, RuleToken};
use crate::settings::EngineSettings;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, trace};

/// Per-field evaluation options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOptions {
    /// Stop after the first failing rule.
    #[serde(default)]
    pub stop_at_first: bool,
    /// Replaces every rule's default message for this field. Setting it
    /// also implies stopping at the first failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options derived from engine settings.
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self {
            stop_at_first: !settings.all_errors,
            message: None,
        }
    }

    pub fn stop_at_first(mut self, stop: bool) -> Self {
        self.stop_at_first = stop;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn stops_early(&self) -> bool {
        self.stop_at_first || self.message.is_some()
    }
}

/// Result of validating one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub ok: bool,
    /// Rendered messages in rule order; empty when `ok`.
    pub messages: Vec<String>,
}

impl ValidationOutcome {
    pub fn pass() -> Self {
        Self {
            ok: true,
            messages: Vec::new(),
        }
    }

    pub fn from_messages(messages: Vec<String>) -> Self {
        Self {
            ok: messages.is_empty(),
            messages,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// Append another outcome's messages.
    pub fn merge(&mut self, other: ValidationOutcome) {
        self.messages.extend(other.messages);
        self.ok = self.messages.is_empty();
    }
}

impl Default for ValidationOutcome {
    fn default() -> Self {
        Self::pass()
    }
}

/// Evaluates rule lists against field values.
///
/// Holds the shared, immutable [`RuleRegistry`] and the engine settings.
/// The engine itself keeps no per-run state and can be shared freely.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    registry: Arc<RuleRegistry>,
    settings: EngineSettings,
}

impl ValidationEngine {
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self {
            registry,
            settings: EngineSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Options for a field under this engine's settings.
    pub fn field_options(&self, message: Option<&str>) -> FieldOptions {
        let options = FieldOptions::from_settings(&self.settings);
        match message {
            Some(message) => options.with_message(message),
            None => options,
        }
    }

    /// Validate a value against a rule list.
    ///
    /// `field` is the full field name; messages use its display name
    /// (the last `[...]` path segment). An empty value with `OPTIONAL` in
    /// the list passes without evaluating anything else. Rules that cannot
    /// be evaluated (unknown names, missing referenced fields) are logged
    /// and skipped.
    pub fn validate_field<L>(
        &self,
        field: &str,
        value: &str,
        rules: &[RuleToken],
        options: &FieldOptions,
        lookup: &L,
    ) -> ValidationOutcome
    where
        L: FieldValueLookup + ?Sized,
    {
        if value.is_empty() && rules.iter().any(RuleToken::is_optional) {
            trace!(field, "optional field is empty, skipping rules");
            return ValidationOutcome::pass();
        }

        let subject = display_name(field);
        let mut messages = Vec::new();

        for token in rules {
            let Some((default_template, operand)) = self.check(field, value, token, lookup) else {
                continue;
            };

            let template = options
                .message
                .as_deref()
                .unwrap_or(default_template.as_str());
            messages.push(capitalize(&interpolate(template, subject, &operand)));

            if options.stops_early() {
                break;
            }
        }

        ValidationOutcome::from_messages(messages)
    }

    /// Validate a value against a custom regex attribute.
    ///
    /// The value is in error when the pattern matches. Only `$` is
    /// substituted in the message; `%` has no operand here.
    pub fn validate_regex(
        &self,
        field: &str,
        value: &str,
        regex: &CustomRegex,
        message: Option<&str>,
    ) -> ValidationOutcome {
        if !regex.is_violated_by(value) {
            return ValidationOutcome::pass();
        }

        let template = message.unwrap_or(self.registry.default_message());
        let rendered = capitalize(&interpolate_subject(template, display_name(field)));
        ValidationOutcome::from_messages(vec![rendered])
    }

    /// Evaluate one token. Returns the failure's template and operand.
    fn check<L>(
        &self,
        field: &str,
        value: &str,
        token: &RuleToken,
        lookup: &L,
    ) -> Option<(String, String)>
    where
        L: FieldValueLookup + ?Sized,
    {
        match token {
            RuleToken::Predefined(name) => match self.registry.resolve(name) {
                Ok(rule) => rule
                    .is_violated_by(value)
                    .then(|| (rule.message().to_string(), String::new())),
                Err(err) => {
                    debug!(field, error = %err, "skipping validation rule");
                    None
                }
            },
            RuleToken::Comparison(comparison) => {
                match ComparisonEvaluator::new(&self.registry).evaluate(value, comparison, lookup) {
                    Ok(Verdict::Pass) => None,
                    Ok(Verdict::Fail(failure)) => Some((failure.template, failure.operand)),
                    Err(err) => {
                        debug!(field, rule = %comparison, error = %err, "skipping validation rule");
                        None
                    }
                }
            }
            RuleToken::CustomRegex(regex) => regex
                .is_violated_by(value)
                .then(|| (self.registry.default_message().to_string(), String::new())),
        }
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new(RuleRegistry::shared())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::NoFields;
    use crate::parser::parse_rule_spec;
    use std::collections::HashMap;

    fn validate(field: &str, value: &str, rules: &str, options: &FieldOptions) -> ValidationOutcome {
        ValidationEngine::default().validate_field(
            field,
            value,
            &parse_rule_spec(rules),
            options,
            &NoFields,
        )
    }

    #[test]
    fn optional_empty_value_passes() {
        let outcome = validate("age", "", "OPTIONAL, NUMERIC", &FieldOptions::new());
        assert_eq!(outcome, ValidationOutcome::pass());
    }

    #[test]
    fn optional_non_empty_value_is_checked() {
        let outcome = validate("age", "abc", "OPTIONAL, NUMERIC", &FieldOptions::new());
        assert_eq!(outcome.messages, ["Age must be numeric."]);
    }

    #[test]
    fn predefined_failure_names_the_field() {
        let outcome = validate("zip", "abc", "NUMERIC", &FieldOptions::new());
        assert!(!outcome.ok);
        assert_eq!(outcome.messages, ["Zip must be numeric."]);
    }

    #[test]
    fn display_name_uses_last_segment() {
        let outcome = validate("user[profile][email]", "nope", "EMAIL", &FieldOptions::new());
        assert_eq!(outcome.messages, ["Email is not valid."]);
    }

    #[test]
    fn comparison_shows_operand() {
        let outcome = validate("password", "hi", "L>=5", &FieldOptions::new());
        assert_eq!(
            outcome.messages,
            ["Password must be greater or equal to 5 characters."]
        );
        assert!(validate("password", "hello", "L>=5", &FieldOptions::new()).ok);
    }

    #[test]
    fn value_comparison_drops_characters_word() {
        let outcome = validate("age", "12", "V>=18", &FieldOptions::new());
        assert_eq!(outcome.messages, ["Age must be greater or equal to 18."]);
    }

    #[test]
    fn collects_all_errors_by_default_options() {
        let outcome = validate("code", "", "NOTEMPTY, NUMERIC", &FieldOptions::new());
        assert_eq!(outcome.messages.len(), 2);
    }

    #[test]
    fn stop_at_first_keeps_one_message() {
        let options = FieldOptions::new().stop_at_first(true);
        let outcome = validate("code", "", "NOTEMPTY, NUMERIC", &options);
        assert_eq!(outcome.messages, ["Code must not be empty."]);
    }

    #[test]
    fn override_message_implies_stop_at_first() {
        let options = FieldOptions::new().with_message("please enter a $ code");
        let outcome = validate("promo[code]", "", "NOTEMPTY, NUMERIC", &options);
        assert_eq!(outcome.messages, ["Please enter a code code"]);
    }

    #[test]
    fn unknown_rule_is_skipped() {
        let outcome = validate("name", "", "BOGUS, NOTEMPTY", &FieldOptions::new());
        assert_eq!(outcome.messages, ["Name must not be empty."]);
    }

    #[test]
    fn cross_field_comparison() {
        let engine = ValidationEngine::default();
        let rules = parse_rule_spec("L==confirm");
        let lookup = HashMap::from([("confirm".to_string(), "secret".to_string())]);

        let ok = engine.validate_field("password", "secret", &rules, &FieldOptions::new(), &lookup);
        assert!(ok.ok);

        let failed =
            engine.validate_field("password", "other", &rules, &FieldOptions::new(), &lookup);
        assert_eq!(failed.messages, ["Password must be equal to confirm"]);
    }

    #[test]
    fn missing_reference_skips_rule() {
        let engine = ValidationEngine::default();
        let rules = parse_rule_spec("L==confirm, NOTEMPTY");

        let outcome = engine.validate_field("password", "x", &rules, &FieldOptions::new(), &NoFields);
        assert!(outcome.ok);

        let outcome = engine.validate_field("password", "", &rules, &FieldOptions::new(), &NoFields);
        assert_eq!(outcome.messages, ["Password must not be empty."]);
    }

    #[test]
    fn custom_regex_matches_are_errors() {
        let engine = ValidationEngine::default();
        let regex = CustomRegex::parse("/[<>]/").unwrap();

        assert!(engine.validate_regex("bio", "hello", &regex, None).ok);
        assert_eq!(
            engine.validate_regex("bio", "<b>", &regex, None).messages,
            ["Bio contain error(s)."]
        );
        assert_eq!(
            engine
                .validate_regex("bio", "<b>", &regex, Some("$ must not contain markup."))
                .messages,
            ["Bio must not contain markup."]
        );
    }

    #[test]
    fn custom_regex_message_keeps_literal_percent() {
        let engine = ValidationEngine::default();
        let regex = CustomRegex::parse("/x/").unwrap();
        let outcome = engine.validate_regex("discount", "x", &regex, Some("$ must stay under 100%"));
        assert_eq!(outcome.messages, ["Discount must stay under 100%"]);
    }

    #[test]
    fn custom_regex_token_in_rule_list() {
        let engine = ValidationEngine::default();
        let rules = vec![RuleToken::CustomRegex(CustomRegex::parse("/^admin$/i").unwrap())];
        let outcome = engine.validate_field("login", "Admin", &rules, &FieldOptions::new(), &NoFields);
        assert_eq!(outcome.messages, ["Login contain error(s)."]);
    }

    #[test]
    fn field_options_follow_settings() {
        let engine = ValidationEngine::default();
        assert!(engine.field_options(None).stop_at_first);

        let engine = ValidationEngine::default().with_settings(EngineSettings::new().all_errors(true));
        let options = engine.field_options(None);
        assert!(!options.stop_at_first);
        assert_eq!(
            engine.field_options(Some("custom")).message.as_deref(),
            Some("custom")
        );
    }

    #[test]
    fn custom_registry_messages() {
        let registry = RuleRegistry::builder()
            .rule("ZIP", r"^[0-9]{5}$", "$ needs five digits.")
            .unwrap()
            .build();
        let engine = ValidationEngine::new(Arc::new(registry));
        let outcome = engine.validate_field(
            "address[zip]",
            "123",
            &parse_rule_spec("zip"),
            &FieldOptions::new(),
            &NoFields,
        );
        assert_eq!(outcome.messages, ["Zip needs five digits."]);
    }

    #[test]
    fn outcome_merge() {
        let mut outcome = ValidationOutcome::pass();
        outcome.merge(ValidationOutcome::from_messages(vec!["A".into()]));
        assert!(!outcome.ok);
        assert_eq!(outcome.messages, ["A"]);
    }
}
