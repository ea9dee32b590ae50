//! Form-level validation over a snapshot of field values.
//!
//! A [`Form`] is what a UI layer extracts from a page: each field's name,
//! its already-normalized value, and its rule attributes. The engine
//! validates the whole snapshot into an [`ErrorModel`].
//!
//! ## Example
//!
//! ```rust
//! use ruleform_validate::prelude::*;
//!
//! let form = Form::new()
//!     .field(FieldSpec::new("username", "").validation("NOTEMPTY, L>=3"))
//!     .field(FieldSpec::new("password", "secret").validation("L>=6"))
//!     .field(FieldSpec::new("confirm", "secrets").validation("L==password"));
//!
//! let errors = ValidationEngine::default().validate_form(&form);
//! assert_eq!(errors.fields_in_error(), ["username", "confirm"]);
//! ```

use crate::engine::{ValidationEngine, ValidationOutcome};
use crate::error::ErrorModel;
use crate::lookup::FieldValueLookup;
use crate::parser::{add_rules, parse_rule_spec, remove_rules};
use crate::rule::{CustomRegex, RuleToken};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Snapshot of one field and its rule attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Full field name, e.g. `user[email]`. Errors are keyed by it.
    pub name: String,
    /// Current value. Checkboxes are `"1"`/`""`, selections the selected value.
    #[serde(default)]
    pub value: String,
    /// Rule list, e.g. `[NOTEMPTY, L>=6]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<String>,
    /// Replaces the default message of every rule in `validation`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_message: Option<String>,
    /// Custom pattern in `/pattern/flags` form; a match is an error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex_message: Option<String>,
    /// Disabled fields are not validated.
    #[serde(default)]
    pub disabled: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn validation(mut self, rules: impl Into<String>) -> Self {
        self.validation = Some(rules.into());
        self
    }

    pub fn validation_message(mut self, message: impl Into<String>) -> Self {
        self.validation_message = Some(message.into());
        self
    }

    pub fn regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(pattern.into());
        self
    }

    pub fn regex_message(mut self, message: impl Into<String>) -> Self {
        self.regex_message = Some(message.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Add rules to the rule list, skipping rules already present.
    pub fn add_validation<I, S>(&mut self, rules: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.validation = add_rules(self.validation.as_deref(), rules);
    }

    /// Remove rules from the rule list; the list is dropped when empty.
    pub fn remove_validation<I, S>(&mut self, rules: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.validation = remove_rules(self.validation.as_deref(), rules);
    }

    /// Parsed rule list; malformed rules are dropped.
    pub fn rules(&self) -> Vec<RuleToken> {
        self.validation
            .as_deref()
            .map(parse_rule_spec)
            .unwrap_or_default()
    }

    /// True when the field is enabled and carries any rule attribute.
    pub fn is_validatable(&self) -> bool {
        !self.disabled && (self.validation.is_some() || self.regex.is_some())
    }
}

/// An ordered snapshot of a form's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// First field with this name.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldSpec> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Fields that take part in validation, in declaration order.
    pub fn validatable_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.is_validatable())
    }
}

impl FieldValueLookup for Form {
    fn lookup(&self, field: &str) -> Option<String> {
        self.get(field).map(|f| f.value.clone())
    }
}

impl ValidationEngine {
    /// Validate one field's rule list and custom regex.
    ///
    /// An empty value with `OPTIONAL` in the rule list skips the custom
    /// regex too. A custom regex that does not compile is logged and skipped.
    pub fn validate_input<L>(&self, field: &FieldSpec, lookup: &L) -> ValidationOutcome
    where
        L: FieldValueLookup + ?Sized,
    {
        if field.name.trim().is_empty() {
            warn!(value = %field.value, "field has no name, skipping validation");
            return ValidationOutcome::pass();
        }

        let rules = field.rules();
        if field.value.is_empty() && rules.iter().any(RuleToken::is_optional) {
            return ValidationOutcome::pass();
        }

        let options = self.field_options(field.validation_message.as_deref());
        let mut outcome = self.validate_field(&field.name, &field.value, &rules, &options, lookup);

        if let Some(attribute) = field.regex.as_deref().filter(|a| !a.is_empty()) {
            match CustomRegex::parse(attribute) {
                Ok(regex) => outcome.merge(self.validate_regex(
                    &field.name,
                    &field.value,
                    &regex,
                    field.regex_message.as_deref(),
                )),
                Err(err) => debug!(field = %field.name, error = %err, "skipping custom regex"),
            }
        }

        outcome
    }

    /// Validate every enabled field into a fresh [`ErrorModel`].
    pub fn validate_form(&self, form: &Form) -> ErrorModel {
        let mut errors = ErrorModel::new();
        self.validate_form_into(form, &mut errors);
        errors
    }

    /// Reset `errors` and validate every enabled field into it.
    ///
    /// Returns `true` when the form is valid.
    pub fn validate_form_into(&self, form: &Form, errors: &mut ErrorModel) -> bool {
        errors.reset_all();
        for field in form.validatable_fields() {
            let outcome = self.validate_input(field, form);
            errors.register_all(field.name.clone(), outcome.messages);
        }
        errors.is_empty()
    }

    /// Re-validate the fields named `name`, replacing their entry in `errors`.
    ///
    /// Returns `true` when the field has no error afterwards.
    pub fn revalidate_field(&self, form: &Form, name: &str, errors: &mut ErrorModel) -> bool {
        errors.clear(name);

        let mut found = false;
        for field in form.validatable_fields().filter(|f| f.name == name) {
            found = true;
            let outcome = self.validate_input(field, form);
            errors.register_all(name, outcome.messages);
        }
        if !found {
            debug!(field = name, "no validatable field with this name");
        }

        !errors.contains(name)
    }
}
