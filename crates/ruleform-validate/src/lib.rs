//! # Ruleform Validation
//!
//! Rule parsing and evaluation engine for declarative field validation.
//! Each field carries a compact rule string, which this crate parses into
//! rule tokens, evaluates against the field's value (including comparisons
//! against other fields), and renders into ordered, human-readable errors.
//!
//! ## Example
//!
//! ```rust
//! use ruleform_validate::prelude::*;
//!
//! let engine = ValidationEngine::default();
//! let rules = parse_rule_spec("[NOTEMPTY, L>=6]");
//! assert_eq!(format_rule_spec(&rules), "[NOTEMPTY, L>=6]");
//!
//! let outcome = engine.validate_field(
//!     "user[password]",
//!     "abc",
//!     &rules,
//!     &FieldOptions::new(),
//!     &NoFields,
//! );
//! assert_eq!(outcome.messages, ["Password must be greater or equal to 6 characters."]);
//! ```
//!
//! ## Rule Syntax
//!
//! - `NOTEMPTY`, `NUMERIC`, `MIXED`, `NOSPACE`, `TRIM`, `DATE`, `EMAIL`, `URL`,
//!   `PHONE` - predefined pattern rules (case-insensitive)
//! - `OPTIONAL` - skip every rule when the value is empty
//! - `L<op><n>` - compare the value's length with a number
//! - `V<op><n>` - compare the value as a number
//! - `L<op><field>` / `V<op><field>` - compare the value with another field's value
//!
//! Operators are `<`, `<=`, `>`, `>=`, `==` and `!=`. A list may be wrapped
//! in `[...]`. Custom patterns use the `/pattern/flags` form and report an
//! error when they match.
//!
//! ## Error Handling
//!
//! Malformed rules never fail validation: unknown names, bad comparisons,
//! invalid regexes and missing referenced fields are logged through
//! `tracing` and skipped. Only genuine validation failures end up in the
//! [`ErrorModel`].

mod comparison;
mod engine;
mod error;
mod form;
mod lookup;
mod message;
mod parser;
mod registry;
mod rule;
pub mod settings;


pub use comparison::{ComparisonEvaluator, ComparisonFailure, Verdict};
pub use engine::{FieldOptions, ValidationEngine, ValidationOutcome};
pub use error::{
    ApiValidationError, ErrorBody, ErrorEntry, ErrorModel, FieldErrorResponse, RuleConfigError,
};
pub use form::{FieldSpec, Form};
pub use lookup::{FieldValueLookup, NoFields};
pub use message::{capitalize, display_name, interpolate, interpolate_subject};
pub use parser::{
    add_rules, format_rule, format_rule_spec, join_rules, parse_rule, parse_rule_list,
    parse_rule_spec, remove_rules, split_rules,
};
pub use registry::{FailsOn, PredefinedRule, RuleRegistry, RuleRegistryBuilder};
pub use rule::{Comparison, CustomRegex, Operand, Operator, RuleKind, RuleToken, Subject};
pub use settings::EngineSettings;

/// Validate a value against rule text with the built-in registry.
///
/// Convenience over [`ValidationEngine::validate_field`] for one-off checks.
pub fn validate_field<L>(
    field: &str,
    value: &str,
    rules: &[RuleToken],
    options: &FieldOptions,
    lookup: &L,
) -> ValidationOutcome
where
    L: FieldValueLookup + ?Sized,
{
    ValidationEngine::default().validate_field(field, value, rules, options, lookup)
}

/// Prelude module for validation
pub mod prelude {
    pub use crate::engine::{FieldOptions, ValidationEngine, ValidationOutcome};
    pub use crate::error::{ErrorEntry, ErrorModel, RuleConfigError};
    pub use crate::form::{FieldSpec, Form};
    pub use crate::lookup::{FieldValueLookup, NoFields};
    pub use crate::parser::{format_rule_spec, parse_rule_list, parse_rule_spec};
    pub use crate::registry::RuleRegistry;
    pub use crate::rule::{CustomRegex, RuleKind, RuleToken};
    pub use crate::settings::EngineSettings;
}
