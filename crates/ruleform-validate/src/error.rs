//! Error types: configuration errors raised by malformed rules, and the
//! per-field [`ErrorModel`] that collects validation failures.

use crate::message::capitalize;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// A rule that cannot be evaluated.
///
/// These never reach the end user: the engine logs them and skips the
/// offending token, leaving sibling rules and other fields untouched.
#[derive(Debug, Clone, Error)]
pub enum RuleConfigError {
    /// A pure-letter rule that names no registered predefined rule.
    #[error("unknown predefined rule `{0}`")]
    UnknownRule(String),

    /// A token that is neither a predefined name nor a comparison.
    #[error("malformed rule `{0}`")]
    MalformedRule(String),

    /// A custom regex attribute that does not compile.
    #[error("invalid custom regex `{pattern}`: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A comparison operand names a field that has no value.
    #[error("referenced field `{0}` has no value")]
    MissingReference(String),
}

/// Messages to inject for one field: a single string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorEntry {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for ErrorEntry {
    fn from(message: &str) -> Self {
        Self::One(message.to_string())
    }
}

impl From<String> for ErrorEntry {
    fn from(message: String) -> Self {
        Self::One(message)
    }
}

impl From<Vec<String>> for ErrorEntry {
    fn from(messages: Vec<String>) -> Self {
        Self::Many(messages)
    }
}

/// Ordered collection of error messages, keyed by full field name.
///
/// Fields appear in the order their first error was registered and each
/// field's messages keep registration order, so iterating the model
/// reproduces validation order. A field absent from the model has no error.
///
/// One model belongs to one validation run; use separate instances for
/// forms validated concurrently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorModel {
    entries: Vec<(String, Vec<String>)>,
}

impl ErrorModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message for a field, creating the field's entry if absent.
    ///
    /// The first character of the message is capitalized.
    pub fn register(&mut self, field: impl Into<String>, message: impl AsRef<str>) {
        let field = field.into();
        let message = capitalize(message.as_ref());
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.entries.push((field, vec![message])),
        }
    }

    /// Append several messages for a field.
    pub fn register_all<I, S>(&mut self, field: impl Into<String>, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let field = field.into();
        for message in messages {
            self.register(field.clone(), message);
        }
    }

    /// Inject externally produced errors, e.g. from a server-side check.
    pub fn add_errors<I, K>(&mut self, errors: I)
    where
        I: IntoIterator<Item = (K, ErrorEntry)>,
        K: Into<String>,
    {
        for (field, entry) in errors {
            match entry {
                ErrorEntry::One(message) => self.register(field, message),
                ErrorEntry::Many(messages) => self.register_all(field, messages),
            }
        }
    }

    /// Remove a field entirely, returning its messages.
    pub fn clear(&mut self, field: &str) -> Option<Vec<String>> {
        let index = self.entries.iter().position(|(name, _)| name == field)?;
        Some(self.entries.remove(index).1)
    }

    /// Drop every registered error.
    pub fn reset_all(&mut self) {
        self.entries.clear();
    }

    /// Merge another model into this one, preserving both orders.
    pub fn merge(&mut self, other: ErrorModel) {
        for (field, messages) in other.entries {
            match self.entries.iter_mut().find(|(name, _)| *name == field) {
                Some((_, existing)) => existing.extend(messages),
                None => self.entries.push((field, messages)),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of messages across all fields.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, messages)| messages.len()).sum()
    }

    /// Messages registered for a field.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Field names in first-registered order.
    pub fn fields_in_error(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Iterate `(field, messages)` in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, messages)| (name.as_str(), messages.as_slice()))
    }

    /// `Ok(())` when empty, the model itself otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Convert to the flat machine-readable error body.
    pub fn to_api_error(&self) -> ApiValidationError {
        let fields = self
            .iter()
            .flat_map(|(field, messages)| {
                messages.iter().map(move |message| FieldErrorResponse {
                    field: field.to_string(),
                    message: message.clone(),
                })
            })
            .collect();

        ApiValidationError {
            error: ErrorBody {
                error_type: "validation_error".to_string(),
                message: "Validation failed".to_string(),
                fields,
            },
        }
    }
}

impl fmt::Display for ErrorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Validation failed: {} error(s) on {} field(s)",
            self.len(),
            self.entries.len()
        )
    }
}

impl std::error::Error for ErrorModel {}

impl Serialize for ErrorModel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, messages) in &self.entries {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ErrorModel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ErrorModelVisitor;

        impl<'de> Visitor<'de> for ErrorModelVisitor {
            type Value = ErrorModel;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to a message or a list of messages")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut model = ErrorModel::new();
                while let Some((field, entry)) = access.next_entry::<String, ErrorEntry>()? {
                    model.add_errors([(field, entry)]);
                }
                Ok(model)
            }
        }

        deserializer.deserialize_map(ErrorModelVisitor)
    }
}

/// Machine-readable validation error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiValidationError {
    pub error: ErrorBody,
}

/// Error body in [`ApiValidationError`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    pub fields: Vec<FieldErrorResponse>,
}

/// One field message in [`ErrorBody`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldErrorResponse {
    pub field: String,
    pub message: String,
}
