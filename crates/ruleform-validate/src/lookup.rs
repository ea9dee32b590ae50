//! Cross-field value lookup.

use std::collections::{BTreeMap, HashMap};

/// Read-only access to other fields' current values.
///
/// Supplied by the caller and used only to resolve comparison operands that
/// name another field. Implementations must not trigger validation.
///
/// Closures work directly:
///
/// ```rust
/// use ruleform_validate::FieldValueLookup;
///
/// let lookup = |name: &str| (name == "confirm").then(|| "secret".to_string());
/// assert_eq!(lookup.lookup("confirm").as_deref(), Some("secret"));
/// assert_eq!(lookup.lookup("other"), None);
/// ```
pub trait FieldValueLookup {
    /// Current value of `field`, or `None` when the field does not exist.
    fn lookup(&self, field: &str) -> Option<String>;
}

impl<F> FieldValueLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup(&self, field: &str) -> Option<String> {
        self(field)
    }
}

impl FieldValueLookup for HashMap<String, String> {
    fn lookup(&self, field: &str) -> Option<String> {
        self.get(field).cloned()
    }
}

impl FieldValueLookup for BTreeMap<String, String> {
    fn lookup(&self, field: &str) -> Option<String> {
        self.get(field).cloned()
    }
}

/// A lookup with no other fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFields;

impl FieldValueLookup for NoFields {
    fn lookup(&self, _field: &str) -> Option<String> {
        None
    }
}
