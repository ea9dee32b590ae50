//! Evaluation of comparison rules (`L>=6`, `V<100`, `L==confirm`).
//!
//! Operators are applied through an explicit match over the closed operator
//! set; rule text is never executed.

use crate::error::RuleConfigError;
use crate::lookup::FieldValueLookup;
use crate::registry::RuleRegistry;
use crate::rule::{Comparison, Operand, Subject};
use tracing::trace;

/// A failed comparison: the message template to render and the operand
/// shown in place of `%`, as written in the rule. A field reference shows
/// the field's name, never its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonFailure {
    pub template: String,
    pub operand: String,
}

/// Result of a well-formed comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail(ComparisonFailure),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// Evaluates [`Comparison`]s against a field value.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonEvaluator<'a> {
    registry: &'a RuleRegistry,
}

impl<'a> ComparisonEvaluator<'a> {
    pub fn new(registry: &'a RuleRegistry) -> Self {
        Self { registry }
    }

    /// Evaluate a comparison.
    ///
    /// A field-reference operand whose field is missing or empty yields
    /// [`RuleConfigError::MissingReference`]: the rule cannot be evaluated
    /// and callers skip it rather than reporting a failure. An empty `value`
    /// fails every resolvable comparison.
    ///
    /// With a numeric operand, `L` compares the value's character count and
    /// `V` compares the value parsed as a number (a non-numeric value fails).
    /// With a field-reference operand both subjects compare the two values
    /// as strings, lexically.
    pub fn evaluate<L>(
        &self,
        value: &str,
        comparison: &Comparison,
        lookup: &L,
    ) -> Result<Verdict, RuleConfigError>
    where
        L: FieldValueLookup + ?Sized,
    {
        let op = comparison.operator;

        let passed = match &comparison.operand {
            Operand::Field(name) => {
                let other = lookup
                    .lookup(name)
                    .filter(|other| !other.is_empty())
                    .ok_or_else(|| RuleConfigError::MissingReference(name.clone()))?;
                !value.is_empty() && op.apply(value, other.as_str())
            }
            Operand::Number { value: rhs, .. } => {
                !value.is_empty()
                    && match comparison.subject {
                        Subject::Length => op.apply(&(value.chars().count() as f64), rhs),
                        Subject::Value => match value.trim().parse::<f64>() {
                            Ok(lhs) if lhs.is_finite() => op.apply(&lhs, rhs),
                            _ => false,
                        },
                    }
            }
        };

        trace!(rule = %comparison, passed, "evaluated comparison");

        if passed {
            return Ok(Verdict::Pass);
        }

        let template = self.registry.comparison_message(op);
        let template = match comparison.subject {
            Subject::Length => template.to_string(),
            Subject::Value => template.replace(" characters", ""),
        };

        Ok(Verdict::Fail(ComparisonFailure {
            template,
            operand: comparison.operand.as_written().to_string(),
        }))
    }
}
