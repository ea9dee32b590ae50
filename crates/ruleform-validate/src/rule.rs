//! Parsed rule tokens.
//!
//! A field's rule text parses into an ordered list of [`RuleToken`]s. Each
//! variant carries exactly the data its kind needs, so a predefined token can
//! never hold a comparison operand and vice versa.

use crate::error::RuleConfigError;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classification of a [`RuleToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Predefined,
    Comparison,
    CustomRegex,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Predefined => "predefined",
            RuleKind::Comparison => "comparison",
            RuleKind::CustomRegex => "custom_regex",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a comparison measures on the field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    /// `L`: the value's length in characters.
    Length,
    /// `V`: the value itself.
    Value,
}

impl Subject {
    /// Parse the subject letter, ignoring case.
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "L" | "l" => Some(Subject::Length),
            "V" | "v" => Some(Subject::Value),
            _ => None,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Subject::Length => 'L',
            Subject::Value => 'V',
        }
    }
}

/// Comparison operator. The set is closed; evaluation switches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::Lt,
        Operator::Le,
        Operator::Gt,
        Operator::Ge,
        Operator::Eq,
        Operator::Ne,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Eq => "==",
            Operator::Ne => "!=",
        }
    }

    /// Apply the operator to two operands of the same type.
    pub fn apply<T: PartialOrd + ?Sized>(&self, lhs: &T, rhs: &T) -> bool {
        match self {
            Operator::Lt => lhs < rhs,
            Operator::Le => lhs <= rhs,
            Operator::Gt => lhs > rhs,
            Operator::Ge => lhs >= rhs,
            Operator::Eq => lhs == rhs,
            Operator::Ne => lhs != rhs,
        }
    }
}

impl FromStr for Operator {
    type Err = RuleConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| RuleConfigError::MalformedRule(s.to_string()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A finite number, with the text it was written as.
    Number { value: f64, text: String },
    /// The name of another field whose current value is compared.
    Field(String),
}

impl Operand {
    /// Classify operand text: a finite number, or else a field name.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Operand::Number {
                value,
                text: text.to_string(),
            },
            _ => Operand::Field(text.to_string()),
        }
    }

    /// The operand as written in the rule.
    pub fn as_written(&self) -> &str {
        match self {
            Operand::Number { text, .. } => text,
            Operand::Field(name) => name,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_written())
    }
}

/// `<subject> <operator> <operand>`, e.g. `L>=6` or `V==confirm`.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub subject: Subject,
    pub operator: Operator,
    pub operand: Operand,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.subject.letter(), self.operator, self.operand)
    }
}

/// An ad hoc pattern supplied instead of a named rule.
///
/// The convention is inverted from predefined rules: a value that
/// *matches* the pattern is in error.
#[derive(Debug, Clone)]
pub struct CustomRegex {
    source: String,
    flags: String,
    regex: Regex,
}

impl PartialEq for CustomRegex {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

impl CustomRegex {
    /// Parse the `/pattern/flags` wire format.
    ///
    /// The attribute is split on `/`. With fewer than two segments the whole
    /// string is the pattern. Otherwise the non-empty segments before the last
    /// are re-joined with `/` as the pattern, and the last segment is taken as
    /// flags when it consists only of `gimsxeU`; any other non-empty last
    /// segment stays part of the pattern.
    pub fn parse(attribute: &str) -> Result<Self, RuleConfigError> {
        let (source, flags) = split_delimited(attribute);
        Self::new(source, flags)
    }

    /// Compile a pattern with modifier flags.
    ///
    /// `i`, `m`, `s`, `x` and `U` map to the matching regex options; `g` and
    /// `e` have no meaning for a single test and are ignored.
    pub fn new(source: impl Into<String>, flags: impl Into<String>) -> Result<Self, RuleConfigError> {
        let source = source.into();
        let flags = flags.into();

        let regex = RegexBuilder::new(&source)
            .case_insensitive(flags.contains('i'))
            .multi_line(flags.contains('m'))
            .dot_matches_new_line(flags.contains('s'))
            .ignore_whitespace(flags.contains('x'))
            .swap_greed(flags.contains('U'))
            .build()
            .map_err(|source_err| RuleConfigError::InvalidRegex {
                pattern: source.clone(),
                source: source_err,
            })?;

        Ok(Self {
            source,
            flags,
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// True when the value is in error.
    pub fn is_violated_by(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl fmt::Display for CustomRegex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

fn is_flag_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| "gimsxeU".contains(c))
}

fn split_delimited(attribute: &str) -> (String, String) {
    let segments: Vec<&str> = attribute.split('/').collect();
    let Some((last, body)) = segments.split_last() else {
        return (attribute.to_string(), String::new());
    };
    if body.is_empty() {
        return (attribute.to_string(), String::new());
    }

    let mut parts: Vec<&str> = body.iter().copied().filter(|s| !s.is_empty()).collect();
    if is_flag_segment(last) {
        return (parts.join("/"), last.to_string());
    }
    if !last.is_empty() {
        parts.push(last);
    }
    (parts.join("/"), String::new())
}

/// One parsed rule unit.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleToken {
    /// A named rule, stored in uppercase canonical form.
    Predefined(String),
    Comparison(Comparison),
    CustomRegex(CustomRegex),
}

impl RuleToken {
    pub fn predefined(name: &str) -> Self {
        RuleToken::Predefined(name.to_ascii_uppercase())
    }

    pub fn comparison(subject: Subject, operator: Operator, operand: Operand) -> Self {
        RuleToken::Comparison(Comparison {
            subject,
            operator,
            operand,
        })
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            RuleToken::Predefined(_) => RuleKind::Predefined,
            RuleToken::Comparison(_) => RuleKind::Comparison,
            RuleToken::CustomRegex(_) => RuleKind::CustomRegex,
        }
    }

    /// The predefined rule name, if this is a predefined token.
    pub fn name(&self) -> Option<&str> {
        match self {
            RuleToken::Predefined(name) => Some(name),
            _ => None,
        }
    }

    /// True for the `OPTIONAL` sentinel.
    pub fn is_optional(&self) -> bool {
        self.name() == Some("OPTIONAL")
    }
}

impl fmt::Display for RuleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleToken::Predefined(name) => f.write_str(name),
            RuleToken::Comparison(comparison) => comparison.fmt(f),
            RuleToken::CustomRegex(regex) => regex.fmt(f),
        }
    }
}
