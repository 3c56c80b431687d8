//! Declarative field descriptors for mapped record fields.
//!
//! # Responsibility
//! - Describe one mapped column: name, semantic type, default and rules.
//! - Provide typed accessor/mutator hooks instead of runtime reflection.
//!
//! # Invariants
//! - Descriptors are `'static` data built once per record type.
//! - Mutators report failures as values; callers decide to skip the field.

use super::value::{FieldValue, SemanticType};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Reads the current value of a field. `None` means the value is absent.
pub type FieldGetter<R> = fn(&R) -> Option<FieldValue>;

/// Writes a typed value into a field.
pub type FieldSetter<R> = fn(&mut R, FieldValue) -> Result<(), FieldAccessError>;

/// Declarative constraint attached to a mapped field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationRule {
    /// Value must be present.
    RequiredNonNull,
    /// Text value must not be empty.
    RequiredNonEmpty,
    /// Numeric value must be strictly greater than zero.
    PositiveNumber,
    /// Epoch-millisecond value must be earlier than now.
    PastTimestamp,
}

impl ValidationRule {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RequiredNonNull => "required_non_null",
            Self::RequiredNonEmpty => "required_non_empty",
            Self::PositiveNumber => "positive_number",
            Self::PastTimestamp => "past_timestamp",
        }
    }

    /// Whether this rule can be evaluated against the given semantic type.
    pub fn applies_to(self, kind: SemanticType) -> bool {
        match self {
            Self::RequiredNonNull => true,
            Self::RequiredNonEmpty => kind == SemanticType::Text,
            Self::PositiveNumber => kind.is_numeric(),
            Self::PastTimestamp => matches!(kind, SemanticType::Timestamp | SemanticType::Long),
        }
    }
}

impl Display for ValidationRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstract identifier of a user-facing message.
///
/// Rendering the message is left to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MessageId(pub &'static str);

impl MessageId {
    pub fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for MessageId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Failure while writing a value into a record field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldAccessError {
    TypeMismatch {
        column: &'static str,
        expected: SemanticType,
        actual: SemanticType,
    },
    Rejected {
        column: &'static str,
        reason: String,
    },
}

impl FieldAccessError {
    /// Builds the mismatch error a mutator returns for a value of the wrong type.
    pub fn mismatch(column: &'static str, expected: SemanticType, actual: &FieldValue) -> Self {
        Self::TypeMismatch {
            column,
            expected,
            actual: actual.semantic_type(),
        }
    }
}

impl Display for FieldAccessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TypeMismatch {
                column,
                expected,
                actual,
            } => write!(f, "field `{column}` expects {expected}, got {actual}"),
            Self::Rejected { column, reason } => {
                write!(f, "field `{column}` rejected value: {reason}")
            }
        }
    }
}

impl Error for FieldAccessError {}

/// Static description of one mapped field of record type `R`.
pub struct FieldDescriptor<R> {
    pub column: &'static str,
    pub kind: SemanticType,
    /// Used for absent numeric cells. Ignored for text, timestamp and boolean.
    pub default: Option<FieldValue>,
    pub rules: &'static [ValidationRule],
    /// Reported when any rule of this field is violated.
    pub message: Option<MessageId>,
    pub get: FieldGetter<R>,
    pub set: FieldSetter<R>,
}

impl<R> FieldDescriptor<R> {
    /// Creates a descriptor with no default, rules or message.
    pub fn new(
        column: &'static str,
        kind: SemanticType,
        get: FieldGetter<R>,
        set: FieldSetter<R>,
    ) -> Self {
        Self {
            column,
            kind,
            default: None,
            rules: &[],
            message: None,
            get,
            set,
        }
    }

    pub fn with_default(mut self, value: FieldValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Attaches rules and the message reported when one is violated.
    pub fn validated(mut self, message: MessageId, rules: &'static [ValidationRule]) -> Self {
        self.message = Some(message);
        self.rules = rules;
        self
    }

    pub fn has_rule(&self, rule: ValidationRule) -> bool {
        self.rules.contains(&rule)
    }
}

impl<R> Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("column", &self.column)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("rules", &self.rules)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}
