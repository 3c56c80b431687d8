//! Typed field values moved between rows, records and write-sets.
//!
//! # Responsibility
//! - Name the semantic column types understood by the mapper.
//! - Carry one typed value per mapped field without reflection.
//!
//! # Invariants
//! - `FieldValue::semantic_type()` always matches the variant.
//! - Timestamps are epoch milliseconds.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Semantic type of a mapped column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Text,
    Integer,
    Long,
    Double,
    Boolean,
    Timestamp,
}

impl SemanticType {
    /// Whether numeric rules (positive/past) may apply to this type.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Integer | Self::Long | Self::Double | Self::Timestamp
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::Timestamp => "timestamp",
        }
    }
}

impl Display for SemanticType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One typed value of a mapped field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Integer(i32),
    Long(i64),
    Double(f64),
    Boolean(bool),
    /// Unix epoch milliseconds.
    Timestamp(i64),
}

impl FieldValue {
    pub fn semantic_type(&self) -> SemanticType {
        match self {
            Self::Text(_) => SemanticType::Text,
            Self::Integer(_) => SemanticType::Integer,
            Self::Long(_) => SemanticType::Long,
            Self::Double(_) => SemanticType::Double,
            Self::Boolean(_) => SemanticType::Boolean,
            Self::Timestamp(_) => SemanticType::Timestamp,
        }
    }

    /// Zero value of a semantic type, used when no default is declared.
    ///
    /// Timestamps have no meaningful zero; callers substitute "now" instead.
    pub fn zero(kind: SemanticType) -> Self {
        match kind {
            SemanticType::Text => Self::Text(String::new()),
            SemanticType::Integer => Self::Integer(0),
            SemanticType::Long => Self::Long(0),
            SemanticType::Double => Self::Double(0.0),
            SemanticType::Boolean => Self::Boolean(false),
            SemanticType::Timestamp => Self::Timestamp(0),
        }
    }

    /// Returns `Some(true)` when the value is strictly greater than its
    /// type's zero, `None` for non-numeric values.
    pub fn is_positive(&self) -> Option<bool> {
        match self {
            Self::Integer(value) => Some(*value > 0),
            Self::Long(value) | Self::Timestamp(value) => Some(*value > 0),
            Self::Double(value) => Some(*value > 0.0),
            Self::Text(_) | Self::Boolean(_) => None,
        }
    }

    /// Epoch-millisecond view used by the past-timestamp rule.
    pub fn as_epoch_ms(&self) -> Option<i64> {
        match self {
            Self::Long(value) | Self::Timestamp(value) => Some(*value),
            _ => None,
        }
    }

    /// String form stored in a write-set.
    ///
    /// Booleans are written as `1`/`0` because the row side reads them back
    /// as integers.
    pub fn to_write_string(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Integer(value) => value.to_string(),
            Self::Long(value) | Self::Timestamp(value) => value.to_string(),
            Self::Double(value) => value.to_string(),
            Self::Boolean(value) => String::from(if *value { "1" } else { "0" }),
        }
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
