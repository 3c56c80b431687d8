//! Per-type field registry built once and frozen.
//!
//! # Responsibility
//! - Check a record type's descriptor table when it is first registered.
//! - Cache the checked table for the process lifetime.
//!
//! # Invariants
//! - Declaration order is preserved; validation and mapping walk it in order.
//! - A registry is never mutated after it is built.
//! - Malformed tables fail at registration time, never per instance.

use super::descriptor::FieldDescriptor;
use super::value::SemanticType;
use crate::model::record::ID_COLUMN;
use log::error;
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Programming error in a record type's descriptor table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    EmptyColumnName {
        position: usize,
    },
    ReservedColumn(&'static str),
    DuplicateColumn(&'static str),
    DefaultTypeMismatch {
        column: &'static str,
        expected: SemanticType,
        actual: SemanticType,
    },
    RuleNotApplicable {
        column: &'static str,
        rule: &'static str,
        kind: SemanticType,
    },
    MissingMessage(&'static str),
    /// A getter produced a value whose type differs from the declared one.
    GetterTypeMismatch {
        column: &'static str,
        expected: SemanticType,
        actual: SemanticType,
    },
}

impl Display for MetadataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyColumnName { position } => {
                write!(f, "field at position {position} has an empty column name")
            }
            Self::ReservedColumn(column) => {
                write!(f, "column `{column}` is reserved for record identity")
            }
            Self::DuplicateColumn(column) => write!(f, "column `{column}` is declared twice"),
            Self::DefaultTypeMismatch {
                column,
                expected,
                actual,
            } => write!(
                f,
                "default for column `{column}` is {actual}, expected {expected}"
            ),
            Self::RuleNotApplicable { column, rule, kind } => write!(
                f,
                "rule `{rule}` cannot apply to {kind} column `{column}`"
            ),
            Self::MissingMessage(column) => {
                write!(f, "column `{column}` declares rules without a message id")
            }
            Self::GetterTypeMismatch {
                column,
                expected,
                actual,
            } => write!(
                f,
                "getter for {expected} column `{column}` returned a {actual} value"
            ),
        }
    }
}

impl Error for MetadataError {}

/// Checked, ordered descriptor table for record type `R`.
#[derive(Debug)]
pub struct FieldRegistry<R> {
    fields: Vec<FieldDescriptor<R>>,
}

impl<R> FieldRegistry<R> {
    /// Checks a descriptor table and freezes it into a registry.
    ///
    /// # Errors
    /// - Returns `MetadataError` for empty, reserved or duplicate columns.
    /// - Returns `MetadataError` when a default or rule does not fit the
    ///   field's semantic type, or rules lack a message id.
    pub fn build(fields: Vec<FieldDescriptor<R>>) -> Result<Self, MetadataError> {
        let mut seen = HashSet::with_capacity(fields.len());
        for (position, field) in fields.iter().enumerate() {
            if field.column.trim().is_empty() {
                return Err(MetadataError::EmptyColumnName { position });
            }
            if field.column == ID_COLUMN {
                return Err(MetadataError::ReservedColumn(field.column));
            }
            if !seen.insert(field.column) {
                return Err(MetadataError::DuplicateColumn(field.column));
            }
            if let Some(default) = &field.default {
                if default.semantic_type() != field.kind {
                    return Err(MetadataError::DefaultTypeMismatch {
                        column: field.column,
                        expected: field.kind,
                        actual: default.semantic_type(),
                    });
                }
            }
            if let Some(rule) = field.rules.iter().find(|rule| !rule.applies_to(field.kind)) {
                return Err(MetadataError::RuleNotApplicable {
                    column: field.column,
                    rule: rule.as_str(),
                    kind: field.kind,
                });
            }
            if !field.rules.is_empty() && field.message.is_none() {
                return Err(MetadataError::MissingMessage(field.column));
            }
        }

        Ok(Self { fields })
    }

    /// Descriptors in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor<R>] {
        &self.fields
    }

    pub fn get(&self, column: &str) -> Option<&FieldDescriptor<R>> {
        self.fields.iter().find(|field| field.column == column)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.column)
    }
}

/// Process-wide cache slot for one record type's registry.
///
/// Declared as a `static` next to the record type.
pub struct RegistryCell<R> {
    cell: OnceCell<FieldRegistry<R>>,
}

impl<R> RegistryCell<R> {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Returns the cached registry, building it on first use.
    ///
    /// # Panics
    /// Panics when the descriptor table is malformed. This is a defect in
    /// the record type declaration and surfaces the first time the type is
    /// used.
    pub fn get_or_build(
        &self,
        record: &'static str,
        declare: impl FnOnce() -> Vec<FieldDescriptor<R>>,
    ) -> &FieldRegistry<R> {
        self.cell.get_or_init(|| match FieldRegistry::build(declare()) {
            Ok(registry) => registry,
            Err(err) => {
                error!(
                    "event=registry_build module=model status=error record={} error={}",
                    record, err
                );
                panic!("invalid field metadata for record `{record}`: {err}");
            }
        })
    }

    pub fn is_built(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<R> Default for RegistryCell<R> {
    fn default() -> Self {
        Self::new()
    }
}
