//! Validation and persistence engine.
//!
//! # Responsibility
//! - Enforce declared field rules in declaration order.
//! - Build the write-set and commit it through a resolver as insert or update.
//!
//! # Invariants
//! - The first violated rule aborts validation; exactly one error is reported.
//! - `id > 0` alone selects update vs insert; overridable `Record` helpers
//!   are not consulted.
//! - A failed write leaves the record identity untouched.

use crate::dao::mapper::{serialize, MapError};
use crate::model::descriptor::{FieldDescriptor, MessageId, ValidationRule};
use crate::model::record::{Record, ID_COLUMN};
use crate::model::registry::MetadataError;
use crate::model::value::{now_epoch_ms, FieldValue};
use crate::store::locator::Locator;
use crate::store::resolver::{Resolver, ResolverError};
use crate::store::write_set::WriteSet;
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type DaoResult<T> = Result<T, DaoError>;

/// A single violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub column: &'static str,
    /// `None` for checks raised by a record's `pre_validate` hook.
    pub rule: Option<ValidationRule>,
    pub message: MessageId,
}

impl ValidationError {
    pub fn rule(column: &'static str, rule: ValidationRule, message: MessageId) -> Self {
        Self {
            column,
            rule: Some(rule),
            message,
        }
    }

    /// Cross-field violation reported from `Record::pre_validate`.
    pub fn custom(column: &'static str, message: MessageId) -> Self {
        Self {
            column,
            rule: None,
            message,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.rule {
            Some(rule) => write!(
                f,
                "field `{}` violates {} ({})",
                self.column, rule, self.message
            ),
            None => write!(f, "field `{}` is invalid ({})", self.column, self.message),
        }
    }
}

impl Error for ValidationError {}

/// Error returned by load/save entry points.
#[derive(Debug)]
pub enum DaoError {
    Validation(ValidationError),
    Map(MapError),
    Resolver(ResolverError),
    /// Insert succeeded but the returned locator carries no usable identity.
    InvalidInsertLocator(String),
}

impl Display for DaoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Map(err) => write!(f, "{err}"),
            Self::Resolver(err) => write!(f, "{err}"),
            Self::InvalidInsertLocator(locator) => {
                write!(f, "insert returned locator without identity: {locator}")
            }
        }
    }
}

impl Error for DaoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Map(err) => Some(err),
            Self::Resolver(err) => Some(err),
            Self::InvalidInsertLocator(_) => None,
        }
    }
}

impl From<ValidationError> for DaoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<MapError> for DaoError {
    fn from(value: MapError) -> Self {
        Self::Map(value)
    }
}

impl From<ResolverError> for DaoError {
    fn from(value: ResolverError) -> Self {
        Self::Resolver(value)
    }
}

/// Validates `record` and returns its serialized write-set.
///
/// Runs `Record::pre_validate` first, then every descriptor in declaration
/// order. Absent values without `RequiredNonNull` are left out of the
/// write-set.
///
/// # Panics
/// Panics when a getter returns a value of another semantic type than its
/// descriptor declares. Rules cannot be evaluated against such a value, so
/// this is treated like any other malformed field table.
pub fn validate<R: Record>(record: &R) -> Result<WriteSet, ValidationError> {
    record.pre_validate()?;

    let now = now_epoch_ms();
    let mut values = WriteSet::new();
    for field in R::registry().fields() {
        let value = (field.get)(record);
        if let Some(value) = &value {
            ensure_declared_type::<R>(field, value);
        }
        check_field(field, value.as_ref(), now)?;
        if let Some(value) = value {
            serialize(field, &value, &mut values);
        }
    }

    Ok(values)
}

/// Validates and persists `record` through `resolver`.
///
/// Persisted records are updated at their own locator and the resolver's
/// "row changed" signal is returned. Transient records are inserted at the
/// collection locator, take the identity from the returned locator, and
/// `true` is returned.
///
/// # Errors
/// - `DaoError::Validation` when a rule is violated; nothing is written.
/// - `DaoError::Resolver` when the write fails; identity is unchanged.
/// - `DaoError::InvalidInsertLocator` when the insert locator has no id.
pub fn save<R, V>(record: &mut R, resolver: &V) -> DaoResult<bool>
where
    R: Record,
    V: Resolver + ?Sized,
{
    let started_at = Instant::now();
    let mut values = match validate(record) {
        Ok(values) => values,
        Err(err) => {
            debug!(
                "event=record_save module=dao status=rejected record={} column={} message={}",
                R::PATH,
                err.column,
                err.message
            );
            return Err(err.into());
        }
    };

    let id = record.id();
    if id > 0 {
        values.put(ID_COLUMN, id.to_string());
        let locator = Locator::for_record(R::PATH, id);
        let changed = resolver
            .update(&locator, &values)
            .map_err(|err| log_write_failure::<R>("update", err, started_at))?;
        info!(
            "event=record_save module=dao status=ok op=update record={} id={} changed={} duration_ms={}",
            R::PATH,
            id,
            changed,
            started_at.elapsed().as_millis()
        );
        return Ok(changed);
    }

    let created = resolver
        .insert(&Locator::collection(R::PATH), &values)
        .map_err(|err| log_write_failure::<R>("insert", err, started_at))?;
    let id = created
        .trailing_id()
        .filter(|id| *id > 0)
        .ok_or_else(|| DaoError::InvalidInsertLocator(created.to_string()))?;
    record.set_id(id);
    info!(
        "event=record_save module=dao status=ok op=insert record={} id={} duration_ms={}",
        R::PATH,
        id,
        started_at.elapsed().as_millis()
    );

    Ok(true)
}

fn ensure_declared_type<R: Record>(field: &FieldDescriptor<R>, value: &FieldValue) {
    let actual = value.semantic_type();
    if actual == field.kind {
        return;
    }
    let err = MetadataError::GetterTypeMismatch {
        column: field.column,
        expected: field.kind,
        actual,
    };
    error!(
        "event=record_validate module=dao status=error record={} error={}",
        R::PATH,
        err
    );
    panic!("invalid field metadata for record `{}`: {err}", R::PATH);
}

fn check_field<R>(
    field: &FieldDescriptor<R>,
    value: Option<&FieldValue>,
    now: i64,
) -> Result<(), ValidationError> {
    let Some(message) = field.message else {
        return Ok(());
    };
    let reject = |rule: ValidationRule| -> Result<(), ValidationError> {
        Err(ValidationError::rule(field.column, rule, message))
    };

    let Some(value) = value else {
        if field.has_rule(ValidationRule::RequiredNonNull) {
            return reject(ValidationRule::RequiredNonNull);
        }
        return Ok(());
    };

    if field.has_rule(ValidationRule::RequiredNonEmpty) {
        if let FieldValue::Text(text) = value {
            if text.is_empty() {
                return reject(ValidationRule::RequiredNonEmpty);
            }
        }
    }

    if field.has_rule(ValidationRule::PositiveNumber) && value.is_positive() == Some(false) {
        return reject(ValidationRule::PositiveNumber);
    }

    if field.has_rule(ValidationRule::PastTimestamp) {
        if let Some(epoch_ms) = value.as_epoch_ms() {
            if epoch_ms >= now {
                return reject(ValidationRule::PastTimestamp);
            }
        }
    }

    Ok(())
}

fn log_write_failure<R: Record>(
    operation: &'static str,
    err: ResolverError,
    started_at: Instant,
) -> ResolverError {
    error!(
        "event=record_save module=dao status=error op={} record={} duration_ms={} error={}",
        operation,
        R::PATH,
        started_at.elapsed().as_millis(),
        err
    );
    err
}
