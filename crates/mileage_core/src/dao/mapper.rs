//! Generic row/record/write-set mapping driven by field descriptors.
//!
//! # Responsibility
//! - Populate records from cursor rows and from known write-set values.
//! - Serialize validated field values into a write-set.
//!
//! # Invariants
//! - A field that cannot be read or written is logged and skipped; the rest
//!   of the record still loads.
//! - Absent text cells load as `""`, absent timestamps as the current time,
//!   absent numeric cells as the declared default or zero.
//! - Boolean cells are always read as integers (nonzero is true). An absent
//!   boolean reads as `0`, so its declared default is never consulted.

use crate::model::descriptor::FieldDescriptor;
use crate::model::record::{Record, ID_COLUMN};
use crate::model::value::{now_epoch_ms, FieldValue, SemanticType};
use crate::store::cursor::{CellError, CellResult, RowCursor};
use crate::store::write_set::WriteSet;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type MapResult<T> = Result<T, MapError>;

/// Failure that prevents a record from loading at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    NoCurrentRow,
    MissingIdentity,
    InvalidIdentity(CellError),
}

impl Display for MapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCurrentRow => write!(f, "row source has no row to load"),
            Self::MissingIdentity => write!(f, "row has no `{ID_COLUMN}` value"),
            Self::InvalidIdentity(err) => write!(f, "row identity is unreadable: {err}"),
        }
    }
}

impl Error for MapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidIdentity(err) => Some(err),
            Self::NoCurrentRow | Self::MissingIdentity => None,
        }
    }
}

/// Columns that were skipped during a load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub skipped: Vec<&'static str>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Loads the current row of `cursor` into `record`.
///
/// Moves to the first row when the cursor is not on a valid row.
///
/// # Errors
/// - `MapError::NoCurrentRow` when the cursor is empty.
/// - `MapError::MissingIdentity` / `InvalidIdentity` when `_id` is unusable.
pub fn load<R, C>(record: &mut R, cursor: &mut C) -> MapResult<LoadReport>
where
    R: Record,
    C: RowCursor + ?Sized,
{
    if !cursor.has_current_row() && !cursor.move_to_first() {
        return Err(MapError::NoCurrentRow);
    }

    let id_index = cursor
        .column_index(ID_COLUMN)
        .ok_or(MapError::MissingIdentity)?;
    let id = cursor
        .get_i64(id_index)
        .map_err(MapError::InvalidIdentity)?
        .ok_or(MapError::MissingIdentity)?;
    record.set_id(id);

    let mut report = LoadReport::default();
    for field in R::registry().fields() {
        let value = match read_field(field, &*cursor) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=field_load module=mapper status=skipped record={} column={} error={}",
                    R::PATH,
                    field.column,
                    err
                );
                report.skipped.push(field.column);
                continue;
            }
        };

        if let Err(err) = (field.set)(record, value) {
            warn!(
                "event=field_load module=mapper status=skipped record={} column={} error={}",
                R::PATH,
                field.column,
                err
            );
            report.skipped.push(field.column);
        }
    }

    Ok(report)
}

/// Builds a persisted record from the current (or first) row of `cursor`.
pub fn from_row<R, C>(cursor: &mut C) -> MapResult<R>
where
    R: Record,
    C: RowCursor + ?Sized,
{
    let mut record = R::default();
    load(&mut record, cursor)?;
    Ok(record)
}

/// Builds a record from already-known column values.
///
/// `_id` is taken when present; otherwise the record stays transient. Mapped
/// columns present in `values` pre-seed their fields, the rest keep the
/// type's `Default`.
pub fn from_values<R: Record>(values: &WriteSet) -> R {
    let mut record = R::default();
    if let Some(id) = values.get_as_i64(ID_COLUMN) {
        record.set_id(id);
    }

    for field in R::registry().fields() {
        if !values.contains(field.column) {
            continue;
        }
        let Some(value) = parse_write_value(field.kind, values, field.column) else {
            warn!(
                "event=field_seed module=mapper status=skipped record={} column={} error=unparseable_{}",
                R::PATH,
                field.column,
                field.kind
            );
            continue;
        };
        if let Err(err) = (field.set)(&mut record, value) {
            warn!(
                "event=field_seed module=mapper status=skipped record={} column={} error={}",
                R::PATH,
                field.column,
                err
            );
        }
    }

    record
}

/// Writes one validated field value into `values` under its column name.
pub fn serialize<R>(field: &FieldDescriptor<R>, value: &FieldValue, values: &mut WriteSet) {
    values.put(field.column, value.to_write_string());
}

fn read_field<R, C>(field: &FieldDescriptor<R>, cursor: &C) -> CellResult<FieldValue>
where
    C: RowCursor + ?Sized,
{
    let index = cursor.column_index(field.column);
    let value = match field.kind {
        SemanticType::Boolean => {
            let raw = read_cell(cursor, index, |c, i| c.get_i32(i))?.unwrap_or(0);
            FieldValue::Boolean(raw != 0)
        }
        SemanticType::Text => FieldValue::Text(
            read_cell(cursor, index, |c, i| c.get_string(i))?.unwrap_or_default(),
        ),
        SemanticType::Timestamp => FieldValue::Timestamp(
            read_cell(cursor, index, |c, i| c.get_i64(i))?.unwrap_or_else(now_epoch_ms),
        ),
        SemanticType::Integer => match read_cell(cursor, index, |c, i| c.get_i32(i))? {
            Some(value) => FieldValue::Integer(value),
            None => numeric_default(field),
        },
        SemanticType::Long => match read_cell(cursor, index, |c, i| c.get_i64(i))? {
            Some(value) => FieldValue::Long(value),
            None => numeric_default(field),
        },
        SemanticType::Double => match read_cell(cursor, index, |c, i| c.get_f64(i))? {
            Some(value) => FieldValue::Double(value),
            None => numeric_default(field),
        },
    };

    Ok(value)
}

fn read_cell<C, T>(
    cursor: &C,
    index: Option<usize>,
    read: impl FnOnce(&C, usize) -> CellResult<Option<T>>,
) -> CellResult<Option<T>>
where
    C: RowCursor + ?Sized,
{
    match index {
        Some(index) => read(cursor, index),
        None => Ok(None),
    }
}

fn numeric_default<R>(field: &FieldDescriptor<R>) -> FieldValue {
    field
        .default
        .clone()
        .unwrap_or_else(|| FieldValue::zero(field.kind))
}

fn parse_write_value(kind: SemanticType, values: &WriteSet, column: &str) -> Option<FieldValue> {
    let value = match kind {
        SemanticType::Text => FieldValue::Text(values.get_as_string(column)?),
        SemanticType::Integer => FieldValue::Integer(values.get_as_i32(column)?),
        SemanticType::Long => FieldValue::Long(values.get_as_i64(column)?),
        SemanticType::Double => FieldValue::Double(values.get_as_f64(column)?),
        SemanticType::Boolean => FieldValue::Boolean(values.get_as_bool(column)?),
        SemanticType::Timestamp => FieldValue::Timestamp(values.get_as_i64(column)?),
    };
    Some(value)
}
