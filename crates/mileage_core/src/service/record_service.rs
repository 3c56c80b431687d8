//! Record use-case service.
//!
//! # Responsibility
//! - Provide save/find/list entry points for any `Record` type.
//! - Delegate persistence to a `Resolver` implementation.
//!
//! # Invariants
//! - Service APIs never bypass engine validation.
//! - Service layer remains storage-agnostic.

use crate::dao::engine::{self, DaoResult, ValidationError};
use crate::dao::mapper;
use crate::model::record::Record;
use crate::store::cursor::RowCursor;
use crate::store::locator::Locator;
use crate::store::resolver::Resolver;
use crate::store::write_set::WriteSet;

/// Use-case service wrapper for record persistence.
pub struct RecordService<V: Resolver> {
    resolver: V,
}

impl<V: Resolver> RecordService<V> {
    /// Creates a service using the provided resolver implementation.
    pub fn new(resolver: V) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &V {
        &self.resolver
    }

    /// Validates without writing and returns the write-set that would be sent.
    pub fn validate<R: Record>(&self, record: &R) -> Result<WriteSet, ValidationError> {
        engine::validate(record)
    }

    /// Inserts or updates `record`.
    ///
    /// Returns engine-level validation and resolver errors unchanged.
    pub fn save<R: Record>(&self, record: &mut R) -> DaoResult<bool> {
        engine::save(record, &self.resolver)
    }

    /// Loads one record by identity.
    ///
    /// Returns `Ok(None)` for transient identities and missing rows.
    pub fn find<R: Record>(&self, id: i64) -> DaoResult<Option<R>> {
        if id <= 0 {
            return Ok(None);
        }
        let mut cursor = self.resolver.query(&Locator::for_record(R::PATH, id))?;
        if cursor.count() == 0 {
            return Ok(None);
        }
        Ok(Some(mapper::from_row(&mut cursor)?))
    }

    /// Loads every record of type `R` in identity order.
    pub fn list<R: Record>(&self) -> DaoResult<Vec<R>> {
        let mut cursor = self.resolver.query(&Locator::collection(R::PATH))?;
        let mut records = Vec::with_capacity(cursor.count());
        if !cursor.move_to_first() {
            return Ok(records);
        }
        loop {
            records.push(mapper::from_row(&mut cursor)?);
            if !cursor.move_to_next() {
                break;
            }
        }
        Ok(records)
    }

    /// Re-reads a persisted record from storage in place.
    ///
    /// Returns `Ok(false)` when the record is transient or its row is gone.
    pub fn reload<R: Record>(&self, record: &mut R) -> DaoResult<bool> {
        let id = record.id();
        if id <= 0 {
            return Ok(false);
        }
        let mut cursor = self.resolver.query(&Locator::for_record(R::PATH, id))?;
        if cursor.count() == 0 {
            return Ok(false);
        }
        mapper::load(record, &mut cursor)?;
        Ok(true)
    }
}
