//! Persistence resolver contract.
//!
//! # Responsibility
//! - Define the insert/update/query boundary the engine writes through.
//! - Carry storage failures back to callers unchanged.
//!
//! # Invariants
//! - `insert` returns a locator whose trailing segment is the new identity.
//! - No filter beyond the locator itself is supported.

use crate::db::DbError;
use crate::store::cursor::RowCursor;
use crate::store::locator::Locator;
use crate::store::write_set::WriteSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ResolverResult<T> = Result<T, ResolverError>;

/// Storage-side failure raised by a resolver.
#[derive(Debug)]
pub enum ResolverError {
    Db(DbError),
    ForeignAuthority(String),
    InvalidIdentifier(String),
    /// Locator shape does not fit the requested operation.
    UnsupportedLocator {
        operation: &'static str,
        locator: String,
    },
}

impl Display for ResolverError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::ForeignAuthority(authority) => {
                write!(f, "locator authority `{authority}` is not served here")
            }
            Self::InvalidIdentifier(name) => write!(f, "invalid table or column name `{name}`"),
            Self::UnsupportedLocator { operation, locator } => {
                write!(f, "cannot {operation} at locator {locator}")
            }
        }
    }
}

impl Error for ResolverError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::ForeignAuthority(_) => None,
            Self::InvalidIdentifier(_) => None,
            Self::UnsupportedLocator { .. } => None,
        }
    }
}

impl From<DbError> for ResolverError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for ResolverError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Executes writes and reads against locator-addressed storage.
pub trait Resolver {
    type Cursor: RowCursor;

    /// Reads the rows addressed by a collection or single-record locator.
    fn query(&self, locator: &Locator) -> ResolverResult<Self::Cursor>;

    /// Inserts one row into the addressed collection and returns its locator.
    fn insert(&self, locator: &Locator, values: &WriteSet) -> ResolverResult<Locator>;

    /// Updates the addressed row. Returns whether a row was changed.
    fn update(&self, locator: &Locator, values: &WriteSet) -> ResolverResult<bool>;
}

impl<T: Resolver + ?Sized> Resolver for &T {
    type Cursor = T::Cursor;

    fn query(&self, locator: &Locator) -> ResolverResult<Self::Cursor> {
        (**self).query(locator)
    }

    fn insert(&self, locator: &Locator, values: &WriteSet) -> ResolverResult<Locator> {
        (**self).insert(locator, values)
    }

    fn update(&self, locator: &Locator, values: &WriteSet) -> ResolverResult<bool> {
        (**self).update(locator, values)
    }
}
