//! SQLite-backed resolver.
//!
//! # Responsibility
//! - Map a locator's base segment to a table and run insert/update/query.
//! - Report generated row ids as locators.
//!
//! # Invariants
//! - Table and column names are checked against a strict identifier pattern
//!   before they are placed in SQL text; values are always bound.
//! - Updates never rewrite `_id`; the row is addressed by the locator.

use crate::model::record::ID_COLUMN;
use crate::store::cursor::MemoryCursor;
use crate::store::locator::{Locator, CONTENT_AUTHORITY};
use crate::store::resolver::{Resolver, ResolverError, ResolverResult};
use crate::store::write_set::WriteSet;
use log::{debug, error};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::time::Instant;

static SQL_IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Resolver executing against one SQLite connection.
pub struct SqliteResolver<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteResolver<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn table_for<'l>(&self, locator: &'l Locator) -> ResolverResult<&'l str> {
        if locator.authority() != CONTENT_AUTHORITY {
            return Err(ResolverError::ForeignAuthority(
                locator.authority().to_string(),
            ));
        }
        let table = locator
            .base()
            .ok_or_else(|| unsupported("address", locator))?;
        checked_identifier(table)
    }
}

impl Resolver for SqliteResolver<'_> {
    type Cursor = MemoryCursor;

    fn query(&self, locator: &Locator) -> ResolverResult<MemoryCursor> {
        let table = self.table_for(locator)?;
        let cursor = match locator.segments().len() {
            1 => MemoryCursor::from_query(
                self.conn,
                &format!("SELECT * FROM {table} ORDER BY {ID_COLUMN} ASC;"),
                [],
            )?,
            2 => {
                let id = locator
                    .trailing_id()
                    .ok_or_else(|| unsupported("query", locator))?;
                MemoryCursor::from_query(
                    self.conn,
                    &format!("SELECT * FROM {table} WHERE {ID_COLUMN} = ?1;"),
                    [id],
                )?
            }
            _ => return Err(unsupported("query", locator)),
        };

        Ok(cursor)
    }

    fn insert(&self, locator: &Locator, values: &WriteSet) -> ResolverResult<Locator> {
        let started_at = Instant::now();
        let table = self.table_for(locator)?;
        if locator.segments().len() != 1 {
            return Err(unsupported("insert", locator));
        }

        let mut columns = Vec::with_capacity(values.len());
        let mut binds = Vec::with_capacity(values.len());
        for (column, value) in values.iter() {
            columns.push(checked_identifier(column)?);
            binds.push(Value::Text(value.to_string()));
        }

        let sql = if columns.is_empty() {
            format!("INSERT INTO {table} DEFAULT VALUES;")
        } else {
            let placeholders = (1..=columns.len())
                .map(|index| format!("?{index}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "INSERT INTO {table} ({}) VALUES ({placeholders});",
                columns.join(", ")
            )
        };

        if let Err(err) = self.conn.execute(&sql, params_from_iter(binds)) {
            error!(
                "event=resolver_insert module=store status=error table={} duration_ms={} error={}",
                table,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }

        let id = self.conn.last_insert_rowid();
        debug!(
            "event=resolver_insert module=store status=ok table={} id={} duration_ms={}",
            table,
            id,
            started_at.elapsed().as_millis()
        );
        Ok(Locator::collection(table).with_appended_id(id))
    }

    fn update(&self, locator: &Locator, values: &WriteSet) -> ResolverResult<bool> {
        let started_at = Instant::now();
        let table = self.table_for(locator)?;
        let id = match (locator.segments().len(), locator.trailing_id()) {
            (2, Some(id)) => id,
            _ => return Err(unsupported("update", locator)),
        };

        let mut assignments = Vec::with_capacity(values.len());
        let mut binds = Vec::with_capacity(values.len() + 1);
        for (column, value) in values.iter().filter(|(column, _)| *column != ID_COLUMN) {
            let column = checked_identifier(column)?;
            binds.push(Value::Text(value.to_string()));
            assignments.push(format!("{column} = ?{}", binds.len()));
        }
        if assignments.is_empty() {
            assignments.push(format!("{ID_COLUMN} = {ID_COLUMN}"));
        }
        binds.push(Value::Integer(id));

        let sql = format!(
            "UPDATE {table} SET {} WHERE {ID_COLUMN} = ?{};",
            assignments.join(", "),
            binds.len()
        );

        let changed = match self.conn.execute(&sql, params_from_iter(binds)) {
            Ok(changed) => changed,
            Err(err) => {
                error!(
                    "event=resolver_update module=store status=error table={} id={} duration_ms={} error={}",
                    table,
                    id,
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        debug!(
            "event=resolver_update module=store status=ok table={} id={} changed={} duration_ms={}",
            table,
            id,
            changed,
            started_at.elapsed().as_millis()
        );
        Ok(changed > 0)
    }
}

fn checked_identifier(name: &str) -> ResolverResult<&str> {
    if SQL_IDENTIFIER_RE.is_match(name) {
        Ok(name)
    } else {
        Err(ResolverError::InvalidIdentifier(name.to_string()))
    }
}

fn unsupported(operation: &'static str, locator: &Locator) -> ResolverError {
    ResolverError::UnsupportedLocator {
        operation,
        locator: locator.to_string(),
    }
}
