//! Storage collaborators: row cursors, write-sets, locators and resolvers.
//!
//! # Responsibility
//! - Define the contracts the mapper and engine consume.
//! - Ship SQLite-backed implementations of those contracts.
//!
//! # Invariants
//! - The core never closes a cursor it was handed.
//! - Resolver errors are surfaced unchanged; nothing here retries.

pub mod cursor;
pub mod locator;
pub mod resolver;
pub mod sqlite_resolver;
pub mod write_set;
