//! Record model: typed values, field descriptors and per-type registries.
//!
//! # Responsibility
//! - Describe mapped fields declaratively, once per record type.
//! - Define the `Record` contract consumed by the mapper and engine.
//!
//! # Invariants
//! - Every record is identified by an `i64` stored in `_id`.
//! - Field metadata is built once per type and never mutated afterwards.

pub mod descriptor;
pub mod record;
pub mod registry;
pub mod value;
