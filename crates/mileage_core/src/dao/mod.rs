//! Generic data-access layer over `Record` types.
//!
//! # Responsibility
//! - Map rows into records and records into write-sets (`mapper`).
//! - Validate and persist records through a resolver (`engine`).
//!
//! # Invariants
//! - Validation failures surface as one typed `ValidationError`.
//! - Storage failures are returned unchanged; nothing here retries.

pub mod engine;
pub mod mapper;
