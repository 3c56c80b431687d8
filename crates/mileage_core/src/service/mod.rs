//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate engine and resolver calls into use-case level APIs.
//! - Keep UI layers decoupled from storage details.

pub mod record_service;
