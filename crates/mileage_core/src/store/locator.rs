//! Hierarchical locators addressing record collections and single rows.
//!
//! # Responsibility
//! - Build `content://<authority>/<base>[/<id>]` addresses on demand.
//! - Parse resolver-returned locators and extract trailing identities.
//!
//! # Invariants
//! - Locators are pure values; nothing caches them per record instance.
//! - An identity segment is appended only for persisted (`id > 0`) records.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Authority every record locator is rooted at.
pub const CONTENT_AUTHORITY: &str = "com.evancharlton.mileage";

const SCHEME_PREFIX: &str = "content://";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    authority: String,
    segments: Vec<String>,
}

impl Locator {
    /// Collection locator for a record base path.
    pub fn collection(base: &str) -> Self {
        Self {
            authority: CONTENT_AUTHORITY.to_string(),
            segments: split_segments(base),
        }
    }

    /// Locator for a record with the given identity.
    ///
    /// Transient identities (`<= 0`) address the collection.
    pub fn for_record(base: &str, id: i64) -> Self {
        let locator = Self::collection(base);
        if id > 0 {
            locator.with_appended_id(id)
        } else {
            locator
        }
    }

    pub fn with_appended_id(mut self, id: i64) -> Self {
        self.segments.push(id.to_string());
        self
    }

    /// Parses a `content://` locator string.
    pub fn parse(value: &str) -> Result<Self, LocatorError> {
        let rest = value
            .trim()
            .strip_prefix(SCHEME_PREFIX)
            .ok_or_else(|| LocatorError::UnsupportedScheme(value.to_string()))?;
        let (authority, path) = rest.split_once('/').unwrap_or((rest, ""));
        if authority.is_empty() {
            return Err(LocatorError::MissingAuthority(value.to_string()));
        }

        Ok(Self {
            authority: authority.to_string(),
            segments: split_segments(path),
        })
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// First path segment, naming the record collection.
    pub fn base(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Identity encoded in the trailing segment, if it parses as an integer.
    pub fn trailing_id(&self) -> Option<i64> {
        if self.segments.len() < 2 {
            return None;
        }
        self.last_segment()?.parse().ok()
    }
}

impl Display for Locator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{SCHEME_PREFIX}{}", self.authority)?;
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatorError {
    UnsupportedScheme(String),
    MissingAuthority(String),
}

impl Display for LocatorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedScheme(value) => write!(f, "unsupported locator scheme: {value}"),
            Self::MissingAuthority(value) => write!(f, "locator has no authority: {value}"),
        }
    }
}

impl Error for LocatorError {}

fn split_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
