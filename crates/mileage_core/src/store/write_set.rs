//! Ordered column-to-string payload handed to a resolver.
//!
//! # Responsibility
//! - Collect serialized column values for one insert or update.
//! - Offer typed reads with defaults for pre-seeding transient records.
//!
//! # Invariants
//! - Columns keep first-insertion order; `put` on an existing key replaces
//!   the value in place.

/// Column-to-string mapping for one write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSet {
    entries: Vec<(String, String)>,
}

impl WriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces one column value.
    pub fn put(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn remove(&mut self, column: &str) -> Option<String> {
        let position = self.entries.iter().position(|(key, _)| key == column)?;
        Some(self.entries.remove(position).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn get_as_string(&self, column: &str) -> Option<String> {
        self.get(column).map(str::to_string)
    }

    pub fn get_as_i32(&self, column: &str) -> Option<i32> {
        self.get(column)?.trim().parse().ok()
    }

    pub fn get_as_i64(&self, column: &str) -> Option<i64> {
        self.get(column)?.trim().parse().ok()
    }

    pub fn get_as_f64(&self, column: &str) -> Option<f64> {
        self.get(column)?.trim().parse().ok()
    }

    /// Accepts `true`/`false` as well as the `1`/`0` form written by the mapper.
    pub fn get_as_bool(&self, column: &str) -> Option<bool> {
        match self.get(column)?.trim() {
            "1" => Some(true),
            "0" => Some(false),
            other if other.eq_ignore_ascii_case("true") => Some(true),
            other if other.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    pub fn get_as_string_or(&self, column: &str, default: &str) -> String {
        self.get_as_string(column)
            .unwrap_or_else(|| default.to_string())
    }

    pub fn get_as_i32_or(&self, column: &str, default: i32) -> i32 {
        self.get_as_i32(column).unwrap_or(default)
    }

    pub fn get_as_i64_or(&self, column: &str, default: i64) -> i64 {
        self.get_as_i64(column).unwrap_or(default)
    }

    pub fn get_as_f64_or(&self, column: &str, default: f64) -> f64 {
        self.get_as_f64(column).unwrap_or(default)
    }

    pub fn get_as_bool_or(&self, column: &str, default: bool) -> bool {
        self.get_as_bool(column).unwrap_or(default)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for WriteSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (column, value) in iter {
            values.put(column, value);
        }
        values
    }
}
