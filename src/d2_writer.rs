//! Append-only D2 statement buffer
//!
//! Statements are kept in insertion order. D2 merges repeated keys, so a
//! later line may refine an earlier one; nothing here deduplicates or
//! checks syntax.

use std::fmt;

#[derive(Debug, Default, Clone)]
pub struct D2Writer {
    lines: Vec<String>,
}

impl D2Writer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bare statement, e.g. a key declaration
    pub fn statement(&mut self, key: impl Into<String>) {
        self.lines.push(key.into());
    }

    /// `key: value`
    pub fn assign(&mut self, key: impl fmt::Display, value: impl fmt::Display) {
        self.lines.push(format!("{key}: {value}"));
    }

    /// One `key: value` line per value; no values gives a bare `key`
    pub fn assign_all<I, V>(&mut self, key: impl fmt::Display, values: I)
    where
        I: IntoIterator<Item = V>,
        V: fmt::Display,
    {
        let before = self.lines.len();
        for value in values {
            self.assign(&key, value);
        }
        if self.lines.len() == before {
            self.statement(key.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for D2Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
