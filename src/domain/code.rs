//! Course codes
//!
//! Format: `DEPT NUM` (e.g., `CS 2114`, `MATH 1225`).
//!
//! Two codes are the same course when their normalized keys match:
//! uppercase, with spaces and hyphens removed. `cs-2114`, `CS 2114` and
//! `CS2114` all name one course. The original spelling is kept for display.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CodeError {
    #[error("Invalid course code: expected 'DEPT NUM', got '{0}'")]
    Empty(String),
}

/// Set of course codes compared by normalized key
pub type CodeSet = BTreeSet<CourseCode>;

/// Normalizes a raw code for comparison
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .flat_map(char::to_uppercase)
        .collect()
}

/// A course code with case/format-insensitive identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseCode {
    raw: String,
    key: String,
}

impl CourseCode {
    /// Parses a course code, rejecting blank input
    pub fn new(raw: &str) -> Result<Self, CodeError> {
        let trimmed = raw.trim();
        let key = normalize(trimmed);
        if key.is_empty() {
            return Err(CodeError::Empty(raw.to_string()));
        }

        Ok(Self {
            raw: trimmed.to_string(),
            key,
        })
    }

    /// Returns the code as originally written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the normalized comparison key (e.g., `CS2114`)
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the department prefix (everything before the first digit)
    ///
    /// Empty when the key has no digits.
    pub fn department(&self) -> &str {
        match self.key.find(|c: char| c.is_ascii_digit()) {
            Some(idx) => &self.key[..idx],
            None => "",
        }
    }

    /// Returns the course number, if the part after the department is numeric
    pub fn number(&self) -> Option<u32> {
        let idx = self.key.find(|c: char| c.is_ascii_digit())?;
        self.key[idx..].parse().ok()
    }
}

impl PartialEq for CourseCode {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for CourseCode {}

impl Hash for CourseCode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for CourseCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CourseCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for CourseCode {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CourseCode {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&str> for CourseCode {
    type Error = CodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CourseCode> for String {
    fn from(code: CourseCode) -> Self {
        code.raw
    }
}
