use crate::error::{ConversionError, Result};
use crate::utils::constants::{X_COLUMN_PATTERNS, Y_COLUMN_PATTERNS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the user designates a coordinate column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnSelector {
    /// Spreadsheet letters: `A` is column 0, `AA` is column 26
    Letter(String),
    /// Case-insensitive header substrings, tried in order
    Patterns(Vec<String>),
}

impl ColumnSelector {
    pub fn letter(letters: &str) -> Self {
        ColumnSelector::Letter(letters.trim().to_string())
    }

    pub fn patterns<S: AsRef<str>>(patterns: &[S]) -> Self {
        ColumnSelector::Patterns(
            patterns
                .iter()
                .map(|p| p.as_ref().trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        )
    }

    pub fn default_x() -> Self {
        Self::patterns(X_COLUMN_PATTERNS)
    }

    pub fn default_y() -> Self {
        Self::patterns(Y_COLUMN_PATTERNS)
    }

    /// Reject designators that can never resolve, before any file is read
    pub fn validate(&self) -> Result<()> {
        match self {
            ColumnSelector::Letter(letters) => letter_to_index(letters).map(|_| ()),
            ColumnSelector::Patterns(patterns) if patterns.is_empty() => Err(
                ConversionError::Config("column pattern list is empty".to_string()),
            ),
            ColumnSelector::Patterns(_) => Ok(()),
        }
    }

    /// Resolve against a table header row to a zero-based column index.
    pub fn resolve(&self, headers: &[String]) -> Result<usize> {
        match self {
            ColumnSelector::Letter(letters) => {
                let index = letter_to_index(letters)?;
                if index >= headers.len() {
                    return Err(ConversionError::Column(format!(
                        "column {} (index {}) is beyond the table's {} columns",
                        letters.to_uppercase(),
                        index,
                        headers.len()
                    )));
                }
                Ok(index)
            }
            ColumnSelector::Patterns(patterns) => find_by_patterns(headers, patterns)
                .ok_or_else(|| {
                    ConversionError::Column(format!(
                        "no header matches any of [{}]",
                        patterns.join(", ")
                    ))
                }),
        }
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSelector::Letter(letters) => write!(f, "column {}", letters.to_uppercase()),
            ColumnSelector::Patterns(patterns) => write!(f, "header matching [{}]", patterns.join(", ")),
        }
    }
}

/// Spreadsheet column letters to a zero-based index (`A` → 0, `Z` → 25, `AA` → 26).
pub fn letter_to_index(letters: &str) -> Result<usize> {
    let trimmed = letters.trim();
    if trimmed.is_empty() {
        return Err(ConversionError::Config(
            "column designator is empty".to_string(),
        ));
    }

    let mut number: usize = 0;
    for c in trimmed.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(ConversionError::Column(format!(
                "invalid column letters '{}'",
                trimmed
            )));
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        number = number
            .checked_mul(26)
            .and_then(|n| n.checked_add(digit))
            .ok_or_else(|| {
                ConversionError::Column(format!("column letters '{}' are too long", trimmed))
            })?;
    }

    Ok(number - 1)
}

/// Zero-based index back to spreadsheet letters (`26` → `AA`).
pub fn index_to_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// First column whose header contains a pattern. Patterns are tried in
/// order, so an earlier pattern wins over an earlier column.
pub fn find_by_patterns<S: AsRef<str>>(headers: &[String], patterns: &[S]) -> Option<usize> {
    let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();

    patterns
        .iter()
        .map(|p| p.as_ref().to_lowercase())
        .filter(|p| !p.is_empty())
        .find_map(|pattern| lowered.iter().position(|h| h.contains(&pattern)))
}

/// Detected easting/northing column indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedColumns {
    pub x: usize,
    pub y: usize,
}

/// Guess the easting and northing columns from common header names.
pub fn detect_utm_columns(headers: &[String]) -> Option<DetectedColumns> {
    let x = find_by_patterns(headers, X_COLUMN_PATTERNS)?;
    let y = find_by_patterns(headers, Y_COLUMN_PATTERNS)?;
    Some(DetectedColumns { x, y })
}
