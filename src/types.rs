//! Core data types shared by the loader, the aggregator and the renderer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

// ============================================================================
// Parsed Cells
// ============================================================================

/// A single parsed field, with numeric-looking text already coerced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DataCell {
    Text(String),
    Number(f64),
    Boolean(bool),
    Empty,
}

impl DataCell {
    /// Parse a raw field, coercing numbers and booleans.
    ///
    /// Empty fields become [`DataCell::Empty`]. Only plain decimal notation
    /// (optional sign, digits, optional fraction, optional exponent) counts as
    /// numeric, so `"inf"`, `"NaN"` or `"0x10"` stay text.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return DataCell::Empty;
        }
        match trimmed {
            "true" | "TRUE" | "True" => return DataCell::Boolean(true),
            "false" | "FALSE" | "False" => return DataCell::Boolean(false),
            _ => {}
        }
        if looks_like_decimal(trimmed) {
            if let Ok(n) = trimmed.parse::<f64>() {
                return DataCell::Number(n);
            }
        }
        DataCell::Text(value.to_string())
    }

    /// Finite numeric value, if this cell holds one.
    pub fn as_finite(&self) -> Option<f64> {
        match self {
            DataCell::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    /// Text form of the cell, `None` when empty.
    pub fn as_text(&self) -> Option<String> {
        match self {
            DataCell::Empty => None,
            other => Some(other.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DataCell::Empty)
    }
}

impl fmt::Display for DataCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataCell::Text(s) => f.write_str(s),
            DataCell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            DataCell::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            DataCell::Empty => Ok(()),
        }
    }
}

/// Plain decimal notation: `-1`, `1.`, `.5`, `2.5e-3`.
fn looks_like_decimal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;
    let mut frac_digits = 0;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        frac_digits = i - frac_start;
    }
    if int_digits == 0 && frac_digits == 0 {
        return false;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'-' || bytes[i] == b'+') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == bytes.len()
}

/// One parsed record: cells in header order.
#[derive(Clone, Debug, PartialEq)]
pub struct RawRecord {
    pub cells: Vec<DataCell>,
}

impl RawRecord {
    pub fn new(cells: Vec<DataCell>) -> Self {
        Self { cells }
    }

    /// Cell at `index`, treating short records as having trailing empties.
    pub fn get(&self, index: usize) -> &DataCell {
        static EMPTY: DataCell = DataCell::Empty;
        self.cells.get(index).unwrap_or(&EMPTY)
    }
}

/// Header plus records produced by the delimited-text parser.
#[derive(Clone, Debug, Default)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
    pub delimiter: char,
}

impl ParsedTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }
}

// ============================================================================
// Validated Rows
// ============================================================================

/// One validated observation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Row {
    pub english_word: String,
    pub spanish_word: String,
    pub relationship_type: Option<String>,
    pub cultural_domain: Option<String>,
    pub similarity: f64,
    pub complexity: f64,
}

/// Ordered, immutable sequence of valid rows from one load.
///
/// Cloning shares the underlying rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilteredDataset {
    rows: Arc<[Row]>,
}

impl FilteredDataset {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows: rows.into() }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

impl Deref for FilteredDataset {
    type Target = [Row];

    fn deref(&self) -> &[Row] {
        &self.rows
    }
}

// ============================================================================
// Chart Data
// ============================================================================

/// RGBA color, serialized in CSS `rgba(...)` form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl Serialize for Rgba {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

/// A plotted datum. Metadata fields only feed tooltips.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub english_word: String,
    pub spanish_word: String,
    pub relationship_type: Option<String>,
    pub cultural_domain: Option<String>,
}

impl From<&Row> for Point {
    fn from(row: &Row) -> Self {
        Self {
            x: row.similarity,
            y: row.complexity,
            english_word: row.english_word.clone(),
            spanish_word: row.spanish_word.clone(),
            relationship_type: row.relationship_type.clone(),
            cultural_domain: row.cultural_domain.clone(),
        }
    }
}

/// One category's styled group of points.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    /// Grouping key (`relationship_type` or `unknown`)
    pub key: String,
    /// Human-readable label
    pub label: String,
    pub fill: Rgba,
    pub border: Rgba,
    pub points: Vec<Point>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
