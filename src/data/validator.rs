//! Row validation
//!
//! Turns a [`RawRecord`] into a typed [`Row`] or a structured [`Rejection`].
//! A row is usable only when both plotted scores are present finite numbers.

use crate::settings::ColumnNames;
use crate::types::{DataCell, ParsedTable, RawRecord, Row};
use std::fmt;

/// Which plotted score a rejection refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScoreField {
    Similarity,
    Complexity,
}

impl fmt::Display for ScoreField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScoreField::Similarity => "similarity",
            ScoreField::Complexity => "complexity",
        })
    }
}

/// Why a record did not become a [`Row`]
#[derive(Clone, Debug, PartialEq)]
pub enum Rejection {
    /// Field absent or empty
    Missing(ScoreField),
    /// Field holds text or a boolean
    NotNumeric { field: ScoreField, value: String },
    /// Field is NaN or infinite
    NotFinite(ScoreField),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Missing(field) => write!(f, "missing {field} score"),
            Rejection::NotNumeric { field, value } => {
                write!(f, "{field} score {value:?} is not a number")
            }
            Rejection::NotFinite(field) => write!(f, "{field} score is not finite"),
        }
    }
}

/// Column positions resolved once per parsed table
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub english_word: Option<usize>,
    pub spanish_word: Option<usize>,
    pub relationship_type: Option<usize>,
    pub cultural_domain: Option<usize>,
    pub similarity: Option<usize>,
    pub complexity: Option<usize>,
}

impl ColumnMap {
    pub fn resolve(table: &ParsedTable, names: &ColumnNames) -> Self {
        Self {
            english_word: table.column_index(&names.english_word),
            spanish_word: table.column_index(&names.spanish_word),
            relationship_type: table.column_index(&names.relationship_type),
            cultural_domain: table.column_index(&names.cultural_domain),
            similarity: table.column_index(&names.similarity),
            complexity: table.column_index(&names.complexity),
        }
    }

    /// Names of contract columns the header lacks
    pub fn missing<'a>(&self, names: &'a ColumnNames) -> Vec<&'a str> {
        [
            (self.english_word, names.english_word.as_str()),
            (self.spanish_word, names.spanish_word.as_str()),
            (self.relationship_type, names.relationship_type.as_str()),
            (self.cultural_domain, names.cultural_domain.as_str()),
            (self.similarity, names.similarity.as_str()),
            (self.complexity, names.complexity.as_str()),
        ]
        .into_iter()
        .filter_map(|(index, name)| index.is_none().then_some(name))
        .collect()
    }
}

static EMPTY: DataCell = DataCell::Empty;

fn cell<'a>(record: &'a RawRecord, index: Option<usize>) -> &'a DataCell {
    match index {
        Some(i) => record.get(i),
        None => &EMPTY,
    }
}

fn score(record: &RawRecord, index: Option<usize>, field: ScoreField) -> Result<f64, Rejection> {
    match cell(record, index) {
        DataCell::Empty => Err(Rejection::Missing(field)),
        DataCell::Number(n) if n.is_finite() => Ok(*n),
        DataCell::Number(_) => Err(Rejection::NotFinite(field)),
        other => Err(Rejection::NotNumeric {
            field,
            value: other.to_string(),
        }),
    }
}

/// Validate one record against the resolved columns.
pub fn validate_record(record: &RawRecord, columns: &ColumnMap) -> Result<Row, Rejection> {
    let similarity = score(record, columns.similarity, ScoreField::Similarity)?;
    let complexity = score(record, columns.complexity, ScoreField::Complexity)?;

    Ok(Row {
        english_word: cell(record, columns.english_word)
            .as_text()
            .unwrap_or_default(),
        spanish_word: cell(record, columns.spanish_word)
            .as_text()
            .unwrap_or_default(),
        relationship_type: cell(record, columns.relationship_type).as_text(),
        cultural_domain: cell(record, columns.cultural_domain).as_text(),
        similarity,
        complexity,
    })
}
