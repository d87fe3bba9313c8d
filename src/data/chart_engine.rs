//! Chart data processing engine
//!
//! Groups the filtered dataset into one [`Series`] per relationship type.
//! This runs once per render pass, outside the drawing code.

use crate::constants::UNKNOWN_CATEGORY;
use crate::profile_scope;
use crate::types::{FilteredDataset, Point, Rgba, Series};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Fill and border colors of one category
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategoryStyle {
    pub fill: Rgba,
    pub border: Rgba,
}

/// Neutral gray shared by every category missing from the table
pub const FALLBACK_STYLE: CategoryStyle = CategoryStyle {
    fill: Rgba::new(128, 128, 128, 0.6),
    border: Rgba::new(128, 128, 128, 0.8),
};

const fn solid(color: Rgba) -> CategoryStyle {
    CategoryStyle {
        fill: color,
        border: color,
    }
}

/// Colors for the known relationship types
pub static RELATIONSHIP_STYLES: Lazy<HashMap<&'static str, CategoryStyle>> = Lazy::new(|| {
    HashMap::from([
        ("cognates", solid(Rgba::new(10, 61, 98, 0.6))),
        ("false_friends", solid(Rgba::new(255, 107, 53, 0.7))),
        ("loanword_en_to_es", solid(Rgba::new(76, 175, 80, 0.6))),
        ("loanword_es_to_en", solid(Rgba::new(156, 39, 176, 0.6))),
    ])
});

/// Style for a category key; unknown keys always get [`FALLBACK_STYLE`].
pub fn style_for(key: &str) -> CategoryStyle {
    RELATIONSHIP_STYLES
        .get(key)
        .copied()
        .unwrap_or(FALLBACK_STYLE)
}

/// Human-readable label for a category key
///
/// Underscores become spaces and every ASCII letter that starts a word is
/// upper-cased: `loanword_en_to_es` reads `Loanword En To Es`.
pub fn format_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len());
    let mut prev_is_word = false;
    for c in key.chars() {
        let c = if c == '_' { ' ' } else { c };
        let is_word = c.is_ascii_alphanumeric();
        if is_word && !prev_is_word {
            label.push(c.to_ascii_uppercase());
        } else {
            label.push(c);
        }
        prev_is_word = is_word;
    }
    label
}

/// Grouping key of a relationship type
pub fn category_key(relationship_type: Option<&str>) -> &str {
    match relationship_type {
        Some(t) if !t.is_empty() => t,
        _ => UNKNOWN_CATEGORY,
    }
}

/// Partition the dataset into series, in order of first occurrence.
pub fn group_by_relationship(dataset: &FilteredDataset) -> Vec<Series> {
    profile_scope!("group_by_relationship");
    let mut series: Vec<Series> = Vec::new();
    let mut index_by_key: HashMap<&str, usize> = HashMap::new();

    for row in dataset.iter() {
        let key = category_key(row.relationship_type.as_deref());
        let idx = *index_by_key.entry(key).or_insert_with(|| {
            let style = style_for(key);
            series.push(Series {
                key: key.to_string(),
                label: format_label(key),
                fill: style.fill,
                border: style.border,
                points: Vec::new(),
            });
            series.len() - 1
        });
        series[idx].points.push(Point::from(row));
    }

    series
}
