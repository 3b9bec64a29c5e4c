//! Field Classifier: decides a column's kind from its name alone.

use serde::Serialize;

use crate::config::ClassifierConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Numeric,
    Text,
}

/// Classify a column name.
///
/// Precedence: any exclusion substring → Text; else any numeric prefix or
/// suffix → Numeric; else Text. Matching is case-insensitive.
pub fn classify(column: &str, patterns: &ClassifierConfig) -> FieldKind {
    let name = column.to_lowercase();

    if patterns
        .exclude_substrings
        .iter()
        .any(|p| name.contains(&p.to_lowercase()))
    {
        return FieldKind::Text;
    }

    let numeric = patterns
        .numeric_prefixes
        .iter()
        .any(|p| name.starts_with(&p.to_lowercase()))
        || patterns
            .numeric_suffixes
            .iter()
            .any(|s| name.ends_with(&s.to_lowercase()));

    if numeric {
        FieldKind::Numeric
    } else {
        FieldKind::Text
    }
}
