//! Record Normalizer: raw string rows → typed records.

use std::sync::Arc;

use crate::classify::{classify, FieldKind};
use crate::config::LeaderboardConfig;
use crate::error::LeaderboardError;
use crate::model::{FieldValue, NormalizedRecord, RawRow, Schema};

/// Normalize rows whose column set is taken from the first row.
///
/// An empty input is valid and yields an empty sequence.
pub fn normalize(
    rows: &[RawRow],
    config: &LeaderboardConfig,
) -> Result<Vec<NormalizedRecord>, LeaderboardError> {
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = first.columns().map(str::to_string).collect();
    let (_, records) = normalize_table(&headers, rows, config)?;
    Ok(records)
}

/// Normalize rows against an explicit header row.
///
/// Every row must carry exactly the header's column set (any order).
/// Numeric cells that fail to parse become 0; this never errors.
pub fn normalize_table(
    headers: &[String],
    rows: &[RawRow],
    config: &LeaderboardConfig,
) -> Result<(Arc<Schema>, Vec<NormalizedRecord>), LeaderboardError> {
    let kinds = headers
        .iter()
        .map(|h| classify(h, &config.classifier))
        .collect();
    let schema = Schema::new(headers.to_vec(), kinds)
        .map_err(|dup| LeaderboardError::MalformedInput(format!("duplicate column '{dup}'")))?;
    let schema = Arc::new(schema);

    let mut records = Vec::with_capacity(rows.len());
    for (original_index, row) in rows.iter().enumerate() {
        let values = typed_values(&schema, row, original_index)?;
        let total_score = config
            .scoring
            .counters
            .iter()
            .filter_map(|c| schema.position(c).map(|i| counter_value(&values[i])))
            .fold(0i64, i64::saturating_add);
        let redeemed = schema
            .position(&config.fields.redemption_status)
            .map(|i| values[i].as_text() == Some(config.sentinels.redeemed.as_str()))
            .unwrap_or(false);

        records.push(NormalizedRecord {
            schema: Arc::clone(&schema),
            values,
            total_score,
            redeemed,
            original_index,
            rank: None,
        });
    }

    Ok((schema, records))
}

fn typed_values(
    schema: &Schema,
    row: &RawRow,
    original_index: usize,
) -> Result<Vec<FieldValue>, LeaderboardError> {
    if row.len() != schema.len() {
        return Err(mismatch(original_index, format!(
            "expected {} columns, found {}",
            schema.len(),
            row.len()
        )));
    }

    let mut slots: Vec<Option<FieldValue>> = vec![None; schema.len()];
    for (name, raw) in &row.fields {
        let i = schema
            .position(name)
            .ok_or_else(|| mismatch(original_index, format!("unexpected column '{name}'")))?;
        if slots[i].is_some() {
            return Err(mismatch(original_index, format!("column '{name}' repeated")));
        }
        let value = match schema.kind(name) {
            Some(FieldKind::Numeric) => FieldValue::Int(parse_int_lenient(raw)),
            _ => FieldValue::Text(raw.clone()),
        };
        slots[i] = Some(value);
    }

    // Lengths match and no slot was filled twice, so every slot is filled.
    Ok(slots.into_iter().flatten().collect())
}

fn counter_value(value: &FieldValue) -> i64 {
    match value {
        FieldValue::Int(n) => *n,
        FieldValue::Text(s) => parse_int_lenient(s),
    }
}

fn mismatch(original_index: usize, detail: String) -> LeaderboardError {
    LeaderboardError::MalformedInput(format!("row {original_index}: {detail}"))
}

/// Parse the leading integer of a cell.
///
/// Surrounding whitespace and trailing garbage are ignored (`"12 badges"` →
/// 12, `"3.9"` → 3). No digits, or a value outside `i64`, yields 0.
pub fn parse_int_lenient(raw: &str) -> i64 {
    let s = raw.trim();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return 0;
    }
    match digits[..end].parse::<i64>() {
        Ok(n) if negative => -n,
        Ok(n) => n,
        Err(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, redeemed: &str, badges: &str, games: &str) -> RawRow {
        RawRow::from_pairs([
            ("User Name", name),
            ("Access Code Redemption Status", redeemed),
            ("# of Skill Badges Completed", badges),
            ("# of Arcade Games Completed", games),
        ])
    }

    #[test]
    fn lenient_int_parsing() {
        assert_eq!(parse_int_lenient("42"), 42);
        assert_eq!(parse_int_lenient("  7 "), 7);
        assert_eq!(parse_int_lenient("-3"), -3);
        assert_eq!(parse_int_lenient("+5"), 5);
        assert_eq!(parse_int_lenient("12abc"), 12);
        assert_eq!(parse_int_lenient("3.9"), 3);
        assert_eq!(parse_int_lenient(""), 0);
        assert_eq!(parse_int_lenient("abc"), 0);
        assert_eq!(parse_int_lenient("-"), 0);
        assert_eq!(parse_int_lenient("99999999999999999999999"), 0);
    }

    #[test]
    fn numeric_and_text_typing() {
        let config = LeaderboardConfig::default();
        let records = normalize(&[row("Ada", "Yes", "3", "")], &config).unwrap();
        let r = &records[0];
        assert_eq!(r.get("User Name"), Some(&FieldValue::Text("Ada".into())));
        assert_eq!(r.get("# of Skill Badges Completed"), Some(&FieldValue::Int(3)));
        // Empty numeric cell coerces to 0
        assert_eq!(r.get("# of Arcade Games Completed"), Some(&FieldValue::Int(0)));
    }

    #[test]
    fn empty_text_passes_through() {
        let config = LeaderboardConfig::default();
        let records = normalize(&[row("", "No", "1", "1")], &config).unwrap();
        assert_eq!(records[0].get("User Name"), Some(&FieldValue::Text(String::new())));
    }

    #[test]
    fn derived_fields() {
        let config = LeaderboardConfig::default();
        let rows = vec![
            row("Ada", "Yes", "3", "2"),
            row("Bob", "No", "10", "junk"),
            row("Cy", "yes", "1", "1"),
        ];
        let records = normalize(&rows, &config).unwrap();
        assert_eq!(records[0].total_score(), 5);
        assert!(records[0].redeemed());
        assert_eq!(records[1].total_score(), 10);
        assert!(!records[1].redeemed());
        // Sentinel match is exact
        assert!(!records[2].redeemed());
        let indices: Vec<_> = records.iter().map(|r| r.original_index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(records.iter().all(|r| r.rank().is_none()));
    }

    #[test]
    fn other_numeric_columns_do_not_score() {
        let config = LeaderboardConfig::default();
        let rows = vec![RawRow::from_pairs([
            ("# of Skill Badges Completed", "2"),
            ("# of Arcade Games Completed", "1"),
            ("Total Labs", "50"),
            ("#", "9"),
        ])];
        let records = normalize(&rows, &config).unwrap();
        assert_eq!(records[0].int("Total Labs"), 50);
        assert_eq!(records[0].total_score(), 3);
    }

    #[test]
    fn column_order_may_vary_between_rows() {
        let config = LeaderboardConfig::default();
        let rows = vec![
            RawRow::from_pairs([("User Name", "Ada"), ("# of Skill Badges Completed", "1")]),
            RawRow::from_pairs([("# of Skill Badges Completed", "2"), ("User Name", "Bob")]),
        ];
        let records = normalize(&rows, &config).unwrap();
        assert_eq!(records[1].text("User Name"), "Bob");
        assert_eq!(records[1].int("# of Skill Badges Completed"), 2);
    }

    #[test]
    fn schema_mismatch_is_malformed() {
        let config = LeaderboardConfig::default();
        let rows = vec![
            RawRow::from_pairs([("a", "1"), ("b", "2")]),
            RawRow::from_pairs([("a", "1"), ("c", "2")]),
        ];
        let err = normalize(&rows, &config).unwrap_err();
        assert!(matches!(err, LeaderboardError::MalformedInput(_)));
        assert!(err.to_string().contains("row 1"));

        let short = vec![
            RawRow::from_pairs([("a", "1"), ("b", "2")]),
            RawRow::from_pairs([("a", "1")]),
        ];
        assert!(normalize(&short, &config).is_err());

        let repeated = vec![
            RawRow::from_pairs([("a", "1"), ("b", "2")]),
            RawRow::from_pairs([("a", "1"), ("a", "2")]),
        ];
        assert!(normalize(&repeated, &config).is_err());
    }

    #[test]
    fn empty_input_is_empty_output() {
        let config = LeaderboardConfig::default();
        assert!(normalize(&[], &config).unwrap().is_empty());

        let headers = vec!["User Name".to_string()];
        let (schema, records) = normalize_table(&headers, &[], &config).unwrap();
        assert!(records.is_empty());
        assert_eq!(schema.headers(), &headers[..]);
    }

    #[test]
    fn duplicate_headers_are_malformed() {
        let config = LeaderboardConfig::default();
        let headers = vec!["a".to_string(), "a".to_string()];
        let err = normalize_table(&headers, &[], &config).unwrap_err();
        assert!(err.to_string().contains("duplicate column 'a'"));
    }
}
