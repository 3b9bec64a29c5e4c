// CSV parsing into raw rows

use std::io::Read;
use std::path::Path;

use rankboard_engine::{LeaderboardError, RawRow};

/// Header row plus one `RawRow` per data line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Parse comma-separated text with a header row.
///
/// Blank lines are skipped. A record whose field count differs from the
/// header is malformed; so are duplicate or missing headers.
pub fn parse_table(content: &str) -> Result<Table, LeaderboardError> {
    // Excel-exported files often start with a BOM
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(malformed)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(LeaderboardError::MalformedInput("missing header row".into()));
    }

    let mut seen = std::collections::HashSet::new();
    for h in &headers {
        if !seen.insert(h.as_str()) {
            return Err(LeaderboardError::MalformedInput(format!("duplicate column '{h}'")));
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(malformed)?;
        let fields = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push(RawRow::new(fields));
    }

    Ok(Table { headers, rows })
}

fn malformed(e: csv::Error) -> LeaderboardError {
    let detail = match e.kind() {
        csv::ErrorKind::UnequalLengths { pos, expected_len, len } => {
            let line = pos.as_ref().map(|p| p.line()).unwrap_or(0);
            format!("line {line}: expected {expected_len} fields, found {len}")
        }
        _ => e.to_string(),
    };
    LeaderboardError::MalformedInput(detail)
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, std::io::Error> {
    let mut file = std::fs::File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(decode_utf8_lossless(bytes))
}

/// Decode bytes as UTF-8, falling back to Windows-1252 for legacy exports.
pub fn decode_utf8_lossless(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    }
}
