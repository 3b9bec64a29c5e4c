// XLSX export of a leaderboard view

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rankboard_engine::columns::{cell_content, cell_style, CellContent, CellStyle, Column, ColumnFormat};
use rankboard_engine::{LeaderboardConfig, LeaderboardError, ViewRecord};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

/// Excel's per-cell string limit, in characters.
const MAX_CELL_CHARS: usize = 32_767;

/// Statistics about an export operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportResult {
    pub rows_exported: usize,
    pub styled_cells: usize,
    pub filtered: bool,
}

/// `<prefix>_<YYYY-MM-DD>.xlsx`, with `_filtered` before the extension when
/// the export comes from a filtered view.
pub fn export_file_name(prefix: &str, date: NaiveDate, filtered: bool) -> String {
    let suffix = if filtered { "_filtered" } else { "" };
    format!("{prefix}_{}{suffix}.xlsx", date.format("%Y-%m-%d"))
}

/// Build the styled workbook for `records`.
///
/// Returns `Ok(None)` for an empty view: there is nothing to write.
pub fn build_workbook(
    records: &[ViewRecord<'_>],
    config: &LeaderboardConfig,
) -> Result<Option<(Workbook, ExportResult)>, LeaderboardError> {
    let Some(first) = records.first() else {
        return Ok(None);
    };

    let mut result = ExportResult {
        filtered: first.is_filtered_view,
        ..ExportResult::default()
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(&config.export.sheet_name)
        .map_err(|e| {
            LeaderboardError::Export(format!(
                "Failed to create sheet '{}': {}",
                config.export.sheet_name, e
            ))
        })?;

    write_header(worksheet)?;

    for (i, view) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, column) in Column::EXPORT_LAYOUT.iter().copied().enumerate() {
            let content = cell_content(column, view.record, config);
            let style = cell_style(column, view.record, config);
            if style != CellStyle::Plain && !matches!(style, CellStyle::Profile(_)) {
                result.styled_cells += 1;
            }
            write_cell(worksheet, row, col as u16, column, &content, &build_cell_format(style))?;
        }
        result.rows_exported += 1;
    }

    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| LeaderboardError::Export(format!("Failed to freeze header row: {}", e)))?;

    Ok(Some((workbook, result)))
}

/// Serialize `records` into XLSX bytes. `Ok(None)` for an empty view.
pub fn export_to_buffer(
    records: &[ViewRecord<'_>],
    config: &LeaderboardConfig,
) -> Result<Option<(Vec<u8>, ExportResult)>, LeaderboardError> {
    let Some((mut workbook, result)) = build_workbook(records, config)? else {
        return Ok(None);
    };
    let bytes = workbook
        .save_to_buffer()
        .map_err(|e| LeaderboardError::Export(format!("Failed to serialize XLSX: {}", e)))?;
    Ok(Some((bytes, result)))
}

/// Write the workbook for `records` into `dir`, named after `date`.
///
/// Returns the written path, or `Ok(None)` without touching the filesystem
/// when the view is empty.
pub fn export_to_dir(
    records: &[ViewRecord<'_>],
    config: &LeaderboardConfig,
    dir: &Path,
    date: NaiveDate,
) -> Result<Option<(PathBuf, ExportResult)>, LeaderboardError> {
    let Some((mut workbook, result)) = build_workbook(records, config)? else {
        log::info!("export skipped: view is empty");
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .map_err(|e| LeaderboardError::Io(format!("{}: {}", dir.display(), e)))?;
    let path = dir.join(export_file_name(&config.export.file_prefix, date, result.filtered));

    workbook
        .save(&path)
        .map_err(|e| LeaderboardError::Export(format!("Failed to save XLSX file: {}", e)))?;

    log::info!("exported {} rows to {}", result.rows_exported, path.display());
    Ok(Some((path, result)))
}

// ---------------------------------------------------------------------------
// Cell writing
// ---------------------------------------------------------------------------

fn write_header(worksheet: &mut Worksheet) -> Result<(), LeaderboardError> {
    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border_bottom(FormatBorder::Thin);

    for (col, column) in Column::EXPORT_LAYOUT.iter().copied().enumerate() {
        let col = col as u16;
        worksheet
            .write_string_with_format(0, col, column.header(), &header_format)
            .map_err(|e| LeaderboardError::Export(format!("Failed to write header: {}", e)))?;
        worksheet
            .set_column_width(col, column.width())
            .map_err(|e| LeaderboardError::Export(format!("Failed to set column width: {}", e)))?;
    }
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    column: Column,
    content: &CellContent,
    format: &Format,
) -> Result<(), LeaderboardError> {
    let written = match content {
        CellContent::Number(n) => worksheet
            .write_number_with_format(row, col, *n as f64, format)
            .map(|_| ()),
        CellContent::Text(s) if column.format() == ColumnFormat::Link && is_web_link(s) => {
            match worksheet.write_url_with_format(row, col, s.as_str(), format).map(|_| ()) {
                // Too long to be a hyperlink in Excel: keep the text
                Err(XlsxError::MaxUrlLengthExceeded) => {
                    log::warn!("cell ({}, {}): link too long, written as text", row, col);
                    worksheet
                        .write_string_with_format(row, col, clip_to_cell(s), format)
                        .map(|_| ())
                }
                other => other,
            }
        }
        CellContent::Text(s) => worksheet
            .write_string_with_format(row, col, clip_to_cell(s), format)
            .map(|_| ()),
    };
    written.map_err(|e| LeaderboardError::Export(format!("Failed to write cell ({}, {}): {}", row, col, e)))
}

/// Truncate to the longest prefix Excel accepts in one cell.
fn clip_to_cell(s: &str) -> &str {
    match s.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => {
            log::warn!("cell text truncated to {} characters", MAX_CELL_CHARS);
            &s[..end]
        }
        None => s,
    }
}

fn is_web_link(s: &str) -> bool {
    s.starts_with("https://") || s.starts_with("http://")
}

/// Map a style token onto an Excel format.
///
/// Profile status styling is display-only; in the workbook it stays plain.
fn build_cell_format(style: CellStyle) -> Format {
    match style {
        CellStyle::Plain | CellStyle::Profile(_) => Format::new(),
        CellStyle::Tier(tier) => Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_background_color(Color::RGB(tier.fill())),
        CellStyle::Status(token) => Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_font_color(Color::RGB(token.font()))
            .set_background_color(Color::RGB(token.fill()))
            .set_border(FormatBorder::Thick)
            .set_border_color(Color::RGB(token.border())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankboard_engine::style::{ProfileToken, RankTier, StatusToken};
    use rankboard_engine::view::RedemptionFilter;
    use rankboard_engine::{normalize, rank, view, FilterCriteria, NormalizedRecord, RawRow};

    fn ranked() -> Vec<NormalizedRecord> {
        let rows = vec![
            RawRow::from_pairs([
                ("User Name", "Ada"),
                ("Access Code Redemption Status", "Yes"),
                ("# of Skill Badges Completed", "3"),
            ]),
            RawRow::from_pairs([
                ("User Name", "Bob"),
                ("Access Code Redemption Status", "No"),
                ("# of Skill Badges Completed", "9"),
            ]),
        ];
        rank(normalize(&rows, &LeaderboardConfig::default()).unwrap())
    }

    #[test]
    fn file_name_carries_date_and_filtered_suffix() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(export_file_name("Leaderboard", date, false), "Leaderboard_2026-03-07.xlsx");
        assert_eq!(
            export_file_name("Leaderboard", date, true),
            "Leaderboard_2026-03-07_filtered.xlsx"
        );
    }

    #[test]
    fn empty_view_builds_nothing() {
        let config = LeaderboardConfig::default();
        assert!(build_workbook(&[], &config).unwrap().is_none());
        assert!(export_to_buffer(&[], &config).unwrap().is_none());
    }

    #[test]
    fn empty_view_writes_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = LeaderboardConfig::default();
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert!(export_to_dir(&[], &config, dir.path(), date).unwrap().is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn filtered_flag_follows_first_record() {
        let config = LeaderboardConfig::default();
        let records = ranked();

        let all = view(&records, &FilterCriteria::default(), &config);
        let (_, result) = build_workbook(&all, &config).unwrap().unwrap();
        assert!(!result.filtered);
        assert_eq!(result.rows_exported, 2);

        let criteria = FilterCriteria {
            redemption_status: RedemptionFilter::Done,
            ..FilterCriteria::default()
        };
        let done = view(&records, &criteria, &config);
        let (_, result) = build_workbook(&done, &config).unwrap().unwrap();
        assert!(result.filtered);
        assert_eq!(result.rows_exported, 1);
    }

    #[test]
    fn styled_cells_cover_rank_tiers_and_status_columns() {
        let config = LeaderboardConfig::default();
        let records = ranked();
        let all = view(&records, &FilterCriteria::default(), &config);
        let (_, result) = build_workbook(&all, &config).unwrap().unwrap();
        // Per row: rank tier + redemption status + completion flag
        assert_eq!(result.styled_cells, 6);
    }

    #[test]
    fn buffer_is_a_zip_container() {
        let config = LeaderboardConfig::default();
        let records = ranked();
        let all = view(&records, &FilterCriteria::default(), &config);
        let (bytes, _) = export_to_buffer(&all, &config).unwrap().unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn invalid_sheet_name_is_export_error() {
        let mut config = LeaderboardConfig::default();
        config.export.sheet_name = "bad[name]".into();
        let records = ranked();
        let all = view(&records, &FilterCriteria::default(), &config);
        assert!(matches!(
            build_workbook(&all, &config),
            Err(LeaderboardError::Export(_))
        ));
    }

    #[test]
    fn status_formats_are_bold_white_on_fill_with_thick_border() {
        let done = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_font_color(Color::RGB(0xFFFFFF))
            .set_background_color(Color::RGB(0x16A34A))
            .set_border(FormatBorder::Thick)
            .set_border_color(Color::RGB(0x166534));
        assert_eq!(build_cell_format(CellStyle::Status(StatusToken::Affirmative)), done);

        let not_done = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_font_color(Color::RGB(0xFFFFFF))
            .set_background_color(Color::RGB(0xDC2626))
            .set_border(FormatBorder::Thick)
            .set_border_color(Color::RGB(0x991B1B));
        assert_eq!(build_cell_format(CellStyle::Status(StatusToken::Negative)), not_done);
    }

    #[test]
    fn rank_tiers_get_metal_fills() {
        for (tier, fill) in [
            (RankTier::Gold, 0xFFD700),
            (RankTier::Silver, 0xC0C0C0),
            (RankTier::Bronze, 0xCD7F32),
        ] {
            let expected = Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_background_color(Color::RGB(fill));
            assert_eq!(build_cell_format(CellStyle::Tier(tier)), expected, "{tier:?}");
        }
    }

    #[test]
    fn plain_and_profile_cells_are_unformatted() {
        assert_eq!(build_cell_format(CellStyle::Plain), Format::new());
        assert_eq!(build_cell_format(CellStyle::Profile(ProfileToken::Check)), Format::new());
    }

    fn read_back(bytes: Vec<u8>) -> calamine::Range<calamine::Data> {
        use calamine::Reader;
        let mut workbook = calamine::Xlsx::new(std::io::Cursor::new(bytes)).unwrap();
        workbook.worksheet_range("Leaderboard").unwrap()
    }

    #[test]
    fn overlong_profile_link_is_written_as_text() {
        let config = LeaderboardConfig::default();
        let url = format!("https://www.cloudskillsboost.google/public_profiles/{}", "a".repeat(2100));
        let rows = vec![RawRow::from_pairs([
            ("User Name", "Ada"),
            ("Access Code Redemption Status", "Yes"),
            ("Google Cloud Skills Boost Profile URL", url.as_str()),
        ])];
        let records = rank(normalize(&rows, &config).unwrap());
        let all = view(&records, &FilterCriteria::default(), &config);

        let (bytes, result) = export_to_buffer(&all, &config).unwrap().unwrap();
        assert_eq!(result.rows_exported, 1);
        let range = read_back(bytes);
        assert_eq!(
            range.get_value((1, 8)),
            Some(&calamine::Data::String(url.clone()))
        );
    }

    #[test]
    fn overlong_name_list_is_truncated() {
        let config = LeaderboardConfig::default();
        let names = vec!["Badge"; 8000].join("|");
        assert!(names.chars().count() > MAX_CELL_CHARS);
        let rows = vec![RawRow::from_pairs([
            ("User Name", "Ada"),
            ("Access Code Redemption Status", "Yes"),
            ("Names of Completed Skill Badges", names.as_str()),
        ])];
        let records = rank(normalize(&rows, &config).unwrap());
        let all = view(&records, &FilterCriteria::default(), &config);

        let (bytes, _) = export_to_buffer(&all, &config).unwrap().unwrap();
        let range = read_back(bytes);
        match range.get_value((1, 9)) {
            Some(calamine::Data::String(s)) => {
                assert_eq!(s.chars().count(), MAX_CELL_CHARS);
                assert!(names.starts_with(s.as_str()));
            }
            other => panic!("unexpected cell {other:?}"),
        }
    }

    #[test]
    fn clip_keeps_short_text_and_respects_char_boundaries() {
        assert_eq!(clip_to_cell("short"), "short");
        let wide = "é".repeat(MAX_CELL_CHARS + 5);
        assert_eq!(clip_to_cell(&wide).chars().count(), MAX_CELL_CHARS);
    }
}
