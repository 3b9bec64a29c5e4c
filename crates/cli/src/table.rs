// Plain-text rendering of leaderboard views

use rankboard_engine::columns::{render_text, Column};
use rankboard_engine::participant::ParticipantDetail;
use rankboard_engine::snapshot::Summary;
use rankboard_engine::{LeaderboardConfig, ViewRecord};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a single text column may grow before it is truncated.
const MAX_COL_WIDTH: usize = 32;

/// Render `records` as an aligned table over the display columns.
///
/// `total` is the size of the full snapshot, used for the filtered-view
/// banner. `limit` caps the number of rows printed.
pub(crate) fn render_view(
    records: &[ViewRecord<'_>],
    total: usize,
    limit: Option<usize>,
    config: &LeaderboardConfig,
) -> String {
    let mut out = String::new();

    if records.is_empty() {
        out.push_str("No participants match the current criteria.\n");
        return out;
    }

    let shown = limit.map_or(records.len(), |n| n.min(records.len()));
    let columns = Column::DISPLAY_LAYOUT;

    let rows: Vec<Vec<String>> = records[..shown]
        .iter()
        .map(|v| columns.iter().map(|&c| render_text(c, v.record, config)).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            rows.iter()
                .map(|r| display_width(&r[i]))
                .chain(std::iter::once(display_width(c.header())))
                .max()
                .unwrap_or(0)
                .min(MAX_COL_WIDTH)
        })
        .collect();

    let header: Vec<String> = columns.iter().map(|c| c.header().to_string()).collect();
    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &rows {
        push_line(&mut out, row, &widths);
    }

    // Every record in a view carries the same flag
    if records[0].is_filtered_view {
        out.push_str(&format!("\nShowing {} of {} participants (filtered)\n", records.len(), total));
    } else {
        out.push_str(&format!("\n{} participants\n", total));
    }
    if shown < records.len() {
        out.push_str(&format!("({} more not shown)\n", records.len() - shown));
    }
    out
}

pub(crate) fn render_participant(detail: &ParticipantDetail) -> String {
    let list = |items: &[String]| {
        if items.is_empty() {
            "-".to_string()
        } else {
            items.join(", ")
        }
    };
    let rank = detail.rank.map_or_else(|| "-".to_string(), |r| r.to_string());

    let mut out = String::new();
    out.push_str(&format!("Name:            {}\n", detail.name));
    out.push_str(&format!("Email:           {}\n", detail.email));
    out.push_str(&format!("Rank:            {}\n", rank));
    out.push_str(&format!("Redeemed:        {}\n", yes_no(detail.redeemed)));
    out.push_str(&format!("All completed:   {}\n", yes_no(detail.all_completed)));
    out.push_str(&format!("Total score:     {}\n", detail.total_score));
    out.push_str(&format!("Skill badges:    {} ({})\n", detail.skill_badge_count, list(&detail.skill_badges)));
    out.push_str(&format!("Arcade games:    {} ({})\n", detail.arcade_game_count, list(&detail.arcade_games)));
    out.push_str(&format!(
        "Profile:         {} [{}]\n",
        detail.profile_url.as_deref().unwrap_or("-"),
        if detail.profile_status.is_empty() { "-" } else { &detail.profile_status }
    ));
    out
}

pub(crate) fn render_summary(summary: &Summary) -> String {
    format!(
        "Participants:    {}\nRedeemed:        {}\nEligible:        {}\nSnapshot:        v{} ({})\n",
        summary.total_participants,
        summary.redeemed_participants,
        summary.eligible_participants,
        summary.version,
        summary.last_updated,
    )
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "Yes"
    } else {
        "No"
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| pad_right(cell, *w))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Display width of a string, accounting for emoji and CJK double-width.
fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Pad to exactly `width` display columns, truncating with ".." if longer.
fn pad_right(s: &str, width: usize) -> String {
    let sw = display_width(s);
    if sw <= width {
        return format!("{}{}", s, " ".repeat(width - sw));
    }

    let budget = width.saturating_sub(2);
    let mut used = 0;
    let mut cut = String::new();
    for ch in s.chars() {
        let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw > budget {
            break;
        }
        used += cw;
        cut.push(ch);
    }
    cut.push_str("..");
    let cw = display_width(&cut);
    if cw < width {
        cut.push_str(&" ".repeat(width - cw));
    }
    cut
}
