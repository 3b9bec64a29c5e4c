//! Fixed column layout and formatting strategies.
//!
//! Each column is bound to one `ColumnFormat`; rendering is a pure function
//! of (column, record, config). There is no per-column injected code.

use serde::Serialize;

use crate::config::{FieldNames, LeaderboardConfig};
use crate::model::NormalizedRecord;
use crate::style::{
    profile_token, rank_tier, status_token, ProfileToken, RankTier, StatusToken,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnFormat {
    /// Canonical rank; top three get a tier.
    Rank,
    Plain,
    Count,
    /// Access code redemption status ("Done" / "Not Done").
    Redemption,
    /// All badges and games completed ("Yes" / "No").
    Completion,
    /// Profile URL status ("Valid" / "Check").
    ProfileStatus,
    Link,
    /// Separator-delimited list of names.
    NameList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Rank,
    Name,
    Email,
    RedemptionStatus,
    AllCompleted,
    SkillBadges,
    ArcadeGames,
    ProfileStatus,
    ProfileUrl,
    SkillBadgeNames,
    ArcadeGameNames,
}

impl Column {
    /// Workbook column order.
    pub const EXPORT_LAYOUT: [Column; 11] = [
        Column::Rank,
        Column::Name,
        Column::Email,
        Column::RedemptionStatus,
        Column::AllCompleted,
        Column::SkillBadges,
        Column::ArcadeGames,
        Column::ProfileStatus,
        Column::ProfileUrl,
        Column::SkillBadgeNames,
        Column::ArcadeGameNames,
    ];

    /// Columns shown on the leaderboard table.
    pub const DISPLAY_LAYOUT: [Column; 6] = [
        Column::Rank,
        Column::Name,
        Column::RedemptionStatus,
        Column::AllCompleted,
        Column::SkillBadges,
        Column::ArcadeGames,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Self::Rank => "Rank",
            Self::Name => "Name",
            Self::Email => "Email",
            Self::RedemptionStatus => "Redemption Status",
            Self::AllCompleted => "All Completed",
            Self::SkillBadges => "Skill Badges",
            Self::ArcadeGames => "Arcade Games",
            Self::ProfileStatus => "Profile Status",
            Self::ProfileUrl => "Profile URL",
            Self::SkillBadgeNames => "Completed Skill Badges",
            Self::ArcadeGameNames => "Completed Arcade Games",
        }
    }

    pub fn format(self) -> ColumnFormat {
        match self {
            Self::Rank => ColumnFormat::Rank,
            Self::Name | Self::Email => ColumnFormat::Plain,
            Self::RedemptionStatus => ColumnFormat::Redemption,
            Self::AllCompleted => ColumnFormat::Completion,
            Self::SkillBadges | Self::ArcadeGames => ColumnFormat::Count,
            Self::ProfileStatus => ColumnFormat::ProfileStatus,
            Self::ProfileUrl => ColumnFormat::Link,
            Self::SkillBadgeNames | Self::ArcadeGameNames => ColumnFormat::NameList,
        }
    }

    /// Source column backing this column; `None` for the derived rank.
    pub fn field(self, fields: &FieldNames) -> Option<&str> {
        let name = match self {
            Self::Rank => return None,
            Self::Name => &fields.name,
            Self::Email => &fields.email,
            Self::RedemptionStatus => &fields.redemption_status,
            Self::AllCompleted => &fields.completion,
            Self::SkillBadges => &fields.skill_badges,
            Self::ArcadeGames => &fields.arcade_games,
            Self::ProfileStatus => &fields.profile_status,
            Self::ProfileUrl => &fields.profile_url,
            Self::SkillBadgeNames => &fields.skill_badge_names,
            Self::ArcadeGameNames => &fields.arcade_game_names,
        };
        Some(name.as_str())
    }

    /// Export column width in characters.
    pub fn width(self) -> f64 {
        match self {
            Self::Rank => 8.0,
            Self::Name => 28.0,
            Self::Email => 32.0,
            Self::RedemptionStatus | Self::AllCompleted => 18.0,
            Self::SkillBadges | Self::ArcadeGames => 14.0,
            Self::ProfileStatus => 20.0,
            Self::ProfileUrl => 48.0,
            Self::SkillBadgeNames | Self::ArcadeGameNames => 60.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Cell content + style
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    Plain,
    Tier(RankTier),
    Status(StatusToken),
    Profile(ProfileToken),
}

/// Raw cell value: numbers stay numeric, text passes through unchanged.
pub fn cell_content(column: Column, record: &NormalizedRecord, config: &LeaderboardConfig) -> CellContent {
    match column.field(&config.fields) {
        None => match record.rank() {
            Some(rank) => CellContent::Number(rank as i64),
            None => CellContent::Text(String::new()),
        },
        Some(field) => match record.get(field).and_then(|v| v.as_int()) {
            Some(n) => CellContent::Number(n),
            None => CellContent::Text(record.display(field)),
        },
    }
}

/// Style token for a cell, derived only from the cell's own value.
pub fn cell_style(column: Column, record: &NormalizedRecord, config: &LeaderboardConfig) -> CellStyle {
    let value = || column.field(&config.fields).map(|f| record.display(f)).unwrap_or_default();
    match column.format() {
        ColumnFormat::Rank => record
            .rank()
            .and_then(rank_tier)
            .map(CellStyle::Tier)
            .unwrap_or(CellStyle::Plain),
        ColumnFormat::Redemption => {
            CellStyle::Status(status_token(&value(), &config.sentinels.redeemed))
        }
        ColumnFormat::Completion => {
            CellStyle::Status(status_token(&value(), &config.sentinels.completed))
        }
        ColumnFormat::ProfileStatus => {
            CellStyle::Profile(profile_token(&value(), &config.sentinels.profile_ok))
        }
        ColumnFormat::Plain | ColumnFormat::Count | ColumnFormat::Link | ColumnFormat::NameList => {
            CellStyle::Plain
        }
    }
}

/// Human-facing text for the display layer.
pub fn render_text(column: Column, record: &NormalizedRecord, config: &LeaderboardConfig) -> String {
    let raw = column.field(&config.fields).map(|f| record.display(f)).unwrap_or_default();
    match column.format() {
        ColumnFormat::Rank => match record.rank() {
            Some(rank) => match rank_tier(rank) {
                Some(tier) => format!("{rank} {}", tier.medal()),
                None => rank.to_string(),
            },
            None => "-".into(),
        },
        ColumnFormat::Redemption => {
            match status_token(&raw, &config.sentinels.redeemed) {
                StatusToken::Affirmative => "Done".into(),
                StatusToken::Negative => "Not Done".into(),
            }
        }
        ColumnFormat::Completion => {
            match status_token(&raw, &config.sentinels.completed) {
                StatusToken::Affirmative => "Yes".into(),
                StatusToken::Negative => "No".into(),
            }
        }
        ColumnFormat::ProfileStatus => {
            match profile_token(&raw, &config.sentinels.profile_ok) {
                ProfileToken::Valid => "Valid".into(),
                ProfileToken::Check => "Check".into(),
            }
        }
        ColumnFormat::NameList => {
            let names = split_names(&raw, &config.export.list_separator);
            if names.is_empty() {
                "-".into()
            } else {
                names.join(", ")
            }
        }
        ColumnFormat::Plain | ColumnFormat::Count | ColumnFormat::Link => {
            if raw.is_empty() {
                "-".into()
            } else {
                raw
            }
        }
    }
}

/// Split a separator-delimited name list, trimming entries and dropping
/// empty ones.
pub fn split_names(raw: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        let single = raw.trim();
        return if single.is_empty() { Vec::new() } else { vec![single.to_string()] };
    }
    raw.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
