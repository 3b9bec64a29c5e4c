//! Filter/Search Pipeline - display view over a ranked snapshot
//!
//! Key invariants:
//! - Records are borrowed, never mutated: canonical `rank` survives unchanged
//! - Only membership and display order change
//! - `is_filtered_view` is a pure function of the criteria, identical on
//!   every output record

use std::cmp::Ordering;
use std::str::FromStr;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::config::LeaderboardConfig;
use crate::model::NormalizedRecord;

// =============================================================================
// Criteria
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RedemptionFilter {
    #[default]
    All,
    Done,
    NotDone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionFilter {
    #[default]
    All,
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    None,
    Asc,
    Desc,
}

impl SortOrder {
    fn apply(self, a: i64, b: i64) -> Ordering {
        match self {
            Self::None => Ordering::Equal,
            Self::Asc => a.cmp(&b),
            Self::Desc => b.cmp(&a),
        }
    }
}

/// Search/filter/sort intent for one display view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    pub search_term: String,
    pub redemption_status: RedemptionFilter,
    pub all_completed: CompletionFilter,
    pub skill_badge_sort: SortOrder,
    pub arcade_game_sort: SortOrder,
}

impl FilterCriteria {
    /// Search term with surrounding whitespace removed.
    pub fn normalized_term(&self) -> &str {
        self.search_term.trim()
    }

    /// True when any criterion deviates from its default.
    pub fn is_active(&self) -> bool {
        !self.normalized_term().is_empty()
            || self.redemption_status != RedemptionFilter::All
            || self.all_completed != CompletionFilter::All
            || self.skill_badge_sort != SortOrder::None
            || self.arcade_game_sort != SortOrder::None
    }
}

// =============================================================================
// Parsing (CLI / query strings)
// =============================================================================

impl FromStr for RedemptionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "done" => Ok(Self::Done),
            "not-done" | "notdone" => Ok(Self::NotDone),
            other => Err(format!("unknown redemption filter '{other}' (all, done, not-done)")),
        }
    }
}

impl FromStr for CompletionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            other => Err(format!("unknown completion filter '{other}' (all, yes, no)")),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort order '{other}' (none, asc, desc)")),
        }
    }
}

// =============================================================================
// View
// =============================================================================

/// A ranked record as it appears in one display view.
#[derive(Debug, Clone, Copy)]
pub struct ViewRecord<'a> {
    pub record: &'a NormalizedRecord,
    /// True iff the view's criteria deviate from the defaults.
    pub is_filtered_view: bool,
}

impl Serialize for ViewRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        self.record.serialize_entries(&mut map)?;
        map.serialize_entry("_isFilteredView", &self.is_filtered_view)?;
        map.end()
    }
}

/// Derive the display subset/order of a ranked sequence.
///
/// Without an active sort the output follows canonical rank. Skill-badge
/// sort takes priority over arcade-game sort; remaining ties fall back to
/// rank. An empty result is a valid outcome.
pub fn view<'a>(
    ranked: &'a [NormalizedRecord],
    criteria: &FilterCriteria,
    config: &LeaderboardConfig,
) -> Vec<ViewRecord<'a>> {
    let is_filtered_view = criteria.is_active();
    let needle = criteria.normalized_term().to_lowercase();

    let mut survivors: Vec<&NormalizedRecord> = ranked
        .iter()
        .filter(|r| matches_search(r, &needle, config))
        .filter(|r| matches_redemption(r, criteria.redemption_status))
        .filter(|r| matches_completion(r, criteria.all_completed, config))
        .collect();

    let badges = &config.fields.skill_badges;
    let games = &config.fields.arcade_games;
    survivors.sort_by(|a, b| {
        criteria
            .skill_badge_sort
            .apply(a.int(badges), b.int(badges))
            .then_with(|| criteria.arcade_game_sort.apply(a.int(games), b.int(games)))
            .then_with(|| canonical_position(a).cmp(&canonical_position(b)))
    });

    survivors
        .into_iter()
        .map(|record| ViewRecord {
            record,
            is_filtered_view,
        })
        .collect()
}

/// Unranked records sort after ranked ones, by source position.
fn canonical_position(record: &NormalizedRecord) -> (usize, usize) {
    (record.rank().unwrap_or(usize::MAX), record.original_index())
}

fn matches_search(record: &NormalizedRecord, needle: &str, config: &LeaderboardConfig) -> bool {
    if needle.is_empty() {
        return true;
    }
    config
        .search
        .fields
        .iter()
        .any(|field| record.display(field).to_lowercase().contains(needle))
}

fn matches_redemption(record: &NormalizedRecord, filter: RedemptionFilter) -> bool {
    match filter {
        RedemptionFilter::All => true,
        RedemptionFilter::Done => record.redeemed(),
        RedemptionFilter::NotDone => !record.redeemed(),
    }
}

fn matches_completion(
    record: &NormalizedRecord,
    filter: CompletionFilter,
    config: &LeaderboardConfig,
) -> bool {
    let completed = record.text(&config.fields.completion) == config.sentinels.completed;
    match filter {
        CompletionFilter::All => true,
        CompletionFilter::Yes => completed,
        CompletionFilter::No => !completed,
    }
}

// =============================================================================
// Tests
// =============================================================================
