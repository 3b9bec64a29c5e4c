//! Participant detail lookup.

use serde::Serialize;

use crate::columns::split_names;
use crate::config::LeaderboardConfig;
use crate::model::NormalizedRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDetail {
    pub name: String,
    pub email: String,
    pub rank: Option<usize>,
    pub redeemed: bool,
    pub all_completed: bool,
    pub total_score: i64,
    pub skill_badge_count: i64,
    pub arcade_game_count: i64,
    pub profile_url: Option<String>,
    pub profile_status: String,
    pub skill_badges: Vec<String>,
    pub arcade_games: Vec<String>,
}

impl ParticipantDetail {
    pub fn from_record(record: &NormalizedRecord, config: &LeaderboardConfig) -> Self {
        let fields = &config.fields;
        let separator = &config.export.list_separator;
        let profile_url = record.text(&fields.profile_url).trim();

        Self {
            name: record.text(&fields.name).to_string(),
            email: record.text(&fields.email).to_string(),
            rank: record.rank(),
            redeemed: record.redeemed(),
            all_completed: record.text(&fields.completion) == config.sentinels.completed,
            total_score: record.total_score(),
            skill_badge_count: record.int(&fields.skill_badges),
            arcade_game_count: record.int(&fields.arcade_games),
            profile_url: (!profile_url.is_empty()).then(|| profile_url.to_string()),
            profile_status: record.text(&fields.profile_status).to_string(),
            skill_badges: split_names(record.text(&fields.skill_badge_names), separator),
            arcade_games: split_names(record.text(&fields.arcade_game_names), separator),
        }
    }
}

/// Find a participant by exact email. Empty emails never match.
pub fn find_by_email<'a>(
    records: &'a [NormalizedRecord],
    email: &str,
    config: &LeaderboardConfig,
) -> Option<&'a NormalizedRecord> {
    if email.is_empty() {
        return None;
    }
    records
        .iter()
        .find(|r| r.text(&config.fields.email) == email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawRow;
    use crate::normalize::normalize;
    use crate::rank::rank;

    fn records() -> Vec<NormalizedRecord> {
        let rows = vec![
            RawRow::from_pairs([
                ("User Name", "Ada"),
                ("User Email", "ada@example.com"),
                ("Access Code Redemption Status", "No"),
                ("All Skill Badges & Games Completed", "No"),
                ("# of Skill Badges Completed", "1"),
                ("# of Arcade Games Completed", "0"),
                ("Names of Completed Skill Badges", "Intro to Cloud"),
                ("Names of Completed Arcade Games", ""),
                ("Google Cloud Skills Boost Profile URL", ""),
                ("Profile URL Status", "All Good"),
            ]),
            RawRow::from_pairs([
                ("User Name", "Bob"),
                ("User Email", "bob@example.com"),
                ("Access Code Redemption Status", "Yes"),
                ("All Skill Badges & Games Completed", "Yes"),
                ("# of Skill Badges Completed", "2"),
                ("# of Arcade Games Completed", "1"),
                ("Names of Completed Skill Badges", "Build a Network | Secure APIs"),
                ("Names of Completed Arcade Games", "Arcade Base Camp"),
                ("Google Cloud Skills Boost Profile URL", "https://example.com/bob"),
                ("Profile URL Status", "All Good"),
            ]),
        ];
        rank(normalize(&rows, &LeaderboardConfig::default()).unwrap())
    }

    #[test]
    fn lookup_by_exact_email() {
        let config = LeaderboardConfig::default();
        let records = records();
        let bob = find_by_email(&records, "bob@example.com", &config).unwrap();
        let detail = ParticipantDetail::from_record(bob, &config);
        assert_eq!(detail.name, "Bob");
        assert_eq!(detail.rank, Some(1));
        assert!(detail.redeemed);
        assert!(detail.all_completed);
        assert_eq!(detail.total_score, 3);
        assert_eq!(detail.skill_badges, vec!["Build a Network", "Secure APIs"]);
        assert_eq!(detail.arcade_games, vec!["Arcade Base Camp"]);
        assert_eq!(detail.profile_url.as_deref(), Some("https://example.com/bob"));
    }

    #[test]
    fn missing_profile_and_empty_lists() {
        let config = LeaderboardConfig::default();
        let records = records();
        let ada = find_by_email(&records, "ada@example.com", &config).unwrap();
        let detail = ParticipantDetail::from_record(ada, &config);
        assert_eq!(detail.rank, Some(2));
        assert!(detail.profile_url.is_none());
        assert!(detail.arcade_games.is_empty());
        assert_eq!(detail.skill_badges, vec!["Intro to Cloud"]);
    }

    #[test]
    fn unknown_or_empty_email() {
        let config = LeaderboardConfig::default();
        let records = records();
        assert!(find_by_email(&records, "BOB@example.com", &config).is_none());
        assert!(find_by_email(&records, "", &config).is_none());
    }
}
