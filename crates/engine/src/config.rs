use serde::Deserialize;

use crate::error::LeaderboardError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Every column name, sentinel and pattern the pipeline keys off.
///
/// An empty TOML document yields the Study Jams defaults, so a missing
/// config file is never an error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LeaderboardConfig {
    pub classifier: ClassifierConfig,
    pub fields: FieldNames,
    pub scoring: ScoringConfig,
    pub sentinels: Sentinels,
    pub search: SearchConfig,
    pub export: ExportConfig,
}

// ---------------------------------------------------------------------------
// Classifier patterns
// ---------------------------------------------------------------------------

/// Column-name patterns for the Field Classifier. All matching is
/// case-insensitive; exclusions win over inclusions.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    pub exclude_substrings: Vec<String>,
    pub numeric_prefixes: Vec<String>,
    pub numeric_suffixes: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            exclude_substrings: strings(&["names of", "url", "email", "status"]),
            numeric_prefixes: strings(&["#", "total", "number"]),
            numeric_suffixes: strings(&["count"]),
        }
    }
}

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldNames {
    pub name: String,
    pub email: String,
    pub redemption_status: String,
    pub completion: String,
    pub skill_badges: String,
    pub arcade_games: String,
    pub profile_status: String,
    pub profile_url: String,
    pub skill_badge_names: String,
    pub arcade_game_names: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            name: "User Name".into(),
            email: "User Email".into(),
            redemption_status: "Access Code Redemption Status".into(),
            completion: "All Skill Badges & Games Completed".into(),
            skill_badges: "# of Skill Badges Completed".into(),
            arcade_games: "# of Arcade Games Completed".into(),
            profile_status: "Profile URL Status".into(),
            profile_url: "Google Cloud Skills Boost Profile URL".into(),
            skill_badge_names: "Names of Completed Skill Badges".into(),
            arcade_game_names: "Names of Completed Arcade Games".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring + sentinels + search
// ---------------------------------------------------------------------------

/// Achievement counters summed into `total_score`. Other numeric columns
/// (row ordinals, totals) never contribute.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    pub counters: Vec<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let fields = FieldNames::default();
        Self {
            counters: vec![fields.skill_badges, fields.arcade_games],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Sentinels {
    /// Exact value of the redemption status column meaning "redeemed".
    pub redeemed: String,
    /// Exact value of the completion column meaning "all completed".
    pub completed: String,
    /// Exact value of the profile status column meaning the profile is valid.
    pub profile_ok: String,
}

impl Default for Sentinels {
    fn default() -> Self {
        Self {
            redeemed: "Yes".into(),
            completed: "Yes".into(),
            profile_ok: "All Good".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub fields: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let fields = FieldNames::default();
        Self {
            fields: vec![fields.name, fields.email, fields.profile_status],
        }
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub file_prefix: String,
    pub sheet_name: String,
    /// Separator between names in the badge/game name columns.
    pub list_separator: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_prefix: "Leaderboard".into(),
            sheet_name: "Leaderboard".into(),
            list_separator: "|".into(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl LeaderboardConfig {
    pub fn from_toml(input: &str) -> Result<Self, LeaderboardError> {
        let config: LeaderboardConfig =
            toml::from_str(input).map_err(|e| LeaderboardError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LeaderboardError> {
        if self.scoring.counters.is_empty() {
            return Err(LeaderboardError::ConfigValidation(
                "scoring.counters must name at least one column".into(),
            ));
        }

        if self.search.fields.is_empty() {
            return Err(LeaderboardError::ConfigValidation(
                "search.fields must name at least one column".into(),
            ));
        }

        let sentinels = [
            ("redeemed", &self.sentinels.redeemed),
            ("completed", &self.sentinels.completed),
            ("profile_ok", &self.sentinels.profile_ok),
        ];
        for (name, value) in sentinels {
            if value.is_empty() {
                return Err(LeaderboardError::ConfigValidation(format!(
                    "sentinels.{name} must not be empty"
                )));
            }
        }

        if self.export.sheet_name.trim().is_empty() {
            return Err(LeaderboardError::ConfigValidation(
                "export.sheet_name must not be empty".into(),
            ));
        }
        // Excel rejects sheet names longer than 31 characters.
        if self.export.sheet_name.chars().count() > 31 {
            return Err(LeaderboardError::ConfigValidation(format!(
                "export.sheet_name '{}' exceeds 31 characters",
                self.export.sheet_name
            )));
        }
        if self.export.file_prefix.trim().is_empty() {
            return Err(LeaderboardError::ConfigValidation(
                "export.file_prefix must not be empty".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = LeaderboardConfig::from_toml("").unwrap();
        assert_eq!(config.fields.name, "User Name");
        assert_eq!(config.sentinels.redeemed, "Yes");
        assert_eq!(
            config.scoring.counters,
            vec!["# of Skill Badges Completed", "# of Arcade Games Completed"]
        );
        assert_eq!(config.search.fields.len(), 3);
        assert_eq!(config.export.sheet_name, "Leaderboard");
        assert!(config.classifier.exclude_substrings.contains(&"email".to_string()));
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let input = r#"
[fields]
name = "Participant"

[sentinels]
redeemed = "Redeemed"
"#;
        let config = LeaderboardConfig::from_toml(input).unwrap();
        assert_eq!(config.fields.name, "Participant");
        assert_eq!(config.fields.email, "User Email");
        assert_eq!(config.sentinels.redeemed, "Redeemed");
        assert_eq!(config.sentinels.completed, "Yes");
    }

    #[test]
    fn custom_counters_and_patterns() {
        let input = r#"
[classifier]
numeric_prefixes = ["pts"]

[scoring]
counters = ["pts_a", "pts_b", "pts_c"]
"#;
        let config = LeaderboardConfig::from_toml(input).unwrap();
        assert_eq!(config.scoring.counters.len(), 3);
        assert_eq!(config.classifier.numeric_prefixes, vec!["pts"]);
        // Untouched lists keep defaults
        assert_eq!(config.classifier.numeric_suffixes, vec!["count"]);
    }

    #[test]
    fn reject_empty_counters() {
        let err = LeaderboardConfig::from_toml("[scoring]\ncounters = []\n").unwrap_err();
        assert!(err.to_string().contains("scoring.counters"));
    }

    #[test]
    fn reject_blank_sentinel() {
        let err = LeaderboardConfig::from_toml("[sentinels]\ncompleted = \"\"\n").unwrap_err();
        assert!(err.to_string().contains("sentinels.completed"));
    }

    #[test]
    fn reject_long_sheet_name() {
        let input = "[export]\nsheet_name = \"A sheet name that is much too long for Excel\"\n";
        let err = LeaderboardConfig::from_toml(input).unwrap_err();
        assert!(matches!(err, LeaderboardError::ConfigValidation(_)));
    }

    #[test]
    fn reject_unknown_key() {
        let err = LeaderboardConfig::from_toml("[fields]\nnmae = \"typo\"\n").unwrap_err();
        assert!(matches!(err, LeaderboardError::ConfigParse(_)));
    }
}
