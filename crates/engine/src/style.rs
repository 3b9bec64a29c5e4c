//! Semantic status → style token mapping.
//!
//! The display layer and the workbook export both read colors from here, so
//! "Yes is green, everything else is red" has a single definition.

use serde::Serialize;

/// 24-bit RGB color, `0xRRGGBB`.
pub type Rgb = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusToken {
    Affirmative,
    Negative,
}

impl StatusToken {
    pub fn fill(self) -> Rgb {
        match self {
            Self::Affirmative => 0x16A34A,
            Self::Negative => 0xDC2626,
        }
    }

    pub fn font(self) -> Rgb {
        0xFFFFFF
    }

    pub fn border(self) -> Rgb {
        match self {
            Self::Affirmative => 0x166534,
            Self::Negative => 0x991B1B,
        }
    }
}

/// Exact sentinel match: anything other than the sentinel is negative,
/// including case variants and the empty string.
pub fn status_token(value: &str, sentinel: &str) -> StatusToken {
    if value == sentinel {
        StatusToken::Affirmative
    } else {
        StatusToken::Negative
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileToken {
    Valid,
    Check,
}

impl ProfileToken {
    pub fn fill(self) -> Rgb {
        match self {
            Self::Valid => 0xBBF7D0,
            Self::Check => 0xFEF08A,
        }
    }

    pub fn font(self) -> Rgb {
        match self {
            Self::Valid => 0x16A34A,
            Self::Check => 0xCA8A04,
        }
    }
}

pub fn profile_token(value: &str, ok: &str) -> ProfileToken {
    if value == ok {
        ProfileToken::Valid
    } else {
        ProfileToken::Check
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankTier {
    Gold,
    Silver,
    Bronze,
}

impl RankTier {
    pub fn fill(self) -> Rgb {
        match self {
            Self::Gold => 0xFFD700,
            Self::Silver => 0xC0C0C0,
            Self::Bronze => 0xCD7F32,
        }
    }

    pub fn medal(self) -> &'static str {
        match self {
            Self::Gold => "🥇",
            Self::Silver => "🥈",
            Self::Bronze => "🥉",
        }
    }
}

pub fn rank_tier(rank: usize) -> Option<RankTier> {
    match rank {
        1 => Some(RankTier::Gold),
        2 => Some(RankTier::Silver),
        3 => Some(RankTier::Bronze),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_sentinel_is_exact() {
        assert_eq!(status_token("Yes", "Yes"), StatusToken::Affirmative);
        assert_eq!(status_token("No", "Yes"), StatusToken::Negative);
        assert_eq!(status_token("yes", "Yes"), StatusToken::Negative);
        assert_eq!(status_token("", "Yes"), StatusToken::Negative);
    }

    #[test]
    fn status_colors_differ_only_in_fill_and_border() {
        let (yes, no) = (StatusToken::Affirmative, StatusToken::Negative);
        assert_ne!(yes.fill(), no.fill());
        assert_ne!(yes.border(), no.border());
        assert_eq!(yes.font(), no.font());
    }

    #[test]
    fn tiers_cover_top_three_only() {
        assert_eq!(rank_tier(1), Some(RankTier::Gold));
        assert_eq!(rank_tier(2), Some(RankTier::Silver));
        assert_eq!(rank_tier(3), Some(RankTier::Bronze));
        assert_eq!(rank_tier(0), None);
        assert_eq!(rank_tier(4), None);
    }

    #[test]
    fn profile_tokens() {
        assert_eq!(profile_token("All Good", "All Good"), ProfileToken::Valid);
        assert_eq!(profile_token("Profile not public", "All Good"), ProfileToken::Check);
    }
}
