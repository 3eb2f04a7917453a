// Normalized shapes shared by every upstream sports API adapter.
use serde::{Deserialize, Serialize};

/// Match status across providers. Each provider has its own code set
/// ("NS", "1H", "Match Finished", ...); anything we cannot map is kept
/// verbatim so it is never silently lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Finished,
    #[serde(untagged)]
    Unknown(String),
}

impl MatchStatus {
    pub fn from_provider_code(code: &str) -> Self {
        match code {
            "NS" | "TBD" | "Not Started" => MatchStatus::Scheduled,
            "1H" | "2H" | "HT" | "ET" | "BT" | "P" | "LIVE" | "live" | "In Play" => {
                MatchStatus::Live
            }
            "FT" | "AET" | "PEN" | "Match Finished" | "Finished" => MatchStatus::Finished,
            other => MatchStatus::Unknown(other.to_string()),
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, MatchStatus::Finished)
    }
}

/// A match as returned by an upstream adapter. The id is only unique
/// within its provider; cross-provider dedup by id is an approximation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveMatch {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_score: Option<i32>,
    pub status: MatchStatus,
    pub minute: i32,
    pub league: String,
    pub time: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub league_logo: Option<String>,
}

/// A league as returned by an upstream adapter. Providers do not share
/// an id space, so the provider name travels with the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamLeague {
    pub provider: String,
    pub id: String,
    pub name: String,
    pub sport: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

/// Betting odds as reported by an upstream provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamOdds {
    pub bookmaker: String,
    pub market: String,
    pub home_odds: Option<f64>,
    pub draw_odds: Option<f64>,
    pub away_odds: Option<f64>,
}

/// Where a match feed came from. `Fallback` marks the static placeholder
/// set served when every upstream source is empty or down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSource {
    Live,
    Upcoming,
    Recent,
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchFeed {
    pub source: FeedSource,
    pub matches: Vec<LiveMatch>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_provider_status_codes() {
        assert_eq!(MatchStatus::from_provider_code("NS"), MatchStatus::Scheduled);
        assert_eq!(MatchStatus::from_provider_code("1H"), MatchStatus::Live);
        assert_eq!(MatchStatus::from_provider_code("HT"), MatchStatus::Live);
        assert_eq!(
            MatchStatus::from_provider_code("Match Finished"),
            MatchStatus::Finished
        );
        assert_eq!(MatchStatus::from_provider_code("FT"), MatchStatus::Finished);
    }

    #[test]
    fn unknown_codes_are_kept_verbatim() {
        assert_eq!(
            MatchStatus::from_provider_code("SUSP"),
            MatchStatus::Unknown("SUSP".to_string())
        );
        assert!(!MatchStatus::from_provider_code("SUSP").is_finished());
    }
}
