use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::Result;
use crate::models::sports::{LiveMatch, MatchStatus, UpstreamLeague};
use crate::services::SportsApi;

pub const PROVIDER: &str = "thesportsdb";

pub struct TheSportsDb {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct EventsResponse {
    events: Option<Vec<Event>>,
}

#[derive(Debug, Deserialize)]
struct Event {
    #[serde(rename = "idEvent")]
    id_event: String,
    #[serde(rename = "strHomeTeam")]
    str_home_team: Option<String>,
    #[serde(rename = "strAwayTeam")]
    str_away_team: Option<String>,
    #[serde(rename = "intHomeScore")]
    int_home_score: Option<String>,
    #[serde(rename = "intAwayScore")]
    int_away_score: Option<String>,
    #[serde(rename = "strStatus")]
    str_status: Option<String>,
    #[serde(rename = "strLeague")]
    str_league: Option<String>,
    #[serde(rename = "strTime")]
    str_time: Option<String>,
    #[serde(rename = "dateEvent")]
    date_event: Option<String>,
    #[serde(rename = "strVenue")]
    str_venue: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LeaguesResponse {
    leagues: Option<Vec<LeagueEntry>>,
}

#[derive(Debug, Deserialize)]
struct LeagueEntry {
    #[serde(rename = "idLeague")]
    id_league: String,
    #[serde(rename = "strLeague")]
    str_league: Option<String>,
    #[serde(rename = "strSport")]
    str_sport: Option<String>,
    #[serde(rename = "strCountry")]
    str_country: Option<String>,
    #[serde(rename = "strBadge")]
    str_badge: Option<String>,
}

impl TheSportsDb {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: "https://www.thesportsdb.com/api/v1/json".to_string(),
            api_key,
        }
    }

    fn normalize(&self, event: Event) -> LiveMatch {
        let status_code = event.str_status.unwrap_or_default();
        let time = event.str_time.unwrap_or_default();
        LiveMatch {
            id: event.id_event,
            home_team: event.str_home_team.unwrap_or_default(),
            away_team: event.str_away_team.unwrap_or_default(),
            home_score: event.int_home_score.and_then(|s| s.parse().ok()),
            away_score: event.int_away_score.and_then(|s| s.parse().ok()),
            status: MatchStatus::from_provider_code(&status_code),
            minute: extract_minute(&time),
            league: event.str_league.unwrap_or_default(),
            time,
            date: event.date_event.unwrap_or_default(),
            venue: event.str_venue,
            home_logo: None,
            away_logo: None,
            league_logo: None,
        }
    }

    async fn fetch_events(&self, path_and_query: &str) -> Result<Vec<LiveMatch>> {
        let url = format!("{}/{}/{}", self.base_url, self.api_key, path_and_query);
        let response: EventsResponse = self.client.get(&url).send().await?.json().await?;
        Ok(response
            .events
            .unwrap_or_default()
            .into_iter()
            .map(|e| self.normalize(e))
            .collect())
    }
}

/// Pulls the minute out of TheSportsDB time strings like "67'".
fn extract_minute(time: &str) -> i32 {
    time.split('\'')
        .next()
        .and_then(|prefix| {
            let digits: String = prefix.chars().filter(|c| c.is_ascii_digit()).collect();
            if time.contains('\'') {
                digits.parse().ok()
            } else {
                None
            }
        })
        .unwrap_or(0)
}

#[async_trait]
impl SportsApi for TheSportsDb {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn live_matches(&self) -> Result<Vec<LiveMatch>> {
        self.fetch_events("livescore.php").await
    }

    async fn matches_by_date(&self, date: &str) -> Result<Vec<LiveMatch>> {
        self.fetch_events(&format!("eventsday.php?d={}", date)).await
    }

    async fn matches_by_league(&self, league_id: &str) -> Result<Vec<LiveMatch>> {
        self.fetch_events(&format!("eventsnextleague.php?id={}", league_id))
            .await
    }

    async fn leagues(&self) -> Result<Vec<UpstreamLeague>> {
        let url = format!("{}/{}/all_leagues.php", self.base_url, self.api_key);
        let response: LeaguesResponse = self.client.get(&url).send().await?.json().await?;
        Ok(response
            .leagues
            .unwrap_or_default()
            .into_iter()
            .map(|league| UpstreamLeague {
                provider: PROVIDER.to_string(),
                id: league.id_league,
                name: league.str_league.unwrap_or_default(),
                sport: league.str_sport.unwrap_or_default(),
                country: league.str_country,
                badge: league.str_badge,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_minute_from_time_string() {
        assert_eq!(extract_minute("67'"), 67);
        assert_eq!(extract_minute("5'"), 5);
        assert_eq!(extract_minute("90'+4"), 90);
    }

    #[test]
    fn minute_defaults_to_zero_without_tick() {
        assert_eq!(extract_minute(""), 0);
        assert_eq!(extract_minute("20:45"), 0);
        assert_eq!(extract_minute("Half Time"), 0);
    }
}
