use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::Result;
use crate::models::sports::{LiveMatch, MatchStatus, UpstreamLeague, UpstreamOdds};
use crate::services::SportsApi;

pub const PROVIDER: &str = "apifootball";

const KEY_HEADER: &str = "x-apisports-key";

pub struct ApiFootball {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct FixturesResponse {
    response: Option<Vec<FixtureEntry>>,
}

#[derive(Debug, Deserialize)]
struct FixtureEntry {
    fixture: Fixture,
    league: LeagueInfo,
    teams: Teams,
    goals: Goals,
}

#[derive(Debug, Deserialize)]
struct Fixture {
    id: i64,
    date: Option<String>,
    status: FixtureStatus,
    venue: Option<Venue>,
}

#[derive(Debug, Deserialize)]
struct FixtureStatus {
    short: Option<String>,
    elapsed: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct Venue {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LeagueInfo {
    name: Option<String>,
    logo: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Teams {
    home: TeamInfo,
    away: TeamInfo,
}

#[derive(Debug, Deserialize)]
struct TeamInfo {
    name: Option<String>,
    logo: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Goals {
    home: Option<i32>,
    away: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct LeaguesResponse {
    response: Option<Vec<LeagueEntry>>,
}

#[derive(Debug, Deserialize)]
struct LeagueEntry {
    league: LeagueDetails,
    country: Option<Country>,
}

#[derive(Debug, Deserialize)]
struct LeagueDetails {
    id: i64,
    name: Option<String>,
    logo: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Country {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OddsResponse {
    response: Option<Vec<OddsEntry>>,
}

#[derive(Debug, Deserialize)]
struct OddsEntry {
    bookmakers: Option<Vec<Bookmaker>>,
}

#[derive(Debug, Deserialize)]
struct Bookmaker {
    name: Option<String>,
    bets: Option<Vec<Bet>>,
}

#[derive(Debug, Deserialize)]
struct Bet {
    name: Option<String>,
    values: Option<Vec<BetValue>>,
}

#[derive(Debug, Deserialize)]
struct BetValue {
    value: Option<String>,
    odd: Option<String>,
}

impl ApiFootball {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: "https://v3.football.api-sports.io".to_string(),
            api_key,
        }
    }

    fn normalize(&self, entry: FixtureEntry) -> LiveMatch {
        let status_code = entry.fixture.status.short.unwrap_or_default();
        let elapsed = entry.fixture.status.elapsed.unwrap_or(0);
        LiveMatch {
            id: entry.fixture.id.to_string(),
            home_team: entry.teams.home.name.unwrap_or_default(),
            away_team: entry.teams.away.name.unwrap_or_default(),
            home_score: entry.goals.home,
            away_score: entry.goals.away,
            status: MatchStatus::from_provider_code(&status_code),
            minute: elapsed,
            league: entry.league.name.unwrap_or_default(),
            time: format!("{}'", elapsed),
            date: entry.fixture.date.unwrap_or_default(),
            venue: entry.fixture.venue.and_then(|v| v.name),
            home_logo: entry.teams.home.logo,
            away_logo: entry.teams.away.logo,
            league_logo: entry.league.logo,
        }
    }

    async fn fetch_fixtures(&self, params: &[(&str, &str)]) -> Result<Vec<LiveMatch>> {
        let url = format!("{}/fixtures", self.base_url);
        let response: FixturesResponse = self
            .client
            .get(&url)
            .header(KEY_HEADER, &self.api_key)
            .query(params)
            .send()
            .await?
            .json()
            .await?;
        Ok(response
            .response
            .unwrap_or_default()
            .into_iter()
            .map(|entry| self.normalize(entry))
            .collect())
    }
}

#[async_trait]
impl SportsApi for ApiFootball {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn live_matches(&self) -> Result<Vec<LiveMatch>> {
        self.fetch_fixtures(&[("live", "all")]).await
    }

    async fn matches_by_date(&self, date: &str) -> Result<Vec<LiveMatch>> {
        self.fetch_fixtures(&[("date", date)]).await
    }

    async fn matches_by_league(&self, league_id: &str) -> Result<Vec<LiveMatch>> {
        self.fetch_fixtures(&[("league", league_id), ("season", "2024")])
            .await
    }

    async fn leagues(&self) -> Result<Vec<UpstreamLeague>> {
        let url = format!("{}/leagues", self.base_url);
        let response: LeaguesResponse = self
            .client
            .get(&url)
            .header(KEY_HEADER, &self.api_key)
            .send()
            .await?
            .json()
            .await?;
        Ok(response
            .response
            .unwrap_or_default()
            .into_iter()
            .map(|entry| UpstreamLeague {
                provider: PROVIDER.to_string(),
                id: entry.league.id.to_string(),
                name: entry.league.name.unwrap_or_default(),
                sport: "Football".to_string(),
                country: entry.country.and_then(|c| c.name),
                badge: entry.league.logo,
            })
            .collect())
    }

    async fn odds(&self, match_id: &str) -> Result<Vec<UpstreamOdds>> {
        let url = format!("{}/odds", self.base_url);
        let response: OddsResponse = self
            .client
            .get(&url)
            .header(KEY_HEADER, &self.api_key)
            .query(&[("fixture", match_id)])
            .send()
            .await?
            .json()
            .await?;

        let mut odds = Vec::new();
        for entry in response.response.unwrap_or_default() {
            for bookmaker in entry.bookmakers.unwrap_or_default() {
                let name = bookmaker.name.unwrap_or_default();
                for bet in bookmaker.bets.unwrap_or_default() {
                    let market = bet.name.clone().unwrap_or_default();
                    let mut home = None;
                    let mut draw = None;
                    let mut away = None;
                    for value in bet.values.unwrap_or_default() {
                        let odd = value.odd.as_deref().and_then(|o| o.parse().ok());
                        match value.value.as_deref() {
                            Some("Home") => home = odd,
                            Some("Draw") => draw = odd,
                            Some("Away") => away = odd,
                            _ => {}
                        }
                    }
                    odds.push(UpstreamOdds {
                        bookmaker: name.clone(),
                        market,
                        home_odds: home,
                        draw_odds: draw,
                        away_odds: away,
                    });
                }
            }
        }
        Ok(odds)
    }
}
