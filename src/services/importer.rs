use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sqlx::PgPool;

use crate::errors::{AppError, Result};
use crate::models::sports::MatchStatus;

const BASE_URL: &str = "https://v3.football.api-sports.io";
const KEY_HEADER: &str = "x-apisports-key";
const SEASON: &str = "2024";

/// Premier League, La Liga, Serie A, Bundesliga, Ligue 1.
const MAJOR_LEAGUES: [i64; 5] = [39, 140, 135, 78, 61];

pub struct Importer {
    client: Client,
    api_key: String,
    db: PgPool,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    response: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
struct LeagueEntry {
    league: LeagueDetails,
}

#[derive(Debug, Deserialize)]
struct LeagueDetails {
    id: i64,
    name: Option<String>,
    logo: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TeamEntry {
    team: TeamDetails,
}

#[derive(Debug, Deserialize)]
struct TeamDetails {
    id: i64,
    name: Option<String>,
    logo: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FixtureEntry {
    fixture: FixtureDetails,
    league: LeagueDetails,
    teams: FixtureTeams,
    goals: FixtureGoals,
}

#[derive(Debug, Deserialize)]
struct FixtureDetails {
    id: i64,
    date: Option<String>,
    status: FixtureStatus,
    venue: Option<FixtureVenue>,
}

#[derive(Debug, Deserialize)]
struct FixtureStatus {
    short: Option<String>,
    elapsed: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct FixtureVenue {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FixtureTeams {
    home: TeamDetails,
    away: TeamDetails,
}

#[derive(Debug, Deserialize)]
struct FixtureGoals {
    home: Option<i32>,
    away: Option<i32>,
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

fn db_status(code: &str) -> &'static str {
    match MatchStatus::from_provider_code(code) {
        MatchStatus::Live => "live",
        MatchStatus::Finished => "finished",
        _ => "scheduled",
    }
}

impl Importer {
    pub fn new(db: PgPool, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            db,
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let url = format!("{BASE_URL}/{path}");
        let response: ApiResponse<T> = self
            .client
            .get(&url)
            .header(KEY_HEADER, &self.api_key)
            .query(params)
            .send()
            .await?
            .json()
            .await?;
        Ok(response.response.unwrap_or_default())
    }

    pub async fn import_leagues(&self) -> Result<u64> {
        let entries: Vec<LeagueEntry> = self.fetch("leagues", &[]).await?;
        let mut imported = 0;

        for entry in entries {
            if !MAJOR_LEAGUES.contains(&entry.league.id) {
                continue;
            }
            sqlx::query(
                "INSERT INTO leagues (id, name, logo_url)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (id) DO UPDATE SET name = $2, logo_url = $3",
            )
            .bind(entry.league.id)
            .bind(entry.league.name.unwrap_or_default())
            .bind(entry.league.logo)
            .execute(&self.db)
            .await?;
            imported += 1;
        }

        tracing::info!("✅ imported {} leagues", imported);
        Ok(imported)
    }

    pub async fn import_teams(&self) -> Result<u64> {
        let league_ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM leagues ORDER BY id")
            .fetch_all(&self.db)
            .await?;
        let mut imported = 0;

        for league_id in league_ids {
            let entries: Result<Vec<TeamEntry>> = self
                .fetch(
                    "teams",
                    &[
                        ("league", league_id.to_string()),
                        ("season", SEASON.to_string()),
                    ],
                )
                .await;

            let entries = match entries {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::error!("❌ team import failed for league {}: {}", league_id, e);
                    continue;
                }
            };

            for entry in entries {
                self.upsert_team(&entry.team).await?;
                imported += 1;
            }
            tracing::info!("📂 teams imported for league {}", league_id);
        }

        Ok(imported)
    }

    async fn upsert_team(&self, team: &TeamDetails) -> Result<()> {
        sqlx::query(
            "INSERT INTO teams (id, name, logo_url)
             VALUES ($1, $2, $3)
             ON CONFLICT (id) DO UPDATE SET name = $2, logo_url = $3",
        )
        .bind(team.id)
        .bind(team.name.clone().unwrap_or_default())
        .bind(team.logo.clone())
        .execute(&self.db)
        .await?;
        Ok(())
    }

    pub async fn import_matches(&self) -> Result<u64> {
        let mut imported = 0;

        for league_id in MAJOR_LEAGUES {
            let entries: Result<Vec<FixtureEntry>> = self
                .fetch(
                    "fixtures",
                    &[
                        ("league", league_id.to_string()),
                        ("season", SEASON.to_string()),
                    ],
                )
                .await;

            let entries = match entries {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::error!("❌ fixture import failed for league {}: {}", league_id, e);
                    continue;
                }
            };

            for entry in entries {
                match self.upsert_fixture(league_id, &entry).await {
                    Ok(()) => imported += 1,
                    Err(e) => {
                        tracing::error!(
                            "❌ fixture {} skipped: {}",
                            entry.fixture.id,
                            e
                        );
                    }
                }
            }
            tracing::info!("📂 fixtures imported for league {}", league_id);
        }

        Ok(imported)
    }

    async fn upsert_fixture(&self, league_id: i64, entry: &FixtureEntry) -> Result<()> {
        let date = entry
            .fixture
            .date
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
            .map(|d| d.with_timezone(&Utc))
            .ok_or_else(|| AppError::invalid_data("Fixture has no usable date"))?;

        self.upsert_team(&entry.teams.home).await?;
        self.upsert_team(&entry.teams.away).await?;

        let status_code = entry.fixture.status.short.clone().unwrap_or_default();
        sqlx::query(
            "INSERT INTO matches
                 (id, league_id, home_team_id, away_team_id, match_date, status,
                  home_score, away_score, minute, venue)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             ON CONFLICT (id) DO UPDATE SET
                 status = $6, home_score = $7, away_score = $8, minute = $9,
                 updated_at = NOW()",
        )
        .bind(entry.fixture.id)
        .bind(league_id)
        .bind(entry.teams.home.id)
        .bind(entry.teams.away.id)
        .bind(date)
        .bind(db_status(&status_code))
        .bind(entry.goals.home)
        .bind(entry.goals.away)
        .bind(entry.fixture.status.elapsed)
        .bind(entry.fixture.venue.as_ref().and_then(|v| v.name.clone()))
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Match Winner odds for scheduled fixtures. Failures per fixture
    /// are logged and skipped.
    pub async fn import_odds(&self) -> Result<u64> {
        let fixture_ids: Vec<i64> = sqlx::query_scalar(
            "SELECT id FROM matches WHERE status = 'scheduled' ORDER BY match_date ASC",
        )
        .fetch_all(&self.db)
        .await?;
        let mut imported = 0;

        for fixture_id in fixture_ids {
            let entries: Result<Vec<OddsEntry>> = self
                .fetch("odds", &[("fixture", fixture_id.to_string())])
                .await;

            let entries = match entries {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::error!("❌ odds fetch failed for fixture {}: {}", fixture_id, e);
                    continue;
                }
            };

            for entry in entries {
                for bookmaker in entry.bookmakers.unwrap_or_default() {
                    let name = bookmaker.name.clone().unwrap_or_default();
                    for bet in bookmaker.bets.unwrap_or_default() {
                        if bet.name.as_deref() != Some("Match Winner") {
                            continue;
                        }
                        self.upsert_odds(fixture_id, &name, &bet).await?;
                        imported += 1;
                    }
                }
            }
        }

        Ok(imported)
    }

    async fn upsert_odds(&self, fixture_id: i64, bookmaker: &str, bet: &Bet) -> Result<()> {
        let mut home = None;
        let mut draw = None;
        let mut away = None;

        for value in bet.values.as_deref().unwrap_or_default() {
            let odd = value.odd.as_deref().and_then(|o| o.parse::<f64>().ok());
            match value.value.as_deref() {
                Some("Home") => home = odd,
                Some("Draw") => draw = odd,
                Some("Away") => away = odd,
                _ => {}
            }
        }

        sqlx::query(
            "INSERT INTO betting_odds
                 (match_id, bookmaker, market, home_odds, draw_odds, away_odds, last_update)
             VALUES ($1, $2, 'match_winner', $3, $4, $5, NOW())
             ON CONFLICT (match_id, bookmaker, market) DO UPDATE SET
                 home_odds = $3, draw_odds = $4, away_odds = $5, last_update = NOW()",
        )
        .bind(fixture_id)
        .bind(bookmaker)
        .bind(home)
        .bind(draw)
        .bind(away)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}
