// Multi-source match data aggregation. Fans out to every enabled
// provider, merges in adapter order, and hides individual provider
// failures from callers.
use std::collections::HashSet;

use chrono::{Duration, Utc};

use crate::config::AppConfig;
use crate::models::sports::{
    FeedSource, LiveMatch, MatchFeed, MatchStatus, UpstreamLeague, UpstreamOdds,
};
use crate::services::apifootball::ApiFootball;
use crate::services::thesportsdb::TheSportsDb;
use crate::services::SportsApi;

pub struct SportsDataService {
    adapters: Vec<Box<dyn SportsApi>>,
    league_name_merge: bool,
}

impl SportsDataService {
    pub fn from_config(config: &AppConfig) -> Self {
        let mut adapters: Vec<Box<dyn SportsApi>> =
            vec![Box::new(TheSportsDb::new(config.thesportsdb_api_key.clone()))];

        if let Some(key) = &config.api_football_key {
            adapters.push(Box::new(ApiFootball::new(key.clone())));
            tracing::info!("API-Football adapter enabled");
        } else {
            tracing::info!("API_FOOTBALL_KEY not set, running with TheSportsDB only");
        }

        Self {
            adapters,
            league_name_merge: config.league_name_merge,
        }
    }

    pub fn new(adapters: Vec<Box<dyn SportsApi>>, league_name_merge: bool) -> Self {
        Self {
            adapters,
            league_name_merge,
        }
    }

    pub fn adapter_count(&self) -> usize {
        self.adapters.len()
    }

    pub async fn live_matches(&self) -> Vec<LiveMatch> {
        let results =
            futures::future::join_all(self.adapters.iter().map(|a| a.live_matches())).await;

        let mut matches = Vec::new();
        for (adapter, result) in self.adapters.iter().zip(results) {
            match result {
                Ok(batch) => {
                    tracing::info!("{} returned {} live matches", adapter.provider(), batch.len());
                    matches.extend(batch);
                }
                Err(e) => {
                    tracing::warn!("{} failed to load live matches: {}", adapter.provider(), e);
                }
            }
        }

        let unique = dedupe_matches(matches);
        tracing::info!("{} live matches after dedup", unique.len());
        unique
    }

    /// Matches scheduled for today.
    pub async fn upcoming_matches(&self) -> Vec<LiveMatch> {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let results =
            futures::future::join_all(self.adapters.iter().map(|a| a.matches_by_date(&today)))
                .await;

        let mut matches = Vec::new();
        for (adapter, result) in self.adapters.iter().zip(results) {
            match result {
                Ok(batch) => {
                    tracing::info!(
                        "{} returned {} upcoming matches",
                        adapter.provider(),
                        batch.len()
                    );
                    matches.extend(batch);
                }
                Err(e) => {
                    tracing::warn!(
                        "{} failed to load upcoming matches: {}",
                        adapter.provider(),
                        e
                    );
                }
            }
        }

        dedupe_matches(matches)
    }

    /// Yesterday's matches, narrowed to finished ones after the merge.
    pub async fn recent_matches(&self) -> Vec<LiveMatch> {
        let yesterday = (Utc::now() - Duration::days(1))
            .format("%Y-%m-%d")
            .to_string();
        let results =
            futures::future::join_all(self.adapters.iter().map(|a| a.matches_by_date(&yesterday)))
                .await;

        let mut matches = Vec::new();
        for (adapter, result) in self.adapters.iter().zip(results) {
            match result {
                Ok(batch) => {
                    tracing::info!(
                        "{} returned {} recent matches",
                        adapter.provider(),
                        batch.len()
                    );
                    matches.extend(batch.into_iter().filter(|m| m.status.is_finished()));
                }
                Err(e) => {
                    tracing::warn!("{} failed to load recent matches: {}", adapter.provider(), e);
                }
            }
        }

        dedupe_matches(matches)
    }

    pub async fn matches_by_league(&self, league_id: &str) -> Vec<LiveMatch> {
        let results =
            futures::future::join_all(self.adapters.iter().map(|a| a.matches_by_league(league_id)))
                .await;

        let mut matches = Vec::new();
        for (adapter, result) in self.adapters.iter().zip(results) {
            match result {
                Ok(batch) => matches.extend(batch),
                Err(e) => {
                    tracing::warn!(
                        "{} failed to load league {} matches: {}",
                        adapter.provider(),
                        league_id,
                        e
                    );
                }
            }
        }

        dedupe_matches(matches)
    }

    pub async fn leagues(&self) -> Vec<UpstreamLeague> {
        let results = futures::future::join_all(self.adapters.iter().map(|a| a.leagues())).await;

        let mut leagues = Vec::new();
        for (adapter, result) in self.adapters.iter().zip(results) {
            match result {
                Ok(batch) => {
                    tracing::info!("{} returned {} leagues", adapter.provider(), batch.len());
                    leagues.extend(batch);
                }
                Err(e) => {
                    tracing::warn!("{} failed to load leagues: {}", adapter.provider(), e);
                }
            }
        }

        if self.league_name_merge {
            dedupe_leagues_by_name(leagues)
        } else {
            dedupe_leagues_by_key(leagues)
        }
    }

    /// Odds for one match, from the first provider that has any.
    /// Providers without an odds feed contribute nothing; failures are
    /// logged and skipped like everywhere else.
    pub async fn match_odds(&self, match_id: &str) -> Vec<UpstreamOdds> {
        let results =
            futures::future::join_all(self.adapters.iter().map(|a| a.odds(match_id))).await;

        for (adapter, result) in self.adapters.iter().zip(results) {
            match result {
                Ok(batch) if !batch.is_empty() => {
                    tracing::info!(
                        "{} returned {} odds entries for match {}",
                        adapter.provider(),
                        batch.len(),
                        match_id
                    );
                    return batch;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("{} failed to load odds: {}", adapter.provider(), e);
                }
            }
        }

        Vec::new()
    }

    /// Priority chain: live, then today's schedule, then yesterday's
    /// results, then the static placeholder set. Always returns a
    /// non-empty, provenance-tagged feed.
    pub async fn live_feed(&self) -> MatchFeed {
        let live = self.live_matches().await;
        if !live.is_empty() {
            return MatchFeed {
                source: FeedSource::Live,
                matches: live,
            };
        }

        let upcoming = self.upcoming_matches().await;
        if !upcoming.is_empty() {
            return MatchFeed {
                source: FeedSource::Upcoming,
                matches: upcoming,
            };
        }

        let recent = self.recent_matches().await;
        if !recent.is_empty() {
            return MatchFeed {
                source: FeedSource::Recent,
                matches: recent,
            };
        }

        tracing::warn!("all upstream sources empty, serving fallback match data");
        MatchFeed {
            source: FeedSource::Fallback,
            matches: fallback_matches(),
        }
    }
}

/// First occurrence of each match id wins, regardless of freshness or
/// completeness. Ids are provider-scoped, so this is an approximation
/// for cross-provider duplicates.
pub fn dedupe_matches(matches: Vec<LiveMatch>) -> Vec<LiveMatch> {
    let mut seen = HashSet::new();
    matches
        .into_iter()
        .filter(|m| seen.insert(m.id.clone()))
        .collect()
}

/// Default league dedup: provider-qualified key, so same-named leagues
/// from different providers stay distinct.
pub fn dedupe_leagues_by_key(leagues: Vec<UpstreamLeague>) -> Vec<UpstreamLeague> {
    let mut seen = HashSet::new();
    leagues
        .into_iter()
        .filter(|l| seen.insert((l.provider.clone(), l.id.clone())))
        .collect()
}

/// Opt-in heuristic merge across providers by display name. Distinct
/// leagues sharing a name will collapse into one.
pub fn dedupe_leagues_by_name(leagues: Vec<UpstreamLeague>) -> Vec<UpstreamLeague> {
    let mut seen = HashSet::new();
    leagues
        .into_iter()
        .filter(|l| seen.insert(l.name.clone()))
        .collect()
}

/// Static placeholder matches for development and demo environments.
/// Only ever served inside a feed tagged `FeedSource::Fallback`.
pub fn fallback_matches() -> Vec<LiveMatch> {
    vec![
        LiveMatch {
            id: "1".to_string(),
            home_team: "Manchester United".to_string(),
            away_team: "Liverpool".to_string(),
            home_score: Some(2),
            away_score: Some(1),
            status: MatchStatus::Live,
            minute: 67,
            league: "Premier League".to_string(),
            time: "67'".to_string(),
            date: String::new(),
            venue: None,
            home_logo: None,
            away_logo: None,
            league_logo: None,
        },
        LiveMatch {
            id: "2".to_string(),
            home_team: "Barcelona".to_string(),
            away_team: "Real Madrid".to_string(),
            home_score: Some(1),
            away_score: Some(1),
            status: MatchStatus::Live,
            minute: 54,
            league: "La Liga".to_string(),
            time: "54'".to_string(),
            date: String::new(),
            venue: None,
            home_logo: None,
            away_logo: None,
            league_logo: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use async_trait::async_trait;

    struct FakeAdapter {
        name: &'static str,
        matches: Vec<LiveMatch>,
        leagues: Vec<UpstreamLeague>,
        odds: Vec<UpstreamOdds>,
        fail: bool,
    }

    impl FakeAdapter {
        fn with_matches(name: &'static str, matches: Vec<LiveMatch>) -> Self {
            Self {
                name,
                matches,
                leagues: Vec::new(),
                odds: Vec::new(),
                fail: false,
            }
        }

        fn with_leagues(name: &'static str, leagues: Vec<UpstreamLeague>) -> Self {
            Self {
                name,
                matches: Vec::new(),
                leagues,
                odds: Vec::new(),
                fail: false,
            }
        }

        fn with_odds(name: &'static str, odds: Vec<UpstreamOdds>) -> Self {
            Self {
                name,
                matches: Vec::new(),
                leagues: Vec::new(),
                odds,
                fail: false,
            }
        }

        fn failing(name: &'static str) -> Self {
            Self {
                name,
                matches: Vec::new(),
                leagues: Vec::new(),
                odds: Vec::new(),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl SportsApi for FakeAdapter {
        fn provider(&self) -> &'static str {
            self.name
        }

        async fn live_matches(&self) -> crate::errors::Result<Vec<LiveMatch>> {
            if self.fail {
                return Err(AppError::external_api("provider down"));
            }
            Ok(self.matches.clone())
        }

        async fn matches_by_date(&self, _date: &str) -> crate::errors::Result<Vec<LiveMatch>> {
            self.live_matches().await
        }

        async fn matches_by_league(
            &self,
            _league_id: &str,
        ) -> crate::errors::Result<Vec<LiveMatch>> {
            self.live_matches().await
        }

        async fn leagues(&self) -> crate::errors::Result<Vec<UpstreamLeague>> {
            if self.fail {
                return Err(AppError::external_api("provider down"));
            }
            Ok(self.leagues.clone())
        }

        async fn odds(&self, _match_id: &str) -> crate::errors::Result<Vec<UpstreamOdds>> {
            if self.fail {
                return Err(AppError::external_api("provider down"));
            }
            Ok(self.odds.clone())
        }
    }

    fn m(id: &str, status: MatchStatus) -> LiveMatch {
        LiveMatch {
            id: id.to_string(),
            home_team: format!("home-{}", id),
            away_team: format!("away-{}", id),
            home_score: Some(0),
            away_score: Some(0),
            status,
            minute: 10,
            league: "Test League".to_string(),
            time: "10'".to_string(),
            date: "2026-01-01".to_string(),
            venue: None,
            home_logo: None,
            away_logo: None,
            league_logo: None,
        }
    }

    fn l(provider: &str, id: &str, name: &str) -> UpstreamLeague {
        UpstreamLeague {
            provider: provider.to_string(),
            id: id.to_string(),
            name: name.to_string(),
            sport: "Football".to_string(),
            country: None,
            badge: None,
        }
    }

    #[tokio::test]
    async fn first_adapter_wins_on_duplicate_ids() {
        // Adapter A says match 1 is live, adapter B says it already
        // finished and adds match 2. A's copy must win.
        let a = FakeAdapter::with_matches("a", vec![m("1", MatchStatus::Live)]);
        let b = FakeAdapter::with_matches(
            "b",
            vec![m("1", MatchStatus::Finished), m("2", MatchStatus::Live)],
        );
        let service = SportsDataService::new(vec![Box::new(a), Box::new(b)], false);

        let merged = service.live_matches().await;
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, "1");
        assert_eq!(merged[0].status, MatchStatus::Live);
        assert_eq!(merged[1].id, "2");
    }

    #[tokio::test]
    async fn adapter_failure_does_not_abort_aggregation() {
        let a = FakeAdapter::failing("a");
        let b = FakeAdapter::with_matches("b", vec![m("7", MatchStatus::Live)]);
        let service = SportsDataService::new(vec![Box::new(a), Box::new(b)], false);

        let merged = service.live_matches().await;
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, "7");
    }

    #[tokio::test]
    async fn feed_falls_back_when_everything_is_empty() {
        let a = FakeAdapter::failing("a");
        let b = FakeAdapter::with_matches("b", vec![]);
        let service = SportsDataService::new(vec![Box::new(a), Box::new(b)], false);

        let feed = service.live_feed().await;
        assert_eq!(feed.source, FeedSource::Fallback);
        assert!(!feed.matches.is_empty());
    }

    #[tokio::test]
    async fn feed_tags_live_data_as_live() {
        let a = FakeAdapter::with_matches("a", vec![m("1", MatchStatus::Live)]);
        let service = SportsDataService::new(vec![Box::new(a)], false);

        let feed = service.live_feed().await;
        assert_eq!(feed.source, FeedSource::Live);
        assert_eq!(feed.matches.len(), 1);
    }

    #[tokio::test]
    async fn recent_matches_keeps_only_finished_games() {
        let a = FakeAdapter::with_matches(
            "a",
            vec![m("1", MatchStatus::Finished), m("2", MatchStatus::Live)],
        );
        let service = SportsDataService::new(vec![Box::new(a)], false);

        let recent = service.recent_matches().await;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, "1");
    }

    #[tokio::test]
    async fn leagues_keep_provider_qualified_duplicates_by_default() {
        let a = FakeAdapter::with_leagues("a", vec![l("a", "10", "Premier League")]);
        let b = FakeAdapter::with_leagues("b", vec![l("b", "39", "Premier League")]);
        let service = SportsDataService::new(vec![Box::new(a), Box::new(b)], false);

        let leagues = service.leagues().await;
        assert_eq!(leagues.len(), 2);
    }

    #[tokio::test]
    async fn league_name_merge_collapses_same_name() {
        let a = FakeAdapter::with_leagues("a", vec![l("a", "10", "Premier League")]);
        let b = FakeAdapter::with_leagues("b", vec![l("b", "39", "Premier League")]);
        let service = SportsDataService::new(vec![Box::new(a), Box::new(b)], true);

        let leagues = service.leagues().await;
        assert_eq!(leagues.len(), 1);
        assert_eq!(leagues[0].provider, "a");
    }

    fn o(bookmaker: &str) -> UpstreamOdds {
        UpstreamOdds {
            bookmaker: bookmaker.to_string(),
            market: "Match Winner".to_string(),
            home_odds: Some(1.8),
            draw_odds: Some(3.4),
            away_odds: Some(4.2),
        }
    }

    #[tokio::test]
    async fn odds_come_from_the_first_provider_that_has_any() {
        let a = FakeAdapter::with_matches("a", vec![]);
        let b = FakeAdapter::with_odds("b", vec![o("Bet365")]);
        let service = SportsDataService::new(vec![Box::new(a), Box::new(b)], false);

        let odds = service.match_odds("99").await;
        assert_eq!(odds.len(), 1);
        assert_eq!(odds[0].bookmaker, "Bet365");
    }

    #[tokio::test]
    async fn odds_failure_falls_through_to_the_next_provider() {
        let a = FakeAdapter::failing("a");
        let b = FakeAdapter::with_odds("b", vec![o("Bet365")]);
        let service = SportsDataService::new(vec![Box::new(a), Box::new(b)], false);

        let odds = service.match_odds("99").await;
        assert_eq!(odds.len(), 1);

        let service = SportsDataService::new(vec![Box::new(FakeAdapter::failing("a"))], false);
        assert!(service.match_odds("99").await.is_empty());
    }

    #[tokio::test]
    async fn league_matches_merge_across_adapters_first_wins() {
        let a = FakeAdapter::with_matches("a", vec![m("1", MatchStatus::Live)]);
        let b = FakeAdapter::with_matches(
            "b",
            vec![m("1", MatchStatus::Finished), m("2", MatchStatus::Live)],
        );
        let service = SportsDataService::new(vec![Box::new(a), Box::new(b)], false);

        let merged = service.matches_by_league("39").await;
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].status, MatchStatus::Live);
    }

    #[test]
    fn dedupe_is_stable_within_one_provider() {
        let matches = vec![
            m("1", MatchStatus::Live),
            m("1", MatchStatus::Live),
            m("3", MatchStatus::Live),
            m("1", MatchStatus::Finished),
        ];
        let unique = dedupe_matches(matches);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].id, "1");
        assert_eq!(unique[0].status, MatchStatus::Live);
        assert_eq!(unique[1].id, "3");
    }
}
