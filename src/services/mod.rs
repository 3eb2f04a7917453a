pub mod apifootball;
pub mod importer;
pub mod sports_data;
pub mod thesportsdb;

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::sports::{LiveMatch, UpstreamLeague, UpstreamOdds};

/// One third-party sports data provider, normalized to the common
/// match/league records. Adapters return errors; the aggregation layer
/// decides what to do with them.
#[async_trait]
pub trait SportsApi: Send + Sync {
    fn provider(&self) -> &'static str;

    async fn live_matches(&self) -> Result<Vec<LiveMatch>>;

    /// Matches scheduled or played on a given day, "YYYY-MM-DD".
    async fn matches_by_date(&self, date: &str) -> Result<Vec<LiveMatch>>;

    async fn matches_by_league(&self, league_id: &str) -> Result<Vec<LiveMatch>>;

    async fn leagues(&self) -> Result<Vec<UpstreamLeague>>;

    /// Betting odds for one match. Providers without an odds feed
    /// return nothing.
    async fn odds(&self, _match_id: &str) -> Result<Vec<UpstreamOdds>> {
        Ok(Vec::new())
    }
}
