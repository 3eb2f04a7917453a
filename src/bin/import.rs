use anyhow::{bail, Context};

use livescore_api::config::AppConfig;
use livescore_api::database::connection::get_db_pool;
use livescore_api::services::importer::Importer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let entity = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "all".to_string());

    let config = AppConfig::from_env();
    let api_key = config
        .api_football_key
        .clone()
        .context("API_FOOTBALL_KEY must be set to run the importer")?;

    let db = get_db_pool(&config.database_url).await?;
    let importer = Importer::new(db, api_key);

    match entity.as_str() {
        "leagues" => {
            importer.import_leagues().await?;
        }
        "teams" => {
            importer.import_teams().await?;
        }
        "matches" => {
            importer.import_matches().await?;
        }
        "odds" => {
            importer.import_odds().await?;
        }
        "all" => {
            importer.import_leagues().await?;
            importer.import_teams().await?;
            importer.import_matches().await?;
            importer.import_odds().await?;
        }
        other => bail!("unknown entity '{}', expected leagues|teams|matches|odds|all", other),
    }

    tracing::info!("✅ import finished");
    Ok(())
}
