// config.rs
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub thesportsdb_api_key: String,
    pub api_football_key: Option<String>,
    pub allowed_origins: Vec<String>,
    pub rate_limit_window_ms: u64,
    pub rate_limit_max_requests: u32,
    pub admin_user_id: i64,
    pub league_name_merge: bool,
    pub port: u16,
    pub host: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        AppConfig {
            database_url: env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET")
                .expect("JWT_SECRET must be set"),
            // The free TheSportsDB plan uses "1" as its key
            thesportsdb_api_key: env::var("THESPORTSDB_API_KEY")
                .unwrap_or_else(|_| "1".to_string()),
            api_football_key: env::var("API_FOOTBALL_KEY").ok(),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            rate_limit_window_ms: env::var("RATE_LIMIT_WINDOW_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15 * 60 * 1000),
            rate_limit_max_requests: env::var("RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            admin_user_id: env::var("ADMIN_USER_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            // Cross-provider league merge by display name is heuristic and
            // can collapse distinct leagues, so it is opt-in.
            league_name_merge: env::var("LEAGUE_NAME_MERGE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .expect("PORT must be a number"),
            host: env::var("HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
        }
    }
}
