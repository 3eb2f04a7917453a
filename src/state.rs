use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::realtime::Hub;
use crate::services::sports_data::SportsDataService;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub sports: Arc<SportsDataService>,
    pub hub: Arc<Hub>,
}

impl AppState {
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let sports = Arc::new(SportsDataService::from_config(&config));
        AppState {
            db,
            config: Arc::new(config),
            sports,
            hub: Arc::new(Hub::new()),
        }
    }
}
