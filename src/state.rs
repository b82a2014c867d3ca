use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::{
    appointments::repo::{AppointmentStore, PgAppointmentStore},
    auth::repo::{PgUserStore, UserStore},
    config::AppConfig,
    enrichment::{DirectionsGateway, EventbriteEvents, EventsGateway, GoogleDirections},
    memory::MemoryStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Present when backed by Postgres; closed on shutdown.
    pub db: Option<PgPool>,
    pub users: Arc<dyn UserStore>,
    pub appointments: Arc<dyn AppointmentStore>,
    pub directions: Arc<dyn DirectionsGateway>,
    pub events: Arc<dyn EventsGateway>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        let http = reqwest::Client::builder()
            .user_agent(concat!("calendar/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        let gateways = &config.gateways;
        let directions = Arc::new(GoogleDirections::new(
            http.clone(),
            gateways.google_maps_base_url.clone(),
            gateways.google_maps_api_key.clone(),
        )) as Arc<dyn DirectionsGateway>;
        let events = Arc::new(EventbriteEvents::new(
            http,
            gateways.eventbrite_base_url.clone(),
            gateways.eventbrite_token.clone(),
        )) as Arc<dyn EventsGateway>;

        match config.database_url.as_deref() {
            Some(url) => {
                let db = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect(url)
                    .await
                    .context("connect to database")?;
                info!(max_connections = config.max_connections, "connected to postgres");
                Ok(Self {
                    users: Arc::new(PgUserStore::new(db.clone())),
                    appointments: Arc::new(PgAppointmentStore::new(db.clone())),
                    db: Some(db),
                    config,
                    directions,
                    events,
                })
            }
            None => {
                warn!("DATABASE_URL not set; using in-memory store, data is lost on exit");
                Ok(Self::in_memory(config, directions, events))
            }
        }
    }

    /// State over a fresh [`MemoryStore`] with the given gateways.
    pub fn in_memory(
        config: Arc<AppConfig>,
        directions: Arc<dyn DirectionsGateway>,
        events: Arc<dyn EventsGateway>,
    ) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            config,
            db: None,
            users: store.clone(),
            appointments: store,
            directions,
            events,
        }
    }

    /// Closes the database pool, if any.
    pub async fn shutdown(&self) {
        if let Some(db) = &self.db {
            db.close().await;
            info!("database connection closed");
        }
    }
}
