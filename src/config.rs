use anyhow::Context;
use serde::Deserialize;
use time::{macros::format_description, UtcOffset};

pub const DEFAULT_GOOGLE_MAPS_BASE_URL: &str = "https://maps.googleapis.com/maps/api";
pub const DEFAULT_EVENTBRITE_BASE_URL: &str = "https://www.eventbriteapi.com/v3";

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub google_maps_base_url: String,
    pub google_maps_api_key: Option<String>,
    pub eventbrite_base_url: String,
    pub eventbrite_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            google_maps_base_url: DEFAULT_GOOGLE_MAPS_BASE_URL.into(),
            google_maps_api_key: None,
            eventbrite_base_url: DEFAULT_EVENTBRITE_BASE_URL.into(),
            eventbrite_token: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// Offset that defines "local midnight" for day queries.
    pub calendar_offset: UtcOffset,
    pub gateways: GatewayConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            database_url: None,
            max_connections: 10,
            calendar_offset: UtcOffset::UTC,
            gateways: GatewayConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let port = match std::env::var("PORT").or_else(|_| std::env::var("APP_PORT")) {
            Ok(v) => v.parse::<u16>().with_context(|| format!("invalid port {v:?}"))?,
            Err(_) => defaults.port,
        };

        let calendar_offset = match std::env::var("CALENDAR_UTC_OFFSET") {
            Ok(v) => parse_offset(&v)?,
            Err(_) => defaults.calendar_offset,
        };

        let gateways = GatewayConfig {
            google_maps_base_url: std::env::var("GOOGLE_MAPS_BASE_URL")
                .unwrap_or(defaults.gateways.google_maps_base_url),
            google_maps_api_key: std::env::var("GOOGLE_MAPS_API_KEY").ok(),
            eventbrite_base_url: std::env::var("EVENTBRITE_BASE_URL")
                .unwrap_or(defaults.gateways.eventbrite_base_url),
            eventbrite_token: std::env::var("EVENTBRITE_TOKEN").ok(),
        };

        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or(defaults.host),
            port,
            database_url: std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(defaults.max_connections),
            calendar_offset,
            gateways,
        })
    }
}

/// Parses `+HH:MM` / `-HH:MM`.
pub fn parse_offset(raw: &str) -> anyhow::Result<UtcOffset> {
    let format = format_description!("[offset_hour sign:mandatory]:[offset_minute]");
    UtcOffset::parse(raw.trim(), &format)
        .with_context(|| format!("invalid CALENDAR_UTC_OFFSET {raw:?}, expected +HH:MM"))
}
