use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub rooms: RoomsConfig,
    pub directory: DirectoryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoomsConfig {
    /// Seconds on the countdown clock when a room opens (45 minutes)
    pub default_countdown_secs: u64,

    /// How long token acquisition may take before a join fails
    pub connect_timeout_secs: u64,

    /// Base URL the token service creates rooms under
    pub token_base_url: String,

    /// Simulated token-service latency for the stub provider
    pub token_latency_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    /// Simulated directory lookup latency
    pub lookup_latency_ms: u64,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
