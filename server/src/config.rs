use actix_cors::Cors;
use clap::Parser;
use std::num::NonZeroUsize;
use std::time::Duration;
use system::{AggregationConfig, DEFAULT_POLYGON_THRESHOLD};

#[derive(Debug, Clone, Parser)]
#[command(name = "blueprint-server", about = "Blueprints API and collaborative drawing server")]
pub struct Config {
    /// Address the HTTP server listens on.
    #[arg(long, env = "BLUEPRINTS_BIND", default_value = "127.0.0.1:8080")]
    pub bind: String,

    /// Number of points that closes a polygon.
    #[arg(long, env = "BLUEPRINTS_POLYGON_THRESHOLD", default_value = "4")]
    pub polygon_threshold: NonZeroUsize,

    /// Origins allowed to call the API from a browser.
    #[arg(
        long = "allowed-origin",
        env = "BLUEPRINTS_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:5173,http://192.168.1.14:5173"
    )]
    pub allowed_origins: Vec<String>,

    /// Drop drawing buffers idle for this many seconds. Kept forever when unset.
    #[arg(long, env = "BLUEPRINTS_IDLE_SESSION_TTL_SECS")]
    pub idle_session_ttl_secs: Option<u64>,

    /// How often idle drawing buffers are looked for.
    #[arg(long, env = "BLUEPRINTS_SWEEP_INTERVAL_SECS", default_value_t = 60)]
    pub sweep_interval_secs: u64,

    /// Outbound frames queued per websocket connection before new ones are dropped.
    #[arg(long, env = "BLUEPRINTS_OUTBOUND_QUEUE", default_value_t = 32)]
    pub outbound_queue: usize,
}

impl Config {
    pub fn aggregation_config(&self) -> AggregationConfig {
        AggregationConfig {
            threshold: self.polygon_threshold,
            idle_ttl: self.idle_session_ttl_secs.map(Duration::from_secs),
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }

    pub fn cors(&self) -> Cors {
        self.allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allow_any_header()
            .supports_credentials()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".into(),
            polygon_threshold: NonZeroUsize::new(DEFAULT_POLYGON_THRESHOLD)
                .unwrap_or(NonZeroUsize::MIN),
            allowed_origins: vec![
                "http://localhost:5173".into(),
                "http://192.168.1.14:5173".into(),
            ],
            idle_session_ttl_secs: None,
            sweep_interval_secs: 60,
            outbound_queue: 32,
        }
    }
}
