use crate::{config::Config, fetch::HeaderDefaults};
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Shared HTTP client for connection pooling
    pub http_client: Client,
    /// Absolute URL of the proxy's rewrite route, derived from BASE_URL
    pub proxy_endpoint: Url,
    /// Outbound header fallbacks for the fetch dispatcher
    pub header_defaults: HeaderDefaults,
    /// Process start, for the health endpoint
    pub started_at: Instant,
}

impl AppState {
    /// Create a new AppState with the given configuration
    pub fn new(config: Config) -> Self {
        let http_client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            // Between-chunk timeout: bounds hung live origins without
            // capping long-running segment downloads
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        let proxy_endpoint = Url::parse(&config.base_url)
            .and_then(|base| base.join("/proxy"))
            .expect("BASE_URL validated at config load");

        let header_defaults = HeaderDefaults {
            referer: config.default_referer.clone(),
            user_agent: config.default_user_agent.clone(),
        };

        Self {
            config: Arc::new(config),
            http_client,
            proxy_endpoint,
            header_defaults,
            started_at: Instant::now(),
        }
    }
}
