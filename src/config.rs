use std::env;
use url::Url;

/// Default outbound User-Agent presented to origins when neither the
/// query string nor the inbound client request supplies one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/139.0.0.0 Safari/537.36";

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    /// Externally visible scheme+host the proxy is reachable at; every
    /// rewritten manifest reference is built on top of this.
    pub base_url: String,
    pub is_dev: bool,
    /// Built-in outbound Referer fallback
    pub default_referer: Option<String>,
    /// Built-in outbound User-Agent fallback
    pub default_user_agent: Option<String>,
    /// Outbound connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Outbound between-chunk read timeout in seconds. Bounds hung live
    /// origins without capping the total duration of long segment streams.
    pub read_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    /// In DEV mode, provides sensible defaults. In PROD mode, PORT and
    /// BASE_URL are required.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Check if running in dev mode
        let is_dev = env::var("DEV_MODE")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);

        // Port: required in prod, defaults to 3000 in dev
        let port = if is_dev {
            env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?
        } else {
            env::var("PORT")
                .map_err(|_| "PORT is required in production")?
                .parse()?
        };

        // Base URL: required in prod, defaults to localhost in dev
        let base_url = if is_dev {
            env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
        } else {
            env::var("BASE_URL").map_err(|_| "BASE_URL is required in production")?
        };

        // Rewritten URLs are derived from BASE_URL, so it must parse up front
        Url::parse(&base_url)
            .map_err(|_| format!("BASE_URL is not a valid absolute URL: {base_url}"))?;

        let default_referer = env::var("DEFAULT_REFERER").ok();

        let default_user_agent = Some(
            env::var("DEFAULT_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
        );

        let connect_timeout_secs: u64 = env::var("CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        let read_timeout_secs: u64 = env::var("READ_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        Ok(Config {
            port,
            base_url,
            is_dev,
            default_referer,
            default_user_agent,
            connect_timeout_secs,
            read_timeout_secs,
        })
    }
}
