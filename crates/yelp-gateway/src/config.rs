use anyhow::{bail, Context, Result};
use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_API_HOST: &str = "https://api.yelp.com";

#[derive(Clone)]
pub struct Config {
    pub bind_address: String,
    pub yelp_api_host: String,
    pub yelp_api_key: String,
    pub yelp_timeout: Duration,
    pub otlp_endpoint: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            yelp_api_host: env::var("YELP_API_HOST").unwrap_or_else(|_| DEFAULT_API_HOST.into()),
            yelp_api_key: env::var("YELP_API_KEY").context("YELP_API_KEY required")?,
            yelp_timeout: parse_timeout(
                &env::var("YELP_TIMEOUT_SECS").unwrap_or_else(|_| "10".into()),
            )
            .context("invalid YELP_TIMEOUT_SECS")?,
            otlp_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok(),
        })
    }
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{:?} is not a whole number of seconds", raw))?;
    if secs == 0 {
        bail!("timeout must be at least one second");
    }
    Ok(Duration::from_secs(secs))
}

// The key ends up in logs otherwise.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("yelp_api_host", &self.yelp_api_host)
            .field("yelp_api_key", &"<redacted>")
            .field("yelp_timeout", &self.yelp_timeout)
            .field("otlp_endpoint", &self.otlp_endpoint)
            .finish()
    }
}
