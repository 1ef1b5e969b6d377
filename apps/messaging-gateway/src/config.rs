use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use sms_core::DEFAULT_TIMEOUT;
use sms_infobip::DEFAULT_SEND_URL;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub addr: SocketAddr,
    /// Callback domain used when a channel does not configure its own.
    pub domain: String,
    pub channels_file: PathBuf,
    pub infobip_send_url: String,
    pub http_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            domain: "localhost".into(),
            channels_file: PathBuf::from("channels.yaml"),
            infobip_send_url: DEFAULT_SEND_URL.into(),
            http_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from `lookup`; blank values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(bind) = get("BIND") {
            config.addr = bind
                .trim()
                .parse()
                .with_context(|| format!("invalid BIND address '{bind}'"))?;
        }
        if let Some(domain) = get("DOMAIN") {
            config.domain = domain.trim().to_string();
        }
        if let Some(path) = get("CHANNELS_FILE") {
            config.channels_file = PathBuf::from(path);
        }
        if let Some(url) = get("INFOBIP_SEND_URL") {
            config.infobip_send_url = url.trim().to_string();
        }
        if let Some(secs) = get("HTTP_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("invalid HTTP_TIMEOUT_SECS '{secs}'"))?;
            config.http_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
