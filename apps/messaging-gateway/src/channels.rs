use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use sms_core::{Channel, InMemoryChannelStore};
use tracing::info;

/// Layout of the channels file:
///
/// ```yaml
/// channels:
///   - uuid: 8eb23e93-5ecb-45ba-b726-3b064e0c56ab
///     channel_type: IB
///     address: "2020"
///     country: NG
///     config:
///       username: user
///       password: pass
/// ```
#[derive(Debug, Deserialize)]
pub struct ChannelsFile {
    #[serde(default)]
    pub channels: Vec<Channel>,
}

pub fn parse_channels(raw: &str) -> Result<Vec<Channel>> {
    let file: ChannelsFile = serde_yaml::from_str(raw).context("parsing channels yaml")?;
    Ok(file.channels)
}

pub fn load_channels(path: &Path) -> Result<InMemoryChannelStore> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading channels file {}", path.display()))?;
    let channels =
        parse_channels(&raw).with_context(|| format!("loading channels from {}", path.display()))?;
    info!(count = channels.len(), path = %path.display(), "loaded channels");
    Ok(InMemoryChannelStore::from_channels(channels))
}
