use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const CONFIG_USERNAME: &str = "username";
pub const CONFIG_PASSWORD: &str = "password";
pub const CONFIG_CALLBACK_DOMAIN: &str = "callback_domain";

/// Short uppercase code identifying the gateway a channel talks to, e.g. `IB`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ChannelType(String);

impl ChannelType {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase form used in webhook paths (`/c/ib/...`).
    pub fn path_segment(&self) -> String {
        self.0.to_lowercase()
    }
}

impl From<String> for ChannelType {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<ChannelType> for String {
    fn from(channel_type: ChannelType) -> Self {
        channel_type.0
    }
}

impl Display for ChannelType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A configured connection to one gateway account.
///
/// ```
/// use sms_core::{Channel, ChannelType, CONFIG_USERNAME};
///
/// let channel = Channel::new(ChannelType::new("ib"), "2020")
///     .with_country("NG")
///     .with_config(CONFIG_USERNAME, "user");
/// assert_eq!(channel.channel_type.as_str(), "IB");
/// assert_eq!(channel.string_config(CONFIG_USERNAME), Some("user"));
/// assert_eq!(channel.callback_domain("courier.example.com"), "courier.example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(default = "Uuid::new_v4")]
    pub uuid: Uuid,
    pub channel_type: ChannelType,
    pub address: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
}

impl Channel {
    pub fn new(channel_type: ChannelType, address: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            channel_type,
            address: address.into(),
            country: None,
            config: BTreeMap::new(),
        }
    }

    pub fn with_uuid(mut self, uuid: Uuid) -> Self {
        self.uuid = uuid;
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Config value for `key`; blank values count as unset.
    pub fn string_config(&self, key: &str) -> Option<&str> {
        self.config
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// Domain the gateway should call back on; falls back to the server's domain.
    pub fn callback_domain(&self, default_domain: &str) -> String {
        self.string_config(CONFIG_CALLBACK_DOMAIN)
            .unwrap_or(default_domain)
            .to_string()
    }
}
