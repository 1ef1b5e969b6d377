use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::channel::Channel;
use crate::channel_log::ChannelLog;
use crate::urn::Urn;

/// Engine-assigned identifier of an outgoing message.
///
/// ```
/// use sms_core::MsgId;
///
/// let id = MsgId::new(10);
/// assert_eq!(id.to_string(), "10");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MsgId(i64);

impl MsgId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for MsgId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Delivery states tracked by the engine, serialized with their single-letter codes.
///
/// ```
/// use sms_core::MsgStatusValue;
///
/// assert_eq!(MsgStatusValue::Wired.code(), "W");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MsgStatusValue {
    #[serde(rename = "S")]
    Sent,
    #[serde(rename = "D")]
    Delivered,
    #[serde(rename = "F")]
    Failed,
    #[serde(rename = "E")]
    Errored,
    #[serde(rename = "W")]
    Wired,
}

impl MsgStatusValue {
    pub fn code(&self) -> &'static str {
        match self {
            MsgStatusValue::Sent => "S",
            MsgStatusValue::Delivered => "D",
            MsgStatusValue::Failed => "F",
            MsgStatusValue::Errored => "E",
            MsgStatusValue::Wired => "W",
        }
    }

    /// Lowercase name used for metric labels and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            MsgStatusValue::Sent => "sent",
            MsgStatusValue::Delivered => "delivered",
            MsgStatusValue::Failed => "failed",
            MsgStatusValue::Errored => "errored",
            MsgStatusValue::Wired => "wired",
        }
    }
}

/// Normalized inbound message received from a gateway webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Msg {
    pub uuid: Uuid,
    pub channel_uuid: Uuid,
    pub urn: Urn,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub received_on: OffsetDateTime,
    pub external_id: Option<String>,
}

impl Msg {
    /// Builds a new incoming message stamped with the current time.
    ///
    /// ```
    /// use sms_core::{Channel, ChannelType, Msg, Urn};
    ///
    /// let channel = Channel::new(ChannelType::new("IB"), "2020");
    /// let msg = Msg::new_incoming(&channel, Urn::tel("+2349067554729"), "hi")
    ///     .with_external_id("ext-1");
    /// assert_eq!(msg.channel_uuid, channel.uuid);
    /// assert_eq!(msg.external_id.as_deref(), Some("ext-1"));
    /// ```
    pub fn new_incoming(channel: &Channel, urn: Urn, text: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            channel_uuid: channel.uuid,
            urn,
            text: text.into(),
            received_on: OffsetDateTime::now_utc(),
            external_id: None,
        }
    }

    pub fn with_received_on(mut self, received_on: OffsetDateTime) -> Self {
        self.received_on = received_on;
        self
    }

    /// Empty identifiers are dropped so downstream dedupe never keys on "".
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        let external_id = external_id.into();
        self.external_id = (!external_id.is_empty()).then_some(external_id);
        self
    }
}

/// Delivery status update for a previously sent message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsgStatus {
    pub channel_uuid: Uuid,
    pub msg_id: MsgId,
    pub status: MsgStatusValue,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<ChannelLog>,
}

impl MsgStatus {
    pub fn new(channel: &Channel, msg_id: MsgId, status: MsgStatusValue) -> Self {
        Self {
            channel_uuid: channel.uuid,
            msg_id,
            status,
            logs: Vec::new(),
        }
    }

    pub fn with_log(mut self, log: ChannelLog) -> Self {
        self.logs.push(log);
        self
    }
}

/// Request to deliver a message through a channel.
#[derive(Debug, Clone)]
pub struct OutgoingMsg {
    pub id: MsgId,
    pub channel: Channel,
    pub urn: Urn,
    pub text: String,
    /// Attachments in `mime:url` form.
    pub attachments: Vec<String>,
}

impl OutgoingMsg {
    pub fn new(id: MsgId, channel: Channel, urn: Urn, text: impl Into<String>) -> Self {
        Self {
            id,
            channel,
            urn,
            text: text.into(),
            attachments: Vec::new(),
        }
    }

    pub fn with_attachment(mut self, attachment: impl Into<String>) -> Self {
        self.attachments.push(attachment.into());
        self
    }

    /// Text followed by one attachment URL per line, the form SMS gateways can carry.
    ///
    /// ```
    /// use sms_core::{Channel, ChannelType, MsgId, OutgoingMsg, Urn};
    ///
    /// let channel = Channel::new(ChannelType::new("IB"), "2020");
    /// let msg = OutgoingMsg::new(MsgId::new(1), channel, Urn::tel("+15551234567"), "look")
    ///     .with_attachment("image/jpeg:https://example.com/cat.jpg");
    /// assert_eq!(msg.text_and_attachments(), "look\nhttps://example.com/cat.jpg");
    /// ```
    pub fn text_and_attachments(&self) -> String {
        let mut out = self.text.clone();
        for attachment in &self.attachments {
            let url = match attachment.split_once(':') {
                Some((mime, url)) if mime.contains('/') => url,
                _ => attachment.as_str(),
            };
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(url);
        }
        out
    }
}

/// Event surfaced to the dispatcher after a receive call.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Msg(Msg),
    Status(MsgStatus),
}

/// Result of handling one inbound webhook call.
#[derive(Debug, Clone, PartialEq)]
pub enum ReceiveOutcome {
    Messages(Vec<Msg>),
    Status(MsgStatus),
    Ignored(String),
}

impl ReceiveOutcome {
    /// The event the dispatcher records for this call: the first message or the status.
    pub fn primary_event(&self) -> Option<Event> {
        match self {
            ReceiveOutcome::Messages(msgs) => msgs.first().cloned().map(Event::Msg),
            ReceiveOutcome::Status(status) => Some(Event::Status(status.clone())),
            ReceiveOutcome::Ignored(_) => None,
        }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, ReceiveOutcome::Ignored(_))
    }
}
