//! Infobip wire shapes.
//!
//! Decoding happens in two steps: serde parses into permissive raw structs (so that a type
//! mismatch is a parse error), then required fields are checked and the validated batch
//! types are built (so that a missing field is a validation error).

use serde::{Deserialize, Serialize};
use sms_core::{MsgId, OutgoingMsg, ReceiveError};

/// Validated inbound message batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundBatch {
    pub message_count: i64,
    pub pending_message_count: i64,
    pub results: Vec<InboundRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRecord {
    pub message_id: Option<String>,
    pub from: String,
    pub text: String,
    pub received_at: Option<String>,
}

/// Validated delivery report batch. Only the first record is carried; the wire format
/// allows more but they are not consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBatch {
    pub first: StatusRecord,
    pub ignored_records: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    pub message_id: MsgId,
    pub group_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInboundEnvelope {
    #[serde(default)]
    message_count: i64,
    #[serde(default)]
    pending_message_count: i64,
    #[serde(default)]
    results: Option<Vec<RawInboundMessage>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInboundMessage {
    #[serde(default)]
    message_id: Option<RawId>,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    received_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawStatusEnvelope {
    #[serde(default)]
    results: Option<Vec<RawStatus>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStatus {
    #[serde(default)]
    message_id: Option<RawId>,
    #[serde(default)]
    status: Option<RawStatusGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStatusGroup {
    #[serde(default)]
    group_name: Option<String>,
}

/// Identifiers show up both as JSON numbers and as strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

/// Decodes an inbound message webhook body.
///
/// ```
/// use sms_infobip::codec::decode_inbound;
///
/// let batch = decode_inbound(br#"{"messageCount":1,"results":[{"from":"385916242493","text":"hello"}]}"#).unwrap();
/// assert_eq!(batch.results[0].from, "385916242493");
/// ```
pub fn decode_inbound(body: &[u8]) -> Result<InboundBatch, ReceiveError> {
    let raw: RawInboundEnvelope = serde_json::from_slice(body)?;
    let results = raw
        .results
        .ok_or_else(|| ReceiveError::validation("results is required"))?;

    let results = results
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            let from = record
                .from
                .filter(|from| !from.trim().is_empty())
                .ok_or_else(|| ReceiveError::validation(format!("results[{idx}].from is required")))?;
            Ok(InboundRecord {
                message_id: record.message_id.map(RawId::into_string),
                from,
                text: record.text.unwrap_or_default(),
                received_at: record.received_at.filter(|value| !value.is_empty()),
            })
        })
        .collect::<Result<Vec<_>, ReceiveError>>()?;

    Ok(InboundBatch {
        message_count: raw.message_count,
        pending_message_count: raw.pending_message_count,
        results,
    })
}

/// Decodes a delivery report webhook body.
pub fn decode_status(body: &[u8]) -> Result<StatusBatch, ReceiveError> {
    let raw: RawStatusEnvelope = serde_json::from_slice(body)?;
    let mut results = raw
        .results
        .ok_or_else(|| ReceiveError::validation("results is required"))?
        .into_iter();
    let first = results
        .next()
        .ok_or_else(|| ReceiveError::validation("results must contain at least one status"))?;

    let message_id = match first.message_id {
        None => return Err(ReceiveError::validation("results[0].messageId is required")),
        Some(RawId::Number(id)) => id,
        Some(RawId::Text(text)) => text.trim().parse::<i64>().map_err(|_| {
            ReceiveError::validation(format!("results[0].messageId '{text}' is not numeric"))
        })?,
    };
    if message_id == 0 {
        return Err(ReceiveError::validation("results[0].messageId is required"));
    }

    let group_name = first
        .status
        .and_then(|status| status.group_name)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ReceiveError::validation("results[0].status.groupName is required"))?;

    Ok(StatusBatch {
        first: StatusRecord {
            message_id: MsgId::new(message_id),
            group_name,
        },
        ignored_records: results.count(),
    })
}

/// Body of `POST /sms/1/text/advanced`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEnvelope {
    pub messages: Vec<OutgoingMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    pub from: String,
    pub destinations: Vec<Destination>,
    pub text: String,
    pub notify_content_type: String,
    pub intermediate_report: bool,
    pub notify_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub to: String,
    pub message_id: String,
}

/// Builds the outbound envelope; `notify_url` is where delivery reports should be posted.
pub fn encode_outbound(msg: &OutgoingMsg, notify_url: &str) -> OutgoingEnvelope {
    OutgoingEnvelope {
        messages: vec![OutgoingMessage {
            from: msg.channel.address.clone(),
            destinations: vec![Destination {
                to: msg.urn.path().trim_start_matches('+').to_string(),
                message_id: msg.id.to_string(),
            }],
            text: msg.text_and_attachments(),
            notify_content_type: "application/json".into(),
            intermediate_report: true,
            notify_url: notify_url.to_string(),
        }],
    }
}
