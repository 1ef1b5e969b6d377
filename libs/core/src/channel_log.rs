use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::http::{RawRequest, RawResponse};
use crate::types::MsgId;

/// Error entry attached to a [`ChannelLog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelError {
    pub description: String,
    pub message: String,
}

/// Audit record of one call made to a gateway on behalf of a channel.
///
/// Request headers are never captured, so credentials stay out of the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelLog {
    pub description: String,
    pub channel_uuid: Uuid,
    pub msg_id: Option<MsgId>,
    pub method: String,
    pub url: String,
    pub request_body: String,
    pub status_code: Option<u16>,
    pub response_body: Option<String>,
    pub elapsed_ms: u64,
    #[serde(default)]
    pub errors: Vec<ChannelError>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_on: OffsetDateTime,
}

impl ChannelLog {
    /// Starts a log for `request`; the response and timing are filled in afterwards.
    pub fn new(
        description: impl Into<String>,
        channel_uuid: Uuid,
        msg_id: Option<MsgId>,
        request: &RawRequest,
    ) -> Self {
        Self {
            description: description.into(),
            channel_uuid,
            msg_id,
            method: request.method().to_string(),
            url: request.uri().to_string(),
            request_body: String::from_utf8_lossy(request.body()).into_owned(),
            status_code: None,
            response_body: None,
            elapsed_ms: 0,
            errors: Vec::new(),
            created_on: OffsetDateTime::now_utc(),
        }
    }

    pub fn with_response(mut self, response: &RawResponse) -> Self {
        self.status_code = Some(response.status.as_u16());
        self.response_body = Some(String::from_utf8_lossy(&response.body).into_owned());
        self
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_error(mut self, description: impl Into<String>, message: impl ToString) -> Self {
        self.errors.push(ChannelError {
            description: description.into(),
            message: message.to_string(),
        });
        self
    }

    pub fn is_error(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{HeaderMap, StatusCode, header};

    #[test]
    fn captures_request_and_response_without_headers() {
        let request = http::Request::builder()
            .method("POST")
            .uri("https://api.example.com/send")
            .header(header::AUTHORIZATION, "Basic c2VjcmV0")
            .body(Bytes::from_static(b"{\"text\":\"hi\"}"))
            .unwrap();
        let response = RawResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::from_static(b"{\"ok\":true}"),
        };

        let log = ChannelLog::new("Message Sent", Uuid::new_v4(), Some(MsgId::new(7)), &request)
            .with_response(&response)
            .with_elapsed(Duration::from_millis(12))
            .with_error("Message Send Error", "boom");

        assert_eq!(log.method, "POST");
        assert_eq!(log.status_code, Some(200));
        assert_eq!(log.response_body.as_deref(), Some("{\"ok\":true}"));
        assert_eq!(log.elapsed_ms, 12);
        assert!(log.is_error());
        let serialized = serde_json::to_string(&log).unwrap();
        assert!(!serialized.contains("c2VjcmV0"));
    }
}
