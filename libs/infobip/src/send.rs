//! Outbound delivery through the Infobip advanced text endpoint.

use std::sync::Arc;
use std::time::Instant;

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use bytes::Bytes;
use http::{Method, header};
use serde_json::Value;
use sms_core::{
    CONFIG_PASSWORD, CONFIG_USERNAME, Channel, ChannelLog, HttpClient, MsgStatus, MsgStatusValue,
    OutgoingMsg, SendError,
};
use sms_telemetry::record_counter;
use tracing::{instrument, warn};

use crate::codec::encode_outbound;

pub const DEFAULT_SEND_URL: &str = "https://api.infobip.com/sms/1/text/advanced";

const LOG_DESCRIPTION: &str = "Message Sent";
const SEND_ERROR: &str = "Message Send Error";

/// Group ids Infobip uses for messages it has accepted (PENDING, DELIVERED).
const ACCEPTED_GROUP_IDS: [i64; 2] = [1, 3];

#[derive(Clone)]
pub struct InfobipSender {
    http: Arc<dyn HttpClient>,
    send_url: String,
    default_domain: String,
}

impl InfobipSender {
    pub fn new(http: Arc<dyn HttpClient>, default_domain: impl Into<String>) -> Self {
        Self {
            http,
            send_url: DEFAULT_SEND_URL.to_string(),
            default_domain: default_domain.into(),
        }
    }

    pub fn with_send_url(mut self, send_url: impl Into<String>) -> Self {
        self.send_url = send_url.into();
        self
    }

    pub fn send_url(&self) -> &str {
        &self.send_url
    }

    /// Where Infobip should post delivery reports for `channel`.
    pub fn status_url(&self, channel: &Channel) -> String {
        format!(
            "https://{}/c/{}/{}/delivered",
            channel.callback_domain(&self.default_domain),
            channel.channel_type.path_segment(),
            channel.uuid
        )
    }

    /// Makes a single delivery attempt for `msg`.
    ///
    /// Only missing credentials or a request that cannot be built are returned as `Err`.
    /// Everything that goes wrong on the wire is recorded on the attached log and reported
    /// as [`MsgStatusValue::Errored`].
    #[instrument(name = "infobip.send", skip_all, fields(msg_id = %msg.id, channel_uuid = %msg.channel.uuid))]
    pub async fn send(&self, msg: &OutgoingMsg) -> Result<MsgStatus, SendError> {
        let channel = &msg.channel;
        let username = channel
            .string_config(CONFIG_USERNAME)
            .ok_or_else(|| SendError::config("no username set for IB channel"))?;
        let password = channel
            .string_config(CONFIG_PASSWORD)
            .ok_or_else(|| SendError::config("no password set for IB channel"))?;

        let envelope = encode_outbound(msg, &self.status_url(channel));
        let body = serde_json::to_vec(&envelope)?;
        let request = http::Request::builder()
            .method(Method::POST)
            .uri(self.send_url.as_str())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .header(header::AUTHORIZATION, basic_auth(username, password))
            .body(Bytes::from(body))?;

        let log = ChannelLog::new(LOG_DESCRIPTION, channel.uuid, Some(msg.id), &request);
        let started = Instant::now();
        let result = self.http.execute(request).await;
        let log = log.with_elapsed(started.elapsed());

        let (status, log) = match result {
            Err(err) => {
                warn!(error = %err, "infobip request failed");
                (MsgStatusValue::Errored, log.with_error(SEND_ERROR, format!("{err:#}")))
            }
            Ok(response) => {
                let log = log.with_response(&response);
                if !response.status.is_success() {
                    warn!(status = response.status.as_u16(), "infobip rejected request");
                    let reason = format!("unexpected status code: {}", response.status.as_u16());
                    (MsgStatusValue::Errored, log.with_error(SEND_ERROR, reason))
                } else {
                    match parse_group_id(&response.body) {
                        Ok(group_id) if ACCEPTED_GROUP_IDS.contains(&group_id) => {
                            (MsgStatusValue::Wired, log)
                        }
                        Ok(group_id) => {
                            let reason = format!("received error status: '{group_id}'");
                            (MsgStatusValue::Errored, log.with_error(SEND_ERROR, reason))
                        }
                        Err(reason) => (MsgStatusValue::Errored, log.with_error(SEND_ERROR, reason)),
                    }
                }
            }
        };

        record_counter("infobip_send", &[("status", status.as_str().to_string())]);
        Ok(MsgStatus::new(channel, msg.id, status).with_log(log))
    }
}

fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", B64.encode(format!("{username}:{password}")))
}

fn parse_group_id(body: &[u8]) -> Result<i64, String> {
    let value: Value =
        serde_json::from_slice(body).map_err(|err| format!("unable to parse response: {err}"))?;
    value
        .pointer("/messages/0/status/groupId")
        .and_then(Value::as_i64)
        .ok_or_else(|| "response has no messages[0].status.groupId".to_string())
}
