use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use sms_core::{Msg, MsgStatus, ReceiveError, ReceiveOutcome};
use time::OffsetDateTime;
use uuid::Uuid;

pub const MSG_ACCEPTED: &str = "Message Accepted";
pub const STATUS_ACCEPTED: &str = "Status Update Accepted";
pub const IGNORED: &str = "Ignored";
pub const ERROR: &str = "Error";

/// Body returned to the gateway for every webhook call.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub message: &'static str,
    pub data: Vec<AckData>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AckData {
    Msg {
        channel_uuid: Uuid,
        msg_uuid: Uuid,
        text: String,
        urn: String,
        external_id: Option<String>,
        #[serde(with = "time::serde::rfc3339")]
        received_on: OffsetDateTime,
    },
    Status {
        channel_uuid: Uuid,
        msg_id: i64,
        status: &'static str,
    },
    Info {
        info: String,
    },
    Error {
        error: String,
    },
}

impl From<&Msg> for AckData {
    fn from(msg: &Msg) -> Self {
        AckData::Msg {
            channel_uuid: msg.channel_uuid,
            msg_uuid: msg.uuid,
            text: msg.text.clone(),
            urn: msg.urn.to_string(),
            external_id: msg.external_id.clone(),
            received_on: msg.received_on,
        }
    }
}

impl From<&MsgStatus> for AckData {
    fn from(status: &MsgStatus) -> Self {
        AckData::Status {
            channel_uuid: status.channel_uuid,
            msg_id: status.msg_id.get(),
            status: status.status.code(),
        }
    }
}

fn reply(status: StatusCode, message: &'static str, data: Vec<AckData>) -> Response {
    (status, Json(Ack { message, data })).into_response()
}

pub fn write_msg_success(msgs: &[Msg]) -> Response {
    reply(StatusCode::OK, MSG_ACCEPTED, msgs.iter().map(AckData::from).collect())
}

pub fn write_status_success(status: &MsgStatus) -> Response {
    reply(StatusCode::OK, STATUS_ACCEPTED, vec![AckData::from(status)])
}

/// Ignored requests are still acknowledged with 200 so the gateway does not retry them.
pub fn write_ignored(reason: &str) -> Response {
    reply(
        StatusCode::OK,
        IGNORED,
        vec![AckData::Info {
            info: reason.to_string(),
        }],
    )
}

pub fn write_error(status: StatusCode, error: impl ToString) -> Response {
    reply(
        status,
        ERROR,
        vec![AckData::Error {
            error: error.to_string(),
        }],
    )
}

/// 404 for unknown actions, 400 for anything else the caller got wrong, 500 otherwise.
pub fn write_receive_error(err: &ReceiveError) -> Response {
    let status = match err {
        ReceiveError::UnknownAction(_) => StatusCode::NOT_FOUND,
        err if err.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    write_error(status, err)
}

pub fn write_outcome(outcome: &ReceiveOutcome) -> Response {
    match outcome {
        ReceiveOutcome::Messages(msgs) => write_msg_success(msgs),
        ReceiveOutcome::Status(status) => write_status_success(status),
        ReceiveOutcome::Ignored(reason) => write_ignored(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use sms_core::{BackendError, Channel, ChannelType, MsgId, MsgStatusValue, Urn};
    use time::macros::datetime;

    async fn body_json(response: Response) -> Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect")
            .to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn channel() -> Channel {
        Channel::new(ChannelType::new("IB"), "2020")
            .with_uuid(Uuid::parse_str("8eb23e93-5ecb-45ba-b726-3b064e0c56ab").unwrap())
    }

    #[tokio::test]
    async fn msg_success_lists_every_message() {
        let channel = channel();
        let msgs = vec![
            Msg::new_incoming(&channel, Urn::tel("+385916242493"), "one")
                .with_received_on(datetime!(2016-10-06 09:28:39.220 UTC))
                .with_external_id("ext-1"),
            Msg::new_incoming(&channel, Urn::tel("+385916242493"), "two"),
        ];
        let response = write_msg_success(&msgs);
        assert_eq!(response.status(), StatusCode::OK);

        let payload = body_json(response).await;
        assert_eq!(payload["message"], "Message Accepted");
        assert_eq!(payload["data"].as_array().unwrap().len(), 2);
        assert_eq!(
            payload["data"][0],
            json!({
                "type": "msg",
                "channel_uuid": "8eb23e93-5ecb-45ba-b726-3b064e0c56ab",
                "msg_uuid": msgs[0].uuid.to_string(),
                "text": "one",
                "urn": "tel:+385916242493",
                "external_id": "ext-1",
                "received_on": "2016-10-06T09:28:39.22Z"
            })
        );
    }

    #[tokio::test]
    async fn status_success_carries_code() {
        let status = MsgStatus::new(&channel(), MsgId::new(12345), MsgStatusValue::Delivered);
        let payload = body_json(write_status_success(&status)).await;
        assert_eq!(
            payload,
            json!({
                "message": "Status Update Accepted",
                "data": [{
                    "type": "status",
                    "channel_uuid": "8eb23e93-5ecb-45ba-b726-3b064e0c56ab",
                    "msg_id": 12345,
                    "status": "D"
                }]
            })
        );
    }

    #[tokio::test]
    async fn ignored_is_still_ok() {
        let response = write_ignored("ignoring request, no message");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "message": "Ignored",
                "data": [{"type": "info", "info": "ignoring request, no message"}]
            })
        );
    }

    #[tokio::test]
    async fn receive_errors_map_to_status_codes() {
        let response = write_receive_error(&ReceiveError::validation("results is required"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({
                "message": "Error",
                "data": [{"type": "error", "error": "validation failed: results is required"}]
            })
        );

        let response = write_receive_error(&ReceiveError::UnknownAction("stopped".into()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = write_receive_error(&BackendError::Unavailable("db".into()).into());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
