use async_trait::async_trait;
use sms_core::{
    Channel, ChannelHandler, ChannelType, MsgStatus, OutgoingMsg, ReceiveError, ReceiveOutcome,
    SendError, SharedBackend,
};
use sms_telemetry::{record_count, record_counter};
use tracing::info;

use crate::codec::{decode_inbound, decode_status};
use crate::inbound::receive_messages;
use crate::send::InfobipSender;
use crate::status::receive_status;

pub const CHANNEL_TYPE: &str = "IB";
pub const ACTION_RECEIVE: &str = "receive";
pub const ACTION_DELIVERED: &str = "delivered";

const ACTIONS: &[&str] = &[ACTION_RECEIVE, ACTION_DELIVERED];

/// Infobip channel handler: two webhook actions plus outbound send.
#[derive(Clone)]
pub struct InfobipHandler {
    backend: SharedBackend,
    sender: InfobipSender,
}

impl InfobipHandler {
    pub fn new(backend: SharedBackend, sender: InfobipSender) -> Self {
        Self { backend, sender }
    }

    pub fn sender(&self) -> &InfobipSender {
        &self.sender
    }
}

#[async_trait]
impl ChannelHandler for InfobipHandler {
    fn channel_type(&self) -> ChannelType {
        ChannelType::new(CHANNEL_TYPE)
    }

    fn name(&self) -> &'static str {
        "Infobip"
    }

    fn actions(&self) -> &'static [&'static str] {
        ACTIONS
    }

    async fn receive(
        &self,
        action: &str,
        channel: &Channel,
        body: &[u8],
    ) -> Result<ReceiveOutcome, ReceiveError> {
        let outcome = match action {
            ACTION_RECEIVE => {
                let batch = decode_inbound(body)?;
                let outcome = receive_messages(self.backend.as_ref(), channel, &batch).await?;
                if let ReceiveOutcome::Messages(msgs) = &outcome {
                    record_count("infobip_messages_received", &[], msgs.len() as u64);
                }
                outcome
            }
            ACTION_DELIVERED => {
                let batch = decode_status(body)?;
                let outcome = receive_status(self.backend.as_ref(), channel, &batch).await?;
                if let ReceiveOutcome::Status(status) = &outcome {
                    record_counter(
                        "infobip_status_received",
                        &[("status", status.status.as_str().to_string())],
                    );
                }
                outcome
            }
            other => return Err(ReceiveError::UnknownAction(other.to_string())),
        };

        if let ReceiveOutcome::Ignored(reason) = &outcome {
            info!(channel_uuid = %channel.uuid, action, reason = %reason, "infobip request ignored");
            record_counter("infobip_ignored", &[("action", action.to_string())]);
        }
        Ok(outcome)
    }

    async fn send_msg(&self, msg: &OutgoingMsg) -> Result<MsgStatus, SendError> {
        self.sender.send(msg).await
    }
}
