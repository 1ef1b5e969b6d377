use std::sync::Arc;

use async_trait::async_trait;

use crate::channel::{Channel, ChannelType};
use crate::errors::{ReceiveError, SendError};
use crate::types::{MsgStatus, OutgoingMsg, ReceiveOutcome};

/// Contract every gateway integration implements for the dispatcher.
///
/// Receive actions are mounted by the dispatcher under
/// `/c/{channel_type}/{channel_uuid}/{action}`.
#[async_trait]
pub trait ChannelHandler: Send + Sync {
    fn channel_type(&self) -> ChannelType;

    /// Human-readable gateway name.
    fn name(&self) -> &'static str;

    /// Webhook actions this handler accepts, e.g. `receive`.
    fn actions(&self) -> &'static [&'static str];

    async fn receive(
        &self,
        action: &str,
        channel: &Channel,
        body: &[u8],
    ) -> Result<ReceiveOutcome, ReceiveError>;

    /// Sends one message. `Err` only when no status could be produced; delivery problems
    /// come back as an errored [`MsgStatus`].
    async fn send_msg(&self, msg: &OutgoingMsg) -> Result<MsgStatus, SendError>;
}

pub type SharedChannelHandler = Arc<dyn ChannelHandler>;
