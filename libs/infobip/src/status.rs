use sms_core::{Backend, Channel, MsgStatus, ReceiveError, ReceiveOutcome};
use tracing::{debug, warn};

use crate::codec::StatusBatch;
use crate::status_map::{map_group_name, unknown_status};

/// Maps the first delivery report onto a status update without touching the backend.
pub fn build_status(channel: &Channel, batch: &StatusBatch) -> Result<MsgStatus, ReceiveError> {
    let record = &batch.first;
    let status = map_group_name(&record.group_name).ok_or_else(|| unknown_status(&record.group_name))?;
    Ok(MsgStatus::new(channel, record.message_id, status))
}

pub async fn receive_status(
    backend: &dyn Backend,
    channel: &Channel,
    batch: &StatusBatch,
) -> Result<ReceiveOutcome, ReceiveError> {
    if batch.ignored_records > 0 {
        warn!(
            channel_uuid = %channel.uuid,
            ignored = batch.ignored_records,
            "infobip status callback carried extra results; only the first is applied"
        );
    }

    let status = build_status(channel, batch)?;
    backend.write_msg_status(&status).await?;
    debug!(msg_id = %status.msg_id, status = status.status.code(), "infobip status written");
    Ok(ReceiveOutcome::Status(status))
}
