use sms_core::{Backend, Channel, Msg, ReceiveError, ReceiveOutcome, tel_urn_for_country};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::debug;

use crate::codec::InboundBatch;

pub const IGNORED_NO_MESSAGE: &str = "ignoring request, no message";

/// `2016-10-06T09:28:39.220+0000`; the fractional part is optional.
const RECEIVED_AT_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]][offset_hour sign:mandatory][offset_minute]"
);

pub fn parse_received_at(value: &str) -> Result<OffsetDateTime, ReceiveError> {
    OffsetDateTime::parse(value, RECEIVED_AT_FORMAT).map_err(|err| ReceiveError::InvalidDate {
        value: value.to_string(),
        reason: err.to_string(),
    })
}

/// Turns a decoded batch into messages without touching the backend.
///
/// Records with empty text are skipped. Records without a timestamp are stamped with `now`.
/// Any bad timestamp fails the whole batch.
pub fn build_messages(
    channel: &Channel,
    batch: &InboundBatch,
    now: OffsetDateTime,
) -> Result<Vec<Msg>, ReceiveError> {
    let mut msgs = Vec::with_capacity(batch.results.len());
    for record in &batch.results {
        if record.text.is_empty() {
            continue;
        }

        let received_on = match record.received_at.as_deref() {
            Some(value) => parse_received_at(value)?,
            None => now,
        };
        let urn = tel_urn_for_country(&record.from, channel.country());

        let mut msg = Msg::new_incoming(channel, urn, record.text.as_str()).with_received_on(received_on);
        if let Some(external_id) = record.message_id.as_deref() {
            msg = msg.with_external_id(external_id);
        }
        msgs.push(msg);
    }
    Ok(msgs)
}

/// Normalizes an inbound batch and writes every accepted message.
///
/// Nothing is written unless the whole batch is valid.
pub async fn receive_messages(
    backend: &dyn Backend,
    channel: &Channel,
    batch: &InboundBatch,
) -> Result<ReceiveOutcome, ReceiveError> {
    debug!(
        channel_uuid = %channel.uuid,
        message_count = batch.message_count,
        pending_message_count = batch.pending_message_count,
        results = batch.results.len(),
        "infobip inbound batch"
    );
    if batch.message_count == 0 {
        return Ok(ReceiveOutcome::Ignored(IGNORED_NO_MESSAGE.into()));
    }

    let msgs = build_messages(channel, batch, OffsetDateTime::now_utc())?;
    if msgs.is_empty() {
        return Ok(ReceiveOutcome::Ignored(IGNORED_NO_MESSAGE.into()));
    }

    for msg in &msgs {
        backend.write_msg(msg).await?;
        debug!(msg_uuid = %msg.uuid, urn = %msg.urn, "infobip message written");
    }
    Ok(ReceiveOutcome::Messages(msgs))
}
