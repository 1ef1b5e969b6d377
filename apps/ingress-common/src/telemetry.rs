use sms_core::{ChannelType, ReceiveError, ReceiveOutcome};
use sms_telemetry::record_counter;
use tracing::Span;
use uuid::Uuid;

const INGRESS_COUNTER: &str = "ingress_requests";
const INGRESS_SPAN_NAME: &str = "ingress";

/// Short label describing how a webhook call ended.
pub fn outcome_label(result: &Result<ReceiveOutcome, ReceiveError>) -> &'static str {
    match result {
        Ok(ReceiveOutcome::Messages(_)) => "msg",
        Ok(ReceiveOutcome::Status(_)) => "status",
        Ok(ReceiveOutcome::Ignored(_)) => "ignored",
        Err(err) if err.is_client_error() => "rejected",
        Err(_) => "error",
    }
}

/// Increment the ingress counter for one handled webhook call.
pub fn record_ingress(action: &str, outcome: &'static str) {
    record_counter(
        INGRESS_COUNTER,
        &[("action", action.to_string()), ("outcome", outcome.to_string())],
    );
}

pub fn start_ingress_span(
    channel_type: &ChannelType,
    channel_uuid: Uuid,
    action: &str,
    request_id: &str,
) -> Span {
    tracing::info_span!(
        INGRESS_SPAN_NAME,
        channel_type = %channel_type,
        channel_uuid = %channel_uuid,
        action = %action,
        request_id = %request_id
    )
}
