use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{Extension, Path},
    http::StatusCode,
    middleware,
    response::Response,
    routing::{get, post},
};
use sms_core::{ChannelType, Event, SharedChannelHandler, SharedChannelStore};
use sms_ingress_common::{
    RequestId, outcome_label, record_ingress, start_ingress_span, with_request_id, write_error,
    write_outcome, write_receive_error,
};
use tracing::{Instrument, debug, warn};
use uuid::Uuid;

/// Shared router state: one handler per channel type plus the channel lookup.
#[derive(Clone)]
pub struct GatewayState {
    handlers: HashMap<String, SharedChannelHandler>,
    pub channels: SharedChannelStore,
}

impl GatewayState {
    pub fn new(
        handlers: impl IntoIterator<Item = SharedChannelHandler>,
        channels: SharedChannelStore,
    ) -> Self {
        let handlers = handlers
            .into_iter()
            .map(|handler| (handler.channel_type().path_segment(), handler))
            .collect();
        Self { handlers, channels }
    }

    /// Handler mounted under the `/c/{segment}/` prefix, if any.
    pub fn handler(&self, segment: &str) -> Option<&SharedChannelHandler> {
        self.handlers.get(&segment.to_ascii_lowercase())
    }
}

pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/c/{channel_type}/{channel_uuid}/{action}", post(receive))
        .layer(Extension(Arc::new(state)))
        .layer(middleware::from_fn(with_request_id))
}

async fn healthz() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn receive(
    Path((channel_type, channel_uuid, action)): Path<(String, String, String)>,
    Extension(state): Extension<Arc<GatewayState>>,
    Extension(request_id): Extension<RequestId>,
    body: Bytes,
) -> Response {
    let Some(handler) = state.handler(&channel_type).cloned() else {
        return write_error(
            StatusCode::NOT_FOUND,
            format!("unknown channel type '{channel_type}'"),
        );
    };
    if !handler.actions().contains(&action.as_str()) {
        return write_error(StatusCode::NOT_FOUND, format!("unknown action '{action}'"));
    }
    let Ok(channel_uuid) = Uuid::parse_str(&channel_uuid) else {
        return write_error(StatusCode::NOT_FOUND, "channel not found");
    };

    let channel_type = ChannelType::new(channel_type);
    let span = start_ingress_span(&channel_type, channel_uuid, &action, request_id.as_str());
    async move {
        let channel = match state.channels.get_channel(&channel_type, channel_uuid).await {
            Ok(Some(channel)) => channel,
            Ok(None) => return write_error(StatusCode::NOT_FOUND, "channel not found"),
            Err(err) => {
                warn!(error = %err, "channel lookup failed");
                return write_error(StatusCode::INTERNAL_SERVER_ERROR, err);
            }
        };

        let result = handler.receive(&action, &channel, &body).await;
        record_ingress(&action, outcome_label(&result));
        match result {
            Ok(outcome) => {
                match outcome.primary_event() {
                    Some(Event::Msg(msg)) => debug!(msg_uuid = %msg.uuid, "webhook handled"),
                    Some(Event::Status(status)) => debug!(msg_id = %status.msg_id, "webhook handled"),
                    None => debug!("webhook ignored"),
                }
                write_outcome(&outcome)
            }
            Err(err) => {
                warn!(error = %err, code = err.code(), "webhook rejected");
                write_receive_error(&err)
            }
        }
    }
    .instrument(span)
    .await
}
