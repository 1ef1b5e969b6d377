pub mod channels;
pub mod config;
pub mod http;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use axum::serve;
use sms_core::{
    Channel, ChannelStore, ChannelType, InMemoryBackend, MsgStatus, OutgoingMsg, ReqwestHttpClient,
    SharedBackend, SharedChannelHandler, SharedChannelStore,
};
use sms_infobip::{CHANNEL_TYPE, InfobipHandler, InfobipSender};
use tokio::net::TcpListener;
use tracing::info;
use uuid::Uuid;

use crate::config::GatewayConfig;
use crate::http::{GatewayState, build_router};

/// Builds the Infobip handler wired to a real HTTP client.
pub fn infobip_handler(config: &GatewayConfig, backend: SharedBackend) -> Result<InfobipHandler> {
    let http = ReqwestHttpClient::new(config.http_timeout)?;
    let sender = InfobipSender::new(Arc::new(http), config.domain.clone())
        .with_send_url(config.infobip_send_url.clone());
    Ok(InfobipHandler::new(backend, sender))
}

pub fn build_state(
    config: &GatewayConfig,
    backend: SharedBackend,
    channels: SharedChannelStore,
) -> Result<GatewayState> {
    let handler: SharedChannelHandler = Arc::new(infobip_handler(config, backend)?);
    Ok(GatewayState::new([handler], channels))
}

/// Starts the gateway HTTP server using the provided configuration.
pub async fn run(config: GatewayConfig) -> Result<()> {
    let channels = channels::load_channels(&config.channels_file)?;
    let backend: SharedBackend = Arc::new(InMemoryBackend::new());
    let router = build_router(build_state(&config, backend, Arc::new(channels))?);

    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    info!("sms-gateway listening on {}", config.addr);

    serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}

/// Looks up an Infobip channel by uuid in the configured channels file.
pub async fn find_channel(config: &GatewayConfig, uuid: Uuid) -> Result<Channel> {
    let store = channels::load_channels(&config.channels_file)?;
    store
        .get_channel(&ChannelType::new(CHANNEL_TYPE), uuid)
        .await?
        .ok_or_else(|| anyhow!("no {CHANNEL_TYPE} channel with uuid {uuid}"))
}

/// One-off outbound send used by the CLI.
pub async fn send_once(config: &GatewayConfig, msg: &OutgoingMsg) -> Result<MsgStatus> {
    let handler = infobip_handler(config, Arc::new(InMemoryBackend::new()))?;
    let sender = handler.sender();
    info!(send_url = sender.send_url(), msg_id = %msg.id, "sending message");
    Ok(sender.send(msg).await?)
}
