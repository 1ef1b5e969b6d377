use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sms_core::{MsgId, OutgoingMsg, Urn};
use sms_gateway::config::GatewayConfig;
use sms_gateway::{find_channel, run, send_once};
use sms_telemetry::install as init_telemetry;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(
    name = "sms-gateway",
    version,
    about = "SMS gateway: Infobip webhooks and outbound send"
)]
struct Cli {
    /// Channels file; overrides CHANNELS_FILE.
    #[arg(long, global = true, value_name = "PATH")]
    channels: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Run the webhook server (default)
    Serve,
    /// Send one message through a configured channel and print the resulting status
    Send {
        /// Channel uuid from the channels file.
        #[arg(long)]
        channel: Uuid,
        /// Destination phone number, e.g. +15551234567.
        #[arg(long)]
        to: String,
        #[arg(long)]
        text: String,
        /// Attachment in `mime:url` form; can be repeated.
        #[arg(long = "attachment", value_name = "MIME:URL")]
        attachments: Vec<String>,
        /// Message id reported back in delivery callbacks.
        #[arg(long, default_value_t = 1)]
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_telemetry("sms-gateway")?;

    let mut config = GatewayConfig::from_env()?;
    if let Some(path) = cli.channels {
        config.channels_file = path;
    }

    match cli.command.unwrap_or(CliCommand::Serve) {
        CliCommand::Serve => run(config).await,
        CliCommand::Send {
            channel,
            to,
            text,
            attachments,
            id,
        } => {
            let channel = find_channel(&config, channel).await?;
            let msg = attachments.into_iter().fold(
                OutgoingMsg::new(MsgId::new(id), channel, Urn::tel(to), text),
                OutgoingMsg::with_attachment,
            );
            let status = send_once(&config, &msg).await?;
            let rendered =
                serde_json::to_string_pretty(&status).context("rendering send status")?;
            println!("{rendered}");
            Ok(())
        }
    }
}
