//! Infobip SMS channel handler.
//!
//! Normalizes the two Infobip webhooks (`receive` for mobile-originated messages,
//! `delivered` for delivery reports) into engine messages and status updates, and translates
//! outgoing messages into calls to the advanced text endpoint.
pub mod codec;
pub mod handler;
pub mod inbound;
pub mod send;
pub mod status;
pub mod status_map;

pub use handler::{ACTION_DELIVERED, ACTION_RECEIVE, CHANNEL_TYPE, InfobipHandler};
pub use inbound::IGNORED_NO_MESSAGE;
pub use send::{DEFAULT_SEND_URL, InfobipSender};
