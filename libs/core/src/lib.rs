//! Core contracts and value types for SMS gateway channel handlers.
//!
//! This crate holds the data exchanged between the dispatcher, channel handlers and the
//! persistence backend, along with the collaborator traits (`Backend`, `ChannelStore`,
//! `HttpClient`, `ChannelHandler`) and small in-process implementations of them.
pub mod backend;
pub mod channel;
pub mod channel_log;
pub mod errors;
pub mod handler;
pub mod http;
pub mod types;
pub mod urn;

pub use backend::*;
pub use channel::*;
pub use channel_log::*;
pub use errors::*;
pub use handler::*;
pub use self::http::*;
pub use types::*;
pub use urn::*;
