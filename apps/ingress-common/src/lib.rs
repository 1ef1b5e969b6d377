//! HTTP plumbing shared by webhook ingress routes: acknowledgment writers, request ids
//! and ingress telemetry.
pub mod reqid;
pub mod respond;
pub mod telemetry;

pub use reqid::*;
pub use respond::*;
pub use telemetry::*;
