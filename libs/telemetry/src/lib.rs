//! Tracing and metric helpers shared by the SMS gateway services.

use anyhow::Result;

mod config;
mod tracing_init;

pub use config::TelemetryConfig;
pub use tracing_init::init_tracing;

/// Installs the log subscriber configured from `RUST_LOG` and `LOG_FORMAT`.
pub fn install(service_name: &str) -> Result<()> {
    init_tracing(&TelemetryConfig::from_env(
        service_name,
        env!("CARGO_PKG_VERSION"),
    ))
}

/// Increments counter `name` by one with the given labels.
pub fn record_counter(name: &'static str, labels: &[(&'static str, String)]) {
    record_count(name, labels, 1);
}

pub fn record_count(name: &'static str, labels: &[(&'static str, String)], value: u64) {
    let labels: Vec<metrics::Label> = labels
        .iter()
        .map(|(key, value)| metrics::Label::new(*key, value.clone()))
        .collect();
    metrics::counter!(name, labels).increment(value);
}
