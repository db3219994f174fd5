//! Logging setup for the quill contract platform.
//!
//! Thin re-export of the tracing facade plus subscriber initialization, so
//! the contract crates log through one interface.

pub use tracing::{debug, error, info, instrument, trace, warn};
pub use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// The filter comes from `RUST_LOG`, defaulting to `info`. Returns an error
/// when a subscriber is already installed.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(true)
        .compact()
        .try_init()?;
    Ok(())
}

/// Initialize tracing for tests, writing through the test capture writer.
pub fn init_tracing_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_tracing_test();
        init_tracing_test();
        info!("logging initialized");
    }
}
