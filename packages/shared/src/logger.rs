//! Logging setup utilities for the Yorisoi relay.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter covers the server library crate, the shared crate and the
/// binary itself. `RUST_LOG` takes precedence when set.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "yorisoi_server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn")
///
/// # Examples
///
/// ```no_run
/// use yorisoi_shared::logger::setup_logger;
///
/// setup_logger("yorisoi_server", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    let binary_target = binary_name.replace('-', "_");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "yorisoi_server={level},yorisoi_shared={level},{bin}={level},tower_http={level}",
                    level = default_log_level,
                    bin = binary_target,
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
