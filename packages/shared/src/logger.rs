//! Logging setup utilities for the Gambit binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Every crate in `crate_names` (and the binary itself) gets `default_log_level`.
/// The filter can be overridden with the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "gambit-server")
/// * `crate_names` - Library crates whose events should be shown (e.g., `["gambit_server"]`)
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use gambit_shared::logger::setup_logger;
///
/// setup_logger("gambit-server", &["gambit_server"], "debug");
/// ```
pub fn setup_logger(binary_name: &str, crate_names: &[&str], default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                build_default_filter(binary_name, crate_names, default_log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the `EnvFilter` directive used when `RUST_LOG` is not set.
fn build_default_filter(binary_name: &str, crate_names: &[&str], default_log_level: &str) -> String {
    let mut targets: Vec<String> = crate_names
        .iter()
        .map(|name| name.replace('-', "_"))
        .collect();
    targets.push(binary_name.replace('-', "_"));
    targets.push("tower_http".to_string());

    targets
        .iter()
        .map(|target| format!("{}={}", target, default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}
