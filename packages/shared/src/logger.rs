//! Logging setup utilities for the Focus Room server.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// This function sets up logging for the server library crate, the shared crate and
/// the binary. The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "focusroom-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use focusroom_shared::logger::setup_logger;
///
/// setup_logger("focusroom-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the default `EnvFilter` directive string.
///
/// Crate names use underscores in targets, so `-` in the binary name is normalized.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    format!(
        "focusroom_server={level},focusroom_shared={level},{bin}={level},tower_http={level}",
        level = default_log_level,
        bin = binary_name.replace('-', "_"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_includes_all_targets() {
        // テスト項目: デフォルトフィルタにサーバー・共有クレート・バイナリが含まれる
        // given (前提条件):
        let binary_name = "focusroom-server";

        // when (操作):
        let filter = default_filter(binary_name, "info");

        // then (期待する結果):
        assert!(filter.contains("focusroom_server=info"));
        assert!(filter.contains("focusroom_shared=info"));
        assert!(filter.contains("tower_http=info"));
        assert!(!filter.contains("focusroom-server"));
    }
}
