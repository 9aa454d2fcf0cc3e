//! Structured logging for the terrain tools.
//!
//! Console output via the `tracing` ecosystem: timestamps, module paths,
//! severity levels, and environment-based filtering through `RUST_LOG`.
//! An optional JSON log file supports post-mortem analysis of long
//! streaming runs.

use std::path::Path;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset: informational messages, with
/// the per-chunk streaming chatter turned down.
const DEFAULT_FILTER: &str = "info,terra_stream=warn";

/// Initialize the tracing subscriber.
///
/// Console output is always enabled; passing a `log_dir` additionally
/// writes structured JSON records to `terra.log` in that directory.
/// `RUST_LOG` overrides the default filter.
pub fn init_logging(log_dir: Option<&Path>) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join("terra.log"))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// An `EnvFilter` carrying the default filter string.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_quiets_the_streamer() {
        let filter = format!("{}", default_env_filter());
        assert!(filter.contains("info"));
        assert!(filter.contains("terra_stream=warn"));
    }

    #[test]
    fn test_typical_override_filters_parse() {
        let overrides = [
            "debug",
            "info,terra_stream=trace",
            "warn,terra_heightfield=debug,terra_mesh=trace",
        ];
        for filter in &overrides {
            assert!(
                EnvFilter::try_from(*filter).is_ok(),
                "failed to parse filter: {filter}"
            );
        }
    }
}
