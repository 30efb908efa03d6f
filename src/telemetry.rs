use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::WeatherProError;
use crate::config::LoggingConfig;

/// Install the global subscriber on stderr. `RUST_LOG` wins over the
/// configured level and `verbose` wins over both.
pub fn init(logging: &LoggingConfig, verbose: bool) -> Result<(), WeatherProError> {
    let filter = if verbose {
        EnvFilter::new("weatherpro=debug,info")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("weatherpro={},warn", logging.level)))
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = if logging.format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .json(),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .try_init()
    };

    result.map_err(|e| WeatherProError::general(format!("Failed to initialize logging: {e}")))
}
