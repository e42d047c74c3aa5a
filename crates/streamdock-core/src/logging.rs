use tracing_subscriber::EnvFilter;

/// Install the JSON tracing subscriber on stderr.
///
/// `RUST_LOG` takes precedence; otherwise `info`, or `warn` when `quiet`.
/// Calling this more than once is harmless: later calls keep the first
/// subscriber.
pub fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_does_not_panic() {
        init_logging(true);
        init_logging(false);
        tracing::info!(event = "core.logging.test_completed");
    }
}
