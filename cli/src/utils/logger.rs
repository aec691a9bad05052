use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`
pub fn init_logger(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}
