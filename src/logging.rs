use tracing_subscriber::EnvFilter;

/// Initialize logging.  If the environment variable `RUST_LOG` is set to a
/// non-empty value we interpret it; otherwise we default to info-level output
/// for this crate.
///
/// Because of limitations in shell scripts that drive this tool, `RUST_LOG`
/// is frequently set unconditionally but potentially with an empty value, and
/// we don't want that to be interpreted as a desire to disable the default.
pub fn init_logging() {
    let env_filter = match std::env::var("RUST_LOG") {
        Ok(rustlog) if !rustlog.is_empty() => {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hiergen=info"))
        }
        _ => EnvFilter::new("hiergen=info"),
    };

    // try_init so that embedders (and tests) that already installed a
    // subscriber don't make this a hard failure.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .compact()
        // We primarily expect this to go in logs which can be excerpted for
        // email purposes, and so ANSI isn't helpful for this.
        .with_ansi(false)
        // In general we don't care about the wall time that much, and it
        // takes up a lot of columns.
        .without_time()
        .try_init();
}
