//! tracing subscriber setup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Call once, before any logging.
///
/// `--verbose` wins over `--quiet`; with neither, `RUST_LOG` is honoured and
/// falls back to info level for this crate. Output goes to stderr.
pub fn init(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("apidoc=debug")
    } else if quiet {
        EnvFilter::new("apidoc=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("apidoc=info"))
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
