//! Logging initialization for the vsquery binary
//!
//! The filter is chosen in the following priority order:
//! 1. CLI flags (`-v/-q`) - highest priority
//! 2. RUST_LOG environment variable
//! 3. Binary-specific defaults - lowest priority
//!
//! Log lines are written to stderr so stdout carries nothing but API payloads.

use anyhow::Result;
use clap_verbosity_flag::{LogLevel, Verbosity};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging with the specified verbosity level and default filter.
///
/// # Example
///
/// ```no_run
/// use clap::Parser;
/// use clap_verbosity_flag::{Verbosity, WarnLevel};
/// use vsquery_common::logging;
///
/// #[derive(Parser)]
/// struct Args {
///     #[clap(flatten)]
///     verbosity: Verbosity<WarnLevel>,
/// }
///
/// let args = Args::parse();
/// logging::init_logging(&args.verbosity, "vsquery=warn").unwrap();
/// ```
pub fn init_logging<L: LogLevel>(verbosity: &Verbosity<L>, default_filter: &str) -> Result<()> {
    let filter = resolve_filter(verbosity, default_filter)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .compact(),
        )
        .try_init()?;

    Ok(())
}

/// Initialize logging only when explicitly requested
///
/// A plain `vsquery installations ...` must print the JSON payload and
/// nothing else, so the subscriber is only installed when a verbosity flag
/// was given or RUST_LOG is set.
///
/// Returns `true` if logging was initialized.
pub fn init_cli_logging<L: LogLevel>(
    verbosity: &Verbosity<L>,
    default_filter: &str,
) -> Result<bool> {
    if verbosity.log_level().is_some() || std::env::var("RUST_LOG").is_ok() {
        init_logging(verbosity, default_filter)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

fn resolve_filter<L: LogLevel>(
    verbosity: &Verbosity<L>,
    default_filter: &str,
) -> Result<EnvFilter> {
    if let Some(log_level) = verbosity.log_level() {
        return Ok(EnvFilter::try_new(format!("{}", log_level).to_lowercase())?);
    }

    Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
}
