//! Logging initialization.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Environment variable that switches logging to DEBUG when set to anything
/// other than an empty string, `0` or `false`.
pub const DEBUG_VAR: &str = "PROMPTPLACE_DEBUG";

/// Install a stderr subscriber, INFO by default.
///
/// # Errors
///
/// Returns an error if the global tracing subscriber cannot be set.
pub fn initialize_logging() -> Result<()> {
    let level = level_for(std::env::var(DEBUG_VAR).ok().as_deref());

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn level_for(debug: Option<&str>) -> Level {
    match debug.map(str::trim) {
        None | Some("" | "0" | "false") => Level::INFO,
        Some(_) => Level::DEBUG,
    }
}
