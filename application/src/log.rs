//! Logging setup shared by the binaries.

use std::{io, sync::OnceLock};

use tracing::Level;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

/// [`Level`]s written into the standard error stream.
const STDERR_LEVELS: &[Level] = &[Level::WARN, Level::ERROR];

/// Maximum [`Level`] being logged, [`Level::INFO`] until configured.
static LOG_LEVEL: OnceLock<Level> = OnceLock::new();

/// Installs the global [`tracing`] subscriber.
///
/// [`Level::WARN`] and [`Level::ERROR`] events go into the standard error
/// stream, all the others into the standard output.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && level() >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && level() >= *meta.level()
                })),
        )
        .init();
}

/// Sets the maximum [`Level`] being logged.
///
/// Only the first call has an effect.
pub fn set_level(level: impl Into<Level>) {
    _ = LOG_LEVEL.set(level.into());
}

/// Returns the maximum [`Level`] being logged.
fn level() -> Level {
    LOG_LEVEL.get().copied().unwrap_or(Level::INFO)
}
