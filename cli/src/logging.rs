//! tracing setup shared by both binaries

use std::env;

use tracing::level_filters::LevelFilter;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Takes precedence over `-v` when set.
pub const LOG_ENV: &str = "MCUMGR_DEV_LOG";

/// Map a `-v` count to a level: 0-1 warn, 2 info, 3 debug, 4+ trace.
pub fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 | 1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        3 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Filter from the `MCUMGR_DEV_LOG` value if it parses, else from `-v`.
///
/// The second element is the rejected directive string, if any.
pub fn build_filter(raw: Option<&str>, verbose: u8) -> (EnvFilter, Option<String>) {
    let fallback = || EnvFilter::default().add_directive(level_for(verbose).into());

    match raw.filter(|r| !r.trim().is_empty()) {
        Some(raw) => match EnvFilter::try_new(raw) {
            Ok(filter) => (filter, None),
            Err(_) => (fallback(), Some(raw.to_string())),
        },
        None => (fallback(), None),
    }
}

pub fn init_tracing(verbose: u8) {
    let raw = env::var(LOG_ENV).ok();
    let (filter, rejected) = build_filter(raw.as_deref(), verbose);

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .without_time();

    // a second init (tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();

    if let Some(rejected) = rejected {
        warn!("ignoring invalid {LOG_ENV} directive {rejected:?}, using -v level");
    }
}
