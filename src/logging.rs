//! # Tracing Module
//!
//! Console logging for processes that embed the group runner.
//!
//! The runner itself only emits `debug`/`trace` spans and events; which of them reach the
//! console is decided here. `RUST_LOG` wins when set, otherwise the level follows
//! `GROUP_RUNNER_ENV` (`production` → `info`, anything else → `debug`).

use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Installs the console subscriber once per process.
///
/// Safe to call repeatedly and from tests; an already-installed global subscriber is kept.
pub fn init_tracing() {
    TRACING_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level()));

        let use_ansi = IsTerminal::is_terminal(&std::io::stdout());

        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_level(true)
            .with_ansi(use_ansi)
            .with_filter(filter);

        let subscriber = tracing_subscriber::registry().with(console_layer);

        if subscriber.try_init().is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        } else {
            tracing::info!(
                environment = %environment,
                ansi_colors = use_ansi,
                "Console logging initialized"
            );
        }
    });
}

fn get_environment() -> String {
    std::env::var("GROUP_RUNNER_ENV").unwrap_or_else(|_| "development".to_string())
}

/// Level used when `RUST_LOG` is unset
fn default_level() -> &'static str {
    get_log_level(&get_environment())
}

fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}
