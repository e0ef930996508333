//! Tracing subscriber setup.
//!
//! Logs go to stderr so `ragchat ask` can pipe the answer from stdout.

use once_cell::sync::OnceCell;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::EnvFilter;

/// Filter override checked before `RUST_LOG`
pub const ENV_LOG: &str = "RAGCHAT_LOG";

const DEFAULT_FILTER: &str = "warn";

static INIT: OnceCell<()> = OnceCell::new();

fn resolve_env_filter<F>(lookup: F) -> EnvFilter
where
    F: Fn(&str) -> Option<String>,
{
    for key in [ENV_LOG, "RUST_LOG"] {
        if let Some(filter) = lookup(key).and_then(|v| EnvFilter::try_new(v).ok()) {
            return filter;
        }
    }
    EnvFilter::new(DEFAULT_FILTER)
}

/// Install the global subscriber. Calling this more than once is harmless.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = resolve_env_filter(|key| std::env::var(key).ok());
        let layer = tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr);
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init();
    });
}
