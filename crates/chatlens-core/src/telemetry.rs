//! Log output for the chatlens binary.
//!
//! Everything goes to stderr so report output on stdout stays pipeable.
//! `RUST_LOG` wins over the level passed in.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Crates whose events follow the requested level; everything else
/// (rusqlite, tokio internals) stays at `warn`.
const CHATLENS_TARGETS: &[&str] = &["chatlens", "chatlens_core", "chatlens_store"];

fn default_directives(level: Level) -> String {
    let mut directives = String::from("warn");
    for target in CHATLENS_TARGETS {
        directives.push_str(&format!(",{target}={}", level.as_str().to_lowercase()));
    }
    directives
}

/// Install the global subscriber: compact text, or JSON lines when `json`.
///
/// Returns `false` when a subscriber was already installed.
pub fn init_tracing(json: bool, level: Level) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| {
        fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .is_ok()
}
