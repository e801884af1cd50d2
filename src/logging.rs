//! Tracing subscriber bootstrap for hosts and tests.

use tracing::Level;

/// Initialize a compact stderr subscriber. Safe to call multiple times;
/// subsequent calls are no-ops for the global subscriber. Hosts embedding the
/// controller into an app with its own subscriber should skip this.
pub fn init_default() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init();
}
