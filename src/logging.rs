//! Installs a default `tracing` subscriber at process start, gated behind the
//! `setup_tracing` feature. Whether it actually installs anything is
//! controlled by the `DEBUG_BOXWALK` environment variable: unset, `"0"`,
//! `"false"`, or empty leaves logging disabled (the caller's own subscriber,
//! if any, wins); any other value installs a `DEBUG`-level `fmt` subscriber.

#[cfg(feature = "setup_tracing")]
use ctor::ctor;
#[cfg(feature = "setup_tracing")]
use tracing::Level;

#[cfg(feature = "setup_tracing")]
#[ctor]
fn set_debug_level() {
    // If DEBUG_BOXWALK is not set or set to false, disable logging. Otherwise, enable logging
    if std::env::var("DEBUG_BOXWALK").map_or(true, |v| v == "0" || v == "false" || v.is_empty()) {
        // Disable logging
    } else {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .init();
    }
}
