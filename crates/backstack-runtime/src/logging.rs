#![forbid(unsafe_code)]

//! JSON log output for production builds (feature `tracing-json`).
//!
//! Every component logs under a `backstack.<area>` target, so
//! `RUST_LOG=backstack.resolver=debug` narrows output to back resolution.

use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str = "backstack=info";

/// Install a global JSON subscriber filtered by `RUST_LOG`, falling back to
/// [`DEFAULT_DIRECTIVE`].
///
/// Fails if a global subscriber is already installed.
pub fn init_json() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .try_init()
}
