// SPDX-License-Identifier: MPL-2.0
//! Tracing subscriber setup.
//!
//! Log output goes to stderr through a `fmt` layer. The filter comes from
//! the `ICED_REELS_LOG` environment variable using `EnvFilter` directive
//! syntax (for example `debug` or `iced_reels::playback=trace,info`).

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter directives.
pub const ENV_LOG_FILTER: &str = "ICED_REELS_LOG";

/// Filter used when the environment variable is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber.
///
/// Idempotent: only the first call takes effect. Returns whether this call
/// installed the subscriber.
pub fn init() -> bool {
    let filter = EnvFilter::try_from_env(ENV_LOG_FILTER)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_no_op() {
        let _ = init();
        assert!(!init());
    }
}
