// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use super::screen::SplashToken;
use crate::domain::playback::AppLifecycle;
use crate::feed;

/// Top-level messages consumed by `App::update`. The variants forward
/// lower-level component messages while keeping a single update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    /// The splash timer armed with this token elapsed.
    SplashElapsed(SplashToken),
    Feed(feed::Message),
    /// The window gained or lost focus.
    Lifecycle(AppLifecycle),
}

/// Runtime flags passed in from the CLI or launcher to tweak startup behavior.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `fr`, `en-US`).
    pub lang: Option<String>,
    /// Optional feed file overriding the configured and embedded feeds.
    pub feed: Option<String>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `ICED_REELS_CONFIG_DIR` environment variable.
    pub config_dir: Option<String>,
}
