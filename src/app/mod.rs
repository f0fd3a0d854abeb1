// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration between the splash screen and
//! the feed.
//!
//! The `App` struct wires together configuration, localization, the
//! lifecycle hub and the feed, and translates window events into lifecycle
//! changes. The feed is only mounted once the splash screen is left, so no
//! player starts while the splash is visible.

pub mod config;
mod message;
pub mod paths;
mod screen;
mod subscription;

pub use message::{Flags, Message};
pub use screen::{Screen, SplashNavigator, SplashToken};

use crate::application::port::PlayerFactory;
use crate::domain::feed::VideoRecord;
use crate::domain::playback::SplashDelay;
use crate::error::Error;
use crate::feed::{self, FeedSettings};
use crate::i18n::fluent::I18n;
use crate::infrastructure::ffmpeg::{self, FfmpegPlayerFactory};
use crate::playback::LifecycleHub;
use crate::ui::design_tokens::{palette, sizing, spacing, typography};
use crate::ui::{splash, styles};
use config::Config;
use iced::alignment::{Horizontal, Vertical};
use iced::widget::{Container, Text};
use iced::{window, Element, Length, Subscription, Task, Theme};
use std::fmt;
use std::path::{Path, PathBuf};

/// Everything needed to mount the feed once the splash screen is left.
struct PendingFeed {
    records: Vec<VideoRecord>,
    factory: Box<dyn PlayerFactory>,
    settings: FeedSettings,
}

/// Root Iced application state.
pub struct App {
    pub i18n: I18n,
    screen: Screen,
    splash: SplashNavigator,
    lifecycle: LifecycleHub,
    pending_feed: Option<PendingFeed>,
    feed: Option<feed::State>,
    feed_error: Option<Error>,
    /// i18n key of a configuration warning shown on the splash screen.
    config_warning: Option<String>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("screen", &self.screen)
            .field("feed_mounted", &self.feed.is_some())
            .field("feed_error", &self.feed_error)
            .finish()
    }
}

/// Builds the window settings
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(sizing::WINDOW_WIDTH, sizing::WINDOW_HEIGHT),
        min_size: Some(iced::Size::new(
            sizing::WINDOW_MIN_WIDTH,
            sizing::WINDOW_MIN_HEIGHT,
        )),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // iced 0.14 requires a `Fn` boot function; flags are consumed on the first call
    let boot_state = RefCell::new(Some(flags));
    let boot = move || App::new(boot_state.borrow_mut().take().unwrap_or_default());

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Loads configuration and translations, prepares the FFmpeg player
    /// factory and arms the splash timer.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        paths::init_cli_overrides(flags.config_dir.clone());
        let (config, config_warning) = config::load();
        let i18n = I18n::new(flags.lang.clone(), config.general.language.as_deref());

        if let Err(err) = ffmpeg::init_ffmpeg() {
            tracing::error!(error = %err, "FFmpeg initialization failed");
        }

        let feed_source = flags
            .feed
            .map(PathBuf::from)
            .or_else(|| config.feed.source.clone());

        let (mut app, task) = Self::with_factory(
            &config,
            i18n,
            feed_source.as_deref(),
            Box::new(FfmpegPlayerFactory::new()),
        );
        app.config_warning = config_warning;
        (app, task)
    }

    /// Builds the application around an arbitrary player factory.
    ///
    /// The returned task fires the splash timer.
    pub fn with_factory(
        config: &Config,
        i18n: I18n,
        feed_source: Option<&Path>,
        factory: Box<dyn PlayerFactory>,
    ) -> (Self, Task<Message>) {
        let (pending_feed, feed_error) = match feed::source::load(feed_source) {
            Ok(load) => {
                tracing::info!(
                    videos = load.records.len(),
                    rejected = load.rejected.len(),
                    "feed loaded"
                );
                let pending = PendingFeed {
                    records: load.records,
                    factory,
                    settings: config.to_feed_settings(),
                };
                (Some(pending), None)
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load feed");
                (None, Some(err))
            }
        };

        let mut app = Self {
            i18n,
            screen: Screen::Splash,
            splash: SplashNavigator::new(),
            lifecycle: LifecycleHub::new(),
            pending_feed,
            feed: None,
            feed_error,
            config_warning: None,
        };
        let task = app.arm_splash(config.splash_delay());
        (app, task)
    }

    fn arm_splash(&mut self, delay: SplashDelay) -> Task<Message> {
        tracing::debug!(delay_ms = delay.as_millis(), "splash timer armed");
        self.splash.start(delay).map(Message::SplashElapsed)
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn splash(&self) -> &SplashNavigator {
        &self.splash
    }

    #[must_use]
    pub fn feed(&self) -> Option<&feed::State> {
        self.feed.as_ref()
    }

    #[must_use]
    pub fn feed_error(&self) -> Option<&Error> {
        self.feed_error.as_ref()
    }

    #[must_use]
    pub fn lifecycle(&self) -> &LifecycleHub {
        &self.lifecycle
    }

    fn title(&self) -> String {
        let app_name = self.i18n.tr("window-title");
        let current = self.feed.as_ref().and_then(feed::State::current_record);
        match (self.screen, current) {
            (Screen::Feed, Some(record)) => format!("{} - {app_name}", record.title()),
            _ => app_name,
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        let event_sub = subscription::create_event_subscription(self.screen);
        let frame_sub = if self.feed.is_some() {
            subscription::create_frame_subscription(self.screen)
        } else {
            Subscription::none()
        };

        Subscription::batch([event_sub, frame_sub])
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SplashElapsed(token) => {
                if self.splash.elapsed(token) {
                    self.show_feed();
                }
                Task::none()
            }
            Message::Feed(feed_message) => match self.feed.as_mut() {
                Some(feed) => feed
                    .handle_message(feed_message, &self.lifecycle)
                    .map(Message::Feed),
                None => Task::none(),
            },
            Message::Lifecycle(state) => {
                if self.lifecycle.publish(state) {
                    if let Some(feed) = self.feed.as_mut() {
                        feed.sync_lifecycle();
                    }
                }
                Task::none()
            }
        }
    }

    fn show_feed(&mut self) {
        tracing::info!("leaving splash screen");
        self.screen = Screen::Feed;
        if let Some(pending) = self.pending_feed.take() {
            self.feed = Some(feed::State::new(
                pending.records,
                pending.factory,
                pending.settings,
                &self.lifecycle,
            ));
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        match self.screen {
            Screen::Splash => splash::view(&self.i18n, self.config_warning.as_deref()),
            Screen::Feed => match (&self.feed, &self.feed_error) {
                (Some(feed), _) => feed
                    .view(feed::ViewEnv { i18n: &self.i18n })
                    .map(Message::Feed),
                (None, Some(err)) => self.feed_error_view(err),
                (None, None) => self.feed_error_view(&Error::Feed(
                    crate::domain::error::FeedError::Empty,
                )),
            },
        }
    }

    fn feed_error_view(&self, err: &Error) -> Element<'_, Message> {
        let reason = self.i18n.tr(err.i18n_key());
        let text = self
            .i18n
            .tr_with_args("feed-load-failed", &[("reason", reason.as_str())]);

        Container::new(
            Text::new(text)
                .size(typography::BODY_LG)
                .color(palette::WHITE),
        )
        .padding(spacing::LG)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(Horizontal::Center)
        .align_y(Vertical::Center)
        .style(styles::container::splash)
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::playback::AppLifecycle;
    use crate::test_utils::RecordingFactory;
    use std::fs;
    use tempfile::tempdir;

    fn app_with(feed_source: Option<&Path>) -> (App, RecordingFactory) {
        let factory = RecordingFactory::new();
        let (app, _task) = App::with_factory(
            &Config::default(),
            I18n::new(Some("en-US".to_string()), None),
            feed_source,
            Box::new(factory.clone()),
        );
        (app, factory)
    }

    fn leave_splash(app: &mut App) {
        let token = app.splash().armed_token().expect("splash timer should be armed");
        let _ = app.update(Message::SplashElapsed(token));
    }

    #[test]
    fn starts_on_splash_without_players() {
        let (app, factory) = app_with(None);

        assert_eq!(app.screen(), Screen::Splash);
        assert!(app.feed().is_none());
        assert_eq!(factory.created_count(), 0);
    }

    #[test]
    fn splash_elapsed_mounts_feed_once() {
        let (mut app, factory) = app_with(None);
        let token = app.splash().armed_token().expect("splash timer should be armed");

        let _ = app.update(Message::SplashElapsed(token));
        assert_eq!(app.screen(), Screen::Feed);
        assert!(app.feed().is_some_and(|feed| feed.is_active(0)));
        let created = factory.created_count();
        assert!(created > 0);

        let _ = app.update(Message::SplashElapsed(token));
        assert_eq!(factory.created_count(), created);
    }

    #[test]
    fn lifecycle_changes_reach_mounted_feed() {
        let (mut app, _factory) = app_with(None);
        leave_splash(&mut app);

        let _ = app.update(Message::Lifecycle(AppLifecycle::Background));
        let controller = app
            .feed()
            .and_then(|feed| feed.mounted(0))
            .and_then(|item| item.controller())
            .expect("current item should own a controller");
        assert!(!controller.is_playing());
        assert!(controller.was_playing_before_background());

        let _ = app.update(Message::Lifecycle(AppLifecycle::Active));
        let controller = app
            .feed()
            .and_then(|feed| feed.mounted(0))
            .and_then(|item| item.controller())
            .expect("current item should own a controller");
        assert!(controller.is_playing());
    }

    #[test]
    fn unreadable_feed_is_reported() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("videos.toml");
        fs::write(&path, "[[videos]]\ntitle = \"no id\"\n").expect("failed to write feed");

        let (mut app, factory) = app_with(Some(path.as_path()));
        leave_splash(&mut app);

        assert_eq!(app.screen(), Screen::Feed);
        assert!(app.feed().is_none());
        assert!(matches!(app.feed_error(), Some(Error::Feed(_))));
        assert_eq!(factory.created_count(), 0);
    }

    #[test]
    fn title_follows_current_video() {
        let (mut app, _factory) = app_with(None);
        assert_eq!(app.title(), "IcedReels");

        leave_splash(&mut app);
        let expected = app
            .feed()
            .and_then(feed::State::current_record)
            .map(|record| format!("{} - IcedReels", record.title()))
            .expect("feed should have a current record");
        assert_eq!(app.title(), expected);
    }
}
