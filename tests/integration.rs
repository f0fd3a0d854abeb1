// SPDX-License-Identifier: MPL-2.0
//! End-to-end tests for configuration, localization, feed loading and the
//! splash to feed navigation.

use iced_reels::app::config::{self, Config};
use iced_reels::app::{App, Message, Screen};
use iced_reels::error::Error;
use iced_reels::feed;
use iced_reels::i18n::fluent::I18n;
use iced_reels::test_utils::RecordingFactory;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_settings(config: &Config, path: &Path) {
    let content = toml::to_string_pretty(config).expect("Failed to serialize config");
    fs::write(path, content).expect("Failed to write config file");
}

#[test]
fn test_language_change_via_config() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let temp_config_file_path = dir.path().join("settings.toml");

    let mut initial_config = Config::default();
    initial_config.general.language = Some("en-US".to_string());
    write_settings(&initial_config, &temp_config_file_path);

    let loaded = config::load_from_path(&temp_config_file_path)
        .expect("Failed to load initial config from path");
    let i18n_en = I18n::new(None, loaded.general.language.as_deref());
    assert_eq!(i18n_en.current_locale().to_string(), "en-US");
    assert_eq!(i18n_en.tr("feed-paused"), "Paused");

    let mut french_config = Config::default();
    french_config.general.language = Some("fr".to_string());
    write_settings(&french_config, &temp_config_file_path);

    let loaded = config::load_from_path(&temp_config_file_path)
        .expect("Failed to load french config from path");
    let i18n_fr = I18n::new(None, loaded.general.language.as_deref());
    assert_eq!(i18n_fr.current_locale().to_string(), "fr");
    assert_eq!(i18n_fr.tr("feed-paused"), "En pause");
}

#[test]
fn cli_language_overrides_config() {
    let i18n = I18n::new(Some("en-US".to_string()), Some("fr"));
    assert_eq!(i18n.current_locale().to_string(), "en-US");
}

#[test]
fn every_error_key_is_translated() {
    use iced_reels::domain::error::{FeedError, VideoError};

    let errors = [
        Error::Io("disk".to_string()),
        Error::Config("bad".to_string()),
        Error::Feed(FeedError::Empty),
        Error::Feed(FeedError::MissingId { position: 0 }),
        Error::Feed(FeedError::Malformed {
            position: 1,
            reason: "invalid type".to_string(),
        }),
        Error::Video(VideoError::CorruptedFile),
        Error::Video(VideoError::NoVideoStream),
        Error::Video(VideoError::PlayerClosed),
        Error::Video(VideoError::Other("x".to_string())),
    ];

    for locale in ["en-US", "fr"] {
        let i18n = I18n::new(Some(locale.to_string()), None);
        for err in &errors {
            let text = i18n.tr(err.i18n_key());
            assert!(!text.starts_with("MISSING"), "{locale}: {}", err.i18n_key());
        }
    }
}

#[test]
fn feed_file_from_config_section_is_loaded() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let feed_path = dir.path().join("videos.toml");
    fs::write(
        &feed_path,
        r#"
[[videos]]
id = 7
uri = "https://example.com/seven.mp4"
title = "Seven"
likes = "1.2K"

[[videos]]
id = "eight"
url = "https://example.com/eight.mp4"
comments = 3
"#,
    )
    .expect("Failed to write feed file");

    let load = feed::source::load(Some(feed_path.as_path())).expect("feed should load");
    assert_eq!(load.records.len(), 2);
    assert!(load.rejected.is_empty());
    assert_eq!(load.records[0].title(), "Seven");
    assert_eq!(load.records[1].locator().as_str(), "https://example.com/eight.mp4");
}

#[test]
fn splash_hands_over_to_feed_with_configured_options() {
    let factory = RecordingFactory::new();
    let mut config = Config::default();
    config.playback.muted = Some(true);

    let (mut app, _task) = App::with_factory(
        &config,
        I18n::new(Some("en-US".to_string()), None),
        None,
        Box::new(factory.clone()),
    );
    assert_eq!(app.screen(), Screen::Splash);

    let token = app
        .splash()
        .armed_token()
        .expect("splash timer should be armed");
    let _ = app.update(Message::SplashElapsed(token));

    assert_eq!(app.screen(), Screen::Feed);
    let first = app
        .feed()
        .and_then(|feed| feed.current_record())
        .expect("feed should have a current record");
    let options = factory
        .options_for(first.locator().as_str())
        .expect("current item should own a player");
    assert!(options.muted);
    assert!(options.loop_enabled);
}

#[test]
fn feed_messages_before_navigation_are_ignored() {
    let factory = RecordingFactory::new();
    let (mut app, _task) = App::with_factory(
        &Config::default(),
        I18n::default(),
        None,
        Box::new(factory.clone()),
    );

    let _ = app.update(Message::Feed(feed::Message::Pressed(0)));
    let _ = app.update(Message::Feed(feed::Message::FrameTick));

    assert!(app.feed().is_none());
    assert_eq!(factory.created_count(), 0);
}
