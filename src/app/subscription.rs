// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.
//!
//! Window focus changes are routed on every screen so the lifecycle hub
//! always knows whether the application is in the foreground. Paging keys
//! and the frame poll only run while the feed is shown.

use super::{Message, Screen};
use crate::domain::playback::AppLifecycle;
use crate::feed::{self, PageMove};
use iced::keyboard::{self, key::Named, Key};
use iced::{event, time, window, Event, Subscription};
use std::time::Duration;

/// Interval between polls of the mounted players.
pub const FRAME_POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Creates the event subscription for the current screen.
pub fn create_event_subscription(screen: Screen) -> Subscription<Message> {
    match screen {
        Screen::Splash => event::listen_with(|event, _status, _window| lifecycle_message(&event)),
        Screen::Feed => event::listen_with(|event, status, _window| {
            if let Some(message) = lifecycle_message(&event) {
                return Some(message);
            }
            match status {
                event::Status::Ignored => page_message(&event),
                event::Status::Captured => None,
            }
        }),
    }
}

/// Polls the mounted players at display rate while the feed is shown.
pub fn create_frame_subscription(screen: Screen) -> Subscription<Message> {
    match screen {
        Screen::Feed => time::every(FRAME_POLL_INTERVAL).map(|_| Message::Feed(feed::Message::FrameTick)),
        Screen::Splash => Subscription::none(),
    }
}

fn lifecycle_message(event: &Event) -> Option<Message> {
    match event {
        Event::Window(window::Event::Focused) => Some(Message::Lifecycle(AppLifecycle::Active)),
        Event::Window(window::Event::Unfocused) => {
            Some(Message::Lifecycle(AppLifecycle::Background))
        }
        _ => None,
    }
}

pub(crate) fn page_message(event: &Event) -> Option<Message> {
    let Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) = event else {
        return None;
    };
    page_move_for(key).map(|page| Message::Feed(feed::Message::Page(page)))
}

pub(crate) fn page_move_for(key: &Key) -> Option<PageMove> {
    match key {
        Key::Named(Named::ArrowUp | Named::PageUp) => Some(PageMove::Previous),
        Key::Named(Named::ArrowDown | Named::PageDown) => Some(PageMove::Next),
        Key::Named(Named::Home) => Some(PageMove::First),
        Key::Named(Named::End) => Some(PageMove::Last),
        _ => None,
    }
}
