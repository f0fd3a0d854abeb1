// SPDX-License-Identifier: MPL-2.0
//! Container styles.

use crate::ui::design_tokens::palette::{BLACK, WHITE};
use iced::widget::container;
use iced::{Background, Theme};

/// Black backdrop behind every feed item, visible until the first frame.
pub fn feed_item(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(BLACK)),
        text_color: Some(WHITE),
        ..Default::default()
    }
}

/// Full-window splash background.
pub fn splash(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(BLACK)),
        text_color: Some(WHITE),
        ..Default::default()
    }
}
