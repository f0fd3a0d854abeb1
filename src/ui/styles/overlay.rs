// SPDX-License-Identifier: MPL-2.0
//! Overlay styles for the text and indicators drawn over videos.

use crate::ui::design_tokens::{
    opacity,
    palette::{BLACK, ERROR_500, WHITE},
    radius,
};
use iced::widget::container;
use iced::{Background, Border, Color, Theme};

/// Title, description and counters over the video. No background.
pub fn info_text(_theme: &Theme) -> container::Style {
    container::Style {
        text_color: Some(WHITE),
        ..Default::default()
    }
}

/// Centered status badge (loading, paused, playback error).
pub fn badge(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(Color {
            a: opacity::OVERLAY_STRONG,
            ..BLACK
        })),
        text_color: Some(WHITE),
        border: Border {
            color: Color {
                a: opacity::OVERLAY_SUBTLE,
                ..WHITE
            },
            width: 1.0,
            radius: radius::FULL.into(),
        },
        ..Default::default()
    }
}

/// Status badge variant for playback errors.
pub fn error_badge(theme: &Theme) -> container::Style {
    let base = badge(theme);
    container::Style {
        border: Border {
            color: ERROR_500,
            ..base.border
        },
        ..base
    }
}
