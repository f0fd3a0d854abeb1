// SPDX-License-Identifier: MPL-2.0
//! Splash screen shown while the feed is being prepared.

use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{palette, sizing, spacing, typography};
use crate::ui::styles;
use iced::alignment::{Horizontal, Vertical};
use iced::widget::{Column, Container, Text};
use iced::{Element, Length};

/// Renders the splash screen. It emits no messages.
///
/// `notice_key` names an optional warning shown under the tagline.
pub fn view<'a, Message: 'a>(i18n: &I18n, notice_key: Option<&str>) -> Element<'a, Message> {
    let mut content = Column::new()
        .spacing(spacing::SM)
        .align_x(Horizontal::Center)
        .push(
            Text::new("▶")
                .size(sizing::ICON_XXL)
                .color(palette::ACCENT_500),
        )
        .push(Text::new(i18n.tr("window-title")).size(typography::TITLE_LG))
        .push(
            Text::new(i18n.tr("splash-tagline"))
                .size(typography::BODY)
                .color(palette::GRAY_200),
        );

    if let Some(key) = notice_key {
        content = content.push(
            Text::new(i18n.tr(key))
                .size(typography::CAPTION)
                .color(palette::ERROR_500),
        );
    }

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(Horizontal::Center)
        .align_y(Vertical::Center)
        .style(styles::container::splash)
        .into()
}
