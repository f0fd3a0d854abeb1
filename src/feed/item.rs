// SPDX-License-Identifier: MPL-2.0
//! A single feed item: its mounted playback resources and its view.

use super::component::{Action, Message};
use crate::application::port::{PlayerBinding, PlayerEvent};
use crate::domain::error::VideoError;
use crate::domain::feed::VideoRecord;
use crate::i18n::fluent::I18n;
use crate::playback::ActivationController;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use iced::task;
use iced::widget::{button, container, image, mouse_area, Column, Container, Row, Stack, Text};
use iced::{
    alignment::{Horizontal, Vertical},
    ContentFit, Element, Font, Length, Padding, Size, Theme,
};

/// Controller driving a boxed player, as mounted by the feed.
pub type ItemController = ActivationController<Box<dyn PlayerBinding>>;

/// Playback resources of an item inside the mount window.
///
/// Dropping it stops the player, releases the lifecycle subscription and
/// aborts a pending long-press timer.
pub struct MountedItem {
    controller: Option<ItemController>,
    frame: Option<image::Handle>,
    error: Option<VideoError>,
    press_timer: Option<task::Handle>,
}

impl MountedItem {
    pub(crate) fn with_controller(controller: ItemController) -> Self {
        Self {
            controller: Some(controller),
            frame: None,
            error: None,
            press_timer: None,
        }
    }

    /// Item whose player could not be created.
    pub(crate) fn failed(error: VideoError) -> Self {
        Self {
            controller: None,
            frame: None,
            error: Some(error),
            press_timer: None,
        }
    }

    #[must_use]
    pub fn controller(&self) -> Option<&ItemController> {
        self.controller.as_ref()
    }

    pub(crate) fn controller_mut(&mut self) -> Option<&mut ItemController> {
        self.controller.as_mut()
    }

    #[must_use]
    pub fn error(&self) -> Option<&VideoError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn has_frame(&self) -> bool {
        self.frame.is_some()
    }

    #[must_use]
    pub fn has_press_timer(&self) -> bool {
        self.press_timer.is_some()
    }

    pub(crate) fn arm_press_timer(&mut self, handle: task::Handle) {
        self.press_timer = Some(handle.abort_on_drop());
    }

    pub(crate) fn clear_press_timer(&mut self) {
        self.press_timer = None;
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        if !active {
            self.press_timer = None;
        }
        if let Some(controller) = self.controller.as_mut() {
            controller.set_active(active);
        }
    }

    /// Pulls the newest player output into the item.
    pub(crate) fn poll(&mut self, index: usize) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        match controller.poll_player() {
            Some(PlayerEvent::Frame(frame)) => {
                // A fresh frame means the player recovered.
                if self.error.take().is_some() {
                    tracing::debug!(index, "playback recovered");
                }
                self.frame = Some(image::Handle::from_rgba(frame.width, frame.height, frame.rgba));
            }
            Some(PlayerEvent::Error(err)) => {
                tracing::error!(index, error = %err, "playback failed");
                self.error = Some(err);
            }
            None => {}
        }
    }
}

impl std::fmt::Debug for MountedItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountedItem")
            .field("controller", &self.controller)
            .field("has_frame", &self.frame.is_some())
            .field("error", &self.error)
            .field("press_timer", &self.press_timer.is_some())
            .finish()
    }
}

// =============================================================================
// View
// =============================================================================

pub(crate) struct ItemView<'a> {
    pub index: usize,
    pub record: &'a VideoRecord,
    pub mounted: Option<&'a MountedItem>,
    pub size: Size,
    pub i18n: &'a I18n,
}

pub(crate) fn view(item: ItemView<'_>) -> Element<'_, Message> {
    let ItemView {
        index,
        record,
        mounted,
        size,
        i18n,
    } = item;

    let surface: Element<'_, Message> = match mounted.and_then(|m| m.frame.clone()) {
        Some(handle) => image(handle)
            .content_fit(ContentFit::Cover)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        None => Container::new(Text::new(""))
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
    };

    let surface = mouse_area(surface)
        .on_press(Message::Pressed(index))
        .on_release(Message::Released(index))
        .on_exit(Message::PressCancelled(index));

    let mut layers = Stack::new()
        .width(Length::Fill)
        .height(Length::Fill)
        .push(surface);

    if let Some((status, is_error)) = status_label(mounted, i18n) {
        let badge_style: fn(&Theme) -> container::Style = if is_error {
            styles::overlay::error_badge
        } else {
            styles::overlay::badge
        };
        layers = layers.push(
            Container::new(
                Container::new(Text::new(status).size(typography::BODY))
                    .padding(spacing::SM)
                    .style(badge_style),
            )
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Horizontal::Center)
            .align_y(Vertical::Center),
        );
    }

    layers = layers.push(info_overlay(index, record, i18n));

    Container::new(layers)
        .width(Length::Fixed(size.width))
        .height(Length::Fixed(size.height))
        .style(styles::container::feed_item)
        .into()
}

/// Centered status text and whether it reports an error.
fn status_label(mounted: Option<&MountedItem>, i18n: &I18n) -> Option<(String, bool)> {
    let mounted = mounted?;
    if let Some(err) = mounted.error() {
        return Some((i18n.tr(err.i18n_key()), true));
    }
    let controller = mounted.controller()?;
    if controller.is_paused_by_long_press() {
        return Some((i18n.tr("feed-paused"), false));
    }
    if controller.state().is_active() && !mounted.has_frame() {
        return Some((i18n.tr("feed-loading"), false));
    }
    None
}

fn info_overlay<'a>(index: usize, record: &'a VideoRecord, i18n: &I18n) -> Element<'a, Message> {
    let info = Column::new()
        .spacing(spacing::XS)
        .width(Length::Fill)
        .push(
            Text::new(record.title())
                .size(typography::BODY_LG)
                .font(Font {
                    weight: iced::font::Weight::Bold,
                    ..Font::DEFAULT
                }),
        )
        .push(Text::new(record.description()).size(typography::BODY));

    let actions = Column::new()
        .spacing(spacing::MD)
        .align_x(Horizontal::Center)
        .push(action_button(
            index,
            Action::Like,
            "❤️",
            record.likes().display(),
        ))
        .push(action_button(
            index,
            Action::Comment,
            "💬",
            record.comments().display(),
        ))
        .push(action_button(
            index,
            Action::Share,
            "📤",
            i18n.tr("feed-action-share"),
        ));

    let row = Row::new()
        .spacing(spacing::MD)
        .align_y(Vertical::Bottom)
        .push(info)
        .push(actions);

    Container::new(row)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_y(Vertical::Bottom)
        .padding(Padding {
            top: spacing::MD,
            right: spacing::MD,
            bottom: spacing::XXL,
            left: spacing::MD,
        })
        .style(styles::overlay::info_text)
        .into()
}

fn action_button<'a>(
    index: usize,
    action: Action,
    glyph: &'a str,
    label: String,
) -> Element<'a, Message> {
    let content = Column::new()
        .spacing(spacing::XXS)
        .align_x(Horizontal::Center)
        .push(Text::new(glyph).size(sizing::ICON_MD))
        .push(Text::new(label).size(typography::CAPTION));

    button(content)
        .padding(spacing::XXS)
        .style(styles::button::action)
        .on_press(Message::Action { index, action })
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::{PlayerOptions, VideoFrame};
    use crate::playback::{ActivationSettings, LifecycleHub};
    use crate::test_utils::RecordingPlayer;

    fn frame(pts_secs: f64) -> VideoFrame {
        VideoFrame {
            rgba: vec![0; 2 * 2 * 4],
            width: 2,
            height: 2,
            pts_secs,
        }
    }

    fn mounted_with(events: Vec<PlayerEvent>) -> MountedItem {
        let mut player = RecordingPlayer::new(PlayerOptions::default());
        for event in events {
            player.push_event(event);
        }
        let player: Box<dyn PlayerBinding> = Box::new(player);
        let hub = LifecycleHub::new();
        let controller = ActivationController::new(player, ActivationSettings::default(), &hub);
        MountedItem::with_controller(controller)
    }

    #[test]
    fn error_shows_an_error_badge() {
        let i18n = I18n::new(Some("en-US".to_string()), None);
        let mut item = mounted_with(vec![PlayerEvent::Error(VideoError::CorruptedFile)]);

        item.poll(0);

        assert_eq!(item.error(), Some(&VideoError::CorruptedFile));
        let (_, is_error) = status_label(Some(&item), &i18n).expect("badge should show");
        assert!(is_error);
    }

    #[test]
    fn newer_frame_clears_error_badge() {
        let i18n = I18n::new(Some("en-US".to_string()), None);
        let mut item = mounted_with(vec![
            PlayerEvent::Error(VideoError::DecodingFailed("bad packet".to_string())),
            PlayerEvent::Frame(frame(0.5)),
        ]);

        item.poll(0);
        assert!(item.error().is_some());

        item.poll(0);
        assert!(item.error().is_none());
        assert!(item.has_frame());
        assert!(!matches!(status_label(Some(&item), &i18n), Some((_, true))));
    }

    #[test]
    fn failed_item_keeps_its_error() {
        let mut item = MountedItem::failed(VideoError::NoVideoStream);
        item.poll(0);
        assert_eq!(item.error(), Some(&VideoError::NoVideoStream));
    }
}
