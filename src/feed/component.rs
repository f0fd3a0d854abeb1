// SPDX-License-Identifier: MPL-2.0
//! Feed list component encapsulating state and update logic.
//!
//! The feed renders one viewport-sized item per record inside a vertical
//! scrollable. Scroll reports feed the [`VisibilityTracker`], which decides
//! the single current item. Items within the mount radius of the current one
//! own a player and an [`ActivationController`]; the rest are plain overlays.
//!
//! [`ActivationController`]: crate::playback::ActivationController

use super::item::{self, ItemView, MountedItem};
use super::visibility::VisibilityTracker;
use crate::application::port::{LifecycleSource, PlayerFactory, PlayerOptions};
use crate::domain::feed::VideoRecord;
use crate::domain::playback::{MountRadius, SnapSettle, VisibilityThreshold};
use crate::i18n::fluent::I18n;
use crate::playback::{ActivationController, ActivationSettings, PressToken};
use iced::widget::scrollable::{Direction, RelativeOffset, Scrollbar, Viewport};
use iced::widget::{operation, responsive, Column, Id, Scrollable};
use iced::{task, Element, Length, Task};
use std::collections::BTreeMap;

/// Identifier used for the feed scrollable widget.
pub const SCROLLABLE_ID: &str = "feed-scrollable";

/// Offsets closer than this to a page boundary count as aligned.
const ALIGNED_EPSILON: f32 = 0.5;

/// Overlay action buttons. They have no backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Like,
    Comment,
    Share,
}

/// Keyboard paging requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMove {
    Previous,
    Next,
    First,
    Last,
}

/// Messages emitted by the feed list and its items.
#[derive(Debug, Clone)]
pub enum Message {
    Scrolled {
        offset_y: f32,
        viewport_height: f32,
    },
    ScrollSettled {
        generation: u64,
    },
    /// Periodic poll of mounted players for new frames and errors.
    FrameTick,
    Pressed(usize),
    Released(usize),
    PressCancelled(usize),
    LongPressElapsed {
        index: usize,
        token: PressToken,
    },
    Action {
        index: usize,
        action: Action,
    },
    Page(PageMove),
}

/// Tuning of the feed, resolved once from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeedSettings {
    pub visibility_threshold: VisibilityThreshold,
    pub mount_radius: MountRadius,
    pub snap_settle: SnapSettle,
    pub activation: ActivationSettings,
    pub player: PlayerOptions,
}

/// Environment information required to render the feed.
#[derive(Clone, Copy)]
pub struct ViewEnv<'a> {
    pub i18n: &'a I18n,
}

/// Complete feed component state.
pub struct State {
    records: Vec<VideoRecord>,
    tracker: VisibilityTracker,
    settings: FeedSettings,
    factory: Box<dyn PlayerFactory>,
    current_index: usize,
    mounted: BTreeMap<usize, MountedItem>,
    offset_y: f32,
    viewport_height: f32,
    scroll_generation: u64,
    settle_timer: Option<task::Handle>,
}

impl State {
    /// Creates the feed with its first item current and playing.
    pub fn new(
        records: Vec<VideoRecord>,
        factory: Box<dyn PlayerFactory>,
        settings: FeedSettings,
        lifecycle: &dyn LifecycleSource,
    ) -> Self {
        let tracker = VisibilityTracker::new(settings.visibility_threshold, records.len());
        let mut state = Self {
            records,
            tracker,
            settings,
            factory,
            current_index: 0,
            mounted: BTreeMap::new(),
            offset_y: 0.0,
            viewport_height: 0.0,
            scroll_generation: 0,
            settle_timer: None,
        };
        state.refresh_mounts(lifecycle);
        state
    }

    #[must_use]
    pub fn records(&self) -> &[VideoRecord] {
        &self.records
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_record(&self) -> Option<&VideoRecord> {
        self.records.get(self.current_index)
    }

    #[must_use]
    pub fn is_active(&self, index: usize) -> bool {
        index == self.current_index
    }

    /// Indices that currently own a player, in ascending order.
    #[must_use]
    pub fn mounted_indices(&self) -> Vec<usize> {
        self.mounted.keys().copied().collect()
    }

    #[must_use]
    pub fn mounted(&self, index: usize) -> Option<&MountedItem> {
        self.mounted.get(&index)
    }

    /// Applies lifecycle changes published since the last call to every
    /// mounted controller.
    pub fn sync_lifecycle(&mut self) {
        for item in self.mounted.values_mut() {
            if let Some(controller) = item.controller_mut() {
                controller.sync_lifecycle();
            }
        }
    }

    pub fn handle_message(
        &mut self,
        message: Message,
        lifecycle: &dyn LifecycleSource,
    ) -> Task<Message> {
        match message {
            Message::Scrolled {
                offset_y,
                viewport_height,
            } => self.handle_scroll(offset_y, viewport_height, lifecycle),
            Message::ScrollSettled { generation } => {
                if generation != self.scroll_generation {
                    return Task::none();
                }
                self.settle_timer = None;
                match self.settle_target() {
                    Some(page) => {
                        tracing::trace!(page, "snapping to nearest page");
                        self.snap_to(page)
                    }
                    None => Task::none(),
                }
            }
            Message::FrameTick => {
                for (&index, item) in &mut self.mounted {
                    item.poll(index);
                }
                Task::none()
            }
            Message::Pressed(index) => self.handle_press(index),
            Message::Released(index) | Message::PressCancelled(index) => {
                if let Some(item) = self.mounted.get_mut(&index) {
                    item.clear_press_timer();
                    if let Some(controller) = item.controller_mut() {
                        controller.press_released();
                    }
                }
                Task::none()
            }
            Message::LongPressElapsed { index, token } => {
                if let Some(item) = self.mounted.get_mut(&index) {
                    let current = item
                        .controller()
                        .is_some_and(|c| c.pending_long_press() == Some(token));
                    if current {
                        item.clear_press_timer();
                    }
                    if let Some(controller) = item.controller_mut() {
                        controller.long_press_elapsed(token);
                    }
                }
                Task::none()
            }
            Message::Action { index, action } => {
                let id = self.records.get(index).map(|r| r.id().to_string());
                tracing::debug!(index, ?id, ?action, "action button pressed");
                Task::none()
            }
            Message::Page(movement) => {
                let last = self.records.len().saturating_sub(1);
                let target = match movement {
                    PageMove::Previous => self.current_index.saturating_sub(1),
                    PageMove::Next => (self.current_index + 1).min(last),
                    PageMove::First => 0,
                    PageMove::Last => last,
                };
                self.snap_to(target)
            }
        }
    }

    pub fn view<'a>(&'a self, env: ViewEnv<'a>) -> Element<'a, Message> {
        responsive(move |size| {
            let items = self.records.iter().enumerate().map(|(index, record)| {
                item::view(ItemView {
                    index,
                    record,
                    mounted: self.mounted.get(&index),
                    size,
                    i18n: env.i18n,
                })
            });

            Scrollable::new(Column::with_children(items))
                .id(Id::new(SCROLLABLE_ID))
                .width(Length::Fill)
                .height(Length::Fill)
                .direction(Direction::Vertical(Scrollbar::hidden()))
                .on_scroll(|viewport: Viewport| Message::Scrolled {
                    offset_y: viewport.absolute_offset().y,
                    viewport_height: viewport.bounds().height,
                })
                .into()
        })
        .into()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn handle_scroll(
        &mut self,
        offset_y: f32,
        viewport_height: f32,
        lifecycle: &dyn LifecycleSource,
    ) -> Task<Message> {
        self.offset_y = offset_y;
        self.viewport_height = viewport_height;

        let next = self
            .tracker
            .current_index(offset_y, viewport_height, self.current_index);
        if next != self.current_index {
            tracing::debug!(from = self.current_index, to = next, "current item changed");
            self.current_index = next;
            self.refresh_mounts(lifecycle);
        }

        // Restart the settle timer; the previous one is aborted on drop.
        self.scroll_generation = self.scroll_generation.wrapping_add(1);
        let generation = self.scroll_generation;
        let settle = self.settings.snap_settle.as_duration();
        let (task, handle) = Task::perform(
            async move { tokio::time::sleep(settle).await },
            move |()| Message::ScrollSettled { generation },
        )
        .abortable();
        self.settle_timer = Some(handle.abort_on_drop());
        task
    }

    fn handle_press(&mut self, index: usize) -> Task<Message> {
        if index != self.current_index {
            return Task::none();
        }
        let delay = self.settings.activation.long_press.as_duration();
        let Some(item) = self.mounted.get_mut(&index) else {
            return Task::none();
        };
        let Some(token) = item.controller_mut().and_then(|c| c.press_started()) else {
            return Task::none();
        };

        let (task, handle) = Task::perform(
            async move { tokio::time::sleep(delay).await },
            move |()| Message::LongPressElapsed { index, token },
        )
        .abortable();
        item.arm_press_timer(handle);
        task
    }

    /// Mounts items entering the window around the current index, unmounts
    /// items leaving it, then hands every mounted item its `is_active` flag.
    fn refresh_mounts(&mut self, lifecycle: &dyn LifecycleSource) {
        let center = self.current_index;
        let radius = self.settings.mount_radius;

        self.mounted.retain(|&index, _| {
            let keep = radius.contains(center, index);
            if !keep {
                tracing::debug!(index, "unmounting feed item");
            }
            keep
        });

        let first = center.saturating_sub(radius.value());
        let last = (center + radius.value()).min(self.records.len().saturating_sub(1));
        for index in first..=last {
            if self.mounted.contains_key(&index) {
                continue;
            }
            let Some(record) = self.records.get(index) else {
                continue;
            };
            let item = match self.factory.create(record.locator(), self.settings.player) {
                Ok(player) => MountedItem::with_controller(ActivationController::new(
                    player,
                    self.settings.activation,
                    lifecycle,
                )),
                Err(err) => {
                    tracing::error!(index, locator = %record.locator(), error = %err, "cannot create player");
                    MountedItem::failed(err)
                }
            };
            tracing::debug!(index, "mounted feed item");
            self.mounted.insert(index, item);
        }

        // Deactivate before activating so two items never play at once.
        for (&index, item) in &mut self.mounted {
            if index != center {
                item.set_active(false);
            }
        }
        if let Some(item) = self.mounted.get_mut(&center) {
            item.set_active(true);
        }
    }

    /// Page to snap to once scrolling stops, or `None` when already aligned.
    fn settle_target(&self) -> Option<usize> {
        let page = self.tracker.nearest_page(self.offset_y, self.viewport_height);
        (!self.is_aligned_on(page)).then_some(page)
    }

    fn is_aligned_on(&self, page: usize) -> bool {
        #[allow(clippy::cast_precision_loss)]
        let target = page as f32 * self.viewport_height;
        (self.offset_y - target).abs() < ALIGNED_EPSILON
    }

    fn snap_to(&self, page: usize) -> Task<Message> {
        operation::snap_to(
            Id::new(SCROLLABLE_ID),
            RelativeOffset {
                x: 0.0,
                y: self.tracker.relative_offset(page),
            },
        )
    }
}
