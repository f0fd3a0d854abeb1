// SPDX-License-Identifier: MPL-2.0
//! Feed visibility tracking.
//!
//! Every feed item is exactly one viewport tall, so item `i` occupies
//! `[i * h, (i + 1) * h)` in content coordinates. The tracker turns a scroll
//! offset into the index of the item that is "current": the one whose
//! visible fraction strictly exceeds the threshold. With a threshold of at
//! least 50%, at most one item can qualify.

use crate::domain::playback::VisibilityThreshold;

/// Computes the current item from scroll reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityTracker {
    threshold: VisibilityThreshold,
    item_count: usize,
}

impl VisibilityTracker {
    #[must_use]
    pub fn new(threshold: VisibilityThreshold, item_count: usize) -> Self {
        Self {
            threshold,
            item_count,
        }
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    #[must_use]
    pub fn threshold(&self) -> VisibilityThreshold {
        self.threshold
    }

    /// Fraction of the viewport covered by item `index` at `offset_y`.
    #[must_use]
    pub fn visible_fraction(&self, index: usize, offset_y: f32, viewport_height: f32) -> f32 {
        if viewport_height <= 0.0 || index >= self.item_count {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let top = index as f32 * viewport_height;
        let bottom = top + viewport_height;
        let overlap = bottom.min(offset_y + viewport_height) - top.max(offset_y);
        (overlap / viewport_height).clamp(0.0, 1.0)
    }

    /// Index of the item whose visible fraction exceeds the threshold.
    ///
    /// Returns `previous` when no item qualifies (exact ties, zero-sized
    /// viewport, empty feed), so a transition in progress never changes the
    /// current item.
    #[must_use]
    pub fn current_index(&self, offset_y: f32, viewport_height: f32, previous: usize) -> usize {
        if self.item_count == 0 || viewport_height <= 0.0 || !offset_y.is_finite() {
            return previous;
        }
        let first = self.page_floor(offset_y, viewport_height);
        let threshold = self.threshold.fraction();

        [first, first + 1]
            .into_iter()
            .find(|&index| self.visible_fraction(index, offset_y, viewport_height) > threshold)
            .unwrap_or(previous)
    }

    /// Page the list should snap to once scrolling settles.
    #[must_use]
    pub fn nearest_page(&self, offset_y: f32, viewport_height: f32) -> usize {
        if self.item_count == 0 || viewport_height <= 0.0 || !offset_y.is_finite() {
            return 0;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let page = (offset_y.max(0.0) / viewport_height).round() as usize;
        page.min(self.item_count - 1)
    }

    /// Relative scroll position (`0.0..=1.0`) that shows page `index`.
    #[must_use]
    pub fn relative_offset(&self, index: usize) -> f32 {
        if self.item_count <= 1 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = index.min(self.item_count - 1) as f32 / (self.item_count - 1) as f32;
        ratio
    }

    fn page_floor(&self, offset_y: f32, viewport_height: f32) -> usize {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let page = (offset_y.max(0.0) / viewport_height).floor() as usize;
        page.min(self.item_count.saturating_sub(1))
    }
}
