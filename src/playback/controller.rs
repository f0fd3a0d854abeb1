// SPDX-License-Identifier: MPL-2.0
//! Playback activation controller.
//!
//! One controller exists per mounted feed item. It owns the item's player
//! and lifecycle subscription and turns three inputs into player commands:
//!
//! - the `is_active` flag computed by the feed list
//! - press / long-press / release gestures on the item surface
//! - application lifecycle changes
//!
//! All inputs go through [`ActivationController`]'s transition methods, so a
//! long-press timer that fires after the item was deactivated is a no-op and
//! the player never receives contradicting commands.
//!
//! # State machine
//!
//! ```text
//!            set_active(true)                 long press
//! Inactive ───────────────────▶ ActivePlaying ──────────▶ ActivePausedByGesture
//!    ▲                            │    ▲   ◀──────────────────────┘ release
//!    │ set_active(false)          │    │ foreground (if it was playing)
//!    └──────── from any ──────────▼    │
//!                        ActivePausedByBackground
//! ```

use crate::application::port::{
    LifecycleListener, LifecycleSource, PlayerBinding, PlayerEvent, PlayerOptions,
};
use crate::domain::playback::{
    ActivationOffset, ActivationState, AppLifecycle, LongPressDelay, PlayerCommand,
};

/// Tuning of a controller, resolved once from the configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivationSettings {
    /// Position sought to when the item becomes active.
    pub seek_offset: ActivationOffset,
    /// Hold time before a press pauses playback.
    pub long_press: LongPressDelay,
    /// Pause the player explicitly when the application leaves the foreground.
    pub pause_on_background: bool,
}

impl Default for ActivationSettings {
    fn default() -> Self {
        Self {
            seek_offset: ActivationOffset::default(),
            long_press: LongPressDelay::default(),
            pause_on_background: true,
        }
    }
}

/// Identifies one press so its timer can be matched on expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PressToken(u64);

/// Per-item playback state machine.
pub struct ActivationController<P: PlayerBinding> {
    player: P,
    settings: ActivationSettings,
    state: ActivationState,
    foreground: bool,
    was_playing_before_background: bool,
    pending_press: Option<PressToken>,
    next_press: u64,
    last_command: Option<PlayerCommand>,
    lifecycle: Box<dyn LifecycleListener>,
}

impl<P: PlayerBinding> ActivationController<P> {
    /// Creates an inactive controller and subscribes it to `lifecycle`.
    ///
    /// No command is sent to the player until the item is activated.
    pub fn new(player: P, settings: ActivationSettings, lifecycle: &dyn LifecycleSource) -> Self {
        Self {
            player,
            settings,
            state: ActivationState::Inactive,
            foreground: !lifecycle.current().is_away(),
            was_playing_before_background: false,
            pending_press: None,
            next_press: 0,
            last_command: None,
            lifecycle: lifecycle.subscribe(),
        }
    }

    // =========================================================================
    // Inputs
    // =========================================================================

    /// Applies the `is_active` flag computed by the feed list.
    ///
    /// Repeating the current value does nothing.
    pub fn set_active(&mut self, active: bool) {
        match (self.state.is_active(), active) {
            (false, true) => self.activate(),
            (true, false) => self.deactivate(),
            _ => {}
        }
    }

    /// Registers the start of a press on the item.
    ///
    /// Returns the token the caller must hand back to
    /// [`long_press_elapsed`](Self::long_press_elapsed) once the long-press
    /// delay has passed. Presses only arm a timer while the video is playing.
    pub fn press_started(&mut self) -> Option<PressToken> {
        if !self.state.is_playing() {
            return None;
        }
        let token = PressToken(self.next_press);
        self.next_press = self.next_press.wrapping_add(1);
        self.pending_press = Some(token);
        Some(token)
    }

    /// Handles expiry of a long-press timer.
    ///
    /// Returns true when playback was paused. A token that is no longer the
    /// pending one (released, superseded or deactivated since) is ignored.
    pub fn long_press_elapsed(&mut self, token: PressToken) -> bool {
        if self.pending_press != Some(token) {
            return false;
        }
        self.pending_press = None;
        if !self.state.is_playing() {
            return false;
        }
        self.issue(PlayerCommand::Pause);
        self.transition(ActivationState::ActivePausedByGesture);
        true
    }

    /// Handles the end of a press: release, cancel, or pointer leaving.
    ///
    /// Before the long-press delay this is a tap and changes nothing. After a
    /// gesture pause it resumes playback.
    pub fn press_released(&mut self) {
        self.pending_press = None;
        if self.state.is_paused_by_gesture() {
            self.issue(PlayerCommand::Play);
            self.transition(ActivationState::ActivePlaying);
        }
    }

    /// Applies an application lifecycle change.
    pub fn lifecycle_changed(&mut self, lifecycle: AppLifecycle) {
        let foreground = !lifecycle.is_away();
        if foreground == self.foreground {
            return;
        }
        self.foreground = foreground;

        if foreground {
            self.resume_from_background();
        } else {
            self.suspend_for_background();
        }
    }

    /// Drains the lifecycle subscription and applies every pending change.
    pub fn sync_lifecycle(&mut self) {
        while let Some(change) = self.lifecycle.try_next() {
            self.lifecycle_changed(change);
        }
    }

    /// Polls the player, collapsing queued frames to the newest one.
    ///
    /// Errors are returned as soon as they are seen.
    pub fn poll_player(&mut self) -> Option<PlayerEvent> {
        let mut latest = None;
        while let Some(event) = self.player.poll() {
            if matches!(event, PlayerEvent::Error(_)) {
                return Some(event);
            }
            latest = Some(event);
        }
        latest
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn state(&self) -> ActivationState {
        self.state
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    #[must_use]
    pub fn is_paused_by_long_press(&self) -> bool {
        self.state.is_paused_by_gesture()
    }

    #[must_use]
    pub fn was_playing_before_background(&self) -> bool {
        self.was_playing_before_background
    }

    /// The press whose long-press timer is currently armed.
    #[must_use]
    pub fn pending_long_press(&self) -> Option<PressToken> {
        self.pending_press
    }

    /// Most recent command sent to the player.
    #[must_use]
    pub fn last_command(&self) -> Option<PlayerCommand> {
        self.last_command
    }

    #[must_use]
    pub fn settings(&self) -> ActivationSettings {
        self.settings
    }

    #[must_use]
    pub fn player_options(&self) -> PlayerOptions {
        self.player.options()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    fn activate(&mut self) {
        self.issue(PlayerCommand::Seek {
            secs: self.settings.seek_offset.as_secs(),
        });

        if self.foreground {
            self.issue(PlayerCommand::Play);
            self.transition(ActivationState::ActivePlaying);
        } else {
            // Start as soon as the application comes back.
            self.was_playing_before_background = true;
            self.transition(ActivationState::ActivePausedByBackground);
        }
    }

    fn deactivate(&mut self) {
        self.pending_press = None;
        self.was_playing_before_background = false;
        self.issue(PlayerCommand::Pause);
        self.transition(ActivationState::Inactive);
    }

    fn suspend_for_background(&mut self) {
        self.was_playing_before_background = self.state.is_playing();
        if !self.was_playing_before_background {
            return;
        }
        self.pending_press = None;
        if self.settings.pause_on_background {
            self.issue(PlayerCommand::Pause);
        }
        self.transition(ActivationState::ActivePausedByBackground);
    }

    fn resume_from_background(&mut self) {
        let resume = self.was_playing_before_background && self.state.is_active();
        self.was_playing_before_background = false;
        if resume {
            self.issue(PlayerCommand::Play);
            self.transition(ActivationState::ActivePlaying);
        }
    }

    fn issue(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Play => self.player.play(),
            PlayerCommand::Pause => self.player.pause(),
            PlayerCommand::Seek { secs } => self.player.set_current_time(secs),
        }
        self.last_command = Some(command);
    }

    fn transition(&mut self, next: ActivationState) {
        if next != self.state {
            tracing::debug!(from = ?self.state, to = ?next, "activation state changed");
            self.state = next;
        }
    }
}

impl<P: PlayerBinding> std::fmt::Debug for ActivationController<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivationController")
            .field("state", &self.state)
            .field("foreground", &self.foreground)
            .field(
                "was_playing_before_background",
                &self.was_playing_before_background,
            )
            .field("pending_press", &self.pending_press)
            .field("last_command", &self.last_command)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::LifecycleHub;
    use crate::test_utils::{assert_abs_diff_eq, CommandLog, RecordingPlayer, F64_EPSILON};

    fn controller() -> (ActivationController<RecordingPlayer>, CommandLog, LifecycleHub) {
        let hub = LifecycleHub::new();
        let player = RecordingPlayer::new(PlayerOptions::default());
        let log = player.log();
        let controller = ActivationController::new(player, ActivationSettings::default(), &hub);
        (controller, log, hub)
    }

    fn active_controller() -> (ActivationController<RecordingPlayer>, CommandLog, LifecycleHub) {
        let (mut controller, log, hub) = controller();
        controller.set_active(true);
        log.clear();
        (controller, log, hub)
    }

    #[test]
    fn new_controller_is_inactive_and_silent() {
        let (controller, log, _hub) = controller();
        assert_eq!(controller.state(), ActivationState::Inactive);
        assert!(log.commands().is_empty());
        assert_eq!(controller.last_command(), None);
    }

    #[test]
    fn activation_seeks_then_plays() {
        let (mut controller, log, _hub) = controller();
        controller.set_active(true);

        assert_eq!(
            log.commands(),
            vec![PlayerCommand::Seek { secs: 0.5 }, PlayerCommand::Play]
        );
        assert!(controller.is_playing());
        assert_eq!(controller.last_command(), Some(PlayerCommand::Play));
    }

    #[test]
    fn repeated_activation_is_ignored() {
        let (mut controller, log, _hub) = active_controller();
        controller.set_active(true);
        assert!(log.commands().is_empty());
    }

    #[test]
    fn deactivation_pauses() {
        let (mut controller, log, _hub) = active_controller();
        controller.set_active(false);

        assert_eq!(log.commands(), vec![PlayerCommand::Pause]);
        assert!(!controller.is_playing());
        assert_eq!(controller.state(), ActivationState::Inactive);
    }

    #[test]
    fn deactivation_pauses_even_when_paused_by_gesture() {
        let (mut controller, log, _hub) = active_controller();
        let token = controller.press_started().unwrap();
        assert!(controller.long_press_elapsed(token));
        log.clear();

        controller.set_active(false);
        assert_eq!(log.commands(), vec![PlayerCommand::Pause]);
        assert!(!controller.is_paused_by_long_press());
    }

    #[test]
    fn short_press_does_not_pause() {
        let (mut controller, log, _hub) = active_controller();
        let token = controller.press_started().unwrap();
        controller.press_released();

        assert!(!controller.long_press_elapsed(token));
        assert!(log.commands().is_empty());
        assert!(controller.is_playing());
    }

    #[test]
    fn long_press_pauses_and_release_resumes() {
        let (mut controller, log, _hub) = active_controller();
        let token = controller.press_started().unwrap();
        assert_eq!(controller.pending_long_press(), Some(token));

        assert!(controller.long_press_elapsed(token));
        assert!(controller.is_paused_by_long_press());
        assert_eq!(controller.pending_long_press(), None);

        controller.press_released();
        assert_eq!(log.commands(), vec![PlayerCommand::Pause, PlayerCommand::Play]);
        assert!(controller.is_playing());
    }

    #[test]
    fn timer_firing_after_deactivation_is_stale() {
        let (mut controller, log, _hub) = active_controller();
        let token = controller.press_started().unwrap();
        controller.set_active(false);
        log.clear();

        assert!(!controller.long_press_elapsed(token));
        assert!(log.commands().is_empty());
        assert_eq!(controller.state(), ActivationState::Inactive);
    }

    #[test]
    fn superseded_press_token_is_ignored() {
        let (mut controller, _log, _hub) = active_controller();
        let first = controller.press_started().unwrap();
        let second = controller.press_started().unwrap();

        assert!(!controller.long_press_elapsed(first));
        assert!(controller.is_playing());
        assert!(controller.long_press_elapsed(second));
    }

    #[test]
    fn press_on_inactive_item_arms_nothing() {
        let (mut controller, _log, _hub) = controller();
        assert_eq!(controller.press_started(), None);
    }

    #[test]
    fn background_while_playing_then_foreground_resumes() {
        let (mut controller, log, _hub) = active_controller();

        controller.lifecycle_changed(AppLifecycle::Background);
        assert!(controller.was_playing_before_background());
        assert_eq!(controller.state(), ActivationState::ActivePausedByBackground);

        controller.lifecycle_changed(AppLifecycle::Active);
        assert_eq!(log.commands(), vec![PlayerCommand::Pause, PlayerCommand::Play]);
        assert!(controller.is_playing());
        assert!(!controller.was_playing_before_background());
    }

    #[test]
    fn background_while_paused_by_gesture_does_not_resume() {
        let (mut controller, log, _hub) = active_controller();
        let token = controller.press_started().unwrap();
        controller.long_press_elapsed(token);
        log.clear();

        controller.lifecycle_changed(AppLifecycle::Background);
        controller.lifecycle_changed(AppLifecycle::Active);

        assert!(log.commands().is_empty());
        assert!(controller.is_paused_by_long_press());
    }

    #[test]
    fn foreground_after_deactivation_does_not_resume() {
        let (mut controller, log, _hub) = active_controller();
        controller.lifecycle_changed(AppLifecycle::Background);
        controller.set_active(false);
        log.clear();

        controller.lifecycle_changed(AppLifecycle::Active);
        assert!(log.commands().is_empty());
        assert_eq!(controller.state(), ActivationState::Inactive);
    }

    #[test]
    fn background_without_explicit_pause_keeps_player_running() {
        let hub = LifecycleHub::new();
        let player = RecordingPlayer::new(PlayerOptions::default());
        let log = player.log();
        let settings = ActivationSettings {
            pause_on_background: false,
            ..ActivationSettings::default()
        };
        let mut controller = ActivationController::new(player, settings, &hub);
        controller.set_active(true);
        log.clear();

        controller.lifecycle_changed(AppLifecycle::Background);
        assert!(log.commands().is_empty());
        assert!(controller.was_playing_before_background());
    }

    #[test]
    fn activation_while_backgrounded_defers_play() {
        let mut hub = LifecycleHub::new();
        hub.publish(AppLifecycle::Background);
        let player = RecordingPlayer::new(PlayerOptions::default());
        let log = player.log();
        let mut controller = ActivationController::new(player, ActivationSettings::default(), &hub);

        controller.set_active(true);
        assert_eq!(log.commands(), vec![PlayerCommand::Seek { secs: 0.5 }]);
        assert_eq!(controller.state(), ActivationState::ActivePausedByBackground);

        hub.publish(AppLifecycle::Active);
        controller.sync_lifecycle();
        assert_eq!(controller.last_command(), Some(PlayerCommand::Play));
        assert!(controller.is_playing());
    }

    #[test]
    fn sync_lifecycle_applies_hub_changes() {
        let (mut controller, log, mut hub) = active_controller();
        hub.publish(AppLifecycle::Inactive);
        controller.sync_lifecycle();
        assert_eq!(log.commands(), vec![PlayerCommand::Pause]);

        hub.publish(AppLifecycle::Background);
        hub.publish(AppLifecycle::Active);
        controller.sync_lifecycle();
        assert_eq!(log.commands(), vec![PlayerCommand::Pause, PlayerCommand::Play]);
    }

    #[test]
    fn dropping_controller_releases_subscription() {
        let (controller, _log, hub) = controller();
        assert_eq!(hub.listener_count(), 1);
        drop(controller);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn poll_player_keeps_newest_frame() {
        use crate::application::port::VideoFrame;

        let hub = LifecycleHub::new();
        let mut player = RecordingPlayer::new(PlayerOptions::default());
        for pts in [0.1, 0.2] {
            player.push_event(PlayerEvent::Frame(VideoFrame {
                rgba: vec![0; 4],
                width: 1,
                height: 1,
                pts_secs: pts,
            }));
        }
        let mut controller = ActivationController::new(player, ActivationSettings::default(), &hub);

        match controller.poll_player() {
            Some(PlayerEvent::Frame(frame)) => {
                assert_abs_diff_eq!(frame.pts_secs, 0.2, epsilon = F64_EPSILON);
            }
            other => panic!("expected a frame, got {other:?}"),
        }
        assert!(controller.poll_player().is_none());
    }
}
