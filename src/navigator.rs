//! Button handling inside the configuration menu.
//!
//! [`Gesture`] decodes clicks while browsing channels. Once a channel is
//! opened with a long press, an [`EditSession`] owns the button until the
//! edit is committed, reverted or times out.

use embassy_time::Duration;

use crate::input::ButtonEvent;
use crate::phase::EndMode;
use crate::settings::{ChannelRange, ConfigChannel, Settings};

/// Inactivity inside an edit session after which the edit is reverted
pub const EDIT_TIMEOUT: Duration = Duration::from_secs(10);

/// How long the saved / not saved feedback stays on the strip
pub const CONFIRM_DURATION: Duration = Duration::from_secs(1);

/// Inactivity in the menu after which configuration is left without saving
pub const MENU_TIMEOUT: Duration = Duration::from_secs(30);

/// Completed menu gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    /// Press followed by release before the long-press threshold
    Short,
    /// Press held past the long-press threshold
    Long,
}

/// Button state as seen by the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    Up,
    Down,
    /// Long press already reported, waiting for release
    Held,
}

impl Gesture {
    /// Feeds one tick of input. Releases and long presses that were not
    /// preceded by a press are ignored.
    pub fn feed(&mut self, event: Option<ButtonEvent>) -> Option<Click> {
        let event = event?;
        let (next, click) = match (*self, event) {
            (_, ButtonEvent::Pressed) => (Self::Down, None),
            (Self::Down, ButtonEvent::Released) => (Self::Up, Some(Click::Short)),
            (Self::Down, ButtonEvent::LongPressed) => (Self::Held, Some(Click::Long)),
            (Self::Held, ButtonEvent::Released) => (Self::Up, None),
            (state, _) => (state, None),
        };
        *self = next;
        click
    }
}

/// Sub-state of an [`EditSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    /// Just opened, nothing processed yet
    Idle,
    /// Button is down, the click is not decided yet
    Pressed,
    /// Short click registered and the value advanced
    Released,
    /// Button still held from a long press
    LongPressed,
    /// Commit decided, showing confirmation
    Saving,
    /// Revert decided, showing confirmation
    NotSaving,
    /// Waiting for the next press
    Waiting,
}

/// Editing of a single channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditSession {
    channel: ConfigChannel,
    value: u8,
    stored: u8,
    range: ChannelRange,
    state: EditState,
    timer: Duration,
    opened_held: bool,
}

impl EditSession {
    /// Opens a session for `channel`. The stored value is clamped into the
    /// current range, so an out-of-range value is dirty from the start.
    pub const fn open(channel: ConfigChannel, settings: &Settings, button_held: bool) -> Self {
        let range = channel.range(settings);
        let stored = settings.get(channel);
        Self {
            channel,
            value: range.clamp(stored),
            stored,
            range,
            state: EditState::Idle,
            timer: Duration::from_ticks(0),
            opened_held: button_held,
        }
    }

    pub const fn channel(&self) -> ConfigChannel {
        self.channel
    }

    /// Value currently shown to the user
    pub const fn value(&self) -> u8 {
        self.value
    }

    /// Value the channel had when the session opened
    pub const fn stored(&self) -> u8 {
        self.stored
    }

    pub const fn range(&self) -> ChannelRange {
        self.range
    }

    pub const fn state(&self) -> EditState {
        self.state
    }

    pub const fn is_dirty(&self) -> bool {
        self.value != self.stored
    }

    /// Whether the session has decided to commit and must not be abandoned
    pub const fn is_committing(&self) -> bool {
        matches!(self.state, EditState::Saving)
    }

    /// Value to persist, once the session has decided to commit
    pub const fn committed_value(&self) -> Option<u8> {
        if self.is_committing() {
            Some(self.value)
        } else {
            None
        }
    }

    fn enter(&mut self, state: EditState) {
        self.state = state;
        self.timer = Duration::from_ticks(0);
    }

    fn timed_out(&self) -> bool {
        self.timer >= EDIT_TIMEOUT
    }

    fn confirm(&self, end: EndMode) -> EndMode {
        if self.timer >= CONFIRM_DURATION {
            end
        } else {
            EndMode::ContinueNoRender
        }
    }

    /// Advances the session by one tick
    pub fn step(&mut self, event: Option<ButtonEvent>, elapsed: Duration) -> EndMode {
        self.timer += elapsed;
        if self.state == EditState::Idle {
            self.enter(if self.opened_held {
                EditState::LongPressed
            } else {
                EditState::Waiting
            });
        }

        match (self.state, event) {
            (EditState::Saving, _) => return self.confirm(EndMode::EndSaving),
            (EditState::NotSaving, _) => return self.confirm(EndMode::EndNotSaving),

            (EditState::LongPressed, Some(ButtonEvent::Released)) => {
                self.enter(EditState::Waiting);
            }
            (EditState::Waiting | EditState::Released, Some(ButtonEvent::Pressed)) => {
                self.enter(EditState::Pressed);
            }
            (EditState::Pressed, Some(ButtonEvent::Released)) => {
                self.value = self.range.increment(
                    self.value,
                    self.channel.step(),
                    self.channel.overflow(),
                );
                self.enter(EditState::Released);
            }
            (EditState::Pressed, Some(ButtonEvent::LongPressed)) => {
                self.enter(if self.is_dirty() {
                    EditState::Saving
                } else {
                    EditState::NotSaving
                });
            }
            _ if self.timed_out() => self.enter(EditState::NotSaving),
            (EditState::Released, _) => {
                // Inactivity keeps counting from the click.
                self.state = EditState::Waiting;
            }
            _ => {}
        }
        EndMode::Continue
    }
}
