//! Portable bounded channel for `no_std` environments.
//!
//! Built on `critical-section` and `heapless::Deque`, so a button interrupt
//! can hand events to the tick loop. The engine consumes at most one event
//! per tick; [`Channel::send_latest`] lets a producer keep only the newest
//! events when the loop falls behind.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::input::ButtonEvent;

/// Depth of the input latch between the button sampler and the engine
pub const INPUT_QUEUE_DEPTH: usize = 4;

/// Channel carrying button events to the engine
pub type InputChannel = Channel<ButtonEvent, INPUT_QUEUE_DEPTH>;
/// Producer side of an [`InputChannel`]
pub type InputSender<'a> = Sender<'a, ButtonEvent, INPUT_QUEUE_DEPTH>;
/// Consumer side of an [`InputChannel`]
pub type InputReceiver<'a> = Receiver<'a, ButtonEvent, INPUT_QUEUE_DEPTH>;

/// Error returned when trying to send to a full channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError<T>(pub T);

/// Error returned when trying to receive from an empty channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryReceiveError;

/// A bounded, interrupt-safe channel.
pub struct Channel<T, const SIZE: usize> {
    inner: Mutex<RefCell<Deque<T, SIZE>>>,
}

impl<T, const SIZE: usize> Channel<T, SIZE> {
    /// Create a new empty channel.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    pub const fn sender(&self) -> Sender<'_, T, SIZE> {
        Sender { channel: self }
    }

    pub const fn receiver(&self) -> Receiver<'_, T, SIZE> {
        Receiver { channel: self }
    }

    /// Try to send a value into the channel.
    ///
    /// Returns `Err(TrySendError(value))` if the channel is full.
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(value).map_err(TrySendError)
        })
    }

    /// Sends a value, dropping the oldest queued value when full.
    ///
    /// Returns the dropped value, if any.
    pub fn send_latest(&self, value: T) -> Option<T> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            let dropped = if queue.is_full() {
                queue.pop_front()
            } else {
                None
            };
            // Cannot fail, a slot was freed above.
            let _ = queue.push_back(value);
            dropped
        })
    }

    /// Try to receive a value from the channel.
    ///
    /// Returns `Err(TryReceiveError)` if the channel is empty.
    pub fn try_receive(&self) -> Result<T, TryReceiveError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.pop_front().ok_or(TryReceiveError)
        })
    }

    /// Drops every queued value
    pub fn clear(&self) {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().clear());
    }
}

impl<T, const SIZE: usize> Default for Channel<T, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// A sender handle for a [`Channel`].
#[derive(Clone, Copy)]
pub struct Sender<'a, T, const SIZE: usize> {
    channel: &'a Channel<T, SIZE>,
}

impl<T, const SIZE: usize> Sender<'_, T, SIZE> {
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        self.channel.try_send(value)
    }

    pub fn send_latest(&self, value: T) -> Option<T> {
        self.channel.send_latest(value)
    }
}

/// A receiver handle for a [`Channel`].
#[derive(Clone, Copy)]
pub struct Receiver<'a, T, const SIZE: usize> {
    channel: &'a Channel<T, SIZE>,
}

impl<T, const SIZE: usize> Receiver<'_, T, SIZE> {
    pub fn try_receive(&self) -> Result<T, TryReceiveError> {
        self.channel.try_receive()
    }

    /// Next queued value for this tick, if any
    pub fn poll(&self) -> Option<T> {
        self.channel.try_receive().ok()
    }
}
