//! Button events and the sampler turning a raw level into them.

use embassy_time::Duration;

/// Hold time after which a press is reported as long
pub const LONG_PRESS_THRESHOLD: Duration = Duration::from_millis(1000);

/// Discrete button event delivered to the engine, at most one per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Pressed,
    Released,
    /// The button has been held past [`LONG_PRESS_THRESHOLD`]. Reported once per press.
    LongPressed,
}

/// Converts a sampled button level into [`ButtonEvent`]s.
///
/// Feed it once per tick with the debounced level of the button.
#[derive(Debug, Clone, Copy)]
pub struct ButtonTracker {
    held: Option<Duration>,
    long_reported: bool,
    threshold: Duration,
}

impl ButtonTracker {
    pub const fn new() -> Self {
        Self::with_threshold(LONG_PRESS_THRESHOLD)
    }

    pub const fn with_threshold(threshold: Duration) -> Self {
        Self {
            held: None,
            long_reported: false,
            threshold,
        }
    }

    /// Samples the button level after `elapsed` time since the previous sample
    pub fn sample(&mut self, pressed: bool, elapsed: Duration) -> Option<ButtonEvent> {
        match (pressed, self.held) {
            (true, None) => {
                self.held = Some(Duration::from_ticks(0));
                self.long_reported = false;
                Some(ButtonEvent::Pressed)
            }
            (true, Some(held)) => {
                let held = held + elapsed;
                self.held = Some(held);
                if !self.long_reported && held >= self.threshold {
                    self.long_reported = true;
                    return Some(ButtonEvent::LongPressed);
                }
                None
            }
            (false, Some(_)) => {
                self.held = None;
                Some(ButtonEvent::Released)
            }
            (false, None) => None,
        }
    }

    pub const fn is_held(&self) -> bool {
        self.held.is_some()
    }
}

impl Default for ButtonTracker {
    fn default() -> Self {
        Self::new()
    }
}
