//! Tick pacing for the engine.
//!
//! Portable pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping between ticks.

use embassy_time::{Duration, Instant};

use crate::channel::InputReceiver;
use crate::engine::{Engine, TICK_PERIOD, TickReport};
use crate::store::ConfigStore;
use crate::StripDriver;

/// Result of a scheduled tick.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next tick.
    pub next_deadline: Instant,
    /// How long to wait until the next tick (zero when behind schedule).
    pub sleep_duration: Duration,
    pub report: TickReport,
}

/// Drives an [`Engine`] at a fixed period from a monotonic clock.
///
/// Each tick measures the real time since the previous one, pulls at most
/// one event from the input latch and hands both to the engine.
///
/// # Usage
///
/// ```ignore
/// static INPUT: InputChannel = InputChannel::new();
///
/// let mut scheduler = FrameScheduler::new(engine, INPUT.receiver());
/// loop {
///     let result = scheduler.tick(Instant::now());
///     Timer::after(result.sleep_duration).await;
/// }
/// ```
pub struct FrameScheduler<'a, S: ConfigStore, D: StripDriver> {
    engine: Engine<S, D>,
    input: InputReceiver<'a>,
    last_tick: Option<Instant>,
    next_frame: Instant,
    frame_duration: Duration,
}

impl<'a, S: ConfigStore, D: StripDriver> FrameScheduler<'a, S, D> {
    /// Create a scheduler ticking every [`TICK_PERIOD`].
    pub fn new(engine: Engine<S, D>, input: InputReceiver<'a>) -> Self {
        Self::with_frame_duration(engine, input, TICK_PERIOD)
    }

    pub fn with_frame_duration(
        engine: Engine<S, D>,
        input: InputReceiver<'a>,
        frame_duration: Duration,
    ) -> Self {
        Self {
            engine,
            input,
            last_tick: None,
            next_frame: Instant::from_millis(0),
            frame_duration,
        }
    }

    /// Run one engine tick and return timing information.
    ///
    /// The first tick passes zero elapsed time. If the loop has fallen more
    /// than two periods behind, the schedule restarts from `now` instead of
    /// bursting to catch up.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        let max_drift = Duration::from_ticks(self.frame_duration.as_ticks() * 2);
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        let elapsed = self
            .last_tick
            .map_or(Duration::from_ticks(0), |last| now.saturating_duration_since(last));
        self.last_tick = Some(now);

        let report = self.engine.tick(self.input.poll(), elapsed);

        self.next_frame += self.frame_duration;

        let sleep_duration = if self.next_frame > now {
            self.next_frame - now
        } else {
            Duration::from_ticks(0)
        };

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
            report,
        }
    }

    pub const fn engine(&self) -> &Engine<S, D> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<S, D> {
        &mut self.engine
    }
}
