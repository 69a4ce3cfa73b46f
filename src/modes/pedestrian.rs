//! Pedestrian interval: a countdown to the start signal of the next runner.
//!
//! With sequence length `S` and timers `T1 > T2` (seconds before the end of
//! the interval) one activation runs:
//!
//! | phase          | length     |
//! |----------------|------------|
//! | countdown      | S - T1 - 5 |
//! | yellow         | 5          |
//! | green to black | T1 - T2    |
//! | red warning    | T2 - 5     |
//! | red countdown  | 5          |
//! | final green    | 2          |

use embassy_time::Duration;

use crate::color::{GREEN, RED, YELLOW};
use crate::display::DisplayValue;
use crate::engine::EngineState;
use crate::input::ButtonEvent;
use crate::modes::{ModeRun, blink_twice, half_periods, timed};
use crate::phase::EndMode;
use crate::segment::{MARKERS, STRIP_COUNT};
use crate::settings::{ConfigChannel, Settings};

/// Yellow build-up before the go signal
pub const YELLOW_DURATION: Duration = Duration::from_secs(5);
/// Red countdown before the final green
pub const RED_COUNTDOWN_DURATION: Duration = Duration::from_secs(5);
pub const FINAL_GREEN_DURATION: Duration = Duration::from_secs(2);
/// How long the go signal covers the whole board
pub const GREEN_HOLD: Duration = Duration::from_secs(2);
/// One countdown marker goes out every step
pub const MARKER_STEP: Duration = Duration::from_secs(20);
/// One light bar changes every step during yellow and red countdowns
pub const LIGHT_STEP: Duration = Duration::from_secs(1);

/// Phase lengths of one activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PedestrianPlan {
    pub countdown: Duration,
    pub yellow: Duration,
    pub green_to_black: Duration,
    pub red_pre: Duration,
    pub red_countdown: Duration,
    pub final_green: Duration,
}

impl PedestrianPlan {
    pub fn from_settings(settings: &Settings) -> Self {
        let settings = settings.sanitized();
        let sequence = u64::from(settings.get(ConfigChannel::Sequence));
        let timer1 = u64::from(settings.get(ConfigChannel::Timer1));
        let timer2 = u64::from(settings.get(ConfigChannel::Timer2));
        let yellow = YELLOW_DURATION.as_secs();
        let red = RED_COUNTDOWN_DURATION.as_secs();

        Self {
            countdown: Duration::from_secs(sequence.saturating_sub(timer1 + yellow)),
            yellow: YELLOW_DURATION,
            green_to_black: Duration::from_secs(timer1.saturating_sub(timer2)),
            red_pre: Duration::from_secs(timer2.saturating_sub(red)),
            red_countdown: RED_COUNTDOWN_DURATION,
            final_green: FINAL_GREEN_DURATION,
        }
    }

    /// Length of one activation until the board locks
    pub fn total(&self) -> Duration {
        self.countdown
            + self.yellow
            + self.green_to_black
            + self.red_pre
            + self.red_countdown
            + self.final_green
    }
}

fn plan(state: &EngineState) -> PedestrianPlan {
    match state.run {
        ModeRun::Pedestrian(plan) => plan,
        _ => PedestrianPlan::from_settings(&state.settings),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn steps(elapsed: Duration, step: Duration) -> usize {
    (elapsed.as_ticks() / step.as_ticks()).min(STRIP_COUNT as u64) as usize
}

pub(crate) fn countdown(state: &mut EngineState, _: Option<ButtonEvent>, _: Duration) -> EndMode {
    timed(state, plan(state).countdown)
}

pub(crate) fn yellow(state: &mut EngineState, _: Option<ButtonEvent>, _: Duration) -> EndMode {
    timed(state, plan(state).yellow)
}

pub(crate) fn green_to_black(state: &mut EngineState, _: Option<ButtonEvent>, _: Duration) -> EndMode {
    timed(state, plan(state).green_to_black)
}

pub(crate) fn red_pre(state: &mut EngineState, _: Option<ButtonEvent>, _: Duration) -> EndMode {
    timed(state, plan(state).red_pre)
}

pub(crate) fn red_countdown(state: &mut EngineState, _: Option<ButtonEvent>, _: Duration) -> EndMode {
    timed(state, plan(state).red_countdown)
}

pub(crate) fn final_green(state: &mut EngineState, _: Option<ButtonEvent>, _: Duration) -> EndMode {
    timed(state, plan(state).final_green)
}

/// Markers blink at 1 Hz, one fewer every [`MARKER_STEP`]
pub(crate) fn render_countdown(state: &EngineState, frame: &mut DisplayValue) {
    let elapsed = state.in_phase();
    if half_periods(elapsed) % 2 == 0 {
        return;
    }
    let count = STRIP_COUNT - steps(elapsed, MARKER_STEP);
    for marker in MARKERS.iter().take(count) {
        frame.fill_segment(*marker, GREEN);
    }
    frame.show_power(state.battery_millivolts());
}

/// One more yellow bar every second
pub(crate) fn render_yellow(state: &EngineState, frame: &mut DisplayValue) {
    let lit = (steps(state.in_phase(), LIGHT_STEP) + 1).min(STRIP_COUNT);
    frame.show_lights(YELLOW, lit);
}

pub(crate) fn render_green_to_black(state: &EngineState, frame: &mut DisplayValue) {
    let elapsed = state.in_phase();
    if elapsed < GREEN_HOLD {
        frame.fill(GREEN);
        return;
    }
    if half_periods(elapsed - GREEN_HOLD) % 2 == 1 {
        frame.show_power(state.battery_millivolts());
    }
}

pub(crate) fn render_red_pre(state: &EngineState, frame: &mut DisplayValue) {
    blink_twice(state, frame, RED);
}

/// One fewer red bar every second
pub(crate) fn render_red_countdown(state: &EngineState, frame: &mut DisplayValue) {
    let lit = STRIP_COUNT - steps(state.in_phase(), LIGHT_STEP);
    frame.show_lights(RED, lit);
}

pub(crate) fn render_final_green(state: &EngineState, frame: &mut DisplayValue) {
    blink_twice(state, frame, GREEN);
}
