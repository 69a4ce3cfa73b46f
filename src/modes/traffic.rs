//! Slalom traffic light.
//!
//! Red bars come on one per second. Once all five are lit they stay on for a
//! random hold, then go dark: the moment they go dark is the start signal.

use embassy_time::Duration;

use crate::color::{RED, YELLOW};
use crate::display::DisplayValue;
use crate::engine::EngineState;
use crate::input::ButtonEvent;
use crate::modes::{ModeRun, blink_twice, timed};
use crate::phase::EndMode;
use crate::prng::Prng;
use crate::segment::{LIGHTS, STRIP_COUNT};
use crate::settings::{ConfigChannel, Settings, TrafficStyle};

pub const YELLOW_PRE_DURATION: Duration = Duration::from_secs(2);
/// Delay between two bars coming on
pub const SLALOM_STEP: Duration = Duration::from_secs(1);
#[allow(clippy::cast_possible_truncation)]
pub const SLALOM_DURATION: Duration =
    Duration::from_ticks(SLALOM_STEP.as_ticks() * (STRIP_COUNT as u64 - 1));
/// Darkness after the start signal
pub const AFTER_SHOW: Duration = Duration::from_secs(5);
pub const POWER_DURATION: Duration = Duration::from_secs(5);
/// Resolution of the random hold
pub const HOLD_STEP: Duration = Duration::from_millis(100);

/// Order and hold drawn for one activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrafficPlan {
    pub style: TrafficStyle,
    /// Light bars in the order they come on
    pub order: [u8; STRIP_COUNT],
    /// How long all bars stay lit before the start signal
    pub hold: Duration,
}

impl TrafficPlan {
    #[allow(clippy::cast_possible_truncation)]
    pub fn draw(settings: &Settings, rng: &mut Prng) -> Self {
        let settings = settings.sanitized();
        let style = settings.traffic_style();

        let mut order = [0u8; STRIP_COUNT];
        for (i, slot) in order.iter_mut().enumerate() {
            *slot = i as u8;
        }
        if style == TrafficStyle::RandomShow {
            rng.shuffle(&mut order);
        }

        let steps_per_second = (1000 / HOLD_STEP.as_millis()) as u16;
        let min = u16::from(settings.get(ConfigChannel::LightDurationMin)) * steps_per_second;
        let max = u16::from(settings.get(ConfigChannel::LightDurationMax)) * steps_per_second;
        let steps = rng.range(min, max);

        Self {
            style,
            order,
            hold: Duration::from_ticks(HOLD_STEP.as_ticks() * u64::from(steps)),
        }
    }
}

fn plan(state: &EngineState) -> Option<TrafficPlan> {
    match state.run {
        ModeRun::Traffic(plan) => Some(plan),
        _ => None,
    }
}

pub(crate) fn yellow_pre(state: &mut EngineState, _: Option<ButtonEvent>, _: Duration) -> EndMode {
    timed(state, YELLOW_PRE_DURATION)
}

pub(crate) fn slalom(state: &mut EngineState, _: Option<ButtonEvent>, _: Duration) -> EndMode {
    timed(state, SLALOM_DURATION)
}

pub(crate) fn show_random(state: &mut EngineState, _: Option<ButtonEvent>, _: Duration) -> EndMode {
    let hold = plan(state).map_or(Duration::from_ticks(0), |plan| plan.hold);
    timed(state, hold + AFTER_SHOW)
}

pub(crate) fn power(state: &mut EngineState, _: Option<ButtonEvent>, _: Duration) -> EndMode {
    timed(state, POWER_DURATION)
}

pub(crate) fn render_yellow_pre(state: &EngineState, frame: &mut DisplayValue) {
    blink_twice(state, frame, YELLOW);
}

#[allow(clippy::cast_possible_truncation)]
pub(crate) fn render_slalom(state: &EngineState, frame: &mut DisplayValue) {
    let Some(plan) = plan(state) else {
        return;
    };
    let step = (state.in_phase().as_ticks() / SLALOM_STEP.as_ticks()) as usize;
    let lit = (step + 1).min(STRIP_COUNT);
    for light in plan.order.iter().take(lit) {
        if let Some(segment) = LIGHTS.get(usize::from(*light)) {
            frame.fill_segment(*segment, RED);
        }
    }
}

pub(crate) fn render_show_random(state: &EngineState, frame: &mut DisplayValue) {
    let Some(plan) = plan(state) else {
        return;
    };
    if state.in_phase() < plan.hold {
        frame.show_lights(RED, STRIP_COUNT);
    }
}

pub(crate) fn render_power(state: &EngineState, frame: &mut DisplayValue) {
    frame.show_power(state.battery_millivolts());
}
