use embassy_time::Duration;

use crate::display::DisplayValue;
use crate::engine::EngineState;
use crate::input::ButtonEvent;
use crate::modes::{ModeRun, PedestrianPlan, TrafficPlan};
use crate::phase::EndMode;

/// A press during this window after power-up enters configuration
pub const BOOT_WINDOW: Duration = Duration::from_millis(500);

pub(crate) fn idle(state: &mut EngineState, input: Option<ButtonEvent>, _: Duration) -> EndMode {
    if matches!(input, Some(ButtonEvent::Pressed | ButtonEvent::LongPressed)) {
        state.config_requested = true;
        return EndMode::EndNotSaving;
    }
    if state.in_phase >= BOOT_WINDOW {
        EndMode::EndNotSaving
    } else {
        EndMode::Continue
    }
}

pub(crate) fn config(state: &mut EngineState, _: Option<ButtonEvent>, _: Duration) -> EndMode {
    state.run = ModeRun::Inactive;
    EndMode::EndNotSaving
}

pub(crate) fn pedestrian(state: &mut EngineState, _: Option<ButtonEvent>, _: Duration) -> EndMode {
    state.run = ModeRun::Pedestrian(PedestrianPlan::from_settings(&state.settings));
    EndMode::EndNotSaving
}

pub(crate) fn traffic(state: &mut EngineState, _: Option<ButtonEvent>, _: Duration) -> EndMode {
    state.run = ModeRun::Traffic(TrafficPlan::draw(&state.settings, &mut state.rng));
    EndMode::EndNotSaving
}

pub(crate) fn lock(state: &mut EngineState, _: Option<ButtonEvent>, _: Duration) -> EndMode {
    state.run = ModeRun::Inactive;
    EndMode::EndNotSaving
}

/// Leaves the frame black
pub(crate) fn render_dark(_: &EngineState, _: &mut DisplayValue) {}
