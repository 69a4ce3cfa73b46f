//! Handlers and renderers referenced from the phase table.
//!
//! Handlers decide how long a phase lasts and what input does in it.
//! Renderers are pure functions of the engine state, so the same state and
//! elapsed time always produce the same frame.

pub mod config;
pub mod lock;
pub mod pedestrian;
pub mod root;
pub mod traffic;

use embassy_time::Duration;

use crate::Rgb;
use crate::display::DisplayValue;
use crate::engine::EngineState;
use crate::phase::EndMode;

pub use pedestrian::PedestrianPlan;
pub use traffic::TrafficPlan;

/// Half period of every blink on the board
pub const BLINK_HALF_PERIOD: Duration = Duration::from_millis(500);

/// Length of a blink-twice pattern: two flashes, then the power pixel blinks
pub const BLINK_TWICE_FLASHES: u64 = 4;

/// Snapshot taken when a working mode is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeRun {
    #[default]
    Inactive,
    Pedestrian(PedestrianPlan),
    Traffic(TrafficPlan),
}

/// Ends the phase once it has lasted `duration`
pub(crate) fn timed(state: &EngineState, duration: Duration) -> EndMode {
    if state.in_phase() >= duration {
        EndMode::EndNotSaving
    } else {
        EndMode::Continue
    }
}

/// Index of the half-second slot `elapsed` falls into
pub(crate) fn half_periods(elapsed: Duration) -> u64 {
    elapsed.as_millis() / BLINK_HALF_PERIOD.as_millis()
}

/// Two full-board flashes of `color`, then a blinking power pixel
pub(crate) fn blink_twice(state: &EngineState, frame: &mut DisplayValue, color: Rgb) {
    let slot = half_periods(state.in_phase());
    if slot < BLINK_TWICE_FLASHES {
        if slot % 2 == 0 {
            frame.fill(color);
        }
    } else if (slot - BLINK_TWICE_FLASHES) % 2 == 1 {
        frame.show_power(state.battery_millivolts());
    }
}
