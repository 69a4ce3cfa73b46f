//! Lock heartbeat. Input is ignored, only a power cycle leaves the lock.

use embassy_time::Duration;

use crate::color::DARK_RED;
use crate::display::DisplayValue;
use crate::engine::EngineState;
use crate::input::ButtonEvent;
use crate::modes::timed;
use crate::phase::EndMode;
use crate::segment::LOCK_BARS;

pub const LOCK_ON_DURATION: Duration = Duration::from_secs(1);
pub const LOCK_OFF_DURATION: Duration = Duration::from_secs(19);

pub(crate) fn start(_: &mut EngineState, _: Option<ButtonEvent>, _: Duration) -> EndMode {
    EndMode::EndNotSaving
}

pub(crate) fn on(state: &mut EngineState, _: Option<ButtonEvent>, _: Duration) -> EndMode {
    timed(state, LOCK_ON_DURATION)
}

pub(crate) fn off(state: &mut EngineState, _: Option<ButtonEvent>, _: Duration) -> EndMode {
    timed(state, LOCK_OFF_DURATION)
}

pub(crate) fn render_on(state: &EngineState, frame: &mut DisplayValue) {
    for bar in LOCK_BARS {
        frame.fill_segment(bar, DARK_RED);
    }
    frame.show_power(state.battery_millivolts());
}
