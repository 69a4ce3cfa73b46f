//! Configuration menu.
//!
//! Channels are browsed in a fixed cycle with short clicks. A long press
//! opens the shown channel in an [`EditSession`], which then owns the button
//! until it commits or reverts.

use embassy_time::Duration;

use crate::Rgb;
use crate::color::{BLUE, CYAN, DARK_RED, GREEN, MAGENTA, ORANGE, RED, WHITE, YELLOW};
use crate::display::{DisplayValue, LEDS_PER_ROW};
use crate::engine::EngineState;
use crate::input::ButtonEvent;
use crate::modes::half_periods;
use crate::navigator::{Click, EditSession, EditState};
use crate::phase::EndMode;
use crate::segment::{LIGHTS, SAVE_BAR, StripSegment};
use crate::settings::{ConfigChannel, MODE_PEDESTRIAN, MODE_TRAFFIC_RANDOM, MODE_TRAFFIC_SLALOM};

/// Longest time the menu entry screen waits for the boot press to be released
pub const BEGIN_HOLD: Duration = Duration::from_secs(1);

/// Pixel marking a channel open for editing
pub const EDIT_MARKER: usize = LEDS_PER_ROW - 1;

const BRIGHTNESS_BARS: [(StripSegment, Rgb); 4] = [
    (StripSegment::new(0, 5), RED),
    (StripSegment::new(5, 5), GREEN),
    (StripSegment::new(10, 5), BLUE),
    (StripSegment::new(15, 5), WHITE),
];

pub(crate) fn begin(state: &mut EngineState, _: Option<ButtonEvent>, _: Duration) -> EndMode {
    // The release often lands during the one-tick root phase before this one.
    if !state.button_held || state.in_phase >= BEGIN_HOLD {
        EndMode::EndNotSaving
    } else {
        EndMode::Continue
    }
}

pub(crate) fn channel(state: &mut EngineState, input: Option<ButtonEvent>, elapsed: Duration) -> EndMode {
    if let Some(session) = state.edit.as_mut() {
        return session.step(input, elapsed);
    }
    let Some(channel) = state.phase.config_channel() else {
        return EndMode::EndNotSaving;
    };
    match state.gesture.feed(input) {
        Some(Click::Short) => EndMode::EndNotSaving,
        Some(Click::Long) => {
            state.edit = Some(EditSession::open(channel, &state.settings, true));
            EndMode::Continue
        }
        None => EndMode::Continue,
    }
}

pub(crate) fn end(state: &mut EngineState, input: Option<ButtonEvent>, _: Duration) -> EndMode {
    match state.gesture.feed(input) {
        Some(Click::Short) => EndMode::EndNotSaving,
        _ => EndMode::Continue,
    }
}

pub(crate) fn render_begin(_: &EngineState, frame: &mut DisplayValue) {
    frame.show_lights(WHITE, LIGHTS.len());
}

pub(crate) fn render_end(_: &EngineState, frame: &mut DisplayValue) {
    if let (Some(first), Some(last)) = (LIGHTS.first(), LIGHTS.last()) {
        frame.fill_segment(*first, CYAN);
        frame.fill_segment(*last, CYAN);
    }
}

pub(crate) fn render_channel(state: &EngineState, frame: &mut DisplayValue) {
    let Some(channel) = state.phase.config_channel() else {
        return;
    };
    match state.edit {
        Some(session) => match session.state() {
            EditState::Saving => frame.fill_segment(SAVE_BAR, DARK_RED),
            EditState::NotSaving => {}
            _ => {
                if channel == ConfigChannel::Brightness {
                    frame.set_brightness(session.value());
                }
                draw_value(frame, channel, session.value());
                frame.put_pair(EDIT_MARKER, CYAN);
            }
        },
        // Browsing blinks the stored value at 1 Hz.
        None if half_periods(state.in_phase()) % 2 == 0 => {
            draw_value(frame, channel, state.settings.get(channel));
        }
        None => {}
    }
}

fn draw_value(frame: &mut DisplayValue, channel: ConfigChannel, value: u8) {
    match channel {
        ConfigChannel::Brightness => {
            for (bar, color) in BRIGHTNESS_BARS {
                frame.fill_segment(bar, color);
            }
        }
        ConfigChannel::Mode => draw_mode(frame, value),
        ConfigChannel::Sequence => frame.show_number(ORANGE, value),
        ConfigChannel::Timer1 => frame.show_number(YELLOW, value),
        ConfigChannel::Timer2 => frame.show_number(BLUE, value),
        ConfigChannel::LightDurationMin => frame.show_number(WHITE, value),
        ConfigChannel::LightDurationMax => frame.show_number(GREEN, value),
    }
}

fn draw_mode(frame: &mut DisplayValue, mode: u8) {
    for i in 0..LIGHTS.len() {
        match mode {
            MODE_PEDESTRIAN => frame.put_pair(i * 2, GREEN),
            MODE_TRAFFIC_SLALOM => {
                frame.put_pair(i * 3, RED);
                frame.put_pair(i * 3 + 1, RED);
            }
            MODE_TRAFFIC_RANDOM => {
                frame.put_pair(i * 3, RED);
                frame.put_pair(i * 3 + 1, RED);
                frame.put_pair(i * 3 + 2, MAGENTA);
            }
            _ => {}
        }
    }
}
