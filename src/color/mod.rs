//! Board palette, brightness levels and the battery indicator colors.

use smart_leds::RGB8;

use crate::math8::scale_rgb;

pub type Rgb = RGB8;

pub const BLACK: Rgb = Rgb::new(0, 0, 0);
pub const RED: Rgb = Rgb::new(255, 0, 0);
pub const GREEN: Rgb = Rgb::new(0, 255, 0);
pub const BLUE: Rgb = Rgb::new(0, 0, 255);
pub const WHITE: Rgb = Rgb::new(255, 255, 255);
pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
pub const MAGENTA: Rgb = Rgb::new(255, 0, 255);
pub const CYAN: Rgb = Rgb::new(0, 255, 255);
pub const DARK_RED: Rgb = Rgb::new(50, 0, 0);
pub const ORANGE: Rgb = Rgb::new(100, 50, 0);
pub const REDDER: Rgb = Rgb::new(200, 50, 0);

/// Scale factor applied to every pixel for each brightness level.
///
/// Level 0 is the dimmest setting, the last entry is full output.
pub const BRIGHTNESS_LEVELS: [u8; 4] = [31, 63, 127, 255];

/// Highest valid brightness level
#[allow(clippy::cast_possible_truncation)]
pub const MAX_BRIGHTNESS_LEVEL: u8 = (BRIGHTNESS_LEVELS.len() - 1) as u8;

/// Returns the scale factor for a brightness level, clamping unknown levels
/// to full output.
pub const fn level_scale(level: u8) -> u8 {
    if level > MAX_BRIGHTNESS_LEVEL {
        return BRIGHTNESS_LEVELS[MAX_BRIGHTNESS_LEVEL as usize];
    }
    BRIGHTNESS_LEVELS[level as usize]
}

/// Applies a brightness level to a color
#[inline]
pub const fn dim(color: Rgb, level: u8) -> Rgb {
    scale_rgb(color, level_scale(level))
}

/// Battery thresholds in millivolts, ascending, paired with the indicator
/// color shown once the pack voltage reaches the threshold.
const BATTERY_STEPS: [(u16, Rgb); 4] = [
    (6300, REDDER),
    (6500, ORANGE),
    (7000, YELLOW),
    (7600, GREEN),
];

/// Maps a battery voltage to the power pixel color.
///
/// Anything at or below the lowest threshold is reported as flat.
pub fn battery_color(millivolts: u16) -> Rgb {
    if millivolts <= BATTERY_STEPS[0].0 {
        return RED;
    }
    BATTERY_STEPS
        .iter()
        .rev()
        .find(|(threshold, _)| millivolts >= *threshold)
        .map(|(_, color)| *color)
        .unwrap_or(RED)
}
