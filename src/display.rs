//! Logical frame of the two-row board.
//!
//! Phases draw into a [`DisplayValue`] using logical positions: position 0 is
//! the same end of the board on both rows. The strip itself is wired as one
//! chain that runs out along row 0 and back along row 1, so the second row is
//! reversed when the frame is written out.

use crate::Rgb;
use crate::color::{self, BLACK, MAX_BRIGHTNESS_LEVEL};
use crate::segment::{LIGHTS, SegmentState, StripSegment};

/// Pixels on one row of the board
pub const LEDS_PER_ROW: usize = 72;

/// Rows of pixels on the board
pub const ROWS: usize = 2;

/// Physical chain length
pub const STRIP_LEN: usize = LEDS_PER_ROW * ROWS;

/// Largest digit [`DisplayValue::show_digit`] can draw on one row
pub const MAX_DIGIT: u8 = {
    let groups = LEDS_PER_ROW / 4;
    #[allow(clippy::cast_possible_truncation)]
    let max = (groups * 3 + LEDS_PER_ROW % 4) as u8;
    max
};

/// Position of the power indicator pixel
pub const POWER_PIXEL: usize = 0;

/// Complete frame for one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayValue {
    brightness: u8,
    rows: [[Rgb; LEDS_PER_ROW]; ROWS],
}

impl DisplayValue {
    /// Creates a black frame shown at the given brightness level
    pub const fn new(brightness: u8) -> Self {
        Self {
            brightness: clamp_level(brightness),
            rows: [[BLACK; LEDS_PER_ROW]; ROWS],
        }
    }

    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Overrides the brightness level, used to preview a level while editing
    pub const fn set_brightness(&mut self, level: u8) {
        self.brightness = clamp_level(level);
    }

    pub fn clear(&mut self) {
        self.fill(BLACK);
    }

    pub fn fill(&mut self, color: Rgb) {
        for row in &mut self.rows {
            row.fill(color);
        }
    }

    /// Sets one pixel. Positions outside the row are ignored.
    pub fn put(&mut self, row: usize, pos: usize, color: Rgb) {
        if let Some(pixel) = self.rows.get_mut(row).and_then(|r| r.get_mut(pos)) {
            *pixel = color;
        }
    }

    /// Sets the same position on both rows
    pub fn put_pair(&mut self, pos: usize, color: Rgb) {
        for row in 0..ROWS {
            self.put(row, pos, color);
        }
    }

    /// Paints a segment on both rows
    pub fn fill_segment(&mut self, segment: StripSegment, color: Rgb) {
        for pos in segment.positions() {
            self.put_pair(pos, color);
        }
    }

    /// Paints the power pixel with the battery color, when one is known
    pub fn show_power(&mut self, battery_millivolts: Option<u16>) {
        if let Some(mv) = battery_millivolts {
            self.put_pair(POWER_PIXEL, color::battery_color(mv));
        }
    }

    /// Lights the first `count` light bars, everything else black
    pub fn show_lights(&mut self, color: Rgb, count: usize) {
        self.clear();
        for segment in LIGHTS.iter().take(count) {
            self.fill_segment(*segment, color);
        }
    }

    /// Draws a digit as groups of three lit pixels separated by one dark
    /// pixel, followed by the remainder. The rest of the row is cleared.
    pub fn show_digit(&mut self, row: usize, color: Rgb, digit: u8) {
        let digit = digit.min(MAX_DIGIT);
        let mut pos = 0;
        for _ in 0..digit / 3 {
            for _ in 0..3 {
                self.put(row, pos, color);
                pos += 1;
            }
            self.put(row, pos, BLACK);
            pos += 1;
        }
        for _ in 0..digit % 3 {
            self.put(row, pos, color);
            pos += 1;
        }
        while pos < LEDS_PER_ROW {
            self.put(row, pos, BLACK);
            pos += 1;
        }
    }

    /// Shows a two-digit number: tens on row 0, ones on row 1
    pub fn show_number(&mut self, color: Rgb, value: u8) {
        self.show_digit(0, color, value / 10);
        self.show_digit(1, color, value % 10);
    }

    pub fn pixel(&self, row: usize, pos: usize) -> Rgb {
        self.rows
            .get(row)
            .and_then(|r| r.get(pos))
            .copied()
            .unwrap_or(BLACK)
    }

    pub fn row(&self, row: usize) -> &[Rgb] {
        self.rows.get(row).map_or(&[], |r| r.as_slice())
    }

    /// Rendered state of a segment on one row
    pub fn segment_state(&self, row: usize, segment: StripSegment) -> SegmentState {
        let pixels = self.row(row);
        let range = segment.positions();
        let end = range.end.min(pixels.len());
        let start = range.start.min(end);
        SegmentState::of(&pixels[start..end])
    }

    /// Whether any pixel on the board is lit
    pub fn is_dark(&self) -> bool {
        self.rows.iter().flatten().all(|pixel| *pixel == BLACK)
    }

    /// Physical pixel order with brightness applied
    pub fn physical(&self) -> impl Iterator<Item = Rgb> + '_ {
        let level = self.brightness;
        let out = self.rows[0].iter();
        let back = self.rows[1].iter().rev();
        out.chain(back).map(move |pixel| color::dim(*pixel, level))
    }

    /// Writes the physical chain into `buffer`
    pub fn write_physical(&self, buffer: &mut [Rgb; STRIP_LEN]) {
        for (slot, pixel) in buffer.iter_mut().zip(self.physical()) {
            *slot = pixel;
        }
    }
}

impl Default for DisplayValue {
    fn default() -> Self {
        Self::new(MAX_BRIGHTNESS_LEVEL)
    }
}

const fn clamp_level(level: u8) -> u8 {
    if level > MAX_BRIGHTNESS_LEVEL {
        MAX_BRIGHTNESS_LEVEL
    } else {
        level
    }
}
