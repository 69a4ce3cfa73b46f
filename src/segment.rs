use core::ops::Range;

use crate::Rgb;

/// Number of light segments on each row of the board
pub const STRIP_COUNT: usize = 5;

/// Run of consecutive pixels on one row, in logical positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripSegment {
    pub from: u8,
    pub len: u8,
}

impl StripSegment {
    pub const fn new(from: u8, len: u8) -> Self {
        Self { from, len }
    }

    /// One past the last position covered by the segment
    pub const fn end(self) -> u8 {
        self.from + self.len
    }

    /// Logical positions covered by the segment
    pub const fn positions(self) -> Range<usize> {
        self.from as usize..self.end() as usize
    }
}

/// The five light bars used by the pedestrian and traffic sequences.
pub const LIGHTS: [StripSegment; STRIP_COUNT] = [
    StripSegment::new(1, 10),
    StripSegment::new(16, 10),
    StripSegment::new(31, 10),
    StripSegment::new(46, 10),
    StripSegment::new(61, 10),
];

/// Short markers in the middle of each light bar, used while counting down.
pub const MARKERS: [StripSegment; STRIP_COUNT] = [
    StripSegment::new(5, 2),
    StripSegment::new(20, 2),
    StripSegment::new(35, 2),
    StripSegment::new(50, 2),
    StripSegment::new(65, 2),
];

/// Bars lit by the lock heartbeat
pub const LOCK_BARS: [StripSegment; 2] = [StripSegment::new(1, 9), StripSegment::new(61, 11)];

/// Bar confirming a saved configuration value
pub const SAVE_BAR: StripSegment = StripSegment::new(0, 20);

/// Externally visible state of one segment on one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentState {
    /// Every pixel is black
    Off,
    /// Every pixel shows the same color
    Lit(Rgb),
    /// Pixels differ
    Mixed,
}

impl SegmentState {
    /// Classifies a run of pixels
    pub fn of(pixels: &[Rgb]) -> Self {
        let Some(first) = pixels.first().copied() else {
            return Self::Off;
        };
        if pixels.iter().any(|pixel| *pixel != first) {
            return Self::Mixed;
        }
        if first == crate::color::BLACK {
            Self::Off
        } else {
            Self::Lit(first)
        }
    }

    pub const fn is_lit(self) -> bool {
        matches!(self, Self::Lit(_))
    }
}
