use smart_leds::SmartLedsWrite;
#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::display::{DisplayValue, STRIP_LEN};
use crate::{Rgb, StripDriver};

/// [`StripDriver`] over any `smart-leds` writer.
///
/// Frames are flattened into the physical chain order with the brightness
/// level applied before writing.
pub struct SmartLedsStrip<W> {
    writer: W,
    buffer: [Rgb; STRIP_LEN],
    failed_writes: u32,
}

impl<W> SmartLedsStrip<W>
where
    W: SmartLedsWrite<Color = Rgb>,
{
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            buffer: [Rgb::new(0, 0, 0); STRIP_LEN],
            failed_writes: 0,
        }
    }

    /// Last frame in physical order
    pub const fn buffer(&self) -> &[Rgb; STRIP_LEN] {
        &self.buffer
    }

    /// Writes rejected by the underlying driver since construction
    pub const fn failed_writes(&self) -> u32 {
        self.failed_writes
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> StripDriver for SmartLedsStrip<W>
where
    W: SmartLedsWrite<Color = Rgb>,
{
    fn render(&mut self, value: &DisplayValue) {
        value.write_physical(&mut self.buffer);
        if self.writer.write(self.buffer.iter().copied()).is_err() {
            self.failed_writes = self.failed_writes.wrapping_add(1);
            #[cfg(feature = "esp32-log")]
            println!("[Strip] write failed ({} so far)", self.failed_writes);
        }
    }
}
