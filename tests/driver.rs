mod common;

mod tests {
    use myrtio_pitstick::color::{BLACK, GREEN, RED};
    use myrtio_pitstick::display::STRIP_LEN;
    use myrtio_pitstick::{DisplayValue, Rgb, SmartLedsStrip, StripDriver};

    use crate::common::MockWriter;

    fn frame() -> DisplayValue {
        let mut frame = DisplayValue::new(1);
        frame.put(0, 0, RED);
        frame.put(1, 0, GREEN);
        frame
    }

    #[test]
    fn test_writes_physical_chain() {
        let mut strip = SmartLedsStrip::new(MockWriter::default());
        strip.render(&frame());

        let buffer = strip.buffer();
        assert_eq!(buffer[0], Rgb::new(63, 0, 0));
        assert_eq!(buffer[1], BLACK);
        assert_eq!(buffer[STRIP_LEN - 1], Rgb::new(0, 63, 0));
        assert_eq!(strip.failed_writes(), 0);

        let buffer = *buffer;
        let writer = strip.into_inner();
        assert_eq!(writer.writes, 1);
        assert_eq!(writer.last.as_slice(), buffer.as_slice());
    }

    #[test]
    fn test_counts_failed_writes() {
        let mut strip = SmartLedsStrip::new(MockWriter {
            fail: true,
            ..MockWriter::default()
        });
        strip.render(&frame());
        strip.render(&DisplayValue::default());
        assert_eq!(strip.failed_writes(), 2);
        // The buffer still holds the last frame for a retry.
        assert!(strip.buffer().iter().all(|p| *p == BLACK));

        let writer = strip.into_inner();
        assert_eq!(writer.writes, 2);
        assert!(writer.last.is_empty());
    }
}
