mod tests {
    use myrtio_pitstick::Rgb;
    use myrtio_pitstick::color::{BRIGHTNESS_LEVELS, dim};
    use myrtio_pitstick::math8::{scale8, scale_rgb};

    #[test]
    fn test_scale8() {
        assert_eq!(scale8(255, 128), 128);
        assert_eq!(scale8(0, 128), 0);
        assert_eq!(scale8(128, 128), 64);
        assert_eq!(scale8(128, 255), 128);
        assert_eq!(scale8(128, 0), 0);
        assert_eq!(scale8(255, 255), 255);
    }

    #[test]
    fn test_scale_rgb() {
        assert_eq!(scale_rgb(Rgb::new(255, 128, 0), 128), Rgb::new(128, 64, 0));
        assert_eq!(scale_rgb(Rgb::new(10, 20, 30), 255), Rgb::new(10, 20, 30));
    }

    #[test]
    fn test_dim_by_level() {
        let white = Rgb::new(255, 255, 255);
        for (level, scale) in BRIGHTNESS_LEVELS.iter().enumerate() {
            assert_eq!(dim(white, level as u8), Rgb::new(*scale, *scale, *scale));
        }
    }
}
