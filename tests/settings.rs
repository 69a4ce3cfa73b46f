mod tests {
    use myrtio_pitstick::settings::{ChannelRange, Overflow};
    use myrtio_pitstick::{ConfigChannel, Settings, TrafficStyle, WorkingMode};

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.is_valid());
        assert_eq!(settings.values(), [2, 0, 60, 30, 15, 1, 3]);
        assert_eq!(settings.working_mode(), WorkingMode::PedestrianInterval);
    }

    #[test]
    fn test_increment_policies() {
        let brightness = ChannelRange::new(0, 3);
        assert_eq!(brightness.increment(3, 1, Overflow::Clamp), 3);
        assert_eq!(brightness.increment(2, 1, Overflow::Clamp), 3);

        let sequence = ChannelRange::new(30, 240);
        assert_eq!(sequence.increment(240, 5, Overflow::Wrap), 30);
        assert_eq!(sequence.increment(238, 5, Overflow::Wrap), 30);
        assert_eq!(sequence.increment(255, 5, Overflow::Wrap), 30);
    }

    #[test]
    fn test_never_exceeds_maximum() {
        let settings = Settings::DEFAULT;
        for channel in ConfigChannel::ALL {
            let range = channel.range(&settings);
            let mut value = range.min;
            for _ in 0..300 {
                value = range.increment(value, channel.step(), channel.overflow());
                assert!(range.contains(value), "{channel:?} left its range with {value}");
            }
        }
    }

    #[test]
    fn test_dependent_ranges() {
        let settings = Settings::DEFAULT
            .with(ConfigChannel::Sequence, 40)
            .with(ConfigChannel::Timer1, 20);
        assert_eq!(ConfigChannel::Timer1.range(&settings), ChannelRange::new(10, 30));
        assert_eq!(ConfigChannel::Timer2.range(&settings), ChannelRange::new(7, 16));

        let settings = Settings::DEFAULT
            .with(ConfigChannel::LightDurationMin, 4)
            .with(ConfigChannel::LightDurationMax, 6);
        assert_eq!(ConfigChannel::LightDurationMin.range(&settings), ChannelRange::new(1, 6));
        assert_eq!(ConfigChannel::LightDurationMax.range(&settings), ChannelRange::new(4, 10));
    }

    #[test]
    fn test_sanitized_keeps_min_below_max() {
        let settings = Settings::from_values([9, 7, 255, 250, 250, 9, 2]).sanitized();
        assert!(settings.is_valid());
        assert_eq!(settings.get(ConfigChannel::Brightness), 3);
        assert_eq!(settings.get(ConfigChannel::Mode), 2);
        assert_eq!(settings.get(ConfigChannel::Sequence), 240);
        assert_eq!(settings.get(ConfigChannel::Timer1), 230);
        assert_eq!(settings.get(ConfigChannel::Timer2), 226);
        assert!(
            settings.get(ConfigChannel::LightDurationMin)
                <= settings.get(ConfigChannel::LightDurationMax)
        );
    }

    #[test]
    fn test_mode_values() {
        let slalom = Settings::DEFAULT.with(ConfigChannel::Mode, 1);
        assert_eq!(slalom.working_mode(), WorkingMode::TrafficLight);
        assert_eq!(slalom.traffic_style(), TrafficStyle::Slalom);

        let random = Settings::DEFAULT.with(ConfigChannel::Mode, 2);
        assert_eq!(random.traffic_style(), TrafficStyle::RandomShow);
    }

    #[test]
    fn test_channel_cycle() {
        assert_eq!(ConfigChannel::LightDurationMax.next(), ConfigChannel::Brightness);
        assert_eq!(ConfigChannel::from_index(3), Some(ConfigChannel::Timer1));
        assert_eq!(ConfigChannel::from_index(7), None);
    }
}
