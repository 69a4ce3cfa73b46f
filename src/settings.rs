//! Persisted configuration channels and their value rules.

use crate::color::MAX_BRIGHTNESS_LEVEL;

/// Number of configuration channels
pub const CHANNEL_COUNT: usize = 7;

/// Mode channel value selecting the pedestrian interval
pub const MODE_PEDESTRIAN: u8 = 0;
/// Mode channel value selecting the traffic light with a slalom build-up
pub const MODE_TRAFFIC_SLALOM: u8 = 1;
/// Mode channel value selecting the traffic light with a shuffled build-up
pub const MODE_TRAFFIC_RANDOM: u8 = 2;

/// Independently persisted configuration value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConfigChannel {
    Brightness = 0,
    Mode = 1,
    /// Length of a pedestrian interval, seconds
    Sequence = 2,
    /// Seconds before the end of the interval the go signal starts
    Timer1 = 3,
    /// Seconds before the end of the interval the red warning starts
    Timer2 = 4,
    /// Shortest random hold of the traffic light, seconds
    LightDurationMin = 5,
    /// Longest random hold of the traffic light, seconds
    LightDurationMax = 6,
}

/// What happens when an increment passes the top of the range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    /// Stay at the maximum
    Clamp,
    /// Start again from the minimum
    Wrap,
}

/// Inclusive range of valid values for a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelRange {
    pub min: u8,
    pub max: u8,
}

impl ChannelRange {
    pub const fn new(min: u8, max: u8) -> Self {
        // An inverted range collapses onto its minimum.
        let max = if max < min { min } else { max };
        Self { min, max }
    }

    pub const fn contains(self, value: u8) -> bool {
        value >= self.min && value <= self.max
    }

    pub const fn clamp(self, value: u8) -> u8 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Next value after one button click
    pub const fn increment(self, value: u8, step: u8, overflow: Overflow) -> u8 {
        let value = self.clamp(value);
        match value.checked_add(step) {
            Some(next) if next <= self.max => next,
            _ => match overflow {
                Overflow::Clamp => self.max,
                Overflow::Wrap => self.min,
            },
        }
    }
}

impl ConfigChannel {
    pub const ALL: [Self; CHANNEL_COUNT] = [
        Self::Brightness,
        Self::Mode,
        Self::Sequence,
        Self::Timer1,
        Self::Timer2,
        Self::LightDurationMin,
        Self::LightDurationMax,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < CHANNEL_COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Channel after this one in menu order, cycling back to the first
    pub const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % CHANNEL_COUNT]
    }

    pub const fn step(self) -> u8 {
        match self {
            Self::Sequence => 5,
            _ => 1,
        }
    }

    pub const fn overflow(self) -> Overflow {
        match self {
            Self::Brightness => Overflow::Clamp,
            _ => Overflow::Wrap,
        }
    }

    pub const fn default_value(self) -> u8 {
        match self {
            Self::Brightness => 2,
            Self::Mode => MODE_PEDESTRIAN,
            Self::Sequence => 60,
            Self::Timer1 => 30,
            Self::Timer2 => 15,
            Self::LightDurationMin => 1,
            Self::LightDurationMax => 3,
        }
    }

    /// Valid range given the other channels.
    ///
    /// Timers depend on the sequence length and on each other, the light
    /// durations bound each other.
    pub const fn range(self, settings: &Settings) -> ChannelRange {
        match self {
            Self::Brightness => ChannelRange::new(0, MAX_BRIGHTNESS_LEVEL),
            Self::Mode => ChannelRange::new(MODE_PEDESTRIAN, MODE_TRAFFIC_RANDOM),
            Self::Sequence => ChannelRange::new(30, 240),
            Self::Timer1 => ChannelRange::new(10, settings.get(Self::Sequence).saturating_sub(10)),
            Self::Timer2 => ChannelRange::new(7, settings.get(Self::Timer1).saturating_sub(4)),
            Self::LightDurationMin => {
                let max = settings.get(Self::LightDurationMax);
                ChannelRange::new(1, if max > 10 { 10 } else { max })
            }
            Self::LightDurationMax => {
                let min = settings.get(Self::LightDurationMin);
                ChannelRange::new(if min < 1 { 1 } else { min }, 10)
            }
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::Mode => "mode",
            Self::Sequence => "sequence",
            Self::Timer1 => "timer1",
            Self::Timer2 => "timer2",
            Self::LightDurationMin => "light_min",
            Self::LightDurationMax => "light_max",
        }
    }
}

/// Top-level behavior selected by the mode channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkingMode {
    PedestrianInterval,
    TrafficLight,
}

/// How the traffic light builds up to the hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficStyle {
    /// Bars light one after another from the start of the board
    Slalom,
    /// Bars light in a shuffled order
    RandomShow,
}

/// Values of every configuration channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Settings {
    values: [u8; CHANNEL_COUNT],
}

impl Settings {
    pub const DEFAULT: Self = {
        let mut values = [0; CHANNEL_COUNT];
        let mut i = 0;
        while i < CHANNEL_COUNT {
            values[i] = ConfigChannel::ALL[i].default_value();
            i += 1;
        }
        Self { values }
    };

    /// Wraps raw values as read from storage, without validation
    pub const fn from_values(values: [u8; CHANNEL_COUNT]) -> Self {
        Self { values }
    }

    pub const fn values(&self) -> [u8; CHANNEL_COUNT] {
        self.values
    }

    pub const fn get(&self, channel: ConfigChannel) -> u8 {
        self.values[channel.index()]
    }

    pub const fn set(&mut self, channel: ConfigChannel, value: u8) {
        self.values[channel.index()] = value;
    }

    #[must_use]
    pub const fn with(mut self, channel: ConfigChannel, value: u8) -> Self {
        self.set(channel, value);
        self
    }

    pub const fn brightness(&self) -> u8 {
        ConfigChannel::Brightness
            .range(self)
            .clamp(self.get(ConfigChannel::Brightness))
    }

    pub const fn working_mode(&self) -> WorkingMode {
        match self.sanitized().get(ConfigChannel::Mode) {
            MODE_PEDESTRIAN => WorkingMode::PedestrianInterval,
            _ => WorkingMode::TrafficLight,
        }
    }

    pub const fn traffic_style(&self) -> TrafficStyle {
        match self.sanitized().get(ConfigChannel::Mode) {
            MODE_TRAFFIC_RANDOM => TrafficStyle::RandomShow,
            _ => TrafficStyle::Slalom,
        }
    }

    /// Copy with every channel clamped into its range.
    ///
    /// Channels are clamped in menu order, so dependent ranges are computed
    /// from already valid values.
    #[must_use]
    pub const fn sanitized(&self) -> Self {
        let mut out = *self;
        let mut i = 0;
        while i < CHANNEL_COUNT {
            let channel = ConfigChannel::ALL[i];
            let value = channel.range(&out).clamp(out.get(channel));
            out.set(channel, value);
            i += 1;
        }
        out
    }

    /// Whether every channel is inside its range
    pub const fn is_valid(&self) -> bool {
        let mut i = 0;
        while i < CHANNEL_COUNT {
            let channel = ConfigChannel::ALL[i];
            if !channel.range(self).contains(self.get(channel)) {
                return false;
            }
            i += 1;
        }
        true
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::DEFAULT
    }
}
