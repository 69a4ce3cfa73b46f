#![no_std]

pub mod channel;
pub mod color;
pub mod display;
pub mod driver;
pub mod engine;
pub mod frame_scheduler;
pub mod input;
pub mod math8;
pub mod modes;
pub mod navigator;
pub mod phase;
pub mod prng;
pub mod segment;
pub mod settings;
pub mod store;

pub use channel::{InputChannel, InputReceiver, InputSender};
pub use display::DisplayValue;
pub use driver::SmartLedsStrip;
pub use engine::{Engine, EngineConfig, EngineState, TickReport, Transition};
pub use frame_scheduler::FrameScheduler;
pub use input::{ButtonEvent, ButtonTracker};
pub use navigator::{EditSession, EditState};
pub use phase::{EndMode, PHASE_TABLE, PhaseDescriptor, PhaseId};
pub use settings::{ConfigChannel, Settings, TrafficStyle, WorkingMode};
pub use store::{ConfigStore, JournalStore, MemoryStore, StoreError};

pub use color::Rgb;
pub use embassy_time::{Duration, Instant};

/// Abstract LED strip driver
///
/// Implement this trait to support different hardware platforms.
/// The engine is generic over this trait.
pub trait StripDriver {
    /// Show a frame on the strip
    fn render(&mut self, value: &DisplayValue);
}

impl<T: StripDriver + ?Sized> StripDriver for &mut T {
    fn render(&mut self, value: &DisplayValue) {
        (**self).render(value);
    }
}
