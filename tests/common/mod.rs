//! Shared mocks and input scripts for the engine tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use embedded_storage::nor_flash::{
    ErrorType, NorFlash, NorFlashError, NorFlashErrorKind, ReadNorFlash,
};
use myrtio_pitstick::Rgb;
use myrtio_pitstick::engine::TICK_PERIOD;
use myrtio_pitstick::phase::Scope;
use myrtio_pitstick::{
    ButtonEvent, ConfigChannel, ConfigStore, DisplayValue, Engine, EngineConfig, MemoryStore,
    PhaseId, Settings, StoreError, StripDriver, TickReport,
};
use smart_leds::SmartLedsWrite;

// ============================================================================
// Strip
// ============================================================================

/// Strip that keeps every frame it was asked to show
#[derive(Debug, Default)]
pub struct RecordingStrip {
    pub frames: Vec<DisplayValue>,
}

impl RecordingStrip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> &DisplayValue {
        self.frames.last().expect("no frame rendered yet")
    }
}

impl StripDriver for RecordingStrip {
    fn render(&mut self, value: &DisplayValue) {
        self.frames.push(value.clone());
    }
}

/// `smart-leds` writer that keeps the last chain it was sent
#[derive(Debug, Default)]
pub struct MockWriter {
    pub last: Vec<Rgb>,
    pub writes: usize,
    pub fail: bool,
}

impl SmartLedsWrite for MockWriter {
    type Error = ();
    type Color = Rgb;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        self.writes += 1;
        if self.fail {
            return Err(());
        }
        self.last = iterator.into_iter().map(Into::into).collect();
        Ok(())
    }
}

// ============================================================================
// Stores
// ============================================================================

/// Store whose writes always fail
#[derive(Debug, Default)]
pub struct FailingStore {
    pub inner: MemoryStore,
    pub attempts: usize,
}

impl FailingStore {
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            inner: MemoryStore::with_settings(settings),
            attempts: 0,
        }
    }
}

impl ConfigStore for FailingStore {
    fn load(&mut self) -> Settings {
        self.inner.load()
    }

    fn save(&mut self, _channel: ConfigChannel, _value: u8) -> Result<(), StoreError> {
        self.attempts += 1;
        Err(StoreError::Driver)
    }
}

// ============================================================================
// NOR flash
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RamFlashError(pub NorFlashErrorKind);

impl NorFlashError for RamFlashError {
    fn kind(&self) -> NorFlashErrorKind {
        self.0
    }
}

/// NOR flash in RAM: writes can only clear bits, erase sets whole pages to 0xFF.
#[derive(Debug, Clone)]
pub struct RamFlash {
    pub data: Vec<u8>,
    /// Next write stops after this many bytes and fails, as on power loss
    pub tear_next_write: Option<usize>,
    pub fail_writes: bool,
    pub writes: usize,
    pub erases: usize,
}

impl RamFlash {
    pub const PAGE: usize = 128;

    pub fn new(pages: usize) -> Self {
        Self {
            data: vec![0xFF; pages * Self::PAGE],
            tear_next_write: None,
            fail_writes: false,
            writes: 0,
            erases: 0,
        }
    }

    fn check(&self, offset: u32, len: usize) -> Result<(usize, usize), RamFlashError> {
        let start = offset as usize;
        let end = start + len;
        if end > self.data.len() {
            return Err(RamFlashError(NorFlashErrorKind::OutOfBounds));
        }
        Ok((start, end))
    }
}

impl ErrorType for RamFlash {
    type Error = RamFlashError;
}

impl ReadNorFlash for RamFlash {
    const READ_SIZE: usize = 1;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let (start, end) = self.check(offset, bytes.len())?;
        bytes.copy_from_slice(&self.data[start..end]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.data.len()
    }
}

impl NorFlash for RamFlash {
    const WRITE_SIZE: usize = 4;
    const ERASE_SIZE: usize = Self::PAGE;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        let (start, end) = self.check(from, (to - from) as usize)?;
        if start % Self::PAGE != 0 || end % Self::PAGE != 0 {
            return Err(RamFlashError(NorFlashErrorKind::NotAligned));
        }
        self.data[start..end].fill(0xFF);
        self.erases += 1;
        Ok(())
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(RamFlashError(NorFlashErrorKind::Other));
        }
        let (start, _) = self.check(offset, bytes.len())?;
        let (len, torn) = match self.tear_next_write.take() {
            Some(cut) => (cut.min(bytes.len()), true),
            None => (bytes.len(), false),
        };
        for (cell, byte) in self.data[start..start + len].iter_mut().zip(bytes) {
            *cell &= *byte;
        }
        self.writes += 1;
        if torn {
            return Err(RamFlashError(NorFlashErrorKind::Other));
        }
        Ok(())
    }
}

// ============================================================================
// Engine scripts
// ============================================================================

pub type TestEngine<S> = Engine<S, RecordingStrip>;

pub fn engine_with(settings: Settings) -> TestEngine<MemoryStore> {
    Engine::new(
        MemoryStore::with_settings(settings),
        RecordingStrip::new(),
        EngineConfig::default(),
    )
}

pub fn tick<S: ConfigStore>(engine: &mut TestEngine<S>, event: Option<ButtonEvent>) -> TickReport {
    engine.tick(event, TICK_PERIOD)
}

pub fn idle<S: ConfigStore>(engine: &mut TestEngine<S>, ticks: usize) -> Vec<TickReport> {
    (0..ticks).map(|_| tick(engine, None)).collect()
}

/// Short click: press on one tick, release on the next
pub fn click<S: ConfigStore>(engine: &mut TestEngine<S>) -> TickReport {
    tick(engine, Some(ButtonEvent::Pressed));
    tick(engine, Some(ButtonEvent::Released))
}

/// Press held past the long-press threshold, still held
pub fn hold<S: ConfigStore>(engine: &mut TestEngine<S>) -> TickReport {
    tick(engine, Some(ButtonEvent::Pressed));
    tick(engine, Some(ButtonEvent::LongPressed))
}

/// Long press followed by release
pub fn long_press<S: ConfigStore>(engine: &mut TestEngine<S>) -> TickReport {
    hold(engine);
    tick(engine, Some(ButtonEvent::Released))
}

/// Idles until the phase changes to `target`, failing after `limit` ticks
pub fn run_until<S: ConfigStore>(engine: &mut TestEngine<S>, target: PhaseId, limit: usize) -> Vec<TickReport> {
    let mut reports = Vec::new();
    for _ in 0..limit {
        if engine.phase() == target {
            return reports;
        }
        reports.push(tick(engine, None));
    }
    assert_eq!(engine.phase(), target, "phase not reached within {limit} ticks");
    reports
}

/// Presses during the boot window and waits for the first channel
pub fn enter_config<S: ConfigStore>(engine: &mut TestEngine<S>) {
    assert_eq!(engine.phase(), PhaseId::Idle);
    tick(engine, Some(ButtonEvent::Pressed));
    assert_eq!(engine.phase(), PhaseId::Config);
    tick(engine, Some(ButtonEvent::Released));
    assert_eq!(engine.phase(), PhaseId::ConfigBegin);
    tick(engine, None);
    assert_eq!(engine.phase(), PhaseId::ConfigBrightness);
}

/// Clicks through the menu until `channel` is shown
pub fn select_channel<S: ConfigStore>(engine: &mut TestEngine<S>, channel: ConfigChannel) {
    for _ in 0..ConfigChannel::ALL.len() + 2 {
        if engine.state().selected_channel() == Some(channel) {
            return;
        }
        click(engine);
    }
    panic!("channel {channel:?} not reachable");
}

/// Idles until the engine is in the lock subtree
pub fn run_until_locked<S: ConfigStore>(engine: &mut TestEngine<S>, limit: usize) {
    for _ in 0..limit {
        if engine.phase().scope() == Scope::Lock {
            return;
        }
        tick(engine, None);
    }
    panic!("lock not reached within {limit} ticks");
}
