//! Persistence of the configuration channels.
//!
//! [`JournalStore`] keeps settings on NOR flash as an append-only journal of
//! fixed-size records spread over two pages. Every save appends a complete
//! snapshot with a sequence number and a CRC, so a write torn by power loss
//! only loses that record and the previous snapshot stays readable.

use core::fmt;

use bytemuck::{Pod, Zeroable};
use embedded_storage::nor_flash::NorFlash;
#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::settings::{CHANNEL_COUNT, ConfigChannel, Settings};

/// Storage for the configuration channels
pub trait ConfigStore {
    /// Reads every channel. Missing or unreadable data yields defaults.
    fn load(&mut self) -> Settings;

    /// Durably writes a single channel
    fn save(&mut self, channel: ConfigChannel, value: u8) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// The flash driver reported an error
    Driver,
    /// The configured region does not fit on the device
    OutOfSpace,
    /// Page or record size does not match the device granularity
    Misaligned,
    /// A written record did not read back intact
    Corrupt,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Driver => f.write_str("flash driver error"),
            Self::OutOfSpace => f.write_str("settings region does not fit on flash"),
            Self::Misaligned => f.write_str("settings region is not aligned to flash geometry"),
            Self::Corrupt => f.write_str("settings record failed verification"),
        }
    }
}

/// RAM-backed store, for hosts and boards without flash
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    settings: Settings,
    writes: usize,
}

impl MemoryStore {
    pub const fn new() -> Self {
        Self::with_settings(Settings::DEFAULT)
    }

    pub const fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            writes: 0,
        }
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Number of successful saves
    pub const fn writes(&self) -> usize {
        self.writes
    }
}

impl ConfigStore for MemoryStore {
    fn load(&mut self) -> Settings {
        self.settings
    }

    fn save(&mut self, channel: ConfigChannel, value: u8) -> Result<(), StoreError> {
        self.settings.set(channel, value);
        self.writes += 1;
        Ok(())
    }
}

const RECORD_MAGIC: u8 = 0xA5;
const PAGE_COUNT: u32 = 2;
const ERASED: u8 = 0xFF;

#[derive(Debug, Clone, Copy, Zeroable, Pod)]
#[repr(C)]
struct Record {
    sequence: u32,
    values: [u8; CHANNEL_COUNT],
    magic: u8,
    reserved: [u8; 3],
    crc: u8,
}

/// Size of one journal record on flash
pub const RECORD_SIZE: usize = size_of::<Record>();

const _: () = assert!(RECORD_SIZE == 16);

impl Record {
    fn new(sequence: u32, settings: &Settings) -> Self {
        let mut record = Self {
            sequence,
            values: settings.values(),
            magic: RECORD_MAGIC,
            reserved: [ERASED; 3],
            crc: 0,
        };
        record.crc = crc8(&bytemuck::bytes_of(&record)[..RECORD_SIZE - 1]);
        record
    }

    fn is_erased(bytes: &[u8; RECORD_SIZE]) -> bool {
        bytes.iter().all(|b| *b == ERASED)
    }

    fn decode(bytes: &[u8; RECORD_SIZE]) -> Option<Self> {
        let record: Self = bytemuck::pod_read_unaligned(bytes);
        let intact = record.magic == RECORD_MAGIC && crc8(&bytes[..RECORD_SIZE - 1]) == record.crc;
        intact.then_some(record)
    }
}

/// CRC-8 with polynomial 0x31 and initial value 0xFF
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0xFF;
    for byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x31
            } else {
                crc << 1
            };
        }
    }
    crc
}

#[derive(Debug, Clone, Copy, Default)]
struct PageScan {
    /// Bytes up to the end of the last programmed slot
    used: u32,
    newest: Option<Record>,
}

/// Power-loss-safe settings journal on NOR flash.
///
/// Occupies two erase pages starting at `base`. Records are appended to the
/// active page; when it is full the other page is erased and becomes active.
/// The newest intact record across both pages is the current state.
pub struct JournalStore<F> {
    flash: F,
    base: u32,
    page_size: u32,
    active: u32,
    next_offset: u32,
    sequence: u32,
    settings: Settings,
}

#[allow(clippy::cast_possible_truncation)]
const RECORD_LEN: u32 = RECORD_SIZE as u32;

impl<F: NorFlash> JournalStore<F> {
    /// Validates the layout and reads the current state from flash
    pub fn mount(flash: F, base: u32) -> Result<Self, StoreError> {
        let page_size = u32::try_from(F::ERASE_SIZE).map_err(|_| StoreError::OutOfSpace)?;
        if page_size == 0
            || !RECORD_SIZE.is_multiple_of(F::WRITE_SIZE)
            || !RECORD_SIZE.is_multiple_of(F::READ_SIZE)
            || !base.is_multiple_of(page_size)
        {
            return Err(StoreError::Misaligned);
        }
        let end = u64::from(base) + u64::from(page_size) * u64::from(PAGE_COUNT);
        if page_size < RECORD_LEN || end > flash.capacity() as u64 {
            return Err(StoreError::OutOfSpace);
        }

        let mut store = Self {
            flash,
            base,
            page_size,
            active: 0,
            next_offset: 0,
            sequence: 0,
            settings: Settings::DEFAULT,
        };
        store.refresh()?;
        Ok(store)
    }

    /// Last settings read from or written to flash
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    pub const fn flash(&self) -> &F {
        &self.flash
    }

    pub fn flash_mut(&mut self) -> &mut F {
        &mut self.flash
    }

    /// Releases the flash device
    pub fn into_inner(self) -> F {
        self.flash
    }

    const fn page_addr(&self, page: u32) -> u32 {
        self.base + page * self.page_size
    }

    /// Reads every slot of `page`.
    ///
    /// A failed append can leave an erased slot in front of newer records,
    /// so the scan never stops at the first erased slot.
    fn scan_page(&mut self, page: u32) -> Result<PageScan, StoreError> {
        let mut scan = PageScan::default();
        let mut slot = [0u8; RECORD_SIZE];
        let mut offset = 0;
        while offset + RECORD_LEN <= self.page_size {
            let addr = self.page_addr(page) + offset;
            self.flash
                .read(addr, &mut slot)
                .map_err(|_| StoreError::Driver)?;
            offset += RECORD_LEN;
            if Record::is_erased(&slot) {
                continue;
            }
            // Torn slots still count as used, they are never rewritten.
            scan.used = offset;
            if let Some(record) = Record::decode(&slot) {
                if scan.newest.is_none_or(|n| record.sequence > n.sequence) {
                    scan.newest = Some(record);
                }
            }
        }
        Ok(scan)
    }

    /// Re-reads both pages and adopts the newest intact record
    fn refresh(&mut self) -> Result<(), StoreError> {
        let scans = [self.scan_page(0)?, self.scan_page(1)?];

        let newest = (0..PAGE_COUNT)
            .filter_map(|page| scans[page as usize].newest.map(|r| (page, r)))
            .max_by_key(|(_, record)| record.sequence);

        match newest {
            Some((page, record)) => {
                self.active = page;
                self.next_offset = scans[page as usize].used;
                self.sequence = record.sequence;
                self.settings = Settings::from_values(record.values);
            }
            None => {
                self.active = 0;
                self.next_offset = scans[0].used;
                self.sequence = 0;
                self.settings = Settings::DEFAULT;
            }
        }
        Ok(())
    }

    fn append(&mut self, settings: Settings) -> Result<(), StoreError> {
        if self.next_offset + RECORD_LEN > self.page_size {
            // The other page only holds older snapshots, the newest one stays
            // on the full page until the first record lands on the fresh page.
            let other = (self.active + 1) % PAGE_COUNT;
            let from = self.page_addr(other);
            self.flash
                .erase(from, from + self.page_size)
                .map_err(|_| StoreError::Driver)?;
            self.active = other;
            self.next_offset = 0;
        }

        let sequence = self.sequence.wrapping_add(1);
        let record = Record::new(sequence, &settings);
        let addr = self.page_addr(self.active) + self.next_offset;
        self.next_offset += RECORD_LEN;

        self.flash
            .write(addr, bytemuck::bytes_of(&record))
            .map_err(|_| StoreError::Driver)?;

        let mut check = [0u8; RECORD_SIZE];
        self.flash
            .read(addr, &mut check)
            .map_err(|_| StoreError::Driver)?;
        if check.as_slice() != bytemuck::bytes_of(&record) {
            return Err(StoreError::Corrupt);
        }

        self.sequence = sequence;
        self.settings = settings;
        Ok(())
    }
}

impl<F: NorFlash> ConfigStore for JournalStore<F> {
    fn load(&mut self) -> Settings {
        if let Err(_err) = self.refresh() {
            #[cfg(feature = "esp32-log")]
            println!("[Store] refresh failed, keeping cached settings: {}", _err);
        }
        self.settings
    }

    fn save(&mut self, channel: ConfigChannel, value: u8) -> Result<(), StoreError> {
        let settings = self.settings.with(channel, value);
        self.append(settings)
    }
}
