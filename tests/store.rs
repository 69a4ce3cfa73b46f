mod common;

mod tests {
    use myrtio_pitstick::store::{RECORD_SIZE, crc8};
    use myrtio_pitstick::{ConfigChannel, ConfigStore, JournalStore, MemoryStore, Settings, StoreError};

    use crate::common::RamFlash;

    fn mounted() -> JournalStore<RamFlash> {
        JournalStore::mount(RamFlash::new(2), 0).unwrap()
    }

    fn remount(store: JournalStore<RamFlash>) -> JournalStore<RamFlash> {
        JournalStore::mount(store.into_inner(), 0).unwrap()
    }

    #[test]
    fn test_crc8() {
        assert_eq!(crc8(b"123456789"), 0xF7);
        assert_eq!(crc8(&[]), 0xFF);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load(), Settings::DEFAULT);
        store.save(ConfigChannel::Timer2, 9).unwrap();
        assert_eq!(store.load().get(ConfigChannel::Timer2), 9);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_blank_flash_loads_defaults() {
        let mut store = mounted();
        assert_eq!(store.load(), Settings::DEFAULT);
        assert_eq!(store.flash().writes, 0);
    }

    #[test]
    fn test_saved_value_survives_remount() {
        let mut store = mounted();
        store.save(ConfigChannel::LightDurationMax, 7).unwrap();
        store.save(ConfigChannel::Mode, 2).unwrap();

        let mut store = remount(store);
        let settings = store.load();
        assert_eq!(settings.get(ConfigChannel::LightDurationMax), 7);
        assert_eq!(settings.get(ConfigChannel::Mode), 2);
        assert_eq!(settings.get(ConfigChannel::Sequence), 60);
    }

    #[test]
    fn test_torn_write_keeps_previous_value() {
        let mut store = mounted();
        store.save(ConfigChannel::Sequence, 90).unwrap();

        store.flash_mut().tear_next_write = Some(RECORD_SIZE / 2);
        assert_eq!(store.save(ConfigChannel::Sequence, 95), Err(StoreError::Driver));

        let mut store = remount(store);
        assert_eq!(store.load().get(ConfigChannel::Sequence), 90);

        // The torn slot is skipped, the next save lands after it.
        store.save(ConfigChannel::Sequence, 100).unwrap();
        let mut store = remount(store);
        assert_eq!(store.load().get(ConfigChannel::Sequence), 100);
    }

    #[test]
    fn test_journal_rolls_over_pages() {
        let records_per_page = RamFlash::PAGE / RECORD_SIZE;
        let mut store = mounted();
        for i in 0..(records_per_page * 3) {
            let value = 30 + (i % 40) as u8;
            store.save(ConfigChannel::Sequence, value).unwrap();
        }
        assert!(store.flash().erases >= 2);

        let last = 30 + ((records_per_page * 3 - 1) % 40) as u8;
        let mut store = remount(store);
        assert_eq!(store.load().get(ConfigChannel::Sequence), last);
    }

    #[test]
    fn test_torn_write_on_fresh_page_keeps_previous_value() {
        let records_per_page = RamFlash::PAGE / RECORD_SIZE;
        let mut store = mounted();
        for _ in 0..records_per_page {
            store.save(ConfigChannel::Timer1, 20).unwrap();
        }
        // The next save erases the second page and tears there.
        store.flash_mut().tear_next_write = Some(3);
        assert!(store.save(ConfigChannel::Timer1, 25).is_err());

        let mut store = remount(store);
        assert_eq!(store.load().get(ConfigChannel::Timer1), 20);
    }

    #[test]
    fn test_failing_driver_reports_error() {
        let mut store = mounted();
        store.flash_mut().fail_writes = true;
        assert_eq!(store.save(ConfigChannel::Mode, 1), Err(StoreError::Driver));
        assert_eq!(store.settings().get(ConfigChannel::Mode), 0);
    }

    #[test]
    fn test_save_after_failed_write_is_loaded() {
        let mut store = mounted();
        store.save(ConfigChannel::Sequence, 90).unwrap();

        store.flash_mut().fail_writes = true;
        assert_eq!(store.save(ConfigChannel::Sequence, 95), Err(StoreError::Driver));
        store.flash_mut().fail_writes = false;

        store.save(ConfigChannel::Sequence, 100).unwrap();
        assert_eq!(store.load().get(ConfigChannel::Sequence), 100);

        let mut store = remount(store);
        assert_eq!(store.load().get(ConfigChannel::Sequence), 100);
    }

    #[test]
    fn test_save_after_empty_torn_write_is_loaded() {
        let mut store = mounted();
        store.save(ConfigChannel::Timer1, 20).unwrap();

        // Power lost before the first byte was programmed: the slot stays erased.
        store.flash_mut().tear_next_write = Some(0);
        assert!(store.save(ConfigChannel::Timer1, 21).is_err());

        store.save(ConfigChannel::Timer1, 22).unwrap();
        let mut store = remount(store);
        assert_eq!(store.load().get(ConfigChannel::Timer1), 22);

        // The journal keeps appending after the newest record.
        store.save(ConfigChannel::Timer1, 23).unwrap();
        let mut store = remount(store);
        assert_eq!(store.load().get(ConfigChannel::Timer1), 23);
    }

    #[test]
    fn test_mount_checks_layout() {
        assert!(matches!(
            JournalStore::mount(RamFlash::new(1), 0),
            Err(StoreError::OutOfSpace)
        ));
        assert!(matches!(
            JournalStore::mount(RamFlash::new(4), 64),
            Err(StoreError::Misaligned)
        ));
        assert!(JournalStore::mount(RamFlash::new(4), RamFlash::PAGE as u32 * 2).is_ok());
    }

    #[test]
    fn test_store_error_display() {
        assert_eq!(StoreError::Driver.to_string(), "flash driver error");
        assert_eq!(
            StoreError::Corrupt.to_string(),
            "settings record failed verification"
        );
    }
}
