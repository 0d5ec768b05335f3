//! The memory geometry of a dump: which RAM range is captured and which flash
//! range it lands in.

use core::ops::Range;

/// The fixed memory geometry a dump operates on.
///
/// All values are decided at build time by the firmware; nothing here changes
/// at runtime. The constructor checks the configuration invariants once so
/// the driver itself does not have to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpLayout {
    ram: Range<u16>,
    dump: Range<u16>,
    page_size: u16,
}

impl DumpLayout {
    /// Builds a layout from the RAM range to capture, the flash range to dump
    /// it into and the flash page size.
    ///
    /// Panics when the dump region is not page aligned, does not span whole
    /// pages, does not match the RAM region in size, or reaches past the
    /// pages addressable by a one-byte page index. These are build-time
    /// configuration mistakes, so failing loudly at startup is the right
    /// outcome.
    #[track_caller]
    pub fn new(ram: Range<u16>, dump: Range<u16>, page_size: u16) -> Self {
        assert!(page_size > 0, "page size must be non-zero");
        assert!(
            dump.start % page_size == 0,
            "dump region must start on a page boundary"
        );
        assert!(
            dump.len() % page_size as usize == 0,
            "dump region must span whole pages"
        );
        assert_eq!(
            ram.len(),
            dump.len(),
            "RAM and dump regions must be the same size"
        );
        // The command register takes the page index as a single byte, so the
        // whole dump region has to sit inside the u8 page index space.
        assert!(
            dump.end / page_size <= u8::MAX as u16,
            "dump region extends past the u8 page index space"
        );

        Self {
            ram,
            dump,
            page_size,
        }
    }

    /// The RAM address range that gets captured.
    pub fn ram_range(&self) -> Range<u16> {
        self.ram.clone()
    }

    /// The flash address range the image is written to.
    pub fn dump_range(&self) -> Range<u16> {
        self.dump.clone()
    }

    /// The smallest erasable flash unit.
    pub fn page_size(&self) -> u16 {
        self.page_size
    }

    /// The page range of the dump region.
    pub fn dump_page_range(&self) -> Range<u8> {
        ((self.dump.start / self.page_size) as u8)..((self.dump.end / self.page_size) as u8)
    }
}
