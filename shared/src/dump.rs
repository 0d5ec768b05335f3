//! The dump sequence: erase the destination region, then stream the RAM image
//! into it byte by byte.

use crate::flash::{self, SpinPolicy};
use crate::layout::DumpLayout;
use crate::{Error, Flash, InterruptControl};

/// Erases every page of the dump region, in increasing page order.
///
/// Requires the write-enable latch to be open.
pub fn erase_dump_region(
    flash: &mut impl Flash,
    layout: &DumpLayout,
    policy: SpinPolicy,
) -> Result<(), Error> {
    for page in layout.dump_page_range() {
        flash::erase_page(flash, page, policy)?;
    }
    Ok(())
}

/// Programs the source image into the dump region, in strictly increasing
/// address order with no gaps.
///
/// The destination becomes a byte-for-byte image of `source`, so every page
/// of the dump region must have been erased first.
#[track_caller]
pub fn write_dump(
    flash: &mut impl Flash,
    layout: &DumpLayout,
    source: &[u8],
    policy: SpinPolicy,
) -> Result<(), Error> {
    assert_eq!(
        source.len(),
        layout.ram_range().len(),
        "source does not match the configured RAM window"
    );

    let base = layout.dump_range().start;
    for (offset, &byte) in source.iter().enumerate() {
        flash::write_byte(flash, base + offset as u16, byte, policy)?;
    }
    Ok(())
}

/// Runs one complete dump: mask interrupts, unlock, erase, write, lock.
///
/// Interrupts are masked as the very first step and never unmasked again; the
/// device is expected to be reset externally once the image has been read
/// out. The write-enable latch is closed on the way out even when a bounded
/// wait gave up, so the unlock window never outlives the routine.
pub fn run(
    flash: &mut impl Flash,
    interrupts: &mut impl InterruptControl,
    layout: &DumpLayout,
    source: &[u8],
    policy: SpinPolicy,
) -> Result<(), Error> {
    interrupts.disable();
    flash::enable_write(flash);

    let result = erase_dump_region(flash, layout, policy)
        .and_then(|()| write_dump(flash, layout, source, policy));

    flash::disable_write(flash);
    result
}
