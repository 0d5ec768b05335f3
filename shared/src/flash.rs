//! The flash programming protocol: unlock, page erase and byte program.
//!
//! Every operation here is a thin sequence over the [`Flash`] register trait
//! followed by a wait for the controller's ready line. There are no bounds
//! checks and no retries; the hardware protocol has none.

use crate::{Error, Flash};

/// The two-byte key the command register requires before the write-enable
/// latch can be set.
pub const UNLOCK_KEY: [u8; 2] = [0xAA, 0x55];

/// How long a wait on the controller's ready line is allowed to spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinPolicy {
    /// Spin until the controller reports ready, without bound.
    ///
    /// Matches the hardware's documented protocol: unresponsive hardware
    /// means the dump hangs forever.
    #[default]
    Forever,
    /// Give up with [`Error::ReadyTimeout`] after this many polls.
    Bounded(u32),
}

/// Feeds the unlock key to the command register and opens the write-enable
/// latch.
///
/// Must run before any erase or program operation; skipping it is undefined
/// hardware behavior and is not detected in software.
pub fn enable_write(flash: &mut impl Flash) {
    for key in UNLOCK_KEY {
        flash.write_command(key);
    }
    flash.set_write_enable(true);
}

/// Closes the write-enable latch, ending the unlock window.
pub fn disable_write(flash: &mut impl Flash) {
    flash.set_write_enable(false);
}

/// Erases one page and waits for the controller to finish.
///
/// The caller is responsible for `page` being a valid page number inside the
/// flash; there is no bounds check here.
pub fn erase_page(flash: &mut impl Flash, page: u8, policy: SpinPolicy) -> Result<(), Error> {
    flash.write_command(page);
    wait_ready(flash, policy)
}

/// Programs one byte and waits for the controller to finish.
///
/// The target page must already be erased. Programming can only clear bits,
/// so violating that precondition corrupts the byte silently.
pub fn write_byte(
    flash: &mut impl Flash,
    address: u16,
    data: u8,
    policy: SpinPolicy,
) -> Result<(), Error> {
    flash.program_byte(address, data);
    wait_ready(flash, policy)
}

fn wait_ready(flash: &impl Flash, policy: SpinPolicy) -> Result<(), Error> {
    match policy {
        SpinPolicy::Forever => {
            while !flash.is_ready() {}
            Ok(())
        }
        SpinPolicy::Bounded(polls) => {
            for _ in 0..polls {
                if flash.is_ready() {
                    return Ok(());
                }
            }
            Err(Error::ReadyTimeout)
        }
    }
}
