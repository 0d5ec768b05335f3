#![doc = include_str!("../../README.md")]
#![no_std]
#![warn(missing_docs)]

#[cfg(test)]
extern crate std;

pub mod dump;
pub mod flash;
pub mod layout;

#[cfg(test)]
mod sim;

/// A trait defining register-level access to the flash controller.
///
/// This is the only seam between the dump logic and the hardware. The
/// implementations perform no validation; callers own the protocol ordering
/// (unlock before erase, erase before program).
pub trait Flash {
    /// Write a value to the flash command register.
    ///
    /// Depending on controller state this either feeds the unlock key or
    /// triggers an erase of the page with that index.
    fn write_command(&mut self, value: u8);

    /// Read the write-enable latch.
    fn write_enabled(&self) -> bool;

    /// Set or clear the write-enable latch.
    ///
    /// Setting it only takes effect after the unlock key has been fed to the
    /// command register.
    fn set_write_enable(&mut self, enable: bool);

    /// Whether the controller has finished its current erase or program
    /// operation.
    fn is_ready(&self) -> bool;

    /// Store one byte into the flash window.
    ///
    /// The controller interprets the store as a program operation. The target
    /// page must have been erased first; programming can only clear bits.
    fn program_byte(&mut self, address: u16, data: u8);
}

/// The one collaborator outside the flash controller: global interrupt
/// masking around the dump.
pub trait InterruptControl {
    /// Mask all interrupts.
    ///
    /// There is deliberately no way to unmask them again; the dump does not
    /// return to normal execution.
    fn disable(&mut self);
}

/// Errors the flash protocol can report.
///
/// With the default [`flash::SpinPolicy::Forever`] no operation ever fails,
/// matching the hardware's documented protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A bounded wait ran out of polls before the controller reported ready.
    ReadyTimeout,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::ReadyTimeout => write!(f, "flash controller did not become ready"),
        }
    }
}
