//! The hardware implementation of [`shared::Flash`], talking straight to the
//! flash controller's special function registers.

/// Flash command register. Takes the unlock key, or a page index to erase
/// once the write-enable latch is open.
const FCR: *mut u8 = 0xFA as *mut u8;
/// Flash status register.
const FSR: *mut u8 = 0xF8 as *mut u8;
/// FSR bit 5: the write-enable latch.
const WEN: u8 = 1 << 5;
/// FSR bit 4: flash interface ready, inverted. Reads 1 while an erase or
/// program operation is in flight.
const RDYN: u8 = 1 << 4;

/// The firmware's register-level access to the flash controller.
pub struct Flash;

impl shared::Flash for Flash {
    fn write_command(&mut self, value: u8) {
        // FCR is a device register, always mapped
        unsafe { FCR.write_volatile(value) }
    }

    fn write_enabled(&self) -> bool {
        unsafe { FSR.read_volatile() & WEN != 0 }
    }

    fn set_write_enable(&mut self, enable: bool) {
        unsafe {
            let fsr = FSR.read_volatile();
            if enable {
                FSR.write_volatile(fsr | WEN);
            } else {
                FSR.write_volatile(fsr & !WEN);
            }
        }
    }

    fn is_ready(&self) -> bool {
        unsafe { FSR.read_volatile() & RDYN == 0 }
    }

    fn program_byte(&mut self, address: u16, data: u8) {
        // Stores into the flash window are interpreted by the controller as
        // program operations
        unsafe { (address as usize as *mut u8).write_volatile(data) }
    }
}
