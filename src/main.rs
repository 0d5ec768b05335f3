#![no_main]
#![no_std]

use rtt_target::{rprintln, rtt_init_print};
use shared::dump;
use shared::flash::SpinPolicy;
use shared::layout::DumpLayout;

mod flash;

/// Flash address the RAM image is written to. Must sit on a page boundary.
const RAM_DUMP_ADDRESS: u16 = 0x7800;
/// Start of the RAM window that gets captured.
const RAM_ADDRESS: u16 = 0x8000;
/// Smallest erasable flash unit on this part.
const PAGE_SIZE: u16 = 512;
/// Number of bytes to capture.
const RAM_SIZE: u16 = 2048;

/// Global interrupt masking through the core's PRIMASK.
struct GlobalInterrupts;

impl shared::InterruptControl for GlobalInterrupts {
    fn disable(&mut self) {
        cortex_m::interrupt::disable();
    }
}

#[cortex_m_rt::entry]
fn main() -> ! {
    // Nothing may preempt the dump, not even the banner below. The run
    // sequence masks again through the collaborator, which is idempotent.
    cortex_m::interrupt::disable();

    rtt_init_print!(NoBlockSkip, 1024);

    let layout = DumpLayout::new(
        RAM_ADDRESS..RAM_ADDRESS + RAM_SIZE,
        RAM_DUMP_ADDRESS..RAM_DUMP_ADDRESS + RAM_SIZE,
        PAGE_SIZE,
    );

    rprintln!("Starting RAM dump");
    rprintln!(
        "\tram:   {:04X?}",
        layout.ram_range()
    );
    rprintln!(
        "\tflash: {:04X?} (pages {:?})",
        layout.dump_range(),
        layout.dump_page_range()
    );

    // The captured window is the device's fixed RAM, always mapped and
    // readable at this address
    let source = unsafe {
        core::slice::from_raw_parts(RAM_ADDRESS as usize as *const u8, RAM_SIZE as usize)
    };

    let mut flash = flash::Flash;
    let mut interrupts = GlobalInterrupts;

    match dump::run(
        &mut flash,
        &mut interrupts,
        &layout,
        source,
        SpinPolicy::Forever,
    ) {
        Ok(()) => rprintln!("RAM dump complete"),
        Err(e) => rprintln!("RAM dump failed: {}", e),
    }

    // Interrupts stay masked; the dongle gets power cycled after the image
    // has been read out
    loop {}
}

#[cortex_m_rt::exception]
unsafe fn HardFault(frame: &cortex_m_rt::ExceptionFrame) -> ! {
    panic!("{:?}", frame);
}

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    rprintln!("{}", info);
    loop {
        cortex_m::asm::bkpt();
    }
}
