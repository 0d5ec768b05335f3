//! A simulated flash controller and interrupt controller for host tests.
//!
//! The flash starts out fully erased (all ones) and models the controller's
//! actual semantics: the unlock key must be fed before the write-enable latch
//! opens, a command write with the latch open erases that page, and a store
//! into the flash window programs a byte by clearing bits. The controller
//! stays busy for a few polls after each operation so the driver's wait loops
//! are really exercised.
//!
//! Protocol violations the real hardware answers with undefined behavior
//! (erase or program without write enable, operations while busy) are hard
//! panics here so tests catch them.

use crate::{Flash, InterruptControl};
use core::cell::{Cell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

/// Page size of the simulated part.
pub const PAGE_SIZE: u16 = 512;
/// Total amount of simulated flash.
pub const FLASH_SIZE: usize = 0x8000;

/// Polls the controller stays busy after an erase.
const ERASE_POLLS: u32 = 3;
/// Polls the controller stays busy after a program.
const PROGRAM_POLLS: u32 = 1;

/// Everything observable the firmware did, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The interrupt controller was asked to mask all interrupts.
    InterruptsMasked,
    /// A value was written to the command register.
    Command(u8),
    /// The write-enable latch was set or cleared.
    WriteEnable(bool),
    /// A page erase was triggered.
    ErasePage(u8),
    /// A byte was programmed.
    Program {
        /// Flash address of the store.
        address: u16,
        /// The byte that was stored.
        data: u8,
    },
}

/// Builds a simulated flash controller and interrupt controller sharing one
/// event log, so tests can check ordering across both.
pub fn pair() -> (SimFlash, SimInterrupts) {
    let events = Rc::new(RefCell::new(Vec::new()));
    (
        SimFlash {
            flash: [0xFF; FLASH_SIZE],
            write_enabled: false,
            unlock_progress: 0,
            busy: Cell::new(0),
            stuck: false,
            events: Rc::clone(&events),
        },
        SimInterrupts {
            enabled: true,
            events,
        },
    )
}

/// The simulated flash controller.
pub struct SimFlash {
    flash: [u8; FLASH_SIZE],
    write_enabled: bool,
    // How far the 0xAA/0x55 key sequence has progressed.
    unlock_progress: u8,
    // Remaining polls until the controller reports ready again.
    busy: Cell<u32>,
    stuck: bool,
    events: Rc<RefCell<Vec<Event>>>,
}

impl SimFlash {
    /// The current content of the simulated flash at `address`.
    pub fn flash_byte(&self, address: u16) -> u8 {
        self.flash[address as usize]
    }

    /// A copy of everything that happened so far, in order.
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Makes the controller never report ready again, simulating hardware
    /// that died mid-operation.
    pub fn jam(&mut self) {
        self.stuck = true;
    }

    fn log(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

impl Flash for SimFlash {
    fn write_command(&mut self, value: u8) {
        assert_eq!(
            self.busy.get(),
            0,
            "command written while the controller is busy"
        );
        self.log(Event::Command(value));

        if self.write_enabled {
            // With the latch open, the value is a page index to erase.
            let start = value as usize * PAGE_SIZE as usize;
            assert!(
                start + PAGE_SIZE as usize <= FLASH_SIZE,
                "erase of a page outside the flash"
            );
            self.flash[start..start + PAGE_SIZE as usize].fill(0xFF);
            self.log(Event::ErasePage(value));
            self.busy.set(ERASE_POLLS);
        } else {
            // With the latch closed, the value may advance the unlock key.
            self.unlock_progress = match (self.unlock_progress, value) {
                (0, 0xAA) => 1,
                (1, 0x55) => 2,
                _ => 0,
            };
        }
    }

    fn write_enabled(&self) -> bool {
        self.write_enabled
    }

    fn set_write_enable(&mut self, enable: bool) {
        if enable {
            assert_eq!(
                self.unlock_progress, 2,
                "write enable without a preceding unlock sequence"
            );
            self.write_enabled = true;
        } else {
            // Locking closes the unlock window; the key has to be fed again.
            self.write_enabled = false;
            self.unlock_progress = 0;
        }
        self.log(Event::WriteEnable(enable));
    }

    fn is_ready(&self) -> bool {
        if self.stuck {
            return false;
        }
        if self.busy.get() > 0 {
            self.busy.set(self.busy.get() - 1);
            return false;
        }
        true
    }

    fn program_byte(&mut self, address: u16, data: u8) {
        assert_eq!(
            self.busy.get(),
            0,
            "program issued while the controller is busy"
        );
        assert!(self.write_enabled, "program without write enable");
        assert!((address as usize) < FLASH_SIZE, "program outside the flash");

        // Flash programming can only clear bits; a fresh erase left them all
        // set, so on an erased page this stores `data` verbatim.
        self.flash[address as usize] &= data;
        self.log(Event::Program { address, data });
        self.busy.set(PROGRAM_POLLS);
    }
}

/// The simulated interrupt controller.
pub struct SimInterrupts {
    enabled: bool,
    events: Rc<RefCell<Vec<Event>>>,
}

impl SimInterrupts {
    /// Whether interrupts are currently unmasked.
    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

impl InterruptControl for SimInterrupts {
    fn disable(&mut self) {
        self.enabled = false;
        self.events.borrow_mut().push(Event::InterruptsMasked);
    }
}
