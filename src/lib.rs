// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE.txt for details)

//! This crate implements the Intel 8080 (KR580VM80A) microprocessor at the
//! instruction level: registers, flags and T-state timing are bit-exact with
//! the real silicon, which is enough to run the classic CP/M-era exerciser
//! binaries and compare their output against hardware.
//!
//! The core is deliberately small: a [cpu::CPU] bound to a [mem::Memory] and
//! an [io::IoBus]. Anything else (program loading conventions, BDOS call
//! shims, disassembly, display) belongs to the caller, which drives the
//! processor one [cpu::CPU::step] at a time and is free to inspect memory
//! and registers between steps.

pub mod cpu;
pub mod error;
pub mod io;
pub mod mem;

use crate::{cpu::CPU, error::Result, io::IoBus, mem::Memory};

/// Pairs a [CPU] with the memory and I/O bus it is bound to.
///
/// # Examples
/// ```rust
/// # use ottanta::prelude::*;
/// # fn main() -> Result<()> {
/// let mut sys = System::<Ram, NullIo>::default();
/// sys.load(&[0x3e, 0x42], 0x0100); // MVI A, 0x42
/// sys.cpu.set_pc(0x0100);
/// assert_eq!(7, sys.step()?);
/// assert_eq!(0x42, sys.cpu.a());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct System<M = mem::Ram, I = io::NullIo> {
    pub cpu: CPU,
    pub mem: M,
    pub io: I,
}

impl<M: Memory, I: IoBus> System<M, I> {
    /// Constructs a system around a chosen memory and I/O bus
    pub fn new(mem: M, io: I) -> Self {
        System { cpu: CPU::default(), mem, io }
    }

    /// Places a binary image in memory, starting at `addr`
    pub fn load(&mut self, image: &[u8], addr: u16) {
        self.mem.load(image, addr);
    }

    /// Runs one instruction (or services a pending interrupt),
    /// returning the elapsed T-states
    pub fn step(&mut self) -> Result<usize> {
        self.cpu.step(&mut self.mem, &mut self.io)
    }

    /// Latches `opcode` for execution on the next [System::step],
    /// if interrupts are enabled
    pub fn request_interrupt(&mut self, opcode: u8) -> bool {
        self.cpu.request_interrupt(opcode)
    }
}

/// Common imports for ottanta
pub mod prelude {
    pub use super::System;
    pub use crate::cpu::{
        flags::Flags,
        insn::{Cond, Insn, Pair, Reg},
        CPU,
    };
    pub use crate::error::{Error, Result};
    pub use crate::io::{IoBus, NullIo};
    pub use crate::mem::{Access, Memory, Protected, Ram, Range, Watched};
}
