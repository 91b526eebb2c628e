// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


pub mod flags;
pub mod insn;

mod alu;
mod behavior;

use self::{
    flags::Flags,
    insn::{Insn, Pair, Reg},
};
use crate::{error::Result, io::IoBus, mem::Memory};
use owo_colors::OwoColorize;

/// Represents the internal state of the 8080 interpreter.
///
/// The CPU owns its register file, flags and interrupt latch, and borrows
/// a [Memory] and an [IoBus] for the duration of each [CPU::step]. Run a
/// program by loading it into memory, pointing the program counter at it,
/// and calling step until the caller decides to stop (the core itself
/// never loops).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CPU {
    /// The five status flags
    pub flags: Flags,
    /// Print a fetch trace to stdout on every step
    pub trace: bool,
    // register file: B C D E H L _ A (slot 6 backs nothing, see [Reg::M])
    regs: [u8; 8],
    pc: u16,
    sp: u16,
    // interrupt latch
    int_enable: bool,
    int_latch: Option<u8>,
    // executed instruction count
    cycle: usize,
}

// public interface
impl CPU {
    /// Constructs a new CPU with all state zeroed and interrupts disabled
    pub fn new() -> Self {
        CPU::default()
    }

    /// Gets an 8-bit register. [Reg::M] reads the memory byte addressed
    /// by HL instead of local storage.
    /// # Examples
    /// ```rust
    /// # use ottanta::prelude::*;
    /// # fn main() -> Result<()> {
    /// let (mut cpu, mut ram) = (CPU::default(), Ram::default());
    /// cpu.set_pair(Pair::HL, 0x1234);
    /// ram.write(0x1234, 0xc5)?;
    /// assert_eq!(0xc5, cpu.register(&mut ram, Reg::M)?);
    /// # Ok(())
    /// # }
    /// ```
    pub fn register(&self, mem: &mut impl Memory, reg: Reg) -> Result<u8> {
        match reg {
            Reg::M => mem.read(self.pair(Pair::HL)),
            reg => Ok(self.regs[reg as usize]),
        }
    }

    /// Sets an 8-bit register. [Reg::M] writes the memory byte addressed
    /// by HL instead of local storage.
    pub fn set_register(&mut self, mem: &mut impl Memory, reg: Reg, value: u8) -> Result<()> {
        match reg {
            Reg::M => mem.write(self.pair(Pair::HL), value),
            reg => {
                self.regs[reg as usize] = value;
                Ok(())
            }
        }
    }

    /// Gets a 16-bit register pair, high byte first ([Pair::SP] is the
    /// stack pointer itself)
    /// # Examples
    /// ```rust
    /// # use ottanta::prelude::*;
    /// let mut cpu = CPU::default();
    /// cpu.set_pair(Pair::BC, 0xc55a);
    /// assert_eq!(0xc5, cpu.b());
    /// assert_eq!(0x5a, cpu.c());
    /// ```
    pub fn pair(&self, pair: Pair) -> u16 {
        let slot = match pair {
            Pair::BC => 0,
            Pair::DE => 2,
            Pair::HL => 4,
            Pair::SP => return self.sp,
        };
        u16::from_be_bytes([self.regs[slot], self.regs[slot + 1]])
    }

    /// Sets a 16-bit register pair from two 8-bit halves, high byte first
    pub fn set_pair(&mut self, pair: Pair, value: u16) {
        let slot = match pair {
            Pair::BC => 0,
            Pair::DE => 2,
            Pair::HL => 4,
            Pair::SP => return self.sp = value,
        };
        let [hi, lo] = value.to_be_bytes();
        self.regs[slot] = hi;
        self.regs[slot + 1] = lo;
    }

    /// Gets the accumulator
    pub fn a(&self) -> u8 {
        self.regs[Reg::A as usize]
    }

    /// Sets the accumulator
    pub fn set_a(&mut self, value: u8) {
        self.regs[Reg::A as usize] = value;
    }

    /// Gets register B
    pub fn b(&self) -> u8 {
        self.regs[Reg::B as usize]
    }

    /// Gets register C
    pub fn c(&self) -> u8 {
        self.regs[Reg::C as usize]
    }

    /// Gets register D
    pub fn d(&self) -> u8 {
        self.regs[Reg::D as usize]
    }

    /// Gets register E
    pub fn e(&self) -> u8 {
        self.regs[Reg::E as usize]
    }

    /// Gets register H
    pub fn h(&self) -> u8 {
        self.regs[Reg::H as usize]
    }

    /// Gets register L
    pub fn l(&self) -> u8 {
        self.regs[Reg::L as usize]
    }

    /// Gets the program counter
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Sets the program counter (the entry point, before the first step)
    pub fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    /// Gets the stack pointer
    pub fn sp(&self) -> u16 {
        self.sp
    }

    /// Sets the stack pointer (the stack top, before the first step)
    pub fn set_sp(&mut self, sp: u16) {
        self.sp = sp;
    }

    /// Gets the number of instructions the CPU has executed
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Reports whether the processor currently accepts interrupt requests
    pub fn interrupts_enabled(&self) -> bool {
        self.int_enable
    }

    /// Latches `opcode` for execution on the next [CPU::step].
    ///
    /// Accepted only while interrupts are enabled; reports whether an
    /// interrupt is pending after the attempt.
    /// # Examples
    /// ```rust
    /// # use ottanta::prelude::*;
    /// let mut cpu = CPU::default();
    /// // interrupts start disabled, so the request is refused
    /// assert!(!cpu.request_interrupt(0xcf)); // RST 1
    /// ```
    pub fn request_interrupt(&mut self, opcode: u8) -> bool {
        if self.int_enable {
            self.int_latch = Some(opcode);
        }
        self.int_latch.is_some()
    }

    /// Executes the byte at the program counter, or services a pending
    /// interrupt, returning the elapsed T-states.
    ///
    /// A latched interrupt is consumed before any fetch and costs exactly
    /// what its opcode costs. The only errors are access violations from a
    /// permission-checked memory.
    /// # Examples
    /// ```rust
    /// # use ottanta::prelude::*;
    /// # fn main() -> Result<()> {
    /// let (mut cpu, mut ram, mut io) = (CPU::default(), Ram::default(), NullIo);
    /// ram.load(&[0x3e, 0x42, 0x47], 0x0100); // MVI A, 0x42; MOV B, A
    /// cpu.set_pc(0x0100);
    /// assert_eq!(7, cpu.step(&mut ram, &mut io)?);
    /// assert_eq!(5, cpu.step(&mut ram, &mut io)?);
    /// assert_eq!(0x42, cpu.b());
    /// assert_eq!(0x0103, cpu.pc());
    /// # Ok(())
    /// # }
    /// ```
    pub fn step(&mut self, mem: &mut impl Memory, io: &mut impl IoBus) -> Result<usize> {
        let pc = self.pc;
        let opcode = match self.int_latch.take() {
            Some(opcode) => opcode,
            None => self.fetch(mem)?,
        };
        self.cycle += 1;

        if self.trace {
            println!("{:6} {pc:04x}: {opcode:02x}", self.cycle.bright_black());
        }

        self.execute(mem, io, Insn::decode(opcode))
    }

    /// Resets registers, flags, program counter, stack pointer, interrupt
    /// latch and cycle count. Does not touch memory or the trace flag.
    pub fn reset(&mut self) {
        self.flags = Flags::default();
        self.regs = [0; 8];
        self.pc = 0;
        self.sp = 0;
        self.int_enable = false;
        self.int_latch = None;
        self.cycle = 0;
    }
}

// fetch and stack plumbing
impl CPU {
    /// Reads the byte at the program counter, then advances it
    fn fetch(&mut self, mem: &mut impl Memory) -> Result<u8> {
        let value = mem.read(self.pc)?;
        self.pc = self.pc.wrapping_add(1);
        Ok(value)
    }

    /// Reads a little-endian operand word at the program counter
    fn fetch_word(&mut self, mem: &mut impl Memory) -> Result<u16> {
        Ok(u16::from_le_bytes([self.fetch(mem)?, self.fetch(mem)?]))
    }

    /// Reads a little-endian word at `addr`
    fn read_word(&self, mem: &mut impl Memory, addr: u16) -> Result<u16> {
        Ok(u16::from_le_bytes([
            mem.read(addr)?,
            mem.read(addr.wrapping_add(1))?,
        ]))
    }

    /// Writes a little-endian word at `addr`
    fn write_word(&self, mem: &mut impl Memory, addr: u16, value: u16) -> Result<()> {
        let [lo, hi] = value.to_le_bytes();
        mem.write(addr, lo)?;
        mem.write(addr.wrapping_add(1), hi)
    }

    /// Pushes a word onto the stack, growing downward
    fn stack_push(&mut self, mem: &mut impl Memory, value: u16) -> Result<()> {
        self.sp = self.sp.wrapping_sub(2);
        self.write_word(mem, self.sp, value)
    }

    /// Pops a word off the stack
    fn stack_pop(&mut self, mem: &mut impl Memory) -> Result<u16> {
        let top = self.read_word(mem, self.sp)?;
        self.sp = self.sp.wrapping_add(2);
        Ok(top)
    }
}
