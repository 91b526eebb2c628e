// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains the definition of an 8080 [Insn]
//!
//! One opcode byte decodes to exactly one [Insn]; operand bytes are fetched
//! separately by the execution stage. The `match` in [Insn::decode] is
//! exhaustive over `u8`, so an unhandled opcode cannot exist at runtime —
//! the undocumented gaps in the opcode map alias their documented twins,
//! exactly like the real chip.

/// An 8-bit register selected by a 3-bit opcode field.
///
/// [Reg::M] is not storage: it names the memory byte addressed by the HL
/// pair, and every register access must special-case it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Reg {
    B,
    C,
    D,
    E,
    H,
    L,
    /// The byte at the address held in HL
    M,
    /// The accumulator
    A,
}

impl Reg {
    /// Decodes a 3-bit register field
    pub fn from_bits(bits: u8) -> Self {
        match bits & 7 {
            0 => Reg::B,
            1 => Reg::C,
            2 => Reg::D,
            3 => Reg::E,
            4 => Reg::H,
            5 => Reg::L,
            6 => Reg::M,
            _ => Reg::A,
        }
    }
}

/// A 16-bit register pair selected by a 2-bit opcode field.
///
/// The fourth slot is the stack pointer for most pair operations, but
/// `PUSH`/`POP` reuse it for the accumulator + status word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pair {
    BC,
    DE,
    HL,
    SP,
}

impl Pair {
    /// Decodes a 2-bit register-pair field
    pub fn from_bits(bits: u8) -> Self {
        match bits & 3 {
            0 => Pair::BC,
            1 => Pair::DE,
            2 => Pair::HL,
            _ => Pair::SP,
        }
    }
}

/// A branch condition selected by a 3-bit opcode field: a 2-bit flag
/// selector among {Zero, Carry, Parity, Sign} plus a direction bit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cond {
    /// Zero flag clear
    NZ,
    /// Zero flag set
    Z,
    /// Carry flag clear
    NC,
    /// Carry flag set
    C,
    /// Parity odd (flag clear)
    PO,
    /// Parity even (flag set)
    PE,
    /// Plus: sign flag clear
    P,
    /// Minus: sign flag set
    M,
}

impl Cond {
    /// Decodes a 3-bit condition field
    pub fn from_bits(bits: u8) -> Self {
        match bits & 7 {
            0 => Cond::NZ,
            1 => Cond::Z,
            2 => Cond::NC,
            3 => Cond::C,
            4 => Cond::PO,
            5 => Cond::PE,
            6 => Cond::P,
            _ => Cond::M,
        }
    }
}

/// One decoded 8080 instruction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Insn {
    /// | 00 | No operation (also 08/10/18/20/28/30/38)
    Nop,
    /// | 01+ | Load register pair with a 16-bit immediate
    Lxi(Pair),
    /// | 02/12 | Store accumulator at the address in BC or DE
    Stax(Pair),
    /// | 03+ | Increment register pair, no flags
    Inx(Pair),
    /// | 04+ | Increment register, all flags but carry
    Inr(Reg),
    /// | 05+ | Decrement register, all flags but carry
    Dcr(Reg),
    /// | 06+ | Load register with an 8-bit immediate
    Mvi(Reg),
    /// | 07 | Rotate accumulator left into carry
    Rlc,
    /// | 09+ | Add register pair to HL, carry only
    Dad(Pair),
    /// | 0a/1a | Load accumulator from the address in BC or DE
    Ldax(Pair),
    /// | 0b+ | Decrement register pair, no flags
    Dcx(Pair),
    /// | 0f | Rotate accumulator right into carry
    Rrc,
    /// | 17 | Rotate accumulator left through carry
    Ral,
    /// | 1f | Rotate accumulator right through carry
    Rar,
    /// | 22 | Store HL at a direct address
    Shld,
    /// | 27 | Decimal (BCD) adjust accumulator
    Daa,
    /// | 2a | Load HL from a direct address
    Lhld,
    /// | 2f | Complement accumulator
    Cma,
    /// | 32 | Store accumulator at a direct address
    Sta,
    /// | 37 | Set carry
    Stc,
    /// | 3a | Load accumulator from a direct address
    Lda,
    /// | 3f | Complement carry
    Cmc,
    /// | 40..7f | Move register to register
    Mov(Reg, Reg),
    /// | 76 | Halt: back the program counter onto this opcode
    Hlt,
    /// | 80+ | Add register to accumulator
    Add(Reg),
    /// | 88+ | Add register and carry to accumulator
    Adc(Reg),
    /// | 90+ | Subtract register from accumulator
    Sub(Reg),
    /// | 98+ | Subtract register and borrow from accumulator
    Sbb(Reg),
    /// | a0+ | AND register into accumulator
    Ana(Reg),
    /// | a8+ | XOR register into accumulator
    Xra(Reg),
    /// | b0+ | OR register into accumulator
    Ora(Reg),
    /// | b8+ | Compare register with accumulator, flags only
    Cmp(Reg),
    /// | c0+ | Return if the condition holds
    Rcond(Cond),
    /// | c1+ | Pop register pair (or accumulator + status word)
    Pop(Pair),
    /// | c2+ | Jump to a direct address if the condition holds
    Jcond(Cond),
    /// | c3 | Jump to a direct address (also cb)
    Jmp,
    /// | c4+ | Call a direct address if the condition holds
    Ccond(Cond),
    /// | c5+ | Push register pair (or accumulator + status word)
    Push(Pair),
    /// | c6 | Add immediate to accumulator
    Adi,
    /// | c7+ | Push the program counter and jump to a low-memory vector
    Rst(u16),
    /// | c9 | Return from subroutine (also d9)
    Ret,
    /// | cd | Call a direct address (also dd/ed/fd)
    Call,
    /// | ce | Add immediate and carry to accumulator
    Aci,
    /// | d3 | Write accumulator to an I/O port
    Out,
    /// | d6 | Subtract immediate from accumulator
    Sui,
    /// | db | Read an I/O port into the accumulator
    In,
    /// | de | Subtract immediate and borrow from accumulator
    Sbi,
    /// | e3 | Exchange HL with the top of the stack
    Xthl,
    /// | e6 | AND immediate into accumulator
    Ani,
    /// | e9 | Jump to the address in HL
    Pchl,
    /// | eb | Exchange DE and HL
    Xchg,
    /// | ee | XOR immediate into accumulator
    Xri,
    /// | f3 | Disable interrupts
    Di,
    /// | f6 | OR immediate into accumulator
    Ori,
    /// | f9 | Load the stack pointer from HL
    Sphl,
    /// | fb | Enable interrupts
    Ei,
    /// | fe | Compare immediate with accumulator, flags only
    Cpi,
}

impl Insn {
    /// Decodes one opcode byte.
    ///
    /// Total over the whole opcode space: the compiler checks that every
    /// byte value is covered, and the decode test in `cpu/tests.rs`
    /// exercises all 256.
    pub fn decode(opcode: u8) -> Self {
        match opcode {
            0x00 | 0x08 | 0x10 | 0x18 | 0x20 | 0x28 | 0x30 | 0x38 => Insn::Nop,
            0x01 | 0x11 | 0x21 | 0x31 => Insn::Lxi(Pair::from_bits(opcode >> 4)),
            0x02 | 0x12 => Insn::Stax(Pair::from_bits(opcode >> 4)),
            0x03 | 0x13 | 0x23 | 0x33 => Insn::Inx(Pair::from_bits(opcode >> 4)),
            0x04 | 0x0c | 0x14 | 0x1c | 0x24 | 0x2c | 0x34 | 0x3c => {
                Insn::Inr(Reg::from_bits(opcode >> 3))
            }
            0x05 | 0x0d | 0x15 | 0x1d | 0x25 | 0x2d | 0x35 | 0x3d => {
                Insn::Dcr(Reg::from_bits(opcode >> 3))
            }
            0x06 | 0x0e | 0x16 | 0x1e | 0x26 | 0x2e | 0x36 | 0x3e => {
                Insn::Mvi(Reg::from_bits(opcode >> 3))
            }
            0x07 => Insn::Rlc,
            0x09 | 0x19 | 0x29 | 0x39 => Insn::Dad(Pair::from_bits(opcode >> 4)),
            0x0a | 0x1a => Insn::Ldax(Pair::from_bits(opcode >> 4)),
            0x0b | 0x1b | 0x2b | 0x3b => Insn::Dcx(Pair::from_bits(opcode >> 4)),
            0x0f => Insn::Rrc,
            0x17 => Insn::Ral,
            0x1f => Insn::Rar,
            0x22 => Insn::Shld,
            0x27 => Insn::Daa,
            0x2a => Insn::Lhld,
            0x2f => Insn::Cma,
            0x32 => Insn::Sta,
            0x37 => Insn::Stc,
            0x3a => Insn::Lda,
            0x3f => Insn::Cmc,
            0x76 => Insn::Hlt,
            0x40..=0x7f => Insn::Mov(Reg::from_bits(opcode >> 3), Reg::from_bits(opcode)),
            0x80..=0x87 => Insn::Add(Reg::from_bits(opcode)),
            0x88..=0x8f => Insn::Adc(Reg::from_bits(opcode)),
            0x90..=0x97 => Insn::Sub(Reg::from_bits(opcode)),
            0x98..=0x9f => Insn::Sbb(Reg::from_bits(opcode)),
            0xa0..=0xa7 => Insn::Ana(Reg::from_bits(opcode)),
            0xa8..=0xaf => Insn::Xra(Reg::from_bits(opcode)),
            0xb0..=0xb7 => Insn::Ora(Reg::from_bits(opcode)),
            0xb8..=0xbf => Insn::Cmp(Reg::from_bits(opcode)),
            0xc0 | 0xc8 | 0xd0 | 0xd8 | 0xe0 | 0xe8 | 0xf0 | 0xf8 => {
                Insn::Rcond(Cond::from_bits(opcode >> 3))
            }
            0xc1 | 0xd1 | 0xe1 | 0xf1 => Insn::Pop(Pair::from_bits(opcode >> 4)),
            0xc2 | 0xca | 0xd2 | 0xda | 0xe2 | 0xea | 0xf2 | 0xfa => {
                Insn::Jcond(Cond::from_bits(opcode >> 3))
            }
            0xc3 | 0xcb => Insn::Jmp,
            0xc4 | 0xcc | 0xd4 | 0xdc | 0xe4 | 0xec | 0xf4 | 0xfc => {
                Insn::Ccond(Cond::from_bits(opcode >> 3))
            }
            0xc5 | 0xd5 | 0xe5 | 0xf5 => Insn::Push(Pair::from_bits(opcode >> 4)),
            0xc6 => Insn::Adi,
            0xc7 | 0xcf | 0xd7 | 0xdf | 0xe7 | 0xef | 0xf7 | 0xff => {
                Insn::Rst((opcode & 0x38) as u16)
            }
            0xc9 | 0xd9 => Insn::Ret,
            0xcd | 0xdd | 0xed | 0xfd => Insn::Call,
            0xce => Insn::Aci,
            0xd3 => Insn::Out,
            0xd6 => Insn::Sui,
            0xdb => Insn::In,
            0xde => Insn::Sbi,
            0xe3 => Insn::Xthl,
            0xe6 => Insn::Ani,
            0xe9 => Insn::Pchl,
            0xeb => Insn::Xchg,
            0xee => Insn::Xri,
            0xf3 => Insn::Di,
            0xf6 => Insn::Ori,
            0xf9 => Insn::Sphl,
            0xfb => Insn::Ei,
            0xfe => Insn::Cpi,
        }
    }
}
