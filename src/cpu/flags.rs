// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The five 8080 status flags and their packed status-word form

use super::insn::Cond;

/// Carry flag bit position in the status word
pub const CARRY: u8 = 0x01;
/// Always reads as 1 in the status word
pub const FIXED_ONE: u8 = 0x02;
/// Parity flag bit position in the status word
pub const PARITY: u8 = 0x04;
/// Auxiliary-carry flag bit position in the status word
pub const AUX_CARRY: u8 = 0x10;
/// Zero flag bit position in the status word
pub const ZERO: u8 = 0x40;
/// Sign flag bit position in the status word
pub const SIGN: u8 = 0x80;

/// The processor status flags.
///
/// Pushed and popped alongside the accumulator as the program status word,
/// whose exact bit layout (bit 1 always set, bits 3 and 5 always clear) is
/// observable program state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flags {
    /// Bit 7 of the last result
    pub sign: bool,
    /// Last result was zero
    pub zero: bool,
    /// Carry or borrow out of bit 3, used by decimal adjustment
    pub aux_carry: bool,
    /// Last result had an even number of set bits
    pub parity: bool,
    /// Carry or borrow out of bit 7
    pub carry: bool,
}

impl Flags {
    /// Packs the flags into the status word
    /// # Examples
    /// ```rust
    /// # use ottanta::prelude::*;
    /// // the two fixed bits show through even with all flags clear
    /// assert_eq!(0x02, Flags::default().psw());
    /// ```
    pub fn psw(&self) -> u8 {
        let mut word = FIXED_ONE;
        if self.sign {
            word |= SIGN;
        }
        if self.zero {
            word |= ZERO;
        }
        if self.aux_carry {
            word |= AUX_CARRY;
        }
        if self.parity {
            word |= PARITY;
        }
        if self.carry {
            word |= CARRY;
        }
        word
    }

    /// Unpacks a status word into the flags, ignoring the fixed bits
    pub fn set_psw(&mut self, word: u8) {
        self.sign = word & SIGN != 0;
        self.zero = word & ZERO != 0;
        self.aux_carry = word & AUX_CARRY != 0;
        self.parity = word & PARITY != 0;
        self.carry = word & CARRY != 0;
    }

    /// Tests a branch condition: a 2-bit selector picks the flag, the
    /// direction bit picks the required state
    pub fn satisfies(&self, cond: Cond) -> bool {
        let (flag, expected) = match cond {
            Cond::NZ => (self.zero, false),
            Cond::Z => (self.zero, true),
            Cond::NC => (self.carry, false),
            Cond::C => (self.carry, true),
            Cond::PO => (self.parity, false),
            Cond::PE => (self.parity, true),
            Cond::P => (self.sign, false),
            Cond::M => (self.sign, true),
        };
        flag == expected
    }
}
