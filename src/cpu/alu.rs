// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Flag-accurate 8-bit arithmetic on the accumulator
//!
//! Every operation lands its result in the accumulator (except
//! [CPU::compare], which restores it) and rewrites the five flags the
//! way the silicon does. Auxiliary carry comes from a lookup over bit 3
//! of the two operands and the result, parity from a 256-entry table.

use super::CPU;

/// Half-carry out of bit 3, indexed by `[acc.3, operand.3, result.3]`
const HALF_CARRY: [bool; 8] = [false, false, true, false, true, false, true, true];

/// Half-borrow out of bit 3 for subtraction, same index
const SUB_HALF_CARRY: [bool; 8] = [false, true, true, true, false, false, false, true];

/// Parity of every byte value: `true` when the number of set bits is even
const PARITY: [bool; 256] = {
    let mut table = [false; 256];
    let mut value = 0;
    while value < 256 {
        table[value] = (value as u8).count_ones() % 2 == 0;
        value += 1;
    }
    table
};

impl CPU {
    /// Indexes the half-carry tables with bit 3 and bit 7 of the operands
    /// and result (bit 7 falls out of the `& 7` mask on lookup)
    fn half_carry_index(acc: u8, value: u8, result: u16) -> usize {
        let index =
            ((acc as u16 & 0x88) >> 1) | ((value as u16 & 0x88) >> 2) | ((result & 0x88) >> 3);
        (index & 7) as usize
    }

    /// Sets sign, zero, and parity from a result byte
    pub(super) fn set_szp(&mut self, result: u8) {
        self.flags.sign = result & 0x80 != 0;
        self.flags.zero = result == 0;
        self.flags.parity = PARITY[result as usize];
    }

    /// Adds `value` (plus `carry`) into the accumulator, setting all flags
    pub(super) fn add(&mut self, value: u8, carry: bool) {
        let acc = self.a();
        let wide = acc as u16 + value as u16 + carry as u16;
        let result = wide as u8;
        self.set_a(result);
        self.set_szp(result);
        self.flags.aux_carry = HALF_CARRY[Self::half_carry_index(acc, value, wide)];
        self.flags.carry = wide & 0x100 != 0;
    }

    /// Subtracts `value` (plus `borrow`) from the accumulator, setting all flags
    pub(super) fn subtract(&mut self, value: u8, borrow: bool) {
        let acc = self.a();
        let wide = (acc as u16)
            .wrapping_sub(value as u16)
            .wrapping_sub(borrow as u16);
        let result = wide as u8;
        self.set_a(result);
        self.set_szp(result);
        self.flags.aux_carry = !SUB_HALF_CARRY[Self::half_carry_index(acc, value, wide)];
        self.flags.carry = wide & 0x100 != 0;
    }

    /// Subtracts `value` for its flags only, keeping the accumulator
    pub(super) fn compare(&mut self, value: u8) {
        let acc = self.a();
        self.subtract(value, false);
        self.set_a(acc);
    }

    /// ANDs `value` into the accumulator. Carry clears; auxiliary carry
    /// takes the OR of bit 3 of the operands, an 8080 oddity
    pub(super) fn and(&mut self, value: u8) {
        let acc = self.a();
        self.flags.aux_carry = (acc | value) & 0x08 != 0;
        let result = acc & value;
        self.set_a(result);
        self.set_szp(result);
        self.flags.carry = false;
    }

    /// XORs `value` into the accumulator, clearing both carries
    pub(super) fn xor(&mut self, value: u8) {
        let result = self.a() ^ value;
        self.set_a(result);
        self.set_szp(result);
        self.flags.aux_carry = false;
        self.flags.carry = false;
    }

    /// ORs `value` into the accumulator, clearing both carries
    pub(super) fn or(&mut self, value: u8) {
        let result = self.a() | value;
        self.set_a(result);
        self.set_szp(result);
        self.flags.aux_carry = false;
        self.flags.carry = false;
    }

    /// Decimal-adjusts the accumulator so each nibble reads as a BCD
    /// digit after a binary add. The correction is itself an add, so the
    /// other flags come out of [CPU::add]; carry is forced on when the
    /// high nibble needed fixing and never cleared otherwise.
    pub(super) fn daa(&mut self) {
        let acc = self.a();
        let mut fix = 0;
        if self.flags.aux_carry || acc & 0x0f > 9 {
            fix = 0x06;
        }
        let carry =
            self.flags.carry || acc >> 4 > 9 || (acc >> 4 >= 9 && acc & 0x0f > 9);
        if carry {
            fix |= 0x60;
        }
        self.add(fix, false);
        self.flags.carry = carry;
    }
}
