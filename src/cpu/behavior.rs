// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Implements the behavior of the 8080's instructions
//!
//! Each operation returns the T-states the real chip spends on it, with
//! memory-operand forms costing more than their register forms.

use super::{
    insn::{Cond, Insn, Pair, Reg},
    CPU,
};
use crate::{error::Result, io::IoBus, mem::Memory};

impl CPU {
    /// Executes a single decoded [Insn], returning the elapsed T-states
    #[rustfmt::skip]
    pub(super) fn execute(
        &mut self,
        mem: &mut impl Memory,
        io: &mut impl IoBus,
        insn: Insn,
    ) -> Result<usize> {
        match insn {
            Insn::Nop             => Ok(4),
            Insn::Lxi(pair)       => self.load_pair_immediate(mem, pair),
            Insn::Stax(pair)      => self.store_indirect(mem, pair),
            Insn::Inx(pair)       => self.increment_pair(pair),
            Insn::Inr(reg)        => self.increment(mem, reg),
            Insn::Dcr(reg)        => self.decrement(mem, reg),
            Insn::Mvi(reg)        => self.load_immediate(mem, reg),
            Insn::Rlc             => self.rotate_left(),
            Insn::Dad(pair)       => self.add_pair(pair),
            Insn::Ldax(pair)      => self.load_indirect(mem, pair),
            Insn::Dcx(pair)       => self.decrement_pair(pair),
            Insn::Rrc             => self.rotate_right(),
            Insn::Ral             => self.rotate_left_carry(),
            Insn::Rar             => self.rotate_right_carry(),
            Insn::Shld            => self.store_hl(mem),
            Insn::Daa             => { self.daa(); Ok(4) }
            Insn::Lhld            => self.load_hl(mem),
            Insn::Cma             => self.complement_accumulator(),
            Insn::Sta             => self.store_direct(mem),
            Insn::Stc             => self.set_carry(),
            Insn::Lda             => self.load_direct(mem),
            Insn::Cmc             => self.complement_carry(),
            Insn::Mov(dst, src)   => self.transfer(mem, dst, src),
            Insn::Hlt             => self.halt(),
            Insn::Add(reg)        => { let (value, time) = self.operand(mem, reg)?; self.add(value, false); Ok(time) }
            Insn::Adc(reg)        => { let (value, time) = self.operand(mem, reg)?; let carry = self.flags.carry; self.add(value, carry); Ok(time) }
            Insn::Sub(reg)        => { let (value, time) = self.operand(mem, reg)?; self.subtract(value, false); Ok(time) }
            Insn::Sbb(reg)        => { let (value, time) = self.operand(mem, reg)?; let carry = self.flags.carry; self.subtract(value, carry); Ok(time) }
            Insn::Ana(reg)        => { let (value, time) = self.operand(mem, reg)?; self.and(value); Ok(time) }
            Insn::Xra(reg)        => { let (value, time) = self.operand(mem, reg)?; self.xor(value); Ok(time) }
            Insn::Ora(reg)        => { let (value, time) = self.operand(mem, reg)?; self.or(value); Ok(time) }
            Insn::Cmp(reg)        => { let (value, time) = self.operand(mem, reg)?; self.compare(value); Ok(time) }
            Insn::Rcond(cond)     => self.ret_if(mem, cond),
            Insn::Pop(pair)       => self.pop_pair(mem, pair),
            Insn::Jcond(cond)     => self.jump_if(mem, cond),
            Insn::Jmp             => self.jump(mem),
            Insn::Ccond(cond)     => self.call_if(mem, cond),
            Insn::Push(pair)      => self.push_pair(mem, pair),
            Insn::Adi             => { let value = self.fetch(mem)?; self.add(value, false); Ok(7) }
            Insn::Rst(vector)     => self.restart(mem, vector),
            Insn::Ret             => self.ret(mem),
            Insn::Call            => self.call(mem),
            Insn::Aci             => { let value = self.fetch(mem)?; let carry = self.flags.carry; self.add(value, carry); Ok(7) }
            Insn::Out             => self.port_out(mem, io),
            Insn::Sui             => { let value = self.fetch(mem)?; self.subtract(value, false); Ok(7) }
            Insn::In              => self.port_in(mem, io),
            Insn::Sbi             => { let value = self.fetch(mem)?; let carry = self.flags.carry; self.subtract(value, carry); Ok(7) }
            Insn::Xthl            => self.exchange_stack_top(mem),
            Insn::Ani             => { let value = self.fetch(mem)?; self.and(value); Ok(7) }
            Insn::Pchl            => self.jump_hl(),
            Insn::Xchg            => self.exchange_pairs(),
            Insn::Xri             => { let value = self.fetch(mem)?; self.xor(value); Ok(7) }
            Insn::Di              => self.set_interrupt_enable(io, false),
            Insn::Ori             => { let value = self.fetch(mem)?; self.or(value); Ok(7) }
            Insn::Sphl            => self.load_sp_hl(),
            Insn::Ei              => self.set_interrupt_enable(io, true),
            Insn::Cpi             => { let value = self.fetch(mem)?; self.compare(value); Ok(7) }
        }
    }

    /// Reads an arithmetic operand and its cost, 7 T-states for [Reg::M]
    /// and 4 for everything else
    fn operand(&self, mem: &mut impl Memory, reg: Reg) -> Result<(u8, usize)> {
        Ok((
            self.register(mem, reg)?,
            if reg == Reg::M { 7 } else { 4 },
        ))
    }
}

/// |00xx| Data transfer, 16-bit loads, and accumulator housekeeping
impl CPU {
    /// |01+| `LXI`: Loads a register pair with a 16-bit immediate
    pub(super) fn load_pair_immediate(
        &mut self,
        mem: &mut impl Memory,
        pair: Pair,
    ) -> Result<usize> {
        let value = self.fetch_word(mem)?;
        self.set_pair(pair, value);
        Ok(10)
    }

    /// |02/12| `STAX`: Stores the accumulator at the address in BC or DE
    pub(super) fn store_indirect(&mut self, mem: &mut impl Memory, pair: Pair) -> Result<usize> {
        mem.write(self.pair(pair), self.a())?;
        Ok(7)
    }

    /// |0a/1a| `LDAX`: Loads the accumulator from the address in BC or DE
    pub(super) fn load_indirect(&mut self, mem: &mut impl Memory, pair: Pair) -> Result<usize> {
        let value = mem.read(self.pair(pair))?;
        self.set_a(value);
        Ok(7)
    }

    /// |03+| `INX`: Increments a register pair without touching the flags
    pub(super) fn increment_pair(&mut self, pair: Pair) -> Result<usize> {
        self.set_pair(pair, self.pair(pair).wrapping_add(1));
        Ok(5)
    }

    /// |0b+| `DCX`: Decrements a register pair without touching the flags
    pub(super) fn decrement_pair(&mut self, pair: Pair) -> Result<usize> {
        self.set_pair(pair, self.pair(pair).wrapping_sub(1));
        Ok(5)
    }

    /// |04+| `INR`: Increments a register. Carry survives; auxiliary carry
    /// reports the wrap out of the low nibble
    pub(super) fn increment(&mut self, mem: &mut impl Memory, reg: Reg) -> Result<usize> {
        let value = self.register(mem, reg)?.wrapping_add(1);
        self.set_register(mem, reg, value)?;
        self.set_szp(value);
        self.flags.aux_carry = value & 0x0f == 0;
        Ok(if reg == Reg::M { 10 } else { 5 })
    }

    /// |05+| `DCR`: Decrements a register. Carry survives; auxiliary carry
    /// clears only when the low nibble borrowed
    pub(super) fn decrement(&mut self, mem: &mut impl Memory, reg: Reg) -> Result<usize> {
        let value = self.register(mem, reg)?.wrapping_sub(1);
        self.set_register(mem, reg, value)?;
        self.set_szp(value);
        self.flags.aux_carry = value & 0x0f != 0x0f;
        Ok(if reg == Reg::M { 10 } else { 5 })
    }

    /// |06+| `MVI`: Loads a register with an 8-bit immediate
    pub(super) fn load_immediate(&mut self, mem: &mut impl Memory, reg: Reg) -> Result<usize> {
        let value = self.fetch(mem)?;
        self.set_register(mem, reg, value)?;
        Ok(if reg == Reg::M { 10 } else { 7 })
    }

    /// |09+| `DAD`: Adds a register pair into HL, setting only carry
    pub(super) fn add_pair(&mut self, pair: Pair) -> Result<usize> {
        let sum = self.pair(Pair::HL) as u32 + self.pair(pair) as u32;
        self.flags.carry = sum & 0x1_0000 != 0;
        self.set_pair(Pair::HL, sum as u16);
        Ok(10)
    }

    /// |22| `SHLD`: Stores HL at a direct address
    pub(super) fn store_hl(&mut self, mem: &mut impl Memory) -> Result<usize> {
        let addr = self.fetch_word(mem)?;
        self.write_word(mem, addr, self.pair(Pair::HL))?;
        Ok(16)
    }

    /// |2a| `LHLD`: Loads HL from a direct address
    pub(super) fn load_hl(&mut self, mem: &mut impl Memory) -> Result<usize> {
        let addr = self.fetch_word(mem)?;
        let value = self.read_word(mem, addr)?;
        self.set_pair(Pair::HL, value);
        Ok(16)
    }

    /// |32| `STA`: Stores the accumulator at a direct address
    pub(super) fn store_direct(&mut self, mem: &mut impl Memory) -> Result<usize> {
        let addr = self.fetch_word(mem)?;
        mem.write(addr, self.a())?;
        Ok(13)
    }

    /// |3a| `LDA`: Loads the accumulator from a direct address
    pub(super) fn load_direct(&mut self, mem: &mut impl Memory) -> Result<usize> {
        let addr = self.fetch_word(mem)?;
        let value = mem.read(addr)?;
        self.set_a(value);
        Ok(13)
    }

    /// |40..7f| `MOV`: Copies one register to another. Costs 7 T-states
    /// when either side goes through memory, else 5
    pub(super) fn transfer(&mut self, mem: &mut impl Memory, dst: Reg, src: Reg) -> Result<usize> {
        let value = self.register(mem, src)?;
        self.set_register(mem, dst, value)?;
        Ok(if dst == Reg::M || src == Reg::M { 7 } else { 5 })
    }

    /// |76| `HLT`: Backs the program counter onto this opcode, so stepping
    /// a halted CPU re-executes the halt forever
    pub(super) fn halt(&mut self) -> Result<usize> {
        self.pc = self.pc.wrapping_sub(1);
        Ok(4)
    }
}

/// |000x| Rotates and carry-flag manipulation
impl CPU {
    /// |07| `RLC`: Rotates the accumulator left; bit 7 lands in carry and bit 0
    pub(super) fn rotate_left(&mut self) -> Result<usize> {
        let acc = self.a();
        self.flags.carry = acc & 0x80 != 0;
        self.set_a(acc << 1 | acc >> 7);
        Ok(4)
    }

    /// |0f| `RRC`: Rotates the accumulator right; bit 0 lands in carry and bit 7
    pub(super) fn rotate_right(&mut self) -> Result<usize> {
        let acc = self.a();
        self.flags.carry = acc & 0x01 != 0;
        self.set_a(acc >> 1 | acc << 7);
        Ok(4)
    }

    /// |17| `RAL`: Rotates the accumulator left through carry
    pub(super) fn rotate_left_carry(&mut self) -> Result<usize> {
        let acc = self.a();
        let carry = self.flags.carry as u8;
        self.flags.carry = acc & 0x80 != 0;
        self.set_a(acc << 1 | carry);
        Ok(4)
    }

    /// |1f| `RAR`: Rotates the accumulator right through carry
    pub(super) fn rotate_right_carry(&mut self) -> Result<usize> {
        let acc = self.a();
        let carry = self.flags.carry as u8;
        self.flags.carry = acc & 0x01 != 0;
        self.set_a(acc >> 1 | carry << 7);
        Ok(4)
    }

    /// |2f| `CMA`: Complements the accumulator, no flags
    pub(super) fn complement_accumulator(&mut self) -> Result<usize> {
        self.set_a(!self.a());
        Ok(4)
    }

    /// |37| `STC`: Sets carry
    pub(super) fn set_carry(&mut self) -> Result<usize> {
        self.flags.carry = true;
        Ok(4)
    }

    /// |3f| `CMC`: Complements carry
    pub(super) fn complement_carry(&mut self) -> Result<usize> {
        self.flags.carry = !self.flags.carry;
        Ok(4)
    }
}

/// |11xx| Control flow, the stack, and the outside world
impl CPU {
    /// |c3| `JMP`: Jumps to a direct address
    pub(super) fn jump(&mut self, mem: &mut impl Memory) -> Result<usize> {
        self.pc = self.fetch_word(mem)?;
        Ok(10)
    }

    /// |c2+| `Jcond`: Jumps to a direct address if the condition holds.
    /// The operand is fetched either way, and so is the 10 T-state cost
    pub(super) fn jump_if(&mut self, mem: &mut impl Memory, cond: Cond) -> Result<usize> {
        let addr = self.fetch_word(mem)?;
        if self.flags.satisfies(cond) {
            self.pc = addr;
        }
        Ok(10)
    }

    /// |cd| `CALL`: Pushes the return address and jumps to a direct address
    pub(super) fn call(&mut self, mem: &mut impl Memory) -> Result<usize> {
        let addr = self.fetch_word(mem)?;
        self.stack_push(mem, self.pc)?;
        self.pc = addr;
        Ok(17)
    }

    /// |c4+| `Ccond`: Calls a direct address if the condition holds.
    /// 17 T-states taken, 11 fallen through
    pub(super) fn call_if(&mut self, mem: &mut impl Memory, cond: Cond) -> Result<usize> {
        let addr = self.fetch_word(mem)?;
        if !self.flags.satisfies(cond) {
            return Ok(11);
        }
        self.stack_push(mem, self.pc)?;
        self.pc = addr;
        Ok(17)
    }

    /// |c9| `RET`: Pops the program counter off the stack
    pub(super) fn ret(&mut self, mem: &mut impl Memory) -> Result<usize> {
        self.pc = self.stack_pop(mem)?;
        Ok(10)
    }

    /// |c0+| `Rcond`: Returns if the condition holds. 11 T-states taken,
    /// 5 fallen through
    pub(super) fn ret_if(&mut self, mem: &mut impl Memory, cond: Cond) -> Result<usize> {
        if !self.flags.satisfies(cond) {
            return Ok(5);
        }
        self.pc = self.stack_pop(mem)?;
        Ok(11)
    }

    /// |c7+| `RST`: Pushes the program counter and jumps to one of the
    /// eight low-memory vectors
    pub(super) fn restart(&mut self, mem: &mut impl Memory, vector: u16) -> Result<usize> {
        self.stack_push(mem, self.pc)?;
        self.pc = vector;
        Ok(11)
    }

    /// |c5+| `PUSH`: Pushes a register pair, or the accumulator over the
    /// status word for the [Pair::SP] slot
    pub(super) fn push_pair(&mut self, mem: &mut impl Memory, pair: Pair) -> Result<usize> {
        let value = match pair {
            Pair::SP => u16::from_be_bytes([self.a(), self.flags.psw()]),
            pair => self.pair(pair),
        };
        self.stack_push(mem, value)?;
        Ok(11)
    }

    /// |c1+| `POP`: Pops a register pair, or the accumulator and status
    /// word for the [Pair::SP] slot
    pub(super) fn pop_pair(&mut self, mem: &mut impl Memory, pair: Pair) -> Result<usize> {
        let top = self.stack_pop(mem)?;
        match pair {
            Pair::SP => {
                let [acc, psw] = top.to_be_bytes();
                self.set_a(acc);
                self.flags.set_psw(psw);
            }
            pair => self.set_pair(pair, top),
        }
        Ok(11)
    }

    /// |e3| `XTHL`: Exchanges HL with the word on top of the stack
    pub(super) fn exchange_stack_top(&mut self, mem: &mut impl Memory) -> Result<usize> {
        let top = self.read_word(mem, self.sp)?;
        self.write_word(mem, self.sp, self.pair(Pair::HL))?;
        self.set_pair(Pair::HL, top);
        Ok(18)
    }

    /// |eb| `XCHG`: Exchanges DE and HL
    pub(super) fn exchange_pairs(&mut self) -> Result<usize> {
        let de = self.pair(Pair::DE);
        self.set_pair(Pair::DE, self.pair(Pair::HL));
        self.set_pair(Pair::HL, de);
        Ok(4)
    }

    /// |e9| `PCHL`: Jumps to the address in HL
    pub(super) fn jump_hl(&mut self) -> Result<usize> {
        self.pc = self.pair(Pair::HL);
        Ok(5)
    }

    /// |f9| `SPHL`: Loads the stack pointer from HL
    pub(super) fn load_sp_hl(&mut self) -> Result<usize> {
        self.sp = self.pair(Pair::HL);
        Ok(5)
    }

    /// |db| `IN`: Reads an I/O port into the accumulator
    pub(super) fn port_in(&mut self, mem: &mut impl Memory, io: &mut impl IoBus) -> Result<usize> {
        let port = self.fetch(mem)?;
        let value = io.input(port);
        self.set_a(value);
        Ok(10)
    }

    /// |d3| `OUT`: Writes the accumulator to an I/O port
    pub(super) fn port_out(&mut self, mem: &mut impl Memory, io: &mut impl IoBus) -> Result<usize> {
        let port = self.fetch(mem)?;
        io.output(port, self.a());
        Ok(10)
    }

    /// |f3/fb| `DI`/`EI`: Flips the interrupt-enable flag and tells the
    /// I/O bus about it
    pub(super) fn set_interrupt_enable(
        &mut self,
        io: &mut impl IoBus,
        enabled: bool,
    ) -> Result<usize> {
        self.int_enable = enabled;
        io.interrupt(enabled);
        Ok(4)
    }
}
