// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The 64KiB address space the CPU is bound to
//!
//! [Ram] is the plain flat store. [Protected] layers access-control ranges
//! over any other memory, and [Watched] records which addresses a program
//! ever touched. The variants are independent implementations of one
//! [Memory] contract and stack by wrapping, so a permission-checked,
//! coverage-marked memory is `Watched<Protected<Ram>>`.

use crate::error::{Error, Result};
use std::fmt::{Display, Formatter};

/// Number of addressable bytes in the memory space
pub const SPACE: usize = 0x1_0000;

/// Creates a [Protected] memory over `inner`, granting ranges in order.
///
/// Expands to fallible [Range] construction, so it wants a function that
/// returns [crate::error::Result].
/// # Examples
/// ```rust
/// # use ottanta::{protect, prelude::*};
/// # fn main() -> Result<()> {
/// let mem = protect! {
///     Ram::default(),
///     [0x0000..=0x00ff] = Read,
///     [0x0100..=0xdbff] = Both,
/// };
/// assert_eq!(2, mem.ranges().len());
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! protect {
    ($inner:expr $(, [$lo:literal ..= $hi:literal] = $access:ident)* $(,)?) => {
        $crate::mem::Protected::new($inner)
        $(
            .grant_owned($crate::mem::Range::new($lo, $hi, $crate::mem::Access::$access)?)
        )*
    };
}

/// One 64KiB byte-addressable memory space.
///
/// Addresses wrap modulo the space size by construction (they are `u16`),
/// and every stored value is a byte. Reads and writes are fallible because
/// the permission-checked variant can refuse them; [Ram] itself never does.
pub trait Memory {
    /// Reads the byte at `addr`
    fn read(&mut self, addr: u16) -> Result<u8>;
    /// Writes a byte to `addr`
    fn write(&mut self, addr: u16, data: u8) -> Result<()>;
    /// Copies `image` into the space starting at `addr`, wrapping at the
    /// top of memory. Bypasses any permission layer: loading a program
    /// image is the caller's prerogative, not the program's.
    fn load(&mut self, image: &[u8], addr: u16);
    /// Resets every byte to zero
    fn clear(&mut self);
    /// Exports the full space as a byte vector
    fn snapshot(&self) -> Vec<u8>;
}

/// Flat 64KiB store with no access control
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ram {
    memory: Vec<u8>,
}

impl Ram {
    /// Constructs a zeroed memory space
    /// # Examples
    /// ```rust
    /// # use ottanta::prelude::*;
    /// let mut ram = Ram::new();
    /// assert_eq!(Ok(0), ram.read(0xffff));
    /// ```
    pub fn new() -> Self {
        Ram::default()
    }

    /// Loads an image into an *owned* [Ram], for use during initialization
    pub fn load_owned(mut self, image: &[u8], addr: u16) -> Self {
        self.load(image, addr);
        self
    }
}

impl Default for Ram {
    fn default() -> Self {
        Ram { memory: vec![0; SPACE] }
    }
}

impl Memory for Ram {
    #[inline(always)]
    fn read(&mut self, addr: u16) -> Result<u8> {
        Ok(self.memory[addr as usize])
    }

    #[inline(always)]
    fn write(&mut self, addr: u16, data: u8) -> Result<()> {
        self.memory[addr as usize] = data;
        Ok(())
    }

    fn load(&mut self, image: &[u8], addr: u16) {
        let mut addr = addr;
        for &byte in image {
            self.memory[addr as usize] = byte;
            addr = addr.wrapping_add(1);
        }
    }

    fn clear(&mut self) {
        self.memory.fill(0);
    }

    fn snapshot(&self) -> Vec<u8> {
        self.memory.clone()
    }
}

/// The access directions a [Range] grants
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Access {
    /// Unmapped: neither direction is allowed
    #[default]
    None,
    /// Read-only, like a ROM
    Read,
    /// Write-only
    Write,
    /// Ordinary read/write memory
    Both,
}

impl Access {
    /// Reports whether this grant covers the `requested` direction
    pub fn allows(self, requested: Access) -> bool {
        match requested {
            Access::None => true,
            Access::Read => matches!(self, Access::Read | Access::Both),
            Access::Write => matches!(self, Access::Write | Access::Both),
            Access::Both => self == Access::Both,
        }
    }
}

impl Display for Access {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Access::None => "no-access",
                Access::Read => "read",
                Access::Write => "write",
                Access::Both => "read/write",
            }
        )
    }
}

/// An inclusive address interval tagged with the [Access] it grants
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    lower: u16,
    upper: u16,
    access: Access,
}

impl Range {
    /// Constructs a range covering `lower..=upper`.
    /// Fails with [Error::InvalidRange] unless `lower < upper`.
    /// # Examples
    /// ```rust
    /// # use ottanta::prelude::*;
    /// assert!(Range::new(0x0000, 0x00ff, Access::Read).is_ok());
    /// assert!(Range::new(0x00ff, 0x0000, Access::Read).is_err());
    /// ```
    pub fn new(lower: u16, upper: u16, access: Access) -> Result<Self> {
        if lower < upper {
            Ok(Range { lower, upper, access })
        } else {
            Err(Error::InvalidRange { lower, upper })
        }
    }

    /// Reports whether `addr` falls inside the interval
    pub fn contains(&self, addr: u16) -> bool {
        self.lower <= addr && addr <= self.upper
    }

    /// Gets the lower bound
    pub fn lower(&self) -> u16 {
        self.lower
    }

    /// Gets the upper bound
    pub fn upper(&self) -> u16 {
        self.upper
    }

    /// Gets the granted access
    pub fn access(&self) -> Access {
        self.access
    }
}

/// Layers access control over another memory.
///
/// Each read or write resolves the address against the granted ranges in
/// the order they were granted; the first range containing the address
/// decides, and an address outside every range is denied in both
/// directions.
/// # Examples
/// ```rust
/// # use ottanta::prelude::*;
/// # fn main() -> Result<()> {
/// let mut mem = Protected::new(Ram::default())
///     .grant_owned(Range::new(0x0000, 0x00ff, Access::Read)?);
/// assert!(mem.read(0x0050).is_ok());
/// assert!(mem.write(0x0050, 0xc5).is_err());
/// assert!(mem.read(0x0200).is_err()); // outside every range
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Protected<M = Ram> {
    inner: M,
    ranges: Vec<Range>,
}

impl<M> Protected<M> {
    /// Wraps `inner` with an empty range table (every access denied)
    pub fn new(inner: M) -> Self {
        Protected { inner, ranges: vec![] }
    }

    /// Grants a [Range]. Earlier grants win when ranges overlap.
    pub fn grant(&mut self, range: Range) -> &mut Self {
        self.ranges.push(range);
        self
    }

    /// Grants a [Range] on an *owned* [Protected], for use during initialization
    pub fn grant_owned(mut self, range: Range) -> Self {
        self.grant(range);
        self
    }

    /// Removes every range with exactly the bounds `lower..=upper`
    pub fn revoke(&mut self, lower: u16, upper: u16) -> &mut Self {
        self.ranges.retain(|range| range.lower != lower || range.upper != upper);
        self
    }

    /// Gets the granted ranges, in grant order
    pub fn ranges(&self) -> &[Range] {
        self.ranges.as_slice()
    }

    /// Unwraps the underlying memory
    pub fn into_inner(self) -> M {
        self.inner
    }

    fn check(&self, addr: u16, access: Access) -> Result<()> {
        match self.ranges.iter().find(|range| range.contains(addr)) {
            Some(range) if range.access.allows(access) => Ok(()),
            _ => Err(Error::AccessViolation { addr, access }),
        }
    }
}

impl<M: Memory> Memory for Protected<M> {
    fn read(&mut self, addr: u16) -> Result<u8> {
        self.check(addr, Access::Read)?;
        self.inner.read(addr)
    }

    fn write(&mut self, addr: u16, data: u8) -> Result<()> {
        self.check(addr, Access::Write)?;
        self.inner.write(addr, data)
    }

    fn load(&mut self, image: &[u8], addr: u16) {
        self.inner.load(image, addr);
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn snapshot(&self) -> Vec<u8> {
        self.inner.snapshot()
    }
}

/// Records, per address, whether it was ever read or ever written.
///
/// Useful for coverage-style analysis of which memory a program touched,
/// independent of any permission model. Marks are set only when the
/// wrapped memory accepts the access.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Watched<M = Ram> {
    inner: M,
    read: Vec<bool>,
    written: Vec<bool>,
}

impl<M> Watched<M> {
    /// Wraps `inner` with all marks clear
    pub fn new(inner: M) -> Self {
        Watched {
            inner,
            read: vec![false; SPACE],
            written: vec![false; SPACE],
        }
    }

    /// Reports whether `addr` was ever read since the last reset
    pub fn was_read(&self, addr: u16) -> bool {
        self.read[addr as usize]
    }

    /// Reports whether `addr` was ever written since the last reset
    pub fn was_written(&self, addr: u16) -> bool {
        self.written[addr as usize]
    }

    /// Clears every read/write mark, leaving memory contents alone
    pub fn reset_marks(&mut self) -> &mut Self {
        self.read.fill(false);
        self.written.fill(false);
        self
    }

    /// Unwraps the underlying memory
    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<M: Memory> Memory for Watched<M> {
    fn read(&mut self, addr: u16) -> Result<u8> {
        let data = self.inner.read(addr)?;
        self.read[addr as usize] = true;
        Ok(data)
    }

    fn write(&mut self, addr: u16, data: u8) -> Result<()> {
        self.inner.write(addr, data)?;
        self.written[addr as usize] = true;
        Ok(())
    }

    fn load(&mut self, image: &[u8], addr: u16) {
        self.inner.load(image, addr);
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn snapshot(&self) -> Vec<u8> {
        self.inner.snapshot()
    }
}
