// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The I/O bus connects the CPU to its 256 ports
//!
//! `IN` and `OUT` transfer one byte between the accumulator and a port,
//! and `EI`/`DI` are forwarded so peripherals can react to the
//! interrupt-enable line. The default methods make an empty bus: input
//! reads zero, output and the notification do nothing.

/// Callbacks for the `IN`/`OUT` instructions and the interrupt-enable line
pub trait IoBus {
    /// Produces the byte a device places on `port` (`IN`)
    fn input(&mut self, port: u8) -> u8 {
        let _ = port;
        0
    }

    /// Consumes the accumulator byte written to `port` (`OUT`)
    fn output(&mut self, port: u8, data: u8) {
        let _ = (port, data);
    }

    /// Called whenever `EI` or `DI` changes the interrupt-enable flag
    fn interrupt(&mut self, enabled: bool) {
        let _ = enabled;
    }
}

/// An I/O bus with nothing attached, so the CPU can run untethered
/// # Examples
/// ```rust
/// # use ottanta::prelude::*;
/// let mut io = NullIo;
/// io.output(0x10, 0xc5);
/// assert_eq!(0, io.input(0x10));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NullIo;

impl IoBus for NullIo {}
