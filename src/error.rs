// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for ottanta

use crate::mem::Access;
use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for ottanta.
///
/// Register and ALU operations are total over their input domains, and the
/// opcode decoder covers all 256 byte values at compile time, so the only
/// fallible paths in the core are the permission-checked memory and range
/// configuration.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// An address was touched without the capability granted for it
    #[error("{access} access violation at {addr:04x}")]
    AccessViolation {
        /// The offending address
        addr: u16,
        /// The access direction that was denied
        access: Access,
    },
    /// A permission range was configured with `lower >= upper`
    #[error("invalid permission range {lower:04x}..={upper:04x}")]
    InvalidRange {
        /// The lower bound that was requested
        lower: u16,
        /// The upper bound that was requested
        upper: u16,
    },
}
