//! Error types for blockgemm.
//!
//! The multiply itself never fails: short buffers are caller bugs and panic
//! at the entry point. Errors only come from choosing a configuration that
//! cannot run on this machine.

use crate::kernels::KernelKind;
use thiserror::Error;

/// Result type alias using blockgemm's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Why a block parameter set was rejected for a given kernel shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    /// A block size is zero
    #[error("block size `{name}` must be non-zero")]
    Zero {
        /// Name of the offending field
        name: &'static str,
    },

    /// An L1 block is larger than the macro tile it lives in
    #[error("`{name}` = {value} exceeds tile size {tile}")]
    ExceedsTile {
        /// Name of the offending field
        name: &'static str,
        /// Its value
        value: usize,
        /// The macro tile size
        tile: usize,
    },

    /// A block size is not a multiple of the micro-kernel tile
    #[error("`{name}` = {value} is not a multiple of the {unit}-wide kernel tile")]
    NotMultiple {
        /// Name of the offending field
        name: &'static str,
        /// Its value
        value: usize,
        /// Kernel rows or columns it has to be a multiple of
        unit: usize,
    },
}

/// Errors that can occur when configuring a multiply
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Block parameters do not fit the selected micro-kernel
    #[error("invalid block parameters: {0}")]
    InvalidParams(#[from] ParamError),

    /// The requested kernel needs instructions this CPU does not have
    #[error("{0} kernel is not available on this CPU")]
    KernelUnavailable(KernelKind),

    /// A configuration value could not be parsed
    #[error("unrecognized value {value:?} for {var}")]
    UnknownSetting {
        /// Variable or setting name
        var: &'static str,
        /// The rejected value
        value: String,
    },
}
