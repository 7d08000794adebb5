//! Core types for the BOF API library
//!
//! This module defines the values that cross the boundary between a program and
//! the external API it is linked against: output destinations, target
//! architectures and the library's error type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Maximum user name length on Windows (`UNLEN` from `lmcons.h`)
pub const UNLEN: usize = 256;

/// Destination tag for text sent through the Beacon output callback
///
/// Discriminants match the `CALLBACK_*` constants of `beacon.h`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackType {
    /// Regular output
    Output = 0x00,
    /// Output in the OEM code page
    OutputOem = 0x1e,
    /// UTF-8 encoded output
    OutputUtf8 = 0x20,
    /// Error output
    Error = 0x0d,
}

impl CallbackType {
    /// Raw value passed to `BeaconPrintf`
    pub fn as_raw(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for CallbackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackType::Output => write!(f, "CALLBACK_OUTPUT"),
            CallbackType::OutputOem => write!(f, "CALLBACK_OUTPUT_OEM"),
            CallbackType::OutputUtf8 => write!(f, "CALLBACK_OUTPUT_UTF8"),
            CallbackType::Error => write!(f, "CALLBACK_ERROR"),
        }
    }
}

/// Target architecture of an object file importing API symbols
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    /// x86-64 (`i386pep` emulation)
    #[default]
    Amd64,
    /// 32-bit x86 (`i386pe` emulation)
    I386,
}

impl Architecture {
    /// Prefix the compiler puts in front of `dllimport` symbols.
    ///
    /// I386 symbols carry an extra leading underscore from the C name
    /// decoration.
    pub fn import_prefix(self) -> &'static str {
        match self {
            Architecture::Amd64 => "__imp_",
            Architecture::I386 => "__imp__",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Architecture::Amd64 => write!(f, "amd64"),
            Architecture::I386 => write!(f, "i386"),
        }
    }
}

/// Errors returned by the API bindings
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Allocation of {size} bytes failed")]
    AllocationFailed { size: usize },

    #[error("Allocator returned memory not aligned to {align} bytes")]
    MisalignedAllocation { align: usize },

    #[error("Failed to load API library: {0}")]
    LibraryLoad(#[from] libloading::Error),

    #[error("API library does not export symbol: {symbol}")]
    MissingSymbol {
        symbol: String,
        #[source]
        source: libloading::Error,
    },
}
