//! Collaborator interfaces
//!
//! A BOF does not implement output, process introspection or memory
//! management itself. It calls functions the host resolves when the object is
//! loaded. Each group of those functions is modeled as a trait here so programs
//! can be written against the trait and bound to either the linked symbols
//! ([`ffi`], behind the `ffi` feature), a shared library loaded at runtime
//! ([`loaded`]), or a test double.

use std::ffi::CString;
use std::os::raw::{c_int, c_void};

use crate::types::CallbackType;

mod allocation;
#[cfg(feature = "ffi")]
pub mod ffi;
pub mod loaded;

pub use allocation::Allocation;

/// Beacon output callback
#[cfg_attr(test, mockall::automock)]
pub trait BeaconApi {
    /// Emit already formatted text on the given output channel.
    fn printf(&self, callback: CallbackType, message: &str);
}

/// Process and user information provided by the host OS
#[cfg_attr(test, mockall::automock)]
pub trait SystemInfo {
    /// Identifier of the process the program runs in
    fn current_process_id(&self) -> u32;

    /// Fill `buffer` with the NUL-terminated name of the current user.
    ///
    /// Returns `false` if the name could not be retrieved. The buffer contents
    /// are unspecified in that case.
    fn user_name(&self, buffer: &mut [u8]) -> bool;
}

/// The MyApi custom API surface
///
/// Mirrors `myapi.h`: a version query, a print function and a raw allocator.
#[cfg_attr(test, mockall::automock)]
pub trait MyApi {
    /// Version reported by the API
    fn version(&self) -> c_int;

    /// Print already formatted text
    fn printf(&self, message: &str);

    /// Allocate `size` bytes. Returns null on failure.
    fn alloc(&self, size: usize) -> *mut c_void;

    /// Release memory returned by [`MyApi::alloc`].
    ///
    /// Each pointer must be passed exactly once.
    fn free(&self, ptr: *mut c_void);
}

/// Format string used to pass preformatted text through the printf style APIs
pub(crate) const PASSTHROUGH_FORMAT: &[u8] = b"%s\0";

/// Convert `message` to a C string, dropping everything after an interior NUL
/// the same way a C consumer would stop reading there.
pub(crate) fn to_c_message(message: &str) -> CString {
    let bytes = match message.find('\0') {
        Some(end) => {
            log::warn!("Message truncated at interior NUL byte {}", end);
            &message.as_bytes()[..end]
        }
        None => message.as_bytes(),
    };

    // No interior NUL remains after truncation.
    CString::new(bytes).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_without_nul_is_unchanged() {
        assert_eq!(to_c_message("Hello, World!").as_bytes(), b"Hello, World!");
    }

    #[test]
    fn test_message_truncated_at_nul() {
        assert_eq!(to_c_message("user\0junk").as_bytes(), b"user");
        assert_eq!(to_c_message("\0").as_bytes(), b"");
    }

    #[test]
    fn test_passthrough_format_is_terminated() {
        assert_eq!(PASSTHROUGH_FORMAT.last(), Some(&0));
    }
}
