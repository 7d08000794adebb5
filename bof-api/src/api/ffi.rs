//! Link-time bindings to the Beacon and MyApi functions
//!
//! These declarations are resolved by whatever loads the final object: the
//! Beacon host for `BeaconPrintf`, the custom API provider for the `MyApi*`
//! functions. Nothing in this crate defines them.

use std::os::raw::{c_char, c_int, c_void};

use super::{to_c_message, BeaconApi, MyApi, PASSTHROUGH_FORMAT};
use crate::types::CallbackType;

extern "C" {
    pub fn BeaconPrintf(typ: c_int, fmt: *const c_char, ...);

    pub fn MyApiVersion() -> c_int;
    pub fn MyApiPrintf(format: *const c_char, ...);
    pub fn MyApiAlloc(size: usize) -> *mut c_void;
    pub fn MyApiFree(ptr: *mut c_void);
}

/// Beacon API resolved at link time
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkedBeacon;

impl BeaconApi for LinkedBeacon {
    fn printf(&self, callback: CallbackType, message: &str) {
        let message = to_c_message(message);
        unsafe {
            BeaconPrintf(
                callback.as_raw(),
                PASSTHROUGH_FORMAT.as_ptr().cast::<c_char>(),
                message.as_ptr(),
            );
        }
    }
}

/// MyApi resolved at link time
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkedMyApi;

impl MyApi for LinkedMyApi {
    fn version(&self) -> c_int {
        unsafe { MyApiVersion() }
    }

    fn printf(&self, message: &str) {
        let message = to_c_message(message);
        unsafe { MyApiPrintf(PASSTHROUGH_FORMAT.as_ptr().cast::<c_char>(), message.as_ptr()) }
    }

    fn alloc(&self, size: usize) -> *mut c_void {
        unsafe { MyApiAlloc(size) }
    }

    fn free(&self, ptr: *mut c_void) {
        unsafe { MyApiFree(ptr) }
    }
}

#[cfg(windows)]
pub use self::win32::Win32System;

#[cfg(windows)]
mod win32 {
    use std::os::raw::c_char;

    use crate::api::SystemInfo;

    #[link(name = "kernel32")]
    extern "system" {
        fn GetCurrentProcessId() -> u32;
    }

    #[link(name = "advapi32")]
    extern "system" {
        fn GetUserNameA(buffer: *mut c_char, size: *mut u32) -> i32;
    }

    /// Process and user queries answered by the Win32 API
    #[derive(Debug, Clone, Copy, Default)]
    pub struct Win32System;

    impl SystemInfo for Win32System {
        fn current_process_id(&self) -> u32 {
            unsafe { GetCurrentProcessId() }
        }

        fn user_name(&self, buffer: &mut [u8]) -> bool {
            let mut size = u32::try_from(buffer.len()).unwrap_or(u32::MAX);
            unsafe { GetUserNameA(buffer.as_mut_ptr().cast::<c_char>(), &mut size) != 0 }
        }
    }
}
