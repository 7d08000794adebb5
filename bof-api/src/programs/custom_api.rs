//! MyApi example
//!
//! Reports the API version, then stores a value in memory from the API's
//! allocator, prints it and releases it.

use std::os::raw::c_int;

use crate::api::{Allocation, MyApi};
use crate::types::Result;

/// Value written to the allocated memory
pub const STORED_VALUE: c_int = 123;

/// Entry point
pub fn go<A: MyApi + ?Sized>(api: &A) -> Result<()> {
    let version = api.version();
    api.printf(&format!("MyApiVersion: {}", version));

    let value = Allocation::new(api, STORED_VALUE)?;
    api.printf(&format!("value: {}", *value));

    Ok(())
}
