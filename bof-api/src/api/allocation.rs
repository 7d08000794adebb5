//! Owned memory from the MyApi allocator

use std::fmt;
use std::mem;
use std::ops::Deref;
use std::os::raw::c_void;
use std::ptr::NonNull;

use super::MyApi;
use crate::types::{ApiError, Result};

/// A single value stored in memory obtained from [`MyApi::alloc`]
///
/// The memory is released through [`MyApi::free`] when the guard is dropped,
/// so every successful allocation is freed exactly once and the value cannot
/// be reached afterwards.
pub struct Allocation<'a, A: MyApi + ?Sized, T: Copy> {
    api: &'a A,
    ptr: NonNull<T>,
}

impl<'a, A: MyApi + ?Sized, T: Copy> Allocation<'a, A, T> {
    /// Allocate `size_of::<T>()` bytes through `api` and store `value` there.
    pub fn new(api: &'a A, value: T) -> Result<Self> {
        let size = mem::size_of::<T>();
        let raw = api.alloc(size).cast::<T>();

        let ptr = NonNull::new(raw).ok_or(ApiError::AllocationFailed { size })?;

        let align = mem::align_of::<T>();
        if (ptr.as_ptr() as usize) % align != 0 {
            // Still ours to release, the caller never sees it.
            api.free(ptr.as_ptr().cast::<c_void>());
            return Err(ApiError::MisalignedAllocation { align });
        }

        // SAFETY: the allocator returned a non-null, aligned block of
        // `size_of::<T>()` bytes that nothing else references.
        unsafe { ptr.as_ptr().write(value) };

        log::trace!("Allocated {} bytes at {:p}", size, ptr);
        Ok(Self { api, ptr })
    }

    /// Address of the stored value
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }
}

impl<A: MyApi + ?Sized, T: Copy> Deref for Allocation<'_, A, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: initialized in `new` and valid until `drop`.
        unsafe { self.ptr.as_ref() }
    }
}

impl<A: MyApi + ?Sized, T: Copy + fmt::Debug> fmt::Debug for Allocation<'_, A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Allocation")
            .field("ptr", &self.ptr)
            .field("value", &**self)
            .finish()
    }
}

impl<A: MyApi + ?Sized, T: Copy> Drop for Allocation<'_, A, T> {
    fn drop(&mut self) {
        log::trace!("Freeing allocation at {:p}", self.ptr);
        self.api.free(self.ptr.as_ptr().cast::<c_void>());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMyApi;
    use std::os::raw::c_int;

    /// Leak a boxed int and hand out its address the way an allocator would.
    fn leaked_int() -> usize {
        Box::into_raw(Box::new(0 as c_int)) as usize
    }

    #[test]
    fn test_value_written_and_freed_once() {
        let addr = leaked_int();
        let mut api = MockMyApi::new();
        api.expect_alloc()
            .withf(|size| *size == mem::size_of::<c_int>())
            .times(1)
            .returning(move |_| addr as *mut c_void);
        api.expect_free()
            .withf(move |ptr| *ptr as usize == addr)
            .times(1)
            .returning(|ptr| {
                // SAFETY: the pointer came from `leaked_int`.
                let value = unsafe { Box::from_raw(ptr.cast::<c_int>()) };
                assert_eq!(*value, 42);
            });

        let allocation = Allocation::new(&api, 42 as c_int).unwrap();
        assert_eq!(*allocation, 42);
        assert_eq!(allocation.as_ptr() as usize, addr);
    }

    #[test]
    fn test_null_allocation_is_an_error() {
        let mut api = MockMyApi::new();
        api.expect_alloc()
            .times(1)
            .returning(|_| std::ptr::null_mut());
        api.expect_free().never();

        let result = Allocation::new(&api, 1u64);
        assert!(matches!(
            result,
            Err(ApiError::AllocationFailed { size: 8 })
        ));
    }

    #[test]
    fn test_misaligned_allocation_is_released() {
        let addr = leaked_int();
        let misaligned = addr + 1;
        let mut api = MockMyApi::new();
        api.expect_alloc()
            .times(1)
            .returning(move |_| misaligned as *mut c_void);
        api.expect_free()
            .withf(move |ptr| *ptr as usize == misaligned)
            .times(1)
            .return_const(());

        let result = Allocation::new(&api, 7 as c_int);
        assert!(matches!(
            result,
            Err(ApiError::MisalignedAllocation { align: 4 })
        ));

        // SAFETY: the block was never handed out by `Allocation`.
        drop(unsafe { Box::from_raw(addr as *mut c_int) });
    }
}
