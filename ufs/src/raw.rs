//! Raw byte-level (de)serialization for the `#[repr(C)]` on-disk records.
//!
//! The layout is native-endian and packed tightly by `#[repr(C)]` on types
//! made only of `i32`/`u32`/`u8` fields, so a plain reinterpret of the bytes
//! is exactly the wire format described by the spec.

use std::mem::size_of;
use std::slice;

/// Views `v` as its raw byte representation.
pub fn bytes_of<T>(v: &T) -> &[u8] {
	unsafe { slice::from_raw_parts(v as *const T as *const u8, size_of::<T>()) }
}

/// Views `v` as its mutable raw byte representation.
pub fn bytes_of_mut<T>(v: &mut T) -> &mut [u8] {
	unsafe { slice::from_raw_parts_mut(v as *mut T as *mut u8, size_of::<T>()) }
}
