//! Sparse, byte-addressable memory backed by lazily-allocated fixed-size pages.
//!
//! The design goal is to model a very large (effectively unbounded) guest
//! address space without reserving host memory up front. [`SparseMemory`]
//! keys zero-filled pages by page index and creates them only when an
//! operation's address range first touches them, making it suitable as the
//! storage layer for an emulated address space where most of the 64-bit range
//! is never used.
//!
//! Bulk reads materialize the pages they cover, exactly like writes: reading
//! a never-written range returns zeros *and* leaves the covering pages
//! resident. [`SparseMemory::peek_into`] is the non-materializing variant for
//! callers that want a pure inspection.
//!
//! [`SharedMemory`] wraps the store behind a single whole-store lock so it
//! can be shared through `Arc` with `&self` operations. The [`WriteValue`]
//! and [`Encoding`] types carry the input-coercion seam: scalars, integer
//! sequences, and text are resolved into raw bytes before the store sees
//! them.

#![forbid(unsafe_code)]

mod error;
mod shared;
mod sparse;
mod value;

pub use error::{MemoryError, Result};
pub use shared::SharedMemory;
pub use sparse::SparseMemory;
pub use value::{encode_text, mask_byte, Encoding, WriteValue};

#[cfg(all(test, not(target_arch = "wasm32")))]
mod proptests;
