use thiserror::Error;

pub type Result<T> = std::result::Result<T, MemoryError>;

/// Errors returned by [`SparseMemory`](crate::SparseMemory) and
/// [`SharedMemory`](crate::SharedMemory).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// `addr + len` is not representable in the 64-bit address space.
    ///
    /// The failed operation performs no mutation: nothing is written and no
    /// page is materialized.
    #[error("address range overflow: addr=0x{addr:x} len={len}")]
    AddressOverflow { addr: u64, len: usize },

    /// The requested page size is invalid (zero).
    #[error("invalid page size {page_size}")]
    InvalidPageSize { page_size: usize },
}
