use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::Result;
use crate::sparse::SparseMemory;
use crate::value::WriteValue;

/// [`SparseMemory`] behind a single whole-store lock.
///
/// All operations take `&self` and hold the lock from start to finish, so
/// the type can be shared through `Arc` across threads. Multi-page
/// operations are atomic with respect to each other: no interleaving is
/// observable at page granularity. There is no per-page lock sharding.
#[derive(Debug, Default)]
pub struct SharedMemory {
    inner: Mutex<SparseMemory>,
}

impl SharedMemory {
    /// Create a shared store with [`SparseMemory::DEFAULT_PAGE_SIZE`] pages.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SparseMemory::new()),
        }
    }

    /// Create a shared store with the given page size.
    pub fn with_page_size(page_size: usize) -> Result<Self> {
        Ok(Self {
            inner: Mutex::new(SparseMemory::with_page_size(page_size)?),
        })
    }

    /// Unwrap back into the single-threaded store.
    pub fn into_inner(self) -> SparseMemory {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn page_size(&self) -> usize {
        self.lock().page_size()
    }

    pub fn allocated_pages(&self) -> usize {
        self.lock().allocated_pages()
    }

    pub fn write(&self, addr: u64, src: &[u8]) -> Result<()> {
        self.lock().write(addr, src)
    }

    pub fn write_value(&self, addr: u64, value: impl Into<WriteValue>) -> Result<()> {
        self.lock().write_value(addr, value)
    }

    pub fn read(&self, addr: u64, len: usize) -> Result<Vec<u8>> {
        self.lock().read(addr, len)
    }

    pub fn read_into(&self, addr: u64, dst: &mut [u8]) -> Result<()> {
        self.lock().read_into(addr, dst)
    }

    pub fn peek_into(&self, addr: u64, dst: &mut [u8]) -> Result<()> {
        self.lock().peek_into(addr, dst)
    }

    pub fn read_u8(&self, addr: u64) -> Result<u8> {
        self.lock().read_u8(addr)
    }

    pub fn read_u16(&self, addr: u64) -> Result<u16> {
        self.lock().read_u16(addr)
    }

    pub fn read_u32(&self, addr: u64) -> Result<u32> {
        self.lock().read_u32(addr)
    }

    pub fn read_u64(&self, addr: u64) -> Result<u64> {
        self.lock().read_u64(addr)
    }

    pub fn read_u128(&self, addr: u64) -> Result<u128> {
        self.lock().read_u128(addr)
    }

    pub fn write_u8(&self, addr: u64, value: u8) -> Result<()> {
        self.lock().write_u8(addr, value)
    }

    pub fn write_u16(&self, addr: u64, value: u16) -> Result<()> {
        self.lock().write_u16(addr, value)
    }

    pub fn write_u32(&self, addr: u64, value: u32) -> Result<()> {
        self.lock().write_u32(addr, value)
    }

    pub fn write_u64(&self, addr: u64, value: u64) -> Result<()> {
        self.lock().write_u64(addr, value)
    }

    pub fn write_u128(&self, addr: u64, value: u128) -> Result<()> {
        self.lock().write_u128(addr, value)
    }

    /// A panic while the lock is held leaves the store in some valid state
    /// (partial writes are ordinary data), so poisoning is recovered rather
    /// than propagated.
    fn lock(&self) -> MutexGuard<'_, SparseMemory> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<SparseMemory> for SharedMemory {
    fn from(mem: SparseMemory) -> Self {
        Self {
            inner: Mutex::new(mem),
        }
    }
}
