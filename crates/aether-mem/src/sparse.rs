use std::collections::HashMap;

use crate::error::{MemoryError, Result};
use crate::value::WriteValue;

/// Sparse byte-addressable memory over the full 64-bit address range.
///
/// Storage is a map from page index (`addr / page_size`) to a zero-filled
/// buffer of exactly `page_size` bytes. Pages are created the first time any
/// operation's range touches them and stay resident for the lifetime of the
/// store; there is no deallocation. Every byte reads as 0 until written.
///
/// Reads materialize pages just like writes do: [`SparseMemory::read`] and
/// [`SparseMemory::read_into`] leave every page in the requested range
/// resident, with all-zero content where nothing was ever written. The
/// returned bytes are indistinguishable from a never-touched range; only the
/// resident-page count ([`SparseMemory::allocated_pages`]) observes the
/// difference. Use [`SparseMemory::peek_into`] to inspect a range without
/// growing the page map.
///
/// An operation whose exclusive end `addr + len` does not fit in `u64` fails
/// with [`MemoryError::AddressOverflow`] before any page is touched.
#[derive(Debug, Clone)]
pub struct SparseMemory {
    page_size: usize,
    pages: HashMap<u64, Box<[u8]>>,
}

impl SparseMemory {
    pub const DEFAULT_PAGE_SIZE: usize = 1024;

    /// Create a store with [`SparseMemory::DEFAULT_PAGE_SIZE`] pages.
    pub fn new() -> Self {
        Self {
            page_size: Self::DEFAULT_PAGE_SIZE,
            pages: HashMap::new(),
        }
    }

    /// Create a store with the given page size.
    ///
    /// The page size is fixed for the lifetime of the store. Zero is
    /// rejected with [`MemoryError::InvalidPageSize`].
    pub fn with_page_size(page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(MemoryError::InvalidPageSize { page_size });
        }
        Ok(Self {
            page_size,
            pages: HashMap::new(),
        })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of resident pages.
    pub fn allocated_pages(&self) -> usize {
        self.pages.len()
    }

    /// Indices of resident pages, in no particular order.
    ///
    /// Together with [`SparseMemory::peek_into`] this is enough for an
    /// external layer (e.g. a snapshotter) to enumerate and drain the store
    /// without touching its residency.
    pub fn resident_pages(&self) -> impl Iterator<Item = u64> + '_ {
        self.pages.keys().copied()
    }

    /// Write `src` starting at `addr`, materializing every page the range
    /// touches.
    ///
    /// Bytes land in address order: the tail of the first page, then whole
    /// middle pages in ascending index order, then the head of the last page.
    pub fn write(&mut self, addr: u64, src: &[u8]) -> Result<()> {
        Self::check_range(addr, src.len())?;
        let mut remaining = src;
        let mut cur = addr;

        while !remaining.is_empty() {
            let (index, offset) = self.locate(cur);
            let take = (self.page_size - offset).min(remaining.len());

            let page = self.page_mut(index);
            page[offset..offset + take].copy_from_slice(&remaining[..take]);

            cur += take as u64;
            remaining = &remaining[take..];
        }

        Ok(())
    }

    /// Convert `value` to bytes and write them at `addr`.
    ///
    /// Accepts anything convertible to [`WriteValue`]: a scalar integer, an
    /// integer sequence (each element masked to its low 8 bits), or text with
    /// an optional [`Encoding`](crate::Encoding) (UTF-8 when unspecified).
    pub fn write_value(&mut self, addr: u64, value: impl Into<WriteValue>) -> Result<()> {
        self.write(addr, &value.into().into_bytes())
    }

    /// Read exactly `len` bytes starting at `addr`.
    ///
    /// Materializes every page the range touches, so a read of a
    /// never-written range grows the resident set as a side effect. The
    /// returned vector always has length `len`.
    pub fn read(&mut self, addr: u64, len: usize) -> Result<Vec<u8>> {
        Self::check_range(addr, len)?;
        let mut out = vec![0u8; len];
        self.read_into(addr, &mut out)?;
        Ok(out)
    }

    /// Fill `dst` from the range starting at `addr`, materializing every
    /// page the range touches.
    pub fn read_into(&mut self, addr: u64, dst: &mut [u8]) -> Result<()> {
        Self::check_range(addr, dst.len())?;
        let mut remaining = dst;
        let mut cur = addr;

        while !remaining.is_empty() {
            let (index, offset) = self.locate(cur);
            let take = (self.page_size - offset).min(remaining.len());

            let page = self.page_mut(index);
            remaining[..take].copy_from_slice(&page[offset..offset + take]);

            cur += take as u64;
            remaining = &mut remaining[take..];
        }

        Ok(())
    }

    /// Fill `dst` from the range starting at `addr` without materializing
    /// anything.
    ///
    /// Absent pages contribute zeros. The bytes produced are identical to
    /// what [`SparseMemory::read_into`] would produce for the same range.
    pub fn peek_into(&self, addr: u64, dst: &mut [u8]) -> Result<()> {
        Self::check_range(addr, dst.len())?;
        let mut remaining = dst;
        let mut cur = addr;

        while !remaining.is_empty() {
            let (index, offset) = self.locate(cur);
            let take = (self.page_size - offset).min(remaining.len());

            if let Some(page) = self.pages.get(&index) {
                remaining[..take].copy_from_slice(&page[offset..offset + take]);
            } else {
                remaining[..take].fill(0);
            }

            cur += take as u64;
            remaining = &mut remaining[take..];
        }

        Ok(())
    }

    pub fn read_u8(&mut self, addr: u64) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_into(addr, &mut buf)?;
        Ok(buf[0])
    }

    pub fn read_u16(&mut self, addr: u64) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_into(addr, &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    pub fn read_u32(&mut self, addr: u64) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_into(addr, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    pub fn read_u64(&mut self, addr: u64) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.read_into(addr, &mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    pub fn read_u128(&mut self, addr: u64) -> Result<u128> {
        let mut buf = [0u8; 16];
        self.read_into(addr, &mut buf)?;
        Ok(u128::from_le_bytes(buf))
    }

    pub fn write_u8(&mut self, addr: u64, value: u8) -> Result<()> {
        self.write(addr, &[value])
    }

    pub fn write_u16(&mut self, addr: u64, value: u16) -> Result<()> {
        self.write(addr, &value.to_le_bytes())
    }

    pub fn write_u32(&mut self, addr: u64, value: u32) -> Result<()> {
        self.write(addr, &value.to_le_bytes())
    }

    pub fn write_u64(&mut self, addr: u64, value: u64) -> Result<()> {
        self.write(addr, &value.to_le_bytes())
    }

    pub fn write_u128(&mut self, addr: u64, value: u128) -> Result<()> {
        self.write(addr, &value.to_le_bytes())
    }

    /// Reject ranges whose exclusive end does not fit in `u64`.
    ///
    /// The check runs before any page is touched; after it passes, the
    /// per-page walk cannot fail.
    fn check_range(addr: u64, len: usize) -> Result<()> {
        addr.checked_add(len as u64)
            .ok_or(MemoryError::AddressOverflow { addr, len })?;
        Ok(())
    }

    #[inline]
    fn locate(&self, addr: u64) -> (u64, usize) {
        let page_size = self.page_size as u64;
        // The offset is < page_size, so the usize cast cannot truncate.
        (addr / page_size, (addr % page_size) as usize)
    }

    #[inline]
    fn page_mut(&mut self, index: u64) -> &mut [u8] {
        let page_size = self.page_size;
        self.pages
            .entry(index)
            .or_insert_with(|| vec![0u8; page_size].into_boxed_slice())
    }
}

impl Default for SparseMemory {
    fn default() -> Self {
        Self::new()
    }
}
