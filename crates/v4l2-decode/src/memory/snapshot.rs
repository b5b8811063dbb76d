//! In-memory address space made of mapped regions.
//!
//! Used for replaying captured calls and by tests; reads that run off the
//! end of a region continue into an adjacent region and stop at the first
//! unmapped byte.

use std::collections::BTreeMap;

use crate::{MemoryTransport, ReadFault};

/// One mapped region.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MappedRegion {
    /// First mapped address.
    pub base: u64,
    /// Region contents.
    pub bytes: Vec<u8>,
}

impl MappedRegion {
    /// One past the last mapped address.
    #[must_use]
    pub fn end(&self) -> u64 {
        self.base.saturating_add(self.bytes.len() as u64)
    }

    /// Returns `true` when `addr` belongs to this region.
    #[must_use]
    pub fn contains(&self, addr: u64) -> bool {
        addr >= self.base && addr < self.end()
    }
}

/// Snapshot of a traced process's address space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotMemory {
    regions: BTreeMap<u64, MappedRegion>,
}

impl SnapshotMemory {
    /// Creates an empty address space.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `bytes` at `base`, replacing any region starting at `base`.
    ///
    /// # Errors
    ///
    /// Returns [`ReadFault::AddressOverflow`] when the region would wrap
    /// the address space.
    pub fn map(&mut self, base: u64, bytes: Vec<u8>) -> Result<(), ReadFault> {
        if base.checked_add(bytes.len() as u64).is_none() {
            return Err(ReadFault::AddressOverflow {
                addr: base,
                len: bytes.len(),
            });
        }
        self.regions.insert(base, MappedRegion { base, bytes });
        Ok(())
    }

    /// Removes the region starting at `base`, returning it.
    pub fn unmap(&mut self, base: u64) -> Option<MappedRegion> {
        self.regions.remove(&base)
    }

    /// Mapped regions in ascending base order.
    pub fn regions(&self) -> impl Iterator<Item = &MappedRegion> {
        self.regions.values()
    }

    /// Overwrites mapped bytes at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`ReadFault::Unmapped`] when any target byte is outside the
    /// region containing `addr`.
    pub fn write(&mut self, addr: u64, bytes: &[u8]) -> Result<(), ReadFault> {
        let region = self
            .regions
            .range_mut(..=addr)
            .next_back()
            .map(|(_, region)| region)
            .filter(|region| region.contains(addr))
            .ok_or(ReadFault::Unmapped { addr })?;

        let start = usize::try_from(addr - region.base)
            .map_err(|_| ReadFault::Unmapped { addr })?;
        let end = start
            .checked_add(bytes.len())
            .filter(|end| *end <= region.bytes.len())
            .ok_or(ReadFault::Unmapped {
                addr: region.end(),
            })?;
        region.bytes[start..end].copy_from_slice(bytes);
        Ok(())
    }

    fn region_containing(&self, addr: u64) -> Option<&MappedRegion> {
        self.regions
            .range(..=addr)
            .next_back()
            .map(|(_, region)| region)
            .filter(|region| region.contains(addr))
    }
}

impl MemoryTransport for SnapshotMemory {
    fn read_prefix(&self, addr: u64, buf: &mut [u8]) -> Result<usize, ReadFault> {
        if addr.checked_add(buf.len() as u64).is_none() {
            return Err(ReadFault::AddressOverflow {
                addr,
                len: buf.len(),
            });
        }

        let mut copied = 0;
        while copied < buf.len() {
            let at = addr + copied as u64;
            let Some(region) = self.region_containing(at) else {
                break;
            };
            let Ok(offset) = usize::try_from(at - region.base) else {
                break;
            };
            let chunk = (region.bytes.len() - offset).min(buf.len() - copied);
            buf[copied..copied + chunk].copy_from_slice(&region.bytes[offset..offset + chunk]);
            copied += chunk;
        }

        if copied == 0 {
            Err(ReadFault::Unmapped { addr })
        } else {
            Ok(copied)
        }
    }
}
