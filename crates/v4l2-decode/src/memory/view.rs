//! Bytes fetched from the traced process together with how much of the
//! requested range they cover.

use crate::ByteOrder;

/// How much of a requested range was actually read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Availability {
    /// Every requested byte was read.
    Full,
    /// Only the first `n` bytes were read, `n` smaller than requested.
    Partial(usize),
    /// Nothing was read.
    Unreadable,
}

/// Result of one read from the traced process.
///
/// Accessors never expose bytes beyond what was read; a field that is not
/// fully covered reads as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MemoryView {
    addr: u64,
    requested: usize,
    bytes: Vec<u8>,
    availability: Availability,
}

impl MemoryView {
    /// View over a range whose bytes were all read.
    #[must_use]
    pub fn full(addr: u64, bytes: Vec<u8>) -> Self {
        Self {
            addr,
            requested: bytes.len(),
            bytes,
            availability: Availability::Full,
        }
    }

    /// View over a range of which nothing could be read.
    #[must_use]
    pub const fn unreadable(addr: u64, requested: usize) -> Self {
        Self {
            addr,
            requested,
            bytes: Vec::new(),
            availability: Availability::Unreadable,
        }
    }

    /// Classifies a delivered prefix against the requested length.
    ///
    /// Bytes past `requested` are dropped.
    #[must_use]
    pub fn from_prefix(addr: u64, requested: usize, mut bytes: Vec<u8>) -> Self {
        bytes.truncate(requested);
        let availability = match bytes.len() {
            n if n == requested => Availability::Full,
            0 => Availability::Unreadable,
            n => Availability::Partial(n),
        };
        Self {
            addr,
            requested,
            bytes,
            availability,
        }
    }

    /// Address of the first requested byte.
    #[must_use]
    pub const fn addr(&self) -> u64 {
        self.addr
    }

    /// Requested length in bytes.
    #[must_use]
    pub const fn requested(&self) -> usize {
        self.requested
    }

    /// Availability classification.
    #[must_use]
    pub const fn availability(&self) -> Availability {
        self.availability
    }

    /// Number of bytes actually read.
    #[must_use]
    pub fn available(&self) -> usize {
        self.bytes.len()
    }

    /// Bytes actually read.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns `true` when nothing was read.
    #[must_use]
    pub const fn is_unreadable(&self) -> bool {
        matches!(self.availability, Availability::Unreadable)
    }

    /// Returns `true` when `offset..offset + len` lies within the bytes read.
    #[must_use]
    pub fn covers(&self, offset: usize, len: usize) -> bool {
        offset
            .checked_add(len)
            .is_some_and(|end| end <= self.bytes.len())
    }

    /// Bytes at `offset..offset + len`, if read.
    #[must_use]
    pub fn slice(&self, offset: usize, len: usize) -> Option<&[u8]> {
        if self.covers(offset, len) {
            Some(&self.bytes[offset..offset + len])
        } else {
            None
        }
    }

    /// Sub-view over `offset..offset + len`, keeping whatever prefix of it
    /// was read.
    #[must_use]
    pub fn subview(&self, offset: usize, len: usize) -> Self {
        let start = offset.min(self.bytes.len());
        let end = offset.saturating_add(len).min(self.bytes.len());
        Self::from_prefix(
            self.addr.wrapping_add(offset as u64),
            len,
            self.bytes[start..end].to_vec(),
        )
    }

    /// Byte at `offset`.
    #[must_use]
    pub fn u8_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(offset).copied()
    }

    /// `u16` at `offset`.
    #[must_use]
    pub fn u16_at(&self, offset: usize, order: ByteOrder) -> Option<u16> {
        let bytes = self.slice(offset, 2)?;
        Some(order.u16_from([bytes[0], bytes[1]]))
    }

    /// `u32` at `offset`.
    #[must_use]
    pub fn u32_at(&self, offset: usize, order: ByteOrder) -> Option<u32> {
        let bytes = self.slice(offset, 4)?;
        Some(order.u32_from([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// `u64` at `offset`.
    #[must_use]
    pub fn u64_at(&self, offset: usize, order: ByteOrder) -> Option<u64> {
        let bytes = self.slice(offset, 8)?;
        let mut raw = [0_u8; 8];
        raw.copy_from_slice(bytes);
        Some(order.u64_from(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::{Availability, MemoryView};
    use crate::ByteOrder;

    #[test]
    fn prefix_classification() {
        assert_eq!(
            MemoryView::from_prefix(0x1000, 4, vec![1, 2, 3, 4]).availability(),
            Availability::Full
        );
        assert_eq!(
            MemoryView::from_prefix(0x1000, 4, vec![1, 2]).availability(),
            Availability::Partial(2)
        );
        assert_eq!(
            MemoryView::from_prefix(0x1000, 4, Vec::new()).availability(),
            Availability::Unreadable
        );
    }

    #[test]
    fn surplus_bytes_are_dropped() {
        let view = MemoryView::from_prefix(0x1000, 2, vec![1, 2, 3]);
        assert_eq!(view.bytes(), &[1, 2]);
        assert_eq!(view.availability(), Availability::Full);
    }

    #[test]
    fn accessors_refuse_unread_bytes() {
        let view = MemoryView::from_prefix(0x1000, 8, vec![0xd0, 0xd1, 0xd2, 0xd3, 0xff]);
        assert_eq!(view.u32_at(0, ByteOrder::Little), Some(0xd3d2_d1d0));
        assert_eq!(view.u32_at(1, ByteOrder::Little), Some(0xffd3_d2d1));
        assert_eq!(view.u32_at(2, ByteOrder::Little), None);
        assert_eq!(view.u64_at(0, ByteOrder::Little), None);
        assert!(view.covers(4, 1));
        assert!(!view.covers(4, 2));
        assert!(!view.covers(usize::MAX, 2));
    }

    #[test]
    fn subview_keeps_read_prefix() {
        let view = MemoryView::from_prefix(0x1000, 8, vec![1, 2, 3, 4, 5]);
        let sub = view.subview(2, 4);
        assert_eq!(sub.addr(), 0x1002);
        assert_eq!(sub.bytes(), &[3, 4, 5]);
        assert_eq!(sub.availability(), Availability::Partial(3));

        let beyond = view.subview(6, 2);
        assert!(beyond.is_unreadable());
    }
}
