//! Reading argument memory out of the traced process.
//!
//! [`MemoryTransport`] is the raw byte pump a tracer provides (ptrace peeks,
//! `process_vm_readv`, a captured snapshot). [`TracedMemory`] adapts it to
//! the [`MemoryReader`] contract the structure decoders consume: it never
//! fails, it classifies what came back.

use crate::{MemoryView, ReadFault, ShortReadPolicy};

/// Source of argument bytes for the structure decoders.
pub trait MemoryReader {
    /// Reads `len` bytes at `addr`.
    ///
    /// Implementations report failures through the returned view's
    /// availability and never panic on bad addresses.
    fn read(&self, addr: u64, len: usize) -> MemoryView;
}

/// Raw transport that copies bytes from the traced address space.
pub trait MemoryTransport {
    /// Copies as many bytes as are readable starting at `addr` into `buf`
    /// and returns how many were copied.
    ///
    /// A return of `Ok(n)` with `n < buf.len()` means the readable range
    /// ended after `n` bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`ReadFault`] when not even the first byte is readable or
    /// the transport itself failed.
    fn read_prefix(&self, addr: u64, buf: &mut [u8]) -> Result<usize, ReadFault>;
}

impl<T: MemoryTransport + ?Sized> MemoryTransport for &T {
    fn read_prefix(&self, addr: u64, buf: &mut [u8]) -> Result<usize, ReadFault> {
        (**self).read_prefix(addr, buf)
    }
}

/// [`MemoryReader`] over a transport, applying the null-pointer and
/// short-read conventions.
#[derive(Debug, Clone, Copy)]
pub struct TracedMemory<T> {
    transport: T,
    short_reads: ShortReadPolicy,
}

impl<T: MemoryTransport> TracedMemory<T> {
    /// Wraps `transport` with the given short-read policy.
    pub const fn new(transport: T, short_reads: ShortReadPolicy) -> Self {
        Self {
            transport,
            short_reads,
        }
    }

    /// Underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: MemoryTransport> MemoryReader for TracedMemory<T> {
    fn read(&self, addr: u64, len: usize) -> MemoryView {
        if len == 0 {
            return MemoryView::full(addr, Vec::new());
        }
        if addr == 0 {
            return MemoryView::unreadable(addr, len);
        }

        let mut buf = vec![0_u8; len];
        let copied = match self.transport.read_prefix(addr, &mut buf) {
            Ok(copied) => copied.min(len),
            Err(_) => return MemoryView::unreadable(addr, len),
        };

        if copied < len && self.short_reads == ShortReadPolicy::Reject {
            return MemoryView::unreadable(addr, len);
        }

        buf.truncate(copied);
        MemoryView::from_prefix(addr, len, buf)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::{MemoryReader, MemoryTransport, TracedMemory};
    use crate::{Availability, ReadFault, ShortReadPolicy};

    /// Readable window `[0x1000, 0x1010)` filled with its low address byte.
    #[derive(Default)]
    struct Window {
        calls: Cell<usize>,
    }

    impl MemoryTransport for Window {
        fn read_prefix(&self, addr: u64, buf: &mut [u8]) -> Result<usize, ReadFault> {
            self.calls.set(self.calls.get() + 1);
            if !(0x1000..0x1010).contains(&addr) {
                return Err(ReadFault::Unmapped { addr });
            }
            let mut copied = 0;
            for (slot, at) in buf.iter_mut().zip(addr..0x1010) {
                *slot = (at & 0xff) as u8;
                copied += 1;
            }
            Ok(copied)
        }
    }

    #[test]
    fn null_pointer_is_unreadable_without_touching_transport() {
        let memory = TracedMemory::new(Window::default(), ShortReadPolicy::Truncate);
        let view = memory.read(0, 16);
        assert_eq!(view.availability(), Availability::Unreadable);
        assert_eq!(memory.transport().calls.get(), 0);
    }

    #[test]
    fn full_read() {
        let memory = TracedMemory::new(Window::default(), ShortReadPolicy::Reject);
        let view = memory.read(0x1004, 4);
        assert_eq!(view.availability(), Availability::Full);
        assert_eq!(view.bytes(), &[0x04, 0x05, 0x06, 0x07]);
    }

    #[test]
    fn short_read_policy_controls_partial_views() {
        let truncating = TracedMemory::new(Window::default(), ShortReadPolicy::Truncate);
        let view = truncating.read(0x100c, 8);
        assert_eq!(view.availability(), Availability::Partial(4));
        assert_eq!(view.bytes(), &[0x0c, 0x0d, 0x0e, 0x0f]);

        let rejecting = TracedMemory::new(Window::default(), ShortReadPolicy::Reject);
        assert!(rejecting.read(0x100c, 8).is_unreadable());
    }

    #[test]
    fn struct_with_only_last_byte_mapped_is_unreadable() {
        let memory = TracedMemory::new(Window::default(), ShortReadPolicy::Reject);
        assert!(memory.read(0x100f, 104).is_unreadable());
    }

    #[test]
    fn transport_fault_is_unreadable() {
        let memory = TracedMemory::new(Window::default(), ShortReadPolicy::Truncate);
        assert!(memory.read(0x2000, 4).is_unreadable());
    }
}
