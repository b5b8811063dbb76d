//! Memory reader abstractions over the traced process's address space.

/// Transport trait and the never-failing reader adapter.
pub mod reader;
/// Region-based address-space snapshots.
pub mod snapshot;
/// Read results and their availability classification.
pub mod view;

pub use reader::{MemoryReader, MemoryTransport, TracedMemory};
pub use snapshot::{MappedRegion, SnapshotMemory};
pub use view::{Availability, MemoryView};
