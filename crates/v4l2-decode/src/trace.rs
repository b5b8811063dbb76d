//! Deterministic decode trace hooks.

use crate::decode::Marker;

/// Event emitted by the dispatcher when tracing is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DecodeEvent {
    /// The command code matched a table entry.
    CommandResolved {
        /// Raw command code.
        code: u32,
        /// Symbolic command name.
        name: &'static str,
    },
    /// The command code is not in the table; the argument prints as a pointer.
    CommandUnrecognized {
        /// Raw command code.
        code: u32,
    },
    /// Argument bytes were requested from the traced process.
    ArgumentRead {
        /// Argument address.
        addr: u64,
        /// Bytes requested.
        requested: usize,
        /// Bytes actually delivered.
        available: usize,
        /// True for the post-call snapshot.
        exiting: bool,
    },
    /// A structure finished decoding.
    StructureDecoded {
        /// C structure name.
        layout: &'static str,
        /// Number of fields emitted.
        fields: usize,
        /// Terminal marker.
        marker: Marker,
    },
}

/// Sink trait for decode trace hooks.
pub trait DecodeSink {
    /// Records an event in decode order.
    fn on_event(&mut self, event: DecodeEvent);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullSink;

impl DecodeSink for NullSink {
    fn on_event(&mut self, _event: DecodeEvent) {}
}

/// Sink that keeps every event in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingSink {
    events: Vec<DecodeEvent>,
}

impl RecordingSink {
    /// Creates an empty sink.
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[DecodeEvent] {
        &self.events
    }

    /// Drains the recorded events.
    pub fn take(&mut self) -> Vec<DecodeEvent> {
        std::mem::take(&mut self.events)
    }
}

impl DecodeSink for RecordingSink {
    fn on_event(&mut self, event: DecodeEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::{DecodeEvent, DecodeSink, RecordingSink};

    #[test]
    fn recording_sink_keeps_order_and_drains() {
        let mut sink = RecordingSink::new();
        sink.on_event(DecodeEvent::CommandUnrecognized { code: 1 });
        sink.on_event(DecodeEvent::CommandUnrecognized { code: 2 });
        assert_eq!(
            sink.events(),
            &[
                DecodeEvent::CommandUnrecognized { code: 1 },
                DecodeEvent::CommandUnrecognized { code: 2 },
            ]
        );
        assert_eq!(sink.take().len(), 2);
        assert!(sink.events().is_empty());
    }
}
