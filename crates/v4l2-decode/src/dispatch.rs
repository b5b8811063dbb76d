//! Command dispatcher: maps an ioctl code to the decoder for its argument.

use crate::catalog::Catalog;
use crate::command::{ioc_name, Command};
use crate::decode::{DecodedStructure, Marker, StructDecoder};
use crate::format::format_pointer;
use crate::memory::{MemoryReader, MemoryView};
use crate::trace::{DecodeEvent, DecodeSink, NullSink};
use crate::DecoderConfig;

/// Why an argument was rendered as a bare pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum PointerReason {
    /// The command code is not in the table.
    Unrecognized,
    /// Every field is output-only and the call did not return successfully.
    NoVisibleFields,
}

/// Argument rendering handed to the output assembler.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RenderedArgument {
    /// Only the pointer value is printed.
    PointerOnly {
        /// Argument address.
        addr: u64,
        /// Reason no structure was decoded.
        reason: PointerReason,
    },
    /// A known command's argument was decoded.
    Decoded {
        /// Argument address.
        addr: u64,
        /// Command descriptor.
        command: Command,
        /// Decoded structure; `Unreadable` structures render as the pointer.
        structure: DecodedStructure,
    },
}

impl RenderedArgument {
    /// Argument address.
    #[must_use]
    pub const fn addr(&self) -> u64 {
        match self {
            Self::PointerOnly { addr, .. } | Self::Decoded { addr, .. } => *addr,
        }
    }

    /// Terminal marker of the decoded structure, if one was decoded.
    #[must_use]
    pub const fn marker(&self) -> Option<Marker> {
        match self {
            Self::PointerOnly { .. } => None,
            Self::Decoded { structure, .. } => Some(structure.marker),
        }
    }

    /// Argument text: `NULL`, `0x...`, `{field=value, ...}` or `[value]`.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::PointerOnly { addr, .. } => format_pointer(*addr),
            Self::Decoded {
                addr, structure, ..
            } => structure
                .render_body()
                .unwrap_or_else(|| format_pointer(*addr)),
        }
    }
}

/// Stateless per-call dispatcher over a read-only [`Catalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatcher {
    config: DecoderConfig,
    catalog: Catalog,
    decoder: StructDecoder,
}

impl Dispatcher {
    /// Builds the catalog and decoder for `config`.
    #[must_use]
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            catalog: Catalog::new(config.platform),
            decoder: StructDecoder::new(config.platform, config.xlat_style),
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Command table and layouts.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// `VIDIOC_*` name of `code`, or its `_IOC(...)` expression.
    #[must_use]
    pub fn command_name(&self, code: u32) -> String {
        self.catalog
            .by_code(code)
            .map_or_else(|| ioc_name(code), |command| command.name.to_string())
    }

    /// Decodes the argument of one call without tracing.
    ///
    /// `exit` is the post-call reader and must be `None` when the call did
    /// not return successfully.
    #[must_use]
    pub fn dispatch(
        &self,
        code: u32,
        addr: u64,
        entry: &dyn MemoryReader,
        exit: Option<&dyn MemoryReader>,
    ) -> RenderedArgument {
        self.dispatch_traced(code, addr, entry, exit, &mut NullSink)
    }

    /// Decodes the argument of one call, reporting to `sink` when tracing
    /// is enabled.
    pub fn dispatch_traced(
        &self,
        code: u32,
        addr: u64,
        entry: &dyn MemoryReader,
        exit: Option<&dyn MemoryReader>,
        sink: &mut dyn DecodeSink,
    ) -> RenderedArgument {
        let tracing = self.config.tracing_enabled;
        let mut emit = |event: DecodeEvent| {
            if tracing {
                sink.on_event(event);
            }
        };

        let Some(command) = self.catalog.by_code(code) else {
            emit(DecodeEvent::CommandUnrecognized { code });
            return RenderedArgument::PointerOnly {
                addr,
                reason: PointerReason::Unrecognized,
            };
        };
        emit(DecodeEvent::CommandResolved {
            code,
            name: command.name,
        });

        let layout = self.catalog.layout(command.argument);
        if addr == 0 {
            let structure = DecodedStructure::unreadable(layout.name, layout.shape);
            emit(structure_event(&structure));
            return RenderedArgument::Decoded {
                addr,
                command: *command,
                structure,
            };
        }
        if !layout.has_visible_fields(exit.is_some()) {
            return RenderedArgument::PointerOnly {
                addr,
                reason: PointerReason::NoVisibleFields,
            };
        }

        let entry_view = entry.read(addr, layout.size);
        emit(read_event(&entry_view, false));
        let exit_view = exit.map(|reader| reader.read(addr, layout.size));
        if let Some(view) = &exit_view {
            emit(read_event(view, true));
        }

        let structure = self.decoder.decode(layout, &entry_view, exit_view.as_ref());
        emit(structure_event(&structure));
        RenderedArgument::Decoded {
            addr,
            command: *command,
            structure,
        }
    }

    /// Decodes already captured snapshots of a known command's argument.
    #[must_use]
    pub fn decode_views(
        &self,
        command: &Command,
        entry: &MemoryView,
        exit: Option<&MemoryView>,
    ) -> DecodedStructure {
        self.decoder
            .decode(self.catalog.layout(command.argument), entry, exit)
    }
}

fn read_event(view: &MemoryView, exiting: bool) -> DecodeEvent {
    DecodeEvent::ArgumentRead {
        addr: view.addr(),
        requested: view.requested(),
        available: view.available(),
        exiting,
    }
}

fn structure_event(structure: &DecodedStructure) -> DecodeEvent {
    DecodeEvent::StructureDecoded {
        layout: structure.layout,
        fields: structure.fields.len(),
        marker: structure.marker,
    }
}

#[cfg(test)]
mod tests {
    use super::{Dispatcher, PointerReason, RenderedArgument};
    use crate::decode::Marker;
    use crate::memory::{MemoryReader, SnapshotMemory, TracedMemory};
    use crate::trace::{DecodeEvent, RecordingSink};
    use crate::{DecoderConfig, ShortReadPolicy};

    const QUERYCAP: u32 = 0x8068_5600;
    const REQBUFS: u32 = 0xc014_5608;

    fn memory() -> SnapshotMemory {
        let mut memory = SnapshotMemory::new();
        let mut reqbufs = Vec::new();
        reqbufs.extend_from_slice(&4_u32.to_le_bytes());
        reqbufs.extend_from_slice(&1_u32.to_le_bytes());
        reqbufs.extend_from_slice(&1_u32.to_le_bytes());
        reqbufs.extend_from_slice(&[0; 8]);
        assert!(memory.map(0x1000, reqbufs).is_ok());
        memory
    }

    #[test]
    fn unknown_code_renders_pointer() {
        let dispatcher = Dispatcher::new(DecoderConfig::default());
        let memory = TracedMemory::new(memory(), ShortReadPolicy::Reject);
        let rendered = dispatcher.dispatch(0xc010_56ff, 0x1000, &memory, Some(&memory));
        assert_eq!(
            rendered,
            RenderedArgument::PointerOnly {
                addr: 0x1000,
                reason: PointerReason::Unrecognized
            }
        );
        assert_eq!(rendered.render(), "0x1000");
        assert_eq!(
            dispatcher.command_name(0xc010_56ff),
            "_IOC(_IOC_READ|_IOC_WRITE, 0x56, 0xff, 0x10)"
        );
    }

    #[test]
    fn null_pointer_is_unreadable() {
        let dispatcher = Dispatcher::new(DecoderConfig::default());
        let memory = TracedMemory::new(memory(), ShortReadPolicy::Reject);
        let rendered = dispatcher.dispatch(REQBUFS, 0, &memory, Some(&memory));
        assert_eq!(rendered.marker(), Some(Marker::Unreadable));
        assert_eq!(rendered.render(), "NULL");
    }

    #[test]
    fn output_only_argument_of_failed_call_is_pointer() {
        let dispatcher = Dispatcher::new(DecoderConfig::default());
        let memory = TracedMemory::new(memory(), ShortReadPolicy::Reject);
        let rendered = dispatcher.dispatch(QUERYCAP, 0x1000, &memory, None);
        assert_eq!(
            rendered,
            RenderedArgument::PointerOnly {
                addr: 0x1000,
                reason: PointerReason::NoVisibleFields
            }
        );
    }

    #[test]
    fn request_buffers_round_trip() {
        let dispatcher = Dispatcher::new(DecoderConfig::default());
        let memory = TracedMemory::new(memory(), ShortReadPolicy::Reject);
        let rendered = dispatcher.dispatch(REQBUFS, 0x1000, &memory, Some(&memory));
        assert_eq!(
            rendered.render(),
            "{type=V4L2_BUF_TYPE_VIDEO_CAPTURE, memory=V4L2_MEMORY_MMAP, count=4 => 4}"
        );

        let failed = dispatcher.dispatch(REQBUFS, 0x1000, &memory, None);
        assert_eq!(
            failed.render(),
            "{type=V4L2_BUF_TYPE_VIDEO_CAPTURE, memory=V4L2_MEMORY_MMAP, count=4}"
        );
    }

    #[test]
    fn tracing_reports_reads_when_enabled() {
        let traced = Dispatcher::new(DecoderConfig {
            tracing_enabled: true,
            ..DecoderConfig::default()
        });
        let memory = TracedMemory::new(memory(), ShortReadPolicy::Reject);
        let reader: &dyn MemoryReader = &memory;

        let mut sink = RecordingSink::new();
        let _ = traced.dispatch_traced(REQBUFS, 0x1000, reader, None, &mut sink);
        assert_eq!(
            sink.events(),
            &[
                DecodeEvent::CommandResolved {
                    code: REQBUFS,
                    name: "VIDIOC_REQBUFS"
                },
                DecodeEvent::ArgumentRead {
                    addr: 0x1000,
                    requested: 20,
                    available: 20,
                    exiting: false
                },
                DecodeEvent::StructureDecoded {
                    layout: "v4l2_requestbuffers",
                    fields: 3,
                    marker: Marker::Complete
                },
            ]
        );

        let quiet = Dispatcher::new(DecoderConfig::default());
        let mut sink = RecordingSink::new();
        let _ = quiet.dispatch_traced(REQBUFS, 0x1000, reader, None, &mut sink);
        assert!(sink.events().is_empty());
    }
}
