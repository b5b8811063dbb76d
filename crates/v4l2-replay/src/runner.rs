//! Replays a parsed fixture through the dispatcher.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use v4l2_decode::{
    DecodeEvent, DecodeSink, DecoderConfig, Dispatcher, MemoryReader, RenderedArgument,
    SnapshotMemory, TraceLine, TracedMemory,
};

use crate::errors::ReplayError;
use crate::fixture::{parse_fixture, CommandRef, Directive, Fixture};

/// One decoded call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayRecord {
    /// Fixture line of the `ioctl` directive.
    pub line: usize,
    /// Resolved request code.
    pub code: u32,
    /// Assembled trace line.
    pub trace: TraceLine,
    /// Structured decode result.
    pub argument: RenderedArgument,
}

impl ReplayRecord {
    /// Encodes the record as one line of JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ReplayError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Replays `fixture` under `config`, forwarding decode events to `sink`.
///
/// Memory directives mutate one snapshot shared by entry and exit reads, so
/// a fixture models the post-call state by rewriting memory before the call.
///
/// # Errors
///
/// Returns [`ReplayError::Memory`] for writes outside mapped regions and
/// [`ReplayError::Command`] for unknown command names.
pub fn replay(
    fixture: &Fixture,
    config: DecoderConfig,
    sink: &mut dyn DecodeSink,
) -> Result<Vec<ReplayRecord>, ReplayError> {
    let dispatcher = Dispatcher::new(config);
    let order = config.platform.byte_order;
    let mut memory = SnapshotMemory::new();
    let mut records = Vec::with_capacity(fixture.call_count());

    for entry in &fixture.lines {
        let line = entry.line;
        match &entry.directive {
            Directive::Map { addr, len, pattern } => {
                let bytes = if *pattern {
                    fill_pattern(*len)
                } else {
                    vec![0; *len]
                };
                memory
                    .map(*addr, bytes)
                    .map_err(|source| ReplayError::Memory { line, source })?;
            }
            Directive::Bytes { addr, bytes } => memory
                .write(*addr, bytes)
                .map_err(|source| ReplayError::Memory { line, source })?,
            Directive::Word { addr, value } => memory
                .write(*addr, &order.u32_bytes(*value))
                .map_err(|source| ReplayError::Memory { line, source })?,
            Directive::Ioctl {
                fd,
                command,
                addr,
                outcome,
                injected,
            } => {
                let code = match command {
                    CommandRef::Code(code) => *code,
                    CommandRef::Name(name) => {
                        dispatcher
                            .catalog()
                            .by_name(name)
                            .map_err(|source| ReplayError::Command { line, source })?
                            .code
                    }
                };
                let reader = TracedMemory::new(&memory, config.short_reads);
                let exit: Option<&dyn MemoryReader> = if outcome.succeeded() {
                    Some(&reader)
                } else {
                    None
                };
                let argument = dispatcher.dispatch_traced(code, *addr, &reader, exit, sink);
                let trace = TraceLine::new(*fd, dispatcher.command_name(code), &argument, *outcome)
                    .injected(*injected);
                records.push(ReplayRecord {
                    line,
                    code,
                    trace,
                    argument,
                });
            }
        }
    }
    Ok(records)
}

/// Reads, parses and replays the fixture at `path`.
///
/// # Errors
///
/// Returns [`ReplayError::Io`] when the file cannot be read, plus every
/// error [`parse_fixture`] and [`replay`] report.
pub fn replay_file(
    path: &Path,
    config: DecoderConfig,
    sink: &mut dyn DecodeSink,
) -> Result<Vec<ReplayRecord>, ReplayError> {
    let source = fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let fixture = parse_fixture(&source)?;
    replay(&fixture, config, sink)
}

/// Rolling byte pattern used to fill argument buffers.
#[must_use]
pub fn fill_pattern(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| 0x80 | u8::try_from(i % 0x80).unwrap_or_default())
        .collect()
}

/// Writes each decode event to a stream as one `trace:` line.
///
/// Events keep flowing after a failed write; the first failure is kept for
/// [`WriterSink::error`].
#[derive(Debug)]
pub struct WriterSink<W> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> WriterSink<W> {
    /// Wraps `out`.
    pub const fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// First write failure seen, if any.
    pub const fn error(&self) -> Option<&io::Error> {
        self.error.as_ref()
    }

    /// Returns the wrapped stream.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DecodeSink for WriterSink<W> {
    fn on_event(&mut self, event: DecodeEvent) {
        let written = match serde_json::to_string(&event) {
            Ok(json) => writeln!(self.out, "trace: {json}"),
            Err(_) => writeln!(self.out, "trace: {event:?}"),
        };
        if let Err(error) = written {
            self.error.get_or_insert(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{fill_pattern, replay, WriterSink};
    use crate::errors::ReplayError;
    use crate::fixture::parse_fixture;
    use std::io::{self, Write};
    use v4l2_decode::{DecoderConfig, NullSink, RecordingSink, ReadFault};

    #[test]
    fn pattern_wraps_after_128_bytes() {
        let bytes = fill_pattern(130);
        assert_eq!(bytes[0], 0x80);
        assert_eq!(bytes[127], 0xff);
        assert_eq!(bytes[128], 0x80);
    }

    #[test]
    fn replays_reqbufs_success_and_failure() {
        let fixture = parse_fixture(
            "fill 0x1000 20\n\
             u32 0x1000 0xfeedface\n\
             u32 0x1004 V4L2_BUF_TYPE_VIDEO_CAPTURE\n\
             u32 0x1008 V4L2_MEMORY_MMAP\n\
             ioctl -1 VIDIOC_REQBUFS 0x1000 = 42 INJECTED\n\
             u32 0x1000 2\n\
             ioctl -1 VIDIOC_REQBUFS 0x1000 = -1 EINVAL\n",
        )
        .expect("fixture parses");

        let records = replay(&fixture, DecoderConfig::default(), &mut NullSink).expect("replay");
        let lines: Vec<String> = records.iter().map(|record| record.trace.to_string()).collect();
        assert_eq!(
            lines,
            [
                "ioctl(-1, VIDIOC_REQBUFS, {type=V4L2_BUF_TYPE_VIDEO_CAPTURE, \
                 memory=V4L2_MEMORY_MMAP, count=4277009102 => 4277009102}) = 42 (INJECTED)",
                "ioctl(-1, VIDIOC_REQBUFS, {type=V4L2_BUF_TYPE_VIDEO_CAPTURE, \
                 memory=V4L2_MEMORY_MMAP, count=2}) = -1 EINVAL (Invalid argument)",
            ]
        );
        assert_eq!(records[0].line, 5);
        assert_eq!(records[1].line, 7);
    }

    #[test]
    fn raw_codes_print_as_ioc_expressions() {
        let fixture = parse_fixture("ioctl -1 0xc01056ff 0x1000 = 42\n").expect("fixture parses");
        let records = replay(&fixture, DecoderConfig::default(), &mut NullSink).expect("replay");
        assert_eq!(
            records[0].trace.to_string(),
            "ioctl(-1, _IOC(_IOC_READ|_IOC_WRITE, 0x56, 0xff, 0x10), 0x1000) = 42"
        );
    }

    #[test]
    fn writes_outside_mappings_fail_with_line() {
        let fixture = parse_fixture("map 0x1000 4\nu32 0x1002 1\n").expect("fixture parses");
        let error = replay(&fixture, DecoderConfig::default(), &mut NullSink)
            .expect_err("write overruns region");
        assert!(matches!(
            error,
            ReplayError::Memory {
                line: 2,
                source: ReadFault::Unmapped { .. }
            }
        ));
    }

    #[test]
    fn unknown_command_names_fail() {
        let fixture = parse_fixture("ioctl -1 VIDIOC_BOGUS NULL = 0\n").expect("fixture parses");
        let error = replay(&fixture, DecoderConfig::default(), &mut NullSink)
            .expect_err("unknown command");
        assert_eq!(error.to_string(), "line 1: unknown ioctl command `VIDIOC_BOGUS`");
    }

    #[test]
    fn tracing_reaches_the_sink_only_when_enabled() {
        let fixture =
            parse_fixture("map 0x1000 4\nioctl -1 VIDIOC_G_INPUT 0x1000 = 0\n").expect("parses");

        let mut quiet = RecordingSink::new();
        replay(&fixture, DecoderConfig::default(), &mut quiet).expect("replay");
        assert!(quiet.events().is_empty());

        let config = DecoderConfig {
            tracing_enabled: true,
            ..DecoderConfig::default()
        };
        let mut sink = WriterSink::new(Vec::new());
        replay(&fixture, config, &mut sink).expect("replay");
        let text = String::from_utf8(sink.into_inner()).expect("utf8");
        assert!(text.starts_with("trace: {\"CommandResolved\""), "{text}");
        assert!(text.lines().all(|line| line.starts_with("trace: ")));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writer_sink_keeps_the_first_write_error() {
        let fixture =
            parse_fixture("map 0x1000 4\nioctl -1 VIDIOC_G_INPUT 0x1000 = 0\n").expect("parses");
        let config = DecoderConfig {
            tracing_enabled: true,
            ..DecoderConfig::default()
        };

        let mut sink = WriterSink::new(FailingWriter);
        let records = replay(&fixture, config, &mut sink).expect("replay still succeeds");
        assert_eq!(records.len(), 1);
        let error = sink.error().expect("write failure recorded");
        assert_eq!(error.kind(), io::ErrorKind::BrokenPipe);

        let mut healthy = WriterSink::new(Vec::new());
        replay(&fixture, config, &mut healthy).expect("replay");
        assert!(healthy.error().is_none());
    }

    #[test]
    fn records_serialize_to_json() {
        let fixture = parse_fixture("ioctl -1 VIDIOC_QUERYCAP NULL = 0\n").expect("parses");
        let records = replay(&fixture, DecoderConfig::default(), &mut NullSink).expect("replay");
        let json = records[0].to_json().expect("json");
        assert!(json.starts_with("{\"line\":1,\"code\":2154321408,"), "{json}");
        assert!(json.contains("\"argument\":\"NULL\""), "{json}");
    }
}
