#![no_main]

use libfuzzer_sys::fuzz_target;
use v4l2_decode::{
    CallOutcome, DecoderConfig, Dispatcher, MemoryReader, MemoryView, Platform, PointerWidth,
    ShortReadPolicy, SnapshotMemory, TraceLine, TracedMemory, XlatStyle,
};

const ARGUMENT: u64 = 0x10_0000;

fuzz_target!(|data: &[u8]| {
    if data.len() < 6 {
        return;
    }

    let selector = data[0];
    let code = u32::from_le_bytes([data[1], data[2], data[3], data[4]]);
    let cut = usize::from(data[5]);
    let payload = &data[6..];

    let config = DecoderConfig {
        platform: Platform {
            pointer_width: if selector & 1 == 0 {
                PointerWidth::Bits64
            } else {
                PointerWidth::Bits32
            },
            has_device_caps: selector & 2 == 0,
            ..Platform::default()
        },
        xlat_style: match (selector >> 2) & 3 {
            0 => XlatStyle::Raw,
            1 => XlatStyle::Verbose,
            _ => XlatStyle::Abbrev,
        },
        short_reads: if selector & 0x10 == 0 {
            ShortReadPolicy::Reject
        } else {
            ShortReadPolicy::Truncate
        },
        tracing_enabled: false,
    };
    let dispatcher = Dispatcher::new(config);
    let commands = dispatcher.catalog().commands();
    let code = if selector & 0x20 == 0 {
        commands[code as usize % commands.len()].code
    } else {
        code
    };

    let mut memory = SnapshotMemory::new();
    if !payload.is_empty() && memory.map(ARGUMENT, payload.to_vec()).is_err() {
        return;
    }
    let reader = TracedMemory::new(memory, config.short_reads);
    let exit: Option<&dyn MemoryReader> = if selector & 0x40 == 0 {
        Some(&reader)
    } else {
        None
    };

    let argument = dispatcher.dispatch(code, ARGUMENT, &reader, exit);
    let outcome = CallOutcome::Returned(0);
    let _ = TraceLine::new(-1, dispatcher.command_name(code), &argument, outcome).to_string();

    if let Some(command) = dispatcher.catalog().by_code(code) {
        let prefix = payload[..cut.min(payload.len())].to_vec();
        let view = MemoryView::from_prefix(ARGUMENT, payload.len().max(1), prefix);
        let decoded = dispatcher.decode_views(command, &view, Some(&view));
        let _ = decoded.render_body();
    }
});
