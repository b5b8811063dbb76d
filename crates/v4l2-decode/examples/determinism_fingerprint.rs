//! Decode fingerprint generator used for cross-host output comparison.

use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use v4l2_decode::{
    ByteOrder, CallOutcome, DecoderConfig, Dispatcher, Errno, MemoryReader, Platform,
    PointerWidth, ShortReadPolicy, SnapshotMemory, TraceLine, TracedMemory, XlatStyle,
};

const ARGUMENT: u64 = 0x7f00_0000_0f00;

fn hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= u64::from(*byte);
        *hash = hash.wrapping_mul(0x1000_0000_01B3);
    }
}

/// Pseudo-random but fixed argument bytes, varied per round.
fn argument_bytes(round: u8) -> Vec<u8> {
    let mut state = 0x9e37_79b9_u32 ^ u32::from(round);
    (0..256)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state.to_le_bytes()[0] % 16
        })
        .collect()
}

fn configs() -> Vec<DecoderConfig> {
    let mut configs = Vec::new();
    for byte_order in [ByteOrder::Little, ByteOrder::Big] {
        for pointer_width in [PointerWidth::Bits32, PointerWidth::Bits64] {
            for xlat_style in [XlatStyle::Raw, XlatStyle::Abbrev, XlatStyle::Verbose] {
                configs.push(DecoderConfig {
                    platform: Platform {
                        byte_order,
                        pointer_width,
                        has_device_caps: true,
                    },
                    xlat_style,
                    short_reads: ShortReadPolicy::Truncate,
                    tracing_enabled: false,
                });
            }
        }
    }
    configs
}

fn fingerprint() -> String {
    let mut hash = 0xcbf2_9ce4_8422_2325_u64;

    for config in configs() {
        let dispatcher = Dispatcher::new(config);
        for round in 0..4_u8 {
            let mut memory = SnapshotMemory::new();
            if memory.map(ARGUMENT, argument_bytes(round)).is_err() {
                continue;
            }
            let reader = TracedMemory::new(memory, config.short_reads);

            for command in dispatcher.catalog().commands() {
                for addr in [0, ARGUMENT, ARGUMENT + 0xf0] {
                    for outcome in [CallOutcome::Returned(0), CallOutcome::Failed(Errno(22))] {
                        let exit: Option<&dyn MemoryReader> = if outcome.succeeded() {
                            Some(&reader)
                        } else {
                            None
                        };
                        let argument = dispatcher.dispatch(command.code, addr, &reader, exit);
                        let line = TraceLine::new(3, command.name, &argument, outcome);
                        hash_bytes(&mut hash, line.to_string().as_bytes());
                        hash_bytes(&mut hash, b"\n");
                    }
                }
            }
        }
    }

    format!("{hash:016x}")
}

fn main() {
    println!("{}", fingerprint());
}
