//! Target platform description and decoder configuration.

/// Byte order of the traced process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ByteOrder {
    /// Least significant byte first.
    #[default]
    Little,
    /// Most significant byte first.
    Big,
}

impl ByteOrder {
    /// Reads a `u16` from exactly two bytes.
    #[must_use]
    pub const fn u16_from(self, bytes: [u8; 2]) -> u16 {
        match self {
            Self::Little => u16::from_le_bytes(bytes),
            Self::Big => u16::from_be_bytes(bytes),
        }
    }

    /// Reads a `u32` from exactly four bytes.
    #[must_use]
    pub const fn u32_from(self, bytes: [u8; 4]) -> u32 {
        match self {
            Self::Little => u32::from_le_bytes(bytes),
            Self::Big => u32::from_be_bytes(bytes),
        }
    }

    /// Reads a `u64` from exactly eight bytes.
    #[must_use]
    pub const fn u64_from(self, bytes: [u8; 8]) -> u64 {
        match self {
            Self::Little => u64::from_le_bytes(bytes),
            Self::Big => u64::from_be_bytes(bytes),
        }
    }

    /// Encodes a `u32` in this byte order.
    #[must_use]
    pub const fn u32_bytes(self, value: u32) -> [u8; 4] {
        match self {
            Self::Little => value.to_le_bytes(),
            Self::Big => value.to_be_bytes(),
        }
    }
}

/// Pointer width of the traced process ABI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum PointerWidth {
    /// ILP32 personalities.
    Bits32,
    /// LP64 personalities.
    #[default]
    Bits64,
}

impl PointerWidth {
    /// Size of a pointer in bytes.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::Bits32 => 4,
            Self::Bits64 => 8,
        }
    }
}

/// Build-time facts about the traced platform, consumed once when a
/// [`crate::Catalog`] is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Platform {
    /// Byte order used for every multi-byte field.
    pub byte_order: ByteOrder,
    /// Pointer width; affects union alignment inside `v4l2_format`.
    pub pointer_width: PointerWidth,
    /// Whether `v4l2_capability` carries the trailing `device_caps` field.
    pub has_device_caps: bool,
}

impl Default for Platform {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::Little,
            pointer_width: PointerWidth::Bits64,
            has_device_caps: true,
        }
    }
}

/// Rendering style for symbolic values, mirroring the tracer's `-X` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum XlatStyle {
    /// Numbers only.
    Raw,
    /// Symbolic names, falling back to numbers for unknown values.
    #[default]
    Abbrev,
    /// Numbers followed by the symbolic rendering in a comment.
    Verbose,
}

/// How a read that delivered only a prefix of the requested range is
/// reported to the structure decoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ShortReadPolicy {
    /// A short read counts as unreadable; nothing is decoded.
    #[default]
    Reject,
    /// A short read yields a `Partial` view; fields that fit are decoded.
    Truncate,
}

/// Top-level immutable configuration for a decoder instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DecoderConfig {
    /// Target platform description.
    pub platform: Platform,
    /// Symbolic rendering style.
    pub xlat_style: XlatStyle,
    /// Short-read reporting policy.
    pub short_reads: ShortReadPolicy,
    /// Enables dispatch of [`crate::DecodeEvent`]s to the supplied sink.
    pub tracing_enabled: bool,
}
