//! `_IOC` command encoding and the V4L2 command descriptors.

use crate::xlat::hex;

/// Data-flow direction encoded in the top two bits of a command code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Direction {
    /// `_IOC_NONE`: no argument transfer.
    None,
    /// `_IOC_WRITE`: the caller passes data to the driver.
    Write,
    /// `_IOC_READ`: the driver writes data back.
    Read,
    /// `_IOC_READ|_IOC_WRITE`.
    ReadWrite,
}

/// Bit position of the direction field.
pub const IOC_DIRSHIFT: u32 = 30;
/// Bit position of the size field.
pub const IOC_SIZESHIFT: u32 = 16;
/// Bit position of the type field.
pub const IOC_TYPESHIFT: u32 = 8;
/// Width mask of the size field.
pub const IOC_SIZEMASK: u32 = 0x3fff;
/// `'V'`, the V4L2 ioctl type.
pub const V4L2_IOC_TYPE: u8 = b'V';

impl Direction {
    /// Two-bit `_IOC` direction value.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Write => 1,
            Self::Read => 2,
            Self::ReadWrite => 3,
        }
    }

    /// Direction stored in `code`.
    #[must_use]
    pub const fn of(code: u32) -> Self {
        match code >> IOC_DIRSHIFT {
            0 => Self::None,
            1 => Self::Write,
            2 => Self::Read,
            _ => Self::ReadWrite,
        }
    }

    /// Symbolic `_IOC_*` expression.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::None => "_IOC_NONE",
            Self::Write => "_IOC_WRITE",
            Self::Read => "_IOC_READ",
            Self::ReadWrite => "_IOC_READ|_IOC_WRITE",
        }
    }
}

/// Builds an `_IOC(dir, type, nr, size)` command code.
///
/// `size` is masked to the 14-bit size field.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn ioc(direction: Direction, ty: u8, nr: u8, size: usize) -> u32 {
    (direction.bits() << IOC_DIRSHIFT)
        | (((size as u32) & IOC_SIZEMASK) << IOC_SIZESHIFT)
        | ((ty as u32) << IOC_TYPESHIFT)
        | nr as u32
}

/// Argument size stored in `code`.
#[must_use]
pub const fn ioc_size(code: u32) -> usize {
    ((code >> IOC_SIZESHIFT) & IOC_SIZEMASK) as usize
}

/// Renders an unrecognized command code as its `_IOC(...)` expression.
#[must_use]
pub fn ioc_name(code: u32) -> String {
    format!(
        "_IOC({}, {}, {}, {})",
        Direction::of(code).symbol(),
        hex(u64::from((code >> IOC_TYPESHIFT) & 0xff)),
        hex(u64::from(code & 0xff)),
        hex(u64::from((code >> IOC_SIZESHIFT) & IOC_SIZEMASK))
    )
}

/// Argument structure a command carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ArgumentKind {
    /// `struct v4l2_capability`.
    Capability,
    /// `struct v4l2_fmtdesc`.
    FormatDescription,
    /// `struct v4l2_format` filled in by the driver.
    FormatGet,
    /// `struct v4l2_format` supplied by the caller and adjusted by the driver.
    FormatSet,
    /// `struct v4l2_requestbuffers`.
    RequestBuffers,
    /// `struct v4l2_input`.
    Input,
    /// `int` holding a buffer type.
    BufferType,
    /// `int` input index returned by the driver.
    InputIndexOut,
    /// `int` input index supplied by the caller.
    InputIndexIn,
}

impl ArgumentKind {
    /// Every argument kind, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Capability,
        Self::FormatDescription,
        Self::FormatGet,
        Self::FormatSet,
        Self::RequestBuffers,
        Self::Input,
        Self::BufferType,
        Self::InputIndexOut,
        Self::InputIndexIn,
    ];
}

/// One entry of the command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Command {
    /// Full command code for the target platform.
    pub code: u32,
    /// `VIDIOC_*` name.
    pub name: &'static str,
    /// Direction of the argument transfer.
    pub direction: Direction,
    /// Argument structure.
    pub argument: ArgumentKind,
}

/// Name, `_IOC` number, direction and argument of each supported command.
pub(crate) const COMMAND_SPECS: [(&str, u8, Direction, ArgumentKind); 11] = [
    ("VIDIOC_QUERYCAP", 0, Direction::Read, ArgumentKind::Capability),
    ("VIDIOC_ENUM_FMT", 2, Direction::ReadWrite, ArgumentKind::FormatDescription),
    ("VIDIOC_G_FMT", 4, Direction::ReadWrite, ArgumentKind::FormatGet),
    ("VIDIOC_S_FMT", 5, Direction::ReadWrite, ArgumentKind::FormatSet),
    ("VIDIOC_REQBUFS", 8, Direction::ReadWrite, ArgumentKind::RequestBuffers),
    ("VIDIOC_STREAMON", 18, Direction::Write, ArgumentKind::BufferType),
    ("VIDIOC_STREAMOFF", 19, Direction::Write, ArgumentKind::BufferType),
    ("VIDIOC_ENUMINPUT", 26, Direction::ReadWrite, ArgumentKind::Input),
    ("VIDIOC_G_INPUT", 38, Direction::Read, ArgumentKind::InputIndexOut),
    ("VIDIOC_S_INPUT", 39, Direction::ReadWrite, ArgumentKind::InputIndexIn),
    ("VIDIOC_TRY_FMT", 64, Direction::ReadWrite, ArgumentKind::FormatSet),
];
