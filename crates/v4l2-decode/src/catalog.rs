//! Read-only command table and argument layouts, built once per platform.

use crate::command::{ioc, ArgumentKind, Command, COMMAND_SPECS, V4L2_IOC_TYPE};
use crate::decode::{Access, FieldKind, FieldSpec, StructLayout, FORMAT_UNION_BYTES};
use crate::error::LookupError;
use crate::tables::{BUF_TYPES, CAPABILITIES, FMT_FLAGS, INPUT_TYPES, MEMORIES};
use crate::{Platform, PointerWidth};

/// Command table plus the layout of every argument structure.
///
/// Constructed once from a [`Platform`]; never mutated afterwards, so a
/// shared reference may be used from any number of threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    platform: Platform,
    layouts: Vec<StructLayout>,
    commands: Vec<Command>,
}

impl Catalog {
    /// Builds the catalog for `platform`.
    #[must_use]
    pub fn new(platform: Platform) -> Self {
        let layouts: Vec<_> = ArgumentKind::ALL
            .iter()
            .map(|kind| build_layout(*kind, platform))
            .collect();
        let commands = COMMAND_SPECS
            .iter()
            .map(|&(name, nr, direction, argument)| Command {
                code: ioc(
                    direction,
                    V4L2_IOC_TYPE,
                    nr,
                    layouts[argument as usize].size,
                ),
                name,
                direction,
                argument,
            })
            .collect();

        Self {
            platform,
            layouts,
            commands,
        }
    }

    /// Platform the catalog was built for.
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Every known command, in table order.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Looks a command up by its full code.
    #[must_use]
    pub fn by_code(&self, code: u32) -> Option<&Command> {
        self.commands.iter().find(|command| command.code == code)
    }

    /// Looks a command up by its `VIDIOC_*` name.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::UnknownCommand`] when no command has that name.
    pub fn by_name(&self, name: &str) -> Result<&Command, LookupError> {
        self.commands
            .iter()
            .find(|command| command.name == name)
            .ok_or_else(|| LookupError::UnknownCommand(name.to_string()))
    }

    /// Layout of an argument structure.
    #[must_use]
    pub fn layout(&self, kind: ArgumentKind) -> &StructLayout {
        &self.layouts[kind as usize]
    }
}

const fn field(
    name: &'static str,
    offset: usize,
    size: usize,
    kind: FieldKind,
    access: Access,
) -> FieldSpec {
    FieldSpec::new(name, offset, size, kind, access)
}

fn build_layout(kind: ArgumentKind, platform: Platform) -> StructLayout {
    match kind {
        ArgumentKind::Capability => capability_layout(platform.has_device_caps),
        ArgumentKind::FormatDescription => StructLayout::structure(
            "v4l2_fmtdesc",
            64,
            vec![
                field("index", 0, 4, FieldKind::Unsigned, Access::In),
                field("type", 4, 4, FieldKind::Enum(&BUF_TYPES), Access::In),
                field("flags", 8, 4, FieldKind::Flags(&FMT_FLAGS), Access::Out),
                field("description", 12, 32, FieldKind::CString, Access::Out),
                field("pixelformat", 44, 4, FieldKind::Fourcc, Access::Out),
            ],
        ),
        ArgumentKind::FormatGet => format_layout(platform.pointer_width, Access::Out),
        ArgumentKind::FormatSet => format_layout(platform.pointer_width, Access::InOut),
        ArgumentKind::RequestBuffers => StructLayout::structure(
            "v4l2_requestbuffers",
            20,
            vec![
                field("type", 4, 4, FieldKind::Enum(&BUF_TYPES), Access::In),
                field("memory", 8, 4, FieldKind::Enum(&MEMORIES), Access::In),
                field("count", 0, 4, FieldKind::Unsigned, Access::InOut),
            ],
        ),
        ArgumentKind::Input => input_layout(platform.pointer_width),
        ArgumentKind::BufferType => {
            StructLayout::scalar("int", FieldKind::Enum(&BUF_TYPES), Access::In)
        }
        ArgumentKind::InputIndexOut => {
            StructLayout::scalar("int", FieldKind::Unsigned, Access::Out)
        }
        ArgumentKind::InputIndexIn => StructLayout::scalar("int", FieldKind::Unsigned, Access::In),
    }
}

fn capability_layout(has_device_caps: bool) -> StructLayout {
    let mut fields = vec![
        field("driver", 0, 16, FieldKind::CString, Access::Out),
        field("card", 16, 32, FieldKind::CString, Access::Out),
        field("bus_info", 48, 32, FieldKind::CString, Access::Out),
        field("version", 80, 4, FieldKind::KernelVersion, Access::Out),
        field("capabilities", 84, 4, FieldKind::Flags(&CAPABILITIES), Access::Out),
    ];
    if has_device_caps {
        fields.push(field(
            "device_caps",
            88,
            4,
            FieldKind::Flags(&CAPABILITIES),
            Access::Out,
        ));
    }
    StructLayout::structure("v4l2_capability", 104, fields)
}

/// `v4l2_format.fmt` is aligned like the pointers inside `v4l2_window`.
fn format_layout(pointer_width: PointerWidth, union_access: Access) -> StructLayout {
    let union_offset = pointer_width.bytes().max(4);
    StructLayout::structure(
        "v4l2_format",
        union_offset + FORMAT_UNION_BYTES,
        vec![
            field("type", 0, 4, FieldKind::Enum(&BUF_TYPES), Access::In),
            field(
                "fmt",
                union_offset,
                FORMAT_UNION_BYTES,
                FieldKind::FormatUnion { type_offset: 0 },
                union_access,
            ),
        ],
    )
}

fn input_layout(pointer_width: PointerWidth) -> StructLayout {
    // u64 `std` is 8-aligned on LP64 only, which pads the tail.
    let size = match pointer_width {
        PointerWidth::Bits32 => 76,
        PointerWidth::Bits64 => 80,
    };
    StructLayout::structure(
        "v4l2_input",
        size,
        vec![
            field("index", 0, 4, FieldKind::Unsigned, Access::In),
            field("name", 4, 32, FieldKind::CString, Access::Out),
            field("type", 36, 4, FieldKind::Enum(&INPUT_TYPES), Access::Out),
            field("audioset", 40, 4, FieldKind::Hex, Access::Out),
            field("tuner", 44, 4, FieldKind::Unsigned, Access::Out),
            field("std", 48, 8, FieldKind::Hex, Access::Out),
            field("status", 56, 4, FieldKind::Hex, Access::Out),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::Catalog;
    use crate::command::{ArgumentKind, Direction};
    use crate::error::LookupError;
    use crate::{Platform, PointerWidth};

    #[test]
    fn lp64_codes_match_uapi() {
        let catalog = Catalog::new(Platform::default());
        let code = |name| catalog.by_name(name).map(|command| command.code);
        assert_eq!(code("VIDIOC_QUERYCAP"), Ok(0x8068_5600));
        assert_eq!(code("VIDIOC_ENUM_FMT"), Ok(0xc040_5602));
        assert_eq!(code("VIDIOC_G_FMT"), Ok(0xc0d0_5604));
        assert_eq!(code("VIDIOC_S_FMT"), Ok(0xc0d0_5605));
        assert_eq!(code("VIDIOC_REQBUFS"), Ok(0xc014_5608));
        assert_eq!(code("VIDIOC_STREAMON"), Ok(0x4004_5612));
        assert_eq!(code("VIDIOC_STREAMOFF"), Ok(0x4004_5613));
        assert_eq!(code("VIDIOC_ENUMINPUT"), Ok(0xc050_561a));
        assert_eq!(code("VIDIOC_G_INPUT"), Ok(0x8004_5626));
        assert_eq!(code("VIDIOC_S_INPUT"), Ok(0xc004_5627));
        assert_eq!(code("VIDIOC_TRY_FMT"), Ok(0xc0d0_5640));
    }

    #[test]
    fn ilp32_format_and_input_shrink() {
        let catalog = Catalog::new(Platform {
            pointer_width: PointerWidth::Bits32,
            ..Platform::default()
        });
        assert_eq!(
            catalog.by_name("VIDIOC_G_FMT").map(|command| command.code),
            Ok(0xc0cc_5604)
        );
        assert_eq!(
            catalog.by_name("VIDIOC_ENUMINPUT").map(|command| command.code),
            Ok(0xc04c_561a)
        );
    }

    #[test]
    fn device_caps_follow_platform() {
        let with = Catalog::new(Platform::default());
        let without = Catalog::new(Platform {
            has_device_caps: false,
            ..Platform::default()
        });
        assert_eq!(with.layout(ArgumentKind::Capability).fields.len(), 6);
        assert_eq!(without.layout(ArgumentKind::Capability).fields.len(), 5);
        assert_eq!(
            with.by_name("VIDIOC_QUERYCAP").map(|command| command.code),
            without.by_name("VIDIOC_QUERYCAP").map(|command| command.code)
        );
    }

    #[test]
    fn every_layout_is_well_formed() {
        for width in [PointerWidth::Bits32, PointerWidth::Bits64] {
            let catalog = Catalog::new(Platform {
                pointer_width: width,
                ..Platform::default()
            });
            for kind in ArgumentKind::ALL {
                assert!(catalog.layout(kind).is_well_formed(), "{kind:?}");
            }
        }
    }

    #[test]
    fn lookups() {
        let catalog = Catalog::new(Platform::default());
        let command = catalog.by_code(0x8068_5600);
        assert_eq!(command.map(|command| command.name), Some("VIDIOC_QUERYCAP"));
        assert_eq!(command.map(|command| command.direction), Some(Direction::Read));
        assert!(catalog.by_code(0xc010_56ff).is_none());
        assert_eq!(
            catalog.by_name("VIDIOC_NOPE"),
            Err(LookupError::UnknownCommand("VIDIOC_NOPE".to_string()))
        );
    }
}
