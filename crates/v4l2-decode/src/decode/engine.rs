//! Walks a [`StructLayout`] over entry/exit snapshots and renders fields.

use super::layout::{Access, FieldKind, FieldSpec, StructLayout};
use super::structure::{DecodedField, DecodedStructure, Marker};
use super::variant::FormatVariant;
use crate::format::{format_fourcc, format_kernel_version};
use crate::quote::quote_cstring;
use crate::xlat::hex;
use crate::{Availability, ByteOrder, MemoryView, Platform, XlatStyle};

enum Rendered {
    Value(&'static str, String),
    /// Nothing to print for this field (union with an unknown selector).
    Absent,
    /// The field's bytes were not read.
    Uncovered,
}

/// Stateless layout walker. One instance serves every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecoder {
    platform: Platform,
    style: XlatStyle,
    variants: Vec<StructLayout>,
}

impl StructDecoder {
    /// Creates a decoder for `platform` rendering symbols in `style`.
    #[must_use]
    pub fn new(platform: Platform, style: XlatStyle) -> Self {
        let variants = FormatVariant::ALL
            .iter()
            .map(|variant| variant.layout(platform.pointer_width))
            .collect();
        Self {
            platform,
            style,
            variants,
        }
    }

    /// Symbolic rendering style.
    #[must_use]
    pub const fn style(&self) -> XlatStyle {
        self.style
    }

    /// Layout of a `v4l2_format` union member.
    #[must_use]
    pub fn variant_layout(&self, variant: FormatVariant) -> &StructLayout {
        &self.variants[variant as usize]
    }

    /// Decodes `layout` from the entry snapshot and, for a call that
    /// returned successfully, the exit snapshot.
    ///
    /// Fields are emitted in declaration order. Decoding stops at the first
    /// printable field whose bytes were not read; no value is ever produced
    /// from unread memory. An in/out field stops decoding when either
    /// snapshot misses its bytes.
    #[must_use]
    pub fn decode(
        &self,
        layout: &StructLayout,
        entry: &MemoryView,
        exit: Option<&MemoryView>,
    ) -> DecodedStructure {
        let mut fields = Vec::with_capacity(layout.fields.len());
        let mut marker = Marker::Complete;

        for spec in &layout.fields {
            if !spec.is_visible(exit.is_some()) {
                continue;
            }

            let source = match (spec.access, exit) {
                (Access::Out | Access::InOut, Some(exit)) => exit,
                _ => entry,
            };

            let (name, mut value) = match self.render_field(spec, source) {
                Rendered::Value(name, value) => (name, value),
                Rendered::Absent => continue,
                Rendered::Uncovered => {
                    marker = if fields.is_empty() && source.is_unreadable() {
                        Marker::Unreadable
                    } else {
                        Marker::Truncated
                    };
                    break;
                }
            };

            if spec.access == Access::InOut && exit.is_some() {
                match self.render_field(spec, entry) {
                    Rendered::Value(_, before) => value = format!("{before} => {value}"),
                    Rendered::Absent => {}
                    Rendered::Uncovered => {
                        marker = Marker::Truncated;
                        break;
                    }
                }
            }

            fields.push(DecodedField {
                name,
                value,
                truncated: matches!(source.availability(), Availability::Partial(_)),
            });
        }

        if marker == Marker::Unreadable {
            return DecodedStructure::unreadable(layout.name, layout.shape);
        }

        DecodedStructure {
            layout: layout.name,
            shape: layout.shape,
            fields,
            marker,
        }
    }

    fn order(&self) -> ByteOrder {
        self.platform.byte_order
    }

    fn unsigned(&self, view: &MemoryView, offset: usize, size: usize) -> Option<u64> {
        match size {
            1 => view.u8_at(offset).map(u64::from),
            2 => view.u16_at(offset, self.order()).map(u64::from),
            4 => view.u32_at(offset, self.order()).map(u64::from),
            8 => view.u64_at(offset, self.order()),
            _ => None,
        }
    }

    fn signed(&self, view: &MemoryView, offset: usize, size: usize) -> Option<i64> {
        let raw = self.unsigned(view, offset, size)?;
        let shift = 64 - 8 * u32::try_from(size).ok()?;
        Some(i64::from_ne_bytes((raw << shift).to_ne_bytes()) >> shift)
    }

    fn u32_field(&self, view: &MemoryView, offset: usize) -> Option<u32> {
        view.u32_at(offset, self.order())
    }

    fn render_field(&self, spec: &FieldSpec, view: &MemoryView) -> Rendered {
        let value = match spec.kind {
            FieldKind::FormatUnion { type_offset } => {
                return self.render_union(spec, type_offset, view);
            }
            FieldKind::PlaneFormats {
                count_offset,
                stride,
                max,
            } => self.render_planes(spec, view, count_offset, stride, max),
            _ if !view.covers(spec.offset, spec.size) => None,
            FieldKind::Unsigned => self
                .unsigned(view, spec.offset, spec.size)
                .map(|value| value.to_string()),
            FieldKind::Signed => self
                .signed(view, spec.offset, spec.size)
                .map(|value| value.to_string()),
            FieldKind::Hex => self.unsigned(view, spec.offset, spec.size).map(hex),
            FieldKind::Enum(table) => self
                .unsigned(view, spec.offset, spec.size)
                .map(|value| table.render_enum(value, self.style)),
            FieldKind::Flags(table) => self
                .unsigned(view, spec.offset, spec.size)
                .map(|value| table.render_bitmask(value, self.style)),
            FieldKind::CString => view.slice(spec.offset, spec.size).map(quote_cstring),
            FieldKind::Fourcc => self
                .u32_field(view, spec.offset)
                .map(|value| format_fourcc(value, self.style)),
            FieldKind::KernelVersion => self
                .u32_field(view, spec.offset)
                .map(|value| format_kernel_version(value, self.style)),
            FieldKind::Rect => self.render_rect(view, spec.offset),
        };

        value.map_or(Rendered::Uncovered, |value| Rendered::Value(spec.name, value))
    }

    fn render_rect(&self, view: &MemoryView, offset: usize) -> Option<String> {
        Some(format!(
            "{{left={}, top={}, width={}, height={}}}",
            self.signed(view, offset, 4)?,
            self.signed(view, offset + 4, 4)?,
            self.u32_field(view, offset + 8)?,
            self.u32_field(view, offset + 12)?
        ))
    }

    fn render_planes(
        &self,
        spec: &FieldSpec,
        view: &MemoryView,
        count_offset: usize,
        stride: usize,
        max: usize,
    ) -> Option<String> {
        if !view.covers(spec.offset, spec.size) {
            return None;
        }
        let count = usize::from(view.u8_at(count_offset)?).min(max);
        let planes = (0..count)
            .map(|index| {
                let base = spec.offset + index * stride;
                Some(format!(
                    "{{sizeimage={}, bytesperline={}}}",
                    self.u32_field(view, base)?,
                    self.u32_field(view, base + 4)?
                ))
            })
            .collect::<Option<Vec<_>>>()?;
        Some(format!("[{}]", planes.join(", ")))
    }

    fn render_union(&self, spec: &FieldSpec, type_offset: usize, view: &MemoryView) -> Rendered {
        if !view.covers(spec.offset, spec.size) {
            return Rendered::Uncovered;
        }
        let Some(buf_type) = self.u32_field(view, type_offset) else {
            return Rendered::Uncovered;
        };
        let Some(variant) = FormatVariant::from_buf_type(buf_type) else {
            return Rendered::Absent;
        };

        let layout = self.variant_layout(variant);
        let member = view.subview(spec.offset, layout.size);
        self.decode(layout, &member, None)
            .render_body()
            .map_or(Rendered::Uncovered, |body| {
                Rendered::Value(variant.field_name(), body)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::StructDecoder;
    use crate::catalog::Catalog;
    use crate::command::ArgumentKind;
    use crate::decode::layout::{Access, FieldKind, FieldSpec, StructLayout};
    use crate::decode::structure::Marker;
    use crate::tables::MEMORIES;
    use crate::{MemoryView, Platform, XlatStyle};

    fn layout() -> StructLayout {
        StructLayout::structure(
            "sample",
            12,
            vec![
                FieldSpec::new("a", 0, 4, FieldKind::Unsigned, Access::In),
                FieldSpec::new("memory", 4, 4, FieldKind::Enum(&MEMORIES), Access::In),
                FieldSpec::new("c", 8, 4, FieldKind::Signed, Access::InOut),
            ],
        )
    }

    fn bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&7_u32.to_le_bytes());
        bytes.extend_from_slice(&1_u32.to_le_bytes());
        bytes.extend_from_slice(&(-2_i32).to_le_bytes());
        bytes
    }

    #[test]
    fn full_view_is_complete() {
        let decoder = StructDecoder::new(Platform::default(), XlatStyle::Abbrev);
        let view = MemoryView::full(0x1000, bytes());
        let decoded = decoder.decode(&layout(), &view, None);
        assert_eq!(decoded.marker, Marker::Complete);
        assert_eq!(
            decoded.render_body().as_deref(),
            Some("{a=7, memory=V4L2_MEMORY_MMAP, c=-2}")
        );
    }

    #[test]
    fn partial_view_stops_at_boundary() {
        let decoder = StructDecoder::new(Platform::default(), XlatStyle::Abbrev);
        let view = MemoryView::from_prefix(0x1000, 12, bytes()[..7].to_vec());
        let decoded = decoder.decode(&layout(), &view, None);
        assert_eq!(decoded.marker, Marker::Truncated);
        assert_eq!(decoded.fields.len(), 1);
        assert!(decoded.fields[0].truncated);
    }

    #[test]
    fn in_out_field_shows_both_snapshots() {
        let decoder = StructDecoder::new(Platform::default(), XlatStyle::Abbrev);
        let entry = MemoryView::full(0x1000, bytes());
        let mut after = bytes();
        after[8..12].copy_from_slice(&3_i32.to_le_bytes());
        let exit = MemoryView::full(0x1000, after);

        let decoded = decoder.decode(&layout(), &entry, Some(&exit));
        assert_eq!(decoded.fields[2].value, "-2 => 3");
    }

    #[test]
    fn in_out_field_missing_from_entry_truncates() {
        let decoder = StructDecoder::new(Platform::default(), XlatStyle::Abbrev);
        let entry = MemoryView::from_prefix(0x1000, 12, bytes()[..8].to_vec());
        let exit = MemoryView::full(0x1000, bytes());

        let decoded = decoder.decode(&layout(), &entry, Some(&exit));
        assert_eq!(decoded.marker, Marker::Truncated);
        assert_eq!(
            decoded.render_body().as_deref(),
            Some("{a=7, memory=V4L2_MEMORY_MMAP}")
        );
    }

    #[test]
    fn format_union_needs_every_union_byte() {
        let decoder = StructDecoder::new(Platform::default(), XlatStyle::Abbrev);
        let catalog = Catalog::new(Platform::default());
        let layout = catalog.layout(ArgumentKind::FormatGet);
        let mut bytes = vec![0; 208];
        bytes[..4].copy_from_slice(&1_u32.to_le_bytes());

        // The pix member spans 48 bytes of the 200-byte union.
        let short = MemoryView::from_prefix(0x1000, 208, bytes[..8 + 48].to_vec());
        let decoded = decoder.decode(layout, &short, Some(&short));
        assert_eq!(decoded.marker, Marker::Truncated);
        assert_eq!(
            decoded.render_body().as_deref(),
            Some("{type=V4L2_BUF_TYPE_VIDEO_CAPTURE}")
        );

        let full = MemoryView::full(0x1000, bytes);
        let decoded = decoder.decode(layout, &full, Some(&full));
        assert_eq!(decoded.marker, Marker::Complete);
        assert_eq!(decoded.fields[1].name, "fmt.pix");
    }

    #[test]
    fn unreadable_view_has_no_fields() {
        let decoder = StructDecoder::new(Platform::default(), XlatStyle::Abbrev);
        let view = MemoryView::unreadable(0x1000, 12);
        let decoded = decoder.decode(&layout(), &view, None);
        assert_eq!(decoded.marker, Marker::Unreadable);
        assert!(decoded.fields.is_empty());
    }

    #[test]
    fn signed_values_sign_extend_by_width() {
        let decoder = StructDecoder::new(Platform::default(), XlatStyle::Abbrev);
        let view = MemoryView::full(0, vec![0xff, 0xfe, 0xff, 0x7f]);
        assert_eq!(decoder.signed(&view, 0, 1), Some(-1));
        assert_eq!(decoder.signed(&view, 0, 2), Some(-257));
        assert_eq!(decoder.signed(&view, 0, 4), Some(0x7fff_feff));
    }
}
