/*!
The per-frame parameter block shared with `compute.wgsl#Control`.

The record is uploaded verbatim into a uniform buffer, so its layout must agree
byte for byte with the WGSL declaration. WGSL aligns `vec2<f32>` to 8 bytes,
which puts `ul_corner` at offset 16 and rounds the struct up to 40 bytes. Both
gaps are spelled out as padding fields here so that [`bytemuck::Pod`] holds and
the offsets can't drift.

A mismatch is not detectable at runtime (the shader just reads the wrong bytes),
which is why the layout is pinned by the tests at the bottom of this file.
*/

use std::mem::size_of;

use bytemuck::{Pod, Zeroable};

use crate::error::{Error, Result};

#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, Default, PartialEq)]
pub struct Control {
    /// Horizontal resolution in pixels.
    pub x_size: i32,
    /// Vertical resolution in pixels.
    pub y_size: i32,
    /// Offset into the colour table, advanced once per computed frame.
    pub color_scroll: i32,
    _pad0: u32,
    /// World coordinate of the upper-left pixel.
    pub ul_corner: [f32; 2],
    /// Pixels per world unit.
    pub zoom: f32,
    /// Real part of the Julia constant.
    pub real_scale: f32,
    /// Imaginary part of the Julia constant.
    pub imag_scale: f32,
    _pad1: u32,
}

/// Byte offsets of each field, as seen by the device.
pub mod layout {
    pub const X_SIZE: usize = 0;
    pub const Y_SIZE: usize = 4;
    pub const COLOR_SCROLL: usize = 8;
    pub const UL_CORNER: usize = 16;
    pub const ZOOM: usize = 24;
    pub const REAL_SCALE: usize = 28;
    pub const IMAG_SCALE: usize = 32;

    /// `(name, offset)` in declaration order. Names follow the WGSL struct.
    pub const OFFSETS: [(&str, usize); 7] = [
        ("x_size", X_SIZE),
        ("y_size", Y_SIZE),
        ("color_scroll", COLOR_SCROLL),
        ("ul_corner", UL_CORNER),
        ("zoom", ZOOM),
        ("real_scale", REAL_SCALE),
        ("imag_scale", IMAG_SCALE),
    ];
}

impl Control {
    pub const SIZE: usize = 40;

    pub fn new(
        x_size: i32,
        y_size: i32,
        ul_corner: [f32; 2],
        zoom: f32,
        real_scale: f32,
        imag_scale: f32,
    ) -> Self {
        Self {
            x_size,
            y_size,
            color_scroll: 0,
            _pad0: 0,
            ul_corner,
            zoom,
            real_scale,
            imag_scale,
            _pad1: 0,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Reads a block back from its device representation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != size_of::<Self>() {
            return Err(Error::layout(format!(
                "expected {} bytes for Control, got {}",
                size_of::<Self>(),
                bytes.len()
            )));
        }
        Ok(bytemuck::pod_read_unaligned(bytes))
    }

    /// Checks the constraints the kernel relies on: a positive grid and a
    /// finite, non-zero coordinate mapping.
    pub fn validate(&self) -> Result<()> {
        if self.x_size <= 0 || self.y_size <= 0 {
            return Err(Error::invalid_control(format!(
                "grid size must be positive, got {}x{}",
                self.x_size, self.y_size
            )));
        }

        let floats = [
            ("ul_corner.x", self.ul_corner[0]),
            ("ul_corner.y", self.ul_corner[1]),
            ("zoom", self.zoom),
            ("real_scale", self.real_scale),
            ("imag_scale", self.imag_scale),
        ];
        if let Some((name, value)) = floats.iter().find(|(_, value)| !value.is_finite()) {
            return Err(Error::invalid_control(format!(
                "{name} must be finite, got {value}"
            )));
        }

        if self.zoom == 0.0 {
            return Err(Error::invalid_control("zoom must be non-zero"));
        }

        Ok(())
    }

    /// World coordinate of pixel `(x, y)`.
    pub fn pixel_to_world(&self, x: u32, y: u32) -> [f32; 2] {
        [
            self.ul_corner[0] + x as f32 / self.zoom,
            self.ul_corner[1] + y as f32 / self.zoom,
        ]
    }

    pub fn julia_constant(&self) -> [f32; 2] {
        [self.real_scale, self.imag_scale]
    }
}

#[cfg(test)]
mod tests {
    use std::mem::{align_of, offset_of, size_of};

    use super::*;

    fn example() -> Control {
        Control::new(800, 600, [-2.0, -1.0], 1.0, 0.003125, 0.003125)
    }

    #[test]
    fn fields_read_back_as_assigned() {
        let mut control = Control::new(1920, 1080, [-0.25, 0.75], 350.5, -0.4, 0.6);
        control.color_scroll = 17;

        assert_eq!(control.x_size, 1920);
        assert_eq!(control.y_size, 1080);
        assert_eq!(control.color_scroll, 17);
        assert_eq!(control.ul_corner, [-0.25, 0.75]);
        assert_eq!(control.zoom, 350.5);
        assert_eq!(control.real_scale, -0.4);
        assert_eq!(control.imag_scale, 0.6);
    }

    #[test]
    fn layout_is_pinned() {
        assert_eq!(size_of::<Control>(), Control::SIZE, "Control must be 40 bytes");
        assert_eq!(align_of::<Control>(), 4, "Control must be 4-byte aligned");

        assert_eq!(offset_of!(Control, x_size), layout::X_SIZE);
        assert_eq!(offset_of!(Control, y_size), layout::Y_SIZE);
        assert_eq!(offset_of!(Control, color_scroll), layout::COLOR_SCROLL);
        assert_eq!(offset_of!(Control, ul_corner), layout::UL_CORNER);
        assert_eq!(offset_of!(Control, zoom), layout::ZOOM);
        assert_eq!(offset_of!(Control, real_scale), layout::REAL_SCALE);
        assert_eq!(offset_of!(Control, imag_scale), layout::IMAG_SCALE);
    }

    /// Lays out `compute.wgsl#Control` with the WGSL host-shareable rules for
    /// the scalar and `vec2` members it uses and compares against the Rust side.
    #[test]
    fn layout_matches_shader_declaration() {
        let source = include_str!("compute.wgsl");
        let start = source.find("struct Control {").expect("Control declared");
        let body = &source[start + "struct Control {".len()..];
        let body = &body[..body.find('}').expect("Control closed")];

        let mut offset = 0;
        let mut struct_align = 0;
        let mut members = Vec::new();
        for member in body.split(',').map(str::trim).filter(|m| !m.is_empty()) {
            let (name, ty) = member.split_once(':').expect("name: type");
            let (size, align) = match ty.trim() {
                "i32" | "u32" | "f32" => (4, 4),
                "vec2<f32>" => (8, 8),
                other => panic!("unexpected member type {other}"),
            };
            offset = (offset + align - 1) / align * align;
            members.push((name.trim().to_owned(), offset));
            offset += size;
            struct_align = struct_align.max(align);
        }
        let wgsl_size = (offset + struct_align - 1) / struct_align * struct_align;

        let expected: Vec<_> = layout::OFFSETS
            .iter()
            .map(|(name, offset)| (name.to_string(), *offset))
            .collect();
        assert_eq!(members, expected);
        assert_eq!(wgsl_size, size_of::<Control>());
    }

    #[test]
    fn bytes_round_trip_bit_identical() {
        let mut control = example();
        control.color_scroll = 255;
        control.ul_corner = [f32::MIN_POSITIVE, -0.0];

        let bytes = control.as_bytes().to_vec();
        let received = Control::from_bytes(&bytes).unwrap();

        assert_eq!(received.x_size, control.x_size);
        assert_eq!(received.y_size, control.y_size);
        assert_eq!(received.color_scroll, control.color_scroll);
        for (a, b) in [
            (received.ul_corner[0], control.ul_corner[0]),
            (received.ul_corner[1], control.ul_corner[1]),
            (received.zoom, control.zoom),
            (received.real_scale, control.real_scale),
            (received.imag_scale, control.imag_scale),
        ] {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn device_bytes_sit_at_declared_offsets() {
        let control = example();
        let bytes = control.as_bytes();

        let read_i32 =
            |at: usize| i32::from_le_bytes(bytes[at..at + 4].try_into().unwrap());
        let read_f32 =
            |at: usize| f32::from_le_bytes(bytes[at..at + 4].try_into().unwrap());

        assert_eq!(read_i32(layout::X_SIZE), 800);
        assert_eq!(read_i32(layout::Y_SIZE), 600);
        assert_eq!(read_i32(layout::COLOR_SCROLL), 0);
        assert_eq!(read_f32(layout::UL_CORNER), -2.0);
        assert_eq!(read_f32(layout::UL_CORNER + 4), -1.0);
        assert_eq!(read_f32(layout::ZOOM), 1.0);
        assert_eq!(read_f32(layout::REAL_SCALE), 0.003125);
        assert_eq!(read_f32(layout::IMAG_SCALE), 0.003125);
        assert!(bytes[12..16].iter().chain(&bytes[36..40]).all(|b| *b == 0));
    }

    #[test]
    fn from_bytes_rejects_wrong_length() {
        let err = Control::from_bytes(&[0; 36]).unwrap_err();
        assert!(matches!(err, Error::Layout(_)));
        assert!(Control::from_bytes(&[0; 48]).is_err());
    }

    #[test]
    fn validate_accepts_example() {
        example().validate().unwrap();
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut control = example();
        control.x_size = 0;
        assert!(control.validate().is_err());

        let mut control = example();
        control.y_size = -4;
        assert!(control.validate().is_err());

        let mut control = example();
        control.zoom = 0.0;
        assert!(control.validate().is_err());

        let mut control = example();
        control.real_scale = f32::NAN;
        let err = control.validate().unwrap_err();
        assert!(err.to_string().contains("real_scale"));

        let mut control = example();
        control.ul_corner[1] = f32::INFINITY;
        assert!(control.validate().is_err());
    }

    #[test]
    fn pixel_to_world_steps_by_inverse_zoom() {
        let control = Control::new(800, 600, [-2.0, -1.0], 4.0, 0.0, 0.0);
        assert_eq!(control.pixel_to_world(0, 0), [-2.0, -1.0]);
        assert_eq!(control.pixel_to_world(8, 4), [0.0, 0.0]);
    }
}
