// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Pixel format definitions and their CPU decoders.
//!
//! Each [`PixelFormat`] knows its size in bytes and how to turn one raw pixel
//! into a linear [`Float4`].  Decoders are resolved once into a
//! [`FormatSampler`] so that sampling loops pay for a plain function call
//! rather than a format match per texel.
//!
//! # Available Formats
//!
//! ## Single Channel
//! - [`PixelFormat::R8UNorm`] - 8-bit normalized unsigned integer (0-255 mapped to 0.0-1.0)
//! - [`PixelFormat::R16Float`] - 16-bit half-precision float
//! - [`PixelFormat::R32Float`] - 32-bit single-precision float
//! - [`PixelFormat::R32SInt`] - 32-bit signed integer, not normalized
//!
//! ## Multi-Channel
//! - [`PixelFormat::RG8UNorm`] - 2-channel 8-bit normalized (2 bytes total)
//! - [`PixelFormat::RGFloat`] - 2-channel 32-bit float (8 bytes total)
//! - [`PixelFormat::RGBA8UNorm`] - 4-channel 8-bit normalized (4 bytes total)
//! - [`PixelFormat::RGBA8UnormSRGB`] - 4-channel 8-bit normalized with sRGB encoding
//! - [`PixelFormat::BGRA8UNormSRGB`] - 4-channel 8-bit normalized with sRGB encoding (BGRA order)
//! - [`PixelFormat::RGBA16Unorm`] - 4-channel 16-bit normalized (8 bytes total)
//! - [`PixelFormat::RGBA32Float`] - 4-channel 32-bit float (16 bytes total)
//!
//! Channels a format does not store decode as 0 for G and B and 1 for alpha.
//!
//! # Examples
//!
//! ```
//! use texture_reader::pixel_formats::{Float4, PixelFormat};
//!
//! let sampler = PixelFormat::RGBA8UNorm.sampler();
//! let red = sampler.decode(&[255, 0, 0, 255]);
//! assert_eq!(red, Float4 { r: 1.0, g: 0.0, b: 0.0, a: 1.0 });
//! ```

use crate::bittricks::{le_f16, le_f32, le_i32, srgb_to_linear, unorm8, unorm16};
use std::fmt::Debug;

/// A texture's pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    R8UNorm,
    RG8UNorm,
    R16Float,
    R32Float,
    R32SInt,
    RGFloat,
    RGBA8UNorm,
    RGBA8UnormSRGB,
    BGRA8UNormSRGB,
    RGBA16Unorm,
    RGBA32Float,
}

impl PixelFormat {
    /// Number of bytes per pixel for this format.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::R8UNorm => 1,
            PixelFormat::RG8UNorm | PixelFormat::R16Float => 2,
            PixelFormat::R32Float
            | PixelFormat::R32SInt
            | PixelFormat::RGBA8UNorm
            | PixelFormat::RGBA8UnormSRGB
            | PixelFormat::BGRA8UNormSRGB => 4,
            PixelFormat::RGFloat | PixelFormat::RGBA16Unorm => 8,
            PixelFormat::RGBA32Float => 16,
        }
    }

    /// Whether color channels are stored with sRGB encoding.
    pub const fn is_srgb(self) -> bool {
        matches!(self, PixelFormat::RGBA8UnormSRGB | PixelFormat::BGRA8UNormSRGB)
    }

    /// Resolves the decoder for this format.
    pub const fn sampler(self) -> FormatSampler {
        let decode: Decoder = match self {
            PixelFormat::R8UNorm => decode_r8_unorm,
            PixelFormat::RG8UNorm => decode_rg8_unorm,
            PixelFormat::R16Float => decode_r16_float,
            PixelFormat::R32Float => decode_r32_float,
            PixelFormat::R32SInt => decode_r32_sint,
            PixelFormat::RGFloat => decode_rg32_float,
            PixelFormat::RGBA8UNorm => decode_rgba8_unorm,
            PixelFormat::RGBA8UnormSRGB => decode_rgba8_unorm_srgb,
            PixelFormat::BGRA8UNormSRGB => decode_bgra8_unorm_srgb,
            PixelFormat::RGBA16Unorm => decode_rgba16_unorm,
            PixelFormat::RGBA32Float => decode_rgba32_float,
        };
        FormatSampler {
            format: self,
            decode,
        }
    }
}

/// Decodes exactly one pixel's bytes into a linear color.
pub type Decoder = fn(&[u8]) -> Float4;

/// A pixel format bound to its decoder.
#[derive(Clone, Copy)]
pub struct FormatSampler {
    format: PixelFormat,
    decode: Decoder,
}

impl FormatSampler {
    /// Binds a custom decoder to a format.
    ///
    /// The decoder receives exactly `format.bytes_per_pixel()` bytes.
    pub const fn with_decoder(format: PixelFormat, decode: Decoder) -> Self {
        Self { format, decode }
    }
    #[inline]
    pub const fn format(&self) -> PixelFormat {
        self.format
    }
    #[inline]
    pub const fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }
    /// Decodes one pixel.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is shorter than [`Self::bytes_per_pixel`].
    #[inline]
    pub fn decode(&self, bytes: &[u8]) -> Float4 {
        (self.decode)(&bytes[..self.bytes_per_pixel()])
    }
}

impl Debug for FormatSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatSampler")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

/// Four-channel floating point color.
///
/// Values are linear (not gamma corrected).  Normalized formats decode into
/// `[0, 1]`; float and integer formats keep their stored range.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Float4 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Float4 {
    pub const TRANSPARENT_BLACK: Float4 = Float4 { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Per-channel linear interpolation; `t = 0` gives `self`, `t = 1` gives `other`.
    #[inline]
    pub fn lerp(self, other: Float4, t: f32) -> Float4 {
        Float4 {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Largest per-channel absolute difference.
    pub fn max_abs_diff(self, other: Float4) -> f32 {
        (self.r - other.r)
            .abs()
            .max((self.g - other.g).abs())
            .max((self.b - other.b).abs())
            .max((self.a - other.a).abs())
    }
}

fn decode_r8_unorm(b: &[u8]) -> Float4 {
    Float4::new(unorm8(b[0]), 0.0, 0.0, 1.0)
}

fn decode_rg8_unorm(b: &[u8]) -> Float4 {
    Float4::new(unorm8(b[0]), unorm8(b[1]), 0.0, 1.0)
}

fn decode_r16_float(b: &[u8]) -> Float4 {
    Float4::new(le_f16(b, 0), 0.0, 0.0, 1.0)
}

fn decode_r32_float(b: &[u8]) -> Float4 {
    Float4::new(le_f32(b, 0), 0.0, 0.0, 1.0)
}

fn decode_r32_sint(b: &[u8]) -> Float4 {
    Float4::new(le_i32(b, 0) as f32, 0.0, 0.0, 1.0)
}

fn decode_rg32_float(b: &[u8]) -> Float4 {
    Float4::new(le_f32(b, 0), le_f32(b, 4), 0.0, 1.0)
}

fn decode_rgba8_unorm(b: &[u8]) -> Float4 {
    Float4::new(unorm8(b[0]), unorm8(b[1]), unorm8(b[2]), unorm8(b[3]))
}

fn decode_rgba8_unorm_srgb(b: &[u8]) -> Float4 {
    Float4::new(
        srgb_to_linear(unorm8(b[0])),
        srgb_to_linear(unorm8(b[1])),
        srgb_to_linear(unorm8(b[2])),
        unorm8(b[3]),
    )
}

fn decode_bgra8_unorm_srgb(b: &[u8]) -> Float4 {
    Float4::new(
        srgb_to_linear(unorm8(b[2])),
        srgb_to_linear(unorm8(b[1])),
        srgb_to_linear(unorm8(b[0])),
        unorm8(b[3]),
    )
}

fn decode_rgba16_unorm(b: &[u8]) -> Float4 {
    Float4::new(unorm16(b, 0), unorm16(b, 2), unorm16(b, 4), unorm16(b, 6))
}

fn decode_rgba32_float(b: &[u8]) -> Float4 {
    Float4::new(le_f32(b, 0), le_f32(b, 4), le_f32(b, 8), le_f32(b, 12))
}
