// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
bit unpacking for pixel decoders.

All texture payloads are little-endian.  Callers pass slices of at least the
required width; decoders only ever see exactly `bytes_per_pixel` bytes.
*/

#[inline]
pub fn unorm8(byte: u8) -> f32 {
    byte as f32 / 255.0
}

#[inline]
pub fn le_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

#[inline]
pub fn unorm16(bytes: &[u8], at: usize) -> f32 {
    le_u16(bytes, at) as f32 / 65535.0
}

#[inline]
pub fn le_f16(bytes: &[u8], at: usize) -> f32 {
    half::f16::from_bits(le_u16(bytes, at)).to_f32()
}

#[inline]
pub fn le_f32(bytes: &[u8], at: usize) -> f32 {
    f32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

#[inline]
pub fn le_i32(bytes: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Inverse sRGB transfer function.
#[inline]
pub fn srgb_to_linear(s: f32) -> f32 {
    if s <= 0.04045 {
        s / 12.92
    } else {
        ((s + 0.055) / 1.055).powf(2.4)
    }
}
