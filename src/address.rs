// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! Bounds-checked pixel addressing over row-strided mip buffers.

A [`MipBufferView`] borrows the bytes of one mip level together with the
geometry needed to address them.  Addresses are always

```text
offset = y * row_pitch + x * bytes_per_pixel
```

`row_pitch` is the provider's stride and is never assumed to equal
`width * bytes_per_pixel`: mip buffers are frequently padded to an alignment.

# Examples

```
use texture_reader::address::MipBufferView;

// 2x2 RGBA8, rows padded to 12 bytes
let data = [
    1, 1, 1, 1,  2, 2, 2, 2,  0, 0, 0, 0,
    3, 3, 3, 3,  4, 4, 4, 4,  0, 0, 0, 0,
];
let view = MipBufferView::new(&data, 2, 2, 12, 4).unwrap();
assert_eq!(view.resolve(1, 1), Ok(16));
assert_eq!(view.pixel_bytes(1, 1).unwrap(), &[4, 4, 4, 4]);
```
*/

use crate::error::{BoundsError, Error, Layout};

/// Returned by [`MipBufferView::read_or_sentinel`] when the coordinates are invalid.
pub const READ_FAILED: isize = -1;

/// A borrowed, row-major mip buffer with its geometry.
#[derive(Clone, Copy)]
pub struct MipBufferView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    row_pitch: usize,
    bytes_per_pixel: usize,
}

impl<'a> MipBufferView<'a> {
    /// Validates geometry against `data` and creates a view.
    ///
    /// Requires positive geometry, `row_pitch >= width * bytes_per_pixel`, and
    /// enough bytes to hold every pixel.  The padding after the last row may
    /// be absent.
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        row_pitch: usize,
        bytes_per_pixel: usize,
    ) -> Result<Self, Error> {
        if width == 0 || height == 0 || row_pitch == 0 || bytes_per_pixel == 0 {
            return Err(Error::InvalidLayout(Layout::EmptyGeometry));
        }
        let row_bytes = width
            .checked_mul(bytes_per_pixel)
            .ok_or(Error::InvalidLayout(Layout::Overflow))?;
        if row_pitch < row_bytes {
            return Err(Error::InvalidLayout(Layout::RowPitchTooSmall {
                row_pitch,
                row_bytes,
            }));
        }
        let required = (height - 1)
            .checked_mul(row_pitch)
            .and_then(|v| v.checked_add(row_bytes))
            .ok_or(Error::InvalidLayout(Layout::Overflow))?;
        if data.len() < required {
            return Err(Error::InvalidLayout(Layout::BufferTooShort {
                required,
                actual: data.len(),
            }));
        }
        Ok(Self {
            data,
            width,
            height,
            row_pitch,
            bytes_per_pixel,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }
    #[inline]
    pub fn row_pitch(&self) -> usize {
        self.row_pitch
    }
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Computes the byte offset of `(x, y)`.
    ///
    /// X is validated before Y, so a request invalid on both axes reports
    /// [`BoundsError::XOutOfRange`].
    #[inline]
    pub fn resolve(&self, x: i32, y: i32) -> Result<usize, BoundsError> {
        let xi = checked_axis(x, self.width).ok_or(BoundsError::XOutOfRange {
            value: x,
            len: self.width,
        })?;
        let yi = checked_axis(y, self.height).ok_or(BoundsError::YOutOfRange {
            value: y,
            len: self.height,
        })?;
        //cannot overflow: new() proved the last pixel's end fits in data.len()
        Ok(yi * self.row_pitch + xi * self.bytes_per_pixel)
    }

    /// The `bytes_per_pixel` bytes of the pixel at `(x, y)`.
    #[inline]
    pub fn pixel_bytes(&self, x: i32, y: i32) -> Result<&'a [u8], BoundsError> {
        let offset = self.resolve(x, y)?;
        Ok(&self.data[offset..offset + self.bytes_per_pixel])
    }

    /// Copies the pixel at `(x, y)` into `dst`.
    ///
    /// Copies `min(bytes_per_pixel, dst.len())` bytes and returns that count.
    /// An undersized `dst` is truncated rather than rejected; use
    /// [`Self::read_exact_into`] when truncation is not acceptable.
    pub fn read_into(&self, x: i32, y: i32, dst: &mut [u8]) -> Result<usize, BoundsError> {
        let src = self.pixel_bytes(x, y)?;
        let n = src.len().min(dst.len());
        dst[..n].copy_from_slice(&src[..n]);
        Ok(n)
    }

    /// Like [`Self::read_into`], but reports invalid coordinates as [`READ_FAILED`].
    pub fn read_or_sentinel(&self, x: i32, y: i32, dst: &mut [u8]) -> isize {
        match self.read_into(x, y, dst) {
            Ok(n) => n as isize,
            Err(_) => READ_FAILED,
        }
    }

    /// Copies the whole pixel, failing with [`Error::DestinationTooSmall`] if
    /// `dst` cannot hold it.  Bytes of `dst` past the pixel are untouched.
    pub fn read_exact_into(&self, x: i32, y: i32, dst: &mut [u8]) -> Result<(), Error> {
        let src = self.pixel_bytes(x, y)?;
        if dst.len() < src.len() {
            return Err(Error::DestinationTooSmall {
                needed: src.len(),
                available: dst.len(),
            });
        }
        dst[..src.len()].copy_from_slice(src);
        Ok(())
    }

    /// Reads the pixel into a value of type `T`.
    ///
    /// When `T` is smaller than a pixel only its leading bytes are kept; when
    /// larger, the remaining bytes of `T` are zero.
    pub fn read_as<T: bytemuck::Pod>(&self, x: i32, y: i32) -> Result<T, BoundsError> {
        let mut value = T::zeroed();
        self.read_into(x, y, bytemuck::bytes_of_mut(&mut value))?;
        Ok(value)
    }

    /// Reads the pixel into a `T` whose size must equal `bytes_per_pixel`.
    pub fn read_exactly_as<T: bytemuck::Pod>(&self, x: i32, y: i32) -> Result<T, Error> {
        let expected = self.bytes_per_pixel;
        let actual = std::mem::size_of::<T>();
        if expected != actual {
            return Err(Error::SizeMismatch { expected, actual });
        }
        let src = self.pixel_bytes(x, y)?;
        Ok(bytemuck::pod_read_unaligned(src))
    }
}

#[inline]
fn checked_axis(v: i32, len: usize) -> Option<usize> {
    let v = usize::try_from(v).ok()?;
    (v < len).then_some(v)
}

impl std::fmt::Debug for MipBufferView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MipBufferView")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("row_pitch", &self.row_pitch)
            .field("bytes_per_pixel", &self.bytes_per_pixel)
            .field("len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{MipBufferView, READ_FAILED};
    use crate::error::{BoundsError, Error, Layout};

    fn numbered(len: usize) -> Vec<u8> {
        (0..len).map(|i| i as u8).collect()
    }

    #[test]
    fn resolve_uses_row_pitch_for_every_valid_texel() {
        let data = numbered(3 * 40);
        let view = MipBufferView::new(&data, 5, 3, 40, 4).expect("valid view");
        for y in 0..3 {
            for x in 0..5 {
                assert_eq!(view.resolve(x, y), Ok(y as usize * 40 + x as usize * 4));
            }
        }
    }

    #[test]
    fn x_is_checked_before_y() {
        let data = numbered(64);
        let view = MipBufferView::new(&data, 4, 4, 16, 4).expect("valid view");
        assert_eq!(
            view.resolve(4, 0),
            Err(BoundsError::XOutOfRange { value: 4, len: 4 })
        );
        assert_eq!(
            view.resolve(-1, 0),
            Err(BoundsError::XOutOfRange { value: -1, len: 4 })
        );
        assert_eq!(
            view.resolve(0, 4),
            Err(BoundsError::YOutOfRange { value: 4, len: 4 })
        );
        assert_eq!(
            view.resolve(3, -1),
            Err(BoundsError::YOutOfRange { value: -1, len: 4 })
        );
        assert_eq!(
            view.resolve(-1, -1),
            Err(BoundsError::XOutOfRange { value: -1, len: 4 })
        );
    }

    #[test]
    fn reading_1_1_of_4x4_rgba_reads_bytes_20_to_23() {
        let data = numbered(64);
        let view = MipBufferView::new(&data, 4, 4, 16, 4).expect("valid view");
        let mut dst = [0u8; 4];
        assert_eq!(view.read_into(1, 1, &mut dst), Ok(4));
        assert_eq!(dst, [20, 21, 22, 23]);
    }

    #[test]
    fn undersized_destination_is_truncated() {
        let data = numbered(64);
        let view = MipBufferView::new(&data, 4, 4, 16, 4).expect("valid view");
        let mut dst = [0xAAu8; 2];
        assert_eq!(view.read_into(1, 1, &mut dst), Ok(2));
        assert_eq!(dst, [20, 21]);

        let mut big = [0xAAu8; 6];
        assert_eq!(view.read_into(0, 0, &mut big), Ok(4));
        assert_eq!(big, [0, 1, 2, 3, 0xAA, 0xAA]);
    }

    #[test]
    fn sentinel_and_exact_reads() {
        let data = numbered(64);
        let view = MipBufferView::new(&data, 4, 4, 16, 4).expect("valid view");
        let mut dst = [0u8; 3];
        assert_eq!(view.read_or_sentinel(9, 0, &mut dst), READ_FAILED);
        assert_eq!(view.read_or_sentinel(0, 0, &mut dst), 3);
        assert_eq!(
            view.read_exact_into(0, 0, &mut dst),
            Err(Error::DestinationTooSmall {
                needed: 4,
                available: 3
            })
        );
        let mut exact = [0u8; 4];
        view.read_exact_into(3, 3, &mut exact).expect("fits");
        assert_eq!(exact, [60, 61, 62, 63]);
    }

    #[test]
    fn padded_rows_are_skipped() {
        // 2x2 of 1-byte pixels, pitch 3; padding bytes are 0xFF
        let data = [10, 11, 0xFF, 12, 13, 0xFF];
        let view = MipBufferView::new(&data, 2, 2, 3, 1).expect("valid view");
        assert_eq!(view.pixel_bytes(0, 1).unwrap(), &[12]);
        assert_eq!(view.pixel_bytes(1, 1).unwrap(), &[13]);
    }

    #[test]
    fn last_row_padding_may_be_absent() {
        let data = [10, 11, 0xFF, 12, 13];
        let view = MipBufferView::new(&data, 2, 2, 3, 1).expect("valid view");
        assert_eq!(view.pixel_bytes(1, 1).unwrap(), &[13]);
    }

    #[test]
    fn invalid_layouts_are_rejected() {
        let data = numbered(16);
        assert_eq!(
            MipBufferView::new(&data, 4, 1, 12, 4).unwrap_err(),
            Error::InvalidLayout(Layout::RowPitchTooSmall {
                row_pitch: 12,
                row_bytes: 16
            })
        );
        assert_eq!(
            MipBufferView::new(&data, 4, 2, 16, 4).unwrap_err(),
            Error::InvalidLayout(Layout::BufferTooShort {
                required: 32,
                actual: 16
            })
        );
        assert_eq!(
            MipBufferView::new(&data, 0, 2, 16, 4).unwrap_err(),
            Error::InvalidLayout(Layout::EmptyGeometry)
        );
        assert_eq!(
            MipBufferView::new(&data, usize::MAX, 1, 16, 4).unwrap_err(),
            Error::InvalidLayout(Layout::Overflow)
        );
    }

    #[test]
    fn typed_reads() {
        let data = numbered(64);
        let view = MipBufferView::new(&data, 4, 4, 16, 4).expect("valid view");
        let word: u32 = view.read_exactly_as(1, 1).expect("same size");
        assert_eq!(word, u32::from_ne_bytes([20, 21, 22, 23]));

        let short: u16 = view.read_as(1, 1).expect("in bounds");
        assert_eq!(short, u16::from_ne_bytes([20, 21]));

        let wide: u64 = view.read_as(1, 1).expect("in bounds");
        assert_eq!(wide, u64::from_ne_bytes([20, 21, 22, 23, 0, 0, 0, 0]));

        assert_eq!(
            view.read_exactly_as::<u16>(0, 0),
            Err(Error::SizeMismatch {
                expected: 4,
                actual: 2
            })
        );
        assert_eq!(
            view.read_as::<u32>(0, 7),
            Err(BoundsError::YOutOfRange { value: 7, len: 4 })
        );
    }
}
