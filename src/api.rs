// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Flat entry points for hosts that deal in nullable handles and integer status codes.

These wrap [`crate::reader`] and translate errors to [`ReadStatus`]:

| code | meaning |
|---|---|
| 0 | success |
| 1 | x out of range |
| 2 | y out of range |
| 3 | no texture |
| 4 | mip data could not be loaded |

```
use texture_reader::api::{read_pixel, ReadStatus};
use texture_reader::pixel_formats::PixelFormat;
use texture_reader::software::SoftwareTexture;

let texture = SoftwareTexture::from_pixels(PixelFormat::R8UNorm, 2, 1, vec![5, 6]).unwrap();
let mut dst = [0u8; 1];
assert_eq!(read_pixel(Some(&texture), 0, 0, 1, 0, &mut dst), Ok(1));
assert_eq!(read_pixel(Some(&texture), 0, 0, 2, 0, &mut dst), Err(ReadStatus::XOutOfRange));
assert_eq!(read_pixel::<SoftwareTexture>(None, 0, 0, 0, 0, &mut dst), Err(ReadStatus::NullTexture));
```
*/

pub use crate::error::ReadStatus;
use crate::error::Error;
use crate::pixel_formats::Float4;
use crate::reader::{TextureReader, TextureSampler};
use crate::texture::TextureResource;

/// Opens a sampler on `mip_index` / `array_index` of `texture`.
///
/// The returned sampler holds the texture's storage lock until it is passed to
/// [`dispose_sampler`] or dropped.
pub fn create_sampler<T: TextureResource + ?Sized>(
    texture: Option<&T>,
    mip_index: u32,
    array_index: u32,
) -> Result<TextureSampler<'_, T>, Error> {
    let texture = texture.ok_or(Error::NullResource)?;
    TextureSampler::open(texture, mip_index, array_index)
}

/// Bilinear sample at normalized `(u, v)`.  Never fails.
#[inline]
pub fn sample_linear<T: TextureResource + ?Sized>(
    sampler: &TextureSampler<'_, T>,
    u: f32,
    v: f32,
) -> Float4 {
    sampler.sample_linear(u, v)
}

/// Releases the sampler's lock.
pub fn dispose_sampler<T: TextureResource + ?Sized>(sampler: TextureSampler<'_, T>) {
    sampler.dispose();
}

/// One-shot raw read of the pixel at `(x, y)`.
///
/// Checks run in this order: missing texture, mip load, x, y.  The lock is
/// held only for the duration of the call.  On success returns the number of
/// bytes copied into `dst`, which is truncated to `dst.len()` if it is smaller
/// than a pixel.
pub fn read_pixel<T: TextureResource + ?Sized>(
    texture: Option<&T>,
    mip_index: u32,
    array_index: u32,
    x: i32,
    y: i32,
    dst: &mut [u8],
) -> Result<usize, ReadStatus> {
    let texture = texture.ok_or(ReadStatus::NullTexture)?;
    let reader =
        TextureReader::open(texture, mip_index, array_index).map_err(|e| ReadStatus::from(&e))?;
    let copied = reader.read_into(x, y, dst)?;
    reader.close();
    Ok(copied)
}

/// [`read_pixel`] reported as a bare status code.
pub fn read_pixel_status<T: TextureResource + ?Sized>(
    texture: Option<&T>,
    mip_index: u32,
    array_index: u32,
    x: i32,
    y: i32,
    dst: &mut [u8],
) -> i32 {
    match read_pixel(texture, mip_index, array_index, x, y, dst) {
        Ok(_) => ReadStatus::Success.code(),
        Err(status) => status.code(),
    }
}
