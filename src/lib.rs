// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! texture_reader gives CPU code read access to the pixels of a texture: one
raw pixel at integer coordinates, or a bilinearly filtered color at normalized
coordinates.

The texture itself (loading, streaming, GPU upload, mip generation) lives
elsewhere and is consumed through the [`texture::TextureResource`] trait.  This
crate locates a mip level and array slice, checks coordinates, and reads.

# Two kinds of reads

| Read      | Entry points                                          | Coordinates          | Out of range       | Result                  |
|-----------|-------------------------------------------------------|----------------------|--------------------|-------------------------|
| Raw       | [`api::read_pixel`], [`reader::TextureReader::read`]  | integer `x`, `y`     | reported exactly   | the pixel's bytes       |
| Filtered  | [`api::sample_linear`], [`reader::TextureSampler`]    | normalized `u`, `v`  | clamped to edge    | a decoded [`Float4`]    |

Raw reads address the buffer as `y * row_pitch + x * bytes_per_pixel`, where
`row_pitch` is whatever the provider reports; padded rows are handled.
Filtered reads use the half-pixel-center convention, so sampling exactly at a
pixel center returns that pixel's color.

# Locking

Every read happens under the texture's storage lock.  The lock is taken before
the mip data is fetched and released exactly once, on every path, by
[`guard::StorageGuard`].  A [`reader::TextureSampler`] keeps the lock for as
long as it lives; the borrow checker rejects any use after
[`reader::TextureSampler::dispose`].

# Example

```
use texture_reader::api::{create_sampler, dispose_sampler, read_pixel, sample_linear};
use texture_reader::pixel_formats::PixelFormat;
use texture_reader::software::SoftwareTexture;

// 2x2 RGBA8, rows padded to 256 bytes in storage
let texture = SoftwareTexture::from_pixels(
    PixelFormat::RGBA8UNorm,
    2,
    2,
    vec![
        0, 0, 0, 255,      255, 0, 0, 255,
        0, 255, 0, 255,    0, 0, 255, 255,
    ],
)
.unwrap();

let mut pixel = [0u8; 4];
assert_eq!(read_pixel(Some(&texture), 0, 0, 1, 0, &mut pixel), Ok(4));
assert_eq!(pixel, [255, 0, 0, 255]);

let sampler = create_sampler(Some(&texture), 0, 0).unwrap();
let center = sample_linear(&sampler, 0.5, 0.5);
assert!((center.r - 0.25).abs() < 1e-6);
dispose_sampler(sampler);
assert!(!texture.is_locked());
```
*/

pub mod address;
pub mod api;
mod bittricks;
pub mod coordinates;
pub mod error;
pub mod guard;
pub mod pixel_formats;
pub mod reader;
pub mod sampler;
pub mod software;
pub mod texture;

pub use error::{Error, ReadStatus};
pub use pixel_formats::{Float4, PixelFormat};
pub use reader::{ReadOptions, TextureReader, TextureSampler};
pub use texture::TextureResource;
