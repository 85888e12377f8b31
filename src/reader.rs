// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Locked access to one mip level of a texture.

[`TextureReader`] and [`TextureSampler`] acquire the texture's storage lock
when opened and keep it until they are closed or dropped.  The mip buffer they
read from borrows the same texture as the lock guard, so neither can outlive
the texture and no read can happen after release.

```
use texture_reader::pixel_formats::PixelFormat;
use texture_reader::reader::TextureReader;
use texture_reader::software::SoftwareTexture;

let texture = SoftwareTexture::from_pixels(PixelFormat::R8UNorm, 2, 2, vec![1, 2, 3, 4]).unwrap();
let reader = TextureReader::open(&texture, 0, 0).unwrap();
let mut pixel = [0u8; 1];
assert_eq!(reader.read(1, 1, &mut pixel), 1);
assert_eq!(pixel, [4]);
reader.close();
assert!(!texture.is_locked());
```
*/

use crate::address::MipBufferView;
use crate::error::{BoundsError, Error};
use crate::guard::StorageGuard;
use crate::pixel_formats::{Float4, PixelFormat};
use crate::sampler::SamplerContext;
use crate::texture::{MipData, TextureResource, mip_size};

/// Which level and slice to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadOptions {
    pub mip_index: u32,
    pub array_index: u32,
    /// Ask the provider to use only already-resident data.
    pub streaming_only: bool,
}

impl ReadOptions {
    pub const fn new(mip_index: u32, array_index: u32) -> Self {
        Self {
            mip_index,
            array_index,
            streaming_only: false,
        }
    }
}

/// The lock, the mip bytes and the level geometry, acquired in that order.
struct LockedMip<'t, T: TextureResource + ?Sized> {
    mip: MipData<'t>,
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
    format: PixelFormat,
    //dropped last so the lock outlives `mip`
    guard: StorageGuard<'t, T>,
}

impl<'t, T: TextureResource + ?Sized> LockedMip<'t, T> {
    fn acquire(texture: &'t T, options: ReadOptions) -> Result<Self, Error> {
        let guard = StorageGuard::acquire(texture);
        let mip = texture
            .mip_data(options.mip_index, options.array_index, options.streaming_only)
            .map_err(|source| {
                logwise::warn_sync!(
                    "mip {mip} slice {slice} unavailable: {failure}",
                    mip = options.mip_index,
                    slice = options.array_index,
                    failure = logwise::privacy::LogIt(&source)
                );
                Error::LoadUnavailable {
                    mip_index: options.mip_index,
                    array_index: options.array_index,
                    source,
                }
            })?;
        let (width, height) = mip_size(texture, options.mip_index);
        let format = texture.pixel_format();
        let locked = Self {
            mip,
            width,
            height,
            bytes_per_pixel: format.bytes_per_pixel(),
            format,
            guard,
        };
        //validate once so later views cannot fail
        if let Err(e) = locked.view() {
            logwise::warn_sync!(
                "rejecting mip {mip}: {err}",
                mip = options.mip_index,
                err = logwise::privacy::LogIt(&e)
            );
            return Err(e);
        }
        logwise::trace_sync!(
            "locked mip {mip} slice {slice} ({w}x{h}, pitch {pitch})",
            mip = options.mip_index,
            slice = options.array_index,
            w = width,
            h = height,
            pitch = locked.mip.row_pitch
        );
        Ok(locked)
    }

    fn view(&self) -> Result<MipBufferView<'_>, Error> {
        MipBufferView::new(
            &self.mip.data,
            self.width,
            self.height,
            self.mip.row_pitch,
            self.bytes_per_pixel,
        )
    }

    fn checked_view(&self) -> MipBufferView<'_> {
        match self.view() {
            Ok(view) => view,
            Err(e) => unreachable!("mip layout validated at open: {e}"),
        }
    }
}

/// Reads raw pixels from one mip level while holding the texture's lock.
///
/// Geometry (width, height, bytes per pixel) is computed once at open and
/// reused for every read.
pub struct TextureReader<'t, T: TextureResource + ?Sized> {
    locked: LockedMip<'t, T>,
}

impl<'t, T: TextureResource + ?Sized> TextureReader<'t, T> {
    /// Opens `mip_index` / `array_index` of `texture`.
    ///
    /// On failure the lock is released before returning.
    pub fn open(texture: &'t T, mip_index: u32, array_index: u32) -> Result<Self, Error> {
        Self::open_with(texture, ReadOptions::new(mip_index, array_index))
    }

    pub fn open_with(texture: &'t T, options: ReadOptions) -> Result<Self, Error> {
        Ok(Self {
            locked: LockedMip::acquire(texture, options)?,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.locked.width
    }
    #[inline]
    pub fn height(&self) -> usize {
        self.locked.height
    }
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.locked.bytes_per_pixel
    }
    #[inline]
    pub fn pixel_format(&self) -> PixelFormat {
        self.locked.format
    }

    /// The locked mip buffer.
    pub fn view(&self) -> MipBufferView<'_> {
        self.locked.checked_view()
    }

    /// Copies the pixel at `(x, y)` into `buffer`.
    ///
    /// Returns the number of bytes copied (`min(bytes_per_pixel, buffer.len())`)
    /// or [`crate::address::READ_FAILED`] if the coordinates are out of bounds.
    pub fn read(&self, x: i32, y: i32, buffer: &mut [u8]) -> isize {
        self.view().read_or_sentinel(x, y, buffer)
    }

    /// Like [`Self::read`], reporting which axis was out of range.
    pub fn read_into(&self, x: i32, y: i32, buffer: &mut [u8]) -> Result<usize, BoundsError> {
        self.view().read_into(x, y, buffer)
    }

    pub fn read_as<P: bytemuck::Pod>(&self, x: i32, y: i32) -> Result<P, BoundsError> {
        self.view().read_as(x, y)
    }

    pub fn read_exactly_as<P: bytemuck::Pod>(&self, x: i32, y: i32) -> Result<P, Error> {
        self.view().read_exactly_as(x, y)
    }

    /// Releases the storage lock.  Equivalent to dropping the reader.
    pub fn close(self) {
        let LockedMip { mip, guard, .. } = self.locked;
        drop(mip);
        guard.release();
    }
}

/// Bilinear sampler over one locked mip level.
///
/// Created by [`TextureSampler::open`] (or [`crate::api::create_sampler`]) and
/// released by [`TextureSampler::dispose`] or by drop, exactly once.
pub struct TextureSampler<'t, T: TextureResource + ?Sized> {
    locked: LockedMip<'t, T>,
    format: crate::pixel_formats::FormatSampler,
}

impl<'t, T: TextureResource + ?Sized> TextureSampler<'t, T> {
    pub fn open(texture: &'t T, mip_index: u32, array_index: u32) -> Result<Self, Error> {
        Self::open_with(texture, ReadOptions::new(mip_index, array_index))
    }

    pub fn open_with(texture: &'t T, options: ReadOptions) -> Result<Self, Error> {
        let locked = LockedMip::acquire(texture, options)?;
        let format = locked.format.sampler();
        Ok(Self { locked, format })
    }

    /// The sampling context over the locked buffer.
    pub fn context(&self) -> SamplerContext<'_> {
        match SamplerContext::new(self.locked.checked_view(), self.format) {
            Ok(context) => context,
            //the decoder was resolved from the same format as bytes_per_pixel
            Err(e) => unreachable!("decoder does not match mip layout: {e}"),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.locked.width
    }
    #[inline]
    pub fn height(&self) -> usize {
        self.locked.height
    }

    pub fn sample_linear(&self, u: f32, v: f32) -> Float4 {
        self.context().sample_linear(u, v)
    }

    pub fn sample_nearest(&self, u: f32, v: f32) -> Float4 {
        self.context().sample_nearest(u, v)
    }

    /// Releases the storage lock.  The sampler cannot be used afterwards.
    pub fn dispose(self) {
        let LockedMip { mip, guard, .. } = self.locked;
        drop(mip);
        guard.release();
    }
}

impl<T: TextureResource + ?Sized> std::fmt::Debug for TextureReader<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureReader")
            .field("view", &self.view())
            .field("format", &self.locked.format)
            .finish()
    }
}

impl<T: TextureResource + ?Sized> std::fmt::Debug for TextureSampler<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureSampler")
            .field("context", &self.context())
            .finish()
    }
}
