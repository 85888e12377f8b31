// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Contracts this crate consumes from the texture system.

A [`TextureResource`] bundles three collaborators:

- geometry and format of level 0,
- a storage lock ([`TextureResource::acquire_lock`] / [`TextureResource::release_lock`]),
- a mip-data provider ([`TextureResource::mip_data`]).

Readers in this crate never call the lock methods directly; they go through
[`crate::guard::StorageGuard`], which guarantees exactly one release.
*/

use std::borrow::Cow;

use crate::error::LoadFailure;
use crate::pixel_formats::PixelFormat;

/// Opaque token returned by [`TextureResource::acquire_lock`].
///
/// Not `Clone`: each token is handed back to [`TextureResource::release_lock`]
/// exactly once.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct LockHandle(u64);

impl LockHandle {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
    pub const fn id(&self) -> u64 {
        self.0
    }
}

/// Raw bytes of one mip level of one array slice.
///
/// `row_pitch` is the byte distance between row starts and may exceed
/// `width * bytes_per_pixel`.
#[derive(Debug, Clone)]
pub struct MipData<'t> {
    pub data: Cow<'t, [u8]>,
    pub row_pitch: usize,
}

impl<'t> MipData<'t> {
    pub fn borrowed(data: &'t [u8], row_pitch: usize) -> Self {
        Self {
            data: Cow::Borrowed(data),
            row_pitch,
        }
    }
    pub fn owned(data: Vec<u8>, row_pitch: usize) -> Self {
        Self {
            data: Cow::Owned(data),
            row_pitch,
        }
    }
}

/// A texture whose pixel data can be read on the CPU.
pub trait TextureResource {
    /// Width of mip level 0, in pixels.
    fn width(&self) -> usize;
    /// Height of mip level 0, in pixels.
    fn height(&self) -> usize;
    fn pixel_format(&self) -> PixelFormat;
    fn mip_levels(&self) -> u32;
    fn array_size(&self) -> u32;

    /// Acquires the storage lock.  The backing data stays valid until the
    /// handle is released.
    fn acquire_lock(&self) -> LockHandle;
    /// Releases a lock previously acquired.  Releasing twice is not supported.
    fn release_lock(&self, handle: LockHandle);

    /// Produces the bytes of `mip_index` / `array_index`.
    ///
    /// With `streaming_only` the provider may refuse to touch non-resident
    /// data and return [`LoadFailure::NotResident`].
    fn mip_data(
        &self,
        mip_index: u32,
        array_index: u32,
        streaming_only: bool,
    ) -> Result<MipData<'_>, LoadFailure>;
}

/// Size of a dimension at `mip_index`: `max(1, size >> mip_index)`.
#[inline]
pub const fn mip_extent(size: usize, mip_index: u32) -> usize {
    let shifted = if mip_index >= usize::BITS {
        0
    } else {
        size >> mip_index
    };
    if shifted == 0 { 1 } else { shifted }
}

/// Width and height of a texture at `mip_index`.
pub fn mip_size<T: TextureResource + ?Sized>(texture: &T, mip_index: u32) -> (usize, usize) {
    (
        mip_extent(texture.width(), mip_index),
        mip_extent(texture.height(), mip_index),
    )
}
