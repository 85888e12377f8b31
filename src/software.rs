// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! In-memory texture resource.

[`SoftwareTexture`] keeps every mip level and array slice on the CPU, stored
with rows padded to a configurable alignment (256 bytes by default, the same
alignment GPU copy paths require).  It tracks its storage lock with atomics so
callers can assert that every acquire is matched by exactly one release.

# Example

```
use texture_reader::pixel_formats::PixelFormat;
use texture_reader::software::SoftwareTexture;

let texture = SoftwareTexture::builder(PixelFormat::RG8UNorm, 3, 2)
    .row_alignment(8)
    .level(0, 0, vec![0; 3 * 2 * 2])
    .level(1, 0, vec![7, 7])
    .build()
    .unwrap();
assert_eq!(texture.mip_levels(), 2);
assert_eq!(texture.row_pitch(0, 0), Some(8));
```
*/

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::error::{Error, Layout, LoadFailure};
use crate::pixel_formats::PixelFormat;
use crate::texture::{LockHandle, MipData, TextureResource, mip_extent};

/// Default row alignment, in bytes.
pub const DEFAULT_ROW_ALIGNMENT: usize = 256;

#[derive(Debug, Clone)]
struct Level {
    data: Vec<u8>,
    row_pitch: usize,
}

#[derive(Debug, Clone)]
enum Payload {
    /// Tightly packed rows, padded at build time.
    Packed(Vec<u8>),
    /// Already laid out; stored as given.
    Raw { data: Vec<u8>, row_pitch: usize },
}

/// Configures a [`SoftwareTexture`].
#[derive(Debug, Clone)]
pub struct SoftwareTextureBuilder {
    format: PixelFormat,
    width: usize,
    height: usize,
    row_alignment: usize,
    padding_byte: u8,
    mip_levels: Option<u32>,
    array_size: Option<u32>,
    resident: bool,
    payloads: BTreeMap<(u32, u32), Payload>,
}

impl SoftwareTextureBuilder {
    /// Row alignment in bytes for packed levels.  Zero is treated as one.
    pub fn row_alignment(mut self, alignment: usize) -> Self {
        self.row_alignment = alignment.max(1);
        self
    }

    /// Byte written into row padding.
    pub fn padding_byte(mut self, byte: u8) -> Self {
        self.padding_byte = byte;
        self
    }

    /// Declares the mip count.  Defaults to one past the highest supplied level.
    pub fn mip_levels(mut self, count: u32) -> Self {
        self.mip_levels = Some(count);
        self
    }

    /// Declares the slice count.  Defaults to one past the highest supplied slice.
    pub fn array_size(mut self, count: u32) -> Self {
        self.array_size = Some(count);
        self
    }

    /// Whether level data counts as already streamed in.
    pub fn resident(mut self, resident: bool) -> Self {
        self.resident = resident;
        self
    }

    /// Supplies tightly packed pixels for `mip_index` / `array_index`.
    ///
    /// The length must be `mip_width * mip_height * bytes_per_pixel`; this is
    /// checked by [`Self::build`].
    pub fn level(mut self, mip_index: u32, array_index: u32, pixels: Vec<u8>) -> Self {
        self.payloads
            .insert((mip_index, array_index), Payload::Packed(pixels));
        self
    }

    /// Supplies bytes already laid out with `row_pitch`.
    ///
    /// Not validated here; readers reject inconsistent layouts when opening.
    pub fn level_with_pitch(
        mut self,
        mip_index: u32,
        array_index: u32,
        data: Vec<u8>,
        row_pitch: usize,
    ) -> Self {
        self.payloads
            .insert((mip_index, array_index), Payload::Raw { data, row_pitch });
        self
    }

    pub fn build(self) -> Result<SoftwareTexture, Error> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidLayout(Layout::EmptyGeometry));
        }
        let bpp = self.format.bytes_per_pixel();
        let mut levels = BTreeMap::new();
        let mut max_mip = 0;
        let mut max_slice = 0;
        for ((mip, slice), payload) in self.payloads {
            max_mip = max_mip.max(mip.saturating_add(1));
            max_slice = max_slice.max(slice.saturating_add(1));
            let width = mip_extent(self.width, mip);
            let height = mip_extent(self.height, mip);
            let level = match payload {
                Payload::Raw { data, row_pitch } => Level { data, row_pitch },
                Payload::Packed(pixels) => {
                    pad_rows(&pixels, width, height, bpp, self.row_alignment, self.padding_byte)?
                }
            };
            levels.insert((mip, slice), level);
        }
        let mip_levels = self.mip_levels.unwrap_or(max_mip.max(1));
        let array_size = self.array_size.unwrap_or(max_slice.max(1));
        logwise::trace_sync!(
            "built software texture {w}x{h}, {mips} mips, {slices} slices",
            w = self.width,
            h = self.height,
            mips = mip_levels,
            slices = array_size
        );
        Ok(SoftwareTexture {
            format: self.format,
            width: self.width,
            height: self.height,
            mip_levels,
            array_size,
            resident: self.resident,
            levels,
            lock: LockTracker::default(),
        })
    }
}

fn pad_rows(
    pixels: &[u8],
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
    alignment: usize,
    padding_byte: u8,
) -> Result<Level, Error> {
    let row_bytes = width
        .checked_mul(bytes_per_pixel)
        .ok_or(Error::InvalidLayout(Layout::Overflow))?;
    let expected = row_bytes
        .checked_mul(height)
        .ok_or(Error::InvalidLayout(Layout::Overflow))?;
    if pixels.len() != expected {
        return Err(Error::SizeMismatch {
            expected,
            actual: pixels.len(),
        });
    }
    let row_pitch = row_bytes
        .checked_next_multiple_of(alignment)
        .ok_or(Error::InvalidLayout(Layout::Overflow))?;
    let size = row_pitch
        .checked_mul(height)
        .ok_or(Error::InvalidLayout(Layout::Overflow))?;
    let mut data = vec![padding_byte; size];
    for (row, src) in pixels.chunks_exact(row_bytes).enumerate() {
        let start = row * row_pitch;
        data[start..start + row_bytes].copy_from_slice(src);
    }
    Ok(Level { data, row_pitch })
}

#[derive(Debug, Default)]
struct LockTracker {
    holders: AtomicUsize,
    next_id: AtomicU64,
    acquires: AtomicU64,
    releases: AtomicU64,
}

/// A CPU-resident [`TextureResource`].
#[derive(Debug)]
pub struct SoftwareTexture {
    format: PixelFormat,
    width: usize,
    height: usize,
    mip_levels: u32,
    array_size: u32,
    resident: bool,
    levels: BTreeMap<(u32, u32), Level>,
    lock: LockTracker,
}

impl SoftwareTexture {
    pub fn builder(format: PixelFormat, width: usize, height: usize) -> SoftwareTextureBuilder {
        SoftwareTextureBuilder {
            format,
            width,
            height,
            row_alignment: DEFAULT_ROW_ALIGNMENT,
            padding_byte: 0,
            mip_levels: None,
            array_size: None,
            resident: true,
            payloads: BTreeMap::new(),
        }
    }

    /// Single-level, single-slice texture from tightly packed pixels.
    pub fn from_pixels(
        format: PixelFormat,
        width: usize,
        height: usize,
        pixels: Vec<u8>,
    ) -> Result<Self, Error> {
        Self::builder(format, width, height).level(0, 0, pixels).build()
    }

    /// Marks level data as resident or not.
    pub fn with_resident(mut self, resident: bool) -> Self {
        self.resident = resident;
        self
    }

    /// Stored row pitch of a level, if that level was supplied.
    pub fn row_pitch(&self, mip_index: u32, array_index: u32) -> Option<usize> {
        self.levels
            .get(&(mip_index, array_index))
            .map(|level| level.row_pitch)
    }

    pub fn mip_levels(&self) -> u32 {
        self.mip_levels
    }

    /// Whether any storage lock is currently held.
    pub fn is_locked(&self) -> bool {
        self.lock.holders.load(Ordering::Acquire) != 0
    }

    /// Total `(acquires, releases)` since creation.
    pub fn lock_stats(&self) -> (u64, u64) {
        (
            self.lock.acquires.load(Ordering::Relaxed),
            self.lock.releases.load(Ordering::Relaxed),
        )
    }
}

impl TextureResource for SoftwareTexture {
    fn width(&self) -> usize {
        self.width
    }
    fn height(&self) -> usize {
        self.height
    }
    fn pixel_format(&self) -> PixelFormat {
        self.format
    }
    fn mip_levels(&self) -> u32 {
        self.mip_levels
    }
    fn array_size(&self) -> u32 {
        self.array_size
    }

    fn acquire_lock(&self) -> LockHandle {
        self.lock.holders.fetch_add(1, Ordering::Acquire);
        self.lock.acquires.fetch_add(1, Ordering::Relaxed);
        LockHandle::new(self.lock.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// # Panics
    /// If no lock is held.
    fn release_lock(&self, handle: LockHandle) {
        let previous = self
            .lock
            .holders
            .fetch_update(Ordering::Release, Ordering::Relaxed, |held| held.checked_sub(1));
        if previous.is_err() {
            panic!("released lock {} on an unlocked texture", handle.id());
        }
        self.lock.releases.fetch_add(1, Ordering::Relaxed);
    }

    fn mip_data(
        &self,
        mip_index: u32,
        array_index: u32,
        streaming_only: bool,
    ) -> Result<MipData<'_>, LoadFailure> {
        if mip_index >= self.mip_levels {
            return Err(LoadFailure::NoSuchMip {
                mip_index,
                mip_levels: self.mip_levels,
            });
        }
        if array_index >= self.array_size {
            return Err(LoadFailure::NoSuchSlice {
                array_index,
                array_size: self.array_size,
            });
        }
        if streaming_only && !self.resident {
            return Err(LoadFailure::NotResident);
        }
        match self.levels.get(&(mip_index, array_index)) {
            Some(level) => Ok(MipData::borrowed(&level.data, level.row_pitch)),
            None => Err(LoadFailure::Other(format!(
                "no data for mip {mip_index} slice {array_index}"
            ))),
        }
    }
}
