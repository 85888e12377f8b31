// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! Bilinear color sampling at normalized coordinates.

Sampling uses the half-pixel-center convention: normalized `u` maps to
continuous pixel space as `px = u * width - 0.5`, so `u = 0.5 / width` lands
exactly on the center of column 0.

Filtered sampling never fails.  Coordinates outside `[0, 1]` are clamped, and
neighbor texels are clamped to the edge of the level.  There is no
wraparound; tiling is the caller's responsibility.

# Examples

```
use texture_reader::address::MipBufferView;
use texture_reader::pixel_formats::PixelFormat;
use texture_reader::sampler::SamplerContext;

let data = [0u8, 100, 200, 255];
let view = MipBufferView::new(&data, 2, 2, 2, 1).unwrap();
let context = SamplerContext::new(view, PixelFormat::R8UNorm.sampler()).unwrap();

let center = context.sample_linear(0.5, 0.5);
let expected = (0.0 + 100.0 + 200.0 + 255.0) / 4.0 / 255.0;
assert!((center.r - expected).abs() < 1e-6);
```
*/

use crate::address::MipBufferView;
use crate::coordinates::{Normalized, Texel};
use crate::error::Error;
use crate::pixel_formats::{Float4, FormatSampler};

/// A mip buffer bound to the decoder for its format.
///
/// Valid only while the storage lock of the underlying texture is held; the
/// borrow of the buffer enforces this when the context comes from
/// [`crate::reader::TextureSampler`].
#[derive(Debug, Clone, Copy)]
pub struct SamplerContext<'a> {
    view: MipBufferView<'a>,
    format: FormatSampler,
}

impl<'a> SamplerContext<'a> {
    /// Binds `format` to `view`.  The decoder's pixel size must match the view's.
    pub fn new(view: MipBufferView<'a>, format: FormatSampler) -> Result<Self, Error> {
        if format.bytes_per_pixel() != view.bytes_per_pixel() {
            return Err(Error::SizeMismatch {
                expected: view.bytes_per_pixel(),
                actual: format.bytes_per_pixel(),
            });
        }
        Ok(Self { view, format })
    }

    #[inline]
    pub fn view(&self) -> &MipBufferView<'a> {
        &self.view
    }

    #[inline]
    pub fn format(&self) -> FormatSampler {
        self.format
    }

    /// Bilinearly filtered color at `(u, v)`.
    ///
    /// The four neighbors are weighted by their fractional distance along
    /// each axis:
    /// `lerp(lerp(c00, c10, fx), lerp(c01, c11, fx), fy)`.
    pub fn sample_linear(&self, u: f32, v: f32) -> Float4 {
        let uv = Normalized::new_clamping(u, v);
        let width = self.view.width();
        let height = self.view.height();

        let px = uv.x() * width as f32 - 0.5;
        let py = uv.y() * height as f32 - 0.5;
        let x0f = px.floor();
        let y0f = py.floor();
        let fx = px - x0f;
        let fy = py - y0f;
        let x0 = x0f as i32;
        let y0 = y0f as i32;

        let c00 = self.texel(Texel::new(x0, y0));
        let c10 = self.texel(Texel::new(x0 + 1, y0));
        let c01 = self.texel(Texel::new(x0, y0 + 1));
        let c11 = self.texel(Texel::new(x0 + 1, y0 + 1));

        let top = c00.lerp(c10, fx);
        let bottom = c01.lerp(c11, fx);
        top.lerp(bottom, fy)
    }

    /// Bilinear sample at an already-normalized coordinate.
    #[inline]
    pub fn sample(&self, at: Normalized) -> Float4 {
        self.sample_linear(at.x(), at.y())
    }

    /// Decoded color of the texel containing `(u, v)`, without filtering.
    pub fn sample_nearest(&self, u: f32, v: f32) -> Float4 {
        let uv = Normalized::new_clamping(u, v);
        let x = (uv.x() * self.view.width() as f32).floor() as i32;
        let y = (uv.y() * self.view.height() as f32).floor() as i32;
        self.texel(Texel::new(x, y))
    }

    /// Decodes a texel after clamping it onto the level.
    #[inline]
    fn texel(&self, texel: Texel) -> Float4 {
        let t = texel.clamped(self.view.width(), self.view.height());
        match self.view.pixel_bytes(t.x, t.y) {
            Ok(bytes) => self.format.decode(bytes),
            //clamped texels are always inside the view
            Err(_) => unreachable!("clamped texel {t:?} outside {:?}", self.view),
        }
    }
}
