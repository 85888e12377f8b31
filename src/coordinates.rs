// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Coordinate types.  Both use the same cross-platform orientation:

```text
           x
      0 ────────▶
      │ ┌───────┐
    y │ │       │
      │ │       │
      │ │       │
      ▼ └───────┘
 ```
*/

/// Integer pixel coordinates within one mip level.
///
/// Coordinates are signed so that out-of-range requests (including negative
/// ones) can be represented and reported rather than wrapped.
///
/// # Examples
///
/// ```
/// use texture_reader::coordinates::Texel;
///
/// let texel = Texel { x: 10, y: 20 };
/// assert!(texel.is_inside(16, 32));
/// assert!(!Texel { x: -1, y: 0 }.is_inside(16, 32));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct Texel {
    pub x: i32,
    pub y: i32,
}

impl Texel {
    /// The origin texel at coordinates (0, 0).
    pub const ZERO: Texel = Texel { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether this texel addresses a pixel of a `width`×`height` level.
    #[inline]
    pub const fn is_inside(self, width: usize, height: usize) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as usize) < width && (self.y as usize) < height
    }

    /// Clamps each axis independently to `[0, width-1] × [0, height-1]`.
    ///
    /// `width` and `height` must be positive.
    #[inline]
    pub fn clamped(self, width: usize, height: usize) -> Texel {
        Texel {
            x: clamp_axis(self.x, width),
            y: clamp_axis(self.y, height),
        }
    }
}

#[inline]
fn clamp_axis(v: i32, len: usize) -> i32 {
    let max = i32::try_from(len - 1).unwrap_or(i32::MAX);
    v.clamp(0, max)
}

/// Normalized sample coordinates in the range [0, 1].
///
/// (0, 0) is the top-left corner of the image and (1, 1) the bottom-right,
/// independent of which mip level is sampled.
///
/// ```
/// use texture_reader::coordinates::Normalized;
///
/// let clamped = Normalized::new_clamping(1.5, -0.2);
/// assert_eq!(clamped.x(), 1.0);
/// assert_eq!(clamped.y(), 0.0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Normalized {
    x: f32,
    y: f32,
}

impl Normalized {
    /// Creates new normalized coordinates.
    ///
    /// # Panics
    ///
    /// Panics if x or y are outside the range [0, 1].
    pub fn new(x: f32, y: f32) -> Self {
        assert!((0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y));
        Self { x, y }
    }

    /// Creates new normalized coordinates, clamping values to [0, 1].
    ///
    /// NaN clamps to 0.
    #[inline]
    pub fn new_clamping(x: f32, y: f32) -> Self {
        Self {
            x: saturate(x),
            y: saturate(y),
        }
    }

    #[inline]
    pub const fn x(&self) -> f32 {
        self.x
    }
    #[inline]
    pub const fn y(&self) -> f32 {
        self.y
    }
}

#[inline]
fn saturate(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
