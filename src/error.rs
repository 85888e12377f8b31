// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Error and status types for texture reads.
//!
//! Raw reads report every failure exactly; filtered sampling never fails and
//! clamps instead (see [`crate::sampler`]).  The integer codes of
//! [`ReadStatus`] are the ones exposed by [`crate::api::read_pixel`].

use std::fmt::Display;

/// A coordinate fell outside the mip level.
///
/// X is always checked before Y, so when both are invalid the X variant is
/// reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoundsError {
    /// `value` is outside `[0, len)` on the X axis.
    #[error("x coordinate {value} is outside the valid range 0..{len}")]
    XOutOfRange { value: i32, len: usize },
    /// `value` is outside `[0, len)` on the Y axis.
    #[error("y coordinate {value} is outside the valid range 0..{len}")]
    YOutOfRange { value: i32, len: usize },
}

impl BoundsError {
    /// The offending coordinate.
    pub const fn value(&self) -> i32 {
        match self {
            BoundsError::XOutOfRange { value, .. } | BoundsError::YOutOfRange { value, .. } => {
                *value
            }
        }
    }
}

/// The mip-data provider could not produce the requested level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadFailure {
    #[error("mip level {mip_index} does not exist (texture has {mip_levels})")]
    NoSuchMip { mip_index: u32, mip_levels: u32 },
    #[error("array slice {array_index} does not exist (texture has {array_size})")]
    NoSuchSlice { array_index: u32, array_size: u32 },
    /// The level exists but is not resident (e.g. still streaming).
    #[error("mip data is not resident")]
    NotResident,
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("no texture was provided")]
    NullResource,
    #[error("mip {mip_index} slice {array_index} unavailable: {source}")]
    LoadUnavailable {
        mip_index: u32,
        array_index: u32,
        #[source]
        source: LoadFailure,
    },
    #[error(transparent)]
    OutOfBounds(#[from] BoundsError),
    #[error("destination holds {available} bytes but a pixel needs {needed}")]
    DestinationTooSmall { needed: usize, available: usize },
    #[error("size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("invalid mip layout: {0}")]
    InvalidLayout(Layout),
}

/// Why a mip buffer was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    EmptyGeometry,
    RowPitchTooSmall { row_pitch: usize, row_bytes: usize },
    BufferTooShort { required: usize, actual: usize },
    Overflow,
}

impl Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layout::EmptyGeometry => write!(f, "width, height, row pitch and pixel size must be positive"),
            Layout::RowPitchTooSmall { row_pitch, row_bytes } => {
                write!(f, "row pitch {row_pitch} is smaller than a row of {row_bytes} bytes")
            }
            Layout::BufferTooShort { required, actual } => {
                write!(f, "buffer holds {actual} bytes, {required} required")
            }
            Layout::Overflow => write!(f, "buffer size overflows usize"),
        }
    }
}

/// Integer status of a raw pixel read.
///
/// The discriminants are part of the exposed surface and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ReadStatus {
    Success = 0,
    XOutOfRange = 1,
    YOutOfRange = 2,
    NullTexture = 3,
    LoadFailure = 4,
}

impl ReadStatus {
    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl From<BoundsError> for ReadStatus {
    fn from(e: BoundsError) -> Self {
        match e {
            BoundsError::XOutOfRange { .. } => ReadStatus::XOutOfRange,
            BoundsError::YOutOfRange { .. } => ReadStatus::YOutOfRange,
        }
    }
}

impl From<&Error> for ReadStatus {
    fn from(e: &Error) -> Self {
        match e {
            Error::NullResource => ReadStatus::NullTexture,
            Error::OutOfBounds(b) => (*b).into(),
            //a buffer we cannot address is as unusable as one that never loaded
            Error::LoadUnavailable { .. }
            | Error::InvalidLayout(_)
            | Error::DestinationTooSmall { .. }
            | Error::SizeMismatch { .. } => ReadStatus::LoadFailure,
        }
    }
}
