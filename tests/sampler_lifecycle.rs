// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Sampler creation, sampling and disposal against a texture that audits its lock.

use std::cell::RefCell;

use texture_reader::api::{create_sampler, dispose_sampler, read_pixel, sample_linear};
use texture_reader::error::{Error, LoadFailure};
use texture_reader::software::SoftwareTexture;
use texture_reader::texture::{LockHandle, MipData, TextureResource, mip_size};
use texture_reader::{Float4, PixelFormat, ReadStatus, TextureSampler};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Acquire(u64),
    Release(u64),
    Fetch { mip: u32, locked: bool },
}

/// RGBA8 texture with tightly packed rows that records every lock operation
/// and panics on a release it did not hand out.
struct AuditedTexture {
    width: usize,
    height: usize,
    levels: Vec<Vec<u8>>,
    outstanding: RefCell<Vec<u64>>,
    next_id: RefCell<u64>,
    events: RefCell<Vec<Event>>,
}

impl AuditedTexture {
    fn new(width: usize, height: usize, levels: Vec<Vec<u8>>) -> Self {
        Self {
            width,
            height,
            levels,
            outstanding: RefCell::new(Vec::new()),
            next_id: RefCell::new(1),
            events: RefCell::new(Vec::new()),
        }
    }

    fn uniform(width: usize, height: usize, pixel: [u8; 4]) -> Self {
        Self::new(width, height, vec![pixel.repeat(width * height)])
    }

    fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    fn releases(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, Event::Release(_)))
            .count()
    }

    fn is_locked(&self) -> bool {
        !self.outstanding.borrow().is_empty()
    }
}

impl TextureResource for AuditedTexture {
    fn width(&self) -> usize {
        self.width
    }
    fn height(&self) -> usize {
        self.height
    }
    fn pixel_format(&self) -> PixelFormat {
        PixelFormat::RGBA8UNorm
    }
    fn mip_levels(&self) -> u32 {
        self.levels.len() as u32
    }
    fn array_size(&self) -> u32 {
        1
    }

    fn acquire_lock(&self) -> LockHandle {
        let mut next = self.next_id.borrow_mut();
        let id = *next;
        *next += 1;
        self.outstanding.borrow_mut().push(id);
        self.events.borrow_mut().push(Event::Acquire(id));
        LockHandle::new(id)
    }

    fn release_lock(&self, handle: LockHandle) {
        let mut outstanding = self.outstanding.borrow_mut();
        let position = outstanding
            .iter()
            .position(|id| *id == handle.id())
            .unwrap_or_else(|| panic!("lock {} released twice or never acquired", handle.id()));
        outstanding.remove(position);
        self.events.borrow_mut().push(Event::Release(handle.id()));
    }

    fn mip_data(
        &self,
        mip_index: u32,
        array_index: u32,
        _streaming_only: bool,
    ) -> Result<MipData<'_>, LoadFailure> {
        self.events.borrow_mut().push(Event::Fetch {
            mip: mip_index,
            locked: self.is_locked(),
        });
        if array_index != 0 {
            return Err(LoadFailure::NoSuchSlice {
                array_index,
                array_size: 1,
            });
        }
        let level = self
            .levels
            .get(mip_index as usize)
            .ok_or(LoadFailure::NoSuchMip {
                mip_index,
                mip_levels: self.mip_levels(),
            })?;
        let (width, _) = mip_size(self, mip_index);
        Ok(MipData::borrowed(level, width * 4))
    }
}

fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Float4 {
    PixelFormat::RGBA8UNorm.sampler().decode(&[r, g, b, a])
}

#[test]
fn dispose_releases_the_lock_exactly_once() {
    let texture = AuditedTexture::uniform(4, 4, [1, 2, 3, 4]);
    let sampler = create_sampler(Some(&texture), 0, 0).expect("opens");
    assert!(texture.is_locked());
    let _ = sample_linear(&sampler, 0.3, 0.7);
    let _ = sample_linear(&sampler, 0.9, 0.1);
    dispose_sampler(sampler);
    assert!(!texture.is_locked());
    assert_eq!(
        texture.events(),
        vec![
            Event::Acquire(1),
            Event::Fetch { mip: 0, locked: true },
            Event::Release(1),
        ]
    );
}

#[test]
fn dropping_a_sampler_releases_once() {
    let texture = AuditedTexture::uniform(2, 2, [0; 4]);
    {
        let _sampler = TextureSampler::open(&texture, 0, 0).expect("opens");
    }
    assert_eq!(texture.releases(), 1);
    assert!(!texture.is_locked());
}

#[test]
fn failed_creation_releases_the_lock() {
    let texture = AuditedTexture::uniform(2, 2, [0; 4]);
    let err = create_sampler(Some(&texture), 3, 0).unwrap_err();
    assert!(matches!(
        err,
        Error::LoadUnavailable {
            mip_index: 3,
            source: LoadFailure::NoSuchMip { .. },
            ..
        }
    ));
    assert_eq!(
        texture.events(),
        vec![
            Event::Acquire(1),
            Event::Fetch { mip: 3, locked: true },
            Event::Release(1),
        ]
    );
}

#[test]
fn null_texture_takes_no_lock() {
    assert!(matches!(
        create_sampler::<AuditedTexture>(None, 0, 0),
        Err(Error::NullResource)
    ));
    let mut dst = [0u8; 4];
    assert_eq!(
        read_pixel::<AuditedTexture>(None, 0, 0, 0, 0, &mut dst),
        Err(ReadStatus::NullTexture)
    );
}

#[test]
fn one_shot_reads_release_on_every_path() {
    let texture = AuditedTexture::uniform(2, 2, [7; 4]);
    let mut dst = [0u8; 4];
    assert_eq!(read_pixel(Some(&texture), 0, 0, 1, 1, &mut dst), Ok(4));
    assert_eq!(read_pixel(Some(&texture), 0, 0, 2, 1, &mut dst), Err(ReadStatus::XOutOfRange));
    assert_eq!(read_pixel(Some(&texture), 0, 0, 1, 2, &mut dst), Err(ReadStatus::YOutOfRange));
    assert_eq!(read_pixel(Some(&texture), 0, 1, 0, 0, &mut dst), Err(ReadStatus::LoadFailure));
    assert_eq!(texture.releases(), 4);
    assert!(!texture.is_locked());
    assert!(
        texture
            .events()
            .iter()
            .all(|e| !matches!(e, Event::Fetch { locked: false, .. }))
    );
}

#[test]
fn concurrent_samplers_hold_separate_locks() {
    let texture = AuditedTexture::uniform(2, 2, [0; 4]);
    let a = create_sampler(Some(&texture), 0, 0).expect("opens");
    let b = create_sampler(Some(&texture), 0, 0).expect("opens");
    dispose_sampler(a);
    assert!(texture.is_locked());
    dispose_sampler(b);
    assert!(!texture.is_locked());
    assert_eq!(texture.releases(), 2);
}

#[test]
fn uniform_color_is_returned_exactly_at_origin() {
    let texture = AuditedTexture::uniform(3, 5, [10, 120, 250, 200]);
    let sampler = create_sampler(Some(&texture), 0, 0).expect("opens");
    let expected = rgba8(10, 120, 250, 200);
    assert_eq!(sample_linear(&sampler, 0.0, 0.0), expected);
    assert!(sample_linear(&sampler, 0.77, 0.12).max_abs_diff(expected) < 1e-6);
    dispose_sampler(sampler);
}

#[test]
fn center_of_2x2_averages_all_four() {
    let pixels: [[u8; 4]; 4] = [[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255], [255, 255, 255, 255]];
    let texture = AuditedTexture::new(2, 2, vec![pixels.concat()]);
    let sampler = create_sampler(Some(&texture), 0, 0).expect("opens");
    let c = sample_linear(&sampler, 0.5, 0.5);
    assert!(c.max_abs_diff(Float4::new(0.5, 0.5, 0.5, 1.0)) < 1e-6);
    dispose_sampler(sampler);
}

#[test]
fn out_of_range_coordinates_clamp_to_edge() {
    let pixels: Vec<u8> = (0..16u8).flat_map(|i| [i * 16, 255 - i * 16, i, 255]).collect();
    let texture = AuditedTexture::new(4, 4, vec![pixels]);
    let sampler = create_sampler(Some(&texture), 0, 0).expect("opens");
    for v in [0.0, 0.2, 0.5, 0.9, 1.0] {
        assert_eq!(sample_linear(&sampler, 1.5, v), sample_linear(&sampler, 1.0, v));
        assert_eq!(sample_linear(&sampler, -0.5, v), sample_linear(&sampler, 0.0, v));
        assert_eq!(sample_linear(&sampler, v, 3.0), sample_linear(&sampler, v, 1.0));
    }
    //no wraparound: the far edge does not blend with the near one
    let right = sample_linear(&sampler, 1.5, 0.0);
    assert!(right.max_abs_diff(rgba8(48, 207, 3, 255)) < 1e-6);
    dispose_sampler(sampler);
}

#[test]
fn one_by_one_level_returns_its_pixel_everywhere() {
    let texture = AuditedTexture::new(
        4,
        4,
        vec![vec![0; 64], vec![0; 16], vec![9, 99, 199, 255]],
    );
    let sampler = create_sampler(Some(&texture), 2, 0).expect("opens");
    assert_eq!((sampler.width(), sampler.height()), (1, 1));
    let expected = rgba8(9, 99, 199, 255);
    for (u, v) in [(0.0, 0.0), (0.5, 0.5), (1.0, 1.0), (0.25, 0.75), (-3.0, f32::NAN)] {
        let c = sample_linear(&sampler, u, v);
        assert!(c.max_abs_diff(expected) < 1e-6, "({u}, {v}) -> {c:?}");
    }
    dispose_sampler(sampler);
}

#[test]
fn srgb_textures_decode_to_linear() {
    let texture = SoftwareTexture::from_pixels(
        PixelFormat::BGRA8UNormSRGB,
        1,
        1,
        vec![0, 188, 255, 128],
    )
    .expect("valid");
    let sampler = create_sampler(Some(&texture), 0, 0).expect("opens");
    let c = sample_linear(&sampler, 0.5, 0.5);
    assert!((c.r - 1.0).abs() < 1e-6);
    assert!((c.g - 0.5).abs() < 0.01);
    assert_eq!(c.b, 0.0);
    assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
    dispose_sampler(sampler);
    assert_eq!(texture.lock_stats(), (1, 1));
}
