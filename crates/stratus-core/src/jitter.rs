//! Halton sub-pixel jitter for temporal accumulation

use glam::Vec2;
use std::num::NonZeroU32;

/// Radical-inverse base used for the horizontal offset
pub const HALTON_BASE_X: u32 = 2;
/// Radical-inverse base used for the vertical offset
pub const HALTON_BASE_Y: u32 = 3;

/// Largest `f32` below 1.0. Very large indices round up to 1.0 in single
/// precision and are clamped here.
const ONE_MINUS_EPSILON: f32 = 1.0 - f32::EPSILON / 2.0;

/// Index of the frame being produced.
///
/// Starts at 1 and only ever increases. Index 0 would map to a degenerate
/// zero offset, so it cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameIndex(NonZeroU32);

impl FrameIndex {
    pub const FIRST: FrameIndex = FrameIndex(NonZeroU32::MIN);

    pub fn new(index: u32) -> Option<Self> {
        NonZeroU32::new(index).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// The following frame. Saturates at `u32::MAX`.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for FrameIndex {
    fn default() -> Self {
        Self::FIRST
    }
}

/// Radical inverse of `index` in `base`: the base-`base` digits of `index`
/// mirrored around the radix point. Always in `[0, 1)`, and exactly `0.0`
/// for index 0.
pub fn radical_inverse(index: u32, base: u32) -> f32 {
    debug_assert!(base >= 2, "radical inverse needs base >= 2");
    let mut result = 0.0f32;
    let mut f = 1.0f32;
    let mut i = index;

    while i > 0 {
        f /= base as f32;
        result += f * (i % base) as f32;
        i /= base;
    }

    result.min(ONE_MINUS_EPSILON)
}

/// Halton (2, 3) jitter sequence.
///
/// Stateless; the frame index is the only input besides the target size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JitterSequence;

impl JitterSequence {
    /// Sub-pixel offset for `frame` on a `width` x `height` target, each axis
    /// in `[-0.5 / size, 0.5 / size)`.
    pub fn offset(&self, frame: FrameIndex, width: u32, height: u32) -> Vec2 {
        let x = radical_inverse(frame.get(), HALTON_BASE_X);
        let y = radical_inverse(frame.get(), HALTON_BASE_Y);

        Vec2::new(
            (x - 0.5) / width.max(1) as f32,
            (y - 0.5) / height.max(1) as f32,
        )
    }
}
