//! Face colors

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// An RGBA color with channels in `[0, 1]`
///
/// Two colors are equal only when all four channels are bit-for-bit equal
/// after folding `-0.0` into `0.0`, which is what palette deduplication
/// relies on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Face color used when an OFF face line carries no color: `#f9d72c`, opaque.
pub const DEFAULT_FACE_COLOR: Color = Color {
    r: 249.0 / 255.0,
    g: 215.0 / 255.0,
    b: 44.0 / 255.0,
    a: 1.0,
};

impl Color {
    /// Create a color from `[0, 1]` channels
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from 0-255 channels
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Create a color from 0-255 channel values.
    ///
    /// Three or four channels are accepted; alpha is 1.0 when only three are
    /// given. Returns `None` for any other channel count.
    pub fn from_channels(channels: &[f32]) -> Option<Self> {
        match *channels {
            [r, g, b] => Some(Self::new(r / 255.0 + 0.0, g / 255.0 + 0.0, b / 255.0 + 0.0, 1.0)),
            [r, g, b, a] => Some(Self::new(
                r / 255.0 + 0.0,
                g / 255.0 + 0.0,
                b / 255.0 + 0.0,
                a / 255.0 + 0.0,
            )),
            _ => None,
        }
    }

    /// Whether the color needs alpha blending
    pub fn is_translucent(&self) -> bool {
        self.a < 1.0
    }

    /// Channels as `[r, g, b, a]`
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Channel bits with `-0.0` folded into `0.0`
    fn bits(&self) -> [u32; 4] {
        [self.r, self.g, self.b, self.a].map(|channel| (channel + 0.0).to_bits())
    }
}

impl Default for Color {
    fn default() -> Self {
        DEFAULT_FACE_COLOR
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

impl From<[f32; 4]> for Color {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}
