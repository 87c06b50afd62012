//! Rendering abstraction layer.
//!
//! *The casting code never touches a pixel buffer directly.*
//! It paints through an immediate-mode [`Surface`]: a fill primitive and a
//! source-rect → dest-rect blit with brightness/alpha. No retained scene is
//! assumed, so any back-end that can stretch a texture region will do.
//!
//! * [`software::Software`] is the CPU framebuffer used by the viewer.
//! * [`atmosphere`] adds the seeded beams, fascia and wall decorations.
//! * [`view::DungeonView`] drives one complete frame.

use crate::world::texture::Texture;

/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// Destination rectangle in whole pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }
}

/// Source region in texels; fractional edges are allowed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SrcRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl SrcRect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Per-blit modulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tint {
    /// RGB multiplier, 0 = black, 1 = unchanged.
    pub brightness: f32,
    /// Coverage over what is already there.
    pub alpha: f32,
}

impl Tint {
    pub const NONE: Tint = Tint {
        brightness: 1.0,
        alpha: 1.0,
    };

    pub const fn shade(brightness: f32) -> Self {
        Self {
            brightness,
            alpha: 1.0,
        }
    }
}

/// Output surface plus its drawing primitives.
pub trait Surface {
    /// Pixel dimensions `(width, height)`.
    fn size(&self) -> (usize, usize);

    /// Blend `colour` over `dst` with coverage `alpha`.
    fn fill_rect(&mut self, dst: Rect, colour: Rgba, alpha: f32);

    /// Stretch `src` of `tex` into `dst`.
    fn blit(&mut self, tex: &Texture, src: SrcRect, dst: Rect, tint: Tint);
}

/*──────────────────────── colour helpers ─────────────────────────────*/

#[inline(always)]
pub const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
    0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

#[inline(always)]
fn channels(c: Rgba) -> [f32; 3] {
    [
        ((c >> 16) & 0xFF) as f32,
        ((c >> 8) & 0xFF) as f32,
        (c & 0xFF) as f32,
    ]
}

#[inline(always)]
fn pack([r, g, b]: [f32; 3]) -> Rgba {
    let q = |v: f32| v.round().clamp(0.0, 255.0) as u32;
    0xFF00_0000 | q(r) << 16 | q(g) << 8 | q(b)
}

/// Multiply RGB by `k`.
#[inline]
pub fn scale(c: Rgba, k: f32) -> Rgba {
    if k >= 1.0 {
        return c | 0xFF00_0000;
    }
    let [r, g, b] = channels(c);
    pack([r * k, g * k, b * k])
}

/// `a` at t = 0, `b` at t = 1.
#[inline]
pub fn lerp(a: Rgba, b: Rgba, t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    let [ar, ag, ab] = channels(a);
    let [br, bg, bb] = channels(b);
    pack([
        ar + (br - ar) * t,
        ag + (bg - ag) * t,
        ab + (bb - ab) * t,
    ])
}

pub mod atmosphere;
pub mod planes;
pub mod software;
pub mod view;
pub mod walls;

pub use software::Software;
pub use view::{DrawOutcome, DungeonView, FrameInput};
