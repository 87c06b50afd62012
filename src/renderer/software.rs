//! ---------------------------------------------------------------------------
//! Software (CPU) surface
//!
//! * Fills a `Vec<u32>` frame-buffer in **0xAARRGGBB** format.
//! * Nearest-texel sampling; destination rectangles are clipped to the
//!   buffer so callers may paint partly off-screen strips.
//! ---------------------------------------------------------------------------

use crate::{
    renderer::{Rect, Rgba, SrcRect, Surface, Tint},
    world::texture::Texture,
};

/// Colour the buffer is cleared to at the start of each frame.
pub const CLEAR: Rgba = 0xFF_1A_1A_2E;

/// CPU frame-buffer.
#[derive(Default)]
pub struct Software {
    scratch: Vec<Rgba>,
    width: usize,
    height: usize,
}

impl Software {
    pub fn new(width: usize, height: usize) -> Self {
        let mut sw = Self::default();
        sw.begin_frame(width, height);
        sw
    }

    /// (Re)allocate for the requested resolution and clear.
    pub fn begin_frame(&mut self, w: usize, h: usize) {
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
        }
        self.scratch.fill(CLEAR);
    }

    /// Hand the finished buffer to `submit(&[Rgba], w, h)`.
    pub fn end_frame<F, T>(&self, submit: F) -> T
    where
        F: FnOnce(&[Rgba], usize, usize) -> T,
    {
        submit(&self.scratch, self.width, self.height)
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.scratch
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.scratch[y * self.width + x]
    }

    /// Intersection of `r` with the buffer as `(x0, y0, x1, y1)`, exclusive.
    fn clip(&self, r: Rect) -> Option<(usize, usize, usize, usize)> {
        if r.is_empty() {
            return None;
        }
        let x0 = r.x.max(0);
        let y0 = r.y.max(0);
        let x1 = (r.x + r.w).min(self.width as i32);
        let y1 = (r.y + r.h).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }
}

/// `src` over `dst` with coverage `alpha`, after scaling `src` by `k`.
#[inline(always)]
fn blend(dst: Rgba, src: Rgba, k: f32, alpha: f32) -> Rgba {
    if alpha >= 1.0 {
        return super::scale(src, k);
    }
    super::lerp(dst, super::scale(src, k), alpha)
}

impl Surface for Software {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, dst: Rect, colour: Rgba, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.clip(dst) else {
            return;
        };
        for y in y0..y1 {
            let row = &mut self.scratch[y * self.width..][..self.width];
            for px in &mut row[x0..x1] {
                *px = blend(*px, colour, 1.0, alpha);
            }
        }
    }

    fn blit(&mut self, tex: &Texture, src: SrcRect, dst: Rect, tint: Tint) {
        if tint.alpha <= 0.0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.clip(dst) else {
            return;
        };

        /* texel step per destination pixel --------------------------------*/
        let du = src.w / dst.w as f32;
        let dv = src.h / dst.h as f32;

        for y in y0..y1 {
            let v = src.y + (y as i32 - dst.y) as f32 * dv + dv * 0.5;
            let ty = v.floor() as i32;
            let row = &mut self.scratch[y * self.width..][..self.width];
            for (x, px) in row.iter_mut().enumerate().take(x1).skip(x0) {
                let u = src.x + (x as i32 - dst.x) as f32 * du + du * 0.5;
                let texel = tex.texel(u.floor() as i32, ty);
                *px = blend(*px, texel, tint.brightness, tint.alpha);
            }
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
