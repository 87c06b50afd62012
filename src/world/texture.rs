// Per-level texture pools. The asset loader fills them; the renderer only
// reads a published snapshot and picks variants by tile coordinate.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::renderer::Rgba;

/// CPU-side storage: 32-bit **ARGB** (0xAARRGGBB) in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<Rgba>,
}

/// Things that can go wrong when building a texture.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture `{0}` has zero width or height")]
    Empty(String),

    #[error("texture `{name}` is {w}x{h} but holds {len} pixels")]
    SizeMismatch {
        name: String,
        w: usize,
        h: usize,
        len: usize,
    },
}

impl Texture {
    pub fn new<S: Into<String>>(
        name: S,
        w: usize,
        h: usize,
        pixels: Vec<Rgba>,
    ) -> Result<Self, TextureError> {
        let name = name.into();
        if w == 0 || h == 0 {
            return Err(TextureError::Empty(name));
        }
        if pixels.len() != w * h {
            return Err(TextureError::SizeMismatch {
                name,
                w,
                h,
                len: pixels.len(),
            });
        }
        Ok(Self { name, w, h, pixels })
    }

    /// Single-colour texture, handy for tests and placeholders.
    pub fn solid<S: Into<String>>(name: S, w: usize, h: usize, colour: Rgba) -> Self {
        Self {
            name: name.into(),
            w: w.max(1),
            h: h.max(1),
            pixels: vec![colour; w.max(1) * h.max(1)],
        }
    }

    /// Texel lookup with wrap-around.
    #[inline(always)]
    pub fn texel(&self, x: i32, y: i32) -> Rgba {
        let u = x.rem_euclid(self.w as i32) as usize;
        let v = y.rem_euclid(self.h as i32) as usize;
        self.pixels[v * self.w + u]
    }
}

/// Surface categories that own a variant pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    Wall,
    Floor,
    Ceiling,
    Door,
}

impl SurfaceKind {
    pub const ALL: [SurfaceKind; 4] = [
        SurfaceKind::Wall,
        SurfaceKind::Floor,
        SurfaceKind::Ceiling,
        SurfaceKind::Door,
    ];

    /// File-name stem used by the asset layout.
    pub fn stem(self) -> &'static str {
        match self {
            SurfaceKind::Wall => "wall",
            SurfaceKind::Floor => "floor",
            SurfaceKind::Ceiling => "ceiling",
            SurfaceKind::Door => "door",
        }
    }
}

/// Large primes that decorrelate neighbouring tiles.
const HASH_X: i32 = 7919;
const HASH_Y: i32 = 104_729;

/// Deterministic variant choice for tile `(x, y)` from a pool of `n`.
///
/// `None` when the pool is empty.
#[inline]
pub fn variant_index(x: i32, y: i32, n: usize) -> Option<usize> {
    if n == 0 {
        return None;
    }
    let h = x.wrapping_mul(HASH_X).wrapping_add(y.wrapping_mul(HASH_Y)) & 0x7fff_ffff;
    Some(h as usize % n)
}

/// One primary image plus any number of extra variants.
///
/// Either part may be missing while the loader is still running; the
/// effective pool is whatever has arrived, primary first.
#[derive(Clone, Debug, Default)]
pub struct VariantSet {
    pub primary: Option<Arc<Texture>>,
    pub extras: SmallVec<[Arc<Texture>; 8]>,
}

impl VariantSet {
    pub fn len(&self) -> usize {
        self.primary.is_some() as usize + self.extras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, idx: usize) -> Option<&Texture> {
        match &self.primary {
            Some(p) if idx == 0 => Some(p),
            Some(_) => self.extras.get(idx - 1).map(Arc::as_ref),
            None => self.extras.get(idx).map(Arc::as_ref),
        }
    }

    /// Primary if loaded, else the first extra that is.
    pub fn first(&self) -> Option<&Texture> {
        self.get(0)
    }

    /// Variant for tile `(x, y)`; `None` if nothing is loaded yet.
    #[inline]
    pub fn pick(&self, x: i32, y: i32) -> Option<&Texture> {
        variant_index(x, y, self.len()).and_then(|i| self.get(i))
    }
}

/// Immutable snapshot of every surface category for one dungeon level.
///
/// The loader never mutates a published pool; it builds a new one and
/// swaps the `Arc`.
#[derive(Clone, Debug, Default)]
pub struct TexturePool {
    pub level: u32,
    pub generation: u64,
    pub wall: VariantSet,
    pub floor: VariantSet,
    pub ceiling: VariantSet,
    pub door: VariantSet,
}

impl TexturePool {
    pub fn empty(level: u32) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    pub fn set(&self, kind: SurfaceKind) -> &VariantSet {
        match kind {
            SurfaceKind::Wall => &self.wall,
            SurfaceKind::Floor => &self.floor,
            SurfaceKind::Ceiling => &self.ceiling,
            SurfaceKind::Door => &self.door,
        }
    }

    pub fn set_mut(&mut self, kind: SurfaceKind) -> &mut VariantSet {
        match kind {
            SurfaceKind::Wall => &mut self.wall,
            SurfaceKind::Floor => &mut self.floor,
            SurfaceKind::Ceiling => &mut self.ceiling,
            SurfaceKind::Door => &mut self.door,
        }
    }

    /// Ceiling images, or the floor ones while no ceiling has loaded.
    pub fn ceiling_or_floor(&self) -> &VariantSet {
        if self.ceiling.is_empty() {
            &self.floor
        } else {
            &self.ceiling
        }
    }

    /// Total number of loaded images.
    pub fn len(&self) -> usize {
        SurfaceKind::ALL.iter().map(|&k| self.set(k).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn tex(name: &str) -> Arc<Texture> {
        Arc::new(Texture::solid(name, 2, 2, 0xFF_00_00_00))
    }

    #[test]
    fn variant_index_is_stable_and_in_range() {
        for n in 1..12 {
            for y in -20..20 {
                for x in -20..20 {
                    let a = variant_index(x, y, n).unwrap();
                    assert!(a < n);
                    assert_eq!(Some(a), variant_index(x, y, n));
                }
            }
        }
    }

    #[test]
    fn variant_index_handles_huge_coordinates() {
        let i = variant_index(i32::MAX, i32::MIN, 7).unwrap();
        assert!(i < 7);
    }

    #[test]
    fn empty_pool_has_no_variant() {
        assert_eq!(variant_index(3, 4, 0), None);
        assert!(VariantSet::default().pick(3, 4).is_none());
    }

    #[test]
    fn known_hash_values() {
        // (1*7919 + 2*104729) = 217377
        assert_eq!(variant_index(1, 2, 1000), Some(377));
        assert_eq!(variant_index(0, 0, 5), Some(0));
    }

    #[test]
    fn variant_set_orders_primary_first() {
        let mut set = VariantSet::default();
        set.extras.push(tex("a"));
        assert_eq!(set.first().unwrap().name, "a");

        set.primary = Some(tex("p"));
        set.extras.push(tex("b"));
        assert_eq!(set.len(), 3);
        assert_eq!(set.get(0).unwrap().name, "p");
        assert_eq!(set.get(1).unwrap().name, "a");
        assert_eq!(set.get(2).unwrap().name, "b");
        assert!(set.get(3).is_none());
    }

    #[test]
    fn ceiling_falls_back_to_floor() {
        let mut pool = TexturePool::empty(1);
        pool.floor.primary = Some(tex("floor"));
        assert_eq!(pool.ceiling_or_floor().first().unwrap().name, "floor");
        pool.ceiling.primary = Some(tex("ceil"));
        assert_eq!(pool.ceiling_or_floor().first().unwrap().name, "ceil");
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn texture_new_validates() {
        assert_eq!(
            Texture::new("x", 0, 2, vec![]).unwrap_err(),
            TextureError::Empty("x".into())
        );
        assert!(matches!(
            Texture::new("x", 2, 2, vec![0; 3]).unwrap_err(),
            TextureError::SizeMismatch { len: 3, .. }
        ));
        let t = Texture::new("x", 2, 1, vec![1, 2]).unwrap();
        assert_eq!(t.texel(-1, 0), 2);
        assert_eq!(t.texel(2, 5), 1);
    }
}
