//! Seeded procedural textures.
//!
//! Four generators, one per [`SurfaceKind`]: staggered stone bricks for
//! walls, irregular flagstones for floors, rough rock for ceilings and a
//! riveted metal plate for doors. Each level has its own palette so the
//! dungeon changes colour as the player descends.

use std::sync::Arc;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    assets::clamp_level,
    renderer::{Rgba, rgb},
    world::{SurfaceKind, Texture, TexturePool},
};

/// Colours for one level: base stone, mortar/gaps, accent (moss, rust).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub stone: [u8; 3],
    pub mortar: [u8; 3],
    pub accent: [u8; 3],
}

const fn pal(stone: [u8; 3], mortar: [u8; 3], accent: [u8; 3]) -> Palette {
    Palette {
        stone,
        mortar,
        accent,
    }
}

#[rustfmt::skip]
static PALETTES: [Palette; 10] = [
    pal([112, 104,  92], [ 46,  42,  36], [ 70,  96,  52]), // mossy sandstone
    pal([ 98,  98, 104], [ 40,  40,  46], [ 64,  90,  70]), // grey granite
    pal([118,  92,  70], [ 50,  36,  26], [ 96,  70,  40]), // clay
    pal([ 84,  90,  80], [ 34,  38,  32], [ 52,  84,  44]), // damp slate
    pal([ 96,  76,  76], [ 42,  30,  30], [120,  60,  40]), // rust
    pal([ 72,  78,  96], [ 28,  30,  40], [ 70,  96, 120]), // cold blue
    pal([ 88,  70,  96], [ 36,  26,  40], [110,  80, 130]), // amethyst
    pal([ 64,  64,  60], [ 22,  22,  20], [ 90,  40,  30]), // basalt
    pal([110,  60,  44], [ 44,  20,  14], [160,  80,  30]), // ember
    pal([ 56,  44,  62], [ 18,  12,  22], [120,  40, 140]), // abyss
];

pub fn palette(level: u32) -> &'static Palette {
    &PALETTES[(clamp_level(level) - 1) as usize]
}

/// Deterministic texture for `(kind, level, variant)` under `seed`.
pub fn generate(kind: SurfaceKind, level: u32, variant: u32, size: usize, seed: u64) -> Texture {
    let size = size.max(8);
    let level = clamp_level(level);
    let mut rng = StdRng::seed_from_u64(mix_seed(seed, kind, level, variant));
    let pal = palette(level);

    let pixels = match kind {
        SurfaceKind::Wall => bricks(&mut rng, pal, size),
        SurfaceKind::Floor => flagstones(&mut rng, pal, size),
        SurfaceKind::Ceiling => rough(&mut rng, pal, size),
        SurfaceKind::Door => riveted(&mut rng, pal, size),
    };
    let name = match variant {
        0 => format!("{}@{level}", kind.stem()),
        v => format!("{}_{v}@{level}", kind.stem()),
    };
    Texture {
        name,
        w: size,
        h: size,
        pixels,
    }
}

/// Whole pool in one go: a primary plus `extras` variants per kind.
pub fn generate_pool(level: u32, seed: u64, size: usize, extras: u32) -> TexturePool {
    let mut pool = TexturePool::empty(clamp_level(level));
    for kind in SurfaceKind::ALL {
        let set = pool.set_mut(kind);
        set.primary = Some(Arc::new(generate(kind, level, 0, size, seed)));
        for v in 1..=extras {
            set.extras
                .push(Arc::new(generate(kind, level, v, size, seed)));
        }
    }
    pool.generation = 1;
    pool
}

fn mix_seed(seed: u64, kind: SurfaceKind, level: u32, variant: u32) -> u64 {
    let k = SurfaceKind::ALL.iter().position(|&s| s == kind).unwrap_or(0) as u64;
    seed ^ (u64::from(level) << 40) ^ (k << 32) ^ u64::from(variant).wrapping_mul(0x9E37_79B9)
}

/* ─────────────────────────── helpers ─────────────────────────────── */

fn jitter(rng: &mut StdRng, [r, g, b]: [u8; 3], amount: i32) -> Rgba {
    let d = rng.gen_range(-amount..=amount);
    let c = |v: u8| (v as i32 + d).clamp(0, 255) as u8;
    rgb(c(r), c(g), c(b))
}

fn mix([r0, g0, b0]: [u8; 3], [r1, g1, b1]: [u8; 3], t: f32) -> [u8; 3] {
    let m = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    [m(r0, r1), m(g0, g1), m(b0, b1)]
}

fn bricks(rng: &mut StdRng, pal: &Palette, size: usize) -> Vec<Rgba> {
    let course = (size / 4).max(2);
    let brick_w = (size / 2).max(2);
    let mortar = (size / 32).max(1);

    // one tint per brick so they read as separate stones
    let rows = size.div_ceil(course);
    let tints: Vec<f32> = (0..rows * 3).map(|_| rng.gen_range(0.0..0.35)).collect();

    let mut px = Vec::with_capacity(size * size);
    for y in 0..size {
        let row = y / course;
        let offset = if row % 2 == 0 { 0 } else { brick_w / 2 };
        for x in 0..size {
            let bx = (x + offset) % size;
            let in_mortar = y % course < mortar || bx % brick_w < mortar;
            px.push(if in_mortar {
                jitter(rng, pal.mortar, 6)
            } else {
                let t = tints[row * 3 + bx / brick_w % 3];
                jitter(rng, mix(pal.stone, pal.accent, t), 10)
            });
        }
    }
    px
}

fn flagstones(rng: &mut StdRng, pal: &Palette, size: usize) -> Vec<Rgba> {
    // Voronoi cells around a few random seeds; edges become gaps.
    let n = 5 + rng.gen_range(0..4);
    let seeds: Vec<(f32, f32, f32)> = (0..n)
        .map(|_| {
            (
                rng.gen_range(0.0..size as f32),
                rng.gen_range(0.0..size as f32),
                rng.gen_range(0.0..0.3),
            )
        })
        .collect();
    let s = size as f32;
    let gap = (s / 24.0).max(1.0);

    let mut px = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            let (fx, fy) = (x as f32 + 0.5, y as f32 + 0.5);
            let mut best = (f32::MAX, f32::MAX, 0.0);
            for &(sx, sy, tint) in &seeds {
                // wrap so the texture tiles
                let dx = (fx - sx).abs().min(s - (fx - sx).abs());
                let dy = (fy - sy).abs().min(s - (fy - sy).abs());
                let d = (dx * dx + dy * dy).sqrt();
                if d < best.0 {
                    best = (d, best.0, tint);
                } else if d < best.1 {
                    best.1 = d;
                }
            }
            px.push(if best.1 - best.0 < gap {
                jitter(rng, pal.mortar, 5)
            } else {
                jitter(rng, mix(pal.stone, pal.accent, best.2), 8)
            });
        }
    }
    px
}

fn rough(rng: &mut StdRng, pal: &Palette, size: usize) -> Vec<Rgba> {
    let dark = mix(pal.stone, pal.mortar, 0.55);
    let mut px: Vec<Rgba> = (0..size * size).map(|_| jitter(rng, dark, 14)).collect();
    // a few hairline cracks
    for _ in 0..size / 8 {
        let (mut x, mut y) = (rng.gen_range(0..size), rng.gen_range(0..size));
        for _ in 0..size / 2 {
            px[y * size + x] = jitter(rng, pal.mortar, 4);
            x = (x + rng.gen_range(0..3) + size - 1) % size;
            y = (y + 1) % size;
        }
    }
    px
}

fn riveted(rng: &mut StdRng, pal: &Palette, size: usize) -> Vec<Rgba> {
    let metal = mix([70, 78, 84], pal.accent, 0.2);
    let border = (size / 16).max(1);
    let rivet_step = (size / 4).max(2);

    let mut px = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            let edge = x < border || y < border || x >= size - border || y >= size - border;
            let band = (y / (size / 3).max(1)) % 2 == 1;
            let near_rivet = {
                let rx = (x + rivet_step / 2) % rivet_step;
                let ry = (y + border * 2) % (size / 3).max(1);
                rx <= 1 && ry <= 1
            };
            let base = if edge {
                mix(metal, [0, 0, 0], 0.5)
            } else if near_rivet {
                mix(metal, [255, 255, 255], 0.35)
            } else if band {
                mix(metal, [0, 0, 0], 0.12)
            } else {
                metal
            };
            px.push(jitter(rng, base, 5));
        }
    }
    px
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_pixels() {
        for kind in SurfaceKind::ALL {
            let a = generate(kind, 3, 0, 32, 42);
            let b = generate(kind, 3, 0, 32, 42);
            assert_eq!(a, b, "{kind:?}");
            assert_eq!(a.pixels.len(), 32 * 32);
        }
    }

    #[test]
    fn variants_and_seeds_differ() {
        let a = generate(SurfaceKind::Wall, 1, 0, 32, 7);
        let b = generate(SurfaceKind::Wall, 1, 1, 32, 7);
        let c = generate(SurfaceKind::Wall, 1, 0, 32, 8);
        assert_ne!(a.pixels, b.pixels);
        assert_ne!(a.pixels, c.pixels);
        assert_eq!(b.name, "wall_1@1");
    }

    #[test]
    fn levels_are_clamped() {
        assert_eq!(palette(0), palette(1));
        assert_eq!(palette(99), palette(10));
        assert_ne!(palette(1), palette(2));
        let deep = generate(SurfaceKind::Floor, 40, 0, 16, 1);
        assert_eq!(deep.name, "floor@10");
    }

    #[test]
    fn tiny_sizes_are_raised() {
        let t = generate(SurfaceKind::Door, 1, 0, 1, 0);
        assert_eq!((t.w, t.h), (8, 8));
    }

    #[test]
    fn pool_is_complete() {
        let pool = generate_pool(2, 5, 16, 2);
        assert_eq!(pool.level, 2);
        assert_eq!(pool.len(), 4 * 3);
        for kind in SurfaceKind::ALL {
            assert_eq!(pool.set(kind).len(), 3);
        }
    }
}
