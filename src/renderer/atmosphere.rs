//! Seeded set dressing layered over the base view.
//!
//! * Wooden ceiling beams and a row of boulders along the horizon. They are
//!   painted right after the planes, so nearby walls cover them.
//! * Screen-space wall decorations (webs, cracks, vines, moss, water
//!   stains and at most one light), painted after the walls. They are
//!   seeded from the logical tile, facing and level, so a view looks the
//!   same whenever it is revisited. They are left out while a door is
//!   close ahead.
//!
//! Every size below is in pixels of a 300 px tall view and is scaled to
//! the real height.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Vec2, vec2};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    config::RenderConfig,
    engine::types::Screen,
    renderer::{Rect, Rgba, Surface, rgb},
    world::{Pose, TexturePool, Tile, TileGrid},
};

const REFERENCE_HEIGHT: f32 = 300.0;
const BLACK: Rgba = 0xFF00_0000;

const BEAM_SEED: u64 = 54_321;
const FASCIA_SEED: u64 = 98_765;

/* beams --------------------------------------------------------------*/
pub const BEAM_COUNT: usize = 5;
const BEAM_SIZES: [f32; BEAM_COUNT] = [1.2, 0.8, 1.0, 0.9, 1.1];
const BEAM_SCALE: f32 = 22.0;
const BEAM_MIN: f32 = 8.0;

/* fascia -------------------------------------------------------------*/
const FASCIA_RISE: f32 = 8.0;
const FASCIA_BAND: f32 = 12.0;

/// Doors this many tiles ahead (or closer) suppress the decorations.
pub const DOOR_REACH: i32 = 3;

/// Reference pixels → real pixels.
#[derive(Clone, Copy, Debug)]
struct Unit(f32);

impl Unit {
    fn of(screen: &Screen) -> Self {
        Self(screen.h as f32 / REFERENCE_HEIGHT)
    }

    /// Whole pixels, never less than one.
    #[inline]
    fn px(self, v: f32) -> i32 {
        (v * self.0).round().max(1.0) as i32
    }

    #[inline]
    fn f(self, v: f32) -> f32 {
        v * self.0
    }
}

#[inline]
fn roll(rng: &mut StdRng) -> f32 {
    rng.gen_range(0.0..1.0)
}

#[inline]
fn sign(rng: &mut StdRng) -> f32 {
    if roll(rng) < 0.5 { -1.0 } else { 1.0 }
}

/// `[r, g, b]` scaled by `k` and clamped into a colour.
fn tone([r, g, b]: [i32; 3], k: f32) -> Rgba {
    let c = |v: i32| (v as f32 * k).round().clamp(0.0, 255.0) as u8;
    rgb(c(r), c(g), c(b))
}

fn offset([r, g, b]: [i32; 3], d: i32) -> [i32; 3] {
    [r + d, g + d, b + d]
}

fn level_seed(base: u64, level: u32) -> u64 {
    base ^ (u64::from(level) << 24)
}

/*──────────────────────────── ceiling ────────────────────────────────*/

/// Placement of one ceiling beam.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Beam {
    pub centre: i32,
    pub height: i32,
    /// Plane distance of the beam's centre row.
    pub row_distance: f32,
}

impl Beam {
    #[inline]
    pub fn top(&self) -> i32 {
        self.centre - self.height / 2
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.top() + self.height
    }
}

/// Beams evenly spaced between the top edge and the horizon; thickness
/// follows the same `flatness · h / p` perspective as the ceiling rows.
pub fn beam_layout(screen: &Screen, cfg: &RenderConfig) -> [Beam; BEAM_COUNT] {
    let unit = Unit::of(screen);
    let horizon = screen.horizon as i32;
    let min = unit.f(BEAM_MIN).round().max(2.0);
    std::array::from_fn(|i| {
        let centre = horizon * (i as i32 + 1) / (BEAM_COUNT as i32 + 1);
        let p = (horizon - centre).max(1);
        let row_distance = cfg.flatness * screen.h as f32 / p as f32;
        let height = (unit.f(BEAM_SCALE) * BEAM_SIZES[i] / row_distance)
            .round()
            .max(min);
        Beam {
            centre,
            height: height as i32,
            row_distance,
        }
    })
}

/// Beams (only once a ceiling image is loaded) and the boulder fascia.
pub fn draw_ceiling<S: Surface + ?Sized>(
    surface: &mut S,
    screen: &Screen,
    pool: &TexturePool,
    level: u32,
    cfg: &RenderConfig,
) {
    if !pool.ceiling_or_floor().is_empty() {
        let mut rng = StdRng::seed_from_u64(level_seed(BEAM_SEED, level));
        for (i, beam) in beam_layout(screen, cfg).iter().enumerate() {
            draw_beam(surface, screen, &mut rng, i, beam);
        }
    }
    let mut rng = StdRng::seed_from_u64(level_seed(FASCIA_SEED, level));
    draw_fascia(surface, screen, &mut rng);
}

fn draw_beam<S: Surface + ?Sized>(
    surface: &mut S,
    screen: &Screen,
    rng: &mut StdRng,
    i: usize,
    beam: &Beam,
) {
    let unit = Unit::of(screen);
    let w = screen.w as i32;
    let (top, bottom) = (beam.top(), beam.bottom());
    let base = [
        90 + rng.gen_range(0..20),
        66 + rng.gen_range(0..15),
        40 + rng.gen_range(0..10),
    ];

    surface.fill_rect(
        Rect::new(0, top, w, 2),
        tone([base[0] - 32, base[1] - 26, base[2] - 22], 1.0),
        1.0,
    );

    // lighter in the middle, streaked with grain
    let half = (beam.height as f32 * 0.5).max(1.0);
    let phase = i as f32 * 10.0;
    for y in (top + 2..bottom - 2).step_by(2) {
        let edge = (y - beam.centre).abs() as f32 / half * 0.3;
        let row = [
            base[0] - (edge * 40.0) as i32,
            base[1] - (edge * 30.0) as i32,
            base[2] - (edge * 20.0) as i32,
        ];
        for x in (0..w).step_by(4) {
            let xf = x as f32;
            let wobble = (xf * 0.1 + phase).sin() * 8.0;
            let grain = 0.85 + ((xf + wobble) * 0.05 + y as f32 * 0.2).sin() * 0.15;
            surface.fill_rect(Rect::new(x, y, 4, 2), tone(row, grain), 1.0);
        }
    }

    for _ in 0..2 + rng.gen_range(0..3) {
        let x = (roll(rng) * w as f32) as i32;
        let y = top + 3 + (roll(rng) * (beam.height - 6).max(0) as f32) as i32;
        let (kw, kh) = (rng.gen_range(3..7), rng.gen_range(2..5));
        let alpha = 0.6 + roll(rng) * 0.3;
        // rounded knot: two overlapping rects
        let knot = rgb(25, 18, 10);
        surface.fill_rect(Rect::new(x - kw + 1, y - kh, 2 * kw - 2, 2 * kh), knot, alpha);
        surface.fill_rect(Rect::new(x - kw, y - kh + 1, 2 * kw, 2 * kh - 2), knot, alpha * 0.5);
    }

    for _ in 0..3 {
        let y = top + 3 + (roll(rng) * (beam.height - 6).max(0) as f32) as i32;
        let x = (roll(rng) * w as f32 * 0.5) as i32;
        let len = unit.px(20.0 + roll(rng) * 60.0);
        let alpha = 0.15 + roll(rng) * 0.15;
        surface.fill_rect(Rect::new(x, y, len, 1), rgb(140, 115, 80), alpha);
    }

    for _ in 0..2 {
        let y = top + 2 + (roll(rng) * (beam.height - 4).max(0) as f32) as i32;
        let x = (roll(rng) * w as f32 * 0.7) as i32;
        let len = unit.px(10.0 + roll(rng) * 30.0);
        let alpha = 0.3 + roll(rng) * 0.2;
        surface.fill_rect(Rect::new(x, y, len, 1), rgb(20, 12, 5), alpha);
    }

    surface.fill_rect(
        Rect::new(0, bottom - 2, w, 2),
        tone([base[0] - 48, base[1] - 40, base[2] - 30], 1.0),
        1.0,
    );

    let span = Rect::new(0, top, w, beam.height);
    surface.fill_rect(span, rgb(5, 8, 5), (beam.row_distance / 8.0).min(0.6));
    surface.fill_rect(Rect::new(0, bottom, w, 3), BLACK, 0.6);
}

/// Row of uneven boulders where the ceiling meets the walls.
fn draw_fascia<S: Surface + ?Sized>(surface: &mut S, screen: &Screen, rng: &mut StdRng) {
    let unit = Unit::of(screen);
    let w = screen.w as i32;
    let top = screen.horizon as i32 - unit.px(FASCIA_RISE);
    let band = unit.px(FASCIA_BAND);

    let mut x = 0;
    while x < w {
        let bw = unit.px(12.0 + roll(rng) * 18.0);
        let bh = unit.px(8.0 + roll(rng) * 5.0);
        let y = top + (roll(rng) * 3.0) as i32 - 1;

        let grey = 65 + (roll(rng) * 25.0) as i32;
        let stone = [
            grey + (roll(rng) * 15.0) as i32 - 7,
            grey + (roll(rng) * 10.0) as i32 - 8,
            grey + (roll(rng) * 10.0) as i32 - 10,
        ];

        // body with chipped corners, lit top, shaded underside
        surface.fill_rect(Rect::new(x + 1, y, bw - 2, bh), tone(stone, 1.0), 1.0);
        surface.fill_rect(Rect::new(x, y + 2, bw, bh - 4), tone(stone, 1.0), 1.0);
        surface.fill_rect(Rect::new(x + 3, y + 1, bw - 6, 2), tone(offset(stone, 18), 1.0), 1.0);
        surface.fill_rect(Rect::new(x + 2, y + bh - 3, bw - 4, 2), BLACK, 0.4);

        if roll(rng) > 0.4 {
            let cx = x + 3 + (roll(rng) * (bw - 6).max(0) as f32) as i32;
            surface.fill_rect(Rect::new(cx, y + 2, 1, bh - 4), rgb(30, 28, 25), 0.5);
        }

        // mortar gap
        surface.fill_rect(Rect::new(x + bw - 1, top, 2, band), rgb(20, 18, 15), 0.7);
        x += bw + 1;
    }

    surface.fill_rect(Rect::new(0, top + band - 2, w, 3), BLACK, 0.5);
    surface.fill_rect(Rect::new(0, top - 1, w, 2), BLACK, 0.3);
}

/*──────────────────────────── decorations ────────────────────────────*/

/// A door within [`DOOR_REACH`] tiles straight ahead, with no wall in
/// between.
pub fn door_ahead(grid: &TileGrid, pose: &Pose) -> bool {
    let (tx, ty) = pose.tile();
    let (dx, dy) = pose.facing.step();
    for n in 1..=DOOR_REACH {
        match grid.get(tx + dx * n, ty + dy * n) {
            Some(Tile::Door) => return true,
            Some(Tile::Wall) => return false,
            _ => {}
        }
    }
    false
}

/// Seed for the decorations seen from `pose` on `level`.
pub fn decor_seed(pose: &Pose, level: u32) -> u64 {
    let (tx, ty) = pose.tile();
    let cell = (u64::from(tx as u32) << 32) | u64::from(ty as u32);
    cell.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (u64::from(pose.facing.index()) << 4)
        ^ (u64::from(level) << 8)
}

/// Paint the decorations for `pose`. Returns `false` when a door ahead
/// suppressed them.
pub fn draw_decorations<S: Surface + ?Sized>(
    surface: &mut S,
    screen: &Screen,
    grid: &TileGrid,
    pose: &Pose,
    level: u32,
) -> bool {
    if door_ahead(grid, pose) {
        return false;
    }
    let unit = Unit::of(screen);
    let mut rng = StdRng::seed_from_u64(decor_seed(pose, level));
    let corner_y = screen.horizon - unit.f(5.0);

    web(surface, &mut rng, unit, vec2(0.0, corner_y), 0.0);
    web(surface, &mut rng, unit, vec2(screen.w as f32, corner_y), FRAC_PI_2);
    cracks(surface, &mut rng, unit, screen);
    vines(surface, &mut rng, unit, screen);
    moss(surface, &mut rng, unit, screen);
    stains(surface, &mut rng, unit, screen);
    light(surface, &mut rng, unit, screen);
    true
}

/// One-pixel line from `a` to `b`.
fn line<S: Surface + ?Sized>(surface: &mut S, a: Vec2, b: Vec2, colour: Rgba, alpha: f32) {
    let d = b - a;
    let n = d.x.abs().max(d.y.abs()).ceil().max(1.0) as i32;
    for i in 0..=n {
        let p = a + d * (i as f32 / n as f32);
        surface.fill_rect(
            Rect::new(p.x.floor() as i32, p.y.floor() as i32, 1, 1),
            colour,
            alpha,
        );
    }
}

/// Quarter-circle web anchored at `corner`, opening from angle `start`.
fn web<S: Surface + ?Sized>(
    surface: &mut S,
    rng: &mut StdRng,
    unit: Unit,
    corner: Vec2,
    start: f32,
) {
    if roll(rng) <= 0.3 {
        return;
    }
    let size = unit.f(25.0 + roll(rng) * 20.0);
    let alpha = 0.35 + roll(rng) * 0.25;
    let strands = 5 + rng.gen_range(0..3);

    // screen y points down, so angles turn upwards
    let at = |a: f32, r: f32| corner + vec2(a.cos(), -a.sin()) * r;
    for s in 0..strands {
        let a = start + s as f32 / strands as f32 * FRAC_PI_2;
        line(surface, corner, at(a, size), rgb(200, 200, 210), alpha);
    }
    for ring in [0.3, 0.55, 0.8] {
        let mut prev = at(start, size * ring);
        let mut a = start + 0.15;
        while a < start + PI * 0.55 {
            let next = at(a, size * ring);
            line(surface, prev, next, rgb(180, 180, 195), alpha * 0.6);
            prev = next;
            a += 0.15;
        }
    }
}

fn cracks<S: Surface + ?Sized>(surface: &mut S, rng: &mut StdRng, unit: Unit, screen: &Screen) {
    let w = screen.w as f32;
    for _ in 0..3 + rng.gen_range(0..4) {
        let x = unit.f(20.0) + roll(rng) * (w - unit.f(40.0)).max(0.0);
        let y = screen.horizon + unit.f(10.0 + roll(rng) * 80.0);
        let segments = ((15.0 + roll(rng) * 35.0) / 4.0).ceil() as usize;
        let alpha = 0.4 + roll(rng) * 0.3;
        let drift = sign(rng) * 2.0;

        let mut points = Vec::with_capacity(segments + 1);
        let mut p = vec2(x, y);
        points.push(p);
        for _ in 0..segments {
            let next = p + vec2((roll(rng) - 0.5) * 6.0 + drift, 3.0 + roll(rng) * 3.0) * unit.0;
            if roll(rng) > 0.6 {
                let len = unit.f(5.0 + roll(rng) * 10.0);
                let branch = next + vec2(sign(rng) * len, len * 0.5);
                line(surface, next, branch, rgb(20, 18, 15), alpha);
            }
            points.push(next);
            p = next;
        }

        // shadow first, crack on top
        let shadow = vec2(1.0, 1.0);
        for pair in points.windows(2) {
            line(surface, pair[0] + shadow, pair[1] + shadow, BLACK, alpha * 0.5);
        }
        for pair in points.windows(2) {
            line(surface, pair[0], pair[1], rgb(20, 18, 15), alpha);
        }
    }
}

/// Sparse slimy vines hanging from the ceiling line.
fn vines<S: Surface + ?Sized>(surface: &mut S, rng: &mut StdRng, unit: Unit, screen: &Screen) {
    let w = screen.w as f32;
    for _ in 0..1 + rng.gen_range(0..2) {
        if roll(rng) > 0.6 {
            continue;
        }
        let x = unit.f(40.0) + roll(rng) * (w - unit.f(80.0)).max(0.0);
        let y = screen.horizon - unit.f(15.0 + roll(rng) * 20.0);
        let segments = ((15.0 + roll(rng) * 25.0) / 3.0).ceil() as usize;
        let alpha = 0.6 + roll(rng) * 0.25;
        let sway = sign(rng);

        let mut points = Vec::with_capacity(segments + 1);
        let mut p = vec2(x, y);
        points.push(p);
        for _ in 0..segments {
            let next = p + vec2(sway * (0.5 + roll(rng) * 1.5), 3.0) * unit.0;
            line(surface, p, next, rgb(35, 55, 30), alpha);
            points.push(next);
            p = next;
        }

        for _ in 0..2 + rng.gen_range(0..3) {
            let pt = points[rng.gen_range(0..points.len())];
            let len = unit.f(3.0 + roll(rng) * 6.0);
            line(surface, pt, pt + vec2(0.0, len), rgb(100, 160, 80), 0.5);
            let drop = Rect::new(pt.x as i32 - 1, (pt.y + len) as i32 - 1, 2, 3);
            surface.fill_rect(drop, rgb(120, 180, 90), 0.4 + roll(rng) * 0.3);
        }

        if roll(rng) > 0.5 {
            let pt = points[rng.gen_range(1..points.len())];
            let side = sign(rng);
            let leaf = Rect::new((pt.x + side * 3.0) as i32 - 2, pt.y as i32 - 1, 4, 2);
            surface.fill_rect(leaf, rgb(40, 60, 35), alpha);
        }
    }
}

fn moss<S: Surface + ?Sized>(surface: &mut S, rng: &mut StdRng, unit: Unit, screen: &Screen) {
    let w = screen.w as f32;
    let cell = unit.px(3.0);
    for _ in 0..4 + rng.gen_range(0..4) {
        let x = (roll(rng) * w) as i32;
        let y = (screen.horizon + unit.f(20.0 + roll(rng) * 60.0)) as i32;
        let mw = unit.px(15.0 + roll(rng) * 25.0);
        let mh = unit.px(8.0 + roll(rng) * 15.0);
        let alpha = 0.2 + roll(rng) * 0.2;
        let (rx, ry) = (mw as f32 * 0.5, mh as f32 * 0.5);

        for mx in (0..mw).step_by(cell as usize) {
            for my in (0..mh).step_by(cell as usize) {
                let d = vec2((mx as f32 - rx) / rx, (my as f32 - ry) / ry).length();
                if d < 1.0 && roll(rng) > 0.3 {
                    let g = 45 + rng.gen_range(0..30);
                    surface.fill_rect(
                        Rect::new(x + mx, y + my, cell, cell),
                        rgb(25, g, 20),
                        alpha * (1.0 - d * 0.5),
                    );
                }
            }
        }
    }
}

/// Faint water streaks running down from the ceiling line.
fn stains<S: Surface + ?Sized>(surface: &mut S, rng: &mut StdRng, unit: Unit, screen: &Screen) {
    let w = screen.w as f32;
    let top = (screen.horizon - unit.f(10.0)) as i32;
    for _ in 0..2 + rng.gen_range(0..3) {
        let x = unit.f(20.0) + roll(rng) * (w - unit.f(40.0)).max(0.0);
        let len = unit.px(40.0 + roll(rng) * 60.0);
        let width = unit.px(3.0 + roll(rng) * 3.0);
        let drift = unit.f((roll(rng) - 0.5) * 8.0);
        for r in 0..len {
            let xr = x + drift * r as f32 / len as f32;
            let streak = Rect::new(xr.round() as i32, top + r, width, 1);
            surface.fill_rect(streak, rgb(60, 70, 65), 0.25);
        }
    }
}

/// At most one wall lantern or candle, high up near the ceiling line.
fn light<S: Surface + ?Sized>(surface: &mut S, rng: &mut StdRng, unit: Unit, screen: &Screen) {
    if roll(rng) <= 0.5 {
        return;
    }
    let w = screen.w as f32;
    let x = (unit.f(60.0) + roll(rng) * (w - unit.f(120.0)).max(0.0)) as i32;
    let y = (screen.horizon + unit.f(5.0 + roll(rng) * 15.0)) as i32;
    let lantern = roll(rng) > 0.6;

    for radius in [18.0, 12.0, 7.0] {
        let r = unit.px(radius);
        surface.fill_rect(Rect::new(x - r, y - r, 2 * r, 2 * r), rgb(255, 170, 60), 0.08);
    }

    let (p2, p4) = (unit.px(2.0), unit.px(4.0));
    if lantern {
        line(
            surface,
            vec2(x as f32, (y - unit.px(6.0)) as f32),
            vec2(x as f32, y as f32),
            rgb(40, 40, 45),
            1.0,
        );
        surface.fill_rect(Rect::new(x - p4, y, 2 * p4, unit.px(10.0)), rgb(50, 45, 40), 1.0);
        surface.fill_rect(Rect::new(x - p2, y + p2, 2 * p2, unit.px(6.0)), rgb(255, 200, 110), 0.9);
    } else {
        surface.fill_rect(Rect::new(x - p4, y + unit.px(8.0), 2 * p4, p2), rgb(60, 55, 50), 1.0);
        surface.fill_rect(Rect::new(x - 1, y + p2, 2, unit.px(6.0)), rgb(225, 215, 190), 1.0);
        surface.fill_rect(Rect::new(x - 1, y, 2, p2), rgb(255, 190, 80), 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        renderer::{Software, software::CLEAR},
        world::{Facing, Texture},
    };
    use std::sync::Arc;

    fn ceiling_pool() -> TexturePool {
        let mut pool = TexturePool::empty(1);
        pool.ceiling.primary = Some(Arc::new(Texture::solid("ceiling", 8, 8, rgb(50, 48, 52))));
        pool
    }

    fn corridor() -> TileGrid {
        TileGrid::from_ascii(
            "########\n\
             #...D..#\n\
             #......#\n\
             #.#D...#\n\
             ########",
        )
        .unwrap()
    }

    fn ceiling(w: usize, h: usize, pool: &TexturePool, level: u32) -> Software {
        let mut sw = Software::new(w, h);
        let screen = Screen::new(w, h, 0.0);
        draw_ceiling(&mut sw, &screen, pool, level, &RenderConfig::default());
        sw
    }

    fn decorated(pose: Pose, level: u32) -> (bool, Software) {
        let mut sw = Software::new(160, 120);
        let screen = Screen::new(160, 120, 0.0);
        let drawn = draw_decorations(&mut sw, &screen, &corridor(), &pose, level);
        (drawn, sw)
    }

    #[test]
    fn beams_thin_towards_the_horizon() {
        let beams = beam_layout(&Screen::new(320, 300, 0.0), &RenderConfig::default());
        // top beam: p = 125, rowDistance 1.2, 22 · 1.2 / 1.2
        assert_eq!((beams[0].centre, beams[0].height), (25, 22));
        // last beam: rowDistance 6 gives 4 px, raised to the minimum
        assert_eq!((beams[4].centre, beams[4].height), (125, 8));
        assert!(beams.iter().all(|b| b.bottom() < 150));
        assert!(beams.windows(2).all(|p| p[0].row_distance < p[1].row_distance));
    }

    #[test]
    fn ceiling_dressing_is_repeatable() {
        let pool = ceiling_pool();
        let a = ceiling(64, 48, &pool, 3);
        let b = ceiling(64, 48, &pool, 3);
        assert_eq!(a.pixels(), b.pixels());

        let other = ceiling(64, 48, &pool, 4);
        assert_ne!(a.pixels(), other.pixels());
    }

    #[test]
    fn dressing_stays_near_the_ceiling() {
        let sw = ceiling(120, 300, &ceiling_pool(), 1);
        // beam 1 spans rows 14..36
        assert_ne!(sw.pixel(60, 25), CLEAR);
        // fascia reaches at most a few rows below the horizon
        assert!(sw.pixels()[160 * 120..].iter().all(|&p| p == CLEAR));
    }

    #[test]
    fn beams_wait_for_a_ceiling_image() {
        let sw = ceiling(120, 300, &TexturePool::empty(1), 1);
        assert!(sw.pixels()[..130 * 120].iter().all(|&p| p == CLEAR));
        // the fascia is drawn regardless
        assert!(sw.pixels()[141 * 120..156 * 120].iter().any(|&p| p != CLEAR));
    }

    #[test]
    fn door_ahead_looks_three_tiles_and_stops_at_walls() {
        let grid = corridor();
        assert!(door_ahead(&grid, &Pose::at_tile(1, 1, Facing::East)));
        assert!(!door_ahead(&grid, &Pose::at_tile(1, 2, Facing::East)));
        assert!(door_ahead(&grid, &Pose::at_tile(6, 3, Facing::West)));
        // wall at (2, 3) hides the door at (3, 3)
        assert!(!door_ahead(&grid, &Pose::at_tile(1, 3, Facing::East)));
        assert!(!door_ahead(&grid, &Pose::at_tile(1, 1, Facing::North)));

        let hall = TileGrid::from_ascii("#######\n#D....#\n#######").unwrap();
        assert!(door_ahead(&hall, &Pose::at_tile(4, 1, Facing::West)));
        assert!(!door_ahead(&hall, &Pose::at_tile(5, 1, Facing::West)));
    }

    #[test]
    fn door_ahead_suppresses_decorations() {
        let (drawn, sw) = decorated(Pose::at_tile(2, 1, Facing::East), 1);
        assert!(!drawn);
        assert!(sw.pixels().iter().all(|&p| p == CLEAR));
    }

    #[test]
    fn decorations_follow_the_view() {
        let pose = Pose::at_tile(1, 2, Facing::East);
        let (drawn, a) = decorated(pose, 1);
        assert!(drawn);
        assert!(a.pixels().iter().any(|&p| p != CLEAR));

        let (_, again) = decorated(pose, 1);
        assert_eq!(a.pixels(), again.pixels());

        let (_, turned) = decorated(Pose::at_tile(1, 2, Facing::South), 1);
        assert_ne!(a.pixels(), turned.pixels());
    }

    #[test]
    fn decor_seed_separates_views() {
        let p = Pose::at_tile(3, 4, Facing::North);
        let seeds = [
            decor_seed(&p, 1),
            decor_seed(&Pose::at_tile(4, 3, Facing::North), 1),
            decor_seed(&Pose::at_tile(3, 4, Facing::East), 1),
            decor_seed(&p, 2),
        ];
        for i in 0..seeds.len() {
            for j in i + 1..seeds.len() {
                assert_ne!(seeds[i], seeds[j]);
            }
        }
    }
}
