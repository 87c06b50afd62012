//! Perspective floor and ceiling casting.
//!
//! For a screen row `p` pixels away from the horizon, every pixel of that
//! row looks at the plane at the same distance:
//!
//! ```text
//!   rowDistance = flatness · h / p
//!   left        = pos + rowDistance · (dir − plane)
//!   step        = rowDistance · 2 · plane / w          (per column)
//! ```
//!
//! Rows are walked left to right, `stride` columns at a time; each sample
//! picks the variant for the tile it lands in and stretches a 2×2 texel
//! neighbourhood over `stride × 1` pixels.

use crate::{
    config::RenderConfig,
    engine::types::Screen,
    renderer::{Rect, Rgba, SrcRect, Surface, Tint, lerp, rgb, walls::fog_factor},
    world::{Camera, TexturePool, texture::VariantSet},
};

/// Fog on the planes never goes fully black.
const PLANE_FOG_MAX: f32 = 0.6;

/// Top and horizon colours of the fallback ceiling.
const CEILING_GRADIENT: [Rgba; 2] = [rgb(0x0a, 0x08, 0x06), rgb(0x1a, 0x15, 0x10)];
/// Horizon, middle and bottom colours of the fallback floor.
const FLOOR_GRADIENT: [Rgba; 3] = [
    rgb(0x2a, 0x25, 0x20),
    rgb(0x3d, 0x35, 0x28),
    rgb(0x1a, 0x15, 0x10),
];

/// Paint every row of the view with ceiling (above the horizon) or floor.
pub fn draw_planes<S: Surface + ?Sized>(
    surface: &mut S,
    screen: &Screen,
    cam: &Camera,
    pool: &TexturePool,
    stride: usize,
    cfg: &RenderConfig,
) {
    let horizon = screen.horizon as i32;
    let ceiling = pool.ceiling_or_floor();

    for y in 0..screen.h as i32 {
        let above = y < horizon;
        // rows straddle the horizon symmetrically: p = 1 on both sides
        let p = if above { horizon - y } else { y - horizon + 1 };
        let set = if above { ceiling } else { &pool.floor };

        if set.is_empty() {
            let colour = gradient(above, y, horizon, screen.h as i32);
            surface.fill_rect(Rect::new(0, y, screen.w as i32, 1), colour, 1.0);
            continue;
        }

        let row_distance = cfg.flatness * screen.h as f32 / p as f32;
        draw_row(surface, screen, cam, set, y, row_distance, stride, cfg);

        let fog = fog_factor(row_distance, cfg).min(PLANE_FOG_MAX);
        if fog > 0.0 {
            surface.fill_rect(Rect::new(0, y, screen.w as i32, 1), 0xFF00_0000, fog);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_row<S: Surface + ?Sized>(
    surface: &mut S,
    screen: &Screen,
    cam: &Camera,
    set: &VariantSet,
    y: i32,
    row_distance: f32,
    stride: usize,
    cfg: &RenderConfig,
) {
    let stride = stride.max(1);
    let dir = cam.forward();
    let plane = cam.plane();

    let mut point = cam.pos + row_distance * (dir - plane);
    let step = row_distance * 2.0 * plane / screen.w as f32 * stride as f32;

    for x in (0..screen.w).step_by(stride) {
        let tile = point.floor();
        if let Some(tex) = set.pick(tile.x as i32, tile.y as i32) {
            let frac = point - tile;
            let src = SrcRect::new(
                neighbourhood(frac.x, tex.w, cfg.texel_inset),
                neighbourhood(frac.y, tex.h, cfg.texel_inset),
                2.0,
                2.0,
            );
            surface.blit(tex, src, Rect::new(x as i32, y, stride as i32, 1), Tint::NONE);
        }
        point += step;
    }
}

/// Left/top edge of the 2×2 region centred on fraction `f` of a `size`
/// texel axis, kept `inset` texels away from the border.
#[inline]
fn neighbourhood(f: f32, size: usize, inset: f32) -> f32 {
    let size = size as f32;
    let hi = (size - 2.0 - inset).max(inset);
    (f * size - 1.0).clamp(inset, hi)
}

fn gradient(above: bool, y: i32, horizon: i32, h: i32) -> Rgba {
    if above {
        let t = y as f32 / horizon.max(1) as f32;
        return lerp(CEILING_GRADIENT[0], CEILING_GRADIENT[1], t);
    }
    let t = (y - horizon) as f32 / (h - horizon).max(1) as f32;
    if t < 0.5 {
        lerp(FLOOR_GRADIENT[0], FLOOR_GRADIENT[1], t * 2.0)
    } else {
        lerp(FLOOR_GRADIENT[1], FLOOR_GRADIENT[2], (t - 0.5) * 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        renderer::{Software, spy::Spy},
        world::{Facing, Texture},
    };
    use glam::vec2;
    use std::sync::Arc;

    fn cam() -> Camera {
        Camera::new(vec2(2.5, 2.5), Facing::North, 0.66)
    }

    fn floor_pool(colour: Rgba) -> TexturePool {
        let mut pool = TexturePool::empty(1);
        pool.floor.primary = Some(Arc::new(Texture::solid("floor", 8, 8, colour)));
        pool
    }

    #[test]
    fn empty_pool_paints_gradient() {
        let cfg = RenderConfig::default();
        let screen = Screen::new(6, 10, 0.0);
        let mut sw = Software::new(6, 10);
        draw_planes(&mut sw, &screen, &cam(), &TexturePool::empty(1), 1, &cfg);

        assert_eq!(sw.pixel(0, 0), CEILING_GRADIENT[0]);
        assert_eq!(sw.pixel(0, 5), FLOOR_GRADIENT[0]);
        for y in 0..10 {
            let row = sw.pixel(0, y);
            assert!((0..6).all(|x| sw.pixel(x, y) == row), "row {y}");
        }
    }

    #[test]
    fn ceiling_borrows_floor_images() {
        let cfg = RenderConfig::default();
        let red = rgb(200, 0, 0);
        let screen = Screen::new(4, 8, 0.0);
        let mut sw = Software::new(4, 8);
        draw_planes(&mut sw, &screen, &cam(), &floor_pool(red), 1, &cfg);

        // outermost rows sit at rowDistance = 1, closer than the fog
        assert_eq!(sw.pixel(0, 0), red);
        assert_eq!(sw.pixel(3, 7), red);
    }

    #[test]
    fn distant_rows_are_fogged() {
        let cfg = RenderConfig::default();
        let red = rgb(200, 0, 0);
        let screen = Screen::new(4, 40, 0.0);
        let mut sw = Software::new(4, 40);
        draw_planes(&mut sw, &screen, &cam(), &floor_pool(red), 1, &cfg);

        // row next to the horizon: rowDistance 20 → capped fog
        assert_eq!(sw.pixel(0, 20), lerp(red, 0xFF00_0000, PLANE_FOG_MAX));
    }

    #[test]
    fn stride_sets_samples_per_row() {
        let cfg = RenderConfig::default();
        let screen = Screen::new(8, 4, 0.0);
        let mut spy = Spy::new(8, 4);
        draw_planes(&mut spy, &screen, &cam(), &floor_pool(rgb(1, 2, 3)), 4, &cfg);
        // 4 rows × 2 samples; rows are at distance 1 or 2, so no fog
        assert_eq!(spy.blits, 8);
        assert_eq!(spy.fills, 0);
        assert!(spy.blit_dsts.iter().all(|d| d.w == 4 && d.h == 1));
        let starts: Vec<i32> = spy.blit_dsts.iter().take(2).map(|d| d.x).collect();
        assert_eq!(starts, [0, 4]);

        let mut spy = Spy::new(8, 4);
        draw_planes(&mut spy, &screen, &cam(), &floor_pool(rgb(1, 2, 3)), 1, &cfg);
        assert_eq!(spy.blits, 32);
        assert!(spy.blit_dsts.iter().all(|d| d.w == 1));
    }

    #[test]
    fn variants_follow_the_tile_hash() {
        let cfg = RenderConfig::default();
        let mut pool = TexturePool::empty(1);
        let colours = [rgb(255, 0, 0), rgb(0, 255, 0), rgb(0, 0, 255)];
        for (i, &c) in colours.iter().enumerate() {
            pool.floor
                .extras
                .push(Arc::new(Texture::solid(format!("f{i}"), 4, 4, c)));
        }
        let screen = Screen::new(16, 16, 0.0);
        let c = cam();
        let mut sw = Software::new(16, 16);
        draw_planes(&mut sw, &screen, &c, &pool, 1, &cfg);

        // bottom row, column 0: rowDistance 1
        let rd = cfg.flatness * 16.0 / 8.0;
        let p = c.pos + rd * (c.forward() - c.plane());
        let t = p.floor();
        let expect = pool.floor.pick(t.x as i32, t.y as i32).unwrap().pixels[0];
        assert_eq!(sw.pixel(0, 15), expect);
    }

    #[test]
    fn neighbourhood_respects_inset() {
        assert_eq!(neighbourhood(0.0, 16, 0.5), 0.5);
        assert_eq!(neighbourhood(0.999, 16, 0.5), 13.5);
        assert_eq!(neighbourhood(0.5, 16, 0.5), 7.0);
    }
}
